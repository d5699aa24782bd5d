pub mod check;
pub mod graph;
pub mod path;
pub mod recommend;

use agtron_core::System;
use agtron_core::config::EffectiveConfig;
use agtron_core::manifest::{self, ManifestParts};

use crate::output::{CliError, OutputMode, render_error};

/// Load and validate the configured manifest, rendering any failure.
pub fn load_system(config: &EffectiveConfig, output: OutputMode) -> anyhow::Result<System> {
    match manifest::parse_file(&config.manifest_path) {
        Ok(system) => Ok(system),
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            anyhow::bail!("{}: {err}", err.code());
        }
    }
}

/// Read the configured manifest without validating the graph, rendering any
/// read or parse failure.
pub fn read_manifest(config: &EffectiveConfig, output: OutputMode) -> anyhow::Result<ManifestParts> {
    match manifest::read_parts(&config.manifest_path) {
        Ok(parts) => Ok(parts),
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            anyhow::bail!("{}: {err}", err.code());
        }
    }
}
