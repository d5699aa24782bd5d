//! `agt check`: validate the manifest.
//!
//! Reports component and constraint counts, the identifiers referenced by
//! constraints but never defined, and whether the system is acyclic and
//! availability consistent. Exits non-zero when it is not.

use std::collections::HashSet;
use std::io::{self, Write};

use agtron_core::ErrorCode;
use agtron_core::config::EffectiveConfig;
use agtron_core::manifest::ManifestParts;
use clap::Args;
use serde::Serialize;
use tracing::instrument;

use super::read_manifest;
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `agt check`.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {}

#[derive(Debug, Serialize)]
struct CheckReport {
    manifest: String,
    components: usize,
    constraints: usize,
    external: Vec<String>,
    valid: bool,
    acyclic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<CliError>,
}

/// Constraint endpoints that name no component, in first-seen order.
fn external_identifiers(parts: &ManifestParts) -> Vec<String> {
    let defined: HashSet<&str> = parts.components.iter().map(|c| c.name()).collect();
    let mut seen = HashSet::new();
    parts
        .constraints
        .iter()
        .flat_map(|c| [c.origin(), c.dependent()])
        .filter(|name| !defined.contains(name) && seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Execute `agt check`.
#[instrument(skip_all)]
pub fn run_check(
    _args: &CheckArgs,
    config: &EffectiveConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let parts = read_manifest(config, output)?;

    let components = parts.components.len();
    let constraints = parts.constraints.len();
    let external = external_identifiers(&parts);

    // Validation checks cycles before availability, so only a cycle error
    // means the graph is cyclic.
    let (valid, acyclic, error) = match parts.into_system() {
        Ok(_) => (true, true, None),
        Err(err) => (
            false,
            err.code() != ErrorCode::CyclicDependency,
            Some(CliError::from(&err)),
        ),
    };

    let report = CheckReport {
        manifest: config.manifest_path.display().to_string(),
        components,
        constraints,
        external,
        valid,
        acyclic,
        error,
    };

    render_mode(output, &report, render_check_text, render_check_pretty)?;

    if !report.valid {
        anyhow::bail!("check failed: manifest is invalid");
    }
    Ok(())
}

fn render_check_text(report: &CheckReport, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "manifest\t{}", report.manifest)?;
    writeln!(w, "components\t{}", report.components)?;
    writeln!(w, "constraints\t{}", report.constraints)?;
    if !report.external.is_empty() {
        writeln!(w, "external\t{}", report.external.join(","))?;
    }
    writeln!(w, "acyclic\t{}", report.acyclic)?;
    writeln!(w, "valid\t{}", report.valid)?;
    if let Some(ref error) = report.error {
        writeln!(
            w,
            "error\t{}\t{}",
            error.error_code.as_deref().unwrap_or("-"),
            error.message
        )?;
    }
    Ok(())
}

fn render_check_pretty(report: &CheckReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Manifest check")?;
    pretty_kv(w, "Manifest", &report.manifest)?;
    pretty_kv(w, "Components", report.components.to_string())?;
    pretty_kv(w, "Constraints", report.constraints.to_string())?;
    if !report.external.is_empty() {
        pretty_kv(w, "External", report.external.join(", "))?;
    }
    pretty_kv(w, "Acyclic", if report.acyclic { "✓" } else { "✗" })?;
    pretty_kv(w, "Valid", if report.valid { "✓" } else { "✗" })?;

    if let Some(ref error) = report.error {
        writeln!(w)?;
        match error.error_code {
            Some(ref code) => writeln!(w, "✗ [{code}] {}", error.message)?,
            None => writeln!(w, "✗ {}", error.message)?,
        }
        if let Some(ref suggestion) = error.suggestion {
            writeln!(w, "  suggestion: {suggestion}")?;
        }
    }
    Ok(())
}
