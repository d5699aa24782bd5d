//! `agt path <FROM> <TO>`: how one service depends on another.
//!
//! # Edge Direction
//!
//! A constraint `A → B` means "A depends on B", so paths run from the
//! dependent service towards what it relies on.

use std::io::{self, Write};

use agtron_core::ConstraintPath;
use agtron_core::config::EffectiveConfig;
use clap::Args;
use serde::Serialize;

use super::load_system;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `agt path`.
#[derive(Args, Debug)]
pub struct PathArgs {
    /// The depending service.
    pub from: String,

    /// The service depended on.
    pub to: String,
}

#[derive(Debug, Serialize)]
struct PathReport {
    from: String,
    to: String,
    direct: bool,
    indirect: bool,
    path_count: usize,
    /// `[]`, a single bare path, or a list of paths.
    paths: ConstraintPath,
}

/// Execute `agt path`.
pub fn run_path(args: &PathArgs, config: &EffectiveConfig, output: OutputMode) -> anyhow::Result<()> {
    let system = load_system(config, output)?;

    let paths = system.constraint_path(&args.from, &args.to);
    let report = PathReport {
        from: args.from.clone(),
        to: args.to.clone(),
        direct: system.direct_constraint_exists(&args.from, &args.to),
        indirect: system.indirect_constraint_exists(&args.from, &args.to),
        path_count: paths.path_count(),
        paths,
    };

    render_mode(output, &report, render_path_text, render_path_pretty)
}

fn render_path_text(report: &PathReport, w: &mut dyn Write) -> io::Result<()> {
    for path in report.paths.paths() {
        writeln!(w, "{}", path.join(" -> "))?;
    }
    Ok(())
}

fn render_path_pretty(report: &PathReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("{} → {}", report.from, report.to))?;
    pretty_kv(w, "Direct", if report.direct { "yes" } else { "no" })?;
    pretty_kv(w, "Depends on", if report.indirect { "yes" } else { "no" })?;

    if report.paths.is_empty() {
        if report.indirect {
            writeln!(w, "(no path within the length limit)")?;
        } else {
            writeln!(w, "(no path)")?;
        }
        return Ok(());
    }

    writeln!(w)?;
    for (i, path) in report.paths.paths().iter().enumerate() {
        writeln!(w, "{:>3}. {}", i + 1, path.join(" → "))?;
    }
    Ok(())
}
