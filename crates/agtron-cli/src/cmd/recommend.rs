//! `agt recommend [SERVICE...]`: availability ranges from direct neighbors.
//!
//! With no services named, every component in the manifest is reported once,
//! in manifest order.
//!
//! Ranges are computed from the manifest before availability validation, so an
//! inconsistent manifest still gets recommendations and its unsatisfiable
//! ranges can be flagged. A cycle is still fatal.

use std::collections::HashSet;
use std::io::{self, Write};

use agtron_core::config::EffectiveConfig;
use agtron_core::manifest::ManifestParts;
use agtron_core::{Availability, Component, ErrorCode};
use clap::Args;
use serde::Serialize;
use tracing::warn;

use super::read_manifest;
use crate::output::{CliError, OutputMode, pretty_rule, pretty_section, render_error, render_mode};

/// Arguments for `agt recommend`.
#[derive(Args, Debug, Default)]
pub struct RecommendArgs {
    /// Services to recommend for. Defaults to every component.
    pub services: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Recommendation {
    service: String,
    /// `None` when the service is only referenced by constraints.
    #[serde(skip_serializing_if = "Option::is_none")]
    current: Option<Availability>,
    min: f64,
    max: f64,
    satisfiable: bool,
}

#[derive(Debug, Serialize)]
struct RecommendReport {
    recommendations: Vec<Recommendation>,
    /// Mirrors `recommend.warn_unsatisfiable`; text and pretty output only
    /// mark unsatisfiable ranges when set.
    #[serde(skip)]
    flag_unsatisfiable: bool,
}

fn target_services(parts: &ManifestParts, requested: &[String]) -> Vec<String> {
    if !requested.is_empty() {
        return requested.to_vec();
    }
    let mut seen = HashSet::new();
    parts
        .components
        .iter()
        .map(|component| component.name())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

fn recommend(
    parts: &ManifestParts,
    services: Vec<String>,
    flag_unsatisfiable: bool,
) -> RecommendReport {
    let recommendations = services
        .into_iter()
        .map(|service| {
            let range = parts.recommend_availability_range(&service);
            let satisfiable = range.is_satisfiable();
            if !satisfiable && flag_unsatisfiable {
                warn!(
                    service = %service,
                    min = range.min,
                    max = range.max,
                    "no availability satisfies both dependents and dependencies"
                );
            }
            Recommendation {
                current: parts.component(&service).map(Component::availability),
                service,
                min: range.min,
                max: range.max,
                satisfiable,
            }
        })
        .collect();

    RecommendReport {
        recommendations,
        flag_unsatisfiable,
    }
}

/// Execute `agt recommend`.
pub fn run_recommend(
    args: &RecommendArgs,
    config: &EffectiveConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let parts = read_manifest(config, output)?;

    if let Err(err) = parts.validate() {
        if err.code() == ErrorCode::CyclicDependency {
            render_error(output, &CliError::from(&err))?;
            anyhow::bail!("{}: {err}", err.code());
        }
        warn!(error = %err, "manifest is not availability consistent");
    }

    let services = target_services(&parts, &args.services);
    let report = recommend(
        &parts,
        services,
        config.project.recommend.warn_unsatisfiable,
    );

    render_mode(output, &report, render_recommend_text, render_recommend_pretty)
}

fn marker(report: &RecommendReport, rec: &Recommendation) -> &'static str {
    if report.flag_unsatisfiable && !rec.satisfiable {
        "  UNSATISFIABLE"
    } else {
        ""
    }
}

fn render_recommend_text(report: &RecommendReport, w: &mut dyn Write) -> io::Result<()> {
    for rec in &report.recommendations {
        let current = rec.current.map_or_else(|| "-".to_string(), |a| a.to_string());
        writeln!(
            w,
            "{}\t{}\t{}\t{}{}",
            rec.service,
            current,
            rec.min,
            rec.max,
            marker(report, rec)
        )?;
    }
    Ok(())
}

fn render_recommend_pretty(report: &RecommendReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Recommended availability")?;
    if report.recommendations.is_empty() {
        writeln!(w, "(no services)")?;
        return Ok(());
    }

    writeln!(w, "{:<24} {:>10} {:>10} {:>10}", "SERVICE", "CURRENT", "MIN", "MAX")?;
    pretty_rule(w)?;
    for rec in &report.recommendations {
        let current = rec.current.map_or_else(|| "-".to_string(), |a| a.to_string());
        writeln!(
            w,
            "{:<24} {:>10} {:>10} {:>10}{}",
            rec.service,
            current,
            rec.min,
            rec.max,
            marker(report, rec)
        )?;
    }
    Ok(())
}
