//! `fmeda summary` command - project totals

use console::style;
use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::output::emit;
use crate::cli::{GlobalOpts, OutputFormat, Workspace};
use crate::core::report::format_fit;
use crate::core::ProjectSummary;

#[derive(clap::Args, Debug)]
pub struct SummaryArgs {}

#[derive(Debug, Serialize, Tabled)]
struct SummaryRow {
    #[tabled(rename = "PROJECT")]
    name: String,
    #[tabled(rename = "LIFETIME (h)")]
    lifetime: String,
    #[tabled(rename = "SFS")]
    safety_functions: usize,
    #[tabled(rename = "CMPS")]
    components: usize,
    #[tabled(rename = "FMS")]
    failure_modes: usize,
    #[tabled(rename = "LINKS")]
    links: usize,
}

pub fn run(_args: SummaryArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let summary = ProjectSummary::of(&ws.project);

    let row = SummaryRow {
        name: summary.name.clone(),
        lifetime: if summary.configured {
            summary.lifetime.to_string()
        } else {
            "not set".to_string()
        },
        safety_functions: summary.safety_functions,
        components: summary.components,
        failure_modes: summary.failure_modes,
        links: summary.links,
    };

    let format = ws.format(global);
    emit(format, &summary, &[row], &[summary.name.clone()])?;

    if format == OutputFormat::Table {
        let divergences = ws.project.rate_divergences();
        if !divergences.is_empty() {
            println!(
                "\n{} components whose failure modes do not sum to their rate:",
                style(divergences.len()).yellow()
            );
            for (component, sum) in divergences {
                println!(
                    "  {}  rate {} FIT, failure modes {} FIT",
                    style(&component.id).cyan(),
                    format_fit(component.failure_rate),
                    format_fit(sum)
                );
            }
        }
    }
    Ok(())
}
