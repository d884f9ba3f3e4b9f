//! `fmeda eval` command - evaluate safety functions and report metrics

use console::style;
use miette::Result;
use serde::Serialize;
use tabled::Tabled;
use tracing::warn;

use crate::cli::output::{self, emit};
use crate::cli::{GlobalOpts, OutputFormat, Workspace};
use crate::core::report::{format_fit, format_mphf};
use crate::core::{ComplianceReport, MetricsRow};

#[derive(clap::Args, Debug)]
pub struct EvalArgs {
    /// Check each safety function against its target level; fail on violations
    #[arg(long)]
    pub check: bool,

    /// Only this safety function
    #[arg(long)]
    pub sf: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct EvalRow {
    #[tabled(rename = "SF")]
    sf_id: String,
    #[tabled(rename = "TARGET")]
    target: String,
    #[tabled(rename = "SR (FIT)")]
    safety_related: String,
    #[tabled(rename = "RF")]
    rf: String,
    #[tabled(rename = "MPFL")]
    mpfl: String,
    #[tabled(rename = "MPFD")]
    mpfd: String,
    #[tabled(rename = "MPHF (/h)")]
    mphf: String,
    #[tabled(rename = "SPFM %")]
    spfm: String,
    #[tabled(rename = "LFM %")]
    lfm: String,
}

#[derive(Debug, Tabled)]
struct CheckRow {
    #[tabled(rename = "SF")]
    sf_id: String,
    #[tabled(rename = "LEVEL")]
    level: String,
    #[tabled(rename = "SPFM")]
    spfm: String,
    #[tabled(rename = "LFM")]
    lfm: String,
    #[tabled(rename = "MPHF")]
    mphf: String,
    #[tabled(rename = "RESULT")]
    result: String,
}

pub fn run(args: EvalArgs, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;
    ws.project.recalculate();
    ws.warn_if_unconfigured();

    for (component, sum) in ws.project.rate_divergences() {
        warn!(
            component = %component.id,
            failure_rate = component.failure_rate,
            failure_mode_sum = sum,
            "component rate differs from the sum of its failure modes"
        );
    }

    let project = &ws.project;
    if let Some(id) = &args.sf {
        if project.safety_function(id).is_none() {
            return Err(miette::miette!("Safety function not found: {}", id));
        }
    }

    let selected: Vec<_> = project
        .safety_functions()
        .iter()
        .filter(|sf| match &args.sf {
            Some(id) => project.safety_function(id).is_some_and(|wanted| wanted.id == sf.id),
            None => true,
        })
        .collect();

    let format = ws.format(global);
    if selected.is_empty() && format == OutputFormat::Table {
        println!("No safety functions found.");
        return Ok(());
    }

    let threshold = ws.config.mphf_sci_threshold();
    let metrics: Vec<MetricsRow> = selected
        .iter()
        .map(|sf| MetricsRow::new(sf, args.check))
        .collect();
    let rows: Vec<EvalRow> = metrics
        .iter()
        .map(|m| EvalRow {
            sf_id: m.sf_id.clone(),
            target: m.target.clone().unwrap_or_default(),
            safety_related: format_fit(m.safety_related_fit),
            rf: format_fit(m.rf_fit),
            mpfl: format_fit(m.mpfl_fit),
            mpfd: format_fit(m.mpfd_fit),
            mphf: format_mphf(m.mphf, threshold),
            spfm: format!("{:.2}", m.spfm_percent),
            lfm: format!("{:.2}", m.lfm_percent),
        })
        .collect();
    let ids: Vec<String> = metrics.iter().map(|m| m.sf_id.clone()).collect();

    emit(format, &metrics, &rows, &ids)?;

    if !args.check {
        return Ok(());
    }

    let reports: Vec<(&str, Option<&ComplianceReport>)> = metrics
        .iter()
        .map(|m| (m.sf_id.as_str(), m.compliance.as_ref()))
        .collect();
    let violations: Vec<&str> = reports
        .iter()
        .filter(|(_, report)| report.is_some_and(|r| !r.passes()))
        .map(|(id, _)| *id)
        .collect();

    if format == OutputFormat::Table {
        let check_rows: Vec<CheckRow> = reports
            .iter()
            .map(|(id, report)| match report {
                Some(r) => CheckRow {
                    sf_id: id.to_string(),
                    level: r.level.to_string(),
                    spfm: r.spfm.to_string(),
                    lfm: r.lfm.to_string(),
                    mphf: r.mphf.to_string(),
                    result: if r.passes() { "pass" } else { "FAIL" }.to_string(),
                },
                None => CheckRow {
                    sf_id: id.to_string(),
                    level: "-".to_string(),
                    spfm: "-".to_string(),
                    lfm: "-".to_string(),
                    mphf: "-".to_string(),
                    result: "not assessed".to_string(),
                },
            })
            .collect();
        println!();
        output::print_table(&check_rows);
    }

    if violations.is_empty() {
        if format == OutputFormat::Table {
            println!("\n{} all assessed safety functions meet their targets", style("✓").green());
        }
        Ok(())
    } else {
        Err(miette::miette!(
            code = "fmeda::eval::violation",
            help = "raise diagnostic coverage or lower residual failure rates",
            "{} safety function(s) miss their targets: {}",
            violations.len(),
            violations.join(", ")
        ))
    }
}
