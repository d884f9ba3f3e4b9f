//! `fmeda fm` command - Failure mode management
//!
//! Failure modes are addressed by component id and 1-based position.

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::helpers::{parse_coverage, parse_rate, truncate_str};
use crate::cli::output::emit;
use crate::cli::{GlobalOpts, OutputFormat, Workspace};
use crate::core::report::format_fit;
use crate::entities::{Component, FailureMode};

#[derive(Subcommand, Debug)]
pub enum FmCommands {
    /// Add a failure mode to a component
    Add(AddArgs),

    /// List failure modes
    List(ListArgs),

    /// Change a failure mode
    Edit(EditArgs),

    /// Remove a failure mode
    Remove(RemoveArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Component id
    pub component: String,

    /// Failure mode description (e.g. "Short circuit")
    pub description: String,

    /// Failure rate of this mode in FIT
    #[arg(long, short = 'r', value_parser = parse_rate)]
    pub rate: f64,

    /// System-level effect
    #[arg(long, short = 'e', default_value = "")]
    pub effect: String,

    /// Classify as single-point fault
    #[arg(long)]
    pub spf: bool,

    /// SPF safety mechanism
    #[arg(long, default_value = "None", requires = "spf")]
    pub spf_mechanism: String,

    /// SPF diagnostic coverage in percent
    #[arg(long, value_parser = parse_coverage, default_value = "0", requires = "spf")]
    pub spf_coverage: f64,

    /// Classify as multi-point fault
    #[arg(long)]
    pub mpf: bool,

    /// MPF safety mechanism
    #[arg(long, default_value = "None", requires = "mpf")]
    pub mpf_mechanism: String,

    /// MPF diagnostic coverage in percent
    #[arg(long, value_parser = parse_coverage, default_value = "0", requires = "mpf")]
    pub mpf_coverage: f64,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only failure modes of this component
    pub component: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Component id
    pub component: String,

    /// Failure mode number (1-based, as shown by `fmeda fm list`)
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub index: u32,

    /// New description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// New failure rate in FIT
    #[arg(long, short = 'r', value_parser = parse_rate)]
    pub rate: Option<f64>,

    /// New system-level effect
    #[arg(long, short = 'e')]
    pub effect: Option<String>,

    /// Classify as single-point fault
    #[arg(long, overrides_with = "no_spf")]
    pub spf: bool,

    /// Clear the single-point fault classification
    #[arg(long)]
    pub no_spf: bool,

    #[arg(long)]
    pub spf_mechanism: Option<String>,

    #[arg(long, value_parser = parse_coverage)]
    pub spf_coverage: Option<f64>,

    /// Classify as multi-point fault
    #[arg(long, overrides_with = "no_mpf")]
    pub mpf: bool,

    /// Clear the multi-point fault classification
    #[arg(long)]
    pub no_mpf: bool,

    #[arg(long)]
    pub mpf_mechanism: Option<String>,

    #[arg(long, value_parser = parse_coverage)]
    pub mpf_coverage: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Component id
    pub component: String,

    /// Failure mode number (1-based)
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub index: u32,
}

#[derive(Debug, Serialize, Tabled)]
struct FmRow {
    #[tabled(rename = "COMPONENT")]
    component: String,
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "RATE")]
    failure_rate_total: String,
    #[tabled(rename = "EFFECT")]
    system_level_effect: String,
    #[tabled(rename = "SPF")]
    spf: String,
    #[tabled(rename = "MPF")]
    mpf: String,
    #[tabled(rename = "RF")]
    rf: String,
    #[tabled(rename = "MPFL")]
    mpfl: String,
    #[tabled(rename = "MPFD")]
    mpfd: String,
}

#[derive(Debug, Serialize)]
struct FmEntry<'a> {
    component: &'a str,
    index: usize,
    #[serde(flatten)]
    failure_mode: &'a FailureMode,
}

pub fn run(cmd: FmCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        FmCommands::Add(args) => run_add(args, global),
        FmCommands::List(args) => run_list(args, global),
        FmCommands::Edit(args) => run_edit(args, global),
        FmCommands::Remove(args) => run_remove(args, global),
    }
}

fn duplicate_error(component: &Component, description: &str) -> miette::Report {
    miette::miette!(
        help = "failure mode descriptions must be unique per component",
        "Component {} already has a failure mode '{}'",
        component.id,
        description
    )
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let description = args.description.trim();
    if description.is_empty() {
        return Err(miette::miette!("Failure mode description must not be empty"));
    }

    let mut ws = Workspace::open(global)?;
    let component = ws
        .project
        .component_mut(&args.component)
        .ok_or_else(|| miette::miette!("Component not found: {}", args.component))?;

    if component.has_failure_mode(description) {
        return Err(duplicate_error(component, description));
    }

    let mut fm = FailureMode::new(description, args.rate).with_effect(args.effect);
    if args.spf {
        fm = fm.with_spf(args.spf_mechanism, args.spf_coverage);
    }
    if args.mpf {
        fm = fm.with_mpf(args.mpf_mechanism, args.mpf_coverage);
    }
    component.add_failure_mode(fm);

    let id = component.id.clone();
    let index = component.failure_modes.len();
    ws.commit()?;

    println!(
        "Added failure mode {} to {}",
        style(format!("#{}", index)).cyan(),
        style(&id).cyan()
    );
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let project = &ws.project;

    let components: Vec<&Component> = match &args.component {
        Some(id) => vec![project
            .component(id)
            .ok_or_else(|| miette::miette!("Component not found: {}", id))?],
        None => project.components().iter().collect(),
    };

    let entries: Vec<FmEntry> = components
        .iter()
        .flat_map(|&c| {
            c.failure_modes.iter().enumerate().map(move |(i, fm)| FmEntry {
                component: c.id.as_str(),
                index: i + 1,
                failure_mode: fm,
            })
        })
        .collect();

    let format = ws.format(global);
    if entries.is_empty() && format == OutputFormat::Table {
        println!("No failure modes found.");
        return Ok(());
    }

    let table = format == OutputFormat::Table;
    let rows: Vec<FmRow> = entries
        .iter()
        .map(|e| {
            let fm = e.failure_mode;
            let text = |s: &str, width| {
                if table {
                    truncate_str(s, width)
                } else {
                    s.to_string()
                }
            };
            FmRow {
                component: e.component.to_string(),
                index: e.index,
                description: text(&fm.description, 28),
                failure_rate_total: format_fit(fm.failure_rate_total),
                system_level_effect: text(&fm.system_level_effect, 24),
                spf: mechanism_cell(fm.is_spf, &fm.spf_mechanism.name, fm.spf_mechanism.coverage),
                mpf: mechanism_cell(fm.is_mpf, &fm.mpf_mechanism.name, fm.mpf_mechanism.coverage),
                rf: format_fit(fm.rf()),
                mpfl: format_fit(fm.mpfl()),
                mpfd: format_fit(fm.mpfd()),
            }
        })
        .collect();
    let ids: Vec<String> = entries
        .iter()
        .map(|e| format!("{}:{}", e.component, e.index))
        .collect();

    emit(format, &entries, &rows, &ids)?;
    if table {
        println!("\n{} failure modes", entries.len());
    }
    Ok(())
}

fn mechanism_cell(flag: bool, name: &str, coverage: f64) -> String {
    if flag {
        format!("{} {}%", name, coverage)
    } else {
        "-".to_string()
    }
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;
    let component = ws
        .project
        .component_mut(&args.component)
        .ok_or_else(|| miette::miette!("Component not found: {}", args.component))?;

    let position = args.index as usize - 1;
    let count = component.failure_modes.len();
    if position >= count {
        return Err(miette::miette!(
            "Component {} has {} failure modes, no #{}",
            component.id,
            count,
            args.index
        ));
    }

    if let Some(description) = &args.description {
        let description = description.trim();
        if description.is_empty() {
            return Err(miette::miette!("Failure mode description must not be empty"));
        }
        let taken = component
            .failure_modes
            .iter()
            .enumerate()
            .any(|(i, fm)| i != position && fm.description == description);
        if taken {
            return Err(duplicate_error(component, description));
        }
    }

    let fm = &mut component.failure_modes[position];
    if let Some(description) = args.description {
        fm.description = description.trim().to_string();
    }
    if let Some(rate) = args.rate {
        fm.failure_rate_total = rate;
    }
    if let Some(effect) = args.effect {
        fm.system_level_effect = effect;
    }
    if args.spf {
        fm.is_spf = true;
    } else if args.no_spf {
        fm.is_spf = false;
    }
    if args.mpf {
        fm.is_mpf = true;
    } else if args.no_mpf {
        fm.is_mpf = false;
    }
    if args.spf_mechanism.is_some() || args.spf_coverage.is_some() {
        let name = args
            .spf_mechanism
            .unwrap_or_else(|| fm.spf_mechanism.name.clone());
        let coverage = args.spf_coverage.unwrap_or(fm.spf_mechanism.coverage);
        fm.set_spf_mechanism(name, coverage);
    }
    if args.mpf_mechanism.is_some() || args.mpf_coverage.is_some() {
        let name = args
            .mpf_mechanism
            .unwrap_or_else(|| fm.mpf_mechanism.name.clone());
        let coverage = args.mpf_coverage.unwrap_or(fm.mpf_mechanism.coverage);
        fm.set_mpf_mechanism(name, coverage);
    }
    // Rate and flag changes are not covered by the mechanism setters
    fm.recompute();

    let id = component.id.clone();
    ws.commit()?;

    println!(
        "Updated failure mode {} of {}",
        style(format!("#{}", args.index)).cyan(),
        style(&id).cyan()
    );
    Ok(())
}

fn run_remove(args: RemoveArgs, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;
    let component = ws
        .project
        .component_mut(&args.component)
        .ok_or_else(|| miette::miette!("Component not found: {}", args.component))?;

    let removed = component
        .remove_failure_mode(args.index as usize - 1)
        .ok_or_else(|| {
            miette::miette!(
                "Component {} has no failure mode #{}",
                args.component,
                args.index
            )
        })?;
    let id = component.id.clone();
    ws.commit()?;

    println!(
        "Removed failure mode '{}' from {}",
        removed.description,
        style(&id).cyan()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mechanism_cell() {
        assert_eq!(mechanism_cell(true, "ECC", 99.0), "ECC 99%");
        assert_eq!(mechanism_cell(false, "ECC", 99.0), "-");
    }
}
