//! `fmeda cmp` command - Component (bill of materials) management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;
use tabled::Tabled;
use tracing::warn;

use crate::cli::helpers::{parse_rate, split_list, truncate_str};
use crate::cli::output::{self, emit};
use crate::cli::{GlobalOpts, OutputFormat, Workspace};
use crate::core::report::format_fit;
use crate::core::{catalog, import_bom};
use crate::entities::Component;

#[derive(Subcommand, Debug)]
pub enum CmpCommands {
    /// Add a component
    Add(AddArgs),

    /// List components
    List(ListArgs),

    /// Show a component with its failure modes
    Show(ShowArgs),

    /// Change a component's type or failure rate
    Edit(EditArgs),

    /// Remove a component and its links
    Remove(RemoveArgs),

    /// Import a bill of materials from CSV
    Import(ImportArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Identifier, unique within the project
    pub id: String,

    /// Component type (see `fmeda catalog`)
    #[arg(long = "type", short = 't', default_value = "Other")]
    pub component_type: String,

    /// Failure rate in FIT
    #[arg(long, short = 'r', value_parser = parse_rate, default_value = "0")]
    pub rate: f64,

    /// Safety functions to link, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub sf: Vec<String>,

    /// Generate failure modes from the catalog distribution of the type
    #[arg(long, short = 'a')]
    pub auto_populate: bool,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only components linked to this safety function
    #[arg(long)]
    pub sf: Option<String>,

    /// Only components of this type (case-insensitive)
    #[arg(long = "type", short = 't')]
    pub component_type: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Component id
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Component id
    pub id: String,

    /// New component type
    #[arg(long = "type", short = 't')]
    pub component_type: Option<String>,

    /// New failure rate in FIT
    #[arg(long, short = 'r', value_parser = parse_rate)]
    pub rate: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Component id
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// CSV file with columns id, type, failure_rate and optionally related_sf_ids
    pub file: PathBuf,
}

#[derive(Debug, Serialize, Tabled)]
struct CmpRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "TYPE")]
    component_type: String,
    #[tabled(rename = "RATE (FIT)")]
    failure_rate: String,
    #[tabled(rename = "FMS")]
    failure_modes: usize,
    #[tabled(rename = "SAFETY FUNCTIONS")]
    safety_functions: String,
}

#[derive(Debug, Serialize, Tabled)]
struct FmRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "RATE")]
    rate: String,
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
struct CmpDetail<'a> {
    #[serde(flatten)]
    component: &'a Component,
    safety_functions: Vec<&'a str>,
}

pub fn run(cmd: CmpCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CmpCommands::Add(args) => run_add(args, global),
        CmpCommands::List(args) => run_list(args, global),
        CmpCommands::Show(args) => run_show(args, global),
        CmpCommands::Edit(args) => run_edit(args, global),
        CmpCommands::Remove(args) => run_remove(args, global),
        CmpCommands::Import(args) => run_import(args, global),
    }
}

/// Catalog spelling of a type when known, the trimmed input otherwise
fn normalize_type(raw: &str) -> String {
    catalog::canonical_type(raw)
        .map(str::to_string)
        .unwrap_or_else(|| raw.trim().to_string())
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;

    let sf_ids: Vec<String> = args
        .sf
        .iter()
        .flat_map(|s| split_list(s))
        .collect();
    if let Some(missing) = sf_ids
        .iter()
        .find(|id| ws.project.safety_function(id).is_none())
    {
        return Err(miette::miette!("Safety function not found: {}", missing));
    }

    let mut component = Component::new(
        args.id.as_str(),
        normalize_type(&args.component_type),
        args.rate,
    );

    let mut generated = 0;
    if args.auto_populate {
        match catalog::lookup(&component.component_type) {
            Some(entries) => generated = component.populate_from_catalog(entries),
            None => warn!(
                component_type = %component.component_type,
                "no catalog distribution for type"
            ),
        }
        if generated == 0 {
            eprintln!(
                "{} no failure modes generated (needs a catalog type and a rate > 0)",
                style("!").yellow()
            );
        }
    }

    let id = component.id.clone();
    ws.project.add_component(component)?;
    for sf_id in &sf_ids {
        ws.project.link(sf_id, id.as_str())?;
    }
    ws.commit()?;

    match ws.format(global) {
        OutputFormat::Id => println!("{}", id),
        _ => {
            println!("Created component {}", style(&id).cyan());
            if generated > 0 {
                println!("  {} failure modes from catalog", generated);
            }
            if !sf_ids.is_empty() {
                println!("  linked to {}", sf_ids.join(", "));
            }
        }
    }
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let project = &ws.project;

    if let Some(sf_id) = &args.sf {
        if project.safety_function(sf_id).is_none() {
            return Err(miette::miette!("Safety function not found: {}", sf_id));
        }
    }

    let filtered: Vec<&Component> = project
        .components()
        .iter()
        .filter(|c| match &args.sf {
            Some(sf_id) => project.is_linked(sf_id, c.id.as_str()),
            None => true,
        })
        .filter(|c| match &args.component_type {
            Some(t) => c.component_type.eq_ignore_ascii_case(t.trim()),
            None => true,
        })
        .collect();

    let format = ws.format(global);
    if filtered.is_empty() && format == OutputFormat::Table {
        println!("No components found.");
        return Ok(());
    }

    let rows: Vec<CmpRow> = filtered
        .iter()
        .map(|c| {
            let sfs: Vec<&str> = project
                .linked_safety_functions(c.id.as_str())
                .map(|sf| sf.id.as_str())
                .collect();
            CmpRow {
                id: c.id.to_string(),
                component_type: c.component_type.clone(),
                failure_rate: format_fit(c.failure_rate),
                failure_modes: c.failure_modes.len(),
                safety_functions: if format == OutputFormat::Table {
                    truncate_str(&sfs.join(", "), 30)
                } else {
                    sfs.join(",")
                },
            }
        })
        .collect();
    let ids: Vec<String> = filtered.iter().map(|c| c.id.to_string()).collect();

    emit(format, &filtered, &rows, &ids)?;
    if format == OutputFormat::Table {
        println!("\n{} components", filtered.len());
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let project = &ws.project;

    let component = project
        .component(&args.id)
        .ok_or_else(|| miette::miette!("Component not found: {}", args.id))?;
    let safety_functions: Vec<&str> = project
        .linked_safety_functions(component.id.as_str())
        .map(|sf| sf.id.as_str())
        .collect();

    let format = ws.format(global);
    match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let detail = CmpDetail {
                component,
                safety_functions,
            };
            if format == OutputFormat::Json {
                output::print_json(&detail)?;
            } else {
                output::print_yaml(&detail)?;
            }
        }
        OutputFormat::Id => println!("{}", component.id),
        _ => {
            println!(
                "{} {}",
                style(&component.id).cyan(),
                style(&component.component_type).bold()
            );
            println!(
                "  {} {} FIT",
                style("Failure rate:").dim(),
                format_fit(component.failure_rate)
            );
            println!(
                "  {} {}",
                style("Safety functions:").dim(),
                if safety_functions.is_empty() {
                    "-".to_string()
                } else {
                    safety_functions.join(", ")
                }
            );

            if component.failure_modes.is_empty() {
                println!("  {} none", style("Failure modes:").dim());
                return Ok(());
            }

            let rows = failure_mode_rows(component);
            output::print_table(&rows);

            let sum = component.failure_mode_rate_sum();
            if let Some((_, sum)) = project
                .rate_divergences()
                .into_iter()
                .find(|(c, _)| c.id == component.id)
            {
                println!(
                    "{} failure modes sum to {} FIT, component rate is {} FIT",
                    style("!").yellow(),
                    format_fit(sum),
                    format_fit(component.failure_rate)
                );
            } else {
                println!("\nFailure modes sum to {} FIT", format_fit(sum));
            }
        }
    }
    Ok(())
}

fn failure_mode_rows(component: &Component) -> Vec<FmRow> {
    component
        .failure_modes
        .iter()
        .enumerate()
        .map(|(i, fm)| FmRow {
            index: i + 1,
            description: truncate_str(&fm.description, 30),
            rate: format_fit(fm.failure_rate_total),
            spf: if fm.is_spf {
                format!("{} {}%", fm.spf_mechanism.name, fm.spf_mechanism.coverage)
            } else {
                "-".to_string()
            },
            mpf: if fm.is_mpf {
                format!("{} {}%", fm.mpf_mechanism.name, fm.mpf_mechanism.coverage)
            } else {
                "-".to_string()
            },
            rf: format_fit(fm.rf()),
            mpfl: format_fit(fm.mpfl()),
            mpfd: format_fit(fm.mpfd()),
        })
        .collect()
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    if args.component_type.is_none() && args.rate.is_none() {
        return Err(miette::miette!(
            help = "pass --type or --rate",
            "Nothing to change"
        ));
    }

    let mut ws = Workspace::open(global)?;
    let component = ws
        .project
        .component_mut(&args.id)
        .ok_or_else(|| miette::miette!("Component not found: {}", args.id))?;

    if let Some(t) = &args.component_type {
        component.component_type = normalize_type(t);
    }
    if let Some(rate) = args.rate {
        component.failure_rate = rate;
    }
    let id = component.id.clone();
    ws.commit()?;

    println!("Updated component {}", style(&id).cyan());
    for (c, sum) in ws.project.rate_divergences() {
        if c.id == id {
            println!(
                "{} failure modes sum to {} FIT; they were not rescaled",
                style("!").yellow(),
                format_fit(sum)
            );
        }
    }
    Ok(())
}

fn run_remove(args: RemoveArgs, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;
    let links = ws.project.linked_safety_functions(&args.id).count();
    let removed = ws.project.remove_component(&args.id)?;
    ws.commit()?;

    println!(
        "Removed component {} ({} failure modes, {} links)",
        style(&removed.id).cyan(),
        removed.failure_modes.len(),
        links
    );
    Ok(())
}

fn run_import(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;

    let file = File::open(&args.file)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to open {}", args.file.display()))?;
    let stats = import_bom(&mut ws.project, file)?;
    ws.commit()?;

    println!(
        "{} {} components from {} ({} links)",
        style("Imported").green(),
        stats.added,
        args.file.display(),
        stats.linked
    );
    if !stats.skipped.is_empty() {
        let skipped: Vec<String> = stats.skipped.iter().map(|id| id.to_string()).collect();
        println!(
            "{} skipped existing ids: {}",
            style("!").yellow(),
            skipped.join(", ")
        );
    }
    Ok(())
}
