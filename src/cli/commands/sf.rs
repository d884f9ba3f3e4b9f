//! `fmeda sf` command - Safety function management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;
use tabled::Tabled;

use crate::cli::helpers::truncate_str;
use crate::cli::output::{self, emit};
use crate::cli::{GlobalOpts, OutputFormat, Workspace};
use crate::core::report::{format_fit, format_mphf, format_percent};
use crate::core::{import_safety_functions, ComplianceReport};
use crate::entities::{Asil, SafetyFunction, TargetLevel};

#[derive(Subcommand, Debug)]
pub enum SfCommands {
    /// Add a safety function
    Add(AddArgs),

    /// List safety functions
    List(ListArgs),

    /// Show a safety function with its linked components and metrics
    Show(ShowArgs),

    /// Change a safety function's description or target level
    Edit(EditArgs),

    /// Remove a safety function and its links
    Remove(RemoveArgs),

    /// Import safety functions from a CSV list
    Import(ImportArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Identifier, unique within the project
    pub id: String,

    /// What the function protects against
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,

    /// Target integrity level (QM, A, B, C, D)
    #[arg(long, short = 't')]
    pub target: Option<Asil>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only safety functions with this target level
    #[arg(long, short = 't')]
    pub target: Option<Asil>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Safety function id
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Safety function id
    pub id: String,

    /// New description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// New target integrity level
    #[arg(long, short = 't', conflicts_with = "clear_target")]
    pub target: Option<Asil>,

    /// Remove the target integrity level
    #[arg(long)]
    pub clear_target: bool,
}

#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Safety function id
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// CSV file with columns id, description, target_integrity_level
    pub file: PathBuf,
}

/// Flat row for table and CSV output
#[derive(Debug, Serialize, Tabled)]
struct SfRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "TARGET")]
    target: String,
    #[tabled(rename = "CMPS")]
    components: usize,
    #[tabled(rename = "SPFM %")]
    spfm: String,
    #[tabled(rename = "LFM %")]
    lfm: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
}

#[derive(Debug, Serialize)]
struct SfDetail<'a> {
    #[serde(flatten)]
    safety_function: &'a SafetyFunction,
    components: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    compliance: Option<ComplianceReport>,
}

pub fn run(cmd: SfCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        SfCommands::Add(args) => run_add(args, global),
        SfCommands::List(args) => run_list(args, global),
        SfCommands::Show(args) => run_show(args, global),
        SfCommands::Edit(args) => run_edit(args, global),
        SfCommands::Remove(args) => run_remove(args, global),
        SfCommands::Import(args) => run_import(args, global),
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;

    let mut sf = SafetyFunction::new(args.id.as_str()).with_description(args.description);
    if let Some(level) = args.target {
        sf = sf.with_target(level);
    }
    let id = sf.id.clone();
    ws.project.add_safety_function(sf)?;
    ws.commit()?;

    match ws.format(global) {
        OutputFormat::Id => println!("{}", id),
        _ => println!("Created safety function {}", style(&id).cyan()),
    }
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let project = &ws.project;

    let filtered: Vec<&SafetyFunction> = project
        .safety_functions()
        .iter()
        .filter(|sf| {
            args.target.is_none()
                || sf.target_integrity_level.as_ref().and_then(TargetLevel::asil) == args.target
        })
        .collect();

    let format = ws.format(global);
    if filtered.is_empty() && matches!(format, OutputFormat::Table) {
        println!("No safety functions found.");
        return Ok(());
    }

    let rows: Vec<SfRow> = filtered
        .iter()
        .map(|sf| SfRow {
            id: sf.id.to_string(),
            target: sf
                .target_integrity_level
                .as_ref()
                .map(|l| l.to_string())
                .unwrap_or_default(),
            components: project.linked_components(sf.id.as_str()).count(),
            spfm: format_percent(sf.metrics.spfm),
            lfm: format_percent(sf.metrics.lfm),
            description: if format == OutputFormat::Table {
                truncate_str(&sf.description, 40)
            } else {
                sf.description.clone()
            },
        })
        .collect();
    let ids: Vec<String> = filtered.iter().map(|sf| sf.id.to_string()).collect();

    emit(format, &filtered, &rows, &ids)?;
    if format == OutputFormat::Table {
        println!("\n{} safety functions", filtered.len());
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let project = &ws.project;

    let sf = project
        .safety_function(&args.id)
        .ok_or_else(|| miette::miette!("Safety function not found: {}", args.id))?;
    let components: Vec<&str> = project
        .linked_components(sf.id.as_str())
        .map(|c| c.id.as_str())
        .collect();
    let compliance = ComplianceReport::for_safety_function(sf);

    let format = ws.format(global);
    match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let detail = SfDetail {
                safety_function: sf,
                components,
                compliance,
            };
            if format == OutputFormat::Json {
                output::print_json(&detail)?;
            } else {
                output::print_yaml(&detail)?;
            }
        }
        OutputFormat::Id => println!("{}", sf.id),
        _ => {
            let m = &sf.metrics;
            let threshold = ws.config.mphf_sci_threshold();

            println!("{} {}", style(&sf.id).cyan(), style(&sf.description).bold());
            println!(
                "  {} {}",
                style("Target:").dim(),
                sf.target_integrity_level
                    .as_ref()
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );

            println!("  {}", style("Components:").dim());
            if components.is_empty() {
                println!("    (none)");
            }
            for id in &components {
                println!("    {}", id);
            }

            println!("  {}", style("Metrics:").dim());
            println!("    Safety-related  {} FIT", format_fit(m.safety_related));
            println!("    RF              {} FIT", format_fit(m.rf));
            println!("    MPFL            {} FIT", format_fit(m.mpfl));
            println!("    MPFD            {} FIT", format_fit(m.mpfd));
            println!("    MPHF            {} /h", format_mphf(m.mphf, threshold));
            println!("    SPFM            {} %", format_percent(m.spfm));
            println!("    LFM             {} %", format_percent(m.lfm));

            if let Some(report) = compliance {
                let verdict = if report.passes() {
                    style("meets").green()
                } else {
                    style("violates").red()
                };
                println!(
                    "  {} {} {} (SPFM {}, LFM {}, MPHF {})",
                    style("Compliance:").dim(),
                    verdict,
                    report.level,
                    report.spfm,
                    report.lfm,
                    report.mphf
                );
            }
        }
    }
    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    if args.description.is_none() && args.target.is_none() && !args.clear_target {
        return Err(miette::miette!(
            help = "pass --description, --target or --clear-target",
            "Nothing to change"
        ));
    }

    let mut ws = Workspace::open(global)?;
    let sf = ws
        .project
        .safety_function_mut(&args.id)
        .ok_or_else(|| miette::miette!("Safety function not found: {}", args.id))?;

    if let Some(description) = args.description {
        sf.description = description;
    }
    if args.clear_target {
        sf.target_integrity_level = None;
    } else if let Some(level) = args.target {
        sf.target_integrity_level = Some(level.into());
    }
    let id = sf.id.clone();
    ws.commit()?;

    println!("Updated safety function {}", style(&id).cyan());
    Ok(())
}

fn run_remove(args: RemoveArgs, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;
    let links = ws.project.linked_components(&args.id).count();
    let removed = ws.project.remove_safety_function(&args.id)?;
    ws.commit()?;

    println!(
        "Removed safety function {} ({} links)",
        style(&removed.id).cyan(),
        links
    );
    Ok(())
}

fn run_import(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;

    let file = File::open(&args.file)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to open {}", args.file.display()))?;
    let stats = import_safety_functions(&mut ws.project, file)?;
    ws.commit()?;

    println!(
        "{} {} safety functions from {}",
        style("Imported").green(),
        stats.added,
        args.file.display()
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
