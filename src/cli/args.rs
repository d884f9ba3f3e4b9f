//! Command-line argument definitions

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    catalog::CatalogArgs, cmp::CmpCommands, completions::CompletionsArgs, eval::EvalArgs,
    export::ExportArgs, fm::FmCommands, init::InitArgs, lifetime::LifetimeArgs, link::LinkArgs,
    sf::SfCommands, summary::SummaryArgs,
};

/// FMEDA Toolkit - compute SPFM, LFM and MPHF from component failure-mode data
#[derive(Parser, Debug)]
#[command(name = "fmeda", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Project snapshot file (defaults to config, then fmeda-project.csv)
    #[arg(long, short = 'p', global = true, env = "FMEDA_PROJECT")]
    pub project: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub output: OutputFormat,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Output format for list and report commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table unless the config says otherwise
    Auto,
    Table,
    Json,
    Yaml,
    Csv,
    /// Identifiers only, one per line
    Id,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <OutputFormat as ValueEnum>::from_str(s, true)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new project snapshot
    Init(InitArgs),

    /// Show or set the mission lifetime in hours
    Lifetime(LifetimeArgs),

    /// Safety function management
    #[command(subcommand)]
    Sf(SfCommands),

    /// Component (bill of materials) management
    #[command(subcommand)]
    Cmp(CmpCommands),

    /// Failure mode management
    #[command(subcommand)]
    Fm(FmCommands),

    /// Link components to a safety function
    Link(LinkArgs),

    /// Remove links between components and a safety function
    Unlink(LinkArgs),

    /// Evaluate all safety functions and print their metrics
    Eval(EvalArgs),

    /// Show project totals
    Summary(SummaryArgs),

    /// Show predefined failure-mode distributions
    Catalog(CatalogArgs),

    /// Write the project snapshot to another file
    Export(ExportArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
