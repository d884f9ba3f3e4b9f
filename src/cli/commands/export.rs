//! `fmeda export` command - write the snapshot to another file

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::{GlobalOpts, Workspace};
use crate::core::snapshot;

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Destination CSV file
    pub file: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;

    if args.file.exists() && !args.force {
        return Err(miette::miette!(
            help = "use --force to overwrite it",
            "File already exists: {}",
            args.file.display()
        ));
    }

    snapshot::save(&ws.project, &args.file)?;
    println!(
        "{} {} to {}",
        style("Exported").green(),
        style(&ws.project.name).cyan(),
        args.file.display()
    );
    Ok(())
}
