//! `fmeda link` / `fmeda unlink` commands - safety function to component links

use console::style;
use miette::Result;

use crate::cli::{GlobalOpts, Workspace};

#[derive(clap::Args, Debug)]
pub struct LinkArgs {
    /// Safety function id
    pub sf: String,

    /// Component ids
    #[arg(required = true, num_args = 1..)]
    pub components: Vec<String>,
}

pub fn run_link(args: LinkArgs, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;

    let mut added = 0;
    for component in &args.components {
        if ws.project.link(&args.sf, component)? {
            added += 1;
        } else {
            println!(
                "{} {} already linked to {}",
                style("!").yellow(),
                component,
                args.sf
            );
        }
    }
    ws.commit()?;

    println!(
        "Linked {} components to {}",
        added,
        style(&args.sf).cyan()
    );
    Ok(())
}

pub fn run_unlink(args: LinkArgs, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;

    let mut removed = 0;
    for component in &args.components {
        if ws.project.unlink(&args.sf, component)? {
            removed += 1;
        } else {
            println!(
                "{} {} was not linked to {}",
                style("!").yellow(),
                component,
                args.sf
            );
        }
    }
    ws.commit()?;

    println!(
        "Unlinked {} components from {}",
        removed,
        style(&args.sf).cyan()
    );
    Ok(())
}
