//! `fmeda lifetime` command - show or set the mission lifetime

use console::style;
use miette::Result;

use crate::cli::helpers::parse_lifetime;
use crate::cli::{GlobalOpts, OutputFormat, Workspace};

#[derive(clap::Args, Debug)]
pub struct LifetimeArgs {
    /// New lifetime in hours; omit to show the current one
    #[arg(value_parser = parse_lifetime)]
    pub hours: Option<f64>,
}

pub fn run(args: LifetimeArgs, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;

    let Some(hours) = args.hours else {
        let lifetime = ws.project.lifetime();
        match ws.format(global) {
            OutputFormat::Json => crate::cli::output::print_json(&lifetime)?,
            OutputFormat::Yaml => crate::cli::output::print_yaml(&lifetime)?,
            _ if ws.project.is_configured() => println!("{}", lifetime),
            _ => println!("{}", style("not set").yellow()),
        }
        return Ok(());
    };

    let previous = ws.project.lifetime();
    ws.project.set_lifetime(hours);
    ws.commit()?;

    if previous > 0.0 {
        println!(
            "{} lifetime {} h -> {} h",
            style("Updated").green(),
            previous,
            style(hours).cyan()
        );
    } else {
        println!("{} lifetime to {} h", style("Set").green(), style(hours).cyan());
    }
    Ok(())
}
