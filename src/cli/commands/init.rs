//! `fmeda init` command - create a new project snapshot

use console::style;
use miette::Result;

use crate::cli::helpers::parse_lifetime;
use crate::cli::workspace::resolve_path;
use crate::cli::GlobalOpts;
use crate::core::{snapshot, Config, Project};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Project name
    pub name: String,

    /// Mission lifetime in hours (defaults to the configured lifetime)
    #[arg(long, short = 'l', value_parser = parse_lifetime)]
    pub lifetime: Option<f64>,

    /// Overwrite an existing snapshot
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let path = resolve_path(global, &config);

    let name = args.name.trim();
    if name.is_empty() {
        return Err(miette::miette!("Project name must not be empty"));
    }

    if path.exists() && !args.force {
        return Err(miette::miette!(
            help = "use --force to overwrite it",
            "Project snapshot already exists: {}",
            path.display()
        ));
    }

    let lifetime = args
        .lifetime
        .or(config.lifetime.filter(|hours| *hours > 0.0))
        .unwrap_or(0.0);
    let project = Project::new(name).with_lifetime(lifetime);
    snapshot::save(&project, &path)?;

    println!(
        "{} project {} at {}",
        style("Created").green(),
        style(&project.name).cyan(),
        path.display()
    );
    if !project.is_configured() {
        println!(
            "  {} set the mission lifetime with `fmeda lifetime <HOURS>`",
            style("next:").dim()
        );
    }
    Ok(())
}
