//! The project snapshot a command operates on

use console::style;
use miette::Result;
use std::path::PathBuf;
use tracing::warn;

use crate::cli::output::effective_format;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{snapshot, Config, Project};

/// A loaded project together with where it came from
#[derive(Debug)]
pub struct Workspace {
    pub path: PathBuf,
    pub project: Project,
    pub config: Config,
}

/// Snapshot path from the `--project` flag, falling back to config
pub fn resolve_path(global: &GlobalOpts, config: &Config) -> PathBuf {
    global
        .project
        .clone()
        .unwrap_or_else(|| config.project_path())
}

impl Workspace {
    /// Load config and the snapshot it points at
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let config = Config::load();
        let path = resolve_path(global, &config);

        if !path.exists() {
            return Err(miette::miette!(
                code = "fmeda::cli::no_project",
                help = "run `fmeda init <NAME>` to create one, or pass --project <FILE>",
                "No project snapshot at {}",
                path.display()
            ));
        }

        let project = snapshot::load(&path)?;
        Ok(Self {
            path,
            project,
            config,
        })
    }

    /// Write the project back to its snapshot
    pub fn save(&self) -> Result<()> {
        snapshot::save(&self.project, &self.path)?;
        Ok(())
    }

    /// Re-evaluate and save; used after every mutation
    pub fn commit(&mut self) -> Result<()> {
        self.project.evaluate_all();
        self.save()
    }

    pub fn format(&self, global: &GlobalOpts) -> OutputFormat {
        effective_format(global.output, &self.config)
    }

    /// Print the lifetime hint for projects that cannot produce MPHF yet
    pub fn warn_if_unconfigured(&self) {
        if !self.project.is_configured() {
            warn!("project lifetime is not set; MPHF ignores latent faults");
            eprintln!(
                "{} lifetime not set, run `fmeda lifetime <HOURS>`",
                style("note:").yellow()
            );
        }
    }
}
