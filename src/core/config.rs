//! Layered configuration
//!
//! Sources, lowest precedence first:
//! 1. user config: `<config dir>/fmeda/config.yaml`
//! 2. working directory: `.fmeda.yaml`
//! 3. environment: `FMEDA_PROJECT`, `FMEDA_LIFETIME`
//!
//! Command-line flags override all of these.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::report::DEFAULT_MPHF_SCI_THRESHOLD;

/// File name of the working-directory config
pub const LOCAL_CONFIG: &str = ".fmeda.yaml";

/// Snapshot used when nothing else names one
pub const DEFAULT_PROJECT_FILE: &str = "fmeda-project.csv";

#[derive(Debug, Error, miette::Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config {}", path.display())]
    #[diagnostic(code(fmeda::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {message}", path.display())]
    #[diagnostic(code(fmeda::config::parse))]
    Parse { path: PathBuf, message: String },
}

/// Settings read from a single file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub project: Option<PathBuf>,
    pub lifetime: Option<f64>,
    pub format: Option<String>,
    pub mphf_sci_threshold: Option<f64>,
}

/// Effective configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub project: Option<PathBuf>,
    pub lifetime: Option<f64>,
    pub format: Option<String>,
    pub mphf_sci_threshold: Option<f64>,
}

impl Config {
    /// Load all layers; unreadable layers are logged and ignored
    pub fn load() -> Self {
        let mut config = Config::default();

        let mut files = Vec::new();
        if let Some(dirs) = directories::ProjectDirs::from("", "", "fmeda") {
            files.push(dirs.config_dir().join("config.yaml"));
        }
        files.push(PathBuf::from(LOCAL_CONFIG));

        for path in files {
            if !path.exists() {
                continue;
            }
            match Self::try_load_file(&path) {
                Ok(layer) => {
                    debug!(path = %path.display(), "loaded config layer");
                    config.merge(layer);
                }
                Err(e) => warn!("{}", e),
            }
        }

        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Parse one config file
    pub fn try_load_file(path: &Path) -> Result<ConfigFile, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(ConfigFile::default());
        }
        serde_yml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Overlay a file layer; keys it sets win
    pub fn merge(&mut self, layer: ConfigFile) {
        if layer.project.is_some() {
            self.project = layer.project;
        }
        if layer.lifetime.is_some() {
            self.lifetime = layer.lifetime;
        }
        if layer.format.is_some() {
            self.format = layer.format;
        }
        if layer.mphf_sci_threshold.is_some() {
            self.mphf_sci_threshold = layer.mphf_sci_threshold;
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(project) = var("FMEDA_PROJECT").filter(|v| !v.is_empty()) {
            self.project = Some(PathBuf::from(project));
        }
        if let Some(raw) = var("FMEDA_LIFETIME") {
            match raw.trim().parse::<f64>() {
                Ok(hours) => self.lifetime = Some(hours),
                Err(_) => warn!(value = %raw, "ignoring non-numeric FMEDA_LIFETIME"),
            }
        }
    }

    /// Snapshot path to use when no flag is given
    pub fn project_path(&self) -> PathBuf {
        self.project
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT_FILE))
    }

    pub fn mphf_sci_threshold(&self) -> f64 {
        self.mphf_sci_threshold
            .unwrap_or(DEFAULT_MPHF_SCI_THRESHOLD)
    }
}
