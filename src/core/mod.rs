//! Core module - the FMEDA engine and its supporting services

pub mod catalog;
pub mod compliance;
pub mod config;
pub mod identity;
pub mod import;
pub mod metrics;
pub mod project;
pub mod report;
pub mod snapshot;

pub use compliance::{ComplianceReport, MetricVerdict};
pub use config::{Config, ConfigError};
pub use identity::{normalize_id, IdParseError, ItemId};
pub use import::{import_bom, import_safety_functions, ImportError, ImportStats};
pub use metrics::{FaultRates, SafetyMetrics, FIT_HOURS};
pub use project::{Link, Project, ProjectError};
pub use report::{format_mphf, MetricsRow, ProjectSummary};
pub use snapshot::SnapshotError;
