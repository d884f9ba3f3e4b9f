//! Standalone CSV imports into an existing project
//!
//! Two flat formats are accepted:
//!
//! - safety function lists: `id, description, target_integrity_level`
//! - bills of materials: `id, type, failure_rate` and optionally
//!   `related_sf_ids` (comma-joined safety function ids)
//!
//! Rows whose id already exists in the project are skipped, not merged.

use serde::Deserialize;
use std::io::Read;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::identity::{split_id_list, ItemId};
use crate::core::project::{Project, ProjectError};
use crate::entities::component::Component;
use crate::entities::safety::parse_target_level;
use crate::entities::safety_function::SafetyFunction;

const SF_COLUMNS: &[&str] = &["id", "description", "target_integrity_level"];
const BOM_COLUMNS: &[&str] = &["id", "type", "failure_rate"];

/// Errors importing a CSV file
#[derive(Debug, Error, miette::Diagnostic)]
pub enum ImportError {
    #[error("Malformed CSV: {0}")]
    #[diagnostic(code(fmeda::import::csv))]
    Csv(#[from] csv::Error),

    #[error("CSV must contain columns: {}", .0.join(", "))]
    #[diagnostic(code(fmeda::import::missing_columns))]
    MissingColumns(Vec<String>),

    #[error("Line {line}: '{value}' is not a valid failure rate")]
    #[diagnostic(code(fmeda::import::invalid_rate))]
    InvalidRate { value: String, line: u64 },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Project(#[from] ProjectError),
}

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub added: usize,
    /// Rows whose id already existed
    pub skipped: Vec<ItemId>,
    /// Links created from `related_sf_ids`
    pub linked: usize,
}

#[derive(Debug, Deserialize)]
struct SfRow {
    id: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    target_integrity_level: String,
}

#[derive(Debug, Deserialize)]
struct BomRow {
    id: String,
    #[serde(rename = "type", default)]
    component_type: String,
    #[serde(default)]
    failure_rate: String,
    #[serde(default)]
    related_sf_ids: Option<String>,
}

fn check_columns(headers: &csv::StringRecord, required: &[&str]) -> Result<(), ImportError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h.trim() == **col))
        .map(|col| col.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ImportError::MissingColumns(missing))
    }
}

/// Import safety functions from a CSV list
pub fn import_safety_functions<R: Read>(
    project: &mut Project,
    reader: R,
) -> Result<ImportStats, ImportError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    check_columns(&headers, SF_COLUMNS)?;

    let mut stats = ImportStats::default();
    for record in rdr.records() {
        let record = record?;
        let row: SfRow = record.deserialize(Some(&headers))?;

        let id = ItemId::new(&row.id);
        if project.safety_function(id.as_str()).is_some() {
            stats.skipped.push(id);
            continue;
        }

        let mut sf = SafetyFunction::new(id).with_description(row.description);
        sf.target_integrity_level = parse_target_level(&row.target_integrity_level);
        project.add_safety_function(sf)?;
        stats.added += 1;
    }

    info!(added = stats.added, skipped = stats.skipped.len(), "imported safety functions");
    Ok(stats)
}

/// Import components from a bill of materials
///
/// Links named in `related_sf_ids` are created for safety functions that
/// already exist in the project; unknown ids are skipped with a warning.
pub fn import_bom<R: Read>(project: &mut Project, reader: R) -> Result<ImportStats, ImportError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    check_columns(&headers, BOM_COLUMNS)?;

    let mut stats = ImportStats::default();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: BomRow = record.deserialize(Some(&headers))?;

        let id = ItemId::new(&row.id);
        if project.component(id.as_str()).is_some() {
            stats.skipped.push(id);
            continue;
        }

        let failure_rate = match row.failure_rate.as_str() {
            "" => 0.0,
            raw => raw.parse::<f64>().map_err(|_| ImportError::InvalidRate {
                value: raw.to_string(),
                line,
            })?,
        };

        project.add_component(Component::new(id.clone(), row.component_type, failure_rate))?;
        stats.added += 1;

        for sf_id in split_id_list(row.related_sf_ids.as_deref().unwrap_or_default()) {
            if project.safety_function(sf_id.as_str()).is_none() {
                warn!(line, component = %id, sf = %sf_id, "skipping link to unknown safety function");
                continue;
            }
            if project.link(sf_id.as_str(), id.as_str())? {
                stats.linked += 1;
            }
        }
    }

    info!(
        added = stats.added,
        skipped = stats.skipped.len(),
        linked = stats.linked,
        "imported bill of materials"
    );
    Ok(stats)
}
