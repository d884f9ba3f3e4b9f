//! Project snapshot - a single sectioned CSV file
//!
//! Every row carries a `section` discriminator (`project`, `sf`, `component`
//! or `fm`) and fills only the columns of its kind. Derived values are never
//! stored: failure-mode rates are recomputed on load and the project is
//! evaluated once with its lifetime.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::core::identity::{join_id_list, split_id_list, ItemId};
use crate::core::project::{Project, ProjectError};
use crate::entities::component::Component;
use crate::entities::failure_mode::FailureMode;
use crate::entities::safety::parse_target_level;
use crate::entities::safety_function::SafetyFunction;

/// Errors reading or writing a snapshot
#[derive(Debug, Error, miette::Diagnostic)]
pub enum SnapshotError {
    #[error("Failed to access snapshot {}", path.display())]
    #[diagnostic(code(fmeda::snapshot::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    #[diagnostic(code(fmeda::snapshot::csv))]
    Csv(#[from] csv::Error),

    #[error("Snapshot has no '{0}' column")]
    #[diagnostic(code(fmeda::snapshot::missing_column))]
    MissingColumn(&'static str),

    #[error("Snapshot has no 'project' row")]
    #[diagnostic(
        code(fmeda::snapshot::missing_project),
        help("the first row with section=project holds the name and lifetime")
    )]
    MissingProject,

    #[error("Line {line}: '{value}' is not a valid number for {field}")]
    #[diagnostic(code(fmeda::snapshot::invalid_number))]
    InvalidNumber {
        field: &'static str,
        value: String,
        line: u64,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Project(#[from] ProjectError),
}

/// One CSV row; columns not used by a section stay empty
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct SnapshotRow {
    section: String,
    name: Option<String>,
    lifetime: Option<String>,
    id: Option<String>,
    description: Option<String>,
    target_integrity_level: Option<String>,
    #[serde(rename = "type")]
    component_type: Option<String>,
    failure_rate: Option<String>,
    related_sf_ids: Option<String>,
    component_id: Option<String>,
    #[serde(rename = "Failure_rate_total")]
    failure_rate_total: Option<String>,
    system_level_effect: Option<String>,
    #[serde(rename = "is_SPF")]
    is_spf: Option<String>,
    #[serde(rename = "SPF_safety_mechanism")]
    spf_safety_mechanism: Option<String>,
    #[serde(rename = "SPF_diagnostic_coverage")]
    spf_diagnostic_coverage: Option<String>,
    #[serde(rename = "is_MPF")]
    is_mpf: Option<String>,
    #[serde(rename = "MPF_safety_mechanism")]
    mpf_safety_mechanism: Option<String>,
    #[serde(rename = "MPF_diagnostic_coverage")]
    mpf_diagnostic_coverage: Option<String>,
}

fn flag(value: bool) -> Option<String> {
    Some(if value { "1" } else { "0" }.to_string())
}

fn number(value: f64) -> Option<String> {
    Some(value.to_string())
}

fn text(value: Option<&String>) -> String {
    value.map(|s| s.to_string()).unwrap_or_default()
}

fn parse_number(field: &'static str, value: Option<&String>, line: u64) -> Result<f64, SnapshotError> {
    match value.map(|v| v.trim()) {
        None | Some("") => Ok(0.0),
        Some(raw) => raw.parse::<f64>().map_err(|_| SnapshotError::InvalidNumber {
            field,
            value: raw.to_string(),
            line,
        }),
    }
}

/// Flags are written as 0/1; spreadsheets may turn them into 1.0 or TRUE
fn parse_flag(field: &'static str, value: Option<&String>, line: u64) -> Result<bool, SnapshotError> {
    match value.map(|v| v.trim().to_lowercase()).as_deref() {
        None | Some("") => Ok(false),
        Some("true") | Some("yes") => Ok(true),
        Some("false") | Some("no") => Ok(false),
        // Numeric flags truncate toward zero, so 0.5 is unset
        Some(_) => Ok(parse_number(field, value, line)?.trunc() != 0.0),
    }
}

/// Write a project as a sectioned CSV snapshot
pub fn write_snapshot<W: Write>(project: &Project, writer: W) -> Result<(), SnapshotError> {
    let mut out = csv::Writer::from_writer(writer);

    out.serialize(SnapshotRow {
        section: "project".to_string(),
        name: Some(project.name.clone()),
        lifetime: number(project.lifetime()),
        ..SnapshotRow::default()
    })?;

    for sf in project.safety_functions() {
        out.serialize(SnapshotRow {
            section: "sf".to_string(),
            id: Some(sf.id.to_string()),
            description: Some(sf.description.clone()),
            target_integrity_level: Some(
                sf.target_integrity_level
                    .as_ref()
                    .map(|l| l.to_string())
                    .unwrap_or_default(),
            ),
            ..SnapshotRow::default()
        })?;
    }

    for component in project.components() {
        let related: Vec<ItemId> = project
            .linked_safety_functions(component.id.as_str())
            .map(|sf| sf.id.clone())
            .collect();
        out.serialize(SnapshotRow {
            section: "component".to_string(),
            id: Some(component.id.to_string()),
            component_type: Some(component.component_type.clone()),
            failure_rate: number(component.failure_rate),
            related_sf_ids: Some(join_id_list(&related)),
            ..SnapshotRow::default()
        })?;
    }

    for component in project.components() {
        for fm in &component.failure_modes {
            out.serialize(SnapshotRow {
                section: "fm".to_string(),
                component_id: Some(component.id.to_string()),
                description: Some(fm.description.clone()),
                failure_rate_total: number(fm.failure_rate_total),
                system_level_effect: Some(fm.system_level_effect.clone()),
                is_spf: flag(fm.is_spf),
                spf_safety_mechanism: Some(fm.spf_mechanism.name.clone()),
                spf_diagnostic_coverage: number(fm.spf_mechanism.coverage),
                is_mpf: flag(fm.is_mpf),
                mpf_safety_mechanism: Some(fm.mpf_mechanism.name.clone()),
                mpf_diagnostic_coverage: number(fm.mpf_mechanism.coverage),
                ..SnapshotRow::default()
            })?;
        }
    }

    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Read a project from a sectioned CSV snapshot
///
/// Rows are grouped by section, so their order in the file does not matter.
/// `fm` rows for unknown components and unknown ids in `related_sf_ids` are
/// skipped with a warning.
pub fn read_snapshot<R: Read>(reader: R) -> Result<Project, SnapshotError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    if !headers.iter().any(|h| h == "section") {
        return Err(SnapshotError::MissingColumn("section"));
    }

    let mut project_row = None;
    let mut sf_rows = Vec::new();
    let mut component_rows = Vec::new();
    let mut fm_rows = Vec::new();

    for record in rdr.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: SnapshotRow = record.deserialize(Some(&headers))?;

        let section = row.section.trim().to_string();
        match section.as_str() {
            "project" => {
                if project_row.is_none() {
                    project_row = Some((line, row));
                }
            }
            "sf" => sf_rows.push((line, row)),
            "component" => component_rows.push((line, row)),
            "fm" => fm_rows.push((line, row)),
            other => warn!(line, section = other, "skipping row with unknown section"),
        }
    }

    let (line, row) = project_row.ok_or(SnapshotError::MissingProject)?;
    let mut project = Project::new(text(row.name.as_ref()));
    project.set_lifetime(parse_number("lifetime", row.lifetime.as_ref(), line)?);

    for (_, row) in &sf_rows {
        let mut sf = SafetyFunction::new(text(row.id.as_ref()));
        sf.description = text(row.description.as_ref());
        sf.target_integrity_level = parse_target_level(&text(row.target_integrity_level.as_ref()));
        project.add_safety_function(sf)?;
    }

    for (line, row) in &component_rows {
        let component = Component::new(
            text(row.id.as_ref()),
            text(row.component_type.as_ref()),
            parse_number("failure_rate", row.failure_rate.as_ref(), *line)?,
        );
        project.add_component(component)?;
    }

    for (line, row) in &fm_rows {
        let component_id = text(row.component_id.as_ref());
        let mut fm = FailureMode::new(
            text(row.description.as_ref()),
            parse_number("Failure_rate_total", row.failure_rate_total.as_ref(), *line)?,
        )
        .with_effect(text(row.system_level_effect.as_ref()));
        fm.is_spf = parse_flag("is_SPF", row.is_spf.as_ref(), *line)?;
        fm.is_mpf = parse_flag("is_MPF", row.is_mpf.as_ref(), *line)?;
        let spf_coverage = parse_number(
            "SPF_diagnostic_coverage",
            row.spf_diagnostic_coverage.as_ref(),
            *line,
        )?;
        let mpf_coverage = parse_number(
            "MPF_diagnostic_coverage",
            row.mpf_diagnostic_coverage.as_ref(),
            *line,
        )?;
        fm.set_spf_mechanism(text(row.spf_safety_mechanism.as_ref()), spf_coverage);
        fm.set_mpf_mechanism(text(row.mpf_safety_mechanism.as_ref()), mpf_coverage);

        match project.component_mut(&component_id) {
            Some(component) => component.add_failure_mode(fm),
            None => warn!(
                line = *line,
                component = %component_id,
                "skipping failure mode of unknown component"
            ),
        }
    }

    for (line, row) in &component_rows {
        let component_id = text(row.id.as_ref());
        for sf_id in split_id_list(&text(row.related_sf_ids.as_ref())) {
            if project.safety_function(sf_id.as_str()).is_none() {
                warn!(
                    line = *line,
                    component = %component_id,
                    sf = %sf_id,
                    "skipping link to unknown safety function"
                );
                continue;
            }
            project.link(sf_id.as_str(), &component_id)?;
        }
    }

    project.evaluate_all();
    Ok(project)
}

/// Load a snapshot file
pub fn load(path: &Path) -> Result<Project, SnapshotError> {
    let file = File::open(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let project = read_snapshot(file)?;
    info!(
        path = %path.display(),
        safety_functions = project.safety_functions().len(),
        components = project.components().len(),
        "loaded project"
    );
    Ok(project)
}

/// Save a snapshot file, replacing any previous content
pub fn save(project: &Project, path: &Path) -> Result<(), SnapshotError> {
    let file = File::create(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_snapshot(project, file)?;
    info!(path = %path.display(), "saved project");
    Ok(())
}
