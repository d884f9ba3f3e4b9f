//! Result summaries and number formatting for reports

use serde::Serialize;

use crate::core::compliance::ComplianceReport;
use crate::core::project::Project;
use crate::entities::safety_function::SafetyFunction;

/// Default magnitude below which MPHF is shown in scientific notation
pub const DEFAULT_MPHF_SCI_THRESHOLD: f64 = 1e-4;

/// Project-level totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSummary {
    pub name: String,
    pub lifetime: f64,
    pub configured: bool,
    pub components: usize,
    pub safety_functions: usize,
    pub failure_modes: usize,
    pub links: usize,
}

impl ProjectSummary {
    pub fn of(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            lifetime: project.lifetime(),
            configured: project.is_configured(),
            components: project.components().len(),
            safety_functions: project.safety_functions().len(),
            failure_modes: project.failure_mode_count(),
            links: project.links().len(),
        }
    }
}

/// One safety function's metrics, flattened for output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRow {
    pub sf_id: String,
    pub target: Option<String>,
    pub safety_related_fit: f64,
    pub rf_fit: f64,
    pub mpfl_fit: f64,
    pub mpfd_fit: f64,
    pub mphf: f64,
    pub spfm_percent: f64,
    pub lfm_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance: Option<ComplianceReport>,
}

impl MetricsRow {
    pub fn new(sf: &SafetyFunction, with_compliance: bool) -> Self {
        let m = &sf.metrics;
        Self {
            sf_id: sf.id.to_string(),
            target: sf.target_integrity_level.as_ref().map(|l| l.to_string()),
            safety_related_fit: m.safety_related,
            rf_fit: m.rf,
            mpfl_fit: m.mpfl,
            mpfd_fit: m.mpfd,
            mphf: m.mphf,
            spfm_percent: m.spfm_percent(),
            lfm_percent: m.lfm_percent(),
            compliance: if with_compliance {
                ComplianceReport::for_safety_function(sf)
            } else {
                None
            },
        }
    }
}

/// Format an MPHF value
///
/// Zero prints as `0.000000`; magnitudes below `sci_threshold` print as
/// `m.mm*10^e`; everything else with six decimals.
pub fn format_mphf(value: f64, sci_threshold: f64) -> String {
    if value == 0.0 {
        return "0.000000".to_string();
    }
    if value.abs() < sci_threshold {
        let sci = format!("{:.2e}", value);
        if let Some((mantissa, exponent)) = sci.split_once('e') {
            return format!("{}*10^{}", mantissa, exponent);
        }
        return sci;
    }
    format!("{:.6}", value)
}

/// Format a FIT rate with two decimals
pub fn format_fit(value: f64) -> String {
    format!("{:.2}", value)
}

/// Format a 0..1 fraction as a percentage with two decimals
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}", fraction * 100.0)
}
