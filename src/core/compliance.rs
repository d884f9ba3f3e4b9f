//! Checking evaluated metrics against ASIL architectural targets

use serde::Serialize;

use crate::core::metrics::SafetyMetrics;
use crate::entities::safety::{Asil, TargetLevel};
use crate::entities::safety_function::SafetyFunction;

/// Verdict for one metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricVerdict {
    Pass,
    Fail,
    /// The level sets no target for this metric
    NoTarget,
}

impl MetricVerdict {
    fn at_least(value: f64, target: Option<f64>) -> Self {
        match target {
            None => MetricVerdict::NoTarget,
            Some(min) if value >= min => MetricVerdict::Pass,
            Some(_) => MetricVerdict::Fail,
        }
    }

    fn below(value: f64, target: Option<f64>) -> Self {
        match target {
            None => MetricVerdict::NoTarget,
            Some(max) if value < max => MetricVerdict::Pass,
            Some(_) => MetricVerdict::Fail,
        }
    }
}

impl std::fmt::Display for MetricVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricVerdict::Pass => write!(f, "pass"),
            MetricVerdict::Fail => write!(f, "FAIL"),
            MetricVerdict::NoTarget => write!(f, "-"),
        }
    }
}

/// Compliance of one safety function with its target level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceReport {
    pub level: Asil,
    pub spfm: MetricVerdict,
    pub lfm: MetricVerdict,
    pub mphf: MetricVerdict,
}

impl ComplianceReport {
    /// Check metrics against the targets of `level`
    pub fn check(metrics: &SafetyMetrics, level: Asil) -> Self {
        let targets = level.targets();
        Self {
            level,
            spfm: MetricVerdict::at_least(metrics.spfm, targets.spfm_min),
            lfm: MetricVerdict::at_least(metrics.lfm, targets.lfm_min),
            mphf: MetricVerdict::below(metrics.mphf, targets.mphf_max),
        }
    }

    /// Check a safety function; `None` unless its target level is an ASIL
    pub fn for_safety_function(sf: &SafetyFunction) -> Option<Self> {
        sf.target_integrity_level
            .as_ref()
            .and_then(TargetLevel::asil)
            .map(|level| Self::check(&sf.metrics, level))
    }

    pub fn passes(&self) -> bool {
        [self.spfm, self.lfm, self.mphf]
            .iter()
            .all(|v| *v != MetricVerdict::Fail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(spfm: f64, lfm: f64, mphf: f64) -> SafetyMetrics {
        SafetyMetrics {
            spfm,
            lfm,
            mphf,
            ..SafetyMetrics::default()
        }
    }

    #[test]
    fn test_asil_d_requires_all_targets() {
        let good = ComplianceReport::check(&metrics(0.995, 0.95, 5e-9), Asil::D);
        assert!(good.passes());

        let weak = ComplianceReport::check(&metrics(0.98, 0.95, 5e-9), Asil::D);
        assert_eq!(weak.spfm, MetricVerdict::Fail);
        assert!(!weak.passes());
    }

    #[test]
    fn test_asil_b_passes_where_d_fails() {
        let m = metrics(0.95, 0.85, 5e-8);
        assert!(ComplianceReport::check(&m, Asil::B).passes());
        assert!(!ComplianceReport::check(&m, Asil::D).passes());
    }

    #[test]
    fn test_qm_has_no_targets() {
        let report = ComplianceReport::check(&metrics(0.0, 0.0, 1.0), Asil::QM);
        assert_eq!(report.spfm, MetricVerdict::NoTarget);
        assert_eq!(report.mphf, MetricVerdict::NoTarget);
        assert!(report.passes());
    }

    #[test]
    fn test_mphf_boundary_is_exclusive() {
        let report = ComplianceReport::check(&metrics(1.0, 1.0, 1e-7), Asil::B);
        assert_eq!(report.mphf, MetricVerdict::Fail);
    }

    #[test]
    fn test_unassigned_level_is_not_assessed() {
        let sf = SafetyFunction::new("SF1");
        assert!(ComplianceReport::for_safety_function(&sf).is_none());
    }

    #[test]
    fn test_foreign_level_is_not_assessed() {
        let sf = SafetyFunction::new("SF1").with_target(TargetLevel::Other("SIL 2".into()));
        assert!(ComplianceReport::for_safety_function(&sf).is_none());

        let sf = SafetyFunction::new("SF2").with_target(Asil::B);
        assert!(ComplianceReport::for_safety_function(&sf).is_some());
    }

    #[test]
    fn test_verdict_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&MetricVerdict::NoTarget).unwrap(),
            "\"no_target\""
        );
        assert_eq!(serde_json::to_string(&MetricVerdict::Pass).unwrap(), "\"pass\"");
        let report = ComplianceReport::check(&metrics(0.0, 0.0, 0.0), Asil::QM);
        let yaml = serde_yml::to_string(&report).unwrap();
        assert!(yaml.contains("spfm: no_target"));
    }
}
