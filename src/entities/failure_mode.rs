//! Failure mode entity - one way a component can fail
//!
//! A failure mode carries its share of the component failure rate together
//! with the diagnostic parameters for single-point (SPF) and multi-point
//! (MPF) fault handling. Its residual/latent/detected rates are derived
//! values: they are refreshed whenever a safety mechanism is set, or by an
//! explicit call to [`FailureMode::recompute`]. Reading never recomputes.

use serde::{Deserialize, Serialize};

use crate::core::metrics::FaultRates;

/// A safety mechanism together with its diagnostic coverage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SafetyMechanism {
    /// Mechanism name (e.g. "Watchdog", "ECC")
    #[serde(default)]
    pub name: String,

    /// Diagnostic coverage in percent (0..=100, not enforced)
    #[serde(default)]
    pub coverage: f64,
}

impl SafetyMechanism {
    pub fn new(name: impl Into<String>, coverage: f64) -> Self {
        Self {
            name: name.into(),
            coverage,
        }
    }
}

/// A failure mode of a component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FailureMode {
    /// What fails (e.g. "Short circuit")
    pub description: String,

    /// Total failure rate of this mode in FIT
    pub failure_rate_total: f64,

    /// Effect at system level
    #[serde(default)]
    pub system_level_effect: String,

    /// Counts as a single-point fault
    #[serde(default)]
    pub is_spf: bool,

    /// Counts as a multi-point fault
    #[serde(default)]
    pub is_mpf: bool,

    /// Mechanism covering single-point faults
    #[serde(default)]
    pub spf_mechanism: SafetyMechanism,

    /// Mechanism covering multi-point faults
    #[serde(default)]
    pub mpf_mechanism: SafetyMechanism,

    /// Derived contributions; zero until first recomputation
    #[serde(default)]
    rates: FaultRates,
}

impl FailureMode {
    /// Create a failure mode with no SPF/MPF classification and zeroed rates
    pub fn new(description: impl Into<String>, failure_rate_total: f64) -> Self {
        Self {
            description: description.into(),
            failure_rate_total,
            ..Self::default()
        }
    }

    /// Builder: set the system-level effect
    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.system_level_effect = effect.into();
        self
    }

    /// Builder: flag as single-point fault and assign its mechanism
    pub fn with_spf(mut self, mechanism: impl Into<String>, coverage: f64) -> Self {
        self.is_spf = true;
        self.set_spf_mechanism(mechanism, coverage);
        self
    }

    /// Builder: flag as multi-point fault and assign its mechanism
    pub fn with_mpf(mut self, mechanism: impl Into<String>, coverage: f64) -> Self {
        self.is_mpf = true;
        self.set_mpf_mechanism(mechanism, coverage);
        self
    }

    /// Set the SPF mechanism and refresh the derived rates
    pub fn set_spf_mechanism(&mut self, mechanism: impl Into<String>, coverage: f64) {
        self.spf_mechanism = SafetyMechanism::new(mechanism, coverage);
        self.recompute();
    }

    /// Set the MPF mechanism and refresh the derived rates
    pub fn set_mpf_mechanism(&mut self, mechanism: impl Into<String>, coverage: f64) {
        self.mpf_mechanism = SafetyMechanism::new(mechanism, coverage);
        self.recompute();
    }

    /// Recompute RF, MPFL and MPFD from the current inputs
    ///
    /// Must be called after changing the total rate or either flag directly.
    pub fn recompute(&mut self) {
        self.rates = FaultRates::derive(
            self.failure_rate_total,
            self.is_spf,
            self.spf_mechanism.coverage,
            self.is_mpf,
            self.mpf_mechanism.coverage,
        );
    }

    /// Derived contributions as last computed
    pub fn rates(&self) -> FaultRates {
        self.rates
    }

    /// Residual fault rate (RF)
    pub fn rf(&self) -> f64 {
        self.rates.residual
    }

    /// Latent multi-point fault rate (MPFL)
    pub fn mpfl(&self) -> f64 {
        self.rates.latent
    }

    /// Detected multi-point fault rate (MPFD)
    pub fn mpfd(&self) -> f64 {
        self.rates.detected
    }

    /// Whether this mode has any safety impact
    pub fn is_safety_relevant(&self) -> bool {
        self.is_spf || self.is_mpf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_failure_mode_has_zero_rates() {
        let fm = FailureMode::new("Open circuit", 10.0);
        assert_eq!(fm.rates(), FaultRates::default());
        assert!(!fm.is_safety_relevant());
    }

    #[test]
    fn test_setting_mechanism_recomputes() {
        let mut fm = FailureMode::new("Stuck-at", 1000.0);
        fm.is_spf = true;
        fm.is_mpf = true;
        fm.set_spf_mechanism("Lockstep", 50.0);
        assert_eq!(fm.rf(), 500.0);
        // MPF coverage still 0, so the remainder is fully latent
        assert_eq!(fm.mpfl(), 500.0);

        fm.set_mpf_mechanism("Periodic test", 70.0);
        assert!((fm.mpfl() - 150.0).abs() < 1e-9);
        assert!((fm.mpfd() - 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_flag_change_needs_explicit_recompute() {
        let mut fm = FailureMode::new("Drift", 100.0).with_spf("None", 0.0);
        assert_eq!(fm.rf(), 100.0);

        fm.is_spf = false;
        assert_eq!(fm.rf(), 100.0);

        fm.recompute();
        assert_eq!(fm.rf(), 0.0);
    }

    #[test]
    fn test_builders() {
        let fm = FailureMode::new("Short", 100.0)
            .with_effect("Overcurrent")
            .with_mpf("Monitor", 70.0);
        assert_eq!(fm.system_level_effect, "Overcurrent");
        assert!(fm.is_mpf);
        assert!(!fm.is_spf);
        assert_eq!(fm.mpf_mechanism.name, "Monitor");
        assert!((fm.mpfd() - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_json_round_trip_keeps_rates() {
        let fm = FailureMode::new("Short", 100.0).with_spf("ECC", 90.0);
        let json = serde_json::to_string(&fm).unwrap();
        let parsed: FailureMode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, fm);
    }
}
