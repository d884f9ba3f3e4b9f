//! FMEDA metric engine
//!
//! Two pure calculations live here:
//!
//! - [`FaultRates::derive`] splits one failure mode's total rate into the
//!   residual (RF), latent multi-point (MPFL) and detected multi-point (MPFD)
//!   contributions.
//! - [`SafetyMetrics::aggregate`] sums those contributions over every failure
//!   mode of every component linked to a safety function and derives MPHF,
//!   SPFM and LFM.
//!
//! All rates are in FIT (failures per 1e9 hours). Coverages are percentages
//! and are not clamped: values outside 0..=100 yield out-of-range results.

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

use crate::entities::component::Component;

/// Hours per FIT unit
pub const FIT_HOURS: f64 = 1e9;

/// Per-failure-mode fault contributions, in FIT
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FaultRates {
    /// Residual fault rate (RF)
    pub residual: f64,
    /// Latent multi-point fault rate (MPFL)
    pub latent: f64,
    /// Detected multi-point fault rate (MPFD)
    pub detected: f64,
}

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

impl FaultRates {
    /// Derive the three contributions of a single failure mode
    ///
    /// RF is computed first; the multi-point split applies to what remains
    /// after RF is removed from the total.
    pub fn derive(
        total_rate: f64,
        is_spf: bool,
        spf_coverage: f64,
        is_mpf: bool,
        mpf_coverage: f64,
    ) -> Self {
        let residual = indicator(is_spf) * total_rate * (1.0 - spf_coverage / 100.0);
        let base = total_rate - residual;
        let latent = indicator(is_mpf) * base * (1.0 - mpf_coverage / 100.0);
        let detected = indicator(is_mpf) * base * (mpf_coverage / 100.0);

        Self {
            residual,
            latent,
            detected,
        }
    }

    /// RF + MPFL + MPFD
    pub fn sum(&self) -> f64 {
        self.residual + self.latent + self.detected
    }
}

impl AddAssign for FaultRates {
    fn add_assign(&mut self, rhs: Self) {
        self.residual += rhs.residual;
        self.latent += rhs.latent;
        self.detected += rhs.detected;
    }
}

/// Metrics of one safety function
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SafetyMetrics {
    /// Sum of linked component failure rates (FIT)
    pub safety_related: f64,
    /// Residual fault rate (FIT)
    pub rf: f64,
    /// Latent multi-point fault rate (FIT)
    pub mpfl: f64,
    /// Detected multi-point fault rate (FIT)
    pub mpfd: f64,
    /// Probabilistic metric for hardware failure (per hour)
    pub mphf: f64,
    /// Single-point fault metric (0..1)
    pub spfm: f64,
    /// Latent fault metric (0..1)
    pub lfm: f64,
}

impl SafetyMetrics {
    /// Aggregate metrics from scratch over the given components
    ///
    /// Uses each component's own `failure_rate` for the safety-related total
    /// and the stored derived rates of its failure modes for RF/MPFL/MPFD.
    /// Nothing is recomputed on the failure modes themselves.
    pub fn aggregate<'a, I>(components: I, lifetime: f64) -> Self
    where
        I: IntoIterator<Item = &'a Component>,
    {
        let mut safety_related = 0.0;
        let mut totals = FaultRates::default();

        for component in components {
            safety_related += component.failure_rate;
            for fm in &component.failure_modes {
                totals += fm.rates();
            }
        }

        Self::from_totals(safety_related, totals, lifetime)
    }

    /// Derive MPHF, SPFM and LFM from accumulated totals
    pub fn from_totals(safety_related: f64, totals: FaultRates, lifetime: f64) -> Self {
        let rf = totals.residual;
        let mpfl = totals.latent;
        let mpfd = totals.detected;

        let mphf = rf / FIT_HOURS + (mpfl / FIT_HOURS) * (mpfd / FIT_HOURS) * lifetime;

        let spfm = if safety_related > 0.0 {
            1.0 - rf / safety_related
        } else {
            0.0
        };

        let remaining = safety_related - rf;
        let lfm = if remaining > 0.0 {
            1.0 - mpfl / remaining
        } else {
            0.0
        };

        Self {
            safety_related,
            rf,
            mpfl,
            mpfd,
            mphf,
            spfm,
            lfm,
        }
    }

    /// SPFM as a percentage
    pub fn spfm_percent(&self) -> f64 {
        self.spfm * 100.0
    }

    /// LFM as a percentage
    pub fn lfm_percent(&self) -> f64 {
        self.lfm * 100.0
    }
}
