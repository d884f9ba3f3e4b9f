//! Component entity type - one line of the bill of materials
//!
//! A component has its own aggregate failure rate and an ordered list of
//! failure modes. The aggregate rate is not tied to the sum of the failure
//! mode rates: metric aggregation uses the component rate for the
//! safety-related total and the failure modes for RF/MPFL/MPFD.
//!
//! Links to safety functions are held by the owning
//! [`Project`](crate::core::project::Project), not by the component.

use serde::{Deserialize, Serialize};

use crate::core::catalog::CatalogEntry;
use crate::core::identity::ItemId;
use crate::entities::failure_mode::FailureMode;

/// A component of the analysed design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Unique identifier within the project
    pub id: ItemId,

    /// Free-form category (e.g. "Resistor", "IC")
    #[serde(rename = "type", default)]
    pub component_type: String,

    /// Aggregate failure rate in FIT
    #[serde(default)]
    pub failure_rate: f64,

    /// Failure modes, in entry order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failure_modes: Vec<FailureMode>,
}

impl Component {
    /// Create a component without failure modes
    pub fn new(id: impl Into<ItemId>, component_type: impl Into<String>, failure_rate: f64) -> Self {
        Self {
            id: id.into(),
            component_type: component_type.into(),
            failure_rate,
            failure_modes: Vec::new(),
        }
    }

    /// Append a failure mode
    pub fn add_failure_mode(&mut self, fm: FailureMode) {
        self.failure_modes.push(fm);
    }

    /// Remove the failure mode at `index` (0-based)
    pub fn remove_failure_mode(&mut self, index: usize) -> Option<FailureMode> {
        if index < self.failure_modes.len() {
            Some(self.failure_modes.remove(index))
        } else {
            None
        }
    }

    /// Whether a failure mode with this description already exists
    pub fn has_failure_mode(&self, description: &str) -> bool {
        self.failure_modes
            .iter()
            .any(|fm| fm.description == description)
    }

    /// Sum of the failure mode total rates
    pub fn failure_mode_rate_sum(&self) -> f64 {
        self.failure_modes.iter().map(|fm| fm.failure_rate_total).sum()
    }

    /// Refresh derived rates of every failure mode
    pub fn recompute_failure_modes(&mut self) {
        for fm in &mut self.failure_modes {
            fm.recompute();
        }
    }

    /// Generate failure modes from catalog entries
    ///
    /// Each entry becomes a single-point failure mode with rate
    /// `failure_rate * share / 100`, mechanism "None" and 0% coverage.
    /// Nothing is generated when the component rate is not positive.
    /// Returns the number of failure modes added.
    pub fn populate_from_catalog<'a, I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = &'a CatalogEntry>,
    {
        if self.failure_rate <= 0.0 {
            return 0;
        }

        let before = self.failure_modes.len();
        for entry in entries {
            let fm = FailureMode::new(entry.description, self.failure_rate * (entry.share / 100.0))
                .with_effect(entry.system_effect)
                .with_spf("None", 0.0);
            self.failure_modes.push(fm);
        }
        self.failure_modes.len() - before
    }
}
