//! Safety function entity type
//!
//! A safety function aggregates the failure-mode contributions of the
//! components linked to it into the six FMEDA metrics. The metrics are
//! cached here after each evaluation and reset at the start of the next.

use serde::{Deserialize, Serialize};

use crate::core::identity::ItemId;
use crate::core::metrics::SafetyMetrics;
use crate::entities::component::Component;
use crate::entities::safety::TargetLevel;

/// A safety function of the analysed system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyFunction {
    /// Unique identifier within the project
    pub id: ItemId,

    /// What the function protects against
    #[serde(default)]
    pub description: String,

    /// Target integrity level, if assigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_integrity_level: Option<TargetLevel>,

    /// Metrics from the last evaluation
    #[serde(default)]
    pub metrics: SafetyMetrics,
}

impl SafetyFunction {
    /// Create a safety function with zeroed metrics
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            target_integrity_level: None,
            metrics: SafetyMetrics::default(),
        }
    }

    /// Builder: set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: set the target integrity level
    pub fn with_target(mut self, level: impl Into<TargetLevel>) -> Self {
        self.target_integrity_level = Some(level.into());
        self
    }

    /// Reset metrics and aggregate them over `components`
    pub fn evaluate<'a, I>(&mut self, components: I, lifetime: f64) -> &SafetyMetrics
    where
        I: IntoIterator<Item = &'a Component>,
    {
        // Accumulators start from zero on every pass
        self.metrics = SafetyMetrics::aggregate(components, lifetime);
        &self.metrics
    }
}
