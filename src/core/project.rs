//! Project - top-level container of an FMEDA analysis
//!
//! The project owns the safety functions and the component inventory (bill of
//! materials). The many-to-many relation between them is kept in a separate
//! link table, so both sides always agree: linking, unlinking and removal
//! all go through the project.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::identity::{normalize_id, ItemId};
use crate::entities::component::Component;
use crate::entities::safety_function::SafetyFunction;

/// Errors from structural changes to a project
#[derive(Debug, Error, miette::Diagnostic)]
pub enum ProjectError {
    #[error("Safety function '{0}' already exists")]
    #[diagnostic(code(fmeda::project::duplicate_sf), help("safety function ids must be unique within a project"))]
    DuplicateSafetyFunction(ItemId),

    #[error("Component '{0}' already exists")]
    #[diagnostic(code(fmeda::project::duplicate_component), help("component ids must be unique within a project"))]
    DuplicateComponent(ItemId),

    #[error("Safety function '{0}' not found")]
    #[diagnostic(code(fmeda::project::unknown_sf))]
    UnknownSafetyFunction(String),

    #[error("Component '{0}' not found")]
    #[diagnostic(code(fmeda::project::unknown_component))]
    UnknownComponent(String),

    #[error("Identifier must not be empty")]
    #[diagnostic(code(fmeda::project::empty_id))]
    EmptyId,
}

/// One edge between a safety function and a component
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub safety_function: ItemId,
    pub component: ItemId,
}

/// An FMEDA project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project name
    pub name: String,

    /// Mission lifetime in hours, used by MPHF
    lifetime: f64,

    safety_functions: Vec<SafetyFunction>,

    components: Vec<Component>,

    links: Vec<Link>,
}

impl Project {
    /// Create an empty, unconfigured project
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lifetime: 0.0,
            safety_functions: Vec::new(),
            components: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Builder: set the lifetime
    pub fn with_lifetime(mut self, hours: f64) -> Self {
        self.lifetime = hours;
        self
    }

    pub fn lifetime(&self) -> f64 {
        self.lifetime
    }

    /// Set the lifetime in hours
    ///
    /// Not validated here; a zero lifetime is legal and only drops the latent
    /// term of MPHF.
    pub fn set_lifetime(&mut self, hours: f64) {
        self.lifetime = hours;
    }

    /// Whether the lifetime has been set to a positive value
    pub fn is_configured(&self) -> bool {
        self.lifetime > 0.0
    }

    pub fn safety_functions(&self) -> &[SafetyFunction] {
        &self.safety_functions
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Total number of failure modes across the inventory
    pub fn failure_mode_count(&self) -> usize {
        self.components.iter().map(|c| c.failure_modes.len()).sum()
    }

    pub fn safety_function(&self, id: &str) -> Option<&SafetyFunction> {
        let key = normalize_id(id);
        self.safety_functions.iter().find(|sf| sf.id.as_str() == key)
    }

    pub fn safety_function_mut(&mut self, id: &str) -> Option<&mut SafetyFunction> {
        let key = normalize_id(id);
        self.safety_functions
            .iter_mut()
            .find(|sf| sf.id.as_str() == key)
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        let key = normalize_id(id);
        self.components.iter().find(|c| c.id.as_str() == key)
    }

    pub fn component_mut(&mut self, id: &str) -> Option<&mut Component> {
        let key = normalize_id(id);
        self.components.iter_mut().find(|c| c.id.as_str() == key)
    }

    /// Add a safety function; its id must be new
    pub fn add_safety_function(&mut self, sf: SafetyFunction) -> Result<(), ProjectError> {
        if sf.id.is_empty() {
            return Err(ProjectError::EmptyId);
        }
        if self.safety_function(sf.id.as_str()).is_some() {
            return Err(ProjectError::DuplicateSafetyFunction(sf.id));
        }
        self.safety_functions.push(sf);
        Ok(())
    }

    /// Remove a safety function and every link to it
    pub fn remove_safety_function(&mut self, id: &str) -> Result<SafetyFunction, ProjectError> {
        let key = normalize_id(id);
        let index = self
            .safety_functions
            .iter()
            .position(|sf| sf.id.as_str() == key)
            .ok_or_else(|| ProjectError::UnknownSafetyFunction(key.clone()))?;

        self.links.retain(|l| l.safety_function.as_str() != key);
        Ok(self.safety_functions.remove(index))
    }

    /// Add a component to the inventory; its id must be new
    pub fn add_component(&mut self, component: Component) -> Result<(), ProjectError> {
        if component.id.is_empty() {
            return Err(ProjectError::EmptyId);
        }
        if self.component(component.id.as_str()).is_some() {
            return Err(ProjectError::DuplicateComponent(component.id));
        }
        self.components.push(component);
        Ok(())
    }

    /// Remove a component and detach it from every safety function
    pub fn remove_component(&mut self, id: &str) -> Result<Component, ProjectError> {
        let key = normalize_id(id);
        let index = self
            .components
            .iter()
            .position(|c| c.id.as_str() == key)
            .ok_or_else(|| ProjectError::UnknownComponent(key.clone()))?;

        self.links.retain(|l| l.component.as_str() != key);
        Ok(self.components.remove(index))
    }

    /// Link a component to a safety function
    ///
    /// Returns `false` if the pair was already linked.
    pub fn link(&mut self, sf_id: &str, component_id: &str) -> Result<bool, ProjectError> {
        let link = self.resolve_link(sf_id, component_id)?;
        if self.links.contains(&link) {
            return Ok(false);
        }
        self.links.push(link);
        Ok(true)
    }

    /// Remove the link between a safety function and a component
    ///
    /// Returns `false` if the pair was not linked.
    pub fn unlink(&mut self, sf_id: &str, component_id: &str) -> Result<bool, ProjectError> {
        let link = self.resolve_link(sf_id, component_id)?;
        let before = self.links.len();
        self.links.retain(|l| *l != link);
        Ok(self.links.len() != before)
    }

    pub fn is_linked(&self, sf_id: &str, component_id: &str) -> bool {
        let sf_key = normalize_id(sf_id);
        let cmp_key = normalize_id(component_id);
        self.links
            .iter()
            .any(|l| l.safety_function.as_str() == sf_key && l.component.as_str() == cmp_key)
    }

    fn resolve_link(&self, sf_id: &str, component_id: &str) -> Result<Link, ProjectError> {
        let sf = self
            .safety_function(sf_id)
            .ok_or_else(|| ProjectError::UnknownSafetyFunction(normalize_id(sf_id)))?;
        let component = self
            .component(component_id)
            .ok_or_else(|| ProjectError::UnknownComponent(normalize_id(component_id)))?;
        Ok(Link {
            safety_function: sf.id.clone(),
            component: component.id.clone(),
        })
    }

    /// Components linked to a safety function, in link order
    pub fn linked_components<'a>(&'a self, sf_id: &str) -> impl Iterator<Item = &'a Component> + 'a {
        linked_components(&self.links, &self.components, normalize_id(sf_id))
    }

    /// Safety functions a component serves, in link order
    pub fn linked_safety_functions<'a>(
        &'a self,
        component_id: &str,
    ) -> impl Iterator<Item = &'a SafetyFunction> + 'a {
        let key = normalize_id(component_id);
        self.links
            .iter()
            .filter(move |l| l.component.as_str() == key)
            .filter_map(move |l| {
                self.safety_functions
                    .iter()
                    .find(|sf| sf.id == l.safety_function)
            })
    }

    /// Evaluate every safety function with the given lifetime
    ///
    /// Each safety function is recomputed from scratch, so repeated calls
    /// with unchanged inputs give identical results.
    pub fn evaluate(&mut self, lifetime: f64) {
        let Self {
            safety_functions,
            components,
            links,
            ..
        } = self;

        for sf in safety_functions.iter_mut() {
            let linked = linked_components(links.as_slice(), components.as_slice(), sf.id.to_string());
            let metrics = *sf.evaluate(linked, lifetime);
            debug!(
                sf = %sf.id,
                rf = metrics.rf,
                mpfl = metrics.mpfl,
                mpfd = metrics.mpfd,
                spfm = metrics.spfm,
                lfm = metrics.lfm,
                mphf = metrics.mphf,
                "evaluated safety function"
            );
        }
    }

    /// Evaluate every safety function with the project's own lifetime
    pub fn evaluate_all(&mut self) {
        self.evaluate(self.lifetime);
    }

    /// Refresh every failure mode's derived rates, then evaluate
    pub fn recalculate(&mut self) {
        for component in &mut self.components {
            component.recompute_failure_modes();
        }
        self.evaluate_all();
    }

    /// Components whose own rate differs from the sum of their failure modes
    ///
    /// Components without failure modes are not reported.
    pub fn rate_divergences(&self) -> Vec<(&Component, f64)> {
        self.components
            .iter()
            .filter(|c| !c.failure_modes.is_empty())
            .filter_map(|c| {
                let sum = c.failure_mode_rate_sum();
                let tolerance = 1e-9 * c.failure_rate.abs().max(1.0);
                ((sum - c.failure_rate).abs() > tolerance).then_some((c, sum))
            })
            .collect()
    }
}

fn linked_components<'a>(
    links: &'a [Link],
    components: &'a [Component],
    sf_key: String,
) -> impl Iterator<Item = &'a Component> + 'a {
    links
        .iter()
        .filter(move |l| l.safety_function.as_str() == sf_key)
        .filter_map(move |l| components.iter().find(|c| c.id == l.component))
}
