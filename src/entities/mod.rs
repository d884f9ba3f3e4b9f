//! Entity type definitions

pub mod component;
pub mod failure_mode;
pub mod safety;
pub mod safety_function;

pub use component::Component;
pub use failure_mode::{FailureMode, SafetyMechanism};
pub use safety::{Asil, TargetLevel};
pub use safety_function::SafetyFunction;
