//! FMEDA: hardware safety metrics for functional-safety analyses
//!
//! A project holds safety functions and a bill of materials whose
//! components carry failure modes. Evaluating the project derives, per
//! safety function, the residual/latent/detected fault rates and the
//! SPFM, LFM and MPHF metrics.

pub mod cli;
pub mod core;
pub mod entities;
