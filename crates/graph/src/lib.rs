//! # Cascade Graph
//!
//! Evaluation order for cascading parameters.
//!
//! A parameter depends on every referenced parameter that exists in the
//! same job. [`DependencyGraph`] orders definitions so that dependencies
//! come first, breaking ties by declaration order, and sets aside the
//! members of dependency cycles instead of failing the whole job.
//! [`validate_parameters`] reports every configuration problem at once.

pub mod error;
pub mod graph;
pub mod validate;

pub use error::GraphError;
pub use graph::{DependencyGraph, EvaluationPlan};
pub use validate::{ConfigIssue, validate_parameters};
