#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Cascade Runtime
//!
//! Resolution passes over the parameters of one job.
//!
//! This crate provides:
//! - [`ResolutionEngine`] -- orders, evaluates and binds every parameter
//!   of a job into a [`PassSnapshot`]
//! - [`EngineConfig`] -- timeout and language settings loaded from TOML and
//!   the environment
//! - [`JobIdentityResolver`] -- the port the engine asks for a job's current
//!   name before each evaluation
//! - [`InMemoryJobRegistry`] -- a resolver backed by a concurrent map that
//!   supports renames
//!
//! A pass never fails. Script failures, cycles and dangling references all
//! degrade to empty results and show up in the snapshot instead.

pub mod config;
pub mod engine;
pub mod error;
pub mod identity;
pub mod registry;
pub mod snapshot;

pub use config::{ConfigError, EngineConfig};
pub use engine::ResolutionEngine;
pub use error::RuntimeError;
pub use identity::JobIdentityResolver;
pub use registry::InMemoryJobRegistry;
pub use snapshot::{Diagnostic, DiagnosticKind, PassSnapshot};
