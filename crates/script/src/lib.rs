#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Cascade Script
//!
//! What code a parameter runs, and how it is run.
//!
//! - [`ScriptRef`]: an inline primary/fallback pair or a pointer into a
//!   script catalog. Immutable once built.
//! - [`SandboxGate`] and [`ScriptCatalog`]: the two ports a host implements
//!   to approve, run and look up scripts.
//! - [`ScriptExecutor`]: runs a reference under a timeout and a
//!   cancellation token, falling back to the secondary script when the
//!   primary fails.
//! - [`InProcessSandbox`] and [`InMemoryCatalog`]: closure-backed adapters
//!   for tests and the command line.
//!
//! ```rust,ignore
//! let gate = Arc::new(InProcessSandbox::json_literal().approve_all());
//! let executor = ScriptExecutor::new(gate);
//! let script = ScriptRef::inline(ScriptSource::new("return [1, 2]", false), ScriptSource::empty());
//! let value = executor
//!     .execute(&script, &Bindings::new(JobIdentity::new("demo")), &CancellationToken::new())
//!     .await?;
//! ```

pub mod bindings;
pub mod error;
pub mod executor;
pub mod inprocess;
pub mod ports;
pub mod reference;

pub use bindings::{Bindings, RawValue};
pub use error::{ExecutionFailure, FailureKind, RunFailure};
pub use executor::ScriptExecutor;
pub use inprocess::{InMemoryCatalog, InProcessSandbox, ScriptRunner, ScriptRunnerFuture};
pub use ports::{CatalogEntry, SandboxGate, ScriptCatalog};
pub use reference::{CatalogScript, InlineScript, ScriptLanguage, ScriptRef, ScriptSource};
