//! Ports a host implements to approve, run and look up scripts.
//!
//! The executor depends on these traits, never on a concrete sandbox.
//! Both are object-safe and used behind `Arc<dyn …>`.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::bindings::{Bindings, RawValue};
use crate::error::RunFailure;
use crate::reference::{ScriptLanguage, ScriptSource};

/// Approval gate and runner for script text.
///
/// Implemented by:
/// - [`InProcessSandbox`](crate::InProcessSandbox): closure runner with an
///   approval set, for tests and the command line
/// - host adapters wrapping a real script engine and its approval queue
#[async_trait]
pub trait SandboxGate: Send + Sync {
    /// Whether `source` may run in `language`.
    async fn is_approved(&self, source: &ScriptSource, language: &ScriptLanguage) -> bool;

    /// Run `source` with `bindings` visible to it.
    ///
    /// `cancel` is the cancellation hook: it fires when the evaluation is
    /// cancelled or its time budget runs out, and long-running runners
    /// should stop and return [`RunFailure::Cancelled`].
    async fn run(
        &self,
        source: &ScriptSource,
        language: &ScriptLanguage,
        bindings: &Bindings,
        cancel: CancellationToken,
    ) -> Result<RawValue, RunFailure>;
}

/// A script stored in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// The script itself.
    pub source: ScriptSource,
    /// Declared arguments with their default values.
    #[serde(default)]
    pub declared_parameters: IndexMap<String, String>,
}

impl CatalogEntry {
    /// An entry without declared arguments.
    pub fn new(source: ScriptSource) -> Self {
        Self {
            source,
            declared_parameters: IndexMap::new(),
        }
    }

    /// Declare an argument with its default.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, default: impl Into<String>) -> Self {
        self.declared_parameters.insert(name.into(), default.into());
        self
    }
}

/// Lookup of catalog scripts by id.
#[async_trait]
pub trait ScriptCatalog: Send + Sync {
    /// Find the entry stored under `catalog_id`.
    async fn find_script(&self, catalog_id: &str) -> Option<CatalogEntry>;
}
