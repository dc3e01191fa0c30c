//! In-process adapters for the script ports.
//!
//! [`InProcessSandbox`] runs scripts through a runtime-provided closure and
//! approves them from an in-memory set. [`InMemoryCatalog`] stores catalog
//! entries in a concurrent map. Both are used by tests and the command line;
//! hosts with a real script engine provide their own [`SandboxGate`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use tokio_util::sync::CancellationToken;

use crate::bindings::{Bindings, RawValue};
use crate::error::RunFailure;
use crate::ports::{CatalogEntry, SandboxGate, ScriptCatalog};
use crate::reference::{ScriptLanguage, ScriptSource};

/// Boxed future returned by a [`ScriptRunner`].
pub type ScriptRunnerFuture = Pin<Box<dyn Future<Output = Result<RawValue, RunFailure>> + Send>>;

/// Callback that evaluates one script.
///
/// Receives owned copies of the source and bindings so the returned future
/// can be `'static`, and the cancellation hook it should honour.
pub type ScriptRunner =
    Arc<dyn Fn(ScriptSource, Bindings, CancellationToken) -> ScriptRunnerFuture + Send + Sync>;

/// Sandbox that evaluates scripts in the current process.
///
/// Sandboxed sources are always approved. Other sources must be approved by
/// text with [`approve`](Self::approve), unless the sandbox was built with
/// [`approve_all`](Self::approve_all).
pub struct InProcessSandbox {
    runner: ScriptRunner,
    approved: DashSet<String>,
    approve_all: bool,
}

impl InProcessSandbox {
    /// Create a sandbox around `runner`.
    pub fn new(runner: ScriptRunner) -> Self {
        Self {
            runner,
            approved: DashSet::new(),
            approve_all: false,
        }
    }

    /// Create a sandbox from an async closure.
    pub fn from_fn<F, Fut>(runner: F) -> Self
    where
        F: Fn(ScriptSource, Bindings, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<RawValue, RunFailure>> + Send + 'static,
    {
        Self::new(Arc::new(move |source, bindings, cancel| {
            Box::pin(runner(source, bindings, cancel))
        }))
    }

    /// A sandbox whose "language" is JSON.
    ///
    /// The text, with an optional leading `return` keyword, is parsed as a
    /// JSON document and that document is the result. Text that does not
    /// parse is a script error, so the fallback protocol can be exercised
    /// without a script engine.
    pub fn json_literal() -> Self {
        Self::from_fn(|source, _bindings, _cancel| async move { evaluate_json_literal(source.text()) })
    }

    /// Approve every source.
    #[must_use]
    pub fn approve_all(mut self) -> Self {
        self.approve_all = true;
        self
    }

    /// Approve one script by its exact text.
    pub fn approve(&self, text: impl Into<String>) {
        self.approved.insert(text.into());
    }

    /// Withdraw a previous approval.
    pub fn revoke(&self, text: &str) {
        self.approved.remove(text);
    }
}

fn evaluate_json_literal(text: &str) -> Result<RawValue, RunFailure> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("return")
        .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        .unwrap_or(trimmed);
    serde_json::from_str(body).map_err(RunFailure::script)
}

#[async_trait]
impl SandboxGate for InProcessSandbox {
    async fn is_approved(&self, source: &ScriptSource, _language: &ScriptLanguage) -> bool {
        self.approve_all || source.is_sandboxed() || self.approved.contains(source.text())
    }

    async fn run(
        &self,
        source: &ScriptSource,
        language: &ScriptLanguage,
        bindings: &Bindings,
        cancel: CancellationToken,
    ) -> Result<RawValue, RunFailure> {
        tracing::debug!(%language, sandboxed = source.is_sandboxed(), bound = bindings.len(), "running script in-process");

        if cancel.is_cancelled() {
            return Err(RunFailure::Cancelled);
        }

        let result = (self.runner)(source.clone(), bindings.clone(), cancel).await;

        match &result {
            Ok(_) => tracing::trace!("script completed"),
            Err(e) => tracing::debug!(error = %e, "script failed"),
        }

        result
    }
}

impl std::fmt::Debug for InProcessSandbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InProcessSandbox")
            .field("approved", &self.approved.len())
            .field("approve_all", &self.approve_all)
            .finish_non_exhaustive()
    }
}

/// Catalog backed by a concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    entries: DashMap<String, CatalogEntry>,
}

impl InMemoryCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_script(self, catalog_id: impl Into<String>, entry: CatalogEntry) -> Self {
        self.insert(catalog_id, entry);
        self
    }

    /// Store or replace an entry.
    pub fn insert(&self, catalog_id: impl Into<String>, entry: CatalogEntry) {
        self.entries.insert(catalog_id.into(), entry);
    }

    /// Remove an entry, returning it if present.
    pub fn remove(&self, catalog_id: &str) -> Option<CatalogEntry> {
        self.entries.remove(catalog_id).map(|(_, entry)| entry)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ScriptCatalog for InMemoryCatalog {
    async fn find_script(&self, catalog_id: &str) -> Option<CatalogEntry> {
        self.entries.get(catalog_id).map(|entry| entry.value().clone())
    }
}
