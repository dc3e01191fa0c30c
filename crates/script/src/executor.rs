//! The script executor: gate, run, fall back.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::bindings::{Bindings, RawValue};
use crate::error::{ExecutionFailure, RunFailure};
use crate::ports::{SandboxGate, ScriptCatalog};
use crate::reference::{CatalogScript, InlineScript, ScriptLanguage, ScriptRef, ScriptSource};

/// Runs [`ScriptRef`]s through a [`SandboxGate`].
///
/// The executor holds no per-evaluation state and is shared across passes
/// behind an `Arc`.
///
/// For an inline reference the primary is gated and run first. Any failure
/// other than cancellation moves on to the fallback, which passes through
/// the gate on its own. A catalog reference is looked up, has its arguments
/// layered over the bindings, then is gated and run; it has no fallback.
pub struct ScriptExecutor {
    gate: Arc<dyn SandboxGate>,
    catalog: Option<Arc<dyn ScriptCatalog>>,
    language: ScriptLanguage,
    timeout: Duration,
}

impl ScriptExecutor {
    /// Time budget for a single run when none is configured.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Executor with the default language and timeout and no catalog.
    pub fn new(gate: Arc<dyn SandboxGate>) -> Self {
        Self {
            gate,
            catalog: None,
            language: ScriptLanguage::default(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Resolve catalog references through `catalog`.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn ScriptCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Language passed to the gate.
    #[must_use]
    pub fn with_language(mut self, language: ScriptLanguage) -> Self {
        self.language = language;
        self
    }

    /// Per-run time budget.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured language.
    pub fn language(&self) -> &ScriptLanguage {
        &self.language
    }

    /// The configured per-run time budget.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Execute `script` with `bindings`.
    pub async fn execute(
        &self,
        script: &ScriptRef,
        bindings: &Bindings,
        cancel: &CancellationToken,
    ) -> Result<RawValue, ExecutionFailure> {
        match script {
            ScriptRef::Inline(inline) => self.execute_inline(inline, bindings, cancel).await,
            ScriptRef::Catalog(catalog) => self.execute_catalog(catalog, bindings, cancel).await,
        }
    }

    async fn execute_inline(
        &self,
        inline: &InlineScript,
        bindings: &Bindings,
        cancel: &CancellationToken,
    ) -> Result<RawValue, ExecutionFailure> {
        let primary = match self.run_source(inline.primary(), bindings, cancel).await {
            Ok(value) => return Ok(value),
            Err(ExecutionFailure::Cancelled) => return Err(ExecutionFailure::Cancelled),
            Err(failure) => failure,
        };

        if !inline.has_fallback() {
            return Err(ExecutionFailure::NoFallback {
                primary: Box::new(primary),
            });
        }

        tracing::debug!(kind = %primary.kind(), error = %primary, "primary script failed, running fallback");

        match self.run_source(inline.fallback(), bindings, cancel).await {
            Ok(value) => Ok(value),
            Err(ExecutionFailure::Cancelled) => Err(ExecutionFailure::Cancelled),
            Err(fallback) => Err(ExecutionFailure::FallbackFailed {
                primary: Box::new(primary),
                fallback: Box::new(fallback),
            }),
        }
    }

    async fn execute_catalog(
        &self,
        script: &CatalogScript,
        bindings: &Bindings,
        cancel: &CancellationToken,
    ) -> Result<RawValue, ExecutionFailure> {
        let entry = match &self.catalog {
            Some(catalog) => catalog.find_script(script.catalog_id()).await,
            None => None,
        };

        let Some(entry) = entry else {
            if script.is_required() {
                return Err(ExecutionFailure::ScriptNotFound {
                    catalog_id: script.catalog_id().to_owned(),
                });
            }
            tracing::debug!(catalog_id = script.catalog_id(), "catalog script missing, using empty result");
            return Ok(RawValue::Array(Vec::new()));
        };

        let layered = bindings.layered(&entry.declared_parameters, script.parameters());
        self.run_source(&entry.source, &layered, cancel).await
    }

    /// Gate and run one source under the time budget and `cancel`.
    async fn run_source(
        &self,
        source: &ScriptSource,
        bindings: &Bindings,
        cancel: &CancellationToken,
    ) -> Result<RawValue, ExecutionFailure> {
        if cancel.is_cancelled() {
            return Err(ExecutionFailure::Cancelled);
        }

        if !self.gate.is_approved(source, &self.language).await {
            return Err(ExecutionFailure::NotApproved);
        }

        let hook = cancel.child_token();
        let run = tokio::time::timeout(
            self.timeout,
            self.gate.run(source, &self.language, bindings, hook.clone()),
        );

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(ExecutionFailure::Cancelled),
            outcome = run => match outcome {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(RunFailure::Cancelled)) => Err(ExecutionFailure::Cancelled),
                Ok(Err(failure)) => Err(failure.into()),
                Err(_elapsed) => {
                    hook.cancel();
                    Err(ExecutionFailure::Timeout { after: self.timeout })
                }
            },
        }
    }
}

impl std::fmt::Debug for ScriptExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptExecutor")
            .field("language", &self.language)
            .field("timeout", &self.timeout)
            .field("catalog", &self.catalog.is_some())
            .finish_non_exhaustive()
    }
}
