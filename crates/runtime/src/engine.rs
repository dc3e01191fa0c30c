//! Resolution engine -- runs one pass over a job's parameters.
//!
//! A pass orders the definitions by dependency, evaluates them one at a
//! time and feeds each parameter's default value to the parameters that
//! reference it. Nothing is cached between passes.

use std::collections::HashSet;
use std::sync::Arc;

use cascade_core::{JobHandle, JobIdentity, ParameterName};
use cascade_graph::DependencyGraph;
use cascade_parameter::{BoundValues, EvaluationContext, ParameterDef, RawValues, RenderedResult};
use cascade_script::{ExecutionFailure, FailureKind, SandboxGate, ScriptCatalog, ScriptExecutor};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::config::EngineConfig;
use crate::error::RuntimeError;
use crate::identity::JobIdentityResolver;
use crate::snapshot::{Diagnostic, PassSnapshot};

/// Resolves every parameter of a job into a [`PassSnapshot`].
///
/// The engine holds only shared collaborators, so one engine can serve
/// any number of concurrent passes. Each pass owns its bound values.
///
/// 1. Order the definitions with a [`DependencyGraph`]; cycle members are
///    set aside and render empty
/// 2. Seed the bound values with the submitted raw values of names no
///    definition produces
/// 3. For each definition in order, re-resolve the job identity, evaluate
///    against the values bound so far and bind the result's default value
///    under the parameter's name
/// 4. Report dangling references and cycles as diagnostics
pub struct ResolutionEngine {
    executor: Arc<ScriptExecutor>,
    resolver: Arc<dyn JobIdentityResolver>,
    report_failures: bool,
}

impl ResolutionEngine {
    /// Create an engine from an executor and an identity resolver.
    pub fn new(executor: Arc<ScriptExecutor>, resolver: Arc<dyn JobIdentityResolver>) -> Self {
        Self {
            executor,
            resolver,
            report_failures: true,
        }
    }

    /// Create an engine whose executor follows `config`.
    pub fn from_config(
        config: &EngineConfig,
        gate: Arc<dyn SandboxGate>,
        catalog: Option<Arc<dyn ScriptCatalog>>,
        resolver: Arc<dyn JobIdentityResolver>,
    ) -> Result<Self, RuntimeError> {
        config.validate()?;
        let executor = Arc::new(config.executor(gate, catalog));
        Ok(Self::new(executor, resolver).with_failure_report(config.report_failures))
    }

    /// Whether [`PassSnapshot::failures`] is filled in.
    #[must_use]
    pub fn with_failure_report(mut self, enabled: bool) -> Self {
        self.report_failures = enabled;
        self
    }

    /// Access the script executor.
    pub fn executor(&self) -> &ScriptExecutor {
        &self.executor
    }

    /// Run one pass over `defs` for `job`.
    pub async fn resolve_pass(
        &self,
        job: &JobHandle,
        defs: &[ParameterDef],
        raw_values: &RawValues,
    ) -> PassSnapshot {
        self.resolve_pass_with_cancel(job, defs, raw_values, &CancellationToken::new())
            .await
    }

    /// Run one pass that stops early once `cancel` fires.
    ///
    /// The evaluation in flight degrades to empty and every parameter after
    /// it renders empty without running its script.
    pub async fn resolve_pass_with_cancel(
        &self,
        job: &JobHandle,
        defs: &[ParameterDef],
        raw_values: &RawValues,
        cancel: &CancellationToken,
    ) -> PassSnapshot {
        let span = tracing::info_span!("resolve_pass", job = %job, parameters = defs.len());
        self.run_pass(job, defs, raw_values, cancel)
            .instrument(span)
            .await
    }

    async fn run_pass(
        &self,
        job: &JobHandle,
        defs: &[ParameterDef],
        raw_values: &RawValues,
        cancel: &CancellationToken,
    ) -> PassSnapshot {
        let graph = DependencyGraph::new(defs);
        let plan = graph.plan();

        let mut snapshot = PassSnapshot::default();
        for def in defs {
            snapshot
                .results
                .entry(def.name().clone())
                .or_insert_with(RenderedResult::empty);
        }

        for (parameter, missing) in graph.dangling_references() {
            let supplied = raw_values.contains(missing.as_str());
            if supplied {
                tracing::warn!(%parameter, %missing, "reference to unknown parameter uses its submitted value");
            } else {
                tracing::warn!(%parameter, %missing, "reference to unknown parameter evaluates as absent");
            }
            snapshot.diagnostics.push(Diagnostic::DanglingReference {
                parameter: parameter.clone(),
                missing: missing.clone(),
                supplied,
            });
        }

        // Submitted values only stand in for names no definition produces.
        let mut bound: BoundValues = raw_values
            .iter()
            .filter(|(name, _)| !snapshot.results.contains_key(*name))
            .map(|(name, value)| (name, value.clone()))
            .collect();
        for err in plan.cycle_errors() {
            tracing::warn!(error = %err, "cycle members render empty");
            snapshot.diagnostics.push(err.into());
        }

        let mut produced: HashSet<&str> = HashSet::with_capacity(plan.order.len());
        for def in &plan.order {
            let name = def.name();
            if !produced.insert(name.as_str()) {
                tracing::warn!(parameter = %name, "duplicate parameter name, later definition skipped");
                continue;
            }
            snapshot.order.push(name.clone());

            if cancel.is_cancelled() {
                tracing::debug!(parameter = %name, "pass cancelled, rendering empty");
                self.record_failure(&mut snapshot, name, FailureKind::Cancelled);
                continue;
            }

            let span = tracing::debug_span!("evaluate", parameter = %name, kind = %def.kind());
            match self.evaluate(job, def, &bound, cancel).instrument(span).await {
                Ok(result) => {
                    tracing::debug!(
                        parameter = %name,
                        choices = %result.choices_as_string(),
                        "parameter evaluated"
                    );
                    if let Some(value) = result.default_value() {
                        bound.set(name.as_str(), value);
                    }
                    snapshot.results.insert(name.clone(), result);
                }
                Err(failure) => {
                    tracing::warn!(
                        parameter = %name,
                        script = %def.script().describe(),
                        kind = %failure.kind(),
                        error = %failure,
                        "parameter script failed, rendering empty result"
                    );
                    self.record_failure(&mut snapshot, name, failure.kind());
                }
            }
        }

        snapshot.bound_values = bound;
        tracing::info!(
            evaluated = snapshot.order.len(),
            degraded = snapshot.failures.len(),
            diagnostics = snapshot.diagnostics.len(),
            cancelled = cancel.is_cancelled(),
            "resolution pass finished"
        );
        snapshot
    }

    async fn evaluate(
        &self,
        job: &JobHandle,
        def: &ParameterDef,
        bound: &BoundValues,
        cancel: &CancellationToken,
    ) -> Result<RenderedResult, ExecutionFailure> {
        let identity = match self.resolver.current_identity(job).await {
            Some(identity) => identity,
            None => {
                tracing::warn!(%job, "job not found, evaluating with an unknown identity");
                JobIdentity::unknown()
            }
        };
        let context = EvaluationContext::new(identity, bound.clone());
        def.try_evaluate(&self.executor, &context, cancel).await
    }

    fn record_failure(&self, snapshot: &mut PassSnapshot, name: &ParameterName, kind: FailureKind) {
        if self.report_failures {
            snapshot.failures.insert(name.clone(), kind);
        }
    }
}

impl std::fmt::Debug for ResolutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionEngine")
            .field("executor", &self.executor)
            .field("report_failures", &self.report_failures)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use cascade_parameter::types::{CascadeChoiceParameter, ChoiceParameter};
    use cascade_script::{InProcessSandbox, ScriptRef, ScriptSource};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::registry::InMemoryJobRegistry;

    fn name(raw: &str) -> ParameterName {
        raw.parse().unwrap()
    }

    fn choice(n: &str, script: &str) -> ParameterDef {
        ParameterDef::Choice(ChoiceParameter::new(
            name(n),
            ScriptRef::inline(ScriptSource::new(script, false), ScriptSource::empty()),
        ))
    }

    fn cascade(n: &str, script: &str, refs: &[&str]) -> ParameterDef {
        ParameterDef::CascadeChoice(CascadeChoiceParameter::new(
            name(n),
            ScriptRef::inline(ScriptSource::new(script, false), ScriptSource::empty()),
            refs.iter().map(|r| name(r)).collect(),
        ))
    }

    fn engine() -> (ResolutionEngine, JobHandle) {
        let registry = Arc::new(InMemoryJobRegistry::new());
        let handle = registry.register(JobIdentity::new("MyJob"));
        let gate = Arc::new(InProcessSandbox::json_literal().approve_all());
        let engine = ResolutionEngine::new(Arc::new(ScriptExecutor::new(gate)), registry);
        (engine, handle)
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResolutionEngine>();
    }

    #[tokio::test]
    async fn results_follow_declaration_order() {
        let (engine, job) = engine();
        let defs = vec![
            cascade("second", "[2]", &["first"]),
            choice("first", "[1]"),
        ];
        let snapshot = engine.resolve_pass(&job, &defs, &RawValues::new()).await;

        assert_eq!(snapshot.order, vec![name("first"), name("second")]);
        let keys: Vec<&str> = snapshot.results.keys().map(ParameterName::as_str).collect();
        assert_eq!(keys, vec!["second", "first"]);
        assert!(snapshot.is_clean());
    }

    #[tokio::test]
    async fn failures_are_reported_by_kind() {
        let (engine, job) = engine();
        let defs = vec![choice("broken", "not json"), choice("fine", "[1]")];
        let snapshot = engine.resolve_pass(&job, &defs, &RawValues::new()).await;

        assert!(snapshot.result("broken").unwrap().is_empty());
        assert_eq!(snapshot.result("fine").unwrap().len(), 1);
        assert_eq!(snapshot.failures.get("broken"), Some(&FailureKind::NoFallback));
        assert_eq!(snapshot.failures.len(), 1);
    }

    #[tokio::test]
    async fn failure_report_can_be_disabled() {
        let (engine, job) = engine();
        let engine = engine.with_failure_report(false);
        let snapshot = engine
            .resolve_pass(&job, &[choice("broken", "not json")], &RawValues::new())
            .await;
        assert!(snapshot.failures.is_empty());
    }

    #[tokio::test]
    async fn empty_result_drops_submitted_value() {
        let (engine, job) = engine();
        let defs = vec![choice("param001", "[]")];
        let raw = RawValues::new()
            .with("param001", json!("typed"))
            .with("extra", json!("kept"));
        let snapshot = engine.resolve_pass(&job, &defs, &raw).await;

        assert!(snapshot.result("param001").unwrap().is_empty());
        assert_eq!(snapshot.bound_values.get("param001"), None);
        assert_eq!(snapshot.bound_values.get("extra"), Some(&json!("kept")));
    }

    #[tokio::test]
    async fn computed_default_replaces_submitted_value() {
        let (engine, job) = engine();
        let defs = vec![choice("param001", r#"["a", "b:selected"]"#)];
        let raw = RawValues::new().with("param001", json!("typed"));
        let snapshot = engine.resolve_pass(&job, &defs, &raw).await;
        assert_eq!(snapshot.bound_values.get("param001"), Some(&json!("b")));
    }

    #[tokio::test]
    async fn cancelled_pass_runs_no_scripts() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let gate = InProcessSandbox::from_fn(move |_source, _bindings, _cancel| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(json!([1])) }
        })
        .approve_all();
        let registry = Arc::new(InMemoryJobRegistry::new());
        let job = registry.register(JobIdentity::new("MyJob"));
        let engine = ResolutionEngine::new(Arc::new(ScriptExecutor::new(Arc::new(gate))), registry);

        let cancel = CancellationToken::new();
        cancel.cancel();
        let defs = vec![choice("a", "[1]"), choice("b", "[1]")];
        let snapshot = engine
            .resolve_pass_with_cancel(&job, &defs, &RawValues::new(), &cancel)
            .await;

        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(snapshot.results.values().all(RenderedResult::is_empty));
        assert_eq!(snapshot.failures.get("b"), Some(&FailureKind::Cancelled));
    }

    #[tokio::test]
    async fn from_config_rejects_zero_timeout() {
        let config = EngineConfig {
            script_timeout: std::time::Duration::ZERO,
            ..EngineConfig::default()
        };
        let gate = Arc::new(InProcessSandbox::json_literal());
        let err = ResolutionEngine::from_config(&config, gate, None, Arc::new(InMemoryJobRegistry::new()))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Config(_)));
    }
}
