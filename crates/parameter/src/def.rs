use cascade_core::ParameterName;
use cascade_script::{ExecutionFailure, ScriptExecutor, ScriptRef};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::context::EvaluationContext;
use crate::kind::ParameterKind;
use crate::metadata::ParameterMetadata;
use crate::render::RenderType;
use crate::result::RenderedResult;
use crate::types::*;

/// A concrete parameter definition, tagged by kind.
///
/// The `kind` field in JSON selects the variant. A definition holds no
/// evaluation state: every evaluation is a function of the definition and
/// the context it is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParameterDef {
    Choice(ChoiceParameter),
    CascadeChoice(CascadeChoiceParameter),
    DynamicReference(DynamicReferenceParameter),
}

macro_rules! delegate {
    ($self:ident => $method:ident) => {
        match $self {
            Self::Choice(p) => p.$method(),
            Self::CascadeChoice(p) => p.$method(),
            Self::DynamicReference(p) => p.$method(),
        }
    };
}

impl ParameterDef {
    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &ParameterName {
        &self.metadata().name
    }

    /// The parameter kind.
    #[must_use]
    pub fn kind(&self) -> ParameterKind {
        match self {
            Self::Choice(_) => ParameterKind::Choice,
            Self::CascadeChoice(_) => ParameterKind::CascadeChoice,
            Self::DynamicReference(_) => ParameterKind::DynamicReference,
        }
    }

    /// Shared metadata.
    #[must_use]
    pub fn metadata(&self) -> &ParameterMetadata {
        delegate!(self => metadata)
    }

    /// The script.
    #[must_use]
    pub fn script(&self) -> &ScriptRef {
        delegate!(self => script)
    }

    /// Names whose values the script reads; empty for a plain choice.
    #[must_use]
    pub fn referenced_parameters(&self) -> &[ParameterName] {
        match self {
            Self::Choice(_) => &[],
            Self::CascadeChoice(p) => p.referenced_parameters(),
            Self::DynamicReference(p) => p.referenced_parameters(),
        }
    }

    /// The render type.
    #[must_use]
    pub fn render_type(&self) -> RenderType {
        match self {
            Self::Choice(p) => p.render_type().into(),
            Self::CascadeChoice(p) => p.render_type().into(),
            Self::DynamicReference(p) => p.render_type().into(),
        }
    }

    /// Evaluate the script and normalize its result.
    ///
    /// The context is narrowed to the declared referenced names first, so
    /// nothing else is visible to the script.
    pub async fn try_evaluate(
        &self,
        executor: &ScriptExecutor,
        context: &EvaluationContext,
        cancel: &CancellationToken,
    ) -> Result<RenderedResult, ExecutionFailure> {
        let bindings = context.restricted(self.referenced_parameters()).to_bindings();
        let raw = executor.execute(self.script(), &bindings, cancel).await?;
        Ok(RenderedResult::from_raw(raw))
    }

    /// Like [`try_evaluate`](Self::try_evaluate), degrading any failure to
    /// the empty result.
    pub async fn evaluate(
        &self,
        executor: &ScriptExecutor,
        context: &EvaluationContext,
        cancel: &CancellationToken,
    ) -> RenderedResult {
        match self.try_evaluate(executor, context, cancel).await {
            Ok(result) => {
                tracing::debug!(
                    parameter = %self.name(),
                    choices = %result.choices_as_string(),
                    "parameter evaluated"
                );
                result
            }
            Err(failure) => {
                tracing::warn!(
                    parameter = %self.name(),
                    script = %self.script().describe(),
                    kind = %failure.kind(),
                    error = %failure,
                    "parameter script failed, rendering empty result"
                );
                RenderedResult::empty()
            }
        }
    }

    /// Turn a submitted selection into the parameter's value.
    ///
    /// Multi-select and checkbox parameters join their values with `,`.
    /// Every other render type keeps the first value verbatim.
    #[must_use]
    pub fn create_value(&self, submitted: &[String]) -> serde_json::Value {
        let multi_valued = self
            .render_type()
            .as_choice()
            .is_some_and(|render| render.is_multi_valued());
        let value = if multi_valued {
            submitted.join(",")
        } else {
            submitted.first().cloned().unwrap_or_default()
        };
        serde_json::Value::String(value)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cascade_core::JobIdentity;
    use cascade_script::{InProcessSandbox, RunFailure, ScriptSource};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::render::ChoiceRenderType;
    use crate::values::ParameterValues;

    fn name(raw: &str) -> ParameterName {
        raw.parse().unwrap()
    }

    fn inline(primary: &str, fallback: &str) -> ScriptRef {
        ScriptRef::inline(ScriptSource::new(primary, false), ScriptSource::new(fallback, false))
    }

    /// Echoes every visible binding plus the job name.
    fn echo_executor() -> ScriptExecutor {
        let sandbox = InProcessSandbox::from_fn(|source, bindings, _cancel| async move {
            if source.text() == "fail" {
                return Err(RunFailure::script("boom"));
            }
            let mut seen: Vec<serde_json::Value> = bindings
                .values()
                .iter()
                .map(|(k, v)| json!(format!("{k}={v}")))
                .collect();
            seen.push(json!(bindings.job().name.clone()));
            Ok(serde_json::Value::Array(seen))
        })
        .approve_all();
        ScriptExecutor::new(Arc::new(sandbox))
    }

    fn context(values: ParameterValues) -> EvaluationContext {
        EvaluationContext::new(JobIdentity::new("MyJob"), values)
    }

    #[tokio::test]
    async fn only_referenced_values_are_visible() {
        let def = ParameterDef::CascadeChoice(CascadeChoiceParameter::new(
            name("param002"),
            inline("echo", ""),
            vec![name("param001")],
        ));
        let values = ParameterValues::new()
            .with("param001", json!(1))
            .with("other", json!(2));

        let result = def
            .evaluate(&echo_executor(), &context(values), &CancellationToken::new())
            .await;
        assert_eq!(result, RenderedResult::from_raw(json!(["param001=1", "MyJob"])));
    }

    #[tokio::test]
    async fn plain_choice_sees_no_values() {
        let def = ParameterDef::Choice(ChoiceParameter::new(name("p"), inline("echo", "")));
        let values = ParameterValues::new().with("p", json!("self"));

        let result = def
            .evaluate(&echo_executor(), &context(values), &CancellationToken::new())
            .await;
        assert_eq!(result.choices_as_string(), "{MyJob=MyJob}");
    }

    #[tokio::test]
    async fn failure_degrades_to_empty() {
        let def = ParameterDef::Choice(ChoiceParameter::new(name("p"), inline("fail", "")));
        let ctx = context(ParameterValues::new());

        let err = def
            .try_evaluate(&echo_executor(), &ctx, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), cascade_script::FailureKind::NoFallback);

        let result = def
            .evaluate(&echo_executor(), &ctx, &CancellationToken::new())
            .await;
        assert!(result.is_empty());
    }

    #[test]
    fn accessors_delegate() {
        let def = ParameterDef::DynamicReference(DynamicReferenceParameter::new(
            name("info"),
            inline("[]", ""),
            vec![name("a")],
        ));
        assert_eq!(def.name(), "info");
        assert_eq!(def.kind(), ParameterKind::DynamicReference);
        assert_eq!(def.render_type(), RenderType::FormattedHtml);
        assert_eq!(def.referenced_parameters(), [name("a")]);
    }

    #[test]
    fn create_value_joins_multi_selection() {
        for render in [ChoiceRenderType::MultiSelect, ChoiceRenderType::Checkbox] {
            let def = ParameterDef::Choice(
                ChoiceParameter::new(name("p"), inline("[]", "")).with_render_type(render),
            );
            assert_eq!(def.create_value(&["a".into()]), json!("a"));
            assert_eq!(def.create_value(&["a".into(), "b".into()]), json!("a,b"));
            assert_eq!(def.create_value(&[]), json!(""));
        }
    }

    #[test]
    fn create_value_keeps_single_selection() {
        let single = ParameterDef::Choice(ChoiceParameter::new(name("p"), inline("[]", "")));
        assert_eq!(single.create_value(&["a".into(), "b".into()]), json!("a"));
        assert_eq!(single.create_value(&[]), json!(""));

        let html = ParameterDef::DynamicReference(DynamicReferenceParameter::new(
            name("info"),
            inline("[]", ""),
            vec![],
        ));
        assert_eq!(html.create_value(&["<b>x</b>".into(), "y".into()]), json!("<b>x</b>"));
    }

    #[test]
    fn tagged_by_kind() {
        let def = ParameterDef::Choice(ChoiceParameter::new(name("p"), inline("[]", "")));
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["kind"], "choice");
        assert_eq!(json["name"], "p");
    }
}
