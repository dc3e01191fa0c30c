use cascade_core::ParameterName;
use cascade_script::ScriptRef;
use serde::{Deserialize, Serialize};

use crate::metadata::ParameterMetadata;
use crate::render::DynamicRenderType;

/// Free-form output recomputed from referenced parameters.
///
/// The script result is rendered as HTML, a text box or a list rather
/// than offered as choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicReferenceParameter {
    #[serde(flatten)]
    metadata: ParameterMetadata,

    script: ScriptRef,

    #[serde(default, deserialize_with = "crate::types::referenced::deserialize")]
    referenced_parameters: Vec<ParameterName>,

    #[serde(default)]
    render_type: DynamicRenderType,

    /// Leave out the hidden `value` input that carries formatted HTML.
    #[serde(default)]
    omit_value_field: bool,
}

impl DynamicReferenceParameter {
    /// A formatted-HTML reference that reads `referenced`.
    #[must_use]
    pub fn new(name: ParameterName, script: ScriptRef, referenced: Vec<ParameterName>) -> Self {
        Self {
            metadata: ParameterMetadata::new(name),
            script,
            referenced_parameters: referenced,
            render_type: DynamicRenderType::default(),
            omit_value_field: false,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = description.into();
        self
    }

    /// Set the render type.
    #[must_use]
    pub fn with_render_type(mut self, render_type: DynamicRenderType) -> Self {
        self.render_type = render_type;
        self
    }

    /// Leave out the hidden value input.
    #[must_use]
    pub fn with_omit_value_field(mut self, omit: bool) -> Self {
        self.omit_value_field = omit;
        self
    }

    /// Shared metadata.
    #[must_use]
    pub fn metadata(&self) -> &ParameterMetadata {
        &self.metadata
    }

    /// The script.
    #[must_use]
    pub fn script(&self) -> &ScriptRef {
        &self.script
    }

    /// Names whose values the script reads, in declared order.
    #[must_use]
    pub fn referenced_parameters(&self) -> &[ParameterName] {
        &self.referenced_parameters
    }

    /// The render type.
    #[must_use]
    pub fn render_type(&self) -> DynamicRenderType {
        self.render_type
    }

    /// Whether the hidden value input is left out.
    #[must_use]
    pub fn omit_value_field(&self) -> bool {
        self.omit_value_field
    }
}
