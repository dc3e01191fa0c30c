use std::num::NonZeroU32;

use cascade_core::ParameterName;
use cascade_script::ScriptRef;
use serde::{Deserialize, Serialize};

use crate::metadata::{ParameterMetadata, one};
use crate::render::ChoiceRenderType;

/// Choices recomputed from the current values of referenced parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeChoiceParameter {
    #[serde(flatten)]
    metadata: ParameterMetadata,

    script: ScriptRef,

    #[serde(default, deserialize_with = "crate::types::referenced::deserialize")]
    referenced_parameters: Vec<ParameterName>,

    #[serde(default)]
    render_type: ChoiceRenderType,

    #[serde(default = "one")]
    visible_item_count: NonZeroU32,
}

impl CascadeChoiceParameter {
    /// A single-select parameter that reads `referenced`.
    #[must_use]
    pub fn new(name: ParameterName, script: ScriptRef, referenced: Vec<ParameterName>) -> Self {
        Self {
            metadata: ParameterMetadata::new(name),
            script,
            referenced_parameters: referenced,
            render_type: ChoiceRenderType::default(),
            visible_item_count: one(),
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
    pub fn with_render_type(mut self, render_type: ChoiceRenderType) -> Self {
        self.render_type = render_type;
        self
    }

    /// Set how many items are visible at once.
    #[must_use]
    pub fn with_visible_item_count(mut self, count: NonZeroU32) -> Self {
        self.visible_item_count = count;
        self
    }

    /// Offer a filter box that applies after `length` characters.
    #[must_use]
    pub fn with_filter(mut self, length: NonZeroU32) -> Self {
        self.metadata.filterable = true;
        self.metadata.filter_length = length;
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
    pub fn render_type(&self) -> ChoiceRenderType {
        self.render_type
    }

    /// Items visible at once.
    #[must_use]
    pub fn visible_item_count(&self) -> NonZeroU32 {
        self.visible_item_count
    }
}
