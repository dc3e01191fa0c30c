use std::num::NonZeroU32;

use cascade_core::ParameterName;
use cascade_script::ScriptRef;
use serde::{Deserialize, Serialize};

use crate::metadata::{ParameterMetadata, one};
use crate::render::ChoiceRenderType;

/// Choices computed by a script that reads no other parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceParameter {
    #[serde(flatten)]
    metadata: ParameterMetadata,

    script: ScriptRef,

    #[serde(default)]
    render_type: ChoiceRenderType,

    #[serde(default = "one")]
    visible_item_count: NonZeroU32,
}

impl ChoiceParameter {
    /// A single-select parameter showing one item at a time.
    #[must_use]
    pub fn new(name: ParameterName, script: ScriptRef) -> Self {
        Self {
            metadata: ParameterMetadata::new(name),
            script,
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
