use std::num::NonZeroU32;

use cascade_core::ParameterName;
use serde::{Deserialize, Serialize};

/// Descriptive fields shared by every parameter definition.
///
/// Separate from the script and the rendering options, which depend on
/// the parameter kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterMetadata {
    /// Name the value is bound under; unique within a job.
    pub name: ParameterName,

    /// Help text shown next to the field.
    #[serde(default)]
    pub description: String,

    /// Element id the host may use to address the rendered field.
    #[serde(default = "generate_random_name")]
    pub random_name: String,

    /// Whether the host offers a filter box over the choices.
    #[serde(default)]
    pub filterable: bool,

    /// Characters typed before the filter applies.
    #[serde(default = "one")]
    pub filter_length: NonZeroU32,
}

impl ParameterMetadata {
    /// Metadata with a generated element id and no filter.
    #[must_use]
    pub fn new(name: ParameterName) -> Self {
        Self {
            name,
            description: String::new(),
            random_name: generate_random_name(),
            filterable: false,
            filter_length: NonZeroU32::MIN,
        }
    }
}

/// A fresh element id, `choice-parameter-<hex>`.
#[must_use]
pub fn generate_random_name() -> String {
    format!("choice-parameter-{}", uuid::Uuid::new_v4().simple())
}

pub(crate) fn one() -> NonZeroU32 {
    NonZeroU32::MIN
}
