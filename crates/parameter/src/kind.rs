use serde::{Deserialize, Serialize};

/// The kind of a parameter definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Choices computed by a script with no inputs from other parameters.
    Choice,
    /// Choices recomputed from the values of referenced parameters.
    CascadeChoice,
    /// Free-form output (HTML, text, lists) recomputed from referenced
    /// parameters.
    DynamicReference,
}

impl ParameterKind {
    /// Whether definitions of this kind may reference other parameters.
    #[must_use]
    pub fn is_cascading(&self) -> bool {
        !matches!(self, Self::Choice)
    }

    /// Whether the rendered result is offered as a set of choices.
    #[must_use]
    pub fn offers_choices(&self) -> bool {
        !matches!(self, Self::DynamicReference)
    }
}

impl std::fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Choice => "choice",
            Self::CascadeChoice => "cascade_choice",
            Self::DynamicReference => "dynamic_reference",
        })
    }
}
