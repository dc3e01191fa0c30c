/// Error type for parameter operations.
///
/// Evaluation never fails with this type; it covers loading, saving and
/// editing collections of definitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParameterError {
    /// A stored record is malformed: bad JSON, a missing required field, an
    /// empty name, or a render type the parameter kind does not support.
    #[error("failed to load parameters: {reason}")]
    Load { reason: String },

    /// Parameter with the given name was not found.
    #[error("parameter not found: `{name}`")]
    NotFound { name: String },

    /// A parameter with the given name already exists.
    #[error("parameter already exists: `{name}`")]
    AlreadyExists { name: String },

    /// Failed to serialize definitions.
    #[error("serialization failed: {error}")]
    Serialization { error: String },
}

impl ParameterError {
    /// Convenience constructor for [`ParameterError::Load`].
    pub fn load(reason: impl std::fmt::Display) -> Self {
        Self::Load {
            reason: reason.to_string(),
        }
    }

    /// Broad error category for grouping in logs.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::Load { .. } | Self::Serialization { .. } => "serialization",
            Self::NotFound { .. } | Self::AlreadyExists { .. } => "lookup",
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Load { .. } => "PARAM_LOAD",
            Self::NotFound { .. } => "PARAM_NOT_FOUND",
            Self::AlreadyExists { .. } => "PARAM_ALREADY_EXISTS",
            Self::Serialization { .. } => "PARAM_SER",
        }
    }
}
