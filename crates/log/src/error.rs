//! Error handling for cascade-log

/// Result type for logger operations.
pub type LogResult<T> = Result<T, LogError>;

/// Errors raised while installing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The level/filter directive could not be parsed.
    #[error("invalid filter '{filter}': {reason}")]
    Filter {
        /// The directive as configured.
        filter: String,
        /// Parser message.
        reason: String,
    },

    /// A global subscriber was already installed.
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}

impl LogError {
    /// Convenience constructor for [`LogError::Filter`].
    pub fn filter(filter: impl Into<String>, reason: impl ToString) -> Self {
        Self::Filter {
            filter: filter.into(),
            reason: reason.to_string(),
        }
    }
}
