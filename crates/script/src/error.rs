//! Failures raised while running a script.
//!
//! A runner reports a [`RunFailure`]; the executor turns it, together with
//! gating, timeouts and the fallback protocol, into an [`ExecutionFailure`].
//! Neither ever aborts a resolution pass: the parameter degrades to an
//! empty result.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Failure reported by a [`SandboxGate`](crate::SandboxGate) runner.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunFailure {
    /// The script raised an error (syntax, missing binding, exception).
    #[error("script error: {0}")]
    Script(String),

    /// The script returned something that cannot be represented as a value,
    /// such as a non-finite float.
    #[error("unrepresentable return value: {0}")]
    Unrepresentable(String),

    /// The runner observed the cancellation hook.
    #[error("script run cancelled")]
    Cancelled,
}

impl RunFailure {
    /// Convenience constructor for [`RunFailure::Script`].
    pub fn script(message: impl fmt::Display) -> Self {
        Self::Script(message.to_string())
    }
}

/// Category of an [`ExecutionFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The gate refused the script.
    NotApproved,
    /// The script failed while running.
    RuntimeFailure,
    /// The run exceeded its time budget.
    Timeout,
    /// The primary failed and there was no fallback.
    NoFallback,
    /// Primary and fallback both failed.
    FallbackFailed,
    /// A required catalog entry is missing.
    ScriptNotFound,
    /// The evaluation was cancelled.
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotApproved => "not_approved",
            Self::RuntimeFailure => "runtime_failure",
            Self::Timeout => "timeout",
            Self::NoFallback => "no_fallback",
            Self::FallbackFailed => "fallback_failed",
            Self::ScriptNotFound => "script_not_found",
            Self::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// Why a script reference produced no value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionFailure {
    /// The gate did not approve the script.
    #[error("script is not approved to run")]
    NotApproved,

    /// The runner reported an error.
    #[error("script failed: {message}")]
    RuntimeFailure {
        /// The runner's message.
        message: String,
    },

    /// The run did not finish in time.
    #[error("script timed out after {after:?}")]
    Timeout {
        /// The budget that was exceeded.
        after: Duration,
    },

    /// The primary failed and no fallback was configured.
    #[error("primary script failed and no fallback is configured: {primary}")]
    NoFallback {
        /// Why the primary failed.
        #[source]
        primary: Box<ExecutionFailure>,
    },

    /// The fallback failed too.
    #[error("fallback script failed: {fallback} (primary: {primary})")]
    FallbackFailed {
        /// Why the primary failed.
        primary: Box<ExecutionFailure>,
        /// Why the fallback failed.
        #[source]
        fallback: Box<ExecutionFailure>,
    },

    /// A catalog entry marked `must_exist` was not found.
    #[error("catalog script '{catalog_id}' not found")]
    ScriptNotFound {
        /// The id that was looked up.
        catalog_id: String,
    },

    /// The evaluation was cancelled.
    #[error("script execution cancelled")]
    Cancelled,
}

impl ExecutionFailure {
    /// Convenience constructor for [`ExecutionFailure::RuntimeFailure`].
    pub fn runtime(message: impl fmt::Display) -> Self {
        Self::RuntimeFailure {
            message: message.to_string(),
        }
    }

    /// The failure category.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotApproved => FailureKind::NotApproved,
            Self::RuntimeFailure { .. } => FailureKind::RuntimeFailure,
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::NoFallback { .. } => FailureKind::NoFallback,
            Self::FallbackFailed { .. } => FailureKind::FallbackFailed,
            Self::ScriptNotFound { .. } => FailureKind::ScriptNotFound,
            Self::Cancelled => FailureKind::Cancelled,
        }
    }

    /// Whether this failure came from cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<RunFailure> for ExecutionFailure {
    fn from(failure: RunFailure) -> Self {
        match failure {
            RunFailure::Cancelled => Self::Cancelled,
            other => Self::runtime(other),
        }
    }
}
