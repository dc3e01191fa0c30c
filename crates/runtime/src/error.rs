//! Runtime error types.

use cascade_core::JobHandle;

use crate::config::ConfigError;

/// Errors from the runtime layer.
///
/// A resolution pass itself never fails: every per-parameter problem
/// degrades to an empty result. These errors come from setting the runtime
/// up and from managing the jobs it resolves against.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// No job is registered under the handle.
    #[error("job not registered: {handle}")]
    JobNotRegistered {
        /// The handle that was looked up.
        handle: JobHandle,
    },

    /// The engine configuration is unusable.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl RuntimeError {
    /// Whether the error names a job the registry does not know.
    pub fn is_not_registered(&self) -> bool {
        matches!(self, Self::JobNotRegistered { .. })
    }
}
