//! Graph error types.

use cascade_core::ParameterName;
use thiserror::Error;

/// Errors raised while ordering parameter definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The definitions contain a dependency cycle.
    #[error("cyclic dependency between parameters: {}", join(.participants))]
    CyclicDependency {
        /// Members of one cycle, in declaration order.
        participants: Vec<ParameterName>,
    },
}

impl GraphError {
    /// Whether this is a cycle error.
    #[must_use]
    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::CyclicDependency { .. })
    }
}

pub(crate) fn join(names: &[ParameterName]) -> String {
    names
        .iter()
        .map(ParameterName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
