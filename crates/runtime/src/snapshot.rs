//! What one resolution pass produced.

use std::fmt;

use cascade_core::ParameterName;
use cascade_graph::GraphError;
use cascade_parameter::{BoundValues, RenderedResult};
use cascade_script::FailureKind;
use indexmap::IndexMap;
use serde::Serialize;

/// Discriminant of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Parameters that depend on each other in a cycle.
    CyclicDependency,
    /// A reference to a name no definition has.
    DanglingReference,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CyclicDependency => "cyclic_dependency",
            Self::DanglingReference => "dangling_reference",
        })
    }
}

/// A configuration problem noticed during a pass.
///
/// Diagnostics never change how other parameters evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Members of one cycle, in declaration order. All of them rendered
    /// empty.
    CyclicDependency {
        /// The cycle members.
        participants: Vec<ParameterName>,
    },
    /// `parameter` references `missing`, which no definition has. The
    /// reference evaluated as absent unless a value was submitted for it.
    DanglingReference {
        /// The referencing parameter.
        parameter: ParameterName,
        /// The unknown name.
        missing: ParameterName,
        /// Whether a submitted value stood in for the missing parameter.
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        supplied: bool,
    },
}

impl Diagnostic {
    /// The diagnostic kind.
    #[must_use]
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::CyclicDependency { .. } => DiagnosticKind::CyclicDependency,
            Self::DanglingReference { .. } => DiagnosticKind::DanglingReference,
        }
    }

    /// Human-readable description.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CyclicDependency { participants } => {
                let names: Vec<&str> = participants.iter().map(ParameterName::as_str).collect();
                write!(f, "cyclic dependency between parameters: {}", names.join(", "))
            }
            Self::DanglingReference {
                parameter,
                missing,
                supplied,
            } => {
                write!(f, "parameter {parameter} references unknown parameter {missing}")?;
                if *supplied {
                    f.write_str(", using its submitted value")?;
                }
                Ok(())
            }
        }
    }
}

impl From<GraphError> for Diagnostic {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::CyclicDependency { participants } => Self::CyclicDependency { participants },
        }
    }
}

/// The rendered state of every parameter after one pass.
///
/// This is the only place results live; definitions hold none.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PassSnapshot {
    /// One result per parameter, in declaration order.
    pub results: IndexMap<ParameterName, RenderedResult>,
    /// The order parameters were evaluated in. Cycle members are absent.
    pub order: Vec<ParameterName>,
    /// Problems found in the configuration.
    pub diagnostics: Vec<Diagnostic>,
    /// Why each degraded parameter rendered empty.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub failures: IndexMap<ParameterName, FailureKind>,
    /// The values dependents saw, including submitted values that no
    /// parameter replaced.
    pub bound_values: BoundValues,
}

impl PassSnapshot {
    /// The result for `name`.
    #[must_use]
    pub fn result(&self, name: &str) -> Option<&RenderedResult> {
        self.results.get(name)
    }

    /// Diagnostics of one kind.
    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind() == kind)
    }

    /// Whether the pass found no configuration problem and no script
    /// failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn name(raw: &str) -> ParameterName {
        raw.parse().unwrap()
    }

    #[test]
    fn diagnostic_messages() {
        let cycle = Diagnostic::CyclicDependency {
            participants: vec![name("A"), name("B")],
        };
        assert_eq!(cycle.message(), "cyclic dependency between parameters: A, B");
        assert_eq!(cycle.kind(), DiagnosticKind::CyclicDependency);

        let dangling = Diagnostic::DanglingReference {
            parameter: name("param002"),
            missing: name("ghost"),
            supplied: false,
        };
        assert_eq!(dangling.kind().to_string(), "dangling_reference");
        assert_eq!(
            dangling.message(),
            "parameter param002 references unknown parameter ghost"
        );
    }

    #[test]
    fn graph_error_becomes_diagnostic() {
        let err = GraphError::CyclicDependency {
            participants: vec![name("A"), name("B")],
        };
        let diagnostic = Diagnostic::from(err.clone());
        assert_eq!(diagnostic.to_string(), err.to_string());
    }

    #[test]
    fn snapshot_serializes_for_the_host() {
        let mut snapshot = PassSnapshot::default();
        snapshot
            .results
            .insert(name("p"), RenderedResult::from_raw(json!([1, 2])));
        snapshot.order.push(name("p"));
        snapshot.diagnostics.push(Diagnostic::DanglingReference {
            parameter: name("p"),
            missing: name("q"),
            supplied: false,
        });

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["order"], json!(["p"]));
        assert_eq!(
            value["diagnostics"],
            json!([{"kind": "dangling_reference", "parameter": "p", "missing": "q"}])
        );
        assert!(value.get("failures").is_none());
        assert!(!snapshot.is_clean());
        assert!(snapshot.result("p").is_some());
    }
}
