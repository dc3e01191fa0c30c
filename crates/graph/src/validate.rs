//! Configuration checks that collect every problem.

use std::collections::HashSet;

use cascade_core::ParameterName;
use cascade_parameter::ParameterDef;
use serde::Serialize;
use thiserror::Error;

use crate::error::join;
use crate::graph::DependencyGraph;

/// A problem in a job's parameter configuration.
///
/// None of these stop a resolution pass; they are reported so the job's
/// author can fix them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ConfigIssue {
    /// Two definitions share a name.
    #[error("duplicate parameter name: {name}")]
    DuplicateName {
        /// The repeated name.
        name: ParameterName,
    },

    /// A definition references a name no definition has.
    #[error("parameter {parameter} references unknown parameter {missing}")]
    DanglingReference {
        /// The referencing definition.
        parameter: ParameterName,
        /// The name that does not exist.
        missing: ParameterName,
    },

    /// A definition references itself.
    #[error("parameter {parameter} references itself")]
    SelfReference {
        /// The definition.
        parameter: ParameterName,
    },

    /// Definitions depend on each other in a cycle.
    #[error("cyclic dependency between parameters: {}", join(.participants))]
    CyclicDependency {
        /// Members of the cycle, in declaration order.
        participants: Vec<ParameterName>,
    },
}

/// Check `defs` and report every issue found.
///
/// Unlike [`DependencyGraph::order`], which stops at the first cycle, this
/// collects every issue so they can all be reported at once.
#[must_use]
pub fn validate_parameters(defs: &[ParameterDef]) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    let mut seen = HashSet::new();
    for def in defs {
        if !seen.insert(def.name()) {
            issues.push(ConfigIssue::DuplicateName {
                name: def.name().clone(),
            });
        }
    }

    let graph = DependencyGraph::new(defs);

    for parameter in graph.self_references() {
        issues.push(ConfigIssue::SelfReference {
            parameter: parameter.clone(),
        });
    }

    for (parameter, missing) in graph.dangling_references() {
        issues.push(ConfigIssue::DanglingReference {
            parameter: parameter.clone(),
            missing: missing.clone(),
        });
    }

    for members in graph.plan().cyclic {
        issues.push(ConfigIssue::CyclicDependency {
            participants: members.iter().map(|def| def.name().clone()).collect(),
        });
    }

    issues
}
