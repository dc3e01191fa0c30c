//! Parameter dependency graph built on `petgraph`.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use cascade_core::ParameterName;
use cascade_parameter::ParameterDef;
use petgraph::Direction;
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::GraphError;

/// Dependencies between the parameters of one job.
///
/// Node `i` is the `i`-th definition and edges point from a dependency to
/// its dependent. References to unknown names and self references add no
/// edge: at evaluation time those names are simply not bound.
#[derive(Debug)]
pub struct DependencyGraph<'a> {
    defs: &'a [ParameterDef],
    graph: DiGraph<usize, ()>,
    index_map: HashMap<&'a str, NodeIndex>,
}

/// Evaluation order for one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationPlan<'a> {
    /// Every definition outside a cycle, dependencies first, ties broken by
    /// declaration order.
    pub order: Vec<&'a ParameterDef>,
    /// Members of each dependency cycle in declaration order, cycles ordered
    /// by their first member.
    pub cyclic: Vec<Vec<&'a ParameterDef>>,
}

impl<'a> EvaluationPlan<'a> {
    /// Whether no cycle was found.
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        self.cyclic.is_empty()
    }

    /// Whether `name` belongs to a cycle.
    #[must_use]
    pub fn is_cyclic(&self, name: &str) -> bool {
        self.cyclic.iter().flatten().any(|def| def.name() == name)
    }

    /// One [`GraphError::CyclicDependency`] per cycle.
    #[must_use]
    pub fn cycle_errors(&self) -> Vec<GraphError> {
        self.cyclic
            .iter()
            .map(|members| GraphError::CyclicDependency {
                participants: members.iter().map(|def| def.name().clone()).collect(),
            })
            .collect()
    }

    /// The order, or the first cycle as an error.
    pub fn into_result(self) -> Result<Vec<&'a ParameterDef>, GraphError> {
        match self.cycle_errors().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.order),
        }
    }
}

impl<'a> DependencyGraph<'a> {
    /// Build the graph for `defs`.
    ///
    /// When two definitions share a name, references resolve to the first.
    #[must_use]
    pub fn new(defs: &'a [ParameterDef]) -> Self {
        let mut graph = DiGraph::with_capacity(defs.len(), defs.len());
        let mut index_map = HashMap::with_capacity(defs.len());

        for (position, def) in defs.iter().enumerate() {
            let idx = graph.add_node(position);
            index_map.entry(def.name().as_str()).or_insert(idx);
        }

        for (position, def) in defs.iter().enumerate() {
            let dependent = NodeIndex::new(position);
            for referenced in def.referenced_parameters() {
                let Some(&dependency) = index_map.get(referenced.as_str()) else {
                    continue;
                };
                if dependency != dependent {
                    graph.update_edge(dependency, dependent, ());
                }
            }
        }

        Self {
            defs,
            graph,
            index_map,
        }
    }

    /// Order `defs` for evaluation, failing on the first cycle.
    pub fn order(defs: &'a [ParameterDef]) -> Result<Vec<&'a ParameterDef>, GraphError> {
        Self::new(defs).plan().into_result()
    }

    /// Order every definition that is not part of a cycle, and collect the
    /// cycles separately.
    ///
    /// Cycle members are strongly connected components with more than one
    /// node. A definition that depends on a cycle member is still ordered;
    /// that dependency is just not waited for.
    #[must_use]
    pub fn plan(&self) -> EvaluationPlan<'a> {
        let defs = self.defs;
        let mut cycles: Vec<Vec<usize>> = algo::tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut members: Vec<usize> = component.iter().map(|idx| idx.index()).collect();
                members.sort_unstable();
                members
            })
            .collect();
        cycles.sort_unstable_by_key(|members| members[0]);
        let cyclic: HashSet<usize> = cycles.iter().flatten().copied().collect();

        let mut in_degree = vec![0_usize; self.defs.len()];
        for edge in self.graph.raw_edges() {
            let (from, to) = (edge.source().index(), edge.target().index());
            if !cyclic.contains(&from) && !cyclic.contains(&to) {
                in_degree[to] += 1;
            }
        }

        // Kahn's algorithm; the min-heap keeps declaration order among
        // definitions that are ready at the same time.
        let mut ready: BinaryHeap<Reverse<usize>> = (0..self.defs.len())
            .filter(|position| !cyclic.contains(position) && in_degree[*position] == 0)
            .map(Reverse)
            .collect();

        let mut order = Vec::with_capacity(self.defs.len() - cyclic.len());
        while let Some(Reverse(position)) = ready.pop() {
            order.push(&defs[position]);
            for next in self
                .graph
                .neighbors_directed(NodeIndex::new(position), Direction::Outgoing)
            {
                let next = next.index();
                if cyclic.contains(&next) {
                    continue;
                }
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.push(Reverse(next));
                }
            }
        }

        EvaluationPlan {
            order,
            cyclic: cycles
                .into_iter()
                .map(|members| members.into_iter().map(|position| &defs[position]).collect())
                .collect(),
        }
    }

    /// Returns `true` if the graph contains at least one cycle.
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        algo::is_cyclic_directed(&self.graph)
    }

    /// Names `name` depends on that exist in the job.
    #[must_use]
    pub fn dependencies(&self, name: &str) -> Vec<&'a ParameterName> {
        self.neighbors(name, Direction::Incoming)
    }

    /// Names that depend on `name`.
    #[must_use]
    pub fn dependents(&self, name: &str) -> Vec<&'a ParameterName> {
        self.neighbors(name, Direction::Outgoing)
    }

    fn neighbors(&self, name: &str, direction: Direction) -> Vec<&'a ParameterName> {
        let Some(&idx) = self.index_map.get(name) else {
            return Vec::new();
        };
        let defs = self.defs;
        let mut positions: Vec<usize> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n])
            .collect();
        positions.sort_unstable();
        positions.into_iter().map(|p| defs[p].name()).collect()
    }

    /// `(parameter, missing)` for every reference to a name not in the job,
    /// in declaration order.
    #[must_use]
    pub fn dangling_references(&self) -> Vec<(&'a ParameterName, &'a ParameterName)> {
        let index_map = &self.index_map;
        self.defs
            .iter()
            .flat_map(move |def| {
                def.referenced_parameters()
                    .iter()
                    .filter(move |referenced| !index_map.contains_key(referenced.as_str()))
                    .map(move |referenced| (def.name(), referenced))
            })
            .collect()
    }

    /// Definitions that reference their own name.
    #[must_use]
    pub fn self_references(&self) -> Vec<&'a ParameterName> {
        self.defs
            .iter()
            .filter(|def| def.referenced_parameters().contains(def.name()))
            .map(ParameterDef::name)
            .collect()
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether there are no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use cascade_parameter::types::{CascadeChoiceParameter, ChoiceParameter};
    use cascade_script::{ScriptRef, ScriptSource};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn script() -> ScriptRef {
        ScriptRef::inline(ScriptSource::new("[]", false), ScriptSource::empty())
    }

    fn param(name: &str, refs: &[&str]) -> ParameterDef {
        if refs.is_empty() {
            ParameterDef::Choice(ChoiceParameter::new(name.parse().unwrap(), script()))
        } else {
            ParameterDef::CascadeChoice(CascadeChoiceParameter::new(
                name.parse().unwrap(),
                script(),
                refs.iter().map(|r| r.parse().unwrap()).collect(),
            ))
        }
    }

    fn names<'a>(defs: impl IntoIterator<Item = &'a ParameterDef>) -> Vec<&'a str> {
        defs.into_iter().map(|d| d.name().as_str()).collect()
    }

    /// Each entry is `name` or `name:dep dep`.
    fn declared(entries: &[&str]) -> Vec<ParameterDef> {
        entries
            .iter()
            .map(|entry| match entry.split_once(':') {
                Some((name, refs)) => param(name, &refs.split_whitespace().collect::<Vec<_>>()),
                None => param(entry, &[]),
            })
            .collect()
    }

    #[rstest]
    #[case::unrelated_keep_declaration_order(&["A", "B"], &["A", "B"])]
    #[case::dependency_comes_first(&["child:parent", "parent"], &["parent", "child"])]
    // Once A is out, B (index 1) goes before D (index 3) even though D
    // became ready at the same time.
    #[case::ties_follow_declaration_order(&["A", "B", "C:A", "D:A"], &["A", "B", "C", "D"])]
    #[case::diamond(
        &["bottom:left right", "right:top", "left:top", "top"],
        &["top", "right", "left", "bottom"]
    )]
    fn acyclic_order(#[case] entries: &[&str], #[case] expected: &[&str]) {
        let defs = declared(entries);
        for _ in 0..10 {
            assert_eq!(names(DependencyGraph::order(&defs).unwrap()), expected);
        }
    }

    #[test]
    fn dangling_and_self_references_add_no_edges() {
        let defs = vec![param("A", &["A", "ghost"]), param("B", &["A"])];
        let graph = DependencyGraph::new(&defs);
        assert!(!graph.has_cycle());
        assert_eq!(names(DependencyGraph::order(&defs).unwrap()), vec!["A", "B"]);
        assert_eq!(graph.self_references(), vec![defs[0].name()]);
        let dangling: Vec<(&str, &str)> = graph
            .dangling_references()
            .into_iter()
            .map(|(p, m)| (p.as_str(), m.as_str()))
            .collect();
        assert_eq!(dangling, vec![("A", "ghost")]);
    }

    #[test]
    fn cycle_is_contained() {
        let defs = vec![param("A", &["B"]), param("B", &["A"]), param("C", &[])];
        let graph = DependencyGraph::new(&defs);
        assert!(graph.has_cycle());

        let plan = graph.plan();
        assert_eq!(names(plan.order.iter().copied()), vec!["C"]);
        assert_eq!(plan.cyclic.len(), 1);
        assert_eq!(names(plan.cyclic[0].iter().copied()), vec!["A", "B"]);
        assert!(plan.is_cyclic("A"));
        assert!(!plan.is_cyclic("C"));

        let err = DependencyGraph::order(&defs).unwrap_err();
        assert_eq!(err.to_string(), "cyclic dependency between parameters: A, B");
    }

    #[test]
    fn dependent_of_cycle_is_still_ordered() {
        let defs = vec![
            param("X", &["A"]),
            param("A", &["B"]),
            param("B", &["A"]),
        ];
        let plan = DependencyGraph::new(&defs).plan();
        assert_eq!(names(plan.order.iter().copied()), vec!["X"]);
        assert_eq!(plan.cycle_errors().len(), 1);
    }

    #[test]
    fn separate_cycles_are_reported_separately() {
        let defs = vec![
            param("C", &["D"]),
            param("A", &["B"]),
            param("B", &["A"]),
            param("D", &["C"]),
        ];
        let plan = DependencyGraph::new(&defs).plan();
        assert!(plan.order.is_empty());
        let cycles: Vec<Vec<&str>> = plan
            .cyclic
            .iter()
            .map(|members| names(members.iter().copied()))
            .collect();
        assert_eq!(cycles, vec![vec!["C", "D"], vec!["A", "B"]]);
    }

    #[test]
    fn neighbours() {
        let defs = vec![param("A", &[]), param("B", &["A"]), param("C", &["A", "B"])];
        let graph = DependencyGraph::new(&defs);
        let deps: Vec<&str> = graph.dependencies("C").iter().map(|n| n.as_str()).collect();
        assert_eq!(deps, vec!["A", "B"]);
        let dependents: Vec<&str> = graph.dependents("A").iter().map(|n| n.as_str()).collect();
        assert_eq!(dependents, vec!["B", "C"]);
        assert!(graph.dependencies("missing").is_empty());
    }
}
