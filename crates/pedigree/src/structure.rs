//! Relation graph built from a store snapshot.
//!
//! The [`RelationGraph`] turns the relation lists of every individual into
//! typed edges of a [`petgraph`] directed graph:
//!
//! - **Descent** edges point from parent to child. The union of both sides
//!   of every parent/child link is used, so a link recorded only by the child
//!   (or only by the parent) still counts.
//! - **Spousal** and **Sibling** edges follow the direction they were listed
//!   in; the neighbour queries treat them as symmetric.
//!
//! References to individuals missing from the store are skipped. Every issue
//! found while building, including descent cycles, is collected as a
//! [`Diagnostic`].
//!
//! All neighbour queries return identifiers in edge insertion order, which is
//! derived from store order. This keeps every traversal deterministic.

use std::collections::{HashMap, HashSet};

use log::{debug, trace};
use petgraph::{
    Direction,
    algo::tarjan_scc,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use pedigree_core::{identifier::Id, store::RelationalStore};

use crate::layout::Diagnostic;

/// Edge type of the relation graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Descent,
    Spousal,
    Sibling,
}

/// Typed, insertion-ordered view of the relations in a store.
#[derive(Debug)]
pub struct RelationGraph {
    graph: DiGraph<Id, Relation>,
    indices: HashMap<Id, NodeIndex>,
    diagnostics: Vec<Diagnostic>,
}

impl RelationGraph {
    /// Builds the graph from a store snapshot.
    pub fn build(store: &RelationalStore) -> Self {
        let mut graph = DiGraph::with_capacity(store.len(), store.len() * 2);
        let mut indices = HashMap::with_capacity(store.len());
        for id in store.ids() {
            indices.insert(id, graph.add_node(id));
        }

        let mut diagnostics: Vec<Diagnostic> =
            store.validate().into_iter().map(Diagnostic::from).collect();

        // Children lists first, so a parent's descent edges follow its own
        // ordering; links recorded only by the child are appended after.
        let mut descent = HashSet::new();
        for individual in store.iter() {
            let parent = indices[&individual.id()];
            for child in individual.children() {
                let Some(&child) = indices.get(child) else {
                    continue;
                };
                if descent.insert((parent, child)) {
                    graph.add_edge(parent, child, Relation::Descent);
                }
            }
        }
        for individual in store.iter() {
            let child = indices[&individual.id()];
            for parent in individual.parents().iter() {
                let Some(&parent) = indices.get(&parent) else {
                    continue;
                };
                if descent.insert((parent, child)) {
                    graph.add_edge(parent, child, Relation::Descent);
                }
            }
        }

        for individual in store.iter() {
            let from = indices[&individual.id()];
            for spouse in individual.spouses() {
                if let Some(&to) = indices.get(spouse) {
                    graph.add_edge(from, to, Relation::Spousal);
                }
            }
            for sibling in individual.siblings() {
                if let Some(&to) = indices.get(sibling) {
                    graph.add_edge(from, to, Relation::Sibling);
                }
            }
        }

        let mut relation_graph = Self {
            graph,
            indices,
            diagnostics: Vec::new(),
        };
        diagnostics.extend(relation_graph.descent_cycles());
        for diagnostic in &diagnostics {
            diagnostic.warn();
        }
        relation_graph.diagnostics = diagnostics;

        debug!(
            nodes = relation_graph.graph.node_count(),
            edges = relation_graph.graph.edge_count(),
            diagnostics = relation_graph.diagnostics.len();
            "Relation graph built"
        );
        trace!(graph:? = relation_graph.graph; "Relation graph");

        relation_graph
    }

    /// Returns `true` if `id` is a node of the graph.
    pub fn contains(&self, id: Id) -> bool {
        self.indices.contains_key(&id)
    }

    /// Iterates over all identifiers in store order.
    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.graph.node_indices().map(|idx| self.graph[idx])
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Children of `id`: targets of its descent edges.
    pub fn children(&self, id: Id) -> Vec<Id> {
        self.related(id, Relation::Descent, &[Direction::Outgoing])
    }

    /// Parents of `id`: sources of descent edges into it.
    pub fn parents(&self, id: Id) -> Vec<Id> {
        self.related(id, Relation::Descent, &[Direction::Incoming])
    }

    /// Spouses of `id` in either listing direction, own list first.
    pub fn spouses(&self, id: Id) -> Vec<Id> {
        self.related(
            id,
            Relation::Spousal,
            &[Direction::Outgoing, Direction::Incoming],
        )
    }

    /// Explicit siblings of `id` in either listing direction, own list first.
    pub fn siblings(&self, id: Id) -> Vec<Id> {
        self.related(
            id,
            Relation::Sibling,
            &[Direction::Outgoing, Direction::Incoming],
        )
    }

    /// Iterates over every `(parent, child)` descent pair in edge order.
    pub fn descent_pairs(&self) -> impl Iterator<Item = (Id, Id)> + '_ {
        self.graph
            .edge_references()
            .filter(|edge| *edge.weight() == Relation::Descent)
            .map(|edge| (self.graph[edge.source()], self.graph[edge.target()]))
    }

    /// Issues found while building the graph.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn related(&self, id: Id, relation: Relation, directions: &[Direction]) -> Vec<Id> {
        let Some(&idx) = self.indices.get(&id) else {
            return Vec::new();
        };

        let mut related = Vec::new();
        for &direction in directions {
            // petgraph walks adjacency lists newest first.
            let mut edges: Vec<_> = self
                .graph
                .edges_directed(idx, direction)
                .filter(|edge| *edge.weight() == relation)
                .map(|edge| {
                    let other = match direction {
                        Direction::Outgoing => edge.target(),
                        Direction::Incoming => edge.source(),
                    };
                    (edge.id(), self.graph[other])
                })
                .collect();
            edges.sort_by_key(|(edge, _)| edge.index());

            for (_, other) in edges {
                if other != id && !related.contains(&other) {
                    related.push(other);
                }
            }
        }
        related
    }

    fn descent_cycles(&self) -> Vec<Diagnostic> {
        let descent = self.graph.filter_map(
            |_, id| Some(*id),
            |_, relation| (*relation == Relation::Descent).then_some(()),
        );

        let mut cycles: Vec<Vec<NodeIndex>> = tarjan_scc(&descent)
            .into_iter()
            .filter(|scc| scc.len() > 1 || descent.contains_edge(scc[0], scc[0]))
            .map(|mut scc| {
                scc.sort();
                scc
            })
            .collect();
        cycles.sort();

        cycles
            .into_iter()
            .map(|scc| Diagnostic::DescentCycle {
                members: scc.into_iter().map(|idx| descent[idx]).collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedigree_core::{
        individual::{Individual, Parents},
        store::RelationKind,
    };

    fn id(name: &str) -> Id {
        Id::new(name)
    }

    #[test]
    fn test_neighbours_follow_insertion_order() {
        let store: RelationalStore = [
            Individual::new(id("f"), "F")
                .with_spouses([id("m1"), id("m2")])
                .with_children([id("c2"), id("c1"), id("c3")]),
            Individual::new(id("m1"), "M1").as_spouse(),
            Individual::new(id("m2"), "M2").as_spouse(),
            Individual::new(id("c1"), "C1").with_parents(Parents::couple(id("f"), id("m1"))),
            Individual::new(id("c2"), "C2").with_parents(Parents::couple(id("f"), id("m1"))),
            Individual::new(id("c3"), "C3").with_parents(Parents::couple(id("f"), id("m2"))),
        ]
        .into_iter()
        .collect();

        let graph = RelationGraph::build(&store);
        assert_eq!(graph.children(id("f")), vec![id("c2"), id("c1"), id("c3")]);
        assert_eq!(graph.spouses(id("f")), vec![id("m1"), id("m2")]);
        assert_eq!(graph.spouses(id("m2")), vec![id("f")]);
        assert_eq!(graph.parents(id("c1")), vec![id("f"), id("m1")]);
        // m1 lists no children; the links come from the children's records.
        assert_eq!(graph.children(id("m1")), vec![id("c1"), id("c2")]);
        assert_eq!(graph.len(), 6);
    }

    #[test]
    fn test_one_sided_link_is_united() {
        let store: RelationalStore = [
            Individual::new(id("p"), "P"),
            Individual::new(id("k"), "K").with_parents(Parents::new(Some(id("p")), None)),
        ]
        .into_iter()
        .collect();

        let graph = RelationGraph::build(&store);
        assert_eq!(graph.children(id("p")), vec![id("k")]);
        assert_eq!(graph.descent_pairs().count(), 1);
        assert_eq!(
            graph.diagnostics(),
            &[Diagnostic::OneSidedDescent {
                parent: id("p"),
                child: id("k"),
            }]
        );
    }

    #[test]
    fn test_dangling_reference_is_skipped() {
        let store: RelationalStore = [Individual::new(id("a"), "A").with_children([id("nobody")])]
            .into_iter()
            .collect();

        let graph = RelationGraph::build(&store);
        assert!(graph.children(id("a")).is_empty());
        assert_eq!(
            graph.diagnostics(),
            &[Diagnostic::DanglingReference {
                from: id("a"),
                to: id("nobody"),
                relation: RelationKind::Child,
            }]
        );
    }

    #[test]
    fn test_descent_cycle_is_reported() {
        let store: RelationalStore = [
            Individual::new(id("x"), "X")
                .with_children([id("y")])
                .with_parents(Parents::new(Some(id("y")), None)),
            Individual::new(id("y"), "Y")
                .with_children([id("x")])
                .with_parents(Parents::new(Some(id("x")), None)),
            Individual::new(id("z"), "Z")
                .with_children([id("z")])
                .with_parents(Parents::new(Some(id("z")), None)),
        ]
        .into_iter()
        .collect();

        let graph = RelationGraph::build(&store);
        let cycles: Vec<_> = graph
            .diagnostics()
            .iter()
            .filter(|d| matches!(d, Diagnostic::DescentCycle { .. }))
            .cloned()
            .collect();
        assert_eq!(
            cycles,
            vec![
                Diagnostic::DescentCycle {
                    members: vec![id("x"), id("y")]
                },
                Diagnostic::DescentCycle {
                    members: vec![id("z")]
                },
            ]
        );
    }

    #[test]
    fn test_empty_store() {
        let graph = RelationGraph::build(&RelationalStore::new());
        assert!(graph.is_empty());
        assert!(graph.diagnostics().is_empty());
        assert!(graph.children(id("ghost")).is_empty());
    }
}
