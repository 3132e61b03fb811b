//! Generation assignment by breadth-first search from the root.
//!
//! The search follows every relation, so ancestors of a married-in partner
//! land on the row above the partner.

use std::collections::VecDeque;

use indexmap::IndexMap;
use log::{debug, trace};

use pedigree_core::identifier::Id;

use crate::structure::RelationGraph;

use super::Diagnostic;

/// Generation of every individual of a graph, plus the individuals the
/// search could not reach.
#[derive(Debug, Clone, Default)]
pub struct Generations {
    levels: IndexMap<Id, usize>,
    diagnostics: Vec<Diagnostic>,
}

impl Generations {
    /// Returns the generation of `id`, or `None` if it is not in the graph.
    pub fn get(&self, id: Id) -> Option<usize> {
        self.levels.get(&id).copied()
    }

    /// Iterates over `(id, generation)` in discovery order, unreached
    /// individuals last.
    pub fn iter(&self) -> impl Iterator<Item = (Id, usize)> + '_ {
        self.levels.iter().map(|(id, level)| (*id, *level))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Deepest generation, or `None` when empty.
    pub fn max_generation(&self) -> Option<usize> {
        self.levels.values().copied().max()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Assigns a generation to every individual of `graph`.
///
/// The search starts at the root. A dequeued individual enqueues its spouses
/// and explicit siblings on its own generation, its children one generation
/// down and its parents one generation up. The first discovery of a node
/// fixes its generation, which also makes the search terminate on cyclic
/// data. Generations are then shifted so the topmost individual reached is
/// on generation 0; the root stays there unless an ancestor is reachable.
///
/// Individuals the root search never reaches are laid out the same way, one
/// connected group at a time in store order, each group shifted to start at
/// generation 0. Every one of them is reported as
/// [`Diagnostic::DisconnectedIndividual`].
pub fn assign_generations(graph: &RelationGraph, root: Id) -> Generations {
    let mut levels = IndexMap::with_capacity(graph.len());

    if graph.contains(root) {
        levels.extend(search(graph, root));
    }

    let mut diagnostics = Vec::new();
    for id in graph.ids() {
        if levels.contains_key(&id) {
            continue;
        }
        for (found, level) in search(graph, id) {
            let diagnostic = Diagnostic::DisconnectedIndividual { id: found };
            diagnostic.warn();
            diagnostics.push(diagnostic);
            levels.insert(found, level);
        }
    }

    let generations = Generations {
        levels,
        diagnostics,
    };
    debug!(
        individuals = generations.len(),
        max_generation:? = generations.max_generation(),
        disconnected = generations.diagnostics.len();
        "Generations assigned"
    );
    generations
}

/// Breadth-first search over every relation of `seed`'s connected group.
///
/// Returns the group in discovery order with generations shifted so the
/// smallest is 0.
fn search(graph: &RelationGraph, seed: Id) -> Vec<(Id, usize)> {
    let mut found: IndexMap<Id, i64> = IndexMap::new();
    let mut queue = VecDeque::new();
    found.insert(seed, 0);
    queue.push_back(seed);

    while let Some(current) = queue.pop_front() {
        let level = found.get(&current).copied().unwrap_or_default();
        let neighbours = graph
            .spouses(current)
            .into_iter()
            .chain(graph.siblings(current))
            .map(|id| (id, level))
            .chain(graph.children(current).into_iter().map(|id| (id, level + 1)))
            .chain(graph.parents(current).into_iter().map(|id| (id, level - 1)));

        for (next, next_level) in neighbours {
            if !found.contains_key(&next) {
                trace!(id:% = next, level = next_level; "Discovered individual");
                found.insert(next, next_level);
                queue.push_back(next);
            }
        }
    }

    let top = found.values().copied().min().unwrap_or_default();
    found
        .into_iter()
        .map(|(id, level)| (id, usize::try_from(level - top).unwrap_or_default()))
        .collect()
}
