//! Edge synthesis: parent-child, spousal and sibling edges.
//!
//! Edge identifiers are composed from a category prefix and the endpoint
//! identifiers (see [`EdgeId::compose`]): `pc` for parent-child, `sp` for
//! spousal and `sb` for sibling edges. Spousal and explicit sibling edges use
//! the sorted endpoint pair, so the two listing directions of one relation
//! compose the same identifier and the edge is emitted once.

use std::collections::HashSet;

use log::debug;

use pedigree_core::{identifier::Id, individual::Individual, store::RelationalStore};

use crate::{
    config::{DescentLines, Direction, LayoutConfig},
    structure::RelationGraph,
};

use super::{
    Anchor, Category, Edge, EdgeFlags, EdgeId,
    family::{Families, Family},
};

/// Options that shape the edge set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeOptions {
    descent_lines: DescentLines,
    sibling_bars: bool,
    direction: Direction,
}

impl EdgeOptions {
    pub fn new(descent_lines: DescentLines, sibling_bars: bool, direction: Direction) -> Self {
        Self {
            descent_lines,
            sibling_bars,
            direction,
        }
    }
}

impl From<&LayoutConfig> for EdgeOptions {
    fn from(config: &LayoutConfig) -> Self {
        Self::new(
            config.descent_lines(),
            config.sibling_bars(),
            config.direction(),
        )
    }
}

/// Builds the edge list of a pedigree.
///
/// Edges come out as spousal edges, then parent-child edges, then sibling
/// edges, each group in store order.
pub fn synthesize_edges(
    store: &RelationalStore,
    graph: &RelationGraph,
    families: &Families,
    options: EdgeOptions,
) -> Vec<Edge> {
    let mut synthesizer = Synthesizer {
        store,
        couples: HashSet::new(),
        edges: Vec::new(),
    };

    synthesizer.spousal_edges();
    let spousal = synthesizer.edges.len();

    let covered = if options.sibling_bars {
        synthesizer.junction_edges(families, options.descent_lines)
    } else {
        HashSet::new()
    };
    synthesizer.descent_edges(graph, &covered, options.descent_lines);
    synthesizer.sibling_edges();

    let edges: Vec<Edge> = synthesizer
        .edges
        .into_iter()
        .map(|edge| edge.oriented(options.direction))
        .collect();
    debug!(
        edges = edges.len(),
        spousal,
        sibling_bars = options.sibling_bars;
        "Edges synthesized"
    );
    edges
}

struct Synthesizer<'a> {
    store: &'a RelationalStore,
    /// Sorted pairs joined by a spousal edge.
    couples: HashSet<(Id, Id)>,
    edges: Vec<Edge>,
}

fn sorted(a: Id, b: Id) -> (Id, Id) {
    if b < a { (b, a) } else { (a, b) }
}

impl Synthesizer<'_> {
    fn is_flagged(&self, id: Id) -> bool {
        self.store.get(id).is_some_and(Individual::is_spouse)
    }

    /// Orders a couple as `(lineage partner, flagged partner)`.
    ///
    /// When both or neither are flagged, `father` goes first if it is one of
    /// the two, otherwise the one earlier in the store.
    fn lineage_order(&self, a: Id, b: Id, father: Option<Id>) -> (Id, Id) {
        match (self.is_flagged(a), self.is_flagged(b)) {
            (false, true) => (a, b),
            (true, false) => (b, a),
            _ if father == Some(b) => (b, a),
            _ if father == Some(a) => (a, b),
            _ => {
                if self.store.index_of(b) < self.store.index_of(a) {
                    (b, a)
                } else {
                    (a, b)
                }
            }
        }
    }

    fn is_consanguineous(&self, a: Id, b: Id) -> bool {
        let lists = |x: Id, y: Id| {
            self.store
                .get(x)
                .is_some_and(|individual| individual.consanguine_with().contains(&y))
        };
        lists(a, b) || lists(b, a)
    }

    fn spousal_edges(&mut self) {
        for individual in self.store.iter() {
            let id = individual.id();
            for &spouse in individual.spouses() {
                if spouse == id || !self.store.contains(spouse) {
                    continue;
                }
                if !self.is_flagged(id) && !self.is_flagged(spouse) {
                    continue;
                }
                let pair = sorted(id, spouse);
                if !self.couples.insert(pair) {
                    continue;
                }

                let (source, target) = self.lineage_order(id, spouse, None);
                let mut edge = Edge::new(
                    EdgeId::compose("sp", [pair.0.to_string(), pair.1.to_string()]),
                    source,
                    target,
                    Category::Spousal,
                );
                if self.is_consanguineous(id, spouse) {
                    edge = edge.with_flags(EdgeFlags::consanguineous());
                }
                self.edges.push(edge);
            }
        }
    }

    /// Descent sources for a parent set: the lineage partner alone when the
    /// two parents are a couple and lines are drawn per couple.
    fn descent_sources(&self, parents: &[Id], father: Option<Id>, lines: DescentLines) -> Vec<Id> {
        match (lines, parents) {
            (DescentLines::PerCouple, &[a, b]) if self.couples.contains(&sorted(a, b)) => {
                vec![self.lineage_order(a, b, father).0]
            }
            _ => parents.to_vec(),
        }
    }

    /// Emits junction edges for every family with two or more children and
    /// returns the `(parent, child)` pairs they replace.
    fn junction_edges(&mut self, families: &Families, lines: DescentLines) -> HashSet<(Id, Id)> {
        let mut covered = HashSet::new();
        for family in families.iter().filter(|family| has_junction(family)) {
            let junction = family.junction_id();
            for source in self.descent_sources(family.parents(), family.key().father(), lines) {
                self.edges.push(Edge::new(
                    EdgeId::compose("pc", [source.to_string(), junction.to_string()]),
                    source,
                    junction,
                    Category::ParentChild,
                ));
            }
            for &child in family.children() {
                self.edges.push(
                    Edge::new(
                        EdgeId::compose("sb", [junction.to_string(), child.to_string()]),
                        junction,
                        child,
                        Category::Sibling,
                    )
                    .with_anchors(Anchor::Bottom, Anchor::Top),
                );
                for &parent in family.parents() {
                    covered.insert((parent, child));
                }
            }
        }
        covered
    }

    fn descent_edges(
        &mut self,
        graph: &RelationGraph,
        covered: &HashSet<(Id, Id)>,
        lines: DescentLines,
    ) {
        for (parent, child) in graph.descent_pairs() {
            if parent == child || covered.contains(&(parent, child)) {
                continue;
            }

            if lines == DescentLines::PerCouple {
                let father = self.store.get(child).and_then(|c| c.parents().father());
                let parents = graph.parents(child);
                let drawn_by_partner = parents.iter().any(|&other| {
                    other != parent
                        && self.couples.contains(&sorted(parent, other))
                        && self.lineage_order(parent, other, father).0 != parent
                });
                if drawn_by_partner {
                    continue;
                }
            }

            self.edges.push(Edge::new(
                EdgeId::compose("pc", [parent.to_string(), child.to_string()]),
                parent,
                child,
                Category::ParentChild,
            ));
        }
    }

    /// One edge per unordered explicit sibling pair, from the individual that
    /// lists the sibling to the sibling placed on its left.
    fn sibling_edges(&mut self) {
        let mut seen = HashSet::new();
        for individual in self.store.iter() {
            let id = individual.id();
            for &sibling in individual.siblings() {
                if sibling == id || !self.store.contains(sibling) {
                    continue;
                }
                let pair = sorted(id, sibling);
                if !seen.insert(pair) {
                    continue;
                }
                self.edges.push(Edge::new(
                    EdgeId::compose("sb", [pair.0.to_string(), pair.1.to_string()]),
                    id,
                    sibling,
                    Category::Sibling,
                ));
            }
        }
    }
}

/// A family gets a junction node when it has a sibship and a parent to hang
/// it from.
pub(crate) fn has_junction(family: &Family) -> bool {
    family.children().len() >= 2 && !family.parents().is_empty()
}
