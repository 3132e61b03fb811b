//! The pedigree layout engine.
//!
//! # Pipeline
//!
//! ```text
//! RelationalStore
//!     ↓ reorder_children
//! RelationalStore (children grouped by spouse)
//!     ↓ RelationGraph::build
//! RelationGraph
//!     ↓ assign_generations / group_families
//! Generations + Families
//!     ↓ assign_coordinates
//! Placements
//!     ↓ synthesize_edges
//! Layout { nodes, edges, diagnostics }
//! ```
//!
//! Every pass takes its inputs by reference and returns a fresh value; the
//! caller's store is never modified. The whole pipeline runs on every call,
//! so a layout always reflects the store it was computed from.

mod coordinates;
mod diagnostics;
mod edges;
mod family;
mod generation;
mod model;
mod ordering;

#[cfg(test)]
pub(crate) mod strategies;

pub use coordinates::{JUNCTION_SIZE, Placements, SPOUSE_OFFSET_RATIO, assign_coordinates};
pub use diagnostics::Diagnostic;
pub use edges::{EdgeOptions, synthesize_edges};
pub use family::{Families, Family, FamilyKey, group_families};
pub use generation::{Generations, assign_generations};
pub use model::{
    Anchor, Category, Classification, Edge, EdgeFlags, EdgeId, Layout, Node, NodePayload,
};
pub use ordering::reorder_children;

use log::{debug, info};

use pedigree_core::{
    geometry::{Point, Size},
    identifier::Id,
    individual::Individual,
    store::RelationalStore,
};

use crate::{
    config::{Direction, LayoutConfig},
    error::PedigreeError,
    structure::RelationGraph,
};

/// Runs the full pipeline for `store` with `root` as traversal origin.
///
/// # Errors
///
/// Returns [`PedigreeError::MissingRoot`] when the store is not empty and
/// does not contain `root`. An empty store yields an empty layout.
pub(crate) fn compute(
    store: &RelationalStore,
    root: Id,
    config: &LayoutConfig,
) -> Result<Layout, PedigreeError> {
    if store.is_empty() {
        debug!("Empty store, nothing to lay out");
        return Ok(Layout::default());
    }
    if !store.contains(root) {
        return Err(PedigreeError::MissingRoot(root));
    }

    info!(individuals = store.len(), root:%, direction:% = config.direction(); "Computing layout");

    let store = reorder_children(store);
    let graph = RelationGraph::build(&store);
    let generations = assign_generations(&graph, root);
    let families = group_families(&store, &generations);
    let spacing = config.spacing();
    let placements = assign_coordinates(&store, &generations, &families, spacing, root);
    let edges = synthesize_edges(&store, &graph, &families, EdgeOptions::from(config));

    let orient = Orientation {
        direction: config.direction(),
        origin: Point::new(spacing.start_x(), spacing.start_y()),
    };
    let node_size = Size::new(spacing.node_width(), spacing.node_height());

    let mut nodes: Vec<Node> = store
        .iter()
        .filter_map(|individual| {
            let position = placements.get(individual.id())?;
            let (position, size) = orient.apply(position, node_size);
            Some(Node::new(
                individual.id(),
                position,
                size,
                classify(individual, root),
                generations.get(individual.id()).unwrap_or_default(),
                NodePayload::from(individual),
            ))
        })
        .collect();

    if config.sibling_bars() {
        let junction_size = Size::square(JUNCTION_SIZE);
        nodes.extend(families.iter().filter_map(|family| {
            let id = family.junction_id();
            let position = placements.junction(id)?;
            let (position, size) = orient.apply(position, junction_size);
            Some(Node::new(
                id,
                position,
                size,
                Classification::SiblingJunction,
                family.generation(),
                NodePayload::default(),
            ))
        }));
    }

    let diagnostics: Vec<Diagnostic> = graph
        .diagnostics()
        .iter()
        .chain(generations.diagnostics())
        .cloned()
        .collect();

    info!(
        nodes = nodes.len(),
        edges = edges.len(),
        diagnostics = diagnostics.len();
        "Layout computed"
    );
    Ok(Layout::new(nodes, edges, diagnostics))
}

fn classify(individual: &Individual, root: Id) -> Classification {
    if individual.id() == root {
        Classification::Root
    } else if individual.is_spouse() {
        Classification::Spouse
    } else {
        Classification::Standard
    }
}

/// Maps top-to-bottom boxes onto the configured direction.
struct Orientation {
    direction: Direction,
    origin: Point,
}

impl Orientation {
    fn apply(&self, top_left: Point, size: Size) -> (Point, Size) {
        match self.direction {
            Direction::TopToBottom => (top_left, size),
            Direction::LeftToRight => (top_left.swap_axes(self.origin), size.transpose()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::config::{DescentLines, Spacing};
    use pedigree_core::individual::Parents;

    fn id(name: &str) -> Id {
        Id::new(name)
    }

    fn single_couple() -> RelationalStore {
        [
            Individual::new(id("f"), "F")
                .with_spouses([id("m")])
                .with_children([id("c")]),
            Individual::new(id("m"), "M").as_spouse().with_children([id("c")]),
            Individual::new(id("c"), "C")
                .with_parents(Parents::couple(id("f"), id("m")))
                .with_attribute("sex", "F"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_single_couple_scenario() {
        let layout = compute(&single_couple(), id("f"), &LayoutConfig::default()).unwrap();

        assert_eq!(layout.nodes().len(), 3);
        let generations: Vec<(Id, usize)> = layout
            .nodes()
            .iter()
            .map(|node| (node.id(), node.generation()))
            .collect();
        assert_eq!(generations, vec![(id("f"), 0), (id("m"), 0), (id("c"), 1)]);

        let classes: Vec<Classification> =
            layout.nodes().iter().map(Node::classification).collect();
        assert_eq!(
            classes,
            vec![
                Classification::Root,
                Classification::Spouse,
                Classification::Standard
            ]
        );

        let spousal: Vec<_> = layout
            .edges()
            .iter()
            .filter(|edge| edge.category() == Category::Spousal)
            .collect();
        assert_eq!(spousal.len(), 1);
        assert_eq!((spousal[0].source(), spousal[0].target()), (id("f"), id("m")));

        let descent: Vec<_> = layout
            .edges()
            .iter()
            .filter(|edge| edge.category() == Category::ParentChild)
            .collect();
        assert_eq!(descent.len(), 1);
        assert_eq!((descent[0].source(), descent[0].target()), (id("f"), id("c")));

        let child = layout.node(id("c")).unwrap();
        assert_eq!(child.payload().name(), "C");
        assert!(child.payload().attributes().contains_key("sex"));
        assert!(layout.diagnostics().is_empty());
    }

    #[test]
    fn test_empty_store_gives_empty_layout() {
        let layout = compute(&RelationalStore::new(), id("anyone"), &LayoutConfig::default()).unwrap();
        assert!(layout.is_empty());
        assert!(layout.edges().is_empty());
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let err = compute(&single_couple(), id("nobody"), &LayoutConfig::default()).unwrap_err();
        assert!(matches!(err, PedigreeError::MissingRoot(root) if root == id("nobody")));
    }

    #[test]
    fn test_disconnected_scenario() {
        let mut store = single_couple();
        store.insert(Individual::new(id("loner"), "Loner"));

        let layout = compute(&store, id("f"), &LayoutConfig::default()).unwrap();
        let loner = layout.node(id("loner")).unwrap();
        assert_eq!(loner.generation(), 0);
        assert!(
            layout
                .diagnostics()
                .contains(&Diagnostic::DisconnectedIndividual { id: id("loner") })
        );
    }

    #[test]
    fn test_disconnected_family_child_sits_below_parents() {
        let mut store = single_couple();
        store.insert(
            Individual::new(id("x"), "X")
                .with_spouses([id("y")])
                .with_children([id("z")]),
        );
        store.insert(Individual::new(id("y"), "Y").as_spouse().with_children([id("z")]));
        store.insert(Individual::new(id("z"), "Z").with_parents(Parents::couple(id("x"), id("y"))));

        let layout = compute(&store, id("f"), &LayoutConfig::default()).unwrap();
        let node = |name: &str| layout.node(id(name)).unwrap();

        assert_eq!(node("x").generation(), 0);
        assert_eq!(node("z").generation(), 1);
        assert!(node("x").position().y() < node("z").position().y());
        assert_eq!(node("z").position().y(), node("c").position().y());
        assert!(!node("c").bounds().overlaps_horizontally(&node("z").bounds()));
        assert_eq!(layout.diagnostics().len(), 3);
    }

    #[test]
    fn test_two_marriages_scenario() {
        let store: RelationalStore = [
            Individual::new(id("f"), "F")
                .with_spouses([id("m1"), id("m2")])
                .with_children([id("b1"), id("a1"), id("a2")]),
            Individual::new(id("m1"), "M1")
                .as_spouse()
                .with_children([id("a1"), id("a2")]),
            Individual::new(id("m2"), "M2").as_spouse().with_children([id("b1")]),
            Individual::new(id("a1"), "A1").with_parents(Parents::couple(id("f"), id("m1"))),
            Individual::new(id("a2"), "A2").with_parents(Parents::couple(id("f"), id("m1"))),
            Individual::new(id("b1"), "B1").with_parents(Parents::couple(id("f"), id("m2"))),
        ]
        .into_iter()
        .collect();

        let layout = compute(&store, id("f"), &LayoutConfig::default()).unwrap();
        let bounds = |name: &str| layout.node(id(name)).unwrap().bounds();

        let first = bounds("a1").merge(&bounds("a2"));
        let second = bounds("b1");
        assert!(first.max_x() <= second.min_x());
        assert!(!first.overlaps_horizontally(&second));
    }

    #[test]
    fn test_left_to_right_swaps_axes() {
        let top_down = compute(&single_couple(), id("f"), &LayoutConfig::default()).unwrap();
        let config = LayoutConfig::new(Direction::LeftToRight, Spacing::default());
        let sideways = compute(&single_couple(), id("f"), &config).unwrap();

        let origin = Point::new(50.0, 50.0);
        for (a, b) in top_down.nodes().iter().zip(sideways.nodes()) {
            assert_eq!(a.id(), b.id());
            assert_eq!(a.position().swap_axes(origin), b.position());
        }
        let child = sideways.node(id("c")).unwrap();
        assert_eq!(child.position().x(), 150.0);
        assert_eq!(sideways.edges()[1].source_anchor(), Anchor::Right);
    }

    #[test]
    fn test_sibling_bars_add_junction_node() {
        let mut store = single_couple();
        store.insert(
            Individual::new(id("f"), "F")
                .with_spouses([id("m")])
                .with_children([id("c"), id("d")]),
        );
        store.insert(Individual::new(id("d"), "D").with_parents(Parents::couple(id("f"), id("m"))));

        let config = LayoutConfig::default()
            .with_sibling_bars(true)
            .with_descent_lines(DescentLines::PerCouple);
        let layout = compute(&store, id("f"), &config).unwrap();

        let junctions: Vec<&Node> = layout
            .nodes()
            .iter()
            .filter(|node| node.classification() == Classification::SiblingJunction)
            .collect();
        assert_eq!(junctions.len(), 1);
        assert_eq!(junctions[0].size(), Size::square(JUNCTION_SIZE));
        assert!(
            layout
                .edges()
                .iter()
                .all(|edge| edge.category() != Category::ParentChild
                    || edge.target() == junctions[0].id())
        );
    }

    #[test]
    fn test_junction_never_shares_an_individual_id() {
        let clash = id("jn:1:f:m");
        let store: RelationalStore = [
            Individual::new(id("f"), "F")
                .with_spouses([id("m")])
                .with_children([id("c"), clash]),
            Individual::new(id("m"), "M").as_spouse().with_children([id("c"), clash]),
            Individual::new(id("c"), "C").with_parents(Parents::couple(id("f"), id("m"))),
            Individual::new(clash, "Clash").with_parents(Parents::couple(id("f"), id("m"))),
        ]
        .into_iter()
        .collect();

        let config = LayoutConfig::default()
            .with_sibling_bars(true)
            .with_descent_lines(DescentLines::PerParent);
        let layout = compute(&store, id("f"), &config).unwrap();

        let node_ids: HashSet<Id> = layout.nodes().iter().map(Node::id).collect();
        assert_eq!(node_ids.len(), 5);
        let edge_ids: HashSet<&EdgeId> = layout.edges().iter().map(Edge::id).collect();
        assert_eq!(edge_ids.len(), layout.edges().len());
    }

    #[test]
    fn test_repeated_parent_yields_unique_edges() {
        let store: RelationalStore = [
            Individual::new(id("a"), "A").with_children([id("k1"), id("k2")]),
            Individual::new(id("k1"), "K1").with_parents(Parents::couple(id("a"), id("a"))),
            Individual::new(id("k2"), "K2").with_parents(Parents::couple(id("a"), id("a"))),
        ]
        .into_iter()
        .collect();

        let config = LayoutConfig::default()
            .with_sibling_bars(true)
            .with_descent_lines(DescentLines::PerParent);
        let layout = compute(&store, id("a"), &config).unwrap();

        let edge_ids: HashSet<&EdgeId> = layout.edges().iter().map(Edge::id).collect();
        assert_eq!(edge_ids.len(), layout.edges().len());
        assert_eq!(layout.edges().len(), 3);
    }

    #[test]
    fn test_cyclic_data_terminates() {
        let store: RelationalStore = [
            Individual::new(id("x"), "X")
                .with_children([id("y")])
                .with_parents(Parents::new(Some(id("y")), None)),
            Individual::new(id("y"), "Y")
                .with_children([id("x")])
                .with_parents(Parents::new(Some(id("x")), None)),
        ]
        .into_iter()
        .collect();

        let layout = compute(&store, id("x"), &LayoutConfig::default()).unwrap();
        assert_eq!(layout.nodes().len(), 2);
        assert!(
            layout
                .diagnostics()
                .iter()
                .any(|d| matches!(d, Diagnostic::DescentCycle { .. }))
        );
    }
}
