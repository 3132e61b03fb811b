//! Layout result types: positioned nodes, routed edges and diagnostics.

use std::fmt;

use serde::Serialize;

use pedigree_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
    individual::{Attributes, Individual},
};

use crate::config::Direction;

use super::Diagnostic;

/// Role of a node in the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Standard,
    Spouse,
    SiblingJunction,
    Root,
}

/// Kind of relationship an edge draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ParentChild,
    Spousal,
    Sibling,
}

/// Side of a node box an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Top,
    Bottom,
    Left,
    Right,
}

impl Anchor {
    /// Maps a top-to-bottom anchor onto the given direction.
    ///
    /// Left-to-right layouts mirror the diagram along its diagonal, so
    /// `Top`/`Left` and `Bottom`/`Right` trade places.
    pub fn oriented(self, direction: Direction) -> Self {
        match direction {
            Direction::TopToBottom => self,
            Direction::LeftToRight => match self {
                Self::Top => Self::Left,
                Self::Left => Self::Top,
                Self::Bottom => Self::Right,
                Self::Right => Self::Bottom,
            },
        }
    }

    /// Returns the point on `bounds` where an edge attaches.
    pub fn point_on(self, bounds: Bounds) -> Point {
        let center = bounds.center();
        match self {
            Self::Top => center.with_y(bounds.min_y()),
            Self::Bottom => center.with_y(bounds.max_y()),
            Self::Left => center.with_x(bounds.min_x()),
            Self::Right => center.with_x(bounds.max_x()),
        }
    }
}

/// Deterministic edge identifier.
///
/// Built by [`EdgeId::compose`] from a category prefix and the identifiers of
/// the endpoints. Backslashes and colons inside parts are escaped, so two
/// different part lists can never compose to the same identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    /// Composes `prefix:part1:part2...` with escaped parts.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pedigree::layout::EdgeId;
    /// assert_eq!(EdgeId::compose("pc", ["f", "c"]).as_str(), "pc:f:c");
    /// assert_ne!(
    ///     EdgeId::compose("sb", ["a:b", "c"]),
    ///     EdgeId::compose("sb", ["a", "b:c"]),
    /// );
    /// ```
    pub fn compose<I, S>(prefix: &str, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut id = String::from(prefix);
        for part in parts {
            id.push(':');
            for ch in part.as_ref().chars() {
                if matches!(ch, '\\' | ':') {
                    id.push('\\');
                }
                id.push(ch);
            }
        }
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Flags propagated from the records onto an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EdgeFlags {
    consanguineous: bool,
}

impl EdgeFlags {
    pub fn consanguineous() -> Self {
        Self {
            consanguineous: true,
        }
    }

    pub fn is_consanguineous(&self) -> bool {
        self.consanguineous
    }
}

/// Display data carried by a node. Empty for junction nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodePayload {
    name: String,
    attributes: Attributes,
}

impl NodePayload {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

impl From<&Individual> for NodePayload {
    fn from(individual: &Individual) -> Self {
        Self {
            name: individual.name().to_string(),
            attributes: individual.attributes().clone(),
        }
    }
}

/// A positioned node. `position` is the top-left corner of its box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    id: Id,
    position: Point,
    size: Size,
    classification: Classification,
    generation: usize,
    payload: NodePayload,
}

impl Node {
    pub(crate) fn new(
        id: Id,
        position: Point,
        size: Size,
        classification: Classification,
        generation: usize,
        payload: NodePayload,
    ) -> Self {
        Self {
            id,
            position,
            size,
            classification,
            generation,
            payload,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn payload(&self) -> &NodePayload {
        &self.payload
    }

    pub fn bounds(&self) -> Bounds {
        self.position.to_bounds(self.size)
    }
}

/// A routed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    id: EdgeId,
    source: Id,
    target: Id,
    category: Category,
    source_anchor: Anchor,
    target_anchor: Anchor,
    flags: EdgeFlags,
}

impl Edge {
    /// Creates an edge with the category's top-to-bottom anchors.
    pub(crate) fn new(id: EdgeId, source: Id, target: Id, category: Category) -> Self {
        let (source_anchor, target_anchor) = match category {
            Category::ParentChild => (Anchor::Bottom, Anchor::Top),
            Category::Spousal => (Anchor::Right, Anchor::Left),
            Category::Sibling => (Anchor::Left, Anchor::Right),
        };
        Self {
            id,
            source,
            target,
            category,
            source_anchor,
            target_anchor,
            flags: EdgeFlags::default(),
        }
    }

    pub(crate) fn with_anchors(mut self, source_anchor: Anchor, target_anchor: Anchor) -> Self {
        self.source_anchor = source_anchor;
        self.target_anchor = target_anchor;
        self
    }

    pub(crate) fn with_flags(mut self, flags: EdgeFlags) -> Self {
        self.flags = flags;
        self
    }

    pub(crate) fn oriented(mut self, direction: Direction) -> Self {
        self.source_anchor = self.source_anchor.oriented(direction);
        self.target_anchor = self.target_anchor.oriented(direction);
        self
    }

    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn source_anchor(&self) -> Anchor {
        self.source_anchor
    }

    pub fn target_anchor(&self) -> Anchor {
        self.target_anchor
    }

    pub fn flags(&self) -> EdgeFlags {
        self.flags
    }
}

/// The full layout of a pedigree.
///
/// A layout is never patched: every store change produces a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    diagnostics: Vec<Diagnostic>,
}

impl Layout {
    pub(crate) fn new(nodes: Vec<Node>, edges: Vec<Edge>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            nodes,
            edges,
            diagnostics,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Finds a node by identifier.
    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Returns the bounds enclosing every node, or `None` for an empty layout.
    pub fn bounds(&self) -> Option<Bounds> {
        self.nodes
            .iter()
            .map(Node::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}
