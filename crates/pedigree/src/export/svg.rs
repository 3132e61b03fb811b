//! SVG preview of a layout.
//!
//! Every node becomes a rectangle with its name centered inside, junction
//! nodes become small filled squares, and every edge becomes an orthogonal
//! path between its anchors. Consanguineous edges are drawn as two parallel
//! paths.

use log::debug;
use svg::{Document, node::element as svg_element};

use pedigree_core::geometry::{Bounds, Point, Size};

use super::{Error, Exporter};
use crate::layout::{Anchor, Category, Classification, Edge, Layout, Node};

/// Gap between the two strokes of a consanguineous edge.
const DOUBLE_LINE_GAP: f32 = 3.0;

/// SVG exporter.
#[derive(Debug, Clone)]
pub struct Svg {
    margin: f32,
    font_size: f32,
}

impl Default for Svg {
    fn default() -> Self {
        Self {
            margin: 50.0,
            font_size: 12.0,
        }
    }
}

impl Svg {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    /// Renders the layout into an SVG document.
    pub fn render(&self, layout: &Layout) -> Document {
        let content = layout.bounds().unwrap_or_default();
        let size = self.calculate_svg_dimensions(content.to_size());

        let doc = Document::new()
            .set("viewBox", format!("0 0 {} {}", size.width(), size.height()))
            .set("width", size.width())
            .set("height", size.height());

        let mut group = svg_element::Group::new().set(
            "transform",
            format!(
                "translate({}, {})",
                self.margin - content.min_x(),
                self.margin - content.min_y()
            ),
        );

        for edge in layout.edges() {
            let (Some(source), Some(target)) =
                (layout.node(edge.source()), layout.node(edge.target()))
            else {
                continue;
            };
            group = group.add(self.render_edge(edge, source.bounds(), target.bounds()));
        }
        for node in layout.nodes() {
            group = group.add(self.render_node(node));
        }

        doc.add(group)
    }

    /// Adds the margin on every side of the content.
    fn calculate_svg_dimensions(&self, content: Size) -> Size {
        let width = self.margin.mul_add(2.0, content.width());
        let height = self.margin.mul_add(2.0, content.height());
        debug!(width, height; "SVG dimensions");
        Size::new(width, height)
    }

    fn render_node(&self, node: &Node) -> svg_element::Group {
        let bounds = node.bounds();
        let rect = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height());

        let group = svg_element::Group::new().set("id", node.id().to_string());
        if node.classification() == Classification::SiblingJunction {
            return group.add(rect.set("fill", "black"));
        }

        let (fill, stroke_width) = match node.classification() {
            Classification::Root => ("#fff3c4", 2),
            Classification::Spouse => ("#eef3fb", 1),
            _ => ("white", 1),
        };
        let center = bounds.center();
        let label = svg_element::Text::new(node.payload().name())
            .set("x", center.x())
            .set("y", center.y())
            .set("text-anchor", "middle")
            .set("dominant-baseline", "middle")
            .set("font-family", "sans-serif")
            .set("font-size", self.font_size);

        group
            .add(
                rect.set("fill", fill)
                    .set("stroke", "black")
                    .set("stroke-width", stroke_width),
            )
            .add(label)
    }

    fn render_edge(&self, edge: &Edge, source: Bounds, target: Bounds) -> svg_element::Group {
        let start = edge.source_anchor().point_on(source);
        let end = edge.target_anchor().point_on(target);
        let vertical_first = matches!(edge.source_anchor(), Anchor::Top | Anchor::Bottom);

        let dash = match edge.category() {
            Category::Sibling => "4 2",
            _ => "none",
        };
        let mut group = svg_element::Group::new().set("id", edge.id().to_string());

        let offsets = if edge.flags().is_consanguineous() {
            let half = DOUBLE_LINE_GAP / 2.0;
            if vertical_first {
                vec![Point::new(-half, 0.0), Point::new(half, 0.0)]
            } else {
                vec![Point::new(0.0, -half), Point::new(0.0, half)]
            }
        } else {
            vec![Point::default()]
        };

        for offset in offsets {
            let data = orthogonal_path(
                start.add_point(offset),
                end.add_point(offset),
                vertical_first,
            );
            group = group.add(
                svg_element::Path::new()
                    .set("d", data)
                    .set("fill", "none")
                    .set("stroke", "black")
                    .set("stroke-dasharray", dash),
            );
        }
        group
    }
}

/// Path data with only horizontal and vertical segments, bending halfway.
fn orthogonal_path(start: Point, end: Point, vertical_first: bool) -> String {
    if vertical_first {
        let mid_y = start.y() + (end.y() - start.y()) * 0.5;
        format!(
            "M {} {} L {} {} L {} {} L {} {}",
            start.x(),
            start.y(),
            start.x(),
            mid_y,
            end.x(),
            mid_y,
            end.x(),
            end.y()
        )
    } else {
        let mid_x = start.x() + (end.x() - start.x()) * 0.5;
        format!(
            "M {} {} L {} {} L {} {} L {} {}",
            start.x(),
            start.y(),
            mid_x,
            start.y(),
            mid_x,
            end.y(),
            end.x(),
            end.y()
        )
    }
}

impl Exporter for Svg {
    fn export_layout(&self, layout: &Layout) -> Result<String, Error> {
        let doc = self.render(layout);
        debug!("SVG document rendered");
        Ok(doc.to_string())
    }
}

#[cfg(test)]
mod tests {
    use pedigree_core::{
        identifier::Id,
        individual::{Individual, Parents},
        store::RelationalStore,
    };

    use super::*;
    use crate::{compute_layout, config::Direction};

    fn cousins_married() -> RelationalStore {
        [
            Individual::new(Id::new("h"), "Husband")
                .with_spouses([Id::new("w")])
                .with_consanguine([Id::new("w")])
                .with_children([Id::new("k")]),
            Individual::new(Id::new("w"), "Wife")
                .as_spouse()
                .with_consanguine([Id::new("h")])
                .with_children([Id::new("k")]),
            Individual::new(Id::new("k"), "Kid")
                .with_parents(Parents::couple(Id::new("h"), Id::new("w"))),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_svg_contains_nodes_and_labels() {
        let layout =
            compute_layout(&cousins_married(), Id::new("h"), Direction::TopToBottom).unwrap();
        let output = Svg::new().export_layout(&layout).unwrap();

        assert!(output.contains("<svg"));
        assert_eq!(output.matches("<rect").count(), 3);
        assert!(output.contains("Husband"));
        assert!(output.contains("Kid"));
    }

    #[test]
    fn test_consanguineous_edge_is_doubled() {
        let layout =
            compute_layout(&cousins_married(), Id::new("h"), Direction::TopToBottom).unwrap();
        let output = Svg::new().export_layout(&layout).unwrap();

        // Two strokes for the spousal edge, one for the descent edge.
        assert_eq!(output.matches("<path").count(), 3);
    }

    #[test]
    fn test_empty_layout_renders_margin_only() {
        let output = Svg::new()
            .with_margin(10.0)
            .export_layout(&Layout::default())
            .unwrap();
        assert!(output.contains("viewBox=\"0 0 20 20\""));
    }

    #[test]
    fn test_orthogonal_path_bends_halfway() {
        let data = orthogonal_path(Point::new(0.0, 0.0), Point::new(10.0, 20.0), true);
        assert_eq!(data, "M 0 0 L 0 10 L 10 10 L 10 20");
    }
}
