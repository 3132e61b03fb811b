//! Coordinate assignment.
//!
//! Every generation is a row with its own horizontal cursor. A placement on
//! a row takes `max(wanted_x, cursor)` and moves the cursor one `h_spacing`
//! to the right, so two individuals on a row are never closer than
//! `h_spacing`. Parents are placed side by side and the children block of a
//! family is centred under the parents' midpoint, then clamped to the cursor.
//!
//! Positions are top-left corners in top-to-bottom orientation; the facade
//! swaps axes for left-to-right layouts.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use log::{debug, trace};

use pedigree_core::{
    geometry::{Point, Size},
    identifier::Id,
    individual::Individual,
    store::RelationalStore,
};

use crate::config::Spacing;

use super::{
    edges::has_junction,
    family::{Families, Family},
    generation::Generations,
};

/// Vertical offset of partners flagged as spouses, as a share of the node
/// height.
pub const SPOUSE_OFFSET_RATIO: f32 = 0.002;

/// Side of the square junction node that carries a sibling bar.
pub const JUNCTION_SIZE: f32 = 11.0;

/// Placed positions of individuals and of family junctions.
#[derive(Debug, Clone, Default)]
pub struct Placements {
    positions: IndexMap<Id, Point>,
    junctions: IndexMap<Id, Point>,
}

impl Placements {
    /// Top-left corner of an individual.
    pub fn get(&self, id: Id) -> Option<Point> {
        self.positions.get(&id).copied()
    }

    /// Iterates over individuals in placement order.
    pub fn iter(&self) -> impl Iterator<Item = (Id, Point)> + '_ {
        self.positions.iter().map(|(id, point)| (*id, *point))
    }

    /// Top-left corner of a family junction, keyed by
    /// [`Family::junction_id`].
    pub fn junction(&self, id: Id) -> Option<Point> {
        self.junctions.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Assigns a top-left position to every individual of `store`.
///
/// The root goes first, followed by its married-in spouses. Families are then
/// processed generation by generation, left to right by the x of their
/// leftmost placed parent. Whatever is still unplaced at the end is appended
/// to its row in store order.
///
/// A junction position is recorded for every family with two or more
/// children and at least one present parent.
pub fn assign_coordinates(
    store: &RelationalStore,
    generations: &Generations,
    families: &Families,
    spacing: &Spacing,
    root: Id,
) -> Placements {
    let mut placer = Placer {
        store,
        generations,
        spacing,
        cursors: BTreeMap::new(),
        positions: IndexMap::with_capacity(store.len()),
    };

    if store.contains(root) {
        placer.place(root, spacing.start_x());
        for spouse in placer.married_in_spouses(root) {
            placer.place(spouse, spacing.start_x());
        }
    }

    let mut by_generation: BTreeMap<usize, Vec<&Family>> = BTreeMap::new();
    for family in families.iter() {
        by_generation
            .entry(family.generation())
            .or_default()
            .push(family);
    }
    for (generation, mut row) in by_generation {
        // Parents may have been placed by the previous generation only now.
        row.sort_by(|a, b| {
            match (placer.leftmost_parent_x(a), placer.leftmost_parent_x(b)) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        });
        trace!(generation, families = row.len(); "Placing generation");
        for family in row {
            placer.place_family(family);
        }
    }

    let leftovers: Vec<Id> = store
        .ids()
        .filter(|id| !placer.positions.contains_key(id))
        .collect();
    for id in &leftovers {
        let cursor = placer.cursor(placer.generation(*id));
        placer.place(*id, cursor);
    }

    let junctions = families
        .iter()
        .filter(|family| has_junction(family))
        .filter_map(|family| {
            placer
                .junction_center(family)
                .map(|center| (family.junction_id(), center))
        })
        .map(|(id, center)| {
            let half = Size::square(JUNCTION_SIZE).half();
            (id, center.sub_point(half))
        })
        .collect();

    debug!(
        placed = placer.positions.len(),
        leftovers = leftovers.len(),
        rows = placer.cursors.len();
        "Coordinates assigned"
    );

    Placements {
        positions: placer.positions,
        junctions,
    }
}

struct Placer<'a> {
    store: &'a RelationalStore,
    generations: &'a Generations,
    spacing: &'a Spacing,
    cursors: BTreeMap<usize, f32>,
    positions: IndexMap<Id, Point>,
}

impl Placer<'_> {
    fn generation(&self, id: Id) -> usize {
        self.generations.get(id).unwrap_or_default()
    }

    fn cursor(&self, generation: usize) -> f32 {
        self.cursors
            .get(&generation)
            .copied()
            .unwrap_or(self.spacing.start_x())
    }

    fn row_y(&self, generation: usize) -> f32 {
        self.spacing.start_y() + generation as f32 * self.spacing.v_spacing()
    }

    fn is_placed(&self, id: Id) -> bool {
        self.positions.contains_key(&id)
    }

    /// Places `id` at `max(wanted_x, cursor)` on its row and returns its x.
    /// An individual that is already placed keeps its position.
    fn place(&mut self, id: Id, wanted_x: f32) -> f32 {
        if let Some(point) = self.positions.get(&id) {
            return point.x();
        }

        let generation = self.generation(id);
        let x = wanted_x.max(self.cursor(generation));
        let mut y = self.row_y(generation);
        if self.store.get(id).is_some_and(Individual::is_spouse) {
            y += self.spacing.node_height() * SPOUSE_OFFSET_RATIO;
        }

        trace!(id:%, generation, x, y; "Placed individual");
        self.positions.insert(id, Point::new(x, y));
        self.cursors
            .insert(generation, x + self.spacing.h_spacing());
        x
    }

    /// Married-in partners listed by `id` that share its generation.
    fn married_in_spouses(&self, id: Id) -> Vec<Id> {
        let Some(individual) = self.store.get(id) else {
            return Vec::new();
        };
        let generation = self.generation(id);
        individual
            .spouses()
            .iter()
            .copied()
            .filter(|&spouse| {
                self.store.get(spouse).is_some_and(Individual::is_married_in)
                    && self.generation(spouse) == generation
            })
            .collect()
    }

    fn leftmost_parent_x(&self, family: &Family) -> Option<f32> {
        family
            .parents()
            .iter()
            .filter_map(|&parent| self.positions.get(&parent))
            .map(|point| point.x())
            .min_by(f32::total_cmp)
    }

    /// Centre x of the parents, all of which must be placed.
    fn parents_midpoint(&self, family: &Family) -> Option<f32> {
        let centers: Vec<f32> = family
            .parents()
            .iter()
            .filter_map(|&parent| self.positions.get(&parent))
            .map(|point| point.x() + self.spacing.node_width() / 2.0)
            .collect();
        if centers.is_empty() {
            None
        } else {
            Some(centers.iter().sum::<f32>() / centers.len() as f32)
        }
    }

    fn place_family(&mut self, family: &Family) {
        let mut rows = vec![family.generation()];

        let mut previous: Option<(usize, f32)> = None;
        for &parent in family.parents() {
            let generation = self.generation(parent);
            rows.push(generation);
            let wanted = match previous {
                Some((row, x)) if row == generation => x + self.spacing.h_spacing(),
                _ => self.cursor(generation),
            };
            let x = self.place(parent, wanted);
            previous = Some((generation, x));
        }

        let block = self.child_block(family);
        if !block.is_empty() {
            let h_spacing = self.spacing.h_spacing();
            let start = match self.parents_midpoint(family) {
                Some(midpoint) => {
                    let width = (block.len() - 1) as f32 * h_spacing + self.spacing.node_width();
                    midpoint - width / 2.0
                }
                None => self.cursor(family.generation()),
            };
            for (idx, &id) in block.iter().enumerate() {
                self.place(id, start + idx as f32 * h_spacing);
            }
        }

        let widest = rows
            .iter()
            .map(|&row| self.cursor(row))
            .fold(self.spacing.start_x(), f32::max);
        for row in rows {
            self.cursors.insert(row, widest);
        }
    }

    /// Unplaced children of a family, each preceded by its explicit siblings
    /// and followed by its married-in spouses.
    fn child_block(&self, family: &Family) -> Vec<Id> {
        let generation = family.generation();
        let mut block: Vec<Id> = Vec::new();
        let push = |id: Id, block: &mut Vec<Id>| {
            if self.store.contains(id)
                && !self.is_placed(id)
                && !block.contains(&id)
                && self.generation(id) == generation
            {
                block.push(id);
            }
        };

        for &child in family.children() {
            if self.is_placed(child) {
                continue;
            }
            if let Some(individual) = self.store.get(child) {
                for &sibling in individual.siblings() {
                    push(sibling, &mut block);
                }
            }
            push(child, &mut block);
            for spouse in self.married_in_spouses(child) {
                push(spouse, &mut block);
            }
        }
        block
    }

    fn junction_center(&self, family: &Family) -> Option<Point> {
        let midpoint = self.parents_midpoint(family)?;
        let parent_generation = self.generation(*family.parents().first()?);
        let half_height = self.spacing.node_height() / 2.0;
        let parent_row = self.row_y(parent_generation) + half_height;
        let child_row = self.row_y(family.generation()) + half_height;
        Some(Point::new(midpoint, (parent_row + child_row) / 2.0))
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use crate::{
        layout::{
            family::group_families, generation::assign_generations, ordering::reorder_children,
            strategies::pedigree_strategy,
        },
        structure::RelationGraph,
    };
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn rows_never_overlap(store in pedigree_strategy()) {
            let root = Id::new("q0");
            let store = reorder_children(&store);
            let graph = RelationGraph::build(&store);
            let generations = assign_generations(&graph, root);
            let families = group_families(&store, &generations);
            let spacing = Spacing::default();
            let placements = assign_coordinates(&store, &generations, &families, &spacing, root);

            prop_assert_eq!(placements.len(), store.len());

            let mut rows: BTreeMap<usize, Vec<f32>> = BTreeMap::new();
            for (id, point) in placements.iter() {
                rows.entry(generations.get(id).unwrap()).or_default().push(point.x());
            }
            for xs in rows.values_mut() {
                xs.sort_by(f32::total_cmp);
                for pair in xs.windows(2) {
                    prop_assert!(pair[1] - pair[0] >= spacing.h_spacing() - 1e-3);
                }
            }
        }
    }
}
