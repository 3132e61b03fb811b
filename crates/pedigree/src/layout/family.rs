//! Nuclear family grouping.
//!
//! A family is the set of children that share an identical parent pair
//! within a generation. Families are derived on every layout and never
//! stored.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, trace};

use pedigree_core::{identifier::Id, individual::Individual, store::RelationalStore};

use super::{EdgeId, generation::Generations};

/// Identity of a family: the children's generation and both parent slots.
///
/// Parent slots are kept typed, so a family with only a father and a family
/// with only a mother never share a key even when the recorded parent is the
/// same individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FamilyKey {
    generation: usize,
    father: Option<Id>,
    mother: Option<Id>,
}

impl FamilyKey {
    /// `jn:<generation>:<father>:<mother>` with blank slots left empty.
    fn junction_base(&self) -> String {
        let slot = |parent: Option<Id>| parent.map(|id| id.to_string()).unwrap_or_default();
        EdgeId::compose(
            "jn",
            [
                self.generation.to_string(),
                slot(self.father),
                slot(self.mother),
            ],
        )
        .to_string()
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn father(&self) -> Option<Id> {
        self.father
    }

    pub fn mother(&self) -> Option<Id> {
        self.mother
    }
}

/// A nuclear family: present parents and ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct Family {
    key: FamilyKey,
    parents: Vec<Id>,
    children: Vec<Id>,
    junction: Id,
}

impl Family {
    pub fn key(&self) -> FamilyKey {
        self.key
    }

    /// Generation of the children.
    pub fn generation(&self) -> usize {
        self.key.generation
    }

    /// Distinct parents present in the store, father first.
    pub fn parents(&self) -> &[Id] {
        &self.parents
    }

    pub fn children(&self) -> &[Id] {
        &self.children
    }

    /// Identifier of the junction node drawn for this family's sibling bar.
    ///
    /// Never equal to an individual's identifier or to another family's
    /// junction.
    pub fn junction_id(&self) -> Id {
        self.junction
    }
}

/// Renames every junction whose identifier names an individual to the first
/// free `<base>#<n>`.
fn assign_junctions(store: &RelationalStore, families: &mut [Family]) {
    let mut taken: HashSet<Id> = families.iter().map(|family| family.junction).collect();
    for family in families.iter_mut() {
        if !store.contains(family.junction) {
            continue;
        }
        let base = family.junction.to_string();
        let renamed = (2..)
            .map(|n| Id::new(&format!("{base}#{n}")))
            .find(|&id| !taken.contains(&id) && !store.contains(id));
        if let Some(renamed) = renamed {
            debug!(base, junction:% = renamed; "Junction identifier names an individual, renamed");
            taken.insert(renamed);
            family.junction = renamed;
        }
    }
}

/// Families in encounter order.
#[derive(Debug, Clone, Default)]
pub struct Families(Vec<Family>);

impl Families {
    pub fn iter(&self) -> impl Iterator<Item = &Family> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Finds the family a child belongs to.
    pub fn of_child(&self, child: Id) -> Option<&Family> {
        self.0.iter().find(|family| family.children.contains(&child))
    }
}

/// Groups the children of `store` into nuclear families.
///
/// Individuals are visited in store order and each one's `children` list is
/// walked, so a parent whose children were reordered by spouse yields its
/// first-marriage family before the second. Children reachable from no
/// parent's list are added afterwards in store order. Top-level individuals
/// are never grouped as children.
pub fn group_families(store: &RelationalStore, generations: &Generations) -> Families {
    let mut families: IndexMap<FamilyKey, Family> = IndexMap::new();
    let mut grouped = HashSet::new();

    let mut add = |child: &Individual| {
        if child.is_top_level() || !grouped.insert(child.id()) {
            return;
        }
        let parents = child.parents();
        let key = FamilyKey {
            generation: generations.get(child.id()).unwrap_or_default(),
            father: parents.father(),
            mother: parents.mother(),
        };
        families
            .entry(key)
            .or_insert_with(|| {
                let mut present: Vec<Id> = parents.iter().filter(|&id| store.contains(id)).collect();
                present.dedup();
                Family {
                    key,
                    parents: present,
                    children: Vec::new(),
                    junction: Id::new(&key.junction_base()),
                }
            })
            .children
            .push(child.id());
    };

    for individual in store.iter() {
        for &child in individual.children() {
            if let Some(child) = store.get(child) {
                add(child);
            }
        }
    }
    for individual in store.iter() {
        add(individual);
    }

    let mut families: Vec<Family> = families.into_values().collect();
    assign_junctions(store, &mut families);
    let families = Families(families);
    debug!(families = families.len(); "Families grouped");
    trace!(families:? = families; "Families");
    families
}
