//! The relational store: every individual of a pedigree keyed by [`Id`].
//!
//! The store keeps insertion order. That order is the tie-break order used by
//! every layout pass, which is what makes layouts reproducible.

use std::fmt;

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    identifier::Id,
    individual::{Individual, Record},
};

/// The kind of relation a reference was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Parent,
    Child,
    Spouse,
    Sibling,
    Consanguine,
}

impl From<RelationKind> for &'static str {
    fn from(val: RelationKind) -> Self {
        match val {
            RelationKind::Parent => "parent",
            RelationKind::Child => "child",
            RelationKind::Spouse => "spouse",
            RelationKind::Sibling => "sibling",
            RelationKind::Consanguine => "consanguine",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// A data-quality issue found by [`RelationalStore::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreIssue {
    /// `from` references `to` in its `relation` list but `to` is not in the store.
    Dangling {
        from: Id,
        to: Id,
        relation: RelationKind,
    },
    /// Exactly one side of a parent/child link is recorded.
    OneSidedDescent { parent: Id, child: Id },
}

impl fmt::Display for StoreIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dangling { from, to, relation } => {
                write!(f, "{from} references unknown {relation} {to}")
            }
            Self::OneSidedDescent { parent, child } => {
                write!(f, "descent link {parent} -> {child} is recorded on one side only")
            }
        }
    }
}

/// In-memory mapping from individual ID to [`Individual`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationalStore {
    individuals: IndexMap<Id, Individual>,
}

impl RelationalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an individual, returning the one it replaced.
    ///
    /// A replaced individual keeps its original position in the store order.
    pub fn insert(&mut self, individual: Individual) -> Option<Individual> {
        let id = individual.id();
        let replaced = self.individuals.insert(id, individual);
        if replaced.is_some() {
            debug!(id:%; "Replaced individual in store");
        }
        replaced
    }

    pub fn get(&self, id: Id) -> Option<&Individual> {
        self.individuals.get(&id)
    }

    pub fn get_mut(&mut self, id: Id) -> Option<&mut Individual> {
        self.individuals.get_mut(&id)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.individuals.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Iterates over the individuals in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.values()
    }

    /// Iterates mutably over the individuals in store order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Individual> {
        self.individuals.values_mut()
    }

    /// Iterates over the identifiers in store order.
    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.individuals.keys().copied()
    }

    /// Returns the position of `id` in store order.
    pub fn index_of(&self, id: Id) -> Option<usize> {
        self.individuals.get_index_of(&id)
    }

    /// Lists dangling references and one-sided parent/child links.
    ///
    /// The store is not modified; the layout engine tolerates every issue
    /// reported here.
    pub fn validate(&self) -> Vec<StoreIssue> {
        let mut issues = Vec::new();

        for individual in self.iter() {
            let from = individual.id();
            let references = individual
                .parents()
                .iter()
                .map(|id| (id, RelationKind::Parent))
                .chain(individual.children().iter().map(|&id| (id, RelationKind::Child)))
                .chain(individual.spouses().iter().map(|&id| (id, RelationKind::Spouse)))
                .chain(individual.siblings().iter().map(|&id| (id, RelationKind::Sibling)))
                .chain(
                    individual
                        .consanguine_with()
                        .iter()
                        .map(|&id| (id, RelationKind::Consanguine)),
                );

            for (to, relation) in references {
                let Some(target) = self.get(to) else {
                    issues.push(StoreIssue::Dangling { from, to, relation });
                    continue;
                };
                match relation {
                    RelationKind::Child if !target.parents().contains(from) => {
                        issues.push(StoreIssue::OneSidedDescent {
                            parent: from,
                            child: to,
                        });
                    }
                    RelationKind::Parent if !target.children().contains(&from) => {
                        issues.push(StoreIssue::OneSidedDescent {
                            parent: to,
                            child: from,
                        });
                    }
                    _ => {}
                }
            }
        }

        issues
    }
}

impl FromIterator<Individual> for RelationalStore {
    fn from_iter<T: IntoIterator<Item = Individual>>(iter: T) -> Self {
        let mut store = Self::new();
        for individual in iter {
            store.insert(individual);
        }
        store
    }
}

impl Serialize for RelationalStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let records: IndexMap<Id, Record> = self
            .individuals
            .iter()
            .map(|(id, individual)| (*id, individual.to_record()))
            .collect();
        records.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RelationalStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = IndexMap::<Id, Record>::deserialize(deserializer)?;
        Ok(records
            .into_iter()
            .map(|(id, record)| Individual::from_record(id, record))
            .collect())
    }
}
