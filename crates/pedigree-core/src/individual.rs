//! The [`Individual`] record and its relation fields.
//!
//! An individual is one person in a pedigree. Relations are stored as lists of
//! [`Id`]s and are resolved against the [`RelationalStore`](crate::store::RelationalStore)
//! by the layout engine; a reference that does not resolve is tolerated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identifier::Id;

/// Errors raised while reading an individual record.
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("an individual has at most two parents, found {0}")]
    TooManyParents(usize),
    #[error("`{0}` fills both parent slots")]
    RepeatedParent(Id),
}

/// The `[father, mother]` pair of an individual.
///
/// Either slot may be missing. In serialized form the pair is a list of at
/// most two identifiers where an empty string marks a blank slot, so
/// `["", "m"]` records a mother without a father.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Id>", into = "Vec<Id>")]
pub struct Parents {
    father: Option<Id>,
    mother: Option<Id>,
}

impl Parents {
    /// Creates a parent pair from optional father and mother.
    pub fn new(father: Option<Id>, mother: Option<Id>) -> Self {
        Self { father, mother }
    }

    /// Creates a parent pair with both slots filled.
    pub fn couple(father: Id, mother: Id) -> Self {
        Self::new(Some(father), Some(mother))
    }

    pub fn father(&self) -> Option<Id> {
        self.father
    }

    pub fn mother(&self) -> Option<Id> {
        self.mother
    }

    /// Returns `true` when neither parent is recorded.
    pub fn is_empty(&self) -> bool {
        self.father.is_none() && self.mother.is_none()
    }

    /// Returns `true` if `id` fills either slot.
    pub fn contains(&self, id: Id) -> bool {
        self.father == Some(id) || self.mother == Some(id)
    }

    /// Iterates over the recorded parents, father first.
    pub fn iter(self) -> impl Iterator<Item = Id> {
        self.father.into_iter().chain(self.mother)
    }

    /// Returns the parent in the slot that `id` does not occupy.
    ///
    /// Returns `None` when `id` is not one of the parents or the other slot
    /// is blank.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pedigree_core::{identifier::Id, individual::Parents};
    /// let parents = Parents::couple(Id::new("f"), Id::new("m"));
    ///
    /// assert_eq!(parents.other_than(Id::new("f")), Some(Id::new("m")));
    /// assert_eq!(parents.other_than(Id::new("m")), Some(Id::new("f")));
    /// assert_eq!(parents.other_than(Id::new("x")), None);
    /// ```
    pub fn other_than(&self, id: Id) -> Option<Id> {
        if self.father == Some(id) {
            self.mother
        } else if self.mother == Some(id) {
            self.father
        } else {
            None
        }
    }
}

impl TryFrom<Vec<Id>> for Parents {
    type Error = RecordError;

    fn try_from(ids: Vec<Id>) -> Result<Self, Self::Error> {
        if ids.len() > 2 {
            return Err(RecordError::TooManyParents(ids.len()));
        }
        let slot = |idx: usize| ids.get(idx).copied().filter(|id| !id.is_empty());
        match (slot(0), slot(1)) {
            (Some(father), Some(mother)) if father == mother => {
                Err(RecordError::RepeatedParent(father))
            }
            (father, mother) => Ok(Self::new(father, mother)),
        }
    }
}

impl From<Parents> for Vec<Id> {
    fn from(parents: Parents) -> Self {
        match (parents.father, parents.mother) {
            (None, None) => Vec::new(),
            (Some(father), None) => vec![father],
            (father, Some(mother)) => vec![father.unwrap_or_else(|| Id::new("")), mother],
        }
    }
}

/// An opaque demographic attribute passed through the layout untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attribute {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl From<&str> for Attribute {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for Attribute {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Opaque payload of an individual, keyed by attribute name.
pub type Attributes = BTreeMap<String, Attribute>;

/// The serialized form of an individual: every field of [`Individual`]
/// except the identifier, which is the key of the record in the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Record {
    pub name: String,
    pub parents: Parents,
    pub children: Vec<Id>,
    pub spouses: Vec<Id>,
    pub siblings: Vec<Id>,
    pub is_spouse: bool,
    pub consanguine_with: Vec<Id>,
    pub attributes: Attributes,
}

/// One person in the pedigree.
///
/// # Examples
///
/// ```
/// # use pedigree_core::{identifier::Id, individual::{Individual, Parents}};
/// let child = Individual::new(Id::new("c"), "Child")
///     .with_parents(Parents::couple(Id::new("f"), Id::new("m")));
///
/// assert_eq!(child.parents().father(), Some(Id::new("f")));
/// assert!(!child.is_top_level());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    id: Id,
    name: String,
    parents: Parents,
    children: Vec<Id>,
    spouses: Vec<Id>,
    siblings: Vec<Id>,
    is_spouse: bool,
    consanguine_with: Vec<Id>,
    attributes: Attributes,
}

impl Individual {
    /// Creates an individual with no relations.
    pub fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parents: Parents::default(),
            children: Vec::new(),
            spouses: Vec::new(),
            siblings: Vec::new(),
            is_spouse: false,
            consanguine_with: Vec::new(),
            attributes: Attributes::new(),
        }
    }

    /// Builds an individual from its serialized record.
    pub fn from_record(id: Id, record: Record) -> Self {
        Self {
            id,
            name: record.name,
            parents: record.parents,
            children: record.children,
            spouses: record.spouses,
            siblings: record.siblings,
            is_spouse: record.is_spouse,
            consanguine_with: record.consanguine_with,
            attributes: record.attributes,
        }
    }

    /// Converts the individual back into its serialized record.
    pub fn to_record(&self) -> Record {
        Record {
            name: self.name.clone(),
            parents: self.parents,
            children: self.children.clone(),
            spouses: self.spouses.clone(),
            siblings: self.siblings.clone(),
            is_spouse: self.is_spouse,
            consanguine_with: self.consanguine_with.clone(),
            attributes: self.attributes.clone(),
        }
    }

    pub fn with_parents(mut self, parents: Parents) -> Self {
        self.parents = parents;
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Id>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    pub fn with_spouses(mut self, spouses: impl IntoIterator<Item = Id>) -> Self {
        self.spouses = spouses.into_iter().collect();
        self
    }

    pub fn with_siblings(mut self, siblings: impl IntoIterator<Item = Id>) -> Self {
        self.siblings = siblings.into_iter().collect();
        self
    }

    /// Marks the individual as introduced purely as a partner.
    pub fn as_spouse(mut self) -> Self {
        self.is_spouse = true;
        self
    }

    pub fn with_consanguine(mut self, relatives: impl IntoIterator<Item = Id>) -> Self {
        self.consanguine_with = relatives.into_iter().collect();
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Attribute>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parents(&self) -> Parents {
        self.parents
    }

    pub fn children(&self) -> &[Id] {
        &self.children
    }

    pub fn spouses(&self) -> &[Id] {
        &self.spouses
    }

    pub fn siblings(&self) -> &[Id] {
        &self.siblings
    }

    pub fn is_spouse(&self) -> bool {
        self.is_spouse
    }

    pub fn consanguine_with(&self) -> &[Id] {
        &self.consanguine_with
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns `true` when no parent is recorded.
    pub fn is_top_level(&self) -> bool {
        self.parents.is_empty()
    }

    /// Returns `true` for a partner who joined the family by marriage: flagged
    /// as a spouse and without recorded parents of their own.
    pub fn is_married_in(&self) -> bool {
        self.is_spouse && self.is_top_level()
    }

    /// Replaces the parent pair.
    pub fn set_parents(&mut self, parents: Parents) {
        self.parents = parents;
    }

    /// Replaces the children list, e.g. after reordering.
    pub fn set_children(&mut self, children: Vec<Id>) {
        self.children = children;
    }

    /// Appends a child unless already listed.
    pub fn push_child(&mut self, child: Id) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    /// Appends a spouse unless already listed.
    pub fn push_spouse(&mut self, spouse: Id) {
        if !self.spouses.contains(&spouse) {
            self.spouses.push(spouse);
        }
    }
}
