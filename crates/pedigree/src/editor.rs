//! Incremental editing of a pedigree.
//!
//! The [`Editor`] owns a store and a root and applies add-relationship
//! operations. Every operation validates its inputs first and then updates
//! both sides of each relation it creates, so the store stays consistent.
//! Identifiers for new individuals come from an injected [`IdGenerator`].
//!
//! The editor never patches a layout: [`Editor::layout`] recomputes it from
//! the current store on every call.
//!
//! # Examples
//!
//! ```
//! # use pedigree::editor::{Editor, PersonDetails, SequentialIds};
//! # use pedigree::individual::Individual;
//! # use pedigree::identifier::Id;
//! # use pedigree::store::RelationalStore;
//! let root = Id::new("me");
//! let store: RelationalStore = [Individual::new(root, "Me")].into_iter().collect();
//! let mut editor = Editor::new(store, root, SequentialIds::default());
//!
//! let spouse = editor.add_spouse(root, PersonDetails::named("Partner")).unwrap();
//! let child = editor.add_child(root, Some(spouse), PersonDetails::default()).unwrap();
//!
//! let layout = editor.layout().unwrap();
//! assert_eq!(layout.nodes().len(), 3);
//! assert_eq!(editor.store().get(child).unwrap().name(), "New Child");
//! ```

use log::{debug, info};
use thiserror::Error;

use pedigree_core::{
    identifier::Id,
    individual::{Attribute, Attributes, Individual, Parents},
    store::RelationalStore,
};

use crate::{Document, config::LayoutConfig, error::PedigreeError, layout::Layout};

/// Reasons an edit is rejected. A rejected edit leaves the store untouched.
#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("unknown individual `{0}`")]
    UnknownIndividual(Id),

    #[error("`{0}` already has recorded parents")]
    ParentsAlreadyRecorded(Id),

    #[error("`{partner}` is not a spouse of `{id}`")]
    NotASpouse { id: Id, partner: Id },

    #[error("`{0}` joined the family by marriage and cannot take a spouse")]
    SpouseOfSpouse(Id),
}

/// The role a new individual is created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Father,
    Mother,
    Child,
    Spouse,
}

impl Role {
    /// Identifier prefix used by [`SequentialIds`].
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Father => "f",
            Self::Mother => "m",
            Self::Child => "c",
            Self::Spouse => "s",
        }
    }

    /// Display name used when the form leaves the name blank.
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Father => "New Father",
            Self::Mother => "New Mother",
            Self::Child => "New Child",
            Self::Spouse => "New Spouse",
        }
    }
}

/// Source of identifiers for new individuals.
pub trait IdGenerator {
    /// Returns a fresh identifier for an individual created in `role`.
    ///
    /// The editor skips identifiers that are already taken and asks again.
    fn next_id(&mut self, role: Role) -> Id;
}

/// Monotonic counter producing `f1`, `m2`, `c3`, `s4`...
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    counter: u64,
}

impl SequentialIds {
    /// Starts counting after `counter`.
    pub fn starting_at(counter: u64) -> Self {
        Self { counter }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, role: Role) -> Id {
        self.counter += 1;
        Id::new(&format!("{}{}", role.prefix(), self.counter))
    }
}

/// Form data for a new individual.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonDetails {
    name: Option<String>,
    attributes: Attributes,
}

impl PersonDetails {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Attribute>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    fn into_individual(self, id: Id, role: Role) -> Individual {
        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| role.default_name().to_string());
        Individual::new(id, name).with_attributes(self.attributes)
    }
}

/// Owns a pedigree and applies edits to it.
#[derive(Debug, Clone)]
pub struct Editor<G: IdGenerator = SequentialIds> {
    store: RelationalStore,
    root: Id,
    ids: G,
    config: LayoutConfig,
}

impl<G: IdGenerator> Editor<G> {
    pub fn new(store: RelationalStore, root: Id, ids: G) -> Self {
        Self {
            store,
            root,
            ids,
            config: LayoutConfig::default(),
        }
    }

    /// Starts editing a parsed document.
    pub fn from_document(document: Document, ids: G) -> Self {
        let (root, store) = document.into_parts();
        Self::new(store, root, ids)
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &RelationalStore {
        &self.store
    }

    pub fn root(&self) -> Id {
        self.root
    }

    /// Returns the current state as a document.
    pub fn to_document(&self) -> Document {
        Document::new(self.root, self.store.clone())
    }

    /// Recomputes the layout of the current store.
    ///
    /// # Errors
    ///
    /// Returns [`PedigreeError::Config`] for invalid spacing and
    /// [`PedigreeError::MissingRoot`] when the root is gone.
    pub fn layout(&self) -> Result<Layout, PedigreeError> {
        self.config.validate()?;
        crate::layout::compute(&self.store, self.root, &self.config)
    }

    /// Creates a father and a married-in mother for `id`.
    ///
    /// The father lists the mother as spouse and both list `id` as child.
    /// When `id` was the root the new father becomes the root, so the root
    /// stays on the top row.
    ///
    /// # Errors
    ///
    /// [`EditError::UnknownIndividual`] if `id` is not in the store,
    /// [`EditError::ParentsAlreadyRecorded`] if it has any parent.
    pub fn add_parents(
        &mut self,
        id: Id,
        father: PersonDetails,
        mother: PersonDetails,
    ) -> Result<(Id, Id), EditError> {
        let individual = self.individual(id)?;
        if !individual.is_top_level() {
            return Err(EditError::ParentsAlreadyRecorded(id));
        }

        let father_id = self.fresh_id(Role::Father);
        let mother_id = self.fresh_id(Role::Mother);
        self.store.insert(
            father
                .into_individual(father_id, Role::Father)
                .with_children([id])
                .with_spouses([mother_id]),
        );
        self.store.insert(
            mother
                .into_individual(mother_id, Role::Mother)
                .as_spouse()
                .with_children([id]),
        );
        if let Some(individual) = self.store.get_mut(id) {
            individual.set_parents(Parents::couple(father_id, mother_id));
        }

        if self.root == id {
            self.root = father_id;
            debug!(root:% = father_id; "Root moved to new father");
        }
        info!(id:%, father:% = father_id, mother:% = mother_id; "Parents added");
        Ok((father_id, mother_id))
    }

    /// Creates a child of `id`.
    ///
    /// For a married-in individual the other parent is whoever lists it as a
    /// spouse. Otherwise the other parent is `partner`, which must be one of
    /// `id`'s spouses, or the first spouse, or a new married-in partner when
    /// `id` has none. The lineage parent fills the father slot.
    ///
    /// # Errors
    ///
    /// [`EditError::UnknownIndividual`] if `id` or `partner` is not in the
    /// store, [`EditError::NotASpouse`] if `partner` is not one of `id`'s
    /// spouses.
    pub fn add_child(
        &mut self,
        id: Id,
        partner: Option<Id>,
        details: PersonDetails,
    ) -> Result<Id, EditError> {
        let individual = self.individual(id)?;
        let married_in = individual.is_married_in();
        let spouses = individual.spouses().to_vec();

        let parents = if married_in {
            let lineage = self
                .store
                .iter()
                .find(|other| other.spouses().contains(&id))
                .map(Individual::id);
            Parents::new(lineage, Some(id))
        } else {
            let other = match partner {
                Some(partner) => {
                    self.individual(partner)?;
                    if !spouses.contains(&partner) {
                        return Err(EditError::NotASpouse { id, partner });
                    }
                    partner
                }
                None => match spouses.first() {
                    Some(&spouse) => spouse,
                    None => self.new_partner(id, PersonDetails::default(), Role::Mother),
                },
            };
            Parents::couple(id, other)
        };

        let child_id = self.fresh_id(Role::Child);
        self.store.insert(
            details
                .into_individual(child_id, Role::Child)
                .with_parents(parents),
        );
        for parent in parents.iter() {
            if let Some(parent) = self.store.get_mut(parent) {
                parent.push_child(child_id);
            }
        }

        info!(id:%, child:% = child_id; "Child added");
        Ok(child_id)
    }

    /// Creates a new married-in spouse of `id`.
    ///
    /// # Errors
    ///
    /// [`EditError::UnknownIndividual`] if `id` is not in the store,
    /// [`EditError::SpouseOfSpouse`] if `id` itself joined by marriage.
    pub fn add_spouse(&mut self, id: Id, details: PersonDetails) -> Result<Id, EditError> {
        if self.individual(id)?.is_married_in() {
            return Err(EditError::SpouseOfSpouse(id));
        }
        let spouse_id = self.new_partner(id, details, Role::Spouse);
        info!(id:%, spouse:% = spouse_id; "Spouse added");
        Ok(spouse_id)
    }

    fn individual(&self, id: Id) -> Result<&Individual, EditError> {
        self.store.get(id).ok_or(EditError::UnknownIndividual(id))
    }

    fn fresh_id(&mut self, role: Role) -> Id {
        loop {
            let id = self.ids.next_id(role);
            if !self.store.contains(id) {
                return id;
            }
            debug!(id:%; "Generated identifier already taken, skipping");
        }
    }

    /// Inserts a married-in partner and links it from `id`.
    fn new_partner(&mut self, id: Id, details: PersonDetails, role: Role) -> Id {
        let partner_id = self.fresh_id(role);
        self.store
            .insert(details.into_individual(partner_id, role).as_spouse());
        if let Some(individual) = self.store.get_mut(id) {
            individual.push_spouse(partner_id);
        }
        partner_id
    }
}
