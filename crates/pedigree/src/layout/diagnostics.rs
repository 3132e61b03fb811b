//! Recovered data-quality issues.
//!
//! None of these stop a layout. Each is recorded on the [`Layout`](super::Layout)
//! and logged with `warn!` when it is found.

use std::fmt;

use log::warn;
use serde::Serialize;

use pedigree_core::{
    identifier::Id,
    store::{RelationKind, StoreIssue},
};

/// A problem in the input that the layout engine worked around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A relation names an individual missing from the store; it was skipped.
    DanglingReference {
        from: Id,
        to: Id,
        relation: RelationKind,
    },
    /// The individual is not reachable from the root. Its connected group was
    /// laid out on its own, topmost row at generation 0.
    DisconnectedIndividual { id: Id },
    /// The members form a descent cycle; traversal stopped at the first visit.
    DescentCycle { members: Vec<Id> },
    /// Only one side of a parent/child link is recorded; the union was used.
    OneSidedDescent { parent: Id, child: Id },
}

impl Diagnostic {
    /// Logs the diagnostic at warn level with structured fields.
    pub(crate) fn warn(&self) {
        match self {
            Self::DanglingReference { from, to, relation } => {
                warn!(from:%, to:%, relation:%; "Skipping dangling reference");
            }
            Self::DisconnectedIndividual { id } => {
                warn!(id:%; "Individual not reachable from root, laid out with its own group");
            }
            Self::DescentCycle { members } => {
                warn!(members:? = members; "Descent cycle detected");
            }
            Self::OneSidedDescent { parent, child } => {
                warn!(parent:%, child:%; "Parent/child link recorded on one side only");
            }
        }
    }
}

impl From<StoreIssue> for Diagnostic {
    fn from(issue: StoreIssue) -> Self {
        match issue {
            StoreIssue::Dangling { from, to, relation } => {
                Self::DanglingReference { from, to, relation }
            }
            StoreIssue::OneSidedDescent { parent, child } => {
                Self::OneSidedDescent { parent, child }
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingReference { from, to, relation } => {
                write!(f, "{from} references unknown {relation} {to}")
            }
            Self::DisconnectedIndividual { id } => {
                write!(f, "{id} is not connected to the root")
            }
            Self::DescentCycle { members } => {
                let names: Vec<String> = members.iter().map(Id::to_string).collect();
                write!(f, "descent cycle through {}", names.join(", "))
            }
            Self::OneSidedDescent { parent, child } => {
                write!(f, "descent link {parent} -> {child} is recorded on one side only")
            }
        }
    }
}
