//! Identifier management using string interning for efficient string storage and comparison
//!
//! This module provides the [`Id`] type used for every individual in a pedigree.
//! Identifiers are cheap to copy and hash, which matters because the layout
//! passes key almost every map by individual.

use std::{
    cmp::Ordering,
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Efficient identifier type using string interning
///
/// Equality and hashing use the interned symbol. Ordering compares the
/// underlying strings, so sorting identifiers is stable across runs
/// regardless of interning order.
///
/// # Examples
///
/// ```
/// use pedigree_core::identifier::Id;
///
/// let father = Id::new("f");
/// let mother: Id = "m1".into();
///
/// assert_eq!(father, "f");
/// assert!(father < mother);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        let symbol = interner().get_or_intern(name);
        Self(symbol)
    }

    /// Returns `true` if the identifier is the empty string.
    ///
    /// Empty identifiers mark a blank parent slot in serialized records.
    pub fn is_empty(&self) -> bool {
        *self == ""
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{}", str_value)
    }
}

impl std::str::FromStr for Id {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    /// Creates an `Id` from a string slice
    ///
    /// This is a convenience implementation that calls `Id::new`.
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Ord for Id {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.0 == other.0 {
            return Ordering::Equal;
        }
        // Both symbols are resolved under a single lock.
        let interner = interner();
        let lhs = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        let rhs = interner
            .resolve(other.0)
            .expect("Symbol should exist in interner");
        lhs.cmp(rhs)
    }
}

impl PartialOrd for Id {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Id::new(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = Id::new("test_id");
        assert_eq!(id, "test_id");
        assert_eq!(id.to_string(), "test_id");
    }

    #[test]
    fn test_id_equality() {
        let id1 = Id::new("same");
        let id2 = Id::new("same");
        let id3 = Id::new("different");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_id_from_str() {
        let id: Id = "child_1".into();
        assert_eq!(id, "child_1");

        let parsed: Id = "child_1".parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_ordering_follows_strings_not_interning_order() {
        // Interned in reverse alphabetical order on purpose.
        let zed = Id::new("ordering_zed");
        let alpha = Id::new("ordering_alpha");

        assert!(alpha < zed);
        assert_eq!(alpha.cmp(&alpha), Ordering::Equal);

        let mut ids = vec![zed, alpha];
        ids.sort();
        assert_eq!(ids, vec![alpha, zed]);
    }

    #[test]
    fn test_is_empty() {
        assert!(Id::new("").is_empty());
        assert!(!Id::new("x").is_empty());
    }

    #[test]
    fn test_hash_consistency() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(Id::new("key"), "value");

        assert_eq!(map.get(&Id::new("key")), Some(&"value"));
    }

    #[test]
    fn test_display_with_special_characters() {
        let id = Id::new("f:1-\\x");
        assert_eq!(format!("{id}"), "f:1-\\x");
    }
}
