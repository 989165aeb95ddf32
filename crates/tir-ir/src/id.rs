//! Identifiers.
//!
//! An [`Id`] is an opaque, identity-comparable token carrying a display
//! name. Identity is by an internal monotonic counter, not by name — two
//! distinct `Id`s may share a display name until the name table that
//! allocated them has disambiguated it.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_UNIQUE: AtomicU32 = AtomicU32::new(0);

/// A variable/function identifier.
///
/// `Clone` is cheap (an `Rc<str>` clone plus a `Copy` integer); equality and
/// hashing are by the unique counter alone, never by name.
#[derive(Clone, Debug, Eq)]
pub struct Id {
    name: std::rc::Rc<str>,
    unique: u32,
}

impl Id {
    /// Allocate a fresh `Id` with the given display name.
    ///
    /// This bypasses the name table's uniqueness bookkeeping for display
    /// names; callers building IR should go through
    /// `tir_builder::NameTable::get_unique_name` instead so that two
    /// emitted vars never share a display name by accident.
    pub fn fresh(name: impl Into<std::rc::Rc<str>>) -> Self {
        Id {
            name: name.into(),
            unique: NEXT_UNIQUE.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn name_hint(&self) -> &str {
        &self.name
    }

    pub fn unique(&self) -> u32 {
        self.unique
    }
}

impl PartialEq for Id {
    fn eq(&self, other: &Self) -> bool {
        self.unique == other.unique
    }
}

impl std::hash::Hash for Id {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.unique.hash(state);
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
