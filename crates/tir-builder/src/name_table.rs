//! Fresh-name allocation.
//!
//! Owned by exactly one [`crate::builder::BlockBuilder`] at a time.
//! Guarantees that two `Id`s it hands out never share a display name —
//! the core's identity guarantee (distinct `Id`s compare unequal) holds
//! regardless, but this additionally keeps printed IR readable.

use rustc_hash::FxHashSet;
use tir_common::limits::MAX_NAME_DISAMBIGUATION_ATTEMPTS;
use tir_ir::Id;

#[derive(Debug, Default)]
pub struct NameTable {
    used: FxHashSet<String>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an `Id` named `hint` if that name is unused in this table,
    /// else `hint1`, `hint2`, ... for the smallest positive integer making
    /// it unused.
    pub fn get_unique_name(&mut self, hint: &str) -> Id {
        if self.used.insert(hint.to_string()) {
            return Id::fresh(hint);
        }
        for k in 1..=MAX_NAME_DISAMBIGUATION_ATTEMPTS {
            let candidate = format!("{hint}{k}");
            if self.used.insert(candidate.clone()) {
                return Id::fresh(candidate);
            }
        }
        // Hitting this means something is emitting on the order of ten
        // thousand vars under one hint in a single builder; fall back to a
        // name that cannot collide rather than loop forever.
        tracing::error!(hint, "exhausted name disambiguation attempts");
        let fallback = format!("{hint}_{}", fallback_suffix());
        self.used.insert(fallback.clone());
        Id::fresh(fallback)
    }
}

fn fallback_suffix() -> u32 {
    // Reuse Id's own uniqueness counter indirectly via a throwaway Id so we
    // never need a second global counter just for this rare branch.
    Id::fresh("").unique()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disambiguates_repeated_hints() {
        let mut t = NameTable::new();
        let a = t.get_unique_name("lv");
        let b = t.get_unique_name("lv");
        let c = t.get_unique_name("lv");
        assert_eq!(a.name_hint(), "lv");
        assert_eq!(b.name_hint(), "lv1");
        assert_eq!(c.name_hint(), "lv2");
        assert_ne!(a, b);
        assert_ne!(b, c);
    }

    #[test]
    fn distinct_hints_do_not_collide() {
        let mut t = NameTable::new();
        let a = t.get_unique_name("x");
        let b = t.get_unique_name("y");
        assert_eq!(a.name_hint(), "x");
        assert_eq!(b.name_hint(), "y");
    }
}
