//! Derived old-name → new-name tables.
//!
//! A remap table is recomputed from the override state every time it is
//! needed, never stored, so a reset cannot leave a stale mapping behind.

use std::collections::{BTreeMap, BTreeSet};

use crate::overrides::EntityOverride;

/// Routes suggested entity names to their current destination.
///
/// - a renamed entry maps its suggested name to the new name;
/// - a suggested name the user deleted maps to the first surviving entry
///   (fallback-to-first), so no activity is left dangling;
/// - unchanged and unknown names pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemapTable {
    entries: BTreeMap<String, String>,
}

impl RemapTable {
    /// Build the table for the current state of an override.
    #[must_use]
    pub fn from_override(ov: &EntityOverride) -> Self {
        let mut entries = BTreeMap::new();

        let surviving: BTreeSet<&str> = ov
            .slots()
            .iter()
            .filter_map(|slot| slot.original_name())
            .collect();

        for slot in ov.slots() {
            if let Some(original) = slot.original_name()
                && original != slot.current_name
            {
                entries.insert(original.to_string(), slot.current_name.clone());
            }
        }

        if let Some(first) = ov.first_name() {
            for deleted in ov
                .baseline()
                .iter()
                .filter(|name| !surviving.contains(name.as_str()))
            {
                entries.insert(deleted.clone(), first.to_string());
            }
        }

        Self { entries }
    }

    /// Substitute `name` if the table has an entry for it.
    #[must_use]
    pub fn apply(&self, name: &str) -> String {
        self.entries
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// Number of names that get rerouted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (old, new) pairs in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(old, new)| (old.as_str(), new.as_str()))
    }
}
