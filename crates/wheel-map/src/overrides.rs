//! User overrides of the suggested ring and group lists.
//!
//! Each kind (ring, group) is edited as an ordered list of slots. A slot
//! records where its name came from: unchanged from the suggestion, renamed
//! from a suggested name, or added by the user. This keeps enough history to
//! derive a remap table without parallel-array bookkeeping.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// Which entity list an override edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Ring,
    Group,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ring => f.write_str("ring"),
            Self::Group => f.write_str("activity group"),
        }
    }
}

/// Provenance of one override slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "lowercase")]
pub enum SlotOrigin {
    /// Still carries the suggested name unchanged.
    Suggested,
    /// Renamed by the user; `from` is the suggested name it replaces.
    Renamed { from: String },
    /// Added by the user; no suggested name maps to it.
    Added,
}

/// One entry in an edited entity list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideSlot {
    /// Stable handle for edits while the list is reordered by removals.
    pub id: u32,
    pub current_name: String,
    #[serde(flatten)]
    pub origin: SlotOrigin,
}

impl OverrideSlot {
    /// The suggested name this slot still answers for, if any.
    #[must_use]
    pub fn original_name(&self) -> Option<&str> {
        match &self.origin {
            SlotOrigin::Suggested => Some(&self.current_name),
            SlotOrigin::Renamed { from } => Some(from),
            SlotOrigin::Added => None,
        }
    }
}

/// An edited entity list for one kind, tracking provenance per slot.
///
/// Created by snapshotting the suggestion's names (`begin`); every edit goes
/// through [`rename`](Self::rename), [`add`](Self::add),
/// [`remove`](Self::remove) or [`reset`](Self::reset) so the provenance
/// stays consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityOverride {
    pub kind: EntityKind,
    slots: Vec<OverrideSlot>,
    /// The suggestion snapshot taken at `begin`, used by `reset`.
    baseline: Vec<String>,
    next_id: u32,
}

impl EntityOverride {
    /// Enter edit mode: snapshot the suggested names as unchanged slots.
    #[must_use]
    pub fn begin(kind: EntityKind, suggested_names: &[String]) -> Self {
        let slots = suggested_names
            .iter()
            .enumerate()
            .map(|(idx, name)| OverrideSlot {
                id: idx as u32,
                current_name: name.clone(),
                origin: SlotOrigin::Suggested,
            })
            .collect();
        Self {
            kind,
            slots,
            baseline: suggested_names.to_vec(),
            next_id: suggested_names.len() as u32,
        }
    }

    /// The slots in display order.
    #[must_use]
    pub fn slots(&self) -> &[OverrideSlot] {
        &self.slots
    }

    /// The suggested names snapshotted when editing began.
    #[must_use]
    pub fn baseline(&self) -> &[String] {
        &self.baseline
    }

    /// Current names in display order.
    #[must_use]
    pub fn current_names(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.current_name.clone()).collect()
    }

    /// The first current name. Lists are never empty (removal of the last
    /// slot is refused), so this only returns `None` for a snapshot of an
    /// empty suggestion.
    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.slots.first().map(|s| s.current_name.as_str())
    }

    /// True if any slot differs from the suggestion snapshot.
    #[must_use]
    pub fn is_edited(&self) -> bool {
        self.current_names() != self.baseline
    }

    fn slot_index(&self, id: u32) -> Result<usize, MapError> {
        self.slots
            .iter()
            .position(|s| s.id == id)
            .ok_or(MapError::SlotNotFound(id))
    }

    /// Rename a slot. The original suggested name is preserved so the remap
    /// table can route old references to the new name.
    pub fn rename(&mut self, id: u32, new_name: &str) -> Result<(), MapError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(MapError::EmptyName(self.kind));
        }
        let idx = self.slot_index(id)?;
        let slot = &mut self.slots[idx];
        slot.origin = match std::mem::replace(&mut slot.origin, SlotOrigin::Added) {
            SlotOrigin::Suggested => {
                if slot.current_name == new_name {
                    SlotOrigin::Suggested
                } else {
                    SlotOrigin::Renamed {
                        from: slot.current_name.clone(),
                    }
                }
            }
            SlotOrigin::Renamed { from } => {
                // Renaming back to the suggested name makes it unchanged again.
                if from == new_name {
                    SlotOrigin::Suggested
                } else {
                    SlotOrigin::Renamed { from }
                }
            }
            SlotOrigin::Added => SlotOrigin::Added,
        };
        slot.current_name = new_name.to_string();
        Ok(())
    }

    /// Append a user-added entry. It is a brand-new destination; no
    /// suggested name remaps onto it.
    pub fn add(&mut self, name: &str) -> Result<u32, MapError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MapError::EmptyName(self.kind));
        }
        let id = self.next_id;
        self.next_id += 1;
        self.slots.push(OverrideSlot {
            id,
            current_name: name.to_string(),
            origin: SlotOrigin::Added,
        });
        Ok(id)
    }

    /// Remove a slot. Refused for the last remaining one: every activity
    /// must keep a destination of each kind.
    pub fn remove(&mut self, id: u32) -> Result<OverrideSlot, MapError> {
        if self.slots.len() <= 1 {
            return Err(MapError::LastEntity(self.kind));
        }
        let idx = self.slot_index(id)?;
        Ok(self.slots.remove(idx))
    }

    /// Revert every edit, restoring the snapshot taken at `begin`.
    pub fn reset(&mut self) {
        self.slots = self
            .baseline
            .iter()
            .enumerate()
            .map(|(idx, name)| OverrideSlot {
                id: idx as u32,
                current_name: name.clone(),
                origin: SlotOrigin::Suggested,
            })
            .collect();
        self.next_id = self.baseline.len() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn begin_snapshots_suggestion() {
        let ov = EntityOverride::begin(EntityKind::Ring, &names(&["Marketing", "Operations"]));
        assert_eq!(ov.current_names(), names(&["Marketing", "Operations"]));
        assert!(!ov.is_edited());
    }

    #[test]
    fn rename_preserves_original_name() {
        let mut ov = EntityOverride::begin(EntityKind::Ring, &names(&["Marketing"]));
        ov.rename(0, "Campaigns").expect("rename");
        assert_eq!(ov.slots()[0].original_name(), Some("Marketing"));
        assert_eq!(ov.slots()[0].current_name, "Campaigns");
        assert!(ov.is_edited());
    }

    #[test]
    fn rename_back_clears_edit() {
        let mut ov = EntityOverride::begin(EntityKind::Ring, &names(&["Marketing"]));
        ov.rename(0, "Campaigns").expect("rename");
        ov.rename(0, "Marketing").expect("rename back");
        assert_eq!(ov.slots()[0].origin, SlotOrigin::Suggested);
        assert!(!ov.is_edited());
    }

    #[test]
    fn added_slots_have_no_original() {
        let mut ov = EntityOverride::begin(EntityKind::Group, &names(&["Misc"]));
        let id = ov.add("Launches").expect("add");
        let slot = ov.slots().iter().find(|s| s.id == id).expect("slot");
        assert_eq!(slot.original_name(), None);
    }

    #[test]
    fn removing_last_slot_is_refused() {
        let mut ov = EntityOverride::begin(EntityKind::Group, &names(&["Misc"]));
        assert_eq!(ov.remove(0), Err(MapError::LastEntity(EntityKind::Group)));
        ov.add("Launches").expect("add");
        ov.remove(0).expect("remove once a second exists");
    }

    #[test]
    fn reset_restores_snapshot_exactly() {
        let suggested = names(&["Marketing", "Operations"]);
        let mut ov = EntityOverride::begin(EntityKind::Ring, &suggested);
        ov.rename(0, "Campaigns").expect("rename");
        ov.add("Events").expect("add");
        ov.remove(1).expect("remove");
        ov.reset();
        assert_eq!(ov.current_names(), suggested);
        assert!(!ov.is_edited());
        assert!(ov.slots().iter().all(|s| s.origin == SlotOrigin::Suggested));
    }

    #[test]
    fn slots_serialize_with_tagged_origin() {
        let mut ov = EntityOverride::begin(EntityKind::Ring, &names(&["Marketing"]));
        ov.rename(0, "Campaigns").expect("rename");
        ov.add("Events").expect("add");

        let json = serde_json::to_value(ov.slots()).expect("serialize");
        assert_eq!(json[0]["origin"], "renamed");
        assert_eq!(json[0]["from"], "Marketing");
        assert_eq!(json[0]["current_name"], "Campaigns");
        assert_eq!(json[1]["origin"], "added");
        assert!(json[1].get("from").is_none());
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut ov = EntityOverride::begin(EntityKind::Ring, &names(&["Marketing"]));
        assert_eq!(ov.rename(0, "  "), Err(MapError::EmptyName(EntityKind::Ring)));
        assert_eq!(ov.add(""), Err(MapError::EmptyName(EntityKind::Ring)));
    }
}
