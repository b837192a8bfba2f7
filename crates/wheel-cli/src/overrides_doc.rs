//! Override document: declarative review edits loaded from a JSON file.
//!
//! In a non-interactive run the operator cannot click through a review
//! screen, so rename/add/remove edits and column reassignments are read
//! from a file and replayed onto the session's review state.
//!
//! ```json
//! {
//!   "rings": { "rename": { "Marketing": "Campaigns" } },
//!   "groups": { "remove": ["Misc"], "add": ["Launches"] },
//!   "columns": { "startDate": "Kickoff date" }
//! }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::warn;
use wheel_map::{ColumnOverrides, EntityOverride, MapError, ReviewState};

/// Edits for one entity list, keyed by current name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityEdits {
    #[serde(default)]
    pub rename: BTreeMap<String, String>,
    #[serde(default)]
    pub add: Vec<String>,
    #[serde(default)]
    pub remove: Vec<String>,
}

impl EntityEdits {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rename.is_empty() && self.add.is_empty() && self.remove.is_empty()
    }
}

/// The full override document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideDoc {
    #[serde(default)]
    pub rings: EntityEdits,
    #[serde(default)]
    pub groups: EntityEdits,
    #[serde(default)]
    pub columns: ColumnOverrides,
}

impl OverrideDoc {
    /// Replay the document onto a review state.
    ///
    /// Removals run before renames so a document may both delete an entry
    /// and rename another without ordering surprises. Edits naming an
    /// unknown entry are skipped with a warning; a removal that would
    /// empty the list is an error.
    pub fn apply(&self, review: &mut ReviewState) -> Result<(), MapError> {
        if !self.rings.is_empty() {
            apply_entity_edits(review.edit_rings(), &self.rings)?;
        }
        if !self.groups.is_empty() {
            apply_entity_edits(review.edit_groups(), &self.groups)?;
        }
        review.columns = self.columns.clone();
        Ok(())
    }
}

fn apply_entity_edits(ov: &mut EntityOverride, edits: &EntityEdits) -> Result<(), MapError> {
    for name in &edits.remove {
        match slot_id_by_name(ov, name) {
            Some(id) => {
                ov.remove(id)?;
            }
            None => warn!(kind = %ov.kind, name = %name, "remove target not found, skipping"),
        }
    }
    for (old, new) in &edits.rename {
        match slot_id_by_name(ov, old) {
            Some(id) => ov.rename(id, new)?,
            None => warn!(kind = %ov.kind, name = %old, "rename target not found, skipping"),
        }
    }
    for name in &edits.add {
        ov.add(name)?;
    }
    Ok(())
}

fn slot_id_by_name(ov: &EntityOverride, name: &str) -> Option<u32> {
    ov.slots()
        .iter()
        .find(|slot| slot.current_name == name)
        .map(|slot| slot.id)
}
