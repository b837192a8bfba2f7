//! Column-level overrides: plain role → header replacements.
//!
//! Unlike ring/group overrides these need no remap table: they only change
//! how the dataset is read, not how generated entities relate to each other.
//! The same structure is sent back to the analysis service as manual hints
//! when the operator asks for a fresh mapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use wheel_model::ColumnMapping;

/// The activity fields a source column can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnRole {
    ActivityName,
    StartDate,
    EndDate,
    Ring,
    Group,
    Labels,
    Description,
}

/// User-chosen column replacements, keyed by role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnOverrides {
    choices: BTreeMap<ColumnRole, String>,
}

impl ColumnOverrides {
    /// Replace the column for one role.
    pub fn set(&mut self, role: ColumnRole, header: impl Into<String>) {
        self.choices.insert(role, header.into());
    }

    /// Drop the replacement for one role, reverting to the suggestion.
    pub fn clear(&mut self, role: ColumnRole) {
        self.choices.remove(&role);
    }

    #[must_use]
    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        self.choices.get(&role).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Merge the replacements over a suggested column mapping.
    #[must_use]
    pub fn apply(&self, suggested: &ColumnMapping) -> ColumnMapping {
        let pick = |role: ColumnRole, fallback: &Option<String>| {
            self.choices.get(&role).cloned().or_else(|| fallback.clone())
        };
        ColumnMapping {
            activity_name: pick(ColumnRole::ActivityName, &suggested.activity_name),
            start_date: pick(ColumnRole::StartDate, &suggested.start_date),
            end_date: pick(ColumnRole::EndDate, &suggested.end_date),
            ring: pick(ColumnRole::Ring, &suggested.ring),
            group: pick(ColumnRole::Group, &suggested.group),
            labels: pick(ColumnRole::Labels, &suggested.labels),
            description: pick(ColumnRole::Description, &suggested.description),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_overrides_only_chosen_roles() {
        let suggested = ColumnMapping {
            activity_name: Some("Task".to_string()),
            start_date: Some("Begin".to_string()),
            ..ColumnMapping::default()
        };
        let mut overrides = ColumnOverrides::default();
        overrides.set(ColumnRole::ActivityName, "Title");

        let merged = overrides.apply(&suggested);
        assert_eq!(merged.activity_name.as_deref(), Some("Title"));
        assert_eq!(merged.start_date.as_deref(), Some("Begin"));
    }

    #[test]
    fn clear_reverts_to_suggestion() {
        let suggested = ColumnMapping {
            ring: Some("Track".to_string()),
            ..ColumnMapping::default()
        };
        let mut overrides = ColumnOverrides::default();
        overrides.set(ColumnRole::Ring, "Swimlane");
        overrides.clear(ColumnRole::Ring);

        assert!(overrides.is_empty());
        assert_eq!(overrides.apply(&suggested).ring.as_deref(), Some("Track"));
    }
}
