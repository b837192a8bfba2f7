//! Finalized import structure with assigned IDs and per-year pages.
//!
//! This is the payload shape the execution endpoint accepts. IDs are stable
//! within one build (`ring-1`, `group-2`, ...) and remapped to database IDs
//! by the executor.

use serde::{Deserialize, Serialize};

use crate::suggestion::RingKind;

/// A ring with an assigned structure-local ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelRing {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RingKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub visible: bool,
}

/// An activity group with an assigned structure-local ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityGroup {
    pub id: String,
    pub name: String,
    pub color: String,
    pub visible: bool,
}

/// A label with an assigned structure-local ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelLabel {
    pub id: String,
    pub name: String,
    pub color: String,
    pub visible: bool,
}

/// One resolved activity.
///
/// `ring_id`/`group_id` are `None` when the referenced name could not be
/// resolved; such items are flagged by the builder, never silently dropped.
/// `label_id` is the legacy single-label field kept for backward
/// compatibility; `label_ids` carries the full set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelItem {
    pub id: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub ring_id: Option<String>,
    #[serde(rename = "activityId")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub label_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A year-scoped container of activities within one wheel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearPage {
    pub id: String,
    pub year: i32,
    pub page_order: u32,
    pub title: String,
    pub items: Vec<WheelItem>,
}

/// The complete import payload: entities plus partitioned pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedStructure {
    pub rings: Vec<WheelRing>,
    pub activity_groups: Vec<ActivityGroup>,
    pub labels: Vec<WheelLabel>,
    pub pages: Vec<YearPage>,
}

impl GeneratedStructure {
    /// Total number of items across all pages.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.pages.iter().map(|p| p.items.len()).sum()
    }
}
