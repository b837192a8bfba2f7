//! Mapping suggestion document returned by the analysis service.
//!
//! This is the read-only baseline the operator edits against. Field names
//! follow the service's JSON dialect (camelCase) on the wire.

use serde::{Deserialize, Serialize};

/// Which source column feeds each activity field.
///
/// `None` means the service found no usable column for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    pub activity_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub ring: Option<String>,
    pub group: Option<String>,
    pub labels: Option<String>,
    pub description: Option<String>,
}

/// Ring placement relative to the wheel center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RingKind {
    Inner,
    Outer,
}

/// A ring the service proposes to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingSuggestion {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RingKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// An activity group the service proposes to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSuggestion {
    pub name: String,
    pub color: String,
}

/// A label the service proposes to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSuggestion {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// One activity row, with ring/group referenced by *name*.
///
/// Names are resolved to IDs by the structure builder; until then they must
/// match entries in the suggestion's ring and group lists (or survive the
/// remap tables derived from user overrides).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySuggestion {
    pub name: String,
    /// ISO date (`YYYY-MM-DD`) as emitted by the service.
    pub start_date: String,
    pub end_date: String,
    pub ring: String,
    pub group: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub label_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Severity of a suitability warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}

/// Service-emitted flag that the uploaded data is structurally unsuited
/// for the wheel visualization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuitabilityWarning {
    pub severity: WarningSeverity,
    pub message: String,
    /// When set, the import must not proceed with this suggestion.
    pub block_import: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remediation: Vec<String>,
}

/// The full analysis output: column mapping plus proposed structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingSuggestion {
    pub column_mapping: ColumnMapping,
    pub rings: Vec<RingSuggestion>,
    pub activity_groups: Vec<GroupSuggestion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<LabelSuggestion>,
    pub activities: Vec<ActivitySuggestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_wheel_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suitability_warning: Option<SuitabilityWarning>,
}

impl MappingSuggestion {
    /// Names of the suggested rings, in suggestion order.
    #[must_use]
    pub fn ring_names(&self) -> Vec<String> {
        self.rings.iter().map(|r| r.name.clone()).collect()
    }

    /// Names of the suggested activity groups, in suggestion order.
    #[must_use]
    pub fn group_names(&self) -> Vec<String> {
        self.activity_groups.iter().map(|g| g.name.clone()).collect()
    }

    /// True when the suitability warning forbids importing this suggestion.
    #[must_use]
    pub fn import_blocked(&self) -> bool {
        self.suitability_warning
            .as_ref()
            .is_some_and(|w| w.block_import)
    }
}
