//! Server-side import job entity, observed (never mutated) by clients.

use serde::{Deserialize, Serialize};

/// Marker the executor writes into `error_message` when a job was cancelled
/// by the operator rather than failing on its own.
pub const CANCELLED_MARKER: &str = "cancelled by user";

/// Lifecycle of an import job. Transitions are monotonic:
/// pending → processing → completed | failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Completed and failed are terminal; nothing may follow them.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Whether the import replaces existing wheel content or adds alongside it.
///
/// `Replace` is destructive: the executor deletes existing rings, groups,
/// labels and activities for the target wheel before inserting (pages are
/// preserved so external references stay valid). `Append` may produce
/// duplicate names. Chosen once, before analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    Replace,
    #[default]
    Append,
}

/// A point-in-time snapshot of an import job row.
///
/// Field names match the status feed's snake_case columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportJob {
    pub id: String,
    pub status: JobStatus,
    /// 0–100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub current_step: Option<String>,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub processed_items: u64,
    #[serde(default)]
    pub created_rings: u64,
    #[serde(default)]
    pub created_groups: u64,
    #[serde(default)]
    pub created_labels: u64,
    #[serde(default)]
    pub created_pages: u64,
    #[serde(default)]
    pub created_items: u64,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ImportJob {
    /// True once the job reached completed or failed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// True when the failure was operator-initiated cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status == JobStatus::Failed
            && self
                .error_message
                .as_deref()
                .is_some_and(|m| m.contains(CANCELLED_MARKER))
    }

    /// A failed job may be retried unless it was cancelled.
    #[must_use]
    pub fn can_retry(&self) -> bool {
        self.status == JobStatus::Failed && !self.is_cancelled()
    }
}
