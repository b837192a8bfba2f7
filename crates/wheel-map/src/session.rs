//! The import session: one explicit state machine per import attempt.
//!
//! Every flag the workflow needs lives inside the stage payload, so
//! impossible combinations (a job id without a submitted job, a review
//! screen without a suggestion) cannot be represented. The import mode is
//! chosen once, before analysis, and never revisited.

use tracing::{debug, warn};
use wheel_model::{CsvDataset, ImportJob, ImportMode, JobStatus, MappingSuggestion};

use crate::columns::ColumnOverrides;
use crate::error::SessionError;
use crate::overrides::{EntityKind, EntityOverride};
use crate::remap::RemapTable;

/// Review-stage edits layered over the received suggestion.
///
/// Ring and group overrides are `None` until the operator starts editing
/// that kind; resetting a kind drops it back to `None`, reverting to the
/// unedited suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewState {
    pub suggestion: MappingSuggestion,
    rings: Option<EntityOverride>,
    groups: Option<EntityOverride>,
    pub columns: ColumnOverrides,
}

impl ReviewState {
    #[must_use]
    pub fn new(suggestion: MappingSuggestion) -> Self {
        Self {
            suggestion,
            rings: None,
            groups: None,
            columns: ColumnOverrides::default(),
        }
    }

    /// The ring override, snapshotting the suggestion on first access.
    pub fn edit_rings(&mut self) -> &mut EntityOverride {
        let suggested = self.suggestion.ring_names();
        self.rings
            .get_or_insert_with(|| EntityOverride::begin(EntityKind::Ring, &suggested))
    }

    /// The group override, snapshotting the suggestion on first access.
    pub fn edit_groups(&mut self) -> &mut EntityOverride {
        let suggested = self.suggestion.group_names();
        self.groups
            .get_or_insert_with(|| EntityOverride::begin(EntityKind::Group, &suggested))
    }

    #[must_use]
    pub fn rings(&self) -> Option<&EntityOverride> {
        self.rings.as_ref()
    }

    #[must_use]
    pub fn groups(&self) -> Option<&EntityOverride> {
        self.groups.as_ref()
    }

    /// Revert ring edits to the unedited suggestion.
    pub fn reset_rings(&mut self) {
        self.rings = None;
    }

    /// Revert group edits to the unedited suggestion.
    pub fn reset_groups(&mut self) {
        self.groups = None;
    }

    /// Build both remap tables from the current override state.
    ///
    /// Always computed from scratch; caching these across edits would risk
    /// serving a stale mapping after a reset. When both overrides are
    /// active the two tables are built and applied independently.
    #[must_use]
    pub fn remap_tables(&self) -> (RemapTable, RemapTable) {
        let ring_table = self
            .rings
            .as_ref()
            .map(RemapTable::from_override)
            .unwrap_or_default();
        let group_table = self
            .groups
            .as_ref()
            .map(RemapTable::from_override)
            .unwrap_or_default();
        (ring_table, group_table)
    }
}

/// Stage of one import attempt. Strictly forward-moving:
/// select → confirm → analyze → review → import → complete, with `Failed`
/// reachable from any non-terminal stage.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportStage {
    SelectingFile,
    Confirming { dataset: CsvDataset },
    Analyzing { dataset: CsvDataset },
    Reviewing { dataset: CsvDataset, review: ReviewState },
    Importing { job_id: String },
    Complete { job: ImportJob },
    Failed { reason: String },
}

impl ImportStage {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectingFile => "selecting file",
            Self::Confirming { .. } => "confirming",
            Self::Analyzing { .. } => "analyzing",
            Self::Reviewing { .. } => "reviewing",
            Self::Importing { .. } => "importing",
            Self::Complete { .. } => "complete",
            Self::Failed { .. } => "failed",
        }
    }
}

/// One import attempt from file selection to terminal state.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSession {
    mode: ImportMode,
    stage: ImportStage,
    last_error: Option<String>,
}

impl ImportSession {
    /// Start a session. The mode is fixed for the session's lifetime.
    #[must_use]
    pub fn new(mode: ImportMode) -> Self {
        Self {
            mode,
            stage: ImportStage::SelectingFile,
            last_error: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> ImportMode {
        self.mode
    }

    #[must_use]
    pub fn stage(&self) -> &ImportStage {
        &self.stage
    }

    /// The most recent stage error, retained across the fallback
    /// transition so the operator sees why they were sent back.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            stage: self.stage.name(),
        }
    }

    /// A file was parsed; move to the confirmation step.
    pub fn file_parsed(&mut self, dataset: CsvDataset) -> Result<(), SessionError> {
        match self.stage {
            ImportStage::SelectingFile => {
                debug!(
                    source = %dataset.source_name,
                    rows = dataset.row_count(),
                    "dataset attached to session"
                );
                self.last_error = None;
                self.stage = ImportStage::Confirming { dataset };
                Ok(())
            }
            _ => Err(self.invalid("file_parsed")),
        }
    }

    /// The operator confirmed the upload (and, for replace mode, the
    /// destructive consequence); start analysis.
    pub fn confirmed(&mut self) -> Result<&CsvDataset, SessionError> {
        match std::mem::replace(&mut self.stage, ImportStage::SelectingFile) {
            ImportStage::Confirming { dataset } => {
                self.stage = ImportStage::Analyzing { dataset };
                match &self.stage {
                    ImportStage::Analyzing { dataset } => Ok(dataset),
                    _ => unreachable!(),
                }
            }
            other => {
                self.stage = other;
                Err(self.invalid("confirmed"))
            }
        }
    }

    /// Analysis produced a suggestion; enter review.
    pub fn suggestion_received(
        &mut self,
        suggestion: MappingSuggestion,
    ) -> Result<(), SessionError> {
        match std::mem::replace(&mut self.stage, ImportStage::SelectingFile) {
            ImportStage::Analyzing { dataset } => {
                self.stage = ImportStage::Reviewing {
                    dataset,
                    review: ReviewState::new(suggestion),
                };
                Ok(())
            }
            other => {
                self.stage = other;
                Err(self.invalid("suggestion_received"))
            }
        }
    }

    /// Analysis failed; back to file selection with the message retained.
    pub fn analysis_failed(&mut self, reason: impl Into<String>) -> Result<(), SessionError> {
        match self.stage {
            ImportStage::Analyzing { .. } => {
                let reason = reason.into();
                warn!(%reason, "analysis failed, returning to file selection");
                self.last_error = Some(reason);
                self.stage = ImportStage::SelectingFile;
                Ok(())
            }
            _ => Err(self.invalid("analysis_failed")),
        }
    }

    /// Ask for a fresh mapping: back to analyzing, keeping the dataset.
    /// The caller re-invokes the service, passing current column overrides
    /// as manual hints.
    pub fn reanalyze(&mut self) -> Result<&CsvDataset, SessionError> {
        match std::mem::replace(&mut self.stage, ImportStage::SelectingFile) {
            ImportStage::Reviewing { dataset, .. } => {
                self.stage = ImportStage::Analyzing { dataset };
                match &self.stage {
                    ImportStage::Analyzing { dataset } => Ok(dataset),
                    _ => unreachable!(),
                }
            }
            other => {
                self.stage = other;
                Err(self.invalid("reanalyze"))
            }
        }
    }

    /// The review edits, for building the structure and submitting.
    pub fn review(&self) -> Result<&ReviewState, SessionError> {
        match &self.stage {
            ImportStage::Reviewing { review, .. } => Ok(review),
            _ => Err(self.invalid("review")),
        }
    }

    /// Mutable access to the review edits.
    pub fn review_mut(&mut self) -> Result<&mut ReviewState, SessionError> {
        if !matches!(self.stage, ImportStage::Reviewing { .. }) {
            return Err(self.invalid("review_mut"));
        }
        match &mut self.stage {
            ImportStage::Reviewing { review, .. } => Ok(review),
            _ => unreachable!(),
        }
    }

    /// Gate before submission: a blocking suitability warning refuses the
    /// transition so remediation can be shown before any network call.
    pub fn check_importable(&self) -> Result<(), SessionError> {
        let review = self.review()?;
        if let Some(warning) = &review.suggestion.suitability_warning
            && warning.block_import
        {
            return Err(SessionError::ImportBlocked(warning.message.clone()));
        }
        Ok(())
    }

    /// A job was created; the session now holds exactly one job reference.
    pub fn job_submitted(&mut self, job_id: impl Into<String>) -> Result<(), SessionError> {
        match self.stage {
            ImportStage::Reviewing { .. } => {
                let job_id = job_id.into();
                debug!(%job_id, "import job submitted");
                self.stage = ImportStage::Importing { job_id };
                Ok(())
            }
            _ => Err(self.invalid("job_submitted")),
        }
    }

    /// The job id currently being tracked, if any.
    #[must_use]
    pub fn active_job(&self) -> Option<&str> {
        match &self.stage {
            ImportStage::Importing { job_id } => Some(job_id),
            _ => None,
        }
    }

    /// The tracked job reached a terminal state.
    pub fn job_finished(&mut self, job: ImportJob) -> Result<(), SessionError> {
        match &self.stage {
            ImportStage::Importing { job_id } if *job_id == job.id => {
                self.stage = match job.status {
                    JobStatus::Completed => ImportStage::Complete { job },
                    _ => {
                        let reason = job
                            .error_message
                            .clone()
                            .unwrap_or_else(|| "import job failed".to_string());
                        self.last_error = Some(reason.clone());
                        ImportStage::Failed { reason }
                    }
                };
                Ok(())
            }
            _ => Err(self.invalid("job_finished")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wheel_model::{ColumnMapping, SuitabilityWarning, WarningSeverity};

    fn dataset() -> CsvDataset {
        CsvDataset {
            headers: vec!["Activity".to_string(), "Start".to_string()],
            rows: vec![vec!["Kickoff".to_string(), "2026-01-10".to_string()]],
            source_name: "plan.csv".to_string(),
        }
    }

    fn suggestion() -> MappingSuggestion {
        MappingSuggestion {
            column_mapping: ColumnMapping::default(),
            rings: vec![],
            activity_groups: vec![],
            labels: vec![],
            activities: vec![],
            suggested_wheel_title: None,
            suitability_warning: None,
        }
    }

    #[test]
    fn happy_path_reaches_complete() {
        let mut session = ImportSession::new(ImportMode::Append);
        session.file_parsed(dataset()).expect("upload");
        session.confirmed().expect("confirm");
        session.suggestion_received(suggestion()).expect("analyze");
        session.check_importable().expect("not blocked");
        session.job_submitted("job-1").expect("submit");
        assert_eq!(session.active_job(), Some("job-1"));

        let job = ImportJob {
            id: "job-1".to_string(),
            status: JobStatus::Completed,
            progress: 100,
            ..ImportJob::default()
        };
        session.job_finished(job).expect("finish");
        assert!(matches!(session.stage(), ImportStage::Complete { .. }));
    }

    #[test]
    fn out_of_order_transitions_are_rejected() {
        let mut session = ImportSession::new(ImportMode::Append);
        assert!(session.confirmed().is_err());
        assert!(session.job_submitted("job-1").is_err());
        assert!(session.suggestion_received(suggestion()).is_err());
    }

    #[test]
    fn analysis_failure_returns_to_selection_with_message() {
        let mut session = ImportSession::new(ImportMode::Append);
        session.file_parsed(dataset()).expect("upload");
        session.confirmed().expect("confirm");
        session
            .analysis_failed("mapping service returned no usable suggestion")
            .expect("fail");
        assert!(matches!(session.stage(), ImportStage::SelectingFile));
        assert_eq!(
            session.last_error(),
            Some("mapping service returned no usable suggestion")
        );
    }

    #[test]
    fn blocking_suitability_warning_refuses_import() {
        let mut session = ImportSession::new(ImportMode::Replace);
        session.file_parsed(dataset()).expect("upload");
        session.confirmed().expect("confirm");
        let mut blocked = suggestion();
        blocked.suitability_warning = Some(SuitabilityWarning {
            severity: WarningSeverity::Error,
            message: "no date columns detected".to_string(),
            block_import: true,
            remediation: vec!["add a start date column".to_string()],
        });
        session.suggestion_received(blocked).expect("analyze");
        assert!(matches!(
            session.check_importable(),
            Err(SessionError::ImportBlocked(_))
        ));
    }

    #[test]
    fn at_most_one_job_reference_is_held() {
        let mut session = ImportSession::new(ImportMode::Replace);
        assert_eq!(session.active_job(), None);
        session.file_parsed(dataset()).expect("upload");
        session.confirmed().expect("confirm");
        session.suggestion_received(suggestion()).expect("analyze");
        session.job_submitted("job-1").expect("submit");

        // A second submission cannot replace or add a job reference.
        assert!(session.job_submitted("job-2").is_err());
        assert_eq!(session.active_job(), Some("job-1"));
    }

    #[test]
    fn finishing_wrong_job_is_rejected() {
        let mut session = ImportSession::new(ImportMode::Append);
        session.file_parsed(dataset()).expect("upload");
        session.confirmed().expect("confirm");
        session.suggestion_received(suggestion()).expect("analyze");
        session.job_submitted("job-1").expect("submit");

        let other = ImportJob {
            id: "job-9".to_string(),
            status: JobStatus::Completed,
            ..ImportJob::default()
        };
        assert!(session.job_finished(other).is_err());
    }

    #[test]
    fn reset_drops_back_to_unedited_suggestion() {
        let mut review = ReviewState::new(MappingSuggestion {
            rings: vec![wheel_model::RingSuggestion {
                name: "Marketing".to_string(),
                kind: wheel_model::RingKind::Outer,
                color: None,
            }],
            ..suggestion()
        });
        review.edit_rings().rename(0, "Campaigns").expect("rename");
        assert!(review.rings().is_some());
        let (ring_table, _) = review.remap_tables();
        assert_eq!(ring_table.apply("Marketing"), "Campaigns");

        review.reset_rings();
        assert!(review.rings().is_none());
        let (ring_table, _) = review.remap_tables();
        assert!(ring_table.is_empty());
    }
}
