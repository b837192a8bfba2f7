//! Poll-based job progress tracking over a `watch` channel.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};
use wheel_model::{ImportJob, JobStatus};

use crate::feed::JobFeed;

/// Read-only projection of a job snapshot for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobView {
    pub status: JobStatus,
    pub percent: u8,
    pub current_step: Option<String>,
    pub processed_items: u64,
    pub total_items: u64,
    pub created_rings: u64,
    pub created_groups: u64,
    pub created_labels: u64,
    pub created_pages: u64,
    pub created_items: u64,
    pub error_message: Option<String>,
    pub is_complete: bool,
    pub is_failed: bool,
    pub can_retry: bool,
}

impl From<&ImportJob> for JobView {
    fn from(job: &ImportJob) -> Self {
        let is_complete = job.status == JobStatus::Completed;
        Self {
            status: job.status,
            percent: job.progress.min(100),
            current_step: job.current_step.clone(),
            processed_items: job.processed_items,
            total_items: job.total_items,
            created_rings: job.created_rings,
            created_groups: job.created_groups,
            created_labels: job.created_labels,
            created_pages: job.created_pages,
            created_items: job.created_items,
            error_message: job.error_message.clone(),
            is_complete,
            // Completed and failed are mutually exclusive by construction.
            is_failed: !is_complete && job.status == JobStatus::Failed,
            can_retry: job.can_retry(),
        }
    }
}

/// Polls a [`JobFeed`] for one job and publishes snapshots.
///
/// The first snapshot is fetched immediately; afterwards the feed is
/// polled at `poll_interval`. The first terminal snapshot is latched: the
/// poll loop stops there, so observers never see a terminal state regress
/// or flip. Transient fetch errors are logged and polling continues.
#[derive(Debug)]
pub struct JobTracker {
    job_id: String,
    rx: watch::Receiver<Option<ImportJob>>,
    handle: JoinHandle<()>,
}

impl JobTracker {
    pub fn spawn<F: JobFeed>(feed: F, job_id: impl Into<String>, poll_interval: Duration) -> Self {
        let job_id = job_id.into();
        let (tx, rx) = watch::channel(None);
        let poll_id = job_id.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match feed.fetch(&poll_id).await {
                    Ok(job) => {
                        let terminal = job.is_terminal();
                        if tx.send(Some(job)).is_err() {
                            debug!(job_id = %poll_id, "all observers dropped, stopping poll");
                            return;
                        }
                        if terminal {
                            debug!(job_id = %poll_id, "job reached terminal state");
                            return;
                        }
                    }
                    Err(err) => {
                        warn!(job_id = %poll_id, error = %err, "job poll failed, will retry");
                    }
                }
            }
        });
        Self { job_id, rx, handle }
    }

    #[must_use]
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// The most recent snapshot, if one has arrived yet.
    #[must_use]
    pub fn latest(&self) -> Option<ImportJob> {
        self.rx.borrow().clone()
    }

    /// An independent observer of this tracker's snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<ImportJob>> {
        self.rx.clone()
    }

    /// Wait for the next unseen snapshot. `None` once the poll loop has
    /// stopped and the last snapshot was already observed.
    pub async fn next_snapshot(&mut self) -> Option<ImportJob> {
        if self.rx.changed().await.is_err() {
            return None;
        }
        self.rx.borrow_and_update().clone()
    }

    /// Block until the job reaches a terminal state. `None` only if the
    /// poll loop stopped without ever latching one.
    pub async fn wait_terminal(&mut self) -> Option<ImportJob> {
        loop {
            let current = self.rx.borrow_and_update().clone();
            if let Some(job) = current
                && job.is_terminal()
            {
                return Some(job);
            }
            if self.rx.changed().await.is_err() {
                return self.rx.borrow().clone().filter(ImportJob::is_terminal);
            }
        }
    }

    /// Stop observing. The job itself keeps running on the server; only
    /// the local poll loop is torn down.
    pub fn detach(self) {
        debug!(job_id = %self.job_id, "detaching from job");
        self.handle.abort();
    }
}

impl Drop for JobTracker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wheel_model::CANCELLED_MARKER;

    fn failed_job(message: &str) -> ImportJob {
        ImportJob {
            id: "job-1".to_string(),
            status: JobStatus::Failed,
            progress: 60,
            error_message: Some(message.to_string()),
            ..ImportJob::default()
        }
    }

    #[test]
    fn completed_view_is_never_also_failed() {
        let job = ImportJob {
            id: "job-1".to_string(),
            status: JobStatus::Completed,
            progress: 100,
            ..ImportJob::default()
        };
        let view = JobView::from(&job);
        assert!(view.is_complete);
        assert!(!view.is_failed);
        assert!(!view.can_retry);
    }

    #[test]
    fn plain_failure_is_retryable() {
        let view = JobView::from(&failed_job("ring insert rejected"));
        assert!(view.is_failed);
        assert!(!view.is_complete);
        assert!(view.can_retry);
    }

    #[test]
    fn cancellation_is_not_retryable() {
        let view = JobView::from(&failed_job(CANCELLED_MARKER));
        assert!(view.is_failed);
        assert!(!view.can_retry);
    }

    #[test]
    fn percent_is_clamped() {
        let job = ImportJob {
            id: "job-1".to_string(),
            status: JobStatus::Processing,
            progress: 140,
            ..ImportJob::default()
        };
        assert_eq!(JobView::from(&job).percent, 100);
    }
}
