//! Seam between the tracker and the job status source.

use std::future::Future;

use wheel_model::ImportJob;

use crate::client::ImportApiClient;
use crate::error::TransportError;

/// Point-in-time source of job snapshots.
///
/// Implemented by the HTTP client and by in-memory fakes in tests. The
/// returned future must be `Send` so trackers can poll from a spawned task.
pub trait JobFeed: Send + Sync + 'static {
    fn fetch(
        &self,
        job_id: &str,
    ) -> impl Future<Output = Result<ImportJob, TransportError>> + Send;
}

impl JobFeed for ImportApiClient {
    fn fetch(
        &self,
        job_id: &str,
    ) -> impl Future<Output = Result<ImportJob, TransportError>> + Send {
        self.fetch_job(job_id)
    }
}
