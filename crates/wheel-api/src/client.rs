//! HTTP client for the import service.
//!
//! Three endpoints: analysis (AI column mapping), batch submission and the
//! job status feed. All payloads are camelCase JSON per the service's
//! dialect.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use wheel_map::ColumnOverrides;
use wheel_model::{
    ActivityGroup, CsvDataset, GeneratedStructure, ImportJob, ImportMode, MappingSuggestion,
    WheelLabel, WheelRing, YearPage,
};

use crate::error::{MappingError, SubmissionError, TransportError};

/// Rows sent inline as a representative sample for the AI prompt.
const SAMPLE_ROWS: usize = 20;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Analysis request: the dataset plus optional operator hints.
///
/// `sample_rows` duplicates the head of `all_rows` so the service can build
/// its prompt without scanning the full payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub headers: Vec<String>,
    pub sample_rows: Vec<Vec<String>>,
    pub total_rows: usize,
    pub all_rows: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_override_hints: Option<ColumnOverrides>,
}

impl AnalyzeRequest {
    /// Build the request from a parsed dataset.
    #[must_use]
    pub fn from_dataset(dataset: &CsvDataset, hints: Option<ColumnOverrides>) -> Self {
        Self {
            headers: dataset.headers.clone(),
            sample_rows: dataset.sample(SAMPLE_ROWS).to_vec(),
            total_rows: dataset.row_count(),
            all_rows: dataset.rows.clone(),
            manual_override_hints: hints.filter(|h| !h.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeEnvelope {
    success: bool,
    suggestions: Option<MappingSuggestion>,
    message: Option<String>,
}

/// Entity lists of the finalized structure, without the pages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructurePayload {
    pub rings: Vec<WheelRing>,
    pub activity_groups: Vec<ActivityGroup>,
    pub labels: Vec<WheelLabel>,
}

/// Batch submission payload. Pages travel beside the structure, not
/// inside it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub import_mode: ImportMode,
    pub structure: StructurePayload,
    pub pages: Vec<YearPage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_target: Option<String>,
    pub source_name: String,
}

impl SubmitRequest {
    /// Split a built structure into the submission shape.
    #[must_use]
    pub fn new(
        import_mode: ImportMode,
        structure: GeneratedStructure,
        source_name: impl Into<String>,
    ) -> Self {
        Self {
            import_mode,
            structure: StructurePayload {
                rings: structure.rings,
                activity_groups: structure.activity_groups,
                labels: structure.labels,
            },
            pages: structure.pages,
            notification_target: None,
            source_name: source_name.into(),
        }
    }

    #[must_use]
    pub fn with_notification_target(mut self, email: impl Into<String>) -> Self {
        self.notification_target = Some(email.into());
        self
    }
}

/// Reference to a created import job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub job_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    job_id: Option<String>,
    message: Option<String>,
}

/// Client configuration. The token is a bearer credential; `None` for
/// unauthenticated local services.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// HTTP client over the import service endpoints.
#[derive(Debug, Clone)]
pub struct ImportApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ImportApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{path}", self.base_url);
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Ask the service to map the dataset's columns and propose structure.
    ///
    /// A transport or service failure here is surfaced, never retried: an
    /// identical payload tends to fail identically, and the operator may
    /// want to fix the file instead.
    #[instrument(skip_all, fields(rows = request.total_rows))]
    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<MappingSuggestion, MappingError> {
        let response = self
            .request(reqwest::Method::POST, "analyze-import-data")
            .json(request)
            .send()
            .await
            .map_err(TransportError::from)?;
        let status = response.status();
        if !status.is_success() {
            return Err(MappingError::Transport(TransportError::Status {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }));
        }
        let envelope: AnalyzeEnvelope = response.json().await.map_err(TransportError::from)?;
        match envelope {
            AnalyzeEnvelope {
                success: true,
                suggestions: Some(suggestion),
                ..
            } => {
                debug!(
                    rings = suggestion.rings.len(),
                    groups = suggestion.activity_groups.len(),
                    activities = suggestion.activities.len(),
                    "analysis suggestion received"
                );
                Ok(suggestion)
            }
            AnalyzeEnvelope { message, .. } => Err(MappingError::NoSuggestion(
                message.unwrap_or_else(|| "empty response".to_string()),
            )),
        }
    }

    /// Submit the finalized structure as an asynchronous import job.
    #[instrument(skip_all, fields(mode = ?request.import_mode, source = %request.source_name))]
    pub async fn submit(&self, request: &SubmitRequest) -> Result<JobHandle, SubmissionError> {
        let response = self
            .request(reqwest::Method::POST, "batch-import-activities")
            .json(request)
            .send()
            .await
            .map_err(TransportError::from)?;
        let status = response.status();
        if status.as_u16() == 422 {
            return Err(SubmissionError::Rejected(
                response.text().await.unwrap_or_default(),
            ));
        }
        if !status.is_success() {
            return Err(SubmissionError::Transport(TransportError::Status {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }));
        }
        let body: SubmitResponse = response.json().await.map_err(TransportError::from)?;
        match body.job_id {
            Some(job_id) => {
                debug!(%job_id, "import job created");
                Ok(JobHandle { job_id })
            }
            None => match body.message {
                Some(message) => Err(SubmissionError::Rejected(message)),
                None => Err(SubmissionError::MissingJobId),
            },
        }
    }

    /// Point-in-time snapshot of a job row.
    pub async fn fetch_job(&self, job_id: &str) -> Result<ImportJob, TransportError> {
        let response = self
            .request(reqwest::Method::GET, &format!("import-jobs/{job_id}"))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }

    /// Request cancellation. Advisory: the executor stops at its next
    /// checkpoint, so a cancelled job may keep progressing briefly.
    #[instrument(skip(self))]
    pub async fn cancel_job(&self, job_id: &str) -> Result<(), TransportError> {
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("import-jobs/{job_id}/cancel"),
            )
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wheel_model::JobStatus;

    fn structure() -> GeneratedStructure {
        GeneratedStructure {
            rings: vec![WheelRing {
                id: "ring-1".to_string(),
                name: "Marketing".to_string(),
                kind: wheel_model::RingKind::Outer,
                color: None,
                visible: true,
            }],
            activity_groups: vec![],
            labels: vec![],
            pages: vec![YearPage {
                id: "page-1".to_string(),
                year: 2026,
                page_order: 1,
                title: "2026".to_string(),
                items: vec![],
            }],
        }
    }

    #[test]
    fn submit_payload_carries_import_mode_on_the_wire() {
        let request = SubmitRequest::new(ImportMode::Replace, structure(), "plan.csv");
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["importMode"], "replace");
        assert_eq!(value["sourceName"], "plan.csv");
        // Pages are a sibling of the structure, not nested in it.
        assert!(value["structure"].get("pages").is_none());
        assert_eq!(value["pages"][0]["year"], 2026);
        // Absent notification target is omitted entirely.
        assert!(value.get("notificationTarget").is_none());
    }

    #[test]
    fn notification_target_is_forwarded_when_set() {
        let request = SubmitRequest::new(ImportMode::Append, structure(), "plan.csv")
            .with_notification_target("ops@example.com");
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["notificationTarget"], "ops@example.com");
    }

    #[test]
    fn analyze_request_samples_the_head_of_the_rows() {
        let dataset = CsvDataset {
            headers: vec!["Activity".to_string()],
            rows: (0..30).map(|i| vec![format!("row {i}")]).collect(),
            source_name: "plan.csv".to_string(),
        };
        let request = AnalyzeRequest::from_dataset(&dataset, None);
        assert_eq!(request.sample_rows.len(), SAMPLE_ROWS);
        assert_eq!(request.total_rows, 30);
        assert_eq!(request.all_rows.len(), 30);
    }

    #[test]
    fn job_snapshot_deserializes_from_feed_columns() {
        let job: ImportJob = serde_json::from_str(
            r#"{
                "id": "job-1",
                "status": "processing",
                "progress": 45,
                "current_step": "Creating activities",
                "total_items": 120,
                "processed_items": 54
            }"#,
        )
        .expect("deserialize");
        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.current_step.as_deref(), Some("Creating activities"));
    }
}
