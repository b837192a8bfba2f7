//! Error types for talking to the import service.

use thiserror::Error;

/// Transport-level failure: the request never produced a usable response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned {status}: {message}")]
    Status { status: u16, message: String },
}

/// Analysis failed. Not auto-retried; the operator decides whether to
/// re-run with hints or pick a different file.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service answered but produced nothing an import can proceed on.
    #[error("mapping service produced no usable suggestion: {0}")]
    NoSuggestion(String),
}

/// Submitting the finalized structure failed. No job was created.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("submission rejected: {0}")]
    Rejected(String),

    #[error("submission accepted but the response carried no job id")]
    MissingJobId,
}
