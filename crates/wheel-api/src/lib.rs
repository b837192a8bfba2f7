//! Client side of the import service: AI mapping analysis, batch job
//! submission and poll-based progress tracking.

pub mod client;
pub mod error;
pub mod feed;
pub mod tracker;

pub use client::{
    AnalyzeRequest, ClientConfig, ImportApiClient, JobHandle, StructurePayload, SubmitRequest,
};
pub use error::{MappingError, SubmissionError, TransportError};
pub use feed::JobFeed;
pub use tracker::{JobTracker, JobView};
