use crate::types::{ApiError, DeleteAck, JobStatus, RecordPage, ScrapeKind, SelectAck, StartAck};

/// The backend surface this client consumes. One trait so tests can script
/// a backend without a socket.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn start_job(&self, kind: ScrapeKind, url: Option<&str>) -> Result<StartAck, ApiError>;

    async fn job_status(&self) -> Result<JobStatus, ApiError>;

    async fn list_records(&self) -> Result<RecordPage, ApiError>;

    async fn select_record(&self, index: usize) -> Result<SelectAck, ApiError>;

    async fn delete_record(&self, index: usize) -> Result<DeleteAck, ApiError>;
}
