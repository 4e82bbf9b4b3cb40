//! Hub backend: HTTP client for the acquisition backend and the command
//! thread that runs it.
mod api;
mod handle;
mod http;
mod types;

pub use api::ApiClient;
pub use handle::{BackendCommand, BackendEvent, BackendHandle};
pub use http::{ClientSettings, HttpApiClient};
pub use types::{
    ApiError, DeleteAck, JobStatus, RecordDto, RecordPage, ScrapeKind, SelectAck, StartAck,
};
