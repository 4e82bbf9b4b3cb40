use serde::Deserialize;

/// Which acquisition the backend should run; each maps to its own start
/// endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeKind {
    BestSellers,
    Featured,
    Custom,
}

impl ScrapeKind {
    pub(crate) fn path(self) -> &'static str {
        match self {
            ScrapeKind::BestSellers => "api/scrape_best_sellers",
            ScrapeKind::Featured => "api/scrape_featured",
            ScrapeKind::Custom => "api/scrape_custom",
        }
    }
}

/// Backend ack for a start request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StartAck {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StartAck {
    /// Error text for a failed start, falling back to the message field
    /// some backend versions use instead.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

/// One status read. `progress` is a 0-100 float on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobStatus {
    pub active: bool,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl JobStatus {
    pub fn progress_percent(&self) -> Option<u8> {
        self.progress.map(|p| p.clamp(0.0, 100.0).round() as u8)
    }
}

/// One record as the backend serializes it. Every field is defaulted; a
/// sparse scrape result must not fail the whole page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecordDto {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub local_images: Vec<String>,
}

/// The full record listing, backend truth for the store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecordPage {
    #[serde(default)]
    pub products: Vec<RecordDto>,
    #[serde(default)]
    pub selected_index: Option<usize>,
    #[serde(default)]
    pub total_count: usize,
}

/// Backend ack for a selection call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectAck {
    pub success: bool,
    #[serde(default)]
    pub selected_index: Option<usize>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Backend ack for a delete call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeleteAck {
    pub success: bool,
    #[serde(default)]
    pub remaining_products: Option<usize>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Transport and protocol failures, mapped so the core can tell a
/// transient network hiccup from a definite backend answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("invalid base url: {0}")]
    InvalidBase(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout;
    }
    if err.is_decode() {
        return ApiError::Decode(err.to_string());
    }
    ApiError::Network(err.to_string())
}
