use crate::dispatch::DispatchOutcome;

/// Render-ready snapshot of [`crate::AppState`]. Presentation consumes
/// this; it never reaches back into the state container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub records: Vec<RecordRowView>,
    pub selected_index: Option<usize>,
    pub job_active: bool,
    pub polling: bool,
    /// 0-100 while a job is observed.
    pub progress: Option<u8>,
    pub status_line: String,
    /// Full prompt text for the manual-copy panel, when shown.
    pub manual_copy: Option<String>,
    pub last_dispatch: Option<DispatchOutcome>,
    /// A select/delete round-trip is outstanding; its affordances are
    /// disabled until the ack lands.
    pub mutation_busy: bool,
    pub can_start_job: bool,
}

/// One record card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRowView {
    pub index: usize,
    pub title: String,
    pub price: String,
    pub domain: Option<String>,
    pub image_count: usize,
}
