use crate::dispatch::{Channel, DispatchOutcome, PromptTemplate};
use crate::platform::Capability;
use crate::record::Record;
use crate::view_model::{AppViewModel, RecordRowView};

/// Fixed status-poll interval.
pub const POLL_INTERVAL_MS: u64 = 2000;
/// User-visible pause between job completion and affordance re-enable.
pub const COMPLETION_NOTICE_MS: u64 = 1200;
/// Delay before the web target opens behind a deep-link attempt.
pub const WEB_FALLBACK_MS: u64 = 1500;
/// Consecutive transport failures after which polling gives up. A single
/// dropped read must not be mistaken for completion, but the loop cannot
/// spin forever against a dead backend either.
pub const MAX_CONSECUTIVE_POLL_FAILURES: u32 = 5;

/// Which acquisition the backend should run. At most one job is active
/// system-wide regardless of kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    BestSellers,
    Featured,
    /// Scrape a single operator-supplied catalog URL.
    Custom,
}

impl JobKind {
    pub fn label(self) -> &'static str {
        match self {
            JobKind::BestSellers => "best sellers",
            JobKind::Featured => "featured",
            JobKind::Custom => "custom url",
        }
    }
}

/// Status poller lifecycle. `in_flight` guards against overlapping reads
/// when a response outlives the poll interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollerState {
    #[default]
    Stopped,
    Running {
        in_flight: bool,
    },
}

/// Record mutations that must not be re-issued while their backend
/// round-trip is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Select,
    Delete,
}

/// A dispatch waiting on its clipboard ack; the prompt is retained so the
/// fallback branches can still use it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingDispatch {
    pub prompt: String,
    pub caps: Capability,
}

/// Per-channel prompt templates, supplied by configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    instagram: PromptTemplate,
    facebook: PromptTemplate,
}

impl Templates {
    pub fn new(instagram: PromptTemplate, facebook: PromptTemplate) -> Self {
        Self {
            instagram,
            facebook,
        }
    }

    pub fn for_channel(&self, channel: Channel) -> &PromptTemplate {
        match channel {
            Channel::Instagram => &self.instagram,
            Channel::Facebook => &self.facebook,
        }
    }
}

impl Default for Templates {
    fn default() -> Self {
        let instagram = PromptTemplate::new(
            "Write an Instagram caption with hashtags for this product:\n\n{product_text}",
        )
        .expect("built-in template carries the marker");
        let facebook = PromptTemplate::new(
            "Write a Facebook post for this product:\n\n{product_text}",
        )
        .expect("built-in template carries the marker");
        Self::new(instagram, facebook)
    }
}

/// The single owned state container. The host threads it through `update`;
/// nothing else mutates records, the selection or the job flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    records: Vec<Record>,
    selected: Option<usize>,
    job_active: bool,
    job_kind: Option<JobKind>,
    poller: PollerState,
    poll_failures: u32,
    progress: Option<u8>,
    status_line: String,
    pending_dispatch: Option<PendingDispatch>,
    pending_mutation: Option<(Mutation, usize)>,
    manual_copy: Option<String>,
    last_dispatch: Option<DispatchOutcome>,
    ambient_cache_cleared: bool,
    templates: Templates,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_templates(Templates::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_templates(templates: Templates) -> Self {
        Self {
            records: Vec::new(),
            selected: None,
            job_active: false,
            job_kind: None,
            poller: PollerState::Stopped,
            poll_failures: 0,
            progress: None,
            status_line: "Ready".to_string(),
            pending_dispatch: None,
            pending_mutation: None,
            manual_copy: None,
            last_dispatch: None,
            ambient_cache_cleared: false,
            templates,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            records: self
                .records
                .iter()
                .enumerate()
                .map(|(index, record)| RecordRowView {
                    index,
                    title: record.title.clone(),
                    price: record.price.clone(),
                    domain: record.domain.clone(),
                    image_count: record.images.len(),
                })
                .collect(),
            selected_index: self.selected,
            job_active: self.job_active,
            polling: matches!(self.poller, PollerState::Running { .. }),
            progress: self.progress,
            status_line: self.status_line.clone(),
            manual_copy: self.manual_copy.clone(),
            last_dispatch: self.last_dispatch,
            mutation_busy: self.pending_mutation.is_some(),
            can_start_job: !self.job_active,
        }
    }

    /// Returns whether the view changed since the last call, resetting the
    /// flag. The host renders only when this is true.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // --- job controller -------------------------------------------------

    pub(crate) fn job_active(&self) -> bool {
        self.job_active
    }

    /// Accept a start request. Check-then-set happens inside one `update`
    /// call, so no suspension can interleave a second start.
    pub(crate) fn begin_job(&mut self, kind: JobKind) {
        self.job_active = true;
        self.job_kind = Some(kind);
        self.progress = Some(0);
        self.poller = PollerState::Running { in_flight: false };
        self.poll_failures = 0;
        self.status_line = format!("Starting {} scrape...", kind.label());
        self.mark_dirty();
    }

    /// Definite start failure: the poller stops and affordances re-enable
    /// immediately, error surfaced verbatim.
    pub(crate) fn fail_job(&mut self, error: &str) {
        self.job_active = false;
        self.job_kind = None;
        self.poller = PollerState::Stopped;
        self.progress = None;
        self.status_line = format!("Scrape failed to start: {error}");
        self.mark_dirty();
    }

    /// Clears the job flag after the completion notice has been visible.
    pub(crate) fn settle_job(&mut self) {
        self.job_active = false;
        self.job_kind = None;
        self.progress = None;
        self.mark_dirty();
    }

    // --- status poller --------------------------------------------------

    pub(crate) fn poller(&self) -> PollerState {
        self.poller
    }

    /// Claims the next poll slot; `false` means this tick is skipped
    /// (stopped, or the previous read is still outstanding).
    pub(crate) fn begin_poll(&mut self) -> bool {
        match self.poller {
            PollerState::Running { in_flight: false } => {
                self.poller = PollerState::Running { in_flight: true };
                true
            }
            _ => false,
        }
    }

    pub(crate) fn apply_status(&mut self, progress: Option<u8>, message: Option<String>) {
        self.poller = PollerState::Running { in_flight: false };
        self.poll_failures = 0;
        if let Some(progress) = progress {
            self.progress = Some(progress.min(100));
        }
        if let Some(message) = message {
            self.status_line = message;
        }
        self.mark_dirty();
    }

    /// Records one inconclusive tick; returns `true` once the failure run
    /// is long enough to treat as terminal.
    pub(crate) fn record_poll_failure(&mut self) -> bool {
        self.poller = PollerState::Running { in_flight: false };
        self.poll_failures += 1;
        self.poll_failures >= MAX_CONSECUTIVE_POLL_FAILURES
    }

    /// Terminal transition; idempotent by way of the `Stopped` check in
    /// `update`, which is what keeps the refresh at exactly once per job.
    pub(crate) fn finish_polling(&mut self, message: &str) {
        self.poller = PollerState::Stopped;
        self.poll_failures = 0;
        self.progress = Some(100);
        self.status_line = message.to_string();
        self.mark_dirty();
    }

    // --- record store ---------------------------------------------------

    pub(crate) fn record_count(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub(crate) fn selected_record(&self) -> Option<&Record> {
        self.selected.and_then(|index| self.records.get(index))
    }

    /// Wholesale replacement from backend truth. An out-of-range backend
    /// selection is cleared rather than trusted.
    pub(crate) fn replace_records(&mut self, records: Vec<Record>, selected: Option<usize>) {
        self.records = records;
        self.selected = selected.filter(|&index| index < self.records.len());
        self.mark_dirty();
    }

    pub(crate) fn set_selected(&mut self, index: usize) {
        if index < self.records.len() {
            self.selected = Some(index);
            self.mark_dirty();
        }
    }

    /// Removes a record after backend confirmation, recomputing the
    /// selection positionally: deleting the selected slot clears it,
    /// deleting an earlier slot shifts it down.
    pub(crate) fn remove_record(&mut self, index: usize) {
        if index >= self.records.len() {
            return;
        }
        self.records.remove(index);
        self.selected = match self.selected {
            Some(selected) if selected == index => None,
            Some(selected) if selected > index => Some(selected - 1),
            other => other,
        };
        // Belt-and-braces bounds re-validation per the store invariant.
        if let Some(selected) = self.selected {
            if selected >= self.records.len() {
                self.selected = None;
            }
        }
        self.mark_dirty();
    }

    /// Claims the mutation latch; `false` means another select/delete
    /// round-trip is still outstanding and this one is dropped.
    pub(crate) fn begin_mutation(&mut self, mutation: Mutation, index: usize) -> bool {
        if self.pending_mutation.is_some() {
            return false;
        }
        self.pending_mutation = Some((mutation, index));
        self.mark_dirty();
        true
    }

    pub(crate) fn end_mutation(&mut self) {
        self.pending_mutation = None;
        self.mark_dirty();
    }

    // --- dispatch engine ------------------------------------------------

    pub(crate) fn templates(&self) -> &Templates {
        &self.templates
    }

    pub(crate) fn set_pending_dispatch(&mut self, pending: PendingDispatch) {
        self.pending_dispatch = Some(pending);
    }

    pub(crate) fn take_pending_dispatch(&mut self) -> Option<PendingDispatch> {
        self.pending_dispatch.take()
    }

    pub(crate) fn set_dispatch_outcome(&mut self, outcome: DispatchOutcome) {
        self.last_dispatch = Some(outcome);
        self.status_line = outcome.describe().to_string();
        self.mark_dirty();
    }

    pub(crate) fn show_manual_copy(&mut self, prompt: String) {
        self.manual_copy = Some(prompt);
        self.set_dispatch_outcome(DispatchOutcome::ManualFallback);
    }

    pub(crate) fn manual_copy(&self) -> Option<&str> {
        self.manual_copy.as_deref()
    }

    pub(crate) fn dismiss_manual_copy(&mut self) {
        if self.manual_copy.take().is_some() {
            self.mark_dirty();
        }
    }

    /// One-shot latch for the hardened-browser cache clear.
    pub(crate) fn claim_ambient_cache_clear(&mut self) -> bool {
        if self.ambient_cache_cleared {
            return false;
        }
        self.ambient_cache_cleared = true;
        true
    }

    pub(crate) fn set_status(&mut self, message: impl Into<String>) {
        self.status_line = message.into();
        self.mark_dirty();
    }
}
