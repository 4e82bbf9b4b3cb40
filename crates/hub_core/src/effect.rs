use crate::state::JobKind;

/// Host-side timers the core starts and cancels by name.
///
/// `Poll` is repeating; the other two fire once. The host keys running
/// timers by this enum so re-starting one cancels its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    /// Repeating status-poll tick.
    Poll,
    /// Short user-visible delay before job affordances re-enable.
    CompletionNotice,
    /// The deliberate deep-link race: always opens the web target when it
    /// fires, whether or not the deep link resolved.
    WebFallback,
}

/// Side effects requested by [`crate::update`], executed by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue the backend start request for an acquisition job.
    StartJob { kind: JobKind, url: Option<String> },
    /// Read the backend job status once.
    FetchStatus,
    /// Reload the record list from backend truth.
    FetchRecords,
    /// Ask the backend to select a record; local state follows the ack.
    SelectRecord { index: usize },
    /// Ask the backend to delete a record; local state follows the ack.
    DeleteRecord { index: usize },
    StartTimer { timer: Timer, delay_ms: u64 },
    CancelTimer { timer: Timer },
    CopyToClipboard { text: String },
    /// Open the assistant web target, with the prompt query-embedded when
    /// `prompt` is set.
    OpenWeb { prompt: Option<String> },
    /// Fire the OS deep link to the native assistant app.
    OpenDeepLink,
    /// One-time purge of stale ambient artifacts (hardened browsers).
    ClearAmbientCache,
    /// User-visible toast.
    Notify { message: String },
}
