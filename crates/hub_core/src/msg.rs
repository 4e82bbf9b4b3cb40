use crate::dispatch::Channel;
use crate::effect::Timer;
use crate::platform::EnvSnapshot;
use crate::record::Record;
use crate::state::JobKind;

/// Step for [`Msg::Navigate`]; movement is clamped, never wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub(crate) fn offset(self) -> i64 {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }
}

/// Everything that can happen: UI intents, timer firings and backend
/// completions, all funnelled through the one `update` loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked to start an acquisition job.
    StartJob { kind: JobKind, url: Option<String> },
    /// Backend ack for the start request.
    JobStartResult { success: bool, error: Option<String> },
    /// A host timer fired.
    TimerFired { timer: Timer },
    /// One status read came back well-formed.
    PollStatus {
        active: bool,
        progress: Option<u8>,
        message: Option<String>,
    },
    /// One status read failed at the transport level.
    PollFailed { error: String },
    /// User asked for a record reload outside the poll cycle.
    RefreshRequested,
    /// Record refresh came back; replaces the store wholesale.
    RecordsLoaded {
        records: Vec<Record>,
        selected_index: Option<usize>,
    },
    RecordsLoadFailed { error: String },
    /// User clicked a record card.
    SelectRecord { index: usize },
    /// Backend ack for a selection call.
    SelectAcked {
        index: usize,
        success: bool,
        error: Option<String>,
    },
    /// User asked to delete a record.
    DeleteRecord { index: usize },
    /// Backend ack for a delete call.
    DeleteAcked {
        index: usize,
        success: bool,
        remaining: Option<usize>,
        error: Option<String>,
    },
    /// User stepped the selection forward or back.
    Navigate { direction: Direction },
    /// User asked to hand the selected record to the assistant. The
    /// environment snapshot is taken fresh at the moment of the click.
    Dispatch { channel: Channel, env: EnvSnapshot },
    /// Host finished (or failed) the clipboard write.
    ClipboardResult { success: bool },
    /// "Open assistant anyway" from the manual-copy panel.
    ManualOpenRequested,
    /// Manual-copy panel closed.
    ManualCopyDismissed,
    /// Fallback for placeholder wiring.
    NoOp,
}
