//! Hub core: pure state machine for the catalog client runtime.
//!
//! Everything in this crate is side-effect free. The host feeds [`Msg`]
//! values into [`update`] and executes the returned [`Effect`]s; timers,
//! network calls and clipboard access all live outside.
mod dispatch;
mod effect;
mod msg;
mod platform;
mod record;
mod state;
mod update;
mod view_model;

pub use dispatch::{
    assistant_web_url, Channel, DispatchOutcome, PromptTemplate, TemplateError, TEMPLATE_MARKER,
};
pub use effect::{Effect, Timer};
pub use msg::{Direction, Msg};
pub use platform::{detect, is_hardened_variant, Capability, EnvSnapshot};
pub use record::Record;
pub use state::{
    AppState, JobKind, Mutation, PollerState, Templates, COMPLETION_NOTICE_MS,
    MAX_CONSECUTIVE_POLL_FAILURES, POLL_INTERVAL_MS, WEB_FALLBACK_MS,
};
pub use update::update;
pub use view_model::{AppViewModel, RecordRowView};
