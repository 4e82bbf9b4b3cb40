//! The single-threaded message loop: one owned [`AppState`], fed by UI
//! intents, timer firings and backend completions alike.

use hub_core::{update, AppState, AppViewModel, Msg};

use crate::effects::EffectRunner;

/// Everything the host loop can receive.
#[derive(Debug)]
pub enum HostEvent {
    Msg(Msg),
    Quit,
}

pub struct Runtime {
    state: AppState,
    runner: EffectRunner,
}

impl Runtime {
    pub fn new(state: AppState, runner: EffectRunner) -> Self {
        Self { state, runner }
    }

    /// Applies one message and executes its effects. Returns the new view
    /// when it changed; the caller renders only then.
    pub fn handle(&mut self, msg: Msg) -> Option<AppViewModel> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = was_dirty.then(|| state.view());
        self.state = state;

        self.runner.run(effects);
        view
    }

    pub fn shutdown(&self) {
        self.runner.shutdown();
    }
}
