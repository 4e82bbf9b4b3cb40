use crate::dispatch::DispatchOutcome;
use crate::platform::{self, Capability};
use crate::state::{
    Mutation, PendingDispatch, PollerState, COMPLETION_NOTICE_MS, POLL_INTERVAL_MS,
    WEB_FALLBACK_MS,
};
use crate::{AppState, Channel, Effect, EnvSnapshot, JobKind, Msg, Timer};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartJob { kind, url } => start_job(&mut state, kind, url),
        Msg::JobStartResult { success, error } => {
            if success {
                state.set_status("Scrape running...");
                Vec::new()
            } else {
                let error = error.unwrap_or_else(|| "unknown error".to_string());
                state.fail_job(&error);
                vec![Effect::CancelTimer { timer: Timer::Poll }]
            }
        }
        Msg::TimerFired { timer } => timer_fired(&mut state, timer),
        Msg::PollStatus {
            active,
            progress,
            message,
        } => poll_status(&mut state, active, progress, message),
        Msg::PollFailed { error } => poll_failed(&mut state, &error),
        Msg::RefreshRequested => vec![Effect::FetchRecords],
        Msg::RecordsLoaded {
            records,
            selected_index,
        } => {
            let count = records.len();
            state.replace_records(records, selected_index);
            state.set_status(format!("{count} records loaded"));
            Vec::new()
        }
        Msg::RecordsLoadFailed { error } => {
            state.set_status(format!("Could not load records: {error}"));
            Vec::new()
        }
        Msg::SelectRecord { index } => request_select(&mut state, index),
        Msg::SelectAcked {
            index,
            success,
            error,
        } => {
            state.end_mutation();
            if success {
                state.set_selected(index);
            } else {
                let error = error.unwrap_or_else(|| "selection rejected".to_string());
                state.set_status(format!("Select failed: {error}"));
            }
            Vec::new()
        }
        Msg::DeleteRecord { index } => {
            if index >= state.record_count() {
                state.set_status("Delete ignored: no such record");
                Vec::new()
            } else if state.begin_mutation(Mutation::Delete, index) {
                vec![Effect::DeleteRecord { index }]
            } else {
                // Round-trip outstanding; a double-click must not re-issue.
                Vec::new()
            }
        }
        Msg::DeleteAcked {
            index,
            success,
            remaining,
            error,
        } => {
            state.end_mutation();
            if success {
                state.remove_record(index);
                let remaining = remaining.unwrap_or(state.record_count());
                state.set_status(format!("Record deleted, {remaining} remaining"));
            } else {
                let error = error.unwrap_or_else(|| "delete rejected".to_string());
                state.set_status(format!("Delete failed: {error}"));
            }
            Vec::new()
        }
        Msg::Navigate { direction } => {
            if state.record_count() == 0 {
                return (state, Vec::new());
            }
            // No selection starts the walk at the first record.
            let target = match state.selected() {
                None => 0,
                Some(current) => {
                    let last = (state.record_count() - 1) as i64;
                    (current as i64 + direction.offset()).clamp(0, last) as usize
                }
            };
            if state.selected() == Some(target) {
                Vec::new()
            } else {
                request_select(&mut state, target)
            }
        }
        Msg::Dispatch { channel, env } => dispatch(&mut state, channel, &env),
        Msg::ClipboardResult { success } => clipboard_result(&mut state, success),
        Msg::ManualOpenRequested => {
            if state.manual_copy().is_some() {
                vec![Effect::OpenWeb { prompt: None }]
            } else {
                Vec::new()
            }
        }
        Msg::ManualCopyDismissed => {
            state.dismiss_manual_copy();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start_job(state: &mut AppState, kind: JobKind, url: Option<String>) -> Vec<Effect> {
    // Guard rejections are decided before any effect exists.
    if state.job_active() {
        state.set_status("A scrape is already running");
        return Vec::new();
    }
    let url = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
    if kind == JobKind::Custom && url.is_none() {
        state.set_status("Custom scrape needs a URL");
        return Vec::new();
    }

    state.begin_job(kind);
    // The poller starts unconditionally: the backend may already be working
    // from a stale client state even if this start request fails.
    vec![
        Effect::StartJob { kind, url },
        Effect::StartTimer {
            timer: Timer::Poll,
            delay_ms: POLL_INTERVAL_MS,
        },
    ]
}

fn timer_fired(state: &mut AppState, timer: Timer) -> Vec<Effect> {
    match timer {
        Timer::Poll => {
            if state.begin_poll() {
                vec![Effect::FetchStatus]
            } else {
                // Stopped, or the previous read is still outstanding.
                Vec::new()
            }
        }
        Timer::CompletionNotice => {
            state.settle_job();
            state.set_status("Ready");
            Vec::new()
        }
        Timer::WebFallback => {
            // Deliberate race: the web target always opens, whether or not
            // the deep link resolved.
            vec![Effect::OpenWeb { prompt: None }]
        }
    }
}

fn poll_status(
    state: &mut AppState,
    active: bool,
    progress: Option<u8>,
    message: Option<String>,
) -> Vec<Effect> {
    if state.poller() == PollerState::Stopped {
        // Stale response after the terminal transition; the refresh has
        // already been triggered for this job.
        return Vec::new();
    }
    if active {
        state.apply_status(progress, message);
        return Vec::new();
    }
    let message = message.unwrap_or_else(|| "Scrape complete".to_string());
    finish_job(state, &message)
}

fn poll_failed(state: &mut AppState, error: &str) -> Vec<Effect> {
    if state.poller() == PollerState::Stopped {
        return Vec::new();
    }
    if state.record_poll_failure() {
        return finish_job(state, "Backend unreachable, stopping");
    }
    // Inconclusive tick: a single dropped read is not completion.
    state.set_status(format!("Status check failed, retrying: {error}"));
    Vec::new()
}

/// The only place the terminal poll transition happens; reached at most
/// once per job, so the refresh fires at most once per job.
fn finish_job(state: &mut AppState, message: &str) -> Vec<Effect> {
    state.finish_polling(message);
    vec![
        Effect::CancelTimer { timer: Timer::Poll },
        Effect::FetchRecords,
        Effect::StartTimer {
            timer: Timer::CompletionNotice,
            delay_ms: COMPLETION_NOTICE_MS,
        },
    ]
}

fn request_select(state: &mut AppState, index: usize) -> Vec<Effect> {
    if index >= state.record_count() {
        state.set_status("Select ignored: no such record");
        return Vec::new();
    }
    if state.begin_mutation(Mutation::Select, index) {
        vec![Effect::SelectRecord { index }]
    } else {
        Vec::new()
    }
}

fn dispatch(state: &mut AppState, channel: Channel, env: &EnvSnapshot) -> Vec<Effect> {
    let mut effects = Vec::new();
    if platform::is_hardened_variant(env) && state.claim_ambient_cache_clear() {
        effects.push(Effect::ClearAmbientCache);
    }

    let Some(record) = state.selected_record() else {
        state.set_dispatch_outcome(DispatchOutcome::NoSelection);
        return effects;
    };
    let product_text = record.product_text();
    if product_text.trim().is_empty() {
        state.set_dispatch_outcome(DispatchOutcome::EmptyInput);
        return effects;
    }

    let caps = platform::detect(env);
    let prompt = state.templates().for_channel(channel).render(&product_text);

    if !caps.has_clipboard {
        if caps.is_mobile {
            // Nothing automated is attempted without a clipboard on mobile;
            // the full prompt goes to the manual panel instead.
            state.show_manual_copy(prompt);
        } else {
            state.set_dispatch_outcome(DispatchOutcome::OpenedWithPrompt);
            effects.push(Effect::OpenWeb {
                prompt: Some(prompt),
            });
        }
        return effects;
    }

    state.set_pending_dispatch(PendingDispatch {
        prompt: prompt.clone(),
        caps,
    });
    effects.push(Effect::CopyToClipboard { text: prompt });
    effects
}

fn clipboard_result(state: &mut AppState, success: bool) -> Vec<Effect> {
    let Some(pending) = state.take_pending_dispatch() else {
        // A clipboard ack with nothing in flight means the chain lost its
        // state somewhere; the last resort is still a visible action.
        state.set_dispatch_outcome(DispatchOutcome::BareOpen);
        return vec![Effect::OpenWeb { prompt: None }];
    };
    let PendingDispatch { prompt, caps } = pending;

    if !caps.is_mobile {
        return if success {
            state.set_dispatch_outcome(DispatchOutcome::CopiedAndOpened);
            vec![Effect::OpenWeb { prompt: None }]
        } else {
            // Clipboard denial is a degradation, not an error.
            state.set_dispatch_outcome(DispatchOutcome::OpenedWithPrompt);
            vec![Effect::OpenWeb {
                prompt: Some(prompt),
            }]
        };
    }

    if !success {
        state.show_manual_copy(prompt);
        return Vec::new();
    }

    mobile_delivery(state, caps, prompt)
}

fn mobile_delivery(state: &mut AppState, caps: Capability, prompt: String) -> Vec<Effect> {
    let mut effects = vec![Effect::Notify {
        message: "Prompt copied to clipboard".to_string(),
    }];
    if caps.is_ios {
        state.set_dispatch_outcome(DispatchOutcome::DeepLinkRace);
        effects.push(Effect::OpenDeepLink);
        effects.push(Effect::StartTimer {
            timer: Timer::WebFallback,
            delay_ms: WEB_FALLBACK_MS,
        });
    } else {
        // Android (and unclassified mobile) skips the deep link and goes
        // straight to the web target with the prompt embedded.
        state.set_dispatch_outcome(DispatchOutcome::OpenedWithPrompt);
        effects.push(Effect::OpenWeb {
            prompt: Some(prompt),
        });
    }
    effects
}
