use std::sync::Once;

use hub_core::{
    update, AppState, Effect, JobKind, Msg, Timer, COMPLETION_NOTICE_MS,
    MAX_CONSECUTIVE_POLL_FAILURES, POLL_INTERVAL_MS,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(hub_logging::initialize_for_tests);
}

fn start_best_sellers(state: AppState) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::StartJob {
            kind: JobKind::BestSellers,
            url: None,
        },
    )
}

fn poll_tick(state: AppState) -> (AppState, Vec<Effect>) {
    update(state, Msg::TimerFired { timer: Timer::Poll })
}

fn status(state: AppState, active: bool) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::PollStatus {
            active,
            progress: Some(if active { 40 } else { 100 }),
            message: None,
        },
    )
}

#[test]
fn start_sets_flag_and_starts_poller_unconditionally() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = start_best_sellers(state);

    assert!(state.view().job_active);
    assert!(state.view().polling);
    assert!(!state.view().can_start_job);
    assert_eq!(
        effects,
        vec![
            Effect::StartJob {
                kind: JobKind::BestSellers,
                url: None,
            },
            Effect::StartTimer {
                timer: Timer::Poll,
                delay_ms: POLL_INTERVAL_MS,
            },
        ]
    );
}

#[test]
fn second_start_while_active_is_rejected_without_effects() {
    init_logging();
    let (state, _) = start_best_sellers(AppState::new());

    let (state, effects) = update(
        state,
        Msg::StartJob {
            kind: JobKind::Featured,
            url: None,
        },
    );

    assert!(effects.is_empty());
    assert!(state.view().job_active);
    assert_eq!(state.view().status_line, "A scrape is already running");
}

#[test]
fn custom_start_without_url_is_rejected() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::StartJob {
            kind: JobKind::Custom,
            url: Some("   ".to_string()),
        },
    );

    assert!(effects.is_empty());
    assert!(!state.view().job_active);
    assert_eq!(state.view().status_line, "Custom scrape needs a URL");
}

#[test]
fn definite_start_failure_stops_poller_and_clears_flag() {
    init_logging();
    let (state, _) = start_best_sellers(AppState::new());

    let (state, effects) = update(
        state,
        Msg::JobStartResult {
            success: false,
            error: Some("scraper not available".to_string()),
        },
    );

    assert_eq!(effects, vec![Effect::CancelTimer { timer: Timer::Poll }]);
    assert!(!state.view().job_active);
    assert!(!state.view().polling);
    assert!(state.view().can_start_job);
    assert!(state.view().status_line.contains("scraper not available"));
}

#[test]
fn poller_refreshes_exactly_once_after_terminal_status() {
    init_logging();
    let (mut state, _) = start_best_sellers(AppState::new());

    // Three active reads: progress only, no refresh.
    for _ in 0..3 {
        let (next, effects) = poll_tick(state);
        assert_eq!(effects, vec![Effect::FetchStatus]);
        let (next, effects) = status(next, true);
        assert!(effects.is_empty());
        state = next;
    }
    assert_eq!(state.view().progress, Some(40));

    // Fourth read is terminal: timer cancelled, one refresh, notice delay.
    let (state, effects) = poll_tick(state);
    assert_eq!(effects, vec![Effect::FetchStatus]);
    let (state, effects) = status(state, false);
    assert_eq!(
        effects,
        vec![
            Effect::CancelTimer { timer: Timer::Poll },
            Effect::FetchRecords,
            Effect::StartTimer {
                timer: Timer::CompletionNotice,
                delay_ms: COMPLETION_NOTICE_MS,
            },
        ]
    );
    assert!(!state.view().polling);
    // Affordances stay disabled until the completion notice elapses.
    assert!(state.view().job_active);

    // A stale terminal response after stopping must not refresh again.
    let (state, effects) = status(state, false);
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::TimerFired {
            timer: Timer::CompletionNotice,
        },
    );
    assert!(effects.is_empty());
    assert!(!state.view().job_active);
    assert!(state.view().can_start_job);
}

#[test]
fn tick_with_outstanding_read_is_skipped() {
    init_logging();
    let (state, _) = start_best_sellers(AppState::new());

    let (state, effects) = poll_tick(state);
    assert_eq!(effects, vec![Effect::FetchStatus]);

    // No response yet; the next tick must not issue a second read.
    let (state, effects) = poll_tick(state);
    assert!(effects.is_empty());

    // The response frees the slot again.
    let (state, _) = status(state, true);
    let (_, effects) = poll_tick(state);
    assert_eq!(effects, vec![Effect::FetchStatus]);
}

#[test]
fn transient_poll_failure_keeps_the_loop_running() {
    init_logging();
    let (state, _) = start_best_sellers(AppState::new());
    let (state, _) = poll_tick(state);

    let (state, effects) = update(
        state,
        Msg::PollFailed {
            error: "connection reset".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert!(state.view().polling);

    // And a later success resets the failure run.
    let (state, _) = poll_tick(state);
    let (state, _) = status(state, true);
    assert!(state.view().polling);
}

#[test]
fn sustained_poll_failures_become_terminal_with_one_refresh() {
    init_logging();
    let (mut state, _) = start_best_sellers(AppState::new());

    for attempt in 0..MAX_CONSECUTIVE_POLL_FAILURES {
        let (next, effects) = poll_tick(state);
        assert_eq!(effects, vec![Effect::FetchStatus]);
        let (next, effects) = update(
            next,
            Msg::PollFailed {
                error: "timeout".to_string(),
            },
        );
        if attempt + 1 < MAX_CONSECUTIVE_POLL_FAILURES {
            assert!(effects.is_empty());
        } else {
            assert!(effects.contains(&Effect::FetchRecords));
            assert!(effects.contains(&Effect::CancelTimer { timer: Timer::Poll }));
        }
        state = next;
    }
    assert!(!state.view().polling);

    // Further failures after the terminal transition are ignored.
    let (_, effects) = update(
        state,
        Msg::PollFailed {
            error: "timeout".to_string(),
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn job_can_restart_after_completion_settles() {
    init_logging();
    let (state, _) = start_best_sellers(AppState::new());
    let (state, _) = poll_tick(state);
    let (state, _) = status(state, false);
    let (state, _) = update(
        state,
        Msg::TimerFired {
            timer: Timer::CompletionNotice,
        },
    );

    let (state, effects) = update(
        state,
        Msg::StartJob {
            kind: JobKind::Custom,
            url: Some("https://example.com/catalog".to_string()),
        },
    );
    assert!(state.view().job_active);
    assert_eq!(
        effects[0],
        Effect::StartJob {
            kind: JobKind::Custom,
            url: Some("https://example.com/catalog".to_string()),
        }
    );
}
