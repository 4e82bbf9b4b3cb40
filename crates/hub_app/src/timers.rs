//! Cancellable host timers keyed by [`Timer`].
//!
//! Each start bumps a per-timer generation; a sleeping thread whose
//! generation is stale exits without sending. `Poll` repeats until
//! cancelled, the others fire once.

use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use hub_core::{Msg, Timer};

use crate::runtime::HostEvent;

#[derive(Clone)]
pub struct Timers {
    event_tx: mpsc::Sender<HostEvent>,
    generations: Arc<Mutex<HashMap<Timer, u64>>>,
}

impl Timers {
    pub fn new(event_tx: mpsc::Sender<HostEvent>) -> Self {
        Self {
            event_tx,
            generations: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Starts (or restarts) a timer. A previous run of the same timer is
    /// implicitly cancelled by the generation bump.
    pub fn start(&self, timer: Timer, delay: Duration) {
        let generation = self.bump(timer);
        let repeating = matches!(timer, Timer::Poll);
        let event_tx = self.event_tx.clone();
        let generations = self.generations.clone();

        thread::spawn(move || loop {
            thread::sleep(delay);
            if !is_current(&generations, timer, generation) {
                return;
            }
            if event_tx
                .send(HostEvent::Msg(Msg::TimerFired { timer }))
                .is_err()
            {
                return;
            }
            if !repeating {
                return;
            }
        });
    }

    pub fn cancel(&self, timer: Timer) {
        self.bump(timer);
    }

    /// Invalidates every running timer; called on teardown so no interval
    /// outlives the loop it reports to.
    pub fn cancel_all(&self) {
        for timer in [Timer::Poll, Timer::CompletionNotice, Timer::WebFallback] {
            self.bump(timer);
        }
    }

    fn bump(&self, timer: Timer) -> u64 {
        let mut generations = self.generations.lock().expect("timer generations");
        let entry = generations.entry(timer).or_insert(0);
        *entry += 1;
        *entry
    }
}

fn is_current(generations: &Arc<Mutex<HashMap<Timer, u64>>>, timer: Timer, generation: u64) -> bool {
    generations
        .lock()
        .map(|map| map.get(&timer) == Some(&generation))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_timers(rx: &mpsc::Receiver<HostEvent>, window: Duration) -> usize {
        let deadline = std::time::Instant::now() + window;
        let mut fired = 0;
        while let Ok(event) = rx.recv_timeout(deadline.saturating_duration_since(
            std::time::Instant::now(),
        )) {
            if matches!(event, HostEvent::Msg(Msg::TimerFired { .. })) {
                fired += 1;
            }
        }
        fired
    }

    #[test]
    fn one_shot_timer_fires_once() {
        let (tx, rx) = mpsc::channel();
        let timers = Timers::new(tx);
        timers.start(Timer::CompletionNotice, Duration::from_millis(10));

        assert_eq!(drain_timers(&rx, Duration::from_millis(200)), 1);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let (tx, rx) = mpsc::channel();
        let timers = Timers::new(tx);
        timers.start(Timer::WebFallback, Duration::from_millis(50));
        timers.cancel(Timer::WebFallback);

        assert_eq!(drain_timers(&rx, Duration::from_millis(150)), 0);
    }

    #[test]
    fn poll_timer_repeats_until_cancelled() {
        let (tx, rx) = mpsc::channel();
        let timers = Timers::new(tx);
        timers.start(Timer::Poll, Duration::from_millis(10));

        thread::sleep(Duration::from_millis(120));
        timers.cancel(Timer::Poll);
        let fired = drain_timers(&rx, Duration::from_millis(50));
        assert!(fired >= 2, "expected repeated ticks, got {fired}");
    }

    #[test]
    fn restart_invalidates_the_previous_run() {
        let (tx, rx) = mpsc::channel();
        let timers = Timers::new(tx);
        timers.start(Timer::CompletionNotice, Duration::from_millis(500));
        // Restart with a short delay; only the second run may fire.
        timers.start(Timer::CompletionNotice, Duration::from_millis(10));

        assert_eq!(drain_timers(&rx, Duration::from_millis(200)), 1);
    }
}
