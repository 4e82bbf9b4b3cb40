//! Effect execution: translates core [`Effect`]s into backend commands,
//! timers and outward side effects, and pumps backend events back in.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use hub_backend::{BackendCommand, BackendEvent, BackendHandle, RecordDto, ScrapeKind};
use hub_core::{assistant_web_url, Effect, JobKind, Msg, Record};
use hub_logging::{hub_debug, hub_info};

use crate::config::AppConfig;
use crate::external;
use crate::runtime::HostEvent;
use crate::timers::Timers;

pub struct EffectRunner {
    backend: BackendHandle,
    timers: Timers,
    config: AppConfig,
    event_tx: mpsc::Sender<HostEvent>,
}

impl EffectRunner {
    pub fn new(
        backend: BackendHandle,
        timers: Timers,
        config: AppConfig,
        event_tx: mpsc::Sender<HostEvent>,
    ) -> Self {
        Self {
            backend,
            timers,
            config,
            event_tx,
        }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.run_one(effect);
        }
    }

    /// Cancels every timer; called once on teardown.
    pub fn shutdown(&self) {
        self.timers.cancel_all();
    }

    fn run_one(&self, effect: Effect) {
        hub_debug!("Effect: {:?}", effect);
        match effect {
            Effect::StartJob { kind, url } => {
                self.backend.send(BackendCommand::StartJob {
                    kind: map_kind(kind),
                    url,
                });
            }
            Effect::FetchStatus => self.backend.send(BackendCommand::FetchStatus),
            Effect::FetchRecords => self.backend.send(BackendCommand::FetchRecords),
            Effect::SelectRecord { index } => {
                self.backend.send(BackendCommand::Select { index });
            }
            Effect::DeleteRecord { index } => {
                self.backend.send(BackendCommand::Delete { index });
            }
            Effect::StartTimer { timer, delay_ms } => {
                self.timers.start(timer, Duration::from_millis(delay_ms));
            }
            Effect::CancelTimer { timer } => self.timers.cancel(timer),
            Effect::CopyToClipboard { text } => {
                let success = external::copy_to_clipboard(&text);
                let _ = self
                    .event_tx
                    .send(HostEvent::Msg(Msg::ClipboardResult { success }));
            }
            Effect::OpenWeb { prompt } => {
                let target =
                    assistant_web_url(&self.config.assistant_web_url, prompt.as_deref());
                external::open_external(&target);
            }
            Effect::OpenDeepLink => {
                external::open_external(&self.config.assistant_deep_link);
            }
            Effect::ClearAmbientCache => {
                external::clear_ambient_cache(&self.config.cache_dir);
            }
            Effect::Notify { message } => {
                hub_info!("{}", message);
                println!("* {message}");
            }
        }
    }
}

/// Forwards backend completions into the host loop as core messages.
pub fn spawn_event_pump(
    backend_events: mpsc::Receiver<BackendEvent>,
    event_tx: mpsc::Sender<HostEvent>,
) {
    thread::spawn(move || {
        while let Ok(event) = backend_events.recv() {
            if event_tx.send(HostEvent::Msg(map_event(event))).is_err() {
                return;
            }
        }
    });
}

fn map_kind(kind: JobKind) -> ScrapeKind {
    match kind {
        JobKind::BestSellers => ScrapeKind::BestSellers,
        JobKind::Featured => ScrapeKind::Featured,
        JobKind::Custom => ScrapeKind::Custom,
    }
}

fn map_record(dto: RecordDto) -> Record {
    Record {
        title: dto.title,
        price: dto.price,
        description: dto.description,
        source_url: dto.url,
        domain: dto.domain,
        images: dto.local_images,
    }
}

fn map_event(event: BackendEvent) -> Msg {
    match event {
        BackendEvent::JobStarted(Ok(ack)) => Msg::JobStartResult {
            success: ack.success,
            error: if ack.success {
                None
            } else {
                Some(
                    ack.error_message()
                        .unwrap_or("backend rejected the start request")
                        .to_string(),
                )
            },
        },
        BackendEvent::JobStarted(Err(err)) => Msg::JobStartResult {
            success: false,
            error: Some(err.to_string()),
        },
        BackendEvent::Status(Ok(status)) => Msg::PollStatus {
            active: status.active,
            progress: status.progress_percent(),
            message: status.message,
        },
        BackendEvent::Status(Err(err)) => Msg::PollFailed {
            error: err.to_string(),
        },
        BackendEvent::Records(Ok(page)) => Msg::RecordsLoaded {
            records: page.products.into_iter().map(map_record).collect(),
            selected_index: page.selected_index,
        },
        BackendEvent::Records(Err(err)) => Msg::RecordsLoadFailed {
            error: err.to_string(),
        },
        BackendEvent::Selected { index, result } => match result {
            Ok(ack) => Msg::SelectAcked {
                index,
                success: ack.success,
                error: ack.error,
            },
            Err(err) => Msg::SelectAcked {
                index,
                success: false,
                error: Some(err.to_string()),
            },
        },
        BackendEvent::Deleted { index, result } => match result {
            Ok(ack) => Msg::DeleteAcked {
                index,
                success: ack.success,
                remaining: ack.remaining_products,
                error: ack.error,
            },
            Err(err) => Msg::DeleteAcked {
                index,
                success: false,
                remaining: None,
                error: Some(err.to_string()),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_backend::{ApiError, JobStatus, RecordPage, SelectAck, StartAck};

    #[test]
    fn transport_status_failure_maps_to_inconclusive_poll() {
        let msg = map_event(BackendEvent::Status(Err(ApiError::Timeout)));
        assert!(matches!(msg, Msg::PollFailed { .. }));
    }

    #[test]
    fn well_formed_inactive_status_maps_to_terminal_poll() {
        let msg = map_event(BackendEvent::Status(Ok(JobStatus {
            active: false,
            progress: Some(100.0),
            message: Some("Complete! Scraped 12 products".to_string()),
        })));
        match msg {
            Msg::PollStatus {
                active, progress, ..
            } => {
                assert!(!active);
                assert_eq!(progress, Some(100));
            }
            other => panic!("unexpected msg {other:?}"),
        }
    }

    #[test]
    fn record_page_maps_field_names() {
        let msg = map_event(BackendEvent::Records(Ok(RecordPage {
            products: vec![RecordDto {
                title: "X".to_string(),
                price: "$1".to_string(),
                description: String::new(),
                url: Some("https://example.com/x".to_string()),
                domain: Some("example.com".to_string()),
                local_images: vec!["a.jpg".to_string()],
            }],
            selected_index: Some(0),
            total_count: 1,
        })));
        match msg {
            Msg::RecordsLoaded {
                records,
                selected_index,
            } => {
                assert_eq!(selected_index, Some(0));
                assert_eq!(records[0].source_url.as_deref(), Some("https://example.com/x"));
                assert_eq!(records[0].images, vec!["a.jpg".to_string()]);
            }
            other => panic!("unexpected msg {other:?}"),
        }
    }

    #[test]
    fn rejected_start_surfaces_the_backend_message() {
        let msg = map_event(BackendEvent::JobStarted(Ok(StartAck {
            success: false,
            message: Some("No URL provided".to_string()),
            error: None,
        })));
        match msg {
            Msg::JobStartResult { success, error } => {
                assert!(!success);
                assert_eq!(error.as_deref(), Some("No URL provided"));
            }
            other => panic!("unexpected msg {other:?}"),
        }
    }

    #[test]
    fn transport_select_failure_is_a_failed_ack() {
        let msg = map_event(BackendEvent::Selected {
            index: 2,
            result: Err(ApiError::Network("reset".to_string())),
        });
        match msg {
            Msg::SelectAcked { index, success, .. } => {
                assert_eq!(index, 2);
                assert!(!success);
            }
            other => panic!("unexpected msg {other:?}"),
        }
    }

    #[test]
    fn successful_select_ack_passes_through() {
        let msg = map_event(BackendEvent::Selected {
            index: 1,
            result: Ok(SelectAck {
                success: true,
                selected_index: Some(1),
                error: None,
            }),
        });
        assert!(matches!(
            msg,
            Msg::SelectAcked {
                index: 1,
                success: true,
                ..
            }
        ));
    }
}
