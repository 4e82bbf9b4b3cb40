use std::sync::{mpsc, Arc};
use std::thread;

use hub_logging::hub_error;

use crate::api::ApiClient;
use crate::types::{ApiError, DeleteAck, JobStatus, RecordPage, ScrapeKind, SelectAck, StartAck};

/// Work the host hands to the backend thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    StartJob {
        kind: ScrapeKind,
        url: Option<String>,
    },
    FetchStatus,
    FetchRecords,
    Select { index: usize },
    Delete { index: usize },
}

/// Completions flowing back; the host turns each into a core message.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    JobStarted(Result<StartAck, ApiError>),
    Status(Result<JobStatus, ApiError>),
    Records(Result<RecordPage, ApiError>),
    Selected {
        index: usize,
        result: Result<SelectAck, ApiError>,
    },
    Deleted {
        index: usize,
        result: Result<DeleteAck, ApiError>,
    },
}

/// Cloneable command side of the backend thread. The thread owns a tokio
/// runtime; each command runs as its own task so a slow delete cannot
/// stall a status read.
#[derive(Clone)]
pub struct BackendHandle {
    cmd_tx: mpsc::Sender<BackendCommand>,
}

impl BackendHandle {
    /// Spawns the backend thread, returning the handle and the event
    /// receiver the host pumps.
    pub fn spawn(client: Arc<dyn ApiClient>) -> (Self, mpsc::Receiver<BackendEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel::<BackendCommand>();
        let (event_tx, event_rx) = mpsc::channel::<BackendEvent>();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    hub_error!("Could not create backend runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = run_command(client.as_ref(), command).await;
                    let _ = event_tx.send(event);
                });
            }
        });

        (Self { cmd_tx }, event_rx)
    }

    pub fn send(&self, command: BackendCommand) {
        if self.cmd_tx.send(command).is_err() {
            hub_error!("Backend thread is gone; command dropped");
        }
    }
}

async fn run_command(client: &dyn ApiClient, command: BackendCommand) -> BackendEvent {
    match command {
        BackendCommand::StartJob { kind, url } => {
            BackendEvent::JobStarted(client.start_job(kind, url.as_deref()).await)
        }
        BackendCommand::FetchStatus => BackendEvent::Status(client.job_status().await),
        BackendCommand::FetchRecords => BackendEvent::Records(client.list_records().await),
        BackendCommand::Select { index } => BackendEvent::Selected {
            index,
            result: client.select_record(index).await,
        },
        BackendCommand::Delete { index } => BackendEvent::Deleted {
            index,
            result: client.delete_record(index).await,
        },
    }
}
