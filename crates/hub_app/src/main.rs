mod config;
mod effects;
mod external;
mod logging;
mod repl;
mod runtime;
mod timers;

use std::sync::{mpsc, Arc};

use hub_backend::{BackendHandle, HttpApiClient};
use hub_core::{AppState, Msg};
use hub_logging::hub_info;

use crate::effects::EffectRunner;
use crate::runtime::{HostEvent, Runtime};
use crate::timers::Timers;

fn main() -> anyhow::Result<()> {
    // The destination is configuration, so the load runs before the
    // logger exists; its own messages go nowhere.
    let working_dir = std::env::current_dir()?;
    let config = config::load(&working_dir);
    logging::initialize(config.log_destination);

    let templates = config
        .templates()
        .map_err(|err| anyhow::anyhow!("invalid prompt template: {err}"))?;
    hub_info!("Hub starting against {}", config.base_url);

    let client = Arc::new(HttpApiClient::new(config.client_settings())?);
    let (backend, backend_events) = BackendHandle::spawn(client);

    let (event_tx, event_rx) = mpsc::channel::<HostEvent>();
    effects::spawn_event_pump(backend_events, event_tx.clone());
    repl::spawn_stdin_reader(event_tx.clone(), config.user_agent.clone());

    let timers = Timers::new(event_tx.clone());
    let runner = EffectRunner::new(backend, timers, config, event_tx);
    let mut runtime = Runtime::new(AppState::with_templates(templates), runner);

    // Seed the store from backend truth before the first prompt.
    if let Some(view) = runtime.handle(Msg::RefreshRequested) {
        repl::render(&view);
    }
    println!("marketing hub ready; type `help` for commands");

    while let Ok(event) = event_rx.recv() {
        match event {
            HostEvent::Msg(msg) => {
                if let Some(view) = runtime.handle(msg) {
                    repl::render(&view);
                }
            }
            HostEvent::Quit => break,
        }
    }

    // No interval may outlive the loop it reports to.
    runtime.shutdown();
    hub_info!("Hub shut down");
    Ok(())
}
