//! Line-oriented front end: translates operator commands into core
//! messages and renders the view model after each change.

use std::io::BufRead;
use std::sync::mpsc;
use std::thread;

use hub_core::{AppViewModel, Channel, Direction, EnvSnapshot, JobKind, Msg};

use crate::external;
use crate::runtime::HostEvent;

const HELP: &str = "\
commands:
  scrape best | scrape featured | scrape <url>   start an acquisition job
  list                                           reload records from the backend
  select <n> | delete <n> | next | prev          work the record store
  post instagram | post facebook                 dispatch the selected record
  open | dismiss                                 manual-copy panel actions
  help | quit";

/// Reads stdin until EOF, feeding parsed commands into the host loop.
pub fn spawn_stdin_reader(event_tx: mpsc::Sender<HostEvent>, user_agent: String) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            // The clipboard is probed fresh for every dispatch attempt.
            let clipboard = external::clipboard_available();
            match parse_line(&line, &user_agent, clipboard) {
                Some(event) => {
                    let quitting = matches!(event, HostEvent::Quit);
                    if event_tx.send(event).is_err() || quitting {
                        return;
                    }
                }
                None => {
                    if !line.trim().is_empty() {
                        println!("{HELP}");
                    }
                }
            }
        }
        let _ = event_tx.send(HostEvent::Quit);
    });
}

pub(crate) fn parse_line(
    line: &str,
    user_agent: &str,
    clipboard_available: bool,
) -> Option<HostEvent> {
    let mut words = line.split_whitespace();
    let command = words.next()?;
    let argument = words.next();

    let msg = match (command, argument) {
        ("quit", _) | ("exit", _) => return Some(HostEvent::Quit),
        ("help", _) => return None,
        ("scrape", Some("best")) => Msg::StartJob {
            kind: JobKind::BestSellers,
            url: None,
        },
        ("scrape", Some("featured")) => Msg::StartJob {
            kind: JobKind::Featured,
            url: None,
        },
        ("scrape", Some(url)) => Msg::StartJob {
            kind: JobKind::Custom,
            url: Some(url.to_string()),
        },
        ("list", _) | ("refresh", _) => Msg::RefreshRequested,
        ("select", Some(n)) => Msg::SelectRecord {
            index: n.parse().ok()?,
        },
        ("delete", Some(n)) => Msg::DeleteRecord {
            index: n.parse().ok()?,
        },
        ("next", _) => Msg::Navigate {
            direction: Direction::Next,
        },
        ("prev", _) => Msg::Navigate {
            direction: Direction::Previous,
        },
        ("post", Some(channel)) => {
            let channel = match channel {
                "instagram" | "ig" => Channel::Instagram,
                "facebook" | "fb" => Channel::Facebook,
                _ => return None,
            };
            Msg::Dispatch {
                channel,
                env: EnvSnapshot {
                    user_agent: user_agent.to_string(),
                    clipboard_available,
                },
            }
        }
        ("open", _) => Msg::ManualOpenRequested,
        ("dismiss", _) => Msg::ManualCopyDismissed,
        _ => return None,
    };
    Some(HostEvent::Msg(msg))
}

pub fn render(view: &AppViewModel) {
    if view.job_active {
        let progress = view
            .progress
            .map(|p| format!(" {p}%"))
            .unwrap_or_default();
        println!("[job{progress}] {}", view.status_line);
    } else {
        println!("[{}]", view.status_line);
    }

    for row in &view.records {
        let marker = if view.selected_index == Some(row.index) {
            ">"
        } else {
            " "
        };
        let domain = row.domain.as_deref().unwrap_or("-");
        println!(
            "{marker} {:>3}  {}  {}  ({} images, {})",
            row.index, row.title, row.price, row.image_count, domain
        );
    }

    if let Some(prompt) = &view.manual_copy {
        println!("--- copy this prompt manually (then `open`, or `dismiss`) ---");
        println!("{prompt}");
        println!("-------------------------------------------------------------");
    }
}
