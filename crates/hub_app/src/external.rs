//! Outward-facing side effects: clipboard, browser/deep-link opens and the
//! ambient cache purge. All fire-and-forget; failures degrade, never abort.

use std::path::Path;
use std::process::Command;

use hub_logging::{hub_info, hub_warn};

/// Whether a clipboard is reachable right now. Probed fresh per dispatch
/// attempt; permissions can change mid-session.
pub fn clipboard_available() -> bool {
    arboard::Clipboard::new().is_ok()
}

pub fn copy_to_clipboard(text: &str) -> bool {
    match arboard::Clipboard::new() {
        Ok(mut clipboard) => match clipboard.set_text(text.to_string()) {
            Ok(()) => true,
            Err(err) => {
                hub_warn!("Clipboard write failed: {}", err);
                false
            }
        },
        Err(err) => {
            hub_warn!("Clipboard unavailable: {}", err);
            false
        }
    }
}

/// Opens a URL (or custom scheme) with the platform opener. There is no
/// confirmation channel back; a spawn failure is logged and reported so
/// the caller can fall through.
pub fn open_external(target: &str) -> bool {
    if target.is_empty() {
        return false;
    }
    let result = match std::env::consts::OS {
        "macos" => Command::new("open").arg(target).status(),
        "windows" => Command::new("cmd").args(["/C", "start", "", target]).status(),
        _ => Command::new("xdg-open").arg(target).status(),
    };
    match result {
        Ok(status) if status.success() => {
            hub_info!("Opened external target {}", target);
            true
        }
        Ok(status) => {
            hub_warn!("Opener exited with {} for {}", status, target);
            false
        }
        Err(err) => {
            hub_warn!("Could not spawn opener for {}: {}", target, err);
            false
        }
    }
}

/// One-time purge of stale ambient artifacts for hardened browser
/// variants. The directory is recreated empty.
pub fn clear_ambient_cache(dir: &Path) {
    if dir.exists() {
        if let Err(err) = std::fs::remove_dir_all(dir) {
            hub_warn!("Could not clear ambient cache {:?}: {}", dir, err);
            return;
        }
    }
    if let Err(err) = std::fs::create_dir_all(dir) {
        hub_warn!("Could not recreate ambient cache {:?}: {}", dir, err);
        return;
    }
    hub_info!("Ambient cache cleared at {:?}", dir);
}
