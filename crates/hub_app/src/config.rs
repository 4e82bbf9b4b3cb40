//! Host configuration: optional RON file with environment overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use hub_backend::ClientSettings;
use hub_core::{PromptTemplate, TemplateError, Templates};
use hub_logging::{hub_info, hub_warn};
use serde::{Deserialize, Serialize};

use crate::logging::LogDestination;

pub const CONFIG_FILENAME: &str = ".hub_config.ron";

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/126.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Acquisition backend base URL.
    pub base_url: String,
    /// Assistant web endpoint, opened with or without a `q` prompt.
    pub assistant_web_url: String,
    /// OS deep link to the native assistant app.
    pub assistant_deep_link: String,
    /// User agent reported by the embedding environment.
    pub user_agent: String,
    /// Directory purged by the one-time ambient cache clear.
    pub cache_dir: PathBuf,
    /// Where log output goes.
    pub log_destination: LogDestination,
    pub request_timeout_secs: u64,
    pub instagram_template: String,
    pub facebook_template: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/".to_string(),
            assistant_web_url: "https://chatgpt.com/".to_string(),
            assistant_deep_link: "chatgpt://".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cache_dir: PathBuf::from("./hub_cache"),
            log_destination: LogDestination::default(),
            request_timeout_secs: 30,
            instagram_template:
                "Write an Instagram caption with hashtags for this product:\n\n{product_text}"
                    .to_string(),
            facebook_template: "Write a Facebook post for this product:\n\n{product_text}"
                .to_string(),
        }
    }
}

impl AppConfig {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..ClientSettings::default()
        }
    }

    /// Validated per-channel templates; a marker typo is caught at startup,
    /// not at the first dispatch.
    pub fn templates(&self) -> Result<Templates, TemplateError> {
        Ok(Templates::new(
            PromptTemplate::new(self.instagram_template.clone())?,
            PromptTemplate::new(self.facebook_template.clone())?,
        ))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("HUB_BASE_URL") {
            self.base_url = value;
        }
        if let Ok(value) = std::env::var("HUB_ASSISTANT_URL") {
            self.assistant_web_url = value;
        }
        if let Ok(value) = std::env::var("HUB_DEEP_LINK") {
            self.assistant_deep_link = value;
        }
        if let Ok(value) = std::env::var("HUB_USER_AGENT") {
            self.user_agent = value;
        }
    }
}

/// Reads `.hub_config.ron` from `dir`, falling back to defaults on any
/// problem, then applies environment overrides.
pub fn load(dir: &Path) -> AppConfig {
    let mut config = load_file(dir).unwrap_or_default();
    config.apply_env_overrides();
    config
}

fn load_file(dir: &Path) -> Option<AppConfig> {
    let path = dir.join(CONFIG_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return None;
        }
        Err(err) => {
            hub_warn!("Failed to read config from {:?}: {}", path, err);
            return None;
        }
    };

    match ron::from_str::<AppConfig>(&content) {
        Ok(config) => {
            hub_info!("Loaded config from {:?}", path);
            Some(config)
        }
        Err(err) => {
            hub_warn!("Failed to parse config from {:?}: {}", path, err);
            None
        }
    }
}
