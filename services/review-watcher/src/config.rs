//! Configuration types for the review watcher

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the status API OAuth token
pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
/// Environment variable holding the Telegram bot token
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
/// Environment variable holding the Telegram chat that receives messages
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";
/// Optional environment variable pointing at a JSON settings file
pub const CONFIG_PATH_VAR: &str = "REVIEW_WATCHER_CONFIG";
/// Dotenv file read from the working directory at startup
pub const DOTENV_FILE: &str = ".env";

/// Main configuration structure
///
/// Built once at startup and handed to the watcher by reference; nothing
/// reads the environment after that.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub status_api: StatusApiConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(skip)]
    pub credentials: Credentials,
}

/// Status API endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for StatusApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// Telegram Bot API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "default_telegram_api_url")]
    pub api_base_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_telegram_api_url(),
        }
    }
}

/// Poll loop cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_retry_period")]
    pub retry_period_seconds: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            retry_period_seconds: default_retry_period(),
        }
    }
}

/// Secrets read from the environment
#[derive(Clone, Default)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

impl Credentials {
    /// Collect all three credentials through `lookup`.
    ///
    /// Unset and blank values are both treated as missing. The error names
    /// every missing variable, not just the first.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let practicum_token = read(PRACTICUM_TOKEN_VAR);
        let telegram_token = read(TELEGRAM_TOKEN_VAR);
        let telegram_chat_id = read(TELEGRAM_CHAT_ID_VAR);

        let missing: Vec<&str> = [
            (PRACTICUM_TOKEN_VAR, practicum_token.is_none()),
            (TELEGRAM_TOKEN_VAR, telegram_token.is_none()),
            (TELEGRAM_CHAT_ID_VAR, telegram_chat_id.is_none()),
        ]
        .into_iter()
        .filter_map(|(key, absent)| absent.then_some(key))
        .collect();

        match (practicum_token, telegram_token, telegram_chat_id) {
            (Some(practicum_token), Some(telegram_token), Some(telegram_chat_id)) => Ok(Self {
                practicum_token,
                telegram_token,
                telegram_chat_id,
            }),
            _ => Err(crate::WatcherError::Config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            ))),
        }
    }
}

impl Config {
    /// Build the configuration from the process environment
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_PATH_VAR) {
            Some(path) => {
                tracing::debug!("Loading settings from {:?}", path);
                load_config(Path::new(&path))?
            }
            None => {
                tracing::debug!("Using default settings");
                Config::default()
            }
        };
        config.credentials = Credentials::from_lookup(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> crate::Result<()> {
        if self.polling.retry_period_seconds == 0 {
            return Err(crate::WatcherError::Config(
                "polling.retry_period_seconds must be greater than zero".to_string(),
            ));
        }
        if self.status_api.request_timeout_seconds == 0
            || self.status_api.request_timeout_seconds >= self.polling.retry_period_seconds
        {
            return Err(crate::WatcherError::Config(format!(
                "status_api.request_timeout_seconds must be between 1 and {} (the retry period)",
                self.polling.retry_period_seconds - 1
            )));
        }
        Ok(())
    }
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_retry_period() -> u64 {
    600
}

/// Load non-secret settings from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::WatcherError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        crate::WatcherError::Config(format!("Failed to parse config file {:?}: {}", path, e))
    })
}

/// Export the variables of a dotenv file into the process environment.
///
/// Variables already set in the environment win. A missing file is not an
/// error and yields `Ok(false)`; a file that cannot be read or parsed is a
/// configuration error.
pub fn load_env_file(path: &Path) -> crate::Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(crate::WatcherError::Config(format!(
            "Failed to load env file {:?}: {}",
            path, e
        ))),
    }
}
