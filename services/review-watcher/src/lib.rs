//! Review watcher - homework review status notifications
//!
//! Polls the Practicum homework status API, detects review status changes,
//! and forwards them to a Telegram chat.

pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod notifier;
pub mod status_api;
pub mod telegram;
pub mod validator;
pub mod verdict;

pub use config::{load_config, Config};
pub use engine::{CycleOutcome, Watcher};
pub use error::{Result, WatcherError};

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::io::{HttpClient, ReqwestHttpClient};
use crate::notifier::Notifier;
use crate::status_api::{PracticumClient, StatusSource};
use crate::telegram::TelegramNotifier;

/// Wires a [`Watcher`] together from a [`Config`]
pub struct WatcherBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    source: Option<Arc<dyn StatusSource>>,
    notifier: Option<Arc<dyn Notifier>>,
    start_cursor: Option<i64>,
    cancel: Option<CancellationToken>,
}

impl WatcherBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            source: None,
            notifier: None,
            start_cursor: None,
            cancel: None,
        }
    }

    /// Use this HTTP client instead of a reqwest one
    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Replace the Practicum status client
    pub fn with_status_source(mut self, source: Arc<dyn StatusSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Replace the Telegram notifier
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Start querying from this Unix timestamp instead of now
    pub fn with_start_cursor(mut self, cursor: i64) -> Self {
        self.start_cursor = Some(cursor);
        self
    }

    /// Stop the watcher through an external token
    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn build(self) -> Result<Watcher> {
        self.config.validate()?;

        let http: Arc<dyn HttpClient> = match self.http {
            Some(http) => http,
            None => Arc::new(ReqwestHttpClient::new(Duration::from_secs(
                self.config.status_api.request_timeout_seconds,
            ))?),
        };

        let source: Arc<dyn StatusSource> = match self.source {
            Some(source) => source,
            None => Arc::new(PracticumClient::new(&self.config, Arc::clone(&http))),
        };
        let notifier: Arc<dyn Notifier> = match self.notifier {
            Some(notifier) => notifier,
            None => Arc::new(TelegramNotifier::new(&self.config, Arc::clone(&http))),
        };
        let cursor = self
            .start_cursor
            .unwrap_or_else(engine::current_epoch_seconds);

        Ok(Watcher::new(
            source,
            notifier,
            Duration::from_secs(self.config.polling.retry_period_seconds),
            cursor,
            self.cancel.unwrap_or_default(),
        ))
    }
}

/// Run the review watcher with the given configuration until ctrl-c
pub async fn run(config: Config) -> Result<()> {
    WatcherBuilder::new(config).build()?.start().await
}
