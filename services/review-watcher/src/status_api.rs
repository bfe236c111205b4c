//! Homework status API client

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::Config;
use crate::io::HttpClient;
use crate::WatcherError;

/// Source of raw status payloads
///
/// One call is one outbound request. Implementations never retry; the poll
/// loop decides when to ask again.
#[async_trait]
pub trait StatusSource: Send + Sync + std::fmt::Debug {
    /// Fetch statuses changed since `cursor` (Unix seconds) as decoded JSON
    async fn fetch(&self, cursor: i64) -> crate::Result<Value>;
}

/// Client for the Practicum homework status endpoint
pub struct PracticumClient {
    endpoint: String,
    authorization: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl PracticumClient {
    pub fn new(config: &Config, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!(
            "Created PracticumClient for {}",
            config.status_api.endpoint
        );

        Self {
            endpoint: config.status_api.endpoint.clone(),
            authorization: format!("OAuth {}", config.credentials.practicum_token),
            http,
        }
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn fetch(&self, cursor: i64) -> crate::Result<Value> {
        let from_date = cursor.to_string();
        let response = self
            .http
            .get(
                &self.endpoint,
                &[("Authorization", self.authorization.as_str())],
                &[("from_date", from_date.as_str())],
            )
            .await?;

        if response.status != 200 {
            return Err(WatcherError::Transport(format!(
                "{} returned status {}",
                self.endpoint, response.status
            )));
        }

        serde_json::from_str(&response.body).map_err(|e| WatcherError::Decode(e.to_string()))
    }
}
