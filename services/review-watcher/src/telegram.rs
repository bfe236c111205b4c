//! Telegram Bot API notification client

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Config;
use crate::io::HttpClient;
use crate::notifier::{Notification, Notifier};
use crate::WatcherError;

/// Envelope every Bot API method answers with
#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages to one chat through a Telegram bot
pub struct TelegramNotifier {
    send_message_url: String,
    chat_id: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramNotifier {
    pub fn new(config: &Config, http: Arc<dyn HttpClient>) -> Self {
        let send_message_url = format!(
            "{}/bot{}/sendMessage",
            config.telegram.api_base_url.trim_end_matches('/'),
            config.credentials.telegram_token
        );

        tracing::debug!(
            "Created TelegramNotifier for chat {}",
            config.credentials.telegram_chat_id
        );

        Self {
            send_message_url,
            chat_id: config.credentials.telegram_chat_id.clone(),
            http,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn type_name(&self) -> &str {
        "telegram"
    }

    async fn notify(&self, notification: &Notification) -> crate::Result<()> {
        let params = [
            ("chat_id", self.chat_id.as_str()),
            ("text", notification.message.as_str()),
        ];

        tracing::debug!("Sending Telegram message to chat {}", self.chat_id);

        let response = self
            .http
            .post_form(&self.send_message_url, &params)
            .await
            .map_err(|e| WatcherError::Notifier(e.to_string()))?;

        let parsed = serde_json::from_str::<BotApiResponse>(&response.body).ok();
        if response.status != 200 || !parsed.as_ref().is_some_and(|r| r.ok) {
            let description = parsed
                .and_then(|r| r.description)
                .unwrap_or(response.body);
            return Err(WatcherError::Notifier(format!(
                "Telegram API returned status {}: {}",
                response.status, description
            )));
        }

        Ok(())
    }
}
