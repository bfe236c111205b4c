//! BDD test world for the review watcher

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use cucumber::World;
use review_watcher::config::Credentials;
use review_watcher::io::{HttpClient, HttpResponse};
use review_watcher::{Config, CycleOutcome, Watcher, WatcherBuilder, WatcherError};

pub const TELEGRAM_API: &str = "https://telegram.test";

/// A GET issued against the status API
#[derive(Debug, Clone)]
pub struct RecordedGet {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

/// A POST issued against the Telegram API
#[derive(Debug, Clone)]
pub struct RecordedPost {
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl RecordedPost {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Replays queued status API answers and records every request
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    pub answers: Mutex<VecDeque<review_watcher::Result<HttpResponse>>>,
    pub gets: Mutex<Vec<RecordedGet>>,
    pub posts: Mutex<Vec<RecordedPost>>,
    pub telegram_down: AtomicBool,
}

fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl ScriptedHttpClient {
    pub fn queue(&self, answer: review_watcher::Result<HttpResponse>) {
        self.answers.lock().unwrap().push_back(answer);
    }

    pub fn queue_body(&self, body: String) {
        self.queue(Ok(HttpResponse { status: 200, body }));
    }

    /// Texts of Telegram messages starting with `prefix`
    pub fn messages_starting_with(&self, prefix: &str) -> Vec<String> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .filter_map(|p| p.param("text"))
            .filter(|text| text.starts_with(prefix))
            .map(str::to_string)
            .collect()
    }

    pub fn queried_cursors(&self) -> Vec<String> {
        self.gets
            .lock()
            .unwrap()
            .iter()
            .filter_map(|g| {
                g.query
                    .iter()
                    .find(|(k, _)| k == "from_date")
                    .map(|(_, v)| v.clone())
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> review_watcher::Result<HttpResponse> {
        self.gets.lock().unwrap().push(RecordedGet {
            url: url.to_string(),
            headers: owned(headers),
            query: owned(query),
        });
        self.answers.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(WatcherError::Transport(
                "no scripted answer left".to_string(),
            ))
        })
    }

    async fn post_form(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> review_watcher::Result<HttpResponse> {
        self.posts.lock().unwrap().push(RecordedPost {
            url: url.to_string(),
            params: owned(params),
        });
        if self.telegram_down.load(Ordering::SeqCst) {
            return Err(WatcherError::Transport("connection refused".to_string()));
        }
        Ok(HttpResponse {
            status: 200,
            body: r#"{"ok":true,"result":{"message_id":1}}"#.to_string(),
        })
    }
}

#[derive(Debug, Default, World)]
pub struct WatcherWorld {
    pub http: Arc<ScriptedHttpClient>,
    pub start_cursor: i64,
    pub watcher: Option<Watcher>,
    pub outcomes: Vec<CycleOutcome>,
}

impl WatcherWorld {
    pub fn config() -> Config {
        let mut config = Config {
            credentials: Credentials {
                practicum_token: "practicum-token".to_string(),
                telegram_token: "bot-token".to_string(),
                telegram_chat_id: "4242".to_string(),
            },
            ..Config::default()
        };
        config.telegram.api_base_url = TELEGRAM_API.to_string();
        config
    }

    /// The watcher under test, built on first use
    pub fn watcher(&mut self) -> &mut Watcher {
        let http: Arc<dyn HttpClient> = self.http.clone();
        let start_cursor = self.start_cursor;
        self.watcher.get_or_insert_with(|| {
            WatcherBuilder::new(Self::config())
                .with_http_client(http)
                .with_start_cursor(start_cursor)
                .build()
                .expect("watcher should build from test config")
        })
    }
}
