//! Error types for the review watcher

/// Errors that can occur in the review watcher
#[derive(Debug, thiserror::Error)]
pub enum WatcherError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Status API request failed: {0}")]
    Transport(String),

    #[error("Status API returned undecodable body: {0}")]
    Decode(String),

    #[error("Unexpected status API response: {0}")]
    Schema(String),

    #[error("Homework record is missing field '{0}'")]
    UnknownField(String),

    #[error("Unexpected homework status: {0}")]
    UnknownStatus(String),

    #[error("Notifier error: {0}")]
    Notifier(String),
}

impl WatcherError {
    /// Whether the poll loop may carry on after this error.
    ///
    /// Only configuration problems are fatal; they are raised before the
    /// loop starts.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, WatcherError::Config(_))
    }
}

/// Result type alias for review watcher operations
pub type Result<T> = std::result::Result<T, WatcherError>;
