//! Notifier trait for sending messages to the user

use async_trait::async_trait;

/// Why a notification is being sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// The tracked homework moved to a new review status
    StatusChange,
    /// A poll cycle failed
    Failure,
}

/// A notification to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn status_change(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::StatusChange,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Failure,
            message: message.into(),
        }
    }
}

/// Trait for sending notifications
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Get the notifier type name (e.g. "telegram")
    fn type_name(&self) -> &str;

    /// Send a notification to the configured recipient
    async fn notify(&self, notification: &Notification) -> crate::Result<()>;
}

/// Send through `notifier` and swallow any failure.
///
/// Returns whether the message went out. Errors are logged here and go
/// nowhere else, in particular never back into another notification.
pub async fn deliver(notifier: &dyn Notifier, notification: &Notification) -> bool {
    match notifier.notify(notification).await {
        Ok(()) => {
            tracing::debug!(
                "Sent {:?} notification via '{}'",
                notification.kind,
                notifier.type_name()
            );
            true
        }
        Err(e) => {
            tracing::error!(
                "Failed to send {:?} notification via '{}': {}",
                notification.kind,
                notifier.type_name(),
                e
            );
            false
        }
    }
}
