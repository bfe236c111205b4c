//! Engine: the poll loop tying fetcher, validator, differ and notifier together

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio_util::sync::CancellationToken;

use crate::notifier::{deliver, Notification, Notifier};
use crate::status_api::StatusSource;
use crate::validator::validate;
use crate::verdict::{detect_change, extract_latest, ReviewStatus};
use crate::WatcherError;

/// What a single poll cycle ended with
#[derive(Debug)]
pub enum CycleOutcome {
    /// The window contained no homework records
    NoRecords,
    /// The latest record still has the last notified status
    Unchanged,
    /// A new status was seen and one delivery attempt was made
    Notified {
        status: ReviewStatus,
        delivered: bool,
    },
    /// Fetching, validating or diffing failed; the cursor was kept
    Failed {
        error: WatcherError,
        reported: bool,
    },
}

/// Polls the status API forever and reports review status changes.
///
/// Owns the query cursor and the last notified status; both only change
/// through `run_cycle`.
pub struct Watcher {
    source: Arc<dyn StatusSource>,
    notifier: Arc<dyn Notifier>,
    retry_period: Duration,
    cancel: CancellationToken,
    cursor: i64,
    last_seen: Option<ReviewStatus>,
}

impl std::fmt::Debug for Watcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watcher")
            .field("source", &self.source)
            .field("notifier", &self.notifier)
            .field("retry_period", &self.retry_period)
            .field("cursor", &self.cursor)
            .field("last_seen", &self.last_seen)
            .finish()
    }
}

impl Watcher {
    pub fn new(
        source: Arc<dyn StatusSource>,
        notifier: Arc<dyn Notifier>,
        retry_period: Duration,
        cursor: i64,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            source,
            notifier,
            retry_period,
            cancel,
            cursor,
            last_seen: None,
        }
    }

    /// Lower bound of the next query window
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Status most recently notified, if any
    pub fn last_seen(&self) -> Option<ReviewStatus> {
        self.last_seen
    }

    /// Run one fetch/validate/diff/notify cycle without sleeping.
    ///
    /// Never fails: errors are logged, reported through the notifier on a
    /// best-effort basis and returned as [`CycleOutcome::Failed`].
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.poll().await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::error!("Poll cycle failed (from_date={}): {}", self.cursor, error);
                let report = Notification::failure(format!("Program failure: {}", error));
                let reported = deliver(self.notifier.as_ref(), &report).await;
                CycleOutcome::Failed { error, reported }
            }
        }
    }

    async fn poll(&mut self) -> crate::Result<CycleOutcome> {
        let raw = self.source.fetch(self.cursor).await?;
        tracing::debug!("Status API request for from_date={} succeeded", self.cursor);

        let response = validate(&raw)?;

        let outcome = match extract_latest(&response) {
            None => {
                tracing::debug!("No homework updates since {}", self.cursor);
                CycleOutcome::NoRecords
            }
            Some(record) => match detect_change(self.last_seen, record)? {
                None => {
                    tracing::debug!("Status unchanged: {:?}", self.last_seen);
                    CycleOutcome::Unchanged
                }
                Some(change) => {
                    tracing::info!(
                        "Review status changed: {:?} -> {}",
                        self.last_seen,
                        change.status
                    );
                    let notification = Notification::status_change(change.message);
                    let delivered = deliver(self.notifier.as_ref(), &notification).await;
                    self.last_seen = Some(change.status);
                    CycleOutcome::Notified {
                        status: change.status,
                        delivered,
                    }
                }
            },
        };

        self.cursor = response.current_date;
        Ok(outcome)
    }

    /// Cycle until the cancellation token fires.
    ///
    /// The pause after each cycle happens whether it succeeded or not;
    /// cancellation cuts the pause short but never a cycle in progress.
    pub async fn run(&mut self) {
        tracing::info!(
            "Polling {:?} every {:?} starting from {}",
            self.source,
            self.retry_period,
            self.cursor
        );

        loop {
            let outcome = self.run_cycle().await;
            tracing::debug!("Cycle finished: {:?}, next from_date={}", outcome, self.cursor);

            tokio::select! {
                _ = tokio::time::sleep(self.retry_period) => {}
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Poll loop cancelled");
                    break;
                }
            }
        }
    }

    /// Run until ctrl-c
    pub async fn start(mut self) -> crate::Result<()> {
        let cancel_for_signal = self.cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                    cancel_for_signal.cancel();
                }
                Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
            }
        });

        tracing::info!("Review watcher started");
        self.run().await;
        tracing::info!("Review watcher stopped");
        Ok(())
    }
}

/// Current Unix time in whole seconds
pub fn current_epoch_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
