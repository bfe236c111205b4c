//! Review status codes, verdict phrases, and change detection

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::validator::{HomeworkRecord, StatusResponse};
use crate::WatcherError;

/// Review state of a homework submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl ReviewStatus {
    /// Canonical phrase sent to the user for this status
    pub fn verdict(&self) -> &'static str {
        match self {
            ReviewStatus::Approved => {
                "The work has been reviewed: the reviewer liked everything. Hooray!"
            }
            ReviewStatus::Reviewing => "The work has been taken for review by the reviewer.",
            ReviewStatus::Rejected => "The work has been reviewed: the reviewer has comments.",
        }
    }

    /// Status code as used by the API
    pub fn code(&self) -> &'static str {
        match self {
            ReviewStatus::Approved => "approved",
            ReviewStatus::Reviewing => "reviewing",
            ReviewStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ReviewStatus {
    type Err = WatcherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(ReviewStatus::Approved),
            "reviewing" => Ok(ReviewStatus::Reviewing),
            "rejected" => Ok(ReviewStatus::Rejected),
            other => Err(WatcherError::UnknownStatus(other.to_string())),
        }
    }
}

/// A detected transition to a new review status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub status: ReviewStatus,
    pub message: String,
}

/// The record the server lists first, i.e. the most recent one
pub fn extract_latest(response: &StatusResponse) -> Option<&HomeworkRecord> {
    response.homeworks.first()
}

/// Only an absent key is a missing field; any other non-code value is an
/// unknown status.
fn status_of(record: &HomeworkRecord) -> crate::Result<ReviewStatus> {
    match record.field("status") {
        None => Err(WatcherError::UnknownField("status".to_string())),
        Some(Value::String(code)) => code.parse(),
        Some(other) => Err(WatcherError::UnknownStatus(other.to_string())),
    }
}

/// Render the user-facing message for a record.
///
/// A name that is not a string is rendered as its JSON text.
pub fn render_verdict(record: &HomeworkRecord) -> crate::Result<String> {
    let name = match record.field("homework_name") {
        None => return Err(WatcherError::UnknownField("homework_name".to_string())),
        Some(Value::String(name)) => name.clone(),
        Some(other) => other.to_string(),
    };
    let status = status_of(record)?;
    Ok(format!(
        "Changed review status of \"{}\". {}",
        name,
        status.verdict()
    ))
}

/// Compare a record against the last notified status.
///
/// Returns `None` when the status is unchanged. The name is only required
/// once a change has been seen.
pub fn detect_change(
    last_seen: Option<ReviewStatus>,
    record: &HomeworkRecord,
) -> crate::Result<Option<StatusChange>> {
    let status = status_of(record)?;
    if last_seen == Some(status) {
        return Ok(None);
    }
    let message = render_verdict(record)?;
    Ok(Some(StatusChange { status, message }))
}
