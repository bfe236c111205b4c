//! Shape checks for status API payloads

use serde_json::Value;

use crate::WatcherError;

const HOMEWORKS_KEY: &str = "homeworks";
const CURRENT_DATE_KEY: &str = "current_date";

/// One entry of `homeworks`, kept as the server sent it.
///
/// Entries are not required to be objects. A record that is not an object
/// simply has no fields.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeworkRecord {
    value: Value,
}

impl HomeworkRecord {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// A field of the record, whatever its JSON type
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.value.get(key)
    }
}

/// A payload that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct StatusResponse {
    /// Most recent first, as ordered by the server
    pub homeworks: Vec<HomeworkRecord>,
    /// Lower bound for the next query window
    pub current_date: i64,
}

/// Check that `raw` has the shape of a status API answer.
///
/// Requires an object with a `homeworks` array and an integer
/// `current_date`. Nothing is coerced: a float or numeric string cursor is
/// rejected. The entries of `homeworks` are not inspected here.
pub fn validate(raw: &Value) -> crate::Result<StatusResponse> {
    let object = raw.as_object().ok_or_else(|| {
        WatcherError::Schema(format!("expected a JSON object, got {}", kind(raw)))
    })?;

    let homeworks = object
        .get(HOMEWORKS_KEY)
        .ok_or_else(|| WatcherError::Schema(format!("missing '{}' key", HOMEWORKS_KEY)))?
        .as_array()
        .ok_or_else(|| WatcherError::Schema(format!("'{}' is not a list", HOMEWORKS_KEY)))?;

    let current_date = object
        .get(CURRENT_DATE_KEY)
        .ok_or_else(|| WatcherError::Schema(format!("missing '{}' key", CURRENT_DATE_KEY)))?
        .as_i64()
        .ok_or_else(|| {
            WatcherError::Schema(format!("'{}' is not an integer", CURRENT_DATE_KEY))
        })?;

    Ok(StatusResponse {
        homeworks: homeworks.iter().cloned().map(HomeworkRecord::new).collect(),
        current_date,
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
