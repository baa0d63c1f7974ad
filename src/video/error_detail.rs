//! Normalization of the failure payload reported for a failed video job.

use crate::error::sanitize_error_message;
use serde_json::Value;

/// Detail used when the failure payload has no recognizable message.
pub const GENERIC_FAILURE: &str = "Video generation failed";

/// The shapes a job's `error` field arrives in.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorPayload {
    /// `"error": "quota exceeded"`
    Text(String),
    /// `"error": {"message": "..."}`
    Flat(String),
    /// `"error": {"error": {"message": "..."}}`
    Nested(String),
    /// Anything else.
    Unrecognized(Value),
}

impl ErrorPayload {
    /// Classifies a payload. Precedence: string, `message`, `error.message`.
    pub fn from_value(value: &Value) -> Self {
        if let Some(text) = value.as_str() {
            return Self::Text(text.to_string());
        }
        if let Some(message) = non_empty_str(value.get("message")) {
            return Self::Flat(message.to_string());
        }
        if let Some(message) = non_empty_str(value.pointer("/error/message")) {
            return Self::Nested(message.to_string());
        }
        Self::Unrecognized(value.clone())
    }

    /// Returns the detail string, or [`GENERIC_FAILURE`].
    pub fn message(&self) -> String {
        match self {
            Self::Text(text) if !text.trim().is_empty() => sanitize_error_message(text),
            Self::Flat(message) | Self::Nested(message) => sanitize_error_message(message),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Normalizes an `error` payload to a detail string.
pub fn resolve_error(value: &Value) -> String {
    ErrorPayload::from_value(value).message()
}

/// Detail for a failed status payload.
///
/// Uses `error` when present, then a `failure_reason` string.
pub(crate) fn failure_detail(payload: &Value) -> String {
    match payload.get("error") {
        Some(error) if !error.is_null() => resolve_error(error),
        _ => non_empty_str(payload.get("failure_reason"))
            .map(sanitize_error_message)
            .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
    }
}
