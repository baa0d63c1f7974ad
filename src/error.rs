//! Error types for chat and video requests.

use serde::Deserialize;

/// Maximum length of an error message carried from a response body.
const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Errors that can occur while talking to the chat or video endpoints.
#[derive(Debug, thiserror::Error)]
pub enum SoraChatError {
    /// Credential missing or rejected by the server.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Transport failure (connection, TLS, body read).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned a structured failure on a synchronous call.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Message from the body's `error.message`, or a fallback.
        message: String,
    },

    /// Response succeeded but lacks the documented fields.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Response shape violates the documented contract.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The video job reached a terminal failed status.
    #[error("video generation failed: {0}")]
    Remote(String),

    /// Polling ceiling exceeded without a terminal status.
    #[error("video generation timed out after {attempts} status checks")]
    Timeout {
        /// Number of status checks made before giving up.
        attempts: u32,
    },

    /// Generation completed but the content download failed.
    #[error("failed to retrieve video content: {0}")]
    ContentFetch(String),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (e.g., saving a video or reading an image).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, SoraChatError>;

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Extracts `error.message` from an OpenAI-style error body.
pub(crate) fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|env| env.error)
        .and_then(|e| e.message)
        .map(|m| sanitize_error_message(&m))
        .filter(|m| !m.is_empty())
}

/// Collapses whitespace and truncates overly long messages.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > MAX_ERROR_MESSAGE_LEN {
        let truncated: String = collapsed.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
        format!("{truncated}...")
    } else {
        collapsed
    }
}

/// Turns a non-success HTTP response into an error.
///
/// `fallback` is used when the body carries no `error.message`.
pub(crate) fn normalize_error(status: u16, body: &str, fallback: &str) -> SoraChatError {
    let message = api_error_message(body).unwrap_or_else(|| fallback.to_string());
    if status == 401 || status == 403 {
        return SoraChatError::Auth(message);
    }
    SoraChatError::Api { status, message }
}
