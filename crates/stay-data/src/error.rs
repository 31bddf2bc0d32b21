//! Fetch and API error types.

use thiserror::Error;

/// Errors that can occur when making HTTP requests.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Transport(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Non-2xx response. `message` is the raw body.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Failed to parse response body.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Json(e.to_string())
    }
}

/// A failed call to the booking API, with a message fit for display.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The server answered with an error status.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The request did not reach the server or got no answer.
    #[error("{message}")]
    Transport { message: String, detail: String },

    /// The response could not be understood.
    #[error("{message}")]
    Decode { message: String, detail: String },

    /// The request was refused before sending.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// Message to show to the user.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Server { message, .. }
            | ApiError::Transport { message, .. }
            | ApiError::Decode { message, .. } => message,
            ApiError::Validation(message) => message,
        }
    }

    /// HTTP status, for server-reported errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Technical detail for logs.
    pub fn detail(&self) -> &str {
        match self {
            ApiError::Transport { detail, .. } | ApiError::Decode { detail, .. } => detail,
            other => other.message(),
        }
    }

    /// Normalize a fetch error, preferring the server's own message over `fallback`.
    pub fn from_fetch(err: FetchError, fallback: &str) -> Self {
        match err {
            FetchError::Http { status, message } => ApiError::Server {
                status,
                message: server_message(&message).unwrap_or_else(|| fallback.to_string()),
            },
            FetchError::Transport(detail) | FetchError::InvalidUrl(detail) => {
                ApiError::Transport {
                    message: fallback.to_string(),
                    detail,
                }
            }
            FetchError::Parse(detail) | FetchError::Json(detail) => ApiError::Decode {
                message: fallback.to_string(),
                detail,
            },
        }
    }
}

/// Extract the human-readable message from an error payload.
///
/// Accepts `{"message": ..}`, `{"error": ..}` and `{"error": {"message": ..}}`.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let candidate = value
        .get("message")
        .and_then(|v| v.as_str())
        .or_else(|| value.get("error").and_then(|v| v.as_str()))
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.get("message"))
                .and_then(|v| v.as_str())
        })?;

    let trimmed = candidate.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
