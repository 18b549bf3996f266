//! Error types for the GAIEF client

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for GAIEF client operations
#[derive(Debug, Error)]
pub enum GaiefError {
    /// A required form field was missing (detected before any network call)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The backend had no record for the requested id
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend answered with a non-OK status or an `{error}` payload
    #[error("{message}")]
    Backend {
        /// HTTP status of the response
        status: u16,
        /// Message extracted from the error payload
        message: String,
    },

    /// Network/HTTP transport error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(String),
}

/// Convenient Result type using GaiefError
pub type Result<T> = std::result::Result<T, GaiefError>;

/// The two error kinds a user can see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Required input missing; no request was sent
    Validation,
    /// Transport failure or application-level failure
    Request,
}

impl GaiefError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        GaiefError::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        GaiefError::NotFound(msg.into())
    }

    /// Create a backend error
    pub fn backend(status: u16, msg: impl Into<String>) -> Self {
        GaiefError::Backend {
            status,
            message: msg.into(),
        }
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        GaiefError::Config(msg.into())
    }

    /// Create a template error
    pub fn template(msg: impl Into<String>) -> Self {
        GaiefError::Template(msg.into())
    }

    /// Fold the variant into the user-facing kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            GaiefError::Validation(_) => ErrorKind::Validation,
            _ => ErrorKind::Request,
        }
    }

    /// Message as reported by the backend, if this error carries one
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            GaiefError::Backend { message, .. } => Some(message),
            GaiefError::NotFound(message) => Some(message),
            _ => None,
        }
    }
}

/// Normalized `{error: message}` shape handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Human-readable message
    pub error: String,
}

impl ErrorPayload {
    /// Create a payload from any message
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

impl From<&GaiefError> for ErrorPayload {
    fn from(err: &GaiefError) -> Self {
        match err {
            // Validation messages are already phrased for the user
            GaiefError::Validation(msg) => Self::new(msg.clone()),
            other => Self::new(other.to_string()),
        }
    }
}

/// Pull the most useful message out of a non-OK response body.
///
/// Accepts `{error}`, `{detail}` (string or list of `{msg}` objects) and
/// falls back to the raw body or the status line.
pub fn error_message_from_body(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = value.get("error").and_then(|v| v.as_str()) {
            return msg.to_string();
        }
        match value.get("detail") {
            Some(serde_json::Value::String(msg)) => return msg.clone(),
            Some(serde_json::Value::Array(items)) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if !msgs.is_empty() {
                    return msgs.join("; ");
                }
            }
            _ => {}
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("Status {}", status)
    } else {
        trimmed.to_string()
    }
}
