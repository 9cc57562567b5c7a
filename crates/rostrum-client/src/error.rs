//! Client error types

use thiserror::Error;

/// Errors surfaced to the user by client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a usable response
    #[error("Request failed: {0}")]
    Transport(String),

    /// The API answered with a non-2xx status
    #[error("HTTP Error: {status} - {message}")]
    Api { status: u16, message: String },

    /// A local check refused the action before any request was made
    #[error("{0}")]
    Precondition(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

impl ClientError {
    /// Build an [`ClientError::Api`] from a failed response body.
    ///
    /// JSON bodies carry the message in `detail`; anything else is used as-is.
    pub fn from_response(status: u16, content_type: Option<&str>, body: &str) -> Self {
        let is_json = content_type.is_some_and(|ct| ct.contains("application/json"));
        let message = if is_json {
            serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|v| v.get("detail").map(detail_text))
                .unwrap_or_else(|| body.to_string())
        } else {
            body.to_string()
        };
        ClientError::Api { status, message }
    }

    /// Status code of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// `detail` is usually a string; validation errors send a list of objects
fn detail_text(detail: &serde_json::Value) -> String {
    match detail {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

impl From<rostrum_core::JudgementRejection> for ClientError {
    fn from(e: rostrum_core::JudgementRejection) -> Self {
        ClientError::Precondition(e.to_string())
    }
}

/// Client result type alias
pub type ClientResult<T> = Result<T, ClientError>;
