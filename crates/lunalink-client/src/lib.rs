//! LunaLink server client library.
//!
//! Provides the JSON/multipart REST client for chat, dashboard and push
//! endpoints, and the realtime WebSocket channel carrying partner events.

pub mod api;
pub mod realtime;

/// Unified error type for the lunalink-client crate.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("LunaLink API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Realtime channel error: {0}")]
    Realtime(String),

    #[error("Connection timeout")]
    Timeout,

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl ClientError {
    /// Whether the server refused the session (login expired or missing).
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ClientError::ApiError {
                status: 401 | 403,
                ..
            }
        )
    }

    /// Message suitable for an in-page alert: the server-provided text when
    /// there is one, otherwise `None` so the caller can pick a generic line.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::ApiError { message, .. } | ClientError::Rejected(message)
                if !message.trim().is_empty() =>
            {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}
