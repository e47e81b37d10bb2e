//! Error taxonomy for notification and push operations.

use lunalink_client::ClientError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    /// Platform capability missing. Permanent; degrade silently.
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),

    /// User declined notification permission. Permanent for the session.
    #[error("Notification permission denied")]
    Denied,

    /// Permission prompt closed without an answer. Asking again is allowed.
    #[error("Notification permission prompt dismissed")]
    Dismissed,

    /// Fetch or subscribe call failed; may succeed later.
    #[error("Network request failed: {0}")]
    TransientNetwork(String),

    /// Push service or other platform call failed.
    #[error("Platform error: {0}")]
    Platform(String),

    /// Server public key could not be decoded.
    #[error("Invalid server key: {0}")]
    InvalidKey(String),

    /// Inbound event payload did not match its kind.
    #[error("Malformed {kind} payload: {reason}")]
    Malformed { kind: &'static str, reason: String },
}

impl NotifyError {
    /// Line shown in an alert when a user-initiated action fails.
    pub fn user_message(&self) -> String {
        match self {
            NotifyError::Unsupported(what) => {
                format!("Sorry, {what} is not available in this browser")
            }
            NotifyError::Denied => {
                "Notifications are blocked. Allow them in your browser settings to enable push."
                    .into()
            }
            NotifyError::Dismissed => {
                "Notifications were not enabled. Allow them when prompted to turn on push.".into()
            }
            NotifyError::TransientNetwork(_) => {
                "Network error. Please check your connection and try again.".into()
            }
            NotifyError::Platform(_) | NotifyError::InvalidKey(_) => {
                "Could not set up push notifications. Please try again later.".into()
            }
            NotifyError::Malformed { .. } => "Received an unexpected update from the server".into(),
        }
    }
}

impl From<ClientError> for NotifyError {
    fn from(e: ClientError) -> Self {
        NotifyError::TransientNetwork(e.to_string())
    }
}
