use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ClientError;

// ---------------------------------------------------------------------------
// Push
// ---------------------------------------------------------------------------

/// Push subscription as serialized by the platform push service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscriptionDescriptor {
    pub endpoint: String,
    #[serde(rename = "expirationTime", default)]
    pub expiration_time: Option<i64>,
    pub keys: SubscriptionKeys,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnsubscribeRequest {
    pub endpoint: String,
}

// ---------------------------------------------------------------------------
// Generic action response
// ---------------------------------------------------------------------------

/// `{success, message | error}` envelope used by most POST endpoints.
///
/// `message` is a plain string for dashboard actions but an object for
/// `/chat/send-message`, so it is kept as raw JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ActionResponse {
    pub fn message_text(&self) -> Option<&str> {
        self.message.as_ref().and_then(|m| m.as_str())
    }

    /// Turn `success: false` into [`ClientError::Rejected`].
    pub fn into_result(self) -> Result<Self, ClientError> {
        if self.success {
            Ok(self)
        } else {
            Err(ClientError::Rejected(
                self.error.unwrap_or_else(|| "Request failed".into()),
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Message entry from GET /chat/messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub sender_id: i64,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(rename = "type", default = "default_message_type")]
    pub message_type: String,
    pub timestamp: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub media: Option<MessageMedia>,
}

fn default_message_type() -> String {
    "text".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageMedia {
    pub file_path: String,
    pub file_type: String,
    #[serde(default)]
    pub thumbnail_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagesPage {
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

/// Media entry from GET /chat/media.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: i64,
    pub message_id: i64,
    pub file_path: String,
    pub file_type: String,
    #[serde(default)]
    pub thumbnail_path: Option<String>,
    pub timestamp: String,
    #[serde(default)]
    pub sender_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaList {
    pub media: Vec<MediaItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutgoingMessage {
    pub message: String,
    #[serde(rename = "type")]
    pub message_type: String,
}

impl OutgoingMessage {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            message_type: "text".into(),
        }
    }
}

/// File attached to a chat message (image, video, voice note).
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub caption: Option<String>,
}

impl MediaUpload {
    /// Message type the server expects for this upload, derived from the MIME type.
    pub fn message_type(&self) -> &'static str {
        let mime = self.mime_type.as_str();
        if mime.starts_with("image/") {
            "image"
        } else if mime.starts_with("video/") {
            "video"
        } else if mime.starts_with("audio/") {
            "voice"
        } else {
            "file"
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MoodRequest {
    pub mood_text: String,
    pub emoji: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteRequest {
    pub title: String,
    pub content: String,
    pub is_shared: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnniversaryRequest {
    pub title: String,
    pub date: NaiveDate,
    pub recurring: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HugRequest {
    pub partner_id: i64,
}

// ---------------------------------------------------------------------------
// Invitations / email
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct InvitationRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestEmailRequest {
    pub test_email: String,
}

/// Response of GET /chat/email-status.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailStatus {
    pub configured: bool,
    #[serde(default)]
    pub missing_configs: Vec<String>,
}
