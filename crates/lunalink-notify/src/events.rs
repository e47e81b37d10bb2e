//! Typed inbound realtime events.
//!
//! The realtime channel delivers `{event, data}` frames; this module turns
//! them into a closed [`InboundEvent`] so handlers match exhaustively instead
//! of probing JSON fields.

use lunalink_client::realtime::{self, RealtimeEvent};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::NotifyError;
use crate::platform::Destination;

/// Every event kind the dispatcher knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    NewMessage,
    UserOnline,
    UserOffline,
    UserTyping,
    UserStopTyping,
    VirtualHug,
    MoodUpdate,
    PartnerConnected,
    ServerError,
}

impl EventKind {
    pub const ALL: [EventKind; 9] = [
        EventKind::NewMessage,
        EventKind::UserOnline,
        EventKind::UserOffline,
        EventKind::UserTyping,
        EventKind::UserStopTyping,
        EventKind::VirtualHug,
        EventKind::MoodUpdate,
        EventKind::PartnerConnected,
        EventKind::ServerError,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            EventKind::NewMessage => realtime::EVENT_NEW_MESSAGE,
            EventKind::UserOnline => realtime::EVENT_USER_ONLINE,
            EventKind::UserOffline => realtime::EVENT_USER_OFFLINE,
            EventKind::UserTyping => realtime::EVENT_USER_TYPING,
            EventKind::UserStopTyping => realtime::EVENT_USER_STOP_TYPING,
            EventKind::VirtualHug => realtime::EVENT_VIRTUAL_HUG,
            EventKind::MoodUpdate => realtime::EVENT_MOOD_UPDATE,
            EventKind::PartnerConnected => realtime::EVENT_PARTNER_CONNECTED,
            EventKind::ServerError => realtime::EVENT_ERROR,
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.wire_name() == name)
    }

    /// Page a notification for this kind opens when clicked.
    pub fn destination(self) -> Destination {
        match self {
            EventKind::MoodUpdate => Destination::Dashboard,
            _ => Destination::Chat,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewMessage {
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Presence {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Typing {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VirtualHug {
    pub from_user_name: String,
    #[serde(default)]
    pub from_user_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MoodUpdate {
    pub user_name: String,
    #[serde(alias = "mood")]
    pub mood_text: String,
    #[serde(default)]
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PartnerConnected {
    #[serde(default)]
    pub partner_id: Option<i64>,
    pub partner_name: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerError {
    pub message: String,
}

/// An inbound event with its kind-specific payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    NewMessage(NewMessage),
    UserOnline(Presence),
    UserOffline(Presence),
    UserTyping(Typing),
    UserStopTyping(Typing),
    VirtualHug(VirtualHug),
    MoodUpdate(MoodUpdate),
    PartnerConnected(PartnerConnected),
    ServerError(ServerError),
}

impl InboundEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InboundEvent::NewMessage(_) => EventKind::NewMessage,
            InboundEvent::UserOnline(_) => EventKind::UserOnline,
            InboundEvent::UserOffline(_) => EventKind::UserOffline,
            InboundEvent::UserTyping(_) => EventKind::UserTyping,
            InboundEvent::UserStopTyping(_) => EventKind::UserStopTyping,
            InboundEvent::VirtualHug(_) => EventKind::VirtualHug,
            InboundEvent::MoodUpdate(_) => EventKind::MoodUpdate,
            InboundEvent::PartnerConnected(_) => EventKind::PartnerConnected,
            InboundEvent::ServerError(_) => EventKind::ServerError,
        }
    }

    /// Decode a realtime frame. Unknown event names yield `Ok(None)` so newer
    /// servers can add kinds without breaking older clients.
    pub fn from_realtime(raw: &RealtimeEvent) -> Result<Option<Self>, NotifyError> {
        let Some(kind) = EventKind::from_wire(&raw.event) else {
            return Ok(None);
        };
        let data = &raw.data;
        let event = match kind {
            EventKind::NewMessage => InboundEvent::NewMessage(payload(kind, data)?),
            EventKind::UserOnline => InboundEvent::UserOnline(payload(kind, data)?),
            EventKind::UserOffline => InboundEvent::UserOffline(payload(kind, data)?),
            EventKind::UserTyping => InboundEvent::UserTyping(payload(kind, data)?),
            EventKind::UserStopTyping => InboundEvent::UserStopTyping(payload(kind, data)?),
            EventKind::VirtualHug => InboundEvent::VirtualHug(payload(kind, data)?),
            EventKind::MoodUpdate => InboundEvent::MoodUpdate(payload(kind, data)?),
            EventKind::PartnerConnected => InboundEvent::PartnerConnected(payload(kind, data)?),
            EventKind::ServerError => InboundEvent::ServerError(payload(kind, data)?),
        };
        Ok(Some(event))
    }
}

fn payload<T: DeserializeOwned>(kind: EventKind, data: &serde_json::Value) -> Result<T, NotifyError> {
    // Stop-typing style events may arrive with no body at all.
    let data = if data.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        data.clone()
    };
    serde_json::from_value(data).map_err(|e| NotifyError::Malformed {
        kind: kind.wire_name(),
        reason: e.to_string(),
    })
}
