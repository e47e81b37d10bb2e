//! Notification sounds.

use serde::Serialize;

use crate::events::EventKind;

pub const NOTIFICATION_VOLUME: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundId {
    Message,
    Online,
    Hug,
    General,
}

impl SoundId {
    /// Sound for an event kind; kinds without their own sound use `General`.
    pub fn for_kind(kind: EventKind) -> Self {
        match kind {
            EventKind::NewMessage => SoundId::Message,
            EventKind::UserOnline => SoundId::Online,
            EventKind::VirtualHug => SoundId::Hug,
            _ => SoundId::General,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SoundId::Message => "message",
            SoundId::Online => "online",
            SoundId::Hug => "hug",
            SoundId::General => "general",
        }
    }

    pub fn asset_path(self) -> &'static str {
        match self {
            SoundId::Message => "/static/sounds/message.mp3",
            SoundId::Online => "/static/sounds/online.mp3",
            SoundId::Hug => "/static/sounds/hug.mp3",
            SoundId::General => "/static/sounds/notification.mp3",
        }
    }
}
