//! Seams to the host page: OS notifications, page visibility and
//! navigation, audio, decorative animation and the chat widgets.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::NotifyError;
use crate::permission::PermissionState;
use crate::sound::SoundId;

pub const DEFAULT_ICON: &str = "/static/images/icons/icon-192x192.png";
pub const DEFAULT_BADGE: &str = "/static/images/icons/badge-72x72.png";
const DEFAULT_VIBRATE: [u32; 3] = [200, 100, 200];

/// Page a clicked notification navigates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Chat,
    Dashboard,
}

impl Destination {
    pub fn path(self) -> &'static str {
        match self {
            Destination::Chat => "/chat",
            Destination::Dashboard => "/dashboard",
        }
    }
}

/// Action button on an OS notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

/// Everything needed to render one OS notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub tag: Option<String>,
    pub destination: Destination,
    pub vibrate: Vec<u32>,
    pub require_interaction: bool,
    pub actions: Vec<NotificationAction>,
}

impl NotificationRequest {
    pub fn new(title: impl Into<String>, destination: Destination) -> Self {
        Self {
            title: title.into(),
            body: String::new(),
            icon: DEFAULT_ICON.into(),
            badge: DEFAULT_BADGE.into(),
            tag: None,
            destination,
            vibrate: DEFAULT_VIBRATE.to_vec(),
            require_interaction: false,
            actions: vec![
                NotificationAction {
                    action: "open".into(),
                    title: "Open Chat".into(),
                },
                NotificationAction {
                    action: "close".into(),
                    title: "Dismiss".into(),
                },
            ],
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// Platform-owned handle to a rendered OS notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationHandle(pub u64);

/// OS notification capability.
#[async_trait]
pub trait NotificationPlatform: Send + Sync {
    /// Live permission value; never cached by callers.
    fn permission(&self) -> PermissionState;

    /// Show the consent prompt and return the user's answer.
    async fn request_permission(&self) -> Result<PermissionState, NotifyError>;

    fn show(&self, request: &NotificationRequest) -> Result<NotificationHandle, NotifyError>;

    /// Close a notification. Closing an already-closed handle is a no-op.
    fn close(&self, handle: NotificationHandle);
}

/// The page hosting the client.
pub trait PageHost: Send + Sync {
    /// Whether the page is the visible foreground tab, read live.
    fn is_visible(&self) -> bool;
    fn focus(&self);
    fn navigate(&self, path: &str);
    fn reload(&self);
}

pub trait SoundPlayer: Send + Sync {
    fn play(&self, sound: SoundId, volume: f32) -> Result<(), NotifyError>;
}

/// Identity of a decorative element spawned on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

/// Randomized look of one floating heart.
#[derive(Debug, Clone, PartialEq)]
pub struct HeartStyle {
    pub font_size_px: f32,
    pub left_vw: f32,
    pub float_duration: Duration,
}

pub trait AnimationSurface: Send + Sync {
    fn spawn_heart(&self, style: &HeartStyle) -> ElementId;
    /// Remove an element if it is still attached.
    fn remove(&self, id: ElementId);
}

/// Partner presence shown next to the partner's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartnerStatus {
    Online { user_name: String },
    Offline,
}

/// Chat widgets owned by the chat page.
pub trait ChatSurface: Send + Sync {
    fn show_typing(&self, user_name: &str);
    fn hide_typing(&self);
    fn set_partner_status(&self, status: &PartnerStatus);
}
