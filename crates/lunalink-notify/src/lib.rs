//! Client notification and realtime event dispatch for LunaLink.
//!
//! Owns the notification permission gate, the push subscription lifecycle,
//! the per-kind event dispatcher and the in-page alert sink. Everything the
//! host page provides (OS notifications, visibility, audio, animation, chat
//! widgets) is reached through the traits in [`platform`].

pub mod alert;
pub mod center;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod permission;
pub mod platform;
pub mod push;
pub mod sound;
pub mod templates;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use alert::{AlertId, AlertMessage, AlertRenderer, AlertSurface, Severity};
pub use center::NotificationCenter;
pub use dispatcher::{
    DispatchOutcome, DispatchSettings, DispatchTargets, DispatcherConfig, NotificationDispatcher,
    SettingsUpdate, truncate_body,
};
pub use error::NotifyError;
pub use events::{EventKind, InboundEvent};
pub use permission::{PermissionGate, PermissionState, RequestOrigin};
pub use platform::{
    AnimationSurface, ChatSurface, Destination, ElementId, HeartStyle, NotificationHandle,
    NotificationPlatform, NotificationRequest, PageHost, PartnerStatus, SoundPlayer,
};
pub use push::{
    PushPlatform, PushSubscriptionManager, Registration, Subscription, SubscriptionServer,
    Unsubscribed, decode_server_key,
};
pub use sound::SoundId;
pub use templates::CustomNotification;
