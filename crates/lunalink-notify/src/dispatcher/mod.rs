//! Routes inbound realtime events to user-visible effects.
//!
//! The dispatch table maps each [`EventKind`] to one handler and is fixed at
//! construction. Handlers never block: notification auto-close, heart
//! removal and the partner-connected reload are spawned timers. A failing
//! handler is logged and reported as [`DispatchOutcome::Failed`]; it never
//! stops later events from being handled.

mod handlers;

use std::any::Any;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use lunalink_client::realtime::RealtimeEvent;
use tokio::time::sleep;

use crate::alert::AlertRenderer;
use crate::error::NotifyError;
use crate::events::{EventKind, InboundEvent};
use crate::permission::{PermissionGate, PermissionState};
use crate::platform::{
    AnimationSurface, ChatSurface, Destination, NotificationHandle, NotificationRequest,
    PageHost, SoundPlayer,
};
use crate::sound::{NOTIFICATION_VOLUME, SoundId};

/// OS notifications close themselves after this long.
pub const NOTIFICATION_LIFETIME: Duration = Duration::from_secs(5);
/// Floating hearts detach after this long.
pub const HEART_LIFETIME: Duration = Duration::from_secs(5);
/// Message bodies longer than this many characters are cut.
pub const BODY_LIMIT: usize = 100;

pub const DEFAULT_HEART_COUNT: usize = 10;
pub const DEFAULT_RELOAD_DELAY: Duration = Duration::from_secs(3);

type Handler = fn(&NotificationDispatcher, &InboundEvent) -> Result<(), NotifyError>;

/// Toggles checked at the top of each effectful method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    pub sounds_enabled: bool,
    pub notifications_enabled: bool,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            sounds_enabled: true,
            notifications_enabled: true,
        }
    }
}

/// Partial settings change; `None` leaves a field untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub sounds_enabled: Option<bool>,
    pub notifications_enabled: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    pub heart_count: usize,
    /// Presence events for other users only get logged when set.
    pub partner_id: Option<i64>,
    /// Delay before reloading after a partner connects; `None` never reloads.
    pub reload_delay: Option<Duration>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            heart_count: DEFAULT_HEART_COUNT,
            partner_id: None,
            reload_delay: Some(DEFAULT_RELOAD_DELAY),
        }
    }
}

/// Host-page collaborators the handlers act on.
#[derive(Clone)]
pub struct DispatchTargets {
    pub page: Arc<dyn PageHost>,
    pub sound: Arc<dyn SoundPlayer>,
    pub animation: Arc<dyn AnimationSurface>,
    pub chat: Arc<dyn ChatSurface>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled,
    /// No handler registered, or the kind is unknown.
    Dropped,
    Failed(NotifyError),
}

pub struct NotificationDispatcher {
    gate: Arc<PermissionGate>,
    alerts: AlertRenderer,
    targets: DispatchTargets,
    config: DispatcherConfig,
    settings: Mutex<DispatchSettings>,
    handlers: HashMap<EventKind, Handler>,
}

impl NotificationDispatcher {
    pub fn new(
        gate: Arc<PermissionGate>,
        alerts: AlertRenderer,
        targets: DispatchTargets,
        config: DispatcherConfig,
    ) -> Self {
        Self::with_kinds(gate, alerts, targets, config, &EventKind::ALL)
    }

    /// Build a dispatcher that only handles `kinds`; everything else is
    /// dropped.
    pub fn with_kinds(
        gate: Arc<PermissionGate>,
        alerts: AlertRenderer,
        targets: DispatchTargets,
        config: DispatcherConfig,
        kinds: &[EventKind],
    ) -> Self {
        let handlers = kinds
            .iter()
            .map(|&kind| (kind, handlers::handler_for(kind)))
            .collect();
        Self {
            gate,
            alerts,
            targets,
            config,
            settings: Mutex::new(DispatchSettings::default()),
            handlers,
        }
    }

    /// Handle one decoded event.
    pub fn dispatch(&self, event: &InboundEvent) -> DispatchOutcome {
        let kind = event.kind();
        let Some(handler) = self.handlers.get(&kind) else {
            tracing::trace!(kind = kind.wire_name(), "No handler registered; event dropped");
            return DispatchOutcome::Dropped;
        };
        let result = catch_unwind(AssertUnwindSafe(|| handler(self, event))).unwrap_or_else(
            |payload| {
                Err(NotifyError::Platform(format!(
                    "handler panicked: {}",
                    panic_message(payload.as_ref())
                )))
            },
        );
        match result {
            Ok(()) => {
                tracing::debug!(kind = kind.wire_name(), "Event handled");
                DispatchOutcome::Handled
            }
            Err(e) => {
                tracing::warn!(kind = kind.wire_name(), error = %e, "Event handler failed");
                DispatchOutcome::Failed(e)
            }
        }
    }

    /// Decode and handle a raw realtime frame.
    pub fn dispatch_realtime(&self, raw: &RealtimeEvent) -> DispatchOutcome {
        match InboundEvent::from_realtime(raw) {
            Ok(Some(event)) => self.dispatch(&event),
            Ok(None) => {
                tracing::trace!(event = %raw.event, "Unknown event kind dropped");
                DispatchOutcome::Dropped
            }
            Err(e) => {
                tracing::warn!(event = %raw.event, error = %e, "Undecodable event payload");
                DispatchOutcome::Failed(e)
            }
        }
    }

    pub fn settings(&self) -> DispatchSettings {
        *self.lock_settings()
    }

    pub fn update_settings(&self, update: SettingsUpdate) -> DispatchSettings {
        let mut settings = self.lock_settings();
        if let Some(enabled) = update.sounds_enabled {
            settings.sounds_enabled = enabled;
        }
        if let Some(enabled) = update.notifications_enabled {
            settings.notifications_enabled = enabled;
        }
        tracing::info!(
            sounds = settings.sounds_enabled,
            notifications = settings.notifications_enabled,
            "Notification settings updated"
        );
        *settings
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn alerts(&self) -> &AlertRenderer {
        &self.alerts
    }

    /// Show an OS notification if enabled and permitted. Returns `None` when
    /// suppressed; that is not an error.
    pub fn show_notification(&self, request: NotificationRequest) -> Option<NotificationHandle> {
        if !self.settings().notifications_enabled {
            tracing::trace!(title = %request.title, "Notifications disabled; skipped");
            return None;
        }
        let platform = self.gate.platform()?;
        if platform.permission() != PermissionState::Granted {
            tracing::debug!(title = %request.title, "Permission not granted; notification skipped");
            return None;
        }

        let handle = match platform.show(&request) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(error = %e, title = %request.title, "Failed to show notification");
                return None;
            }
        };

        let platform = platform.clone();
        spawn_timer(async move {
            sleep(NOTIFICATION_LIFETIME).await;
            platform.close(handle);
        });
        Some(handle)
    }

    /// Click on an OS notification: bring the page forward, close the
    /// notification and go to its destination.
    ///
    /// [`NotificationPlatform`](crate::platform::NotificationPlatform) has no
    /// click callback; the host calls this from its own click listener with
    /// the handle returned by [`show_notification`](Self::show_notification).
    pub fn on_notification_click(&self, handle: NotificationHandle, destination: Destination) {
        self.targets.page.focus();
        if let Some(platform) = self.gate.platform() {
            platform.close(handle);
        }
        self.targets.page.navigate(destination.path());
    }

    pub fn play_sound(&self, sound: SoundId) {
        if !self.settings().sounds_enabled {
            return;
        }
        if let Err(e) = self.targets.sound.play(sound, NOTIFICATION_VOLUME) {
            tracing::debug!(sound = sound.name(), error = %e, "Could not play notification sound");
        }
    }

    fn lock_settings(&self) -> std::sync::MutexGuard<'_, DispatchSettings> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cut `content` to [`BODY_LIMIT`] characters plus an ellipsis.
pub fn truncate_body(content: &str) -> String {
    match content.char_indices().nth(BODY_LIMIT) {
        Some((cut, _)) => format!("{}…", &content[..cut]),
        None => content.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

pub(crate) fn spawn_timer<F>(fut: F)
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(fut);
        }
        Err(_) => tracing::warn!("No async runtime; timer not started"),
    }
}
