//! Composition of the notification pieces for one session.

use std::sync::Arc;

use lunalink_client::realtime::RealtimeEvent;

use crate::alert::{AlertRenderer, Severity};
use crate::dispatcher::{DispatchOutcome, NotificationDispatcher};
use crate::error::NotifyError;
use crate::permission::{PermissionGate, PermissionState, RequestOrigin};
use crate::platform::{DEFAULT_ICON, Destination, NotificationHandle, NotificationRequest};
use crate::push::{PushSubscriptionManager, Unsubscribed};
use crate::templates::CustomNotification;

const WELCOME_TITLE: &str = "Welcome to LunaLink!";
const WELCOME_BODY: &str = "You will now receive notifications for new messages and activities.";

/// Session-wide notification context. Construct exactly one per session
/// and share it; every piece inside refers to the same permission gate.
pub struct NotificationCenter {
    gate: Arc<PermissionGate>,
    push: PushSubscriptionManager,
    dispatcher: NotificationDispatcher,
    alerts: AlertRenderer,
    server_key: Option<String>,
}

impl NotificationCenter {
    pub fn new(
        gate: Arc<PermissionGate>,
        push: PushSubscriptionManager,
        dispatcher: NotificationDispatcher,
        server_key: Option<String>,
    ) -> Self {
        let alerts = dispatcher.alerts().clone();
        Self {
            gate,
            push,
            dispatcher,
            alerts,
            server_key: server_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Startup: pick up an existing subscription, then make the one
    /// automatic permission request if the user has not decided yet.
    pub async fn start(&self) -> PermissionState {
        if !self.gate.is_supported() {
            tracing::info!("Notifications not supported; running with in-page alerts only");
            return PermissionState::Unknown;
        }

        match self.push.refresh().await {
            Ok(active) => tracing::debug!(subscribed = active, "Push subscription checked"),
            Err(NotifyError::Unsupported(what)) => tracing::info!(what, "Push not available"),
            Err(e) => tracing::warn!(error = %e, "Service worker registration failed"),
        }

        let state = self.gate.current_state();
        if state == PermissionState::Default {
            return self.request_permission(RequestOrigin::Automatic).await;
        }
        state
    }

    /// Ask for permission. A transition to `Granted` shows the welcome
    /// notification and subscribes to push.
    pub async fn request_permission(&self, origin: RequestOrigin) -> PermissionState {
        let before = self.gate.current_state();
        let after = self.gate.request_if_undetermined(origin).await;
        if before != PermissionState::Granted && after == PermissionState::Granted {
            self.welcome();
            if let Err(e) = self.subscribe().await {
                tracing::warn!(error = %e, "Push subscription after permission grant failed");
            }
        }
        after
    }

    fn welcome(&self) {
        self.dispatcher.show_notification(
            NotificationRequest::new(WELCOME_TITLE, Destination::Chat)
                .body(WELCOME_BODY)
                .icon(DEFAULT_ICON),
        );
    }

    async fn subscribe(&self) -> Result<(), NotifyError> {
        let Some(key) = &self.server_key else {
            tracing::debug!("No server push key configured; skipping push subscription");
            return Ok(());
        };
        self.push.subscribe(key).await.map(|_| ())
    }

    /// User-initiated push opt-in. The result is shown as an alert.
    pub async fn enable_push(&self) -> Result<(), NotifyError> {
        let state = self.request_permission(RequestOrigin::User).await;
        let result = match state {
            PermissionState::Granted if self.push.is_subscribed() => Ok(()),
            PermissionState::Granted => self.subscribe_required().await,
            PermissionState::Unknown => Err(NotifyError::Unsupported("notifications")),
            PermissionState::Default => Err(NotifyError::Dismissed),
            PermissionState::Denied => Err(NotifyError::Denied),
        };
        match &result {
            Ok(()) => {
                self.alerts.show("Push notifications enabled", Severity::Success);
            }
            Err(e) => {
                self.alerts.show(e.user_message(), Severity::Error);
            }
        }
        result
    }

    async fn subscribe_required(&self) -> Result<(), NotifyError> {
        let Some(key) = &self.server_key else {
            return Err(NotifyError::InvalidKey("no server key configured".into()));
        };
        self.push.subscribe(key).await.map(|_| ())
    }

    /// User-initiated push opt-out. The result is shown as an alert.
    pub async fn disable_push(&self) -> Result<Unsubscribed, NotifyError> {
        let result = self.push.unsubscribe().await;
        match &result {
            Ok(_) => {
                self.alerts.show("Push notifications disabled", Severity::Info);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Push unsubscribe failed");
                self.alerts.show(e.user_message(), Severity::Error);
            }
        }
        result
    }

    pub fn show_custom(&self, template: &CustomNotification) -> Option<NotificationHandle> {
        self.dispatcher.show_notification(template.to_request())
    }

    pub fn handle_realtime(&self, event: &RealtimeEvent) -> DispatchOutcome {
        self.dispatcher.dispatch_realtime(event)
    }

    pub fn permission(&self) -> PermissionState {
        self.gate.current_state()
    }

    pub fn is_push_subscribed(&self) -> bool {
        self.push.is_subscribed()
    }

    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    pub fn alerts(&self) -> &AlertRenderer {
        &self.alerts
    }
}
