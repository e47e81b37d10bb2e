use std::sync::Arc;

use lunalink_client::api::LunaLinkApiClient;
use lunalink_client::realtime::RealtimeHandle;
use lunalink_notify::{
    AlertRenderer, DispatchTargets, NotificationCenter, NotificationDispatcher, PermissionGate,
    PushSubscriptionManager, SettingsUpdate,
};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::console::{
    ConsoleAlerts, ConsoleChat, ConsoleHearts, ConsoleNotifications, ConsolePage, ConsoleSound,
};

/// Session state shared by the realtime handler and the command loop.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    config: RwLock<AppConfig>,
    api: LunaLinkApiClient,
    /// The single notification context of this session
    center: NotificationCenter,
    page: Arc<ConsolePage>,
    /// Handle of the live realtime connection, if any
    realtime: RwLock<Option<RealtimeHandle>>,
    shutdown_token: CancellationToken,
}

impl SharedState {
    /// Wire the notification stack to the terminal surfaces.
    pub fn new(config: AppConfig, api: LunaLinkApiClient) -> Self {
        let page = Arc::new(ConsolePage::default());
        let gate = Arc::new(PermissionGate::new(Some(Arc::new(ConsoleNotifications::new(
            config.notification_permission,
        )))));
        let alerts = AlertRenderer::new(Arc::new(ConsoleAlerts));
        let targets = DispatchTargets {
            page: page.clone(),
            sound: Arc::new(ConsoleSound),
            animation: Arc::new(ConsoleHearts::default()),
            chat: Arc::new(ConsoleChat),
        };
        let dispatcher =
            NotificationDispatcher::new(gate.clone(), alerts, targets, config.dispatcher_config());
        let settings = config.dispatch_settings();
        dispatcher.update_settings(SettingsUpdate {
            sounds_enabled: Some(settings.sounds_enabled),
            notifications_enabled: Some(settings.notifications_enabled),
        });

        // Terminals have no push service; the manager reports Unsupported.
        let push = PushSubscriptionManager::new(None, Arc::new(api.clone()), gate.clone());
        let center =
            NotificationCenter::new(gate, push, dispatcher, config.vapid_public_key.clone());

        Self {
            inner: Arc::new(SharedStateInner {
                config: RwLock::new(config),
                api,
                center,
                page,
                realtime: RwLock::new(None),
                shutdown_token: CancellationToken::new(),
            }),
        }
    }

    /// Get a read lock on the current config.
    pub async fn config(&self) -> tokio::sync::RwLockReadGuard<'_, AppConfig> {
        self.inner.config.read().await
    }

    pub fn api(&self) -> &LunaLinkApiClient {
        &self.inner.api
    }

    pub fn center(&self) -> &NotificationCenter {
        &self.inner.center
    }

    pub fn alerts(&self) -> &AlertRenderer {
        self.inner.center.alerts()
    }

    pub fn page(&self) -> &ConsolePage {
        &self.inner.page
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown_token
    }

    pub async fn set_realtime(&self, handle: Option<RealtimeHandle>) {
        *self.inner.realtime.write().await = handle;
    }

    pub async fn realtime(&self) -> Option<RealtimeHandle> {
        self.inner.realtime.read().await.clone()
    }

    pub async fn take_realtime(&self) -> Option<RealtimeHandle> {
        self.inner.realtime.write().await.take()
    }
}
