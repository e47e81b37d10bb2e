//! Push subscription lifecycle.
//!
//! Registers the background worker, creates and revokes the platform push
//! subscription and keeps the server informed. Subscription is a
//! best-effort enhancement: every failure is logged and returned, never
//! panicked, and the local flag only flips to subscribed after the server
//! has acknowledged the subscription.

mod key;
mod server;
#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::NotifyError;
use crate::permission::{PermissionGate, PermissionState};

pub use key::decode_server_key;
pub use lunalink_client::api::PushSubscriptionDescriptor as Subscription;

/// Script URL of the background delivery worker.
pub const WORKER_SCRIPT: &str = "/sw.js";

/// A registered background delivery worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub scope: String,
    pub script_url: String,
}

/// Platform push service.
#[async_trait]
pub trait PushPlatform: Send + Sync {
    async fn register(&self, script_url: &str) -> Result<Registration, NotifyError>;

    /// The subscription the platform currently holds, if any.
    async fn current_subscription(
        &self,
        registration: &Registration,
    ) -> Result<Option<Subscription>, NotifyError>;

    async fn subscribe(
        &self,
        registration: &Registration,
        application_server_key: &[u8],
    ) -> Result<Subscription, NotifyError>;

    async fn unsubscribe(&self, subscription: &Subscription) -> Result<(), NotifyError>;
}

/// Server endpoints that track push subscriptions.
#[async_trait]
pub trait SubscriptionServer: Send + Sync {
    async fn register_subscription(&self, subscription: &Subscription) -> Result<(), NotifyError>;
    async fn drop_subscription(&self, endpoint: &str) -> Result<(), NotifyError>;
}

/// Result of a successful [`PushSubscriptionManager::unsubscribe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unsubscribed {
    Revoked { endpoint: String },
    /// Nothing to revoke; no platform or server call was made.
    NoActiveSubscription,
}

pub struct PushSubscriptionManager {
    platform: Option<Arc<dyn PushPlatform>>,
    server: Arc<dyn SubscriptionServer>,
    gate: Arc<PermissionGate>,
    registration: Mutex<Option<Registration>>,
    subscribed: AtomicBool,
}

impl PushSubscriptionManager {
    pub fn new(
        platform: Option<Arc<dyn PushPlatform>>,
        server: Arc<dyn SubscriptionServer>,
        gate: Arc<PermissionGate>,
    ) -> Self {
        Self {
            platform,
            server,
            gate,
            registration: Mutex::new(None),
            subscribed: AtomicBool::new(false),
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::SeqCst)
    }

    /// Register the background worker once; later calls reuse it.
    pub async fn ensure_registered(&self) -> Result<Registration, NotifyError> {
        let Some(platform) = &self.platform else {
            return Err(NotifyError::Unsupported("push messaging"));
        };
        let mut slot = self.registration.lock().await;
        if let Some(registration) = slot.as_ref() {
            return Ok(registration.clone());
        }
        let registration = platform.register(WORKER_SCRIPT).await?;
        tracing::info!(scope = %registration.scope, "Service worker registered");
        *slot = Some(registration.clone());
        Ok(registration)
    }

    /// Re-read the platform subscription and update the local flag. This is
    /// where a subscription the platform dropped on its own is noticed.
    pub async fn refresh(&self) -> Result<bool, NotifyError> {
        let registration = self.ensure_registered().await?;
        let platform = self.platform()?;
        let active = platform.current_subscription(&registration).await?.is_some();
        self.subscribed.store(active, Ordering::SeqCst);
        Ok(active)
    }

    /// Subscribe with the server's public key and report it to the server.
    pub async fn subscribe(&self, server_public_key: &str) -> Result<Subscription, NotifyError> {
        match self.try_subscribe(server_public_key).await {
            Ok(subscription) => {
                self.subscribed.store(true, Ordering::SeqCst);
                tracing::info!(endpoint = %subscription.endpoint, "Subscribed to push notifications");
                Ok(subscription)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to subscribe to push notifications");
                Err(e)
            }
        }
    }

    async fn try_subscribe(&self, server_public_key: &str) -> Result<Subscription, NotifyError> {
        if self.gate.current_state() != PermissionState::Granted {
            return Err(NotifyError::Denied);
        }
        let registration = self.ensure_registered().await?;
        let platform = self.platform()?;
        let key = decode_server_key(server_public_key)?;
        let subscription = platform.subscribe(&registration, &key).await?;
        self.server.register_subscription(&subscription).await?;
        Ok(subscription)
    }

    /// Revoke the current subscription, then tell the server.
    ///
    /// Without an active subscription this succeeds without any server call.
    /// Once the platform has revoked, the local flag is cleared even if the
    /// server call fails; the server catches up on the next subscription.
    pub async fn unsubscribe(&self) -> Result<Unsubscribed, NotifyError> {
        let registration = match self.ensure_registered().await {
            Ok(registration) => registration,
            Err(NotifyError::Unsupported(_)) => return Ok(Unsubscribed::NoActiveSubscription),
            Err(e) => return Err(e),
        };
        let platform = self.platform()?;

        let Some(subscription) = platform.current_subscription(&registration).await? else {
            self.subscribed.store(false, Ordering::SeqCst);
            tracing::debug!("No push subscription to revoke");
            return Ok(Unsubscribed::NoActiveSubscription);
        };

        platform.unsubscribe(&subscription).await?;
        self.subscribed.store(false, Ordering::SeqCst);

        if let Err(e) = self.server.drop_subscription(&subscription.endpoint).await {
            tracing::warn!(
                error = %e,
                endpoint = %subscription.endpoint,
                "Push revoked locally but server was not informed"
            );
            return Err(e);
        }

        tracing::info!("Unsubscribed from push notifications");
        Ok(Unsubscribed::Revoked {
            endpoint: subscription.endpoint,
        })
    }

    fn platform(&self) -> Result<&Arc<dyn PushPlatform>, NotifyError> {
        self.platform
            .as_ref()
            .ok_or(NotifyError::Unsupported("push messaging"))
    }
}
