//! Notification permission gate.
//!
//! One gate exists per session. It reads the platform's permission live and
//! prompts at most once automatically; any later prompt has to come from an
//! explicit user action.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::platform::NotificationPlatform;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// Notification capability is absent.
    #[default]
    Unknown,
    /// The user has not answered yet.
    Default,
    Granted,
    Denied,
}

impl PermissionState {
    pub fn from_str_setting(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "default" | "prompt" => Self::Default,
            "granted" => Self::Granted,
            "denied" => Self::Denied,
            _ => Self::Unknown,
        }
    }
}

/// Who asked for the permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOrigin {
    /// Startup flow; allowed once per session.
    Automatic,
    /// Explicit user action such as an "enable notifications" button.
    User,
}

pub struct PermissionGate {
    platform: Option<Arc<dyn NotificationPlatform>>,
    auto_requested: AtomicBool,
}

impl PermissionGate {
    pub fn new(platform: Option<Arc<dyn NotificationPlatform>>) -> Self {
        if platform.is_none() {
            tracing::info!("Notification capability absent; permission stays unknown");
        }
        Self {
            platform,
            auto_requested: AtomicBool::new(false),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.platform.is_some()
    }

    pub fn current_state(&self) -> PermissionState {
        self.platform
            .as_ref()
            .map_or(PermissionState::Unknown, |p| p.permission())
    }

    /// Prompt for permission if (and only if) the user has not decided yet.
    ///
    /// Any state other than `Default` is returned unchanged without touching
    /// the platform. A second automatic request in the same session is a
    /// no-op.
    pub async fn request_if_undetermined(&self, origin: RequestOrigin) -> PermissionState {
        let Some(platform) = &self.platform else {
            return PermissionState::Unknown;
        };

        let current = platform.permission();
        if current != PermissionState::Default {
            return current;
        }

        if origin == RequestOrigin::Automatic && self.auto_requested.swap(true, Ordering::SeqCst) {
            tracing::debug!("Automatic permission request already made this session");
            return current;
        }

        match platform.request_permission().await {
            Ok(state) => {
                tracing::info!(?state, ?origin, "Notification permission answered");
                state
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error requesting notification permission");
                platform.permission()
            }
        }
    }

    pub(crate) fn platform(&self) -> Option<&Arc<dyn NotificationPlatform>> {
        self.platform.as_ref()
    }
}
