//! Runtime application configuration loaded from the environment.

use std::time::Duration;

use lunalink_notify::{DispatchSettings, DispatcherConfig, PermissionState};

use super::ConfigError;
use super::defaults::{self, get_default};
use super::validation::validate_setting;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_url: url::Url,
    pub session_cookie: Option<String>,
    pub partner_id: Option<i64>,
    pub user_name: String,
    pub user_email: Option<String>,
    pub vapid_public_key: Option<String>,
    pub notification_permission: PermissionState,
    pub sounds_enabled: bool,
    pub notifications_enabled: bool,
    pub heart_count: usize,
    pub reload_delay: Option<Duration>,
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`. Invalid optional values are
    /// logged and replaced by their defaults; an invalid server URL is fatal.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let g = |key: &'static str| -> String {
            let default = get_default(key).unwrap_or_default();
            let Some(value) = lookup(key).map(|v| v.trim().to_string()) else {
                return default.to_string();
            };
            if value.is_empty() {
                return default.to_string();
            }
            match validate_setting(key, &value) {
                Ok(()) => value,
                Err(reason) => {
                    tracing::warn!(key, %reason, "Invalid setting, using default");
                    default.to_string()
                }
            }
        };

        let raw_url = lookup(defaults::SERVER_URL)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| get_default(defaults::SERVER_URL).unwrap_or_default().to_string());
        validate_setting(defaults::SERVER_URL, &raw_url).map_err(|reason| {
            ConfigError::Invalid {
                key: defaults::SERVER_URL,
                reason,
            }
        })?;
        let server_url = url::Url::parse(&raw_url).map_err(|e| ConfigError::Invalid {
            key: defaults::SERVER_URL,
            reason: e.to_string(),
        })?;

        let reload_ms = parse_u64(&g(defaults::RELOAD_DELAY_MS), 3_000);

        Ok(Self {
            server_url,
            session_cookie: non_empty(g(defaults::SESSION_COOKIE)),
            partner_id: g(defaults::PARTNER_ID).parse().ok(),
            user_name: non_empty(g(defaults::USER_NAME)).unwrap_or_else(|| "Your partner".into()),
            user_email: non_empty(g(defaults::USER_EMAIL)),
            vapid_public_key: non_empty(g(defaults::VAPID_PUBLIC_KEY)),
            notification_permission: PermissionState::from_str_setting(&g(
                defaults::NOTIFICATION_PERMISSION,
            )),
            sounds_enabled: g(defaults::SOUNDS_ENABLED) == "true",
            notifications_enabled: g(defaults::NOTIFICATIONS_ENABLED) == "true",
            heart_count: parse_u64(&g(defaults::HEART_COUNT), 10) as usize,
            reload_delay: (reload_ms > 0).then(|| Duration::from_millis(reload_ms)),
        })
    }

    /// Check settings a session cannot work without.
    pub fn require_session(&self) -> Result<(), ConfigError> {
        if self.session_cookie.is_none() {
            return Err(ConfigError::Missing {
                key: defaults::SESSION_COOKIE,
            });
        }
        Ok(())
    }

    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            heart_count: self.heart_count,
            partner_id: self.partner_id,
            reload_delay: self.reload_delay,
        }
    }

    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            sounds_enabled: self.sounds_enabled,
            notifications_enabled: self.notifications_enabled,
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

fn parse_u64(s: &str, default: u64) -> u64 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}
