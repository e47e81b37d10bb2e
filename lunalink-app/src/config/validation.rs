//! Setting value validation.

use lunalink_notify::PermissionState;
use regex::Regex;
use std::sync::LazyLock;

use super::defaults;

static RE_HTTP_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/?#]+(/[^\s]*)?$").unwrap());
static RE_URL_SAFE_BASE64: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+={0,2}$").unwrap());
static RE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        defaults::SERVER_URL => {
            if !RE_HTTP_URL.is_match(value) {
                return Err("must be an http:// or https:// URL".into());
            }
        }
        defaults::PARTNER_ID => {
            if !value.is_empty() {
                let v: i64 = value.parse().map_err(|_| "must be an integer")?;
                if v <= 0 {
                    return Err("must be a positive user id".into());
                }
            }
        }
        defaults::USER_EMAIL => {
            if !value.is_empty() && !is_valid_email(value) {
                return Err("invalid email address".into());
            }
        }
        defaults::VAPID_PUBLIC_KEY => {
            if !value.is_empty() && !RE_URL_SAFE_BASE64.is_match(value) {
                return Err("must be URL-safe base64".into());
            }
        }
        defaults::NOTIFICATION_PERMISSION => {
            if PermissionState::from_str_setting(value) == PermissionState::Unknown {
                return Err("must be default, prompt, granted, or denied".into());
            }
        }
        defaults::HEART_COUNT => validate_int_range(value, 1, 50)?,
        defaults::RELOAD_DELAY_MS => validate_int_range(value, 0, 60_000)?,
        defaults::SOUNDS_ENABLED | defaults::NOTIFICATIONS_ENABLED => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

/// Address check used before sending invitations.
pub fn is_valid_email(email: &str) -> bool {
    RE_EMAIL.is_match(email)
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}
