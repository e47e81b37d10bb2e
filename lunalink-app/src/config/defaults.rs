//! Setting keys and their default values.

pub const SERVER_URL: &str = "LUNALINK_SERVER_URL";
pub const SESSION_COOKIE: &str = "LUNALINK_SESSION_COOKIE";
pub const PARTNER_ID: &str = "LUNALINK_PARTNER_ID";
pub const USER_NAME: &str = "LUNALINK_USER_NAME";
pub const USER_EMAIL: &str = "LUNALINK_USER_EMAIL";
pub const VAPID_PUBLIC_KEY: &str = "LUNALINK_VAPID_PUBLIC_KEY";
pub const NOTIFICATION_PERMISSION: &str = "LUNALINK_NOTIFICATION_PERMISSION";
pub const SOUNDS_ENABLED: &str = "LUNALINK_SOUNDS_ENABLED";
pub const NOTIFICATIONS_ENABLED: &str = "LUNALINK_NOTIFICATIONS_ENABLED";
pub const HEART_COUNT: &str = "LUNALINK_HEART_COUNT";
pub const RELOAD_DELAY_MS: &str = "LUNALINK_RELOAD_DELAY_MS";

/// (key, default, description)
pub const SETTINGS: &[(&str, &str, &str)] = &[
    (SERVER_URL, "http://localhost:5000", "LunaLink server base URL"),
    (SESSION_COOKIE, "", "Session cookie of a logged-in user"),
    (PARTNER_ID, "", "Connected partner's user id"),
    (USER_NAME, "", "Display name sent with typing events"),
    (USER_EMAIL, "", "Address used for test emails"),
    (VAPID_PUBLIC_KEY, "", "Server push public key (URL-safe base64)"),
    (NOTIFICATION_PERMISSION, "default", "Initial notification permission"),
    (SOUNDS_ENABLED, "true", "Play notification sounds"),
    (NOTIFICATIONS_ENABLED, "true", "Show desktop notifications"),
    (HEART_COUNT, "10", "Floating hearts per virtual hug"),
    (RELOAD_DELAY_MS, "3000", "Reload delay after a partner connects; 0 disables"),
];

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    SETTINGS
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, default, _)| *default)
}
