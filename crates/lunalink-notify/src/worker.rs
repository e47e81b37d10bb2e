//! Background delivery worker behavior: offline shell caching, push payload
//! rendering and notification clicks while no page is open.

use serde::Deserialize;

use crate::platform::{DEFAULT_BADGE, DEFAULT_ICON};

pub const SHELL_CACHE_NAME: &str = "lunalink-v1";

/// Assets cached on install so the app shell loads offline.
pub const SHELL_ASSETS: [&str; 4] = [
    "/",
    "/static/css/style.css",
    "/static/js/app.js",
    DEFAULT_ICON,
];

const DEFAULT_TITLE: &str = "LunaLink";
const DEFAULT_BODY: &str = "New notification from LunaLink";
const DEFAULT_URL: &str = "/";

pub fn is_shell_asset(path: &str) -> bool {
    SHELL_ASSETS.contains(&path)
}

#[derive(Debug, Default, Deserialize)]
struct RawPayload {
    title: Option<String>,
    body: Option<String>,
    icon: Option<String>,
    data: Option<RawData>,
}

#[derive(Debug, Default, Deserialize)]
struct RawData {
    url: Option<String>,
}

/// A push message ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub url: String,
}

impl PushPayload {
    /// Parse a push message body. Missing fields, an empty body and bodies
    /// that are not JSON all fall back to the generic LunaLink notification.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let raw = if bytes.is_empty() {
            RawPayload::default()
        } else {
            serde_json::from_slice(bytes).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Push payload is not JSON; using defaults");
                RawPayload::default()
            })
        };
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

        Self {
            title: non_empty(raw.title).unwrap_or_else(|| DEFAULT_TITLE.into()),
            body: non_empty(raw.body).unwrap_or_else(|| DEFAULT_BODY.into()),
            icon: non_empty(raw.icon).unwrap_or_else(|| DEFAULT_ICON.into()),
            badge: DEFAULT_BADGE.into(),
            url: non_empty(raw.data.and_then(|d| d.url)).unwrap_or_else(|| DEFAULT_URL.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    /// Focus an already-open window at the root.
    Focus,
    Open(String),
    Dismiss,
}

/// Decide what a click on a push notification does. The notification is
/// closed in every case.
pub fn on_click(action: &str, payload_url: &str, open_windows: &[&str]) -> ClickAction {
    if action != "open" {
        return ClickAction::Dismiss;
    }
    if open_windows.contains(&"/") {
        return ClickAction::Focus;
    }
    let url = if payload_url.is_empty() { DEFAULT_URL } else { payload_url };
    ClickAction::Open(url.to_string())
}
