//! Dashboard reminder notifications.

use serde::Deserialize;

use crate::platform::{Destination, NotificationRequest};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CustomNotification {
    Anniversary { title: String },
    Streak { days: u32 },
    Memory { years: u32 },
}

impl CustomNotification {
    pub fn to_request(&self) -> NotificationRequest {
        let (title, body, icon) = match self {
            CustomNotification::Anniversary { title } => (
                "Anniversary Reminder! 🎉",
                format!("Today is your {title}!"),
                "/static/images/icons/anniversary.png",
            ),
            CustomNotification::Streak { days } => (
                "Chat Streak! 🔥",
                format!("You've maintained your {days}-day chat streak!"),
                "/static/images/icons/streak.png",
            ),
            CustomNotification::Memory { years } => (
                "Memory Alert! 📸",
                format!("On this day {years} years ago..."),
                "/static/images/icons/memory.png",
            ),
        };
        NotificationRequest::new(title, Destination::Dashboard)
            .body(body)
            .icon(icon)
    }
}
