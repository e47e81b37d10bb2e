//! User-initiated actions. Every outcome is shown as an alert; raw errors
//! are only logged.

use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use lunalink_client::ClientError;
use lunalink_client::api::{
    AnniversaryRequest, MediaUpload, MoodRequest, NoteRequest, OutgoingMessage,
};
use lunalink_client::realtime::{EMIT_SEND_VIRTUAL_HUG, EMIT_STOP_TYPING, EMIT_TYPING};
use lunalink_notify::{Severity, SettingsUpdate};
use serde_json::json;
use tokio::time::sleep;

use crate::app::SharedState;
use crate::config::validation::is_valid_email;

const EMAIL_HELP_DELAY: Duration = Duration::from_secs(1);

/// Alert text for a failed request: the server's own message when it sent
/// one, otherwise `fallback`.
pub fn failure_text(err: &ClientError, fallback: &str) -> String {
    err.server_message().unwrap_or(fallback).to_string()
}

/// Validate an invitation address, returning the trimmed form.
pub fn check_invitation_email(email: &str) -> Result<&str, &'static str> {
    let email = email.trim();
    if email.is_empty() || !is_valid_email(email) {
        return Err("Please enter a valid email address");
    }
    Ok(email)
}

/// Alert text listing missing email settings.
pub fn missing_config_text(missing: &[String]) -> String {
    let missing = if missing.is_empty() {
        "configuration issues".to_string()
    } else {
        missing.join(", ")
    };
    format!("❌ Email configuration issues: {missing}")
}

async fn partner_id(state: &SharedState) -> Option<i64> {
    let id = state.config().await.partner_id;
    if id.is_none() {
        state
            .alerts()
            .show("No partner connected yet", Severity::Error);
    }
    id
}

pub async fn send_virtual_hug(state: &SharedState) {
    let Some(partner_id) = partner_id(state).await else {
        return;
    };
    match state.api().send_virtual_hug(partner_id).await {
        Ok(resp) => {
            let text = resp.message_text().unwrap_or("Virtual hug sent! 💞");
            state.alerts().show(text, Severity::Success);
            if let Some(rt) = state.realtime().await {
                let data = json!({ "partner_id": partner_id, "from_user_name": "You" });
                if let Err(e) = rt.emit(EMIT_SEND_VIRTUAL_HUG, data).await {
                    tracing::warn!("Failed to emit virtual hug: {e}");
                }
            }
        }
        Err(e) => {
            tracing::error!("Error sending virtual hug: {e}");
            state
                .alerts()
                .show(failure_text(&e, "Error sending virtual hug"), Severity::Error);
        }
    }
}

pub async fn send_invitation(state: &SharedState, email: &str) {
    let email = match check_invitation_email(email) {
        Ok(email) => email,
        Err(text) => {
            state.alerts().show(text, Severity::Error);
            return;
        }
    };
    match state.api().send_invitation(email).await {
        Ok(_) => {
            state
                .alerts()
                .show("Invitation sent successfully!", Severity::Success);
        }
        Err(e @ ClientError::Http(_)) => {
            tracing::error!("Error sending invitation: {e}");
            state.alerts().show(
                "Network error. Please check your connection and try again.",
                Severity::Error,
            );
        }
        Err(e) => {
            tracing::warn!("Invitation rejected: {e}");
            state
                .alerts()
                .show(failure_text(&e, "Failed to send invitation"), Severity::Error);
        }
    }
}

/// Check the server's email setup and, when it is complete, send a test
/// email to the configured address.
pub async fn check_email_config(state: &SharedState) {
    state
        .alerts()
        .show("Checking email configuration...", Severity::Info);

    let status = match state.api().email_status().await {
        Ok(status) => status,
        Err(e) => {
            tracing::error!("Error checking email config: {e}");
            state.alerts().show(
                "Error checking email configuration. The endpoint might not be available.",
                Severity::Error,
            );
            return;
        }
    };

    if status.configured {
        state.alerts().show(
            "✓ Email is properly configured! Sending test email...",
            Severity::Success,
        );
        send_test_email(state).await;
        return;
    }

    state
        .alerts()
        .show(missing_config_text(&status.missing_configs), Severity::Error);
    let alerts = state.alerts().clone();
    tokio::spawn(async move {
        sleep(EMAIL_HELP_DELAY).await;
        alerts.show(
            "Please check your environment variables in .env file",
            Severity::Error,
        );
    });
}

async fn send_test_email(state: &SharedState) {
    let Some(email) = state.config().await.user_email.clone() else {
        state
            .alerts()
            .show("No email address available for testing", Severity::Error);
        return;
    };
    state.alerts().show("Sending test email...", Severity::Info);
    match state.api().send_test_email(&email).await {
        Ok(_) => {
            state.alerts().show(
                "✓ Test email sent successfully! Please check your inbox.",
                Severity::Success,
            );
        }
        Err(e @ ClientError::Rejected(_)) => {
            state
                .alerts()
                .show(failure_text(&e, "Failed to send test email"), Severity::Error);
        }
        Err(e) => {
            tracing::error!("Error sending test email: {e}");
            state
                .alerts()
                .show("Error sending test email", Severity::Error);
        }
    }
}

pub async fn update_mood(state: &SharedState, emoji: &str, mood_text: &str) {
    let req = MoodRequest {
        mood_text: mood_text.to_string(),
        emoji: emoji.to_string(),
    };
    match state.api().add_mood(&req).await {
        Ok(_) => {
            state.alerts().show("Mood updated! 💫", Severity::Success);
        }
        Err(e) => {
            tracing::error!("Error updating mood: {e}");
            state
                .alerts()
                .show(failure_text(&e, "Error updating mood"), Severity::Error);
        }
    }
}

pub async fn add_note(state: &SharedState, title: &str, content: &str, shared: bool) {
    if content.trim().is_empty() {
        state
            .alerts()
            .show("Note content is required", Severity::Error);
        return;
    }
    let req = NoteRequest {
        title: title.to_string(),
        content: content.to_string(),
        is_shared: shared,
    };
    match state.api().add_note(&req).await {
        Ok(_) => {
            state
                .alerts()
                .show("Note added successfully! 📝", Severity::Success);
        }
        Err(e) => {
            tracing::error!("Error adding note: {e}");
            state
                .alerts()
                .show(failure_text(&e, "Error adding note"), Severity::Error);
        }
    }
}

pub async fn add_anniversary(state: &SharedState, date: NaiveDate, title: &str) {
    let req = AnniversaryRequest {
        title: title.to_string(),
        date,
        recurring: true,
    };
    match state.api().add_anniversary(&req).await {
        Ok(_) => {
            state
                .alerts()
                .show("Anniversary added! 📅", Severity::Success);
        }
        Err(e) => {
            tracing::error!("Error adding anniversary: {e}");
            state
                .alerts()
                .show(failure_text(&e, "Error adding anniversary"), Severity::Error);
        }
    }
}

pub async fn send_message(state: &SharedState, text: &str) {
    let (partner_id, user_name) = {
        let c = state.config().await;
        (c.partner_id, c.user_name.clone())
    };
    let rt = state.realtime().await;
    if let Some(rt) = &rt {
        let data = json!({ "typing": true, "partner_id": partner_id, "user_name": user_name });
        if let Err(e) = rt.emit(EMIT_TYPING, data).await {
            tracing::debug!("Failed to emit typing: {e}");
        }
    }

    match state.api().send_message(&OutgoingMessage::text(text)).await {
        Ok(msg) => {
            tracing::debug!(id = msg.id, "Message sent");
        }
        Err(e) => {
            tracing::error!("Error sending message: {e}");
            state
                .alerts()
                .show(failure_text(&e, "Error sending message"), Severity::Error);
        }
    }

    if let Some(rt) = &rt {
        let data = json!({ "typing": false, "partner_id": partner_id });
        if let Err(e) = rt.emit(EMIT_STOP_TYPING, data).await {
            tracing::debug!("Failed to emit stop_typing: {e}");
        }
    }
}

pub async fn send_file(state: &SharedState, path: &Path, caption: Option<&str>) {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %path.display(), "Cannot read file: {e}");
            state
                .alerts()
                .show(format!("Cannot read {}", path.display()), Severity::Error);
            return;
        }
    };
    let upload = MediaUpload {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".into()),
        mime_type: mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
        bytes,
        caption: caption.map(String::from),
    };
    if let Err(e) = state.api().send_media(upload).await {
        tracing::error!("Error uploading file: {e}");
        state
            .alerts()
            .show(failure_text(&e, "Error uploading file"), Severity::Error);
    }
}

pub async fn show_history(state: &SharedState, page: Option<u32>) {
    let Some(partner_id) = partner_id(state).await else {
        return;
    };
    match state.api().get_messages(partner_id, page).await {
        Ok(page) => {
            for msg in &page.messages {
                let body = msg
                    .content
                    .as_deref()
                    .unwrap_or(msg.message_type.as_str());
                println!("[{}] {}: {}", msg.timestamp, msg.sender_name, body);
            }
            if page.has_next {
                println!("(older messages available)");
            }
        }
        Err(e) => {
            tracing::error!("Error loading messages: {e}");
            state
                .alerts()
                .show("Error loading messages", Severity::Error);
        }
    }
}

pub async fn show_media(state: &SharedState) {
    let Some(partner_id) = partner_id(state).await else {
        return;
    };
    match state.api().get_media(partner_id).await {
        Ok(items) if items.is_empty() => println!("No shared media yet"),
        Ok(items) => {
            for item in items {
                println!("[{}] {} {}", item.timestamp, item.file_type, item.file_path);
            }
        }
        Err(e) => {
            tracing::error!("Error loading media: {e}");
            state.alerts().show("Error loading media", Severity::Error);
        }
    }
}

pub async fn enable_push(state: &SharedState) {
    // Outcome is shown as an alert by the center.
    let _ = state.center().enable_push().await;
}

pub async fn disable_push(state: &SharedState) {
    let _ = state.center().disable_push().await;
}

pub fn update_settings(state: &SharedState, update: SettingsUpdate) {
    let settings = state.center().dispatcher().update_settings(update);
    let on_off = |b: bool| if b { "on" } else { "off" };
    state.alerts().show(
        format!(
            "Notifications {}, sounds {}",
            on_off(settings.notifications_enabled),
            on_off(settings.sounds_enabled)
        ),
        Severity::Info,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invitation_email_is_trimmed_and_validated() {
        assert_eq!(check_invitation_email("  mira@luna.link "), Ok("mira@luna.link"));
        assert!(check_invitation_email("").is_err());
        assert!(check_invitation_email("mira@luna").is_err());
    }

    #[test]
    fn failure_text_prefers_server_message() {
        let rejected = ClientError::Rejected("Partner not found".into());
        assert_eq!(failure_text(&rejected, "Error"), "Partner not found");

        let blank = ClientError::Rejected("  ".into());
        assert_eq!(failure_text(&blank, "Error sending virtual hug"), "Error sending virtual hug");

        assert_eq!(failure_text(&ClientError::Timeout, "Error"), "Error");
    }

    #[test]
    fn missing_configs_are_listed() {
        assert_eq!(
            missing_config_text(&["MAIL_SERVER".into(), "MAIL_PASSWORD".into()]),
            "❌ Email configuration issues: MAIL_SERVER, MAIL_PASSWORD"
        );
        assert_eq!(
            missing_config_text(&[]),
            "❌ Email configuration issues: configuration issues"
        );
    }
}
