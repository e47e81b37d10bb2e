use rand::Rng;
use tokio::time::sleep;

use super::{HEART_LIFETIME, Handler, NotificationDispatcher, spawn_timer, truncate_body};
use crate::alert::Severity;
use crate::error::NotifyError;
use crate::events::{EventKind, InboundEvent, Presence};
use crate::platform::{HeartStyle, NotificationRequest, PartnerStatus};
use crate::sound::SoundId;

const ONLINE_ICON: &str = "/static/images/icons/online.png";
const HEART_ICON: &str = "/static/images/icons/heart.png";
const AVATAR_DIR: &str = "/static/images/avatars";

pub(super) fn handler_for(kind: EventKind) -> Handler {
    match kind {
        EventKind::NewMessage => on_new_message,
        EventKind::UserOnline => on_user_online,
        EventKind::UserOffline => on_user_offline,
        EventKind::UserTyping => on_user_typing,
        EventKind::UserStopTyping => on_user_stop_typing,
        EventKind::VirtualHug => on_virtual_hug,
        EventKind::MoodUpdate => on_mood_update,
        EventKind::PartnerConnected => on_partner_connected,
        EventKind::ServerError => on_server_error,
    }
}

fn mismatch(kind: EventKind, event: &InboundEvent) -> NotifyError {
    NotifyError::Malformed {
        kind: kind.wire_name(),
        reason: format!("handler received {}", event.kind().wire_name()),
    }
}

fn on_new_message(d: &NotificationDispatcher, event: &InboundEvent) -> Result<(), NotifyError> {
    let InboundEvent::NewMessage(msg) = event else {
        return Err(mismatch(EventKind::NewMessage, event));
    };
    if d.targets.page.is_visible() {
        return Ok(());
    }

    let mut request = NotificationRequest::new(
        format!("New message from {}", msg.sender_name),
        EventKind::NewMessage.destination(),
    )
    .body(truncate_body(msg.content.as_deref().unwrap_or_default()))
    .tag("new-message");
    if let Some(avatar) = msg.avatar.as_deref().filter(|a| !a.is_empty()) {
        request = request.icon(format!("{AVATAR_DIR}/{avatar}"));
    }

    d.show_notification(request);
    d.play_sound(SoundId::for_kind(EventKind::NewMessage));
    Ok(())
}

fn is_partner(d: &NotificationDispatcher, presence: &Presence) -> bool {
    match (d.config.partner_id, presence.user_id) {
        (None, _) => true,
        (Some(partner), Some(user)) => partner == user,
        (Some(_), None) => false,
    }
}

fn on_user_online(d: &NotificationDispatcher, event: &InboundEvent) -> Result<(), NotifyError> {
    let InboundEvent::UserOnline(presence) = event else {
        return Err(mismatch(EventKind::UserOnline, event));
    };
    if !is_partner(d, presence) {
        tracing::trace!(user_id = ?presence.user_id, "Presence for another user ignored");
        return Ok(());
    }

    let name = presence.user_name.clone().unwrap_or_else(|| "Your partner".into());
    d.targets.chat.set_partner_status(&PartnerStatus::Online {
        user_name: name.clone(),
    });

    if d.targets.page.is_visible() {
        return Ok(());
    }
    d.show_notification(
        NotificationRequest::new(
            format!("{name} is now online"),
            EventKind::UserOnline.destination(),
        )
        .body("Your partner has come online")
        .icon(ONLINE_ICON)
        .tag("user-online"),
    );
    d.play_sound(SoundId::for_kind(EventKind::UserOnline));
    Ok(())
}

fn on_user_offline(d: &NotificationDispatcher, event: &InboundEvent) -> Result<(), NotifyError> {
    let InboundEvent::UserOffline(presence) = event else {
        return Err(mismatch(EventKind::UserOffline, event));
    };
    if is_partner(d, presence) {
        d.targets.chat.set_partner_status(&PartnerStatus::Offline);
    }
    Ok(())
}

fn on_user_typing(d: &NotificationDispatcher, event: &InboundEvent) -> Result<(), NotifyError> {
    let InboundEvent::UserTyping(typing) = event else {
        return Err(mismatch(EventKind::UserTyping, event));
    };
    let name = typing.user_name.as_deref().unwrap_or("Your partner");
    d.targets.chat.show_typing(name);
    Ok(())
}

fn on_user_stop_typing(d: &NotificationDispatcher, event: &InboundEvent) -> Result<(), NotifyError> {
    let InboundEvent::UserStopTyping(_) = event else {
        return Err(mismatch(EventKind::UserStopTyping, event));
    };
    d.targets.chat.hide_typing();
    Ok(())
}

fn on_virtual_hug(d: &NotificationDispatcher, event: &InboundEvent) -> Result<(), NotifyError> {
    let InboundEvent::VirtualHug(hug) = event else {
        return Err(mismatch(EventKind::VirtualHug, event));
    };

    d.show_notification(
        NotificationRequest::new("Virtual Hug! 💖", EventKind::VirtualHug.destination())
            .body(format!("{} sent you a virtual hug!", hug.from_user_name))
            .icon(HEART_ICON)
            .tag("virtual-hug"),
    );
    d.alerts.show(
        format!("{} sent you a virtual hug! 💞", hug.from_user_name),
        Severity::Success,
    );
    d.play_sound(SoundId::for_kind(EventKind::VirtualHug));
    spawn_hearts(d, d.config.heart_count.max(1));
    Ok(())
}

fn spawn_hearts(d: &NotificationDispatcher, count: usize) {
    let mut rng = rand::thread_rng();
    for _ in 0..count {
        let style = HeartStyle {
            font_size_px: rng.gen_range(16.0..40.0),
            left_vw: rng.gen_range(0.0..100.0),
            float_duration: std::time::Duration::from_millis(rng.gen_range(2_000..5_000)),
        };
        let id = d.targets.animation.spawn_heart(&style);
        let animation = d.targets.animation.clone();
        spawn_timer(async move {
            sleep(HEART_LIFETIME).await;
            animation.remove(id);
        });
    }
    tracing::trace!(count, "Floating hearts spawned");
}

fn on_mood_update(d: &NotificationDispatcher, event: &InboundEvent) -> Result<(), NotifyError> {
    let InboundEvent::MoodUpdate(mood) = event else {
        return Err(mismatch(EventKind::MoodUpdate, event));
    };
    let text = format!("{} is feeling {} {}", mood.user_name, mood.mood_text, mood.emoji);
    d.alerts.show(text.trim_end(), Severity::Info);
    Ok(())
}

fn on_partner_connected(d: &NotificationDispatcher, event: &InboundEvent) -> Result<(), NotifyError> {
    let InboundEvent::PartnerConnected(connected) = event else {
        return Err(mismatch(EventKind::PartnerConnected, event));
    };
    tracing::info!(
        partner_id = ?connected.partner_id,
        partner = %connected.partner_name,
        "Partner connected"
    );
    d.alerts.show(
        format!(
            "🎉 Connected with {}! You can now start chatting together!",
            connected.partner_name
        ),
        Severity::Success,
    );

    if let Some(delay) = d.config.reload_delay {
        let page = d.targets.page.clone();
        spawn_timer(async move {
            sleep(delay).await;
            page.reload();
        });
    }
    Ok(())
}

fn on_server_error(d: &NotificationDispatcher, event: &InboundEvent) -> Result<(), NotifyError> {
    let InboundEvent::ServerError(err) = event else {
        return Err(mismatch(EventKind::ServerError, event));
    };
    tracing::warn!(message = %err.message, "Server reported an error");
    d.alerts.show(err.message.clone(), Severity::Error);
    Ok(())
}
