//! Terminal implementations of the host-page seams.
//!
//! A terminal has no OS notification center, audio element or DOM, so each
//! surface renders a line of text instead. The page counts as hidden while
//! the user is marked away.

mod alerts;
mod notifications;

pub use alerts::ConsoleAlerts;
pub use notifications::ConsoleNotifications;

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use lunalink_notify::{
    AnimationSurface, ChatSurface, ElementId, HeartStyle, NotifyError, PageHost, PartnerStatus,
    SoundId, SoundPlayer,
};

#[derive(Default)]
pub struct ConsolePage {
    away: AtomicBool,
    reloads: AtomicUsize,
}

impl ConsolePage {
    pub fn set_away(&self, away: bool) {
        self.away.store(away, Ordering::SeqCst);
        tracing::debug!(away, "Page visibility changed");
    }

    pub fn is_away(&self) -> bool {
        self.away.load(Ordering::SeqCst)
    }

    /// Reload requests received so far.
    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

impl PageHost for ConsolePage {
    fn is_visible(&self) -> bool {
        !self.is_away()
    }

    fn focus(&self) {
        self.set_away(false);
    }

    fn navigate(&self, path: &str) {
        println!("→ {path}");
    }

    fn reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        tracing::info!("Page reload requested");
        println!("↻ Reloading...");
    }
}

/// Rings the terminal bell.
pub struct ConsoleSound;

impl SoundPlayer for ConsoleSound {
    fn play(&self, sound: SoundId, volume: f32) -> Result<(), NotifyError> {
        tracing::trace!(sound = sound.name(), asset = sound.asset_path(), volume, "Sound");
        print!("\x07");
        Ok(())
    }
}

#[derive(Default)]
pub struct ConsoleHearts {
    next_id: AtomicU64,
}

impl AnimationSurface for ConsoleHearts {
    fn spawn_heart(&self, style: &HeartStyle) -> ElementId {
        let id = ElementId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let indent = (style.left_vw / 100.0 * 40.0) as usize;
        println!("{:indent$}💖", "");
        id
    }

    fn remove(&self, id: ElementId) {
        tracing::trace!(id = id.0, "Heart faded");
    }
}

pub struct ConsoleChat;

impl ChatSurface for ConsoleChat {
    fn show_typing(&self, user_name: &str) {
        println!("… {user_name} is typing...");
    }

    fn hide_typing(&self) {
        tracing::trace!("Typing indicator hidden");
    }

    fn set_partner_status(&self, status: &PartnerStatus) {
        match status {
            PartnerStatus::Online { user_name } => println!("● {user_name} is online"),
            PartnerStatus::Offline => println!("○ Partner is offline"),
        }
    }
}
