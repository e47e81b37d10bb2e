use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use lunalink_notify::{
    NotificationHandle, NotificationPlatform, NotificationRequest, NotifyError, PermissionState,
};

/// Desktop notifications rendered as boxed terminal lines.
///
/// The terminal cannot show a consent dialog, so an undecided permission is
/// answered with `granted` on the first request; start the client with
/// `LUNALINK_NOTIFICATION_PERMISSION=denied` to opt out.
pub struct ConsoleNotifications {
    permission: Mutex<PermissionState>,
    next_handle: AtomicU64,
}

impl ConsoleNotifications {
    pub fn new(initial: PermissionState) -> Self {
        Self {
            permission: Mutex::new(initial),
            next_handle: AtomicU64::new(1),
        }
    }

    fn set(&self, state: PermissionState) {
        *self.permission.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

#[async_trait]
impl NotificationPlatform for ConsoleNotifications {
    fn permission(&self) -> PermissionState {
        *self.permission.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn request_permission(&self) -> Result<PermissionState, NotifyError> {
        let state = match self.permission() {
            PermissionState::Default | PermissionState::Unknown => PermissionState::Granted,
            decided => decided,
        };
        self.set(state);
        Ok(state)
    }

    fn show(&self, request: &NotificationRequest) -> Result<NotificationHandle, NotifyError> {
        let handle = NotificationHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        println!("┌ 🔔 {}", request.title);
        if !request.body.is_empty() {
            println!("└ {}", request.body);
        }
        tracing::debug!(handle = handle.0, tag = ?request.tag, "Notification shown");
        Ok(handle)
    }

    fn close(&self, handle: NotificationHandle) {
        tracing::trace!(handle = handle.0, "Notification closed");
    }
}
