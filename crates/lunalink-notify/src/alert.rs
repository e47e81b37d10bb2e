//! In-page alerts (toasts).
//!
//! Alerts live in one lazily-created container. Each alert owns its own
//! timer: a 5 s hold, then a 300 ms exit transition, then removal. Manual
//! dismissal skips the hold. Bursts are fine; nothing is queued or capped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;

pub const ALERT_HOLD: Duration = Duration::from_secs(5);
pub const ALERT_EXIT: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl Severity {
    pub fn icon(self) -> &'static str {
        match self {
            Severity::Success => "✓",
            Severity::Error => "✕",
            Severity::Info => "ℹ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertMessage {
    pub text: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlertId(pub u64);

/// Where alerts are drawn.
pub trait AlertSurface: Send + Sync {
    /// Called once, before the first alert is rendered.
    fn create_container(&self);
    fn render(&self, id: AlertId, message: &AlertMessage);
    /// Start the exit transition.
    fn begin_exit(&self, id: AlertId);
    fn remove(&self, id: AlertId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Visible,
    Exiting,
}

struct Entry {
    id: AlertId,
    message: AlertMessage,
    phase: Phase,
}

#[derive(Default)]
struct Container {
    entries: Vec<Entry>,
}

struct AlertInner {
    surface: Arc<dyn AlertSurface>,
    container: Mutex<Option<Container>>,
    next_id: AtomicU64,
}

/// Shared alert sink. Clones refer to the same container.
#[derive(Clone)]
pub struct AlertRenderer {
    inner: Arc<AlertInner>,
}

impl AlertRenderer {
    pub fn new(surface: Arc<dyn AlertSurface>) -> Self {
        Self {
            inner: Arc::new(AlertInner {
                surface,
                container: Mutex::new(None),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Append an alert and start its auto-dismiss timer.
    pub fn show(&self, text: impl Into<String>, severity: Severity) -> AlertId {
        let id = AlertId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let message = AlertMessage {
            text: text.into(),
            severity,
        };

        {
            let mut slot = self.lock();
            let container = slot.get_or_insert_with(|| {
                self.inner.surface.create_container();
                Container::default()
            });
            container.entries.push(Entry {
                id,
                message: message.clone(),
                phase: Phase::Visible,
            });
        }
        self.inner.surface.render(id, &message);
        tracing::debug!(id = id.0, ?severity, text = %message.text, "Alert shown");

        let renderer = self.clone();
        self.spawn(async move {
            sleep(ALERT_HOLD).await;
            renderer.run_exit(id).await;
        });
        id
    }

    /// Dismiss an alert early (close button). Unknown or already-exiting
    /// alerts are ignored.
    pub fn dismiss(&self, id: AlertId) {
        let renderer = self.clone();
        self.spawn(async move {
            renderer.run_exit(id).await;
        });
    }

    /// Alerts currently attached, oldest first (exiting ones included).
    pub fn visible(&self) -> Vec<(AlertId, AlertMessage)> {
        self.lock()
            .as_ref()
            .map(|c| {
                c.entries
                    .iter()
                    .map(|e| (e.id, e.message.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lock().as_ref().map_or(0, |c| c.entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn run_exit(&self, id: AlertId) {
        let started = {
            let mut slot = self.lock();
            match slot
                .as_mut()
                .and_then(|c| c.entries.iter_mut().find(|e| e.id == id))
            {
                Some(entry) if entry.phase == Phase::Visible => {
                    entry.phase = Phase::Exiting;
                    true
                }
                _ => false,
            }
        };
        if !started {
            return;
        }

        self.inner.surface.begin_exit(id);
        sleep(ALERT_EXIT).await;

        if let Some(container) = self.lock().as_mut() {
            container.entries.retain(|e| e.id != id);
        }
        self.inner.surface.remove(id);
        tracing::trace!(id = id.0, "Alert removed");
    }

    fn spawn<F>(&self, fut: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(fut);
            }
            Err(_) => tracing::warn!("No async runtime; alert timer not started"),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Container>> {
        self.inner
            .container
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
