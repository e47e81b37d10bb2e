//! Realtime WebSocket channel for partner events.
//!
//! Connects to `<server>/realtime`, forwards `{"event", "data"}` frames in
//! arrival order, sends outbound emits, and reconnects with exponential
//! backoff when the connection drops.

mod connection;
#[cfg(test)]
mod tests;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};

use crate::ClientError;

const REALTIME_PATH: &str = "realtime";
const PING_INTERVAL: Duration = Duration::from_secs(25);
const IDLE_TIMEOUT: Duration = Duration::from_secs(60);
const BASE_BACKOFF: Duration = Duration::from_secs(2);
const MAX_BACKOFF: Duration = Duration::from_secs(60);
const FAILURE_RESET_WINDOW: Duration = Duration::from_secs(5 * 60);
const MAX_CONSECUTIVE_FAILURES_BEFORE_RESTART: u32 = 8;
const EVENT_BUFFER: usize = 256;
const OUTBOUND_BUFFER: usize = 64;

/// Inbound event names sent by the server.
pub const EVENT_NEW_MESSAGE: &str = "new_message";
pub const EVENT_USER_ONLINE: &str = "user_online";
pub const EVENT_USER_OFFLINE: &str = "user_offline";
pub const EVENT_USER_TYPING: &str = "user_typing";
pub const EVENT_USER_STOP_TYPING: &str = "user_stop_typing";
pub const EVENT_VIRTUAL_HUG: &str = "virtual_hug";
pub const EVENT_MOOD_UPDATE: &str = "mood_update";
pub const EVENT_PARTNER_CONNECTED: &str = "partner_connected";
pub const EVENT_ERROR: &str = "error";

/// Outbound event names understood by the server.
pub const EMIT_TYPING: &str = "typing";
pub const EMIT_STOP_TYPING: &str = "stop_typing";
pub const EMIT_SEND_VIRTUAL_HUG: &str = "send_virtual_hug";
pub const EMIT_PARTNER_CONNECTED: &str = "partner_connected";

/// One frame on the realtime channel, in either direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeEvent {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl RealtimeEvent {
    pub fn new(event: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}

/// Realtime channel configuration.
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    pub url: url::Url,
    pub session_cookie: Option<String>,
    /// How often the client pings the server.
    pub ping_interval: Duration,
    /// The connection is considered dead after this long without any frame
    /// (pongs included).
    pub idle_timeout: Duration,
}

impl RealtimeConfig {
    /// Derive the WebSocket URL from the HTTP server URL (`http` → `ws`,
    /// `https` → `wss`).
    pub fn from_server_url(
        server_url: &url::Url,
        session_cookie: Option<String>,
    ) -> Result<Self, ClientError> {
        let mut url = server_url.clone();
        let scheme = match server_url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => {
                return Err(ClientError::Realtime(format!(
                    "unsupported server scheme: {other}"
                )));
            }
        };
        url.set_scheme(scheme)
            .map_err(|_| ClientError::Realtime(format!("cannot use scheme {scheme}")))?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        let url = url.join(REALTIME_PATH)?;
        Ok(Self {
            url,
            session_cookie,
            ping_interval: PING_INTERVAL,
            idle_timeout: IDLE_TIMEOUT,
        })
    }
}

/// Why the connection loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `shutdown()` was called.
    Shutdown,
    /// The server rejected the session (401/403). Reconnecting with the
    /// same cookie will not help.
    Unauthorized,
    /// The event receiver was dropped.
    ReceiverDropped,
    /// Too many consecutive failures; the caller decides whether to retry.
    TooManyFailures,
}

/// Handle to a running channel: emit outbound events or stop the loop.
#[derive(Clone)]
pub struct RealtimeHandle {
    outbound_tx: mpsc::Sender<RealtimeEvent>,
    shutdown_tx: mpsc::Sender<()>,
    stop_rx: watch::Receiver<Option<StopReason>>,
}

impl RealtimeHandle {
    /// Queue an outbound event. Events queued while disconnected are sent
    /// after the next successful connect.
    pub async fn emit(&self, event: &str, data: serde_json::Value) -> Result<(), ClientError> {
        self.outbound_tx
            .send(RealtimeEvent::new(event, data))
            .await
            .map_err(|_| ClientError::Realtime("channel closed".into()))
    }

    /// Ask the connection loop to stop.
    pub async fn shutdown(&self) -> bool {
        self.shutdown_tx.send(()).await.is_ok()
    }

    /// Set once the loop has stopped, before the event receiver sees the
    /// channel close.
    pub fn stop_reason(&self) -> Option<StopReason> {
        *self.stop_rx.borrow()
    }
}

/// Realtime WebSocket client with auto-reconnect.
///
/// Events are delivered via `mpsc::Receiver<RealtimeEvent>` in the order the
/// server sent them.
pub struct RealtimeChannel;

impl RealtimeChannel {
    /// Start the connection loop. Returns the event receiver and a handle.
    pub async fn connect(
        config: RealtimeConfig,
    ) -> Result<(mpsc::Receiver<RealtimeEvent>, RealtimeHandle), ClientError> {
        let (event_tx, event_rx) = mpsc::channel::<RealtimeEvent>(EVENT_BUFFER);
        let (outbound_tx, outbound_rx) = mpsc::channel::<RealtimeEvent>(OUTBOUND_BUFFER);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        let (stop_tx, stop_rx) = watch::channel(None);
        tokio::spawn(async move {
            let reason = Self::run_loop(&config, &event_tx, outbound_rx, shutdown_rx).await;
            stop_tx.send_replace(Some(reason));
            drop(event_tx);
        });
        Ok((
            event_rx,
            RealtimeHandle {
                outbound_tx,
                shutdown_tx,
                stop_rx,
            },
        ))
    }

    async fn run_loop(
        config: &RealtimeConfig,
        event_tx: &mpsc::Sender<RealtimeEvent>,
        mut outbound_rx: mpsc::Receiver<RealtimeEvent>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) -> StopReason {
        let mut failures: u32 = 0;
        let mut last_failure_at: Option<Instant> = None;
        loop {
            if shutdown_rx.try_recv().is_ok() {
                tracing::info!("Realtime shutdown requested");
                return StopReason::Shutdown;
            }
            if let Some(last_failure) = last_failure_at {
                if last_failure.elapsed() >= FAILURE_RESET_WINDOW {
                    if failures > 0 {
                        tracing::info!(failures, "Realtime failures reset after stable interval");
                    }
                    failures = 0;
                    last_failure_at = None;
                }
            }
            match Self::connect_once(config, event_tx, &mut outbound_rx, &mut shutdown_rx).await {
                Ok(()) => {
                    tracing::info!("Realtime connection closed cleanly");
                    return StopReason::Shutdown;
                }
                Err(e) => {
                    if e.is_auth_error() {
                        tracing::warn!(
                            error = %e,
                            "Realtime connection rejected the session; stopping loop"
                        );
                        return StopReason::Unauthorized;
                    }
                    if event_tx.is_closed() {
                        tracing::info!("Realtime event receiver dropped; stopping loop");
                        return StopReason::ReceiverDropped;
                    }
                    failures += 1;
                    last_failure_at = Some(Instant::now());
                    if failures >= MAX_CONSECUTIVE_FAILURES_BEFORE_RESTART {
                        tracing::warn!(
                            failures,
                            "Realtime failures exceeded threshold; handing back to caller"
                        );
                        return StopReason::TooManyFailures;
                    }
                    let backoff = Self::backoff_duration(failures);
                    tracing::warn!(
                        error = %e, attempt = failures,
                        backoff_secs = backoff.as_secs(),
                        "Realtime connection failed, will reconnect"
                    );
                    tokio::select! {
                        _ = shutdown_rx.recv() => {
                            tracing::info!("Realtime shutdown requested during reconnect backoff");
                            return StopReason::Shutdown;
                        }
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
            }
        }
    }

    fn backoff_duration(failures: u32) -> Duration {
        let d = BASE_BACKOFF * 2u32.saturating_pow(failures.saturating_sub(1));
        d.min(MAX_BACKOFF)
    }
}
