//! Realtime event handler: keeps the channel connected and feeds every
//! inbound event to the notification dispatcher in delivery order.

use std::time::Duration;

use lunalink_client::realtime::{RealtimeChannel, RealtimeConfig, RealtimeEvent, StopReason};
use lunalink_notify::DispatchOutcome;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::app::SharedState;

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Start the realtime handler loop.
///
/// Reconnects whenever the channel gives up, until shutdown.
pub async fn run(state: SharedState) {
    let token = state.shutdown_token().clone();

    loop {
        if token.is_cancelled() {
            break;
        }

        let config = {
            let c = state.config().await;
            RealtimeConfig::from_server_url(&c.server_url, c.session_cookie.clone())
        };
        let config = match config {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Invalid realtime configuration: {e}");
                return;
            }
        };

        tracing::info!(url = %config.url, "Starting realtime connection");
        match RealtimeChannel::connect(config).await {
            Ok((event_rx, handle)) => {
                state.set_realtime(Some(handle)).await;
                process_events(&state, event_rx, &token).await;
                let mut stopped = None;
                if let Some(handle) = state.take_realtime().await {
                    handle.shutdown().await;
                    stopped = handle.stop_reason();
                }
                if token.is_cancelled() {
                    break;
                }
                if !should_reconnect(stopped) {
                    tracing::error!(
                        "Realtime channel rejected the session; not reconnecting. \
                         Log in again and update LUNALINK_SESSION_COOKIE"
                    );
                    return;
                }
                tracing::warn!(reason = ?stopped, "Realtime event stream ended, will reconnect");
            }
            Err(e) => {
                tracing::error!("Realtime connection failed: {e}");
            }
        }

        if sleep_or_cancel(&token, RECONNECT_DELAY).await {
            break;
        }
    }
    tracing::info!("Realtime handler stopped (shutdown)");
}

/// Process events from the channel until it closes or shutdown is requested.
async fn process_events(
    state: &SharedState,
    mut events: mpsc::Receiver<RealtimeEvent>,
    token: &CancellationToken,
) {
    loop {
        let event = tokio::select! {
            _ = token.cancelled() => return,
            event = events.recv() => event,
        };
        let Some(event) = event else {
            return;
        };
        handle_event(state, &event);
    }
}

fn handle_event(state: &SharedState, event: &RealtimeEvent) {
    match state.center().handle_realtime(event) {
        DispatchOutcome::Handled => {}
        DispatchOutcome::Dropped => {
            tracing::debug!(event = %event.event, "Realtime event ignored");
        }
        DispatchOutcome::Failed(e) => {
            tracing::debug!(event = %event.event, error = %e, "Realtime event not handled");
        }
    }
}

/// A rejected session stays rejected until the cookie is replaced.
fn should_reconnect(stopped: Option<StopReason>) -> bool {
    stopped != Some(StopReason::Unauthorized)
}

/// Returns `true` if cancelled before the duration elapsed.
async fn sleep_or_cancel(token: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = token.cancelled() => true,
        _ = sleep(duration) => false,
    }
}
