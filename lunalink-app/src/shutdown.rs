use std::time::Duration;

use tokio::time::sleep;

use crate::app::SharedState;

pub async fn graceful_shutdown(state: &SharedState) {
    tracing::info!("Shutdown sequence started");

    state.shutdown_token().cancel();
    tracing::info!("Shutdown: background loops cancelled");

    if let Some(handle) = state.take_realtime().await {
        if handle.shutdown().await {
            tracing::info!("Shutdown: realtime stop signal sent");
        } else {
            tracing::warn!("Shutdown: realtime loop already stopped");
        }
    }

    sleep(Duration::from_millis(200)).await;
    tracing::info!("Shutdown sequence completed");
}
