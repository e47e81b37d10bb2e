use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::COOKIE;

use super::*;
use crate::api::SESSION_COOKIE_NAME;

impl RealtimeChannel {
    /// Run one connection until shutdown (`Ok`) or failure (`Err`).
    pub(super) async fn connect_once(
        config: &RealtimeConfig,
        event_tx: &mpsc::Sender<RealtimeEvent>,
        outbound_rx: &mut mpsc::Receiver<RealtimeEvent>,
        shutdown_rx: &mut mpsc::Receiver<()>,
    ) -> Result<(), ClientError> {
        use tokio_tungstenite::tungstenite::Message as Msg;

        tracing::info!(url = %config.url, "Connecting to realtime channel");
        let request = Self::build_request(config)?;
        let (mut ws, _) = match connect_async(request).await {
            Ok(conn) => conn,
            Err(tokio_tungstenite::tungstenite::Error::Http(resp)) => {
                return Err(ClientError::ApiError {
                    status: resp.status().as_u16(),
                    message: "realtime handshake rejected".into(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        tracing::info!("Realtime channel connected");

        let mut keepalive = tokio::time::interval(config.ping_interval);
        keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);
        keepalive.tick().await;
        let mut last_seen = Instant::now();

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("Realtime shutdown during listen");
                    let _ = ws.close(None).await;
                    return Ok(());
                }
                Some(outbound) = outbound_rx.recv() => {
                    let text = serde_json::to_string(&outbound)?;
                    tracing::debug!(event = %outbound.event, "Realtime emit");
                    ws.send(Msg::Text(text.into())).await?;
                }
                _ = keepalive.tick() => {
                    if last_seen.elapsed() >= config.idle_timeout {
                        tracing::warn!("Realtime idle timeout");
                        return Err(ClientError::Timeout);
                    }
                    ws.send(Msg::Ping(Default::default())).await?;
                }
                frame = ws.next() => {
                    last_seen = Instant::now();
                    match frame {
                        Some(Ok(Msg::Text(text))) => {
                            if let Some(event) = Self::parse_frame(&text) {
                                tracing::debug!(event = %event.event, "Realtime event");
                                if event_tx.send(event).await.is_err() {
                                    let _ = ws.close(None).await;
                                    return Err(ClientError::Realtime("event receiver dropped".into()));
                                }
                            }
                        }
                        Some(Ok(Msg::Ping(data))) => {
                            let _ = ws.send(Msg::Pong(data)).await;
                        }
                        Some(Ok(Msg::Close(_))) | None => {
                            tracing::warn!("Realtime WebSocket closed by server");
                            return Err(ClientError::Realtime("Server closed".into()));
                        }
                        Some(Err(e)) => return Err(ClientError::WebSocket(e)),
                        Some(Ok(_)) => {}
                    }
                }
            }
        }
    }

    pub(super) fn build_request(
        config: &RealtimeConfig,
    ) -> Result<tokio_tungstenite::tungstenite::handshake::client::Request, ClientError> {
        let mut request = config.url.as_str().into_client_request()?;
        if let Some(cookie) = config.session_cookie.as_deref().filter(|c| !c.trim().is_empty()) {
            let value = if cookie.contains('=') {
                cookie.to_string()
            } else {
                format!("{SESSION_COOKIE_NAME}={cookie}")
            };
            let value = HeaderValue::from_str(&value)
                .map_err(|e| ClientError::Realtime(format!("invalid session cookie: {e}")))?;
            request.headers_mut().insert(COOKIE, value);
        }
        Ok(request)
    }

    /// Decode one text frame. Frames that are not `{"event": ..., "data": ...}`
    /// are logged and skipped so one bad frame never tears down the channel.
    pub(super) fn parse_frame(text: &str) -> Option<RealtimeEvent> {
        match serde_json::from_str::<RealtimeEvent>(text) {
            Ok(event) if !event.event.trim().is_empty() => Some(event),
            Ok(_) => {
                tracing::debug!("Realtime frame without event name skipped");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable realtime frame skipped");
                None
            }
        }
    }
}
