use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::StreamExt;
use tokio::net::TcpListener;

use super::*;

/// Local WebSocket server that never sends anything. With `answer_pings`
/// it keeps reading so pings get their automatic pong; without it the
/// socket is held open but never read. Returns the server URL and the
/// number of accepted connections.
async fn quiet_server(answer_pings: bool) -> (url::Url, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let count = accepted.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            count.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
                    return;
                };
                if answer_pings {
                    while let Some(Ok(_)) = ws.next().await {}
                } else {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    drop(ws);
                }
            });
        }
    });
    let url = url::Url::parse(&format!("http://{addr}")).unwrap();
    (url, accepted)
}

fn fast_keepalive(server: &url::Url) -> RealtimeConfig {
    let mut config = RealtimeConfig::from_server_url(server, None).unwrap();
    config.ping_interval = Duration::from_millis(20);
    config.idle_timeout = Duration::from_millis(150);
    config
}

#[test]
fn parse_frame_reads_event_and_data() {
    let event = RealtimeChannel::parse_frame(
        r#"{"event": "virtual_hug", "data": {"from_user_name": "Mia"}}"#,
    )
    .unwrap();
    assert_eq!(event.event, EVENT_VIRTUAL_HUG);
    assert_eq!(event.data["from_user_name"], "Mia");
}

#[test]
fn parse_frame_defaults_missing_data_to_null() {
    let event = RealtimeChannel::parse_frame(r#"{"event": "user_stop_typing"}"#).unwrap();
    assert!(event.data.is_null());
}

#[test]
fn parse_frame_skips_garbage_and_blank_names() {
    assert!(RealtimeChannel::parse_frame("not json").is_none());
    assert!(RealtimeChannel::parse_frame(r#"{"event": "  ", "data": {}}"#).is_none());
    assert!(RealtimeChannel::parse_frame(r#"{"data": {}}"#).is_none());
}

#[test]
fn websocket_url_follows_server_scheme() {
    let http = url::Url::parse("http://localhost:5000").unwrap();
    let cfg = RealtimeConfig::from_server_url(&http, None).unwrap();
    assert_eq!(cfg.url.as_str(), "ws://localhost:5000/realtime");

    let https = url::Url::parse("https://luna.example/app").unwrap();
    let cfg = RealtimeConfig::from_server_url(&https, None).unwrap();
    assert_eq!(cfg.url.as_str(), "wss://luna.example/app/realtime");

    let ftp = url::Url::parse("ftp://luna.example").unwrap();
    assert!(RealtimeConfig::from_server_url(&ftp, None).is_err());
}

#[test]
fn backoff_doubles_and_caps() {
    assert_eq!(RealtimeChannel::backoff_duration(1), Duration::from_secs(2));
    assert_eq!(RealtimeChannel::backoff_duration(2), Duration::from_secs(4));
    assert_eq!(RealtimeChannel::backoff_duration(4), Duration::from_secs(16));
    assert_eq!(RealtimeChannel::backoff_duration(10), MAX_BACKOFF);
}

#[test]
fn session_cookie_is_sent_on_handshake() {
    let server = url::Url::parse("http://localhost:5000").unwrap();
    let cfg = RealtimeConfig::from_server_url(&server, Some("abc123".into())).unwrap();
    let request = RealtimeChannel::build_request(&cfg).unwrap();
    assert_eq!(
        request.headers().get("cookie").unwrap().to_str().unwrap(),
        "session=abc123"
    );
}

#[tokio::test]
async fn emit_after_loop_gone_reports_closed_channel() {
    let (outbound_tx, outbound_rx) = mpsc::channel(1);
    let (shutdown_tx, _shutdown_rx) = mpsc::channel(1);
    let (_stop_tx, stop_rx) = watch::channel(None);
    drop(outbound_rx);
    let handle = RealtimeHandle {
        outbound_tx,
        shutdown_tx,
        stop_rx,
    };
    let err = handle
        .emit(EMIT_TYPING, serde_json::json!({ "typing": true }))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Realtime(_)));
}

#[tokio::test]
async fn quiet_but_healthy_server_keeps_one_connection() {
    let (server, accepted) = quiet_server(true).await;
    let (_events, handle) = RealtimeChannel::connect(fast_keepalive(&server))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(800)).await;
    assert_eq!(accepted.load(Ordering::SeqCst), 1);
    handle.shutdown().await;
}

#[tokio::test]
async fn unresponsive_server_is_dropped_and_redialed() {
    let (server, accepted) = quiet_server(false).await;
    let (_events, handle) = RealtimeChannel::connect(fast_keepalive(&server))
        .await
        .unwrap();

    // idle timeout plus the first 2 s backoff
    tokio::time::sleep(Duration::from_millis(3000)).await;
    assert!(accepted.load(Ordering::SeqCst) >= 2);
    handle.shutdown().await;
}

#[tokio::test]
async fn rejected_session_stops_loop_with_unauthorized() {
    use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
    use tokio_tungstenite::tungstenite::http::StatusCode;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let count = accepted.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            count.fetch_add(1, Ordering::SeqCst);
            let reject = |_: &Request, _: Response| -> Result<Response, ErrorResponse> {
                let mut response = ErrorResponse::new(Some("login required".into()));
                *response.status_mut() = StatusCode::UNAUTHORIZED;
                Err(response)
            };
            let _ = tokio_tungstenite::accept_hdr_async(stream, reject).await;
        }
    });
    let server = url::Url::parse(&format!("http://{addr}")).unwrap();
    let config = RealtimeConfig::from_server_url(&server, Some("expired".into())).unwrap();
    let (mut events, handle) = RealtimeChannel::connect(config).await.unwrap();

    let closed = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap();
    assert!(closed.is_none());
    assert_eq!(handle.stop_reason(), Some(StopReason::Unauthorized));
    assert_eq!(accepted.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn shutdown_is_reported_as_stop_reason() {
    let (server, _accepted) = quiet_server(true).await;
    let (mut events, handle) = RealtimeChannel::connect(fast_keepalive(&server))
        .await
        .unwrap();
    assert_eq!(handle.stop_reason(), None);

    handle.shutdown().await;
    let closed = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap();
    assert!(closed.is_none());
    assert_eq!(handle.stop_reason(), Some(StopReason::Shutdown));
}
