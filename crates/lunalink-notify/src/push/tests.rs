use std::sync::{Arc, Mutex};

use super::*;
use crate::testing::{CallLog, FakeNotifications, FakePush, FakeServer};

// "hi" in URL-safe base64 without padding.
const SERVER_KEY: &str = "aGk";

struct Setup {
    log: CallLog,
    push: Arc<FakePush>,
    server: Arc<FakeServer>,
    notifications: Arc<FakeNotifications>,
    manager: PushSubscriptionManager,
}

fn setup(permission: PermissionState, push: impl FnOnce(CallLog) -> FakePush) -> Setup {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let push = Arc::new(push(log.clone()));
    let server = Arc::new(FakeServer::new(log.clone()));
    let notifications = Arc::new(FakeNotifications::new(permission));
    let gate = Arc::new(PermissionGate::new(Some(notifications.clone())));
    let manager = PushSubscriptionManager::new(Some(push.clone()), server.clone(), gate);
    Setup {
        log,
        push,
        server,
        notifications,
        manager,
    }
}

fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[tokio::test]
async fn registration_is_idempotent() {
    let s = setup(PermissionState::Granted, FakePush::new);
    let first = s.manager.ensure_registered().await.unwrap();
    let second = s.manager.ensure_registered().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.script_url, WORKER_SCRIPT);
    assert_eq!(s.push.registrations(), 1);
}

#[tokio::test]
async fn missing_push_capability_is_unsupported() {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let gate = Arc::new(PermissionGate::new(None));
    let manager = PushSubscriptionManager::new(None, Arc::new(FakeServer::new(log.clone())), gate);

    assert!(matches!(
        manager.ensure_registered().await,
        Err(NotifyError::Unsupported(_))
    ));
    assert_eq!(
        manager.unsubscribe().await.unwrap(),
        Unsubscribed::NoActiveSubscription
    );
    assert!(calls(&log).is_empty());
}

#[tokio::test]
async fn subscribe_reports_to_server_then_marks_subscribed() {
    let s = setup(PermissionState::Granted, FakePush::new);
    let sub = s.manager.subscribe(SERVER_KEY).await.unwrap();

    assert!(s.manager.is_subscribed());
    assert_eq!(s.push.last_key(), b"hi".to_vec());
    assert_eq!(
        calls(&s.log),
        vec![
            "register /sw.js".to_string(),
            "platform subscribe".to_string(),
            format!("server subscribe {}", sub.endpoint),
        ]
    );
}

#[tokio::test]
async fn subscribe_requires_granted_permission() {
    let s = setup(PermissionState::Default, FakePush::new);
    assert_eq!(s.manager.subscribe(SERVER_KEY).await, Err(NotifyError::Denied));
    assert!(!s.manager.is_subscribed());
    assert!(calls(&s.log).is_empty());

    s.notifications.set_permission(PermissionState::Granted);
    assert!(s.manager.subscribe(SERVER_KEY).await.is_ok());
}

#[tokio::test]
async fn platform_failure_leaves_manager_unsubscribed() {
    let s = setup(PermissionState::Granted, FakePush::new);
    s.push
        .fail_subscribe(NotifyError::Platform("push service unavailable".into()));

    let err = s.manager.subscribe(SERVER_KEY).await.unwrap_err();
    assert_eq!(err, NotifyError::Platform("push service unavailable".into()));
    assert!(!s.manager.is_subscribed());
    assert!(!calls(&s.log).iter().any(|c| c.starts_with("server")));
}

#[tokio::test]
async fn server_failure_on_subscribe_leaves_manager_unsubscribed() {
    let s = setup(PermissionState::Granted, FakePush::new);
    s.server.fail_requests();

    assert!(matches!(
        s.manager.subscribe(SERVER_KEY).await,
        Err(NotifyError::TransientNetwork(_))
    ));
    assert!(!s.manager.is_subscribed());
}

#[tokio::test]
async fn invalid_key_is_rejected_before_platform_call() {
    let s = setup(PermissionState::Granted, FakePush::new);
    assert!(matches!(
        s.manager.subscribe("not base64!").await,
        Err(NotifyError::InvalidKey(_))
    ));
    assert!(!calls(&s.log).contains(&"platform subscribe".to_string()));
}

#[tokio::test]
async fn unsubscribe_without_subscription_makes_no_server_call() {
    let s = setup(PermissionState::Granted, FakePush::new);
    assert_eq!(
        s.manager.unsubscribe().await.unwrap(),
        Unsubscribed::NoActiveSubscription
    );
    assert!(!calls(&s.log).iter().any(|c| c.starts_with("server")));
}

#[tokio::test]
async fn unsubscribe_revokes_before_telling_server() {
    let s = setup(PermissionState::Granted, |log| {
        FakePush::new(log).with_subscription("https://push.example/sub/9")
    });
    assert!(s.manager.refresh().await.unwrap());

    let outcome = s.manager.unsubscribe().await.unwrap();
    assert_eq!(
        outcome,
        Unsubscribed::Revoked {
            endpoint: "https://push.example/sub/9".into()
        }
    );
    assert!(!s.manager.is_subscribed());
    assert_eq!(
        calls(&s.log),
        vec![
            "register /sw.js".to_string(),
            "platform unsubscribe https://push.example/sub/9".to_string(),
            "server unsubscribe https://push.example/sub/9".to_string(),
        ]
    );
}

#[tokio::test]
async fn unsubscribe_clears_local_state_when_server_fails() {
    let s = setup(PermissionState::Granted, |log| {
        FakePush::new(log).with_subscription("https://push.example/sub/9")
    });
    s.manager.refresh().await.unwrap();
    s.server.fail_requests();

    assert!(s.manager.unsubscribe().await.is_err());
    assert!(!s.manager.is_subscribed());
    assert_eq!(
        s.manager.unsubscribe().await.unwrap(),
        Unsubscribed::NoActiveSubscription
    );
}

#[tokio::test]
async fn refresh_notices_platform_dropped_subscription() {
    let s = setup(PermissionState::Granted, FakePush::new);
    s.manager.subscribe(SERVER_KEY).await.unwrap();
    assert!(s.manager.is_subscribed());

    s.push.drop_current();
    assert!(!s.manager.refresh().await.unwrap());
    assert!(!s.manager.is_subscribed());
}
