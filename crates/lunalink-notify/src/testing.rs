//! In-memory recorders standing in for the host page in unit tests.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::alert::{AlertId, AlertMessage, AlertRenderer, AlertSurface};
use crate::dispatcher::{DispatchTargets, DispatcherConfig, NotificationDispatcher};
use crate::error::NotifyError;
use crate::permission::{PermissionGate, PermissionState};
use crate::platform::{
    AnimationSurface, ChatSurface, ElementId, HeartStyle, NotificationHandle,
    NotificationPlatform, NotificationRequest, PageHost, PartnerStatus, SoundPlayer,
};
use crate::push::{PushPlatform, Registration, Subscription, SubscriptionServer};
use crate::sound::SoundId;

use lunalink_client::api::SubscriptionKeys;

pub struct FakeNotifications {
    permission: Mutex<PermissionState>,
    answer: Mutex<Result<PermissionState, NotifyError>>,
    prompts: AtomicUsize,
    shown: Mutex<Vec<(NotificationHandle, NotificationRequest)>>,
    closed: Mutex<Vec<NotificationHandle>>,
    next_handle: AtomicU64,
}

impl FakeNotifications {
    pub fn new(state: PermissionState) -> Self {
        Self {
            permission: Mutex::new(state),
            answer: Mutex::new(Ok(state)),
            prompts: AtomicUsize::new(0),
            shown: Mutex::new(Vec::new()),
            closed: Mutex::new(Vec::new()),
            next_handle: AtomicU64::new(1),
        }
    }

    /// What the next prompt answers. A successful answer also becomes the
    /// live permission.
    pub fn answer_with(&self, answer: Result<PermissionState, NotifyError>) {
        *self.answer.lock().unwrap() = answer;
    }

    pub fn set_permission(&self, state: PermissionState) {
        *self.permission.lock().unwrap() = state;
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    pub fn shown(&self) -> Vec<NotificationRequest> {
        self.shown
            .lock()
            .unwrap()
            .iter()
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub fn closed(&self) -> Vec<NotificationHandle> {
        self.closed.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationPlatform for FakeNotifications {
    fn permission(&self) -> PermissionState {
        *self.permission.lock().unwrap()
    }

    async fn request_permission(&self) -> Result<PermissionState, NotifyError> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        let answer = self.answer.lock().unwrap().clone();
        if let Ok(state) = &answer {
            self.set_permission(*state);
        }
        answer
    }

    fn show(&self, request: &NotificationRequest) -> Result<NotificationHandle, NotifyError> {
        let handle = NotificationHandle(self.next_handle.fetch_add(1, Ordering::SeqCst));
        self.shown.lock().unwrap().push((handle, request.clone()));
        Ok(handle)
    }

    fn close(&self, handle: NotificationHandle) {
        self.closed.lock().unwrap().push(handle);
    }
}

#[derive(Default)]
pub struct FakePage {
    hidden: AtomicBool,
    focus_count: AtomicUsize,
    reload_count: AtomicUsize,
    navigations: Mutex<Vec<String>>,
}

impl FakePage {
    pub fn set_hidden(&self, hidden: bool) {
        self.hidden.store(hidden, Ordering::SeqCst);
    }

    pub fn focus_count(&self) -> usize {
        self.focus_count.load(Ordering::SeqCst)
    }

    pub fn reload_count(&self) -> usize {
        self.reload_count.load(Ordering::SeqCst)
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }
}

impl PageHost for FakePage {
    fn is_visible(&self) -> bool {
        !self.hidden.load(Ordering::SeqCst)
    }

    fn focus(&self) {
        self.focus_count.fetch_add(1, Ordering::SeqCst);
    }

    fn navigate(&self, path: &str) {
        self.navigations.lock().unwrap().push(path.to_string());
    }

    fn reload(&self) {
        self.reload_count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Records every playback attempt, including failed ones.
#[derive(Default)]
pub struct FakeSound {
    played: Mutex<Vec<SoundId>>,
    fail: AtomicBool,
}

impl FakeSound {
    pub fn fail_playback(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn played(&self) -> Vec<SoundId> {
        self.played.lock().unwrap().clone()
    }
}

impl SoundPlayer for FakeSound {
    fn play(&self, sound: SoundId, _volume: f32) -> Result<(), NotifyError> {
        self.played.lock().unwrap().push(sound);
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Platform("autoplay blocked".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeAnimation {
    next_id: AtomicU64,
    spawned: Mutex<Vec<HeartStyle>>,
    removed: Mutex<Vec<ElementId>>,
}

impl FakeAnimation {
    pub fn spawned(&self) -> Vec<HeartStyle> {
        self.spawned.lock().unwrap().clone()
    }

    pub fn removed(&self) -> Vec<ElementId> {
        self.removed.lock().unwrap().clone()
    }
}

impl AnimationSurface for FakeAnimation {
    fn spawn_heart(&self, style: &HeartStyle) -> ElementId {
        self.spawned.lock().unwrap().push(style.clone());
        ElementId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn remove(&self, id: ElementId) {
        self.removed.lock().unwrap().push(id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCall {
    ShowTyping(String),
    HideTyping,
    Status(PartnerStatus),
}

#[derive(Default)]
pub struct FakeChat {
    calls: Mutex<Vec<ChatCall>>,
}

impl FakeChat {
    pub fn calls(&self) -> Vec<ChatCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl ChatSurface for FakeChat {
    fn show_typing(&self, user_name: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(ChatCall::ShowTyping(user_name.to_string()));
    }

    fn hide_typing(&self) {
        self.calls.lock().unwrap().push(ChatCall::HideTyping);
    }

    fn set_partner_status(&self, status: &PartnerStatus) {
        self.calls.lock().unwrap().push(ChatCall::Status(status.clone()));
    }
}

#[derive(Default)]
pub struct FakeAlertSurface {
    containers: AtomicUsize,
    rendered: Mutex<Vec<(AlertId, AlertMessage)>>,
    exiting: Mutex<Vec<AlertId>>,
    removed: Mutex<Vec<AlertId>>,
}

impl FakeAlertSurface {
    pub fn container_count(&self) -> usize {
        self.containers.load(Ordering::SeqCst)
    }

    pub fn rendered(&self) -> Vec<AlertMessage> {
        self.rendered
            .lock()
            .unwrap()
            .iter()
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn exiting(&self) -> Vec<AlertId> {
        self.exiting.lock().unwrap().clone()
    }

    pub fn removed(&self) -> Vec<AlertId> {
        self.removed.lock().unwrap().clone()
    }
}

impl AlertSurface for FakeAlertSurface {
    fn create_container(&self) {
        self.containers.fetch_add(1, Ordering::SeqCst);
    }

    fn render(&self, id: AlertId, message: &AlertMessage) {
        self.rendered.lock().unwrap().push((id, message.clone()));
    }

    fn begin_exit(&self, id: AlertId) {
        self.exiting.lock().unwrap().push(id);
    }

    fn remove(&self, id: AlertId) {
        self.removed.lock().unwrap().push(id);
    }
}

/// Ordered log shared by the push platform and server fakes.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn subscription(endpoint: &str) -> Subscription {
    Subscription {
        endpoint: endpoint.to_string(),
        expiration_time: None,
        keys: SubscriptionKeys {
            p256dh: "BNc-p256dh".into(),
            auth: "auth-secret".into(),
        },
    }
}

pub struct FakePush {
    log: CallLog,
    current: Mutex<Option<Subscription>>,
    subscribe_error: Mutex<Option<NotifyError>>,
    registrations: AtomicUsize,
    last_key: Mutex<Vec<u8>>,
}

impl FakePush {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            current: Mutex::new(None),
            subscribe_error: Mutex::new(None),
            registrations: AtomicUsize::new(0),
            last_key: Mutex::new(Vec::new()),
        }
    }

    pub fn with_subscription(self, endpoint: &str) -> Self {
        *self.current.lock().unwrap() = Some(subscription(endpoint));
        self
    }

    pub fn fail_subscribe(&self, error: NotifyError) {
        *self.subscribe_error.lock().unwrap() = Some(error);
    }

    /// Simulate the platform dropping the subscription on its own.
    pub fn drop_current(&self) {
        *self.current.lock().unwrap() = None;
    }

    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }

    pub fn last_key(&self) -> Vec<u8> {
        self.last_key.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushPlatform for FakePush {
    async fn register(&self, script_url: &str) -> Result<Registration, NotifyError> {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(format!("register {script_url}"));
        Ok(Registration {
            scope: "/".into(),
            script_url: script_url.to_string(),
        })
    }

    async fn current_subscription(
        &self,
        _registration: &Registration,
    ) -> Result<Option<Subscription>, NotifyError> {
        Ok(self.current.lock().unwrap().clone())
    }

    async fn subscribe(
        &self,
        _registration: &Registration,
        application_server_key: &[u8],
    ) -> Result<Subscription, NotifyError> {
        *self.last_key.lock().unwrap() = application_server_key.to_vec();
        if let Some(error) = self.subscribe_error.lock().unwrap().clone() {
            return Err(error);
        }
        self.log.lock().unwrap().push("platform subscribe".into());
        let sub = subscription("https://push.example/sub/1");
        *self.current.lock().unwrap() = Some(sub.clone());
        Ok(sub)
    }

    async fn unsubscribe(&self, subscription: &Subscription) -> Result<(), NotifyError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("platform unsubscribe {}", subscription.endpoint));
        *self.current.lock().unwrap() = None;
        Ok(())
    }
}

pub struct FakeServer {
    log: CallLog,
    fail: AtomicBool,
}

impl FakeServer {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            fail: AtomicBool::new(false),
        }
    }

    pub fn fail_requests(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    fn record(&self, call: String) -> Result<(), NotifyError> {
        self.log.lock().unwrap().push(call);
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::TransientNetwork("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl SubscriptionServer for FakeServer {
    async fn register_subscription(&self, subscription: &Subscription) -> Result<(), NotifyError> {
        self.record(format!("server subscribe {}", subscription.endpoint))
    }

    async fn drop_subscription(&self, endpoint: &str) -> Result<(), NotifyError> {
        self.record(format!("server unsubscribe {endpoint}"))
    }
}

/// A dispatcher wired to fakes, with handles to every fake.
pub struct Harness {
    pub notifications: Arc<FakeNotifications>,
    pub page: Arc<FakePage>,
    pub sound: Arc<FakeSound>,
    pub animation: Arc<FakeAnimation>,
    pub chat: Arc<FakeChat>,
    pub alert_surface: Arc<FakeAlertSurface>,
    pub gate: Arc<PermissionGate>,
    pub alerts: AlertRenderer,
}

impl Harness {
    pub fn new(permission: PermissionState) -> Self {
        let notifications = Arc::new(FakeNotifications::new(permission));
        let alert_surface = Arc::new(FakeAlertSurface::default());
        Self {
            gate: Arc::new(PermissionGate::new(Some(notifications.clone()))),
            alerts: AlertRenderer::new(alert_surface.clone()),
            notifications,
            page: Arc::new(FakePage::default()),
            sound: Arc::new(FakeSound::default()),
            animation: Arc::new(FakeAnimation::default()),
            chat: Arc::new(FakeChat::default()),
            alert_surface,
        }
    }

    pub fn targets(&self) -> DispatchTargets {
        DispatchTargets {
            page: self.page.clone(),
            sound: self.sound.clone(),
            animation: self.animation.clone(),
            chat: self.chat.clone(),
        }
    }

    pub fn dispatcher(&self, config: DispatcherConfig) -> NotificationDispatcher {
        NotificationDispatcher::new(self.gate.clone(), self.alerts.clone(), self.targets(), config)
    }
}
