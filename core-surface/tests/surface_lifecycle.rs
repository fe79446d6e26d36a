//! End-to-end behaviour of a chat surface against fake host capabilities

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::network::{NetworkChangeStream, NetworkInfo, NetworkMonitor, PathStatus};
use bridge_traits::resources::{ResourceBundle, INDEX_HTML};
use bridge_traits::webview::{ScriptValue, WebView};
use bytes::Bytes;
use core_protocol::close_request_script;
use core_runtime::config::{ChatwootConfig, ImageAsset};
use core_runtime::events::SurfaceEvent;
use core_runtime::theme::{Color, ThemeSnapshot};
use core_surface::{
    AvatarContent, ChatSurface, HeaderModel, InjectionStrategy, SurfaceDependencies,
    SurfaceError, SurfaceHandle, SurfaceOptions, SurfaceState, SurfaceView,
};
use mockall::mock;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration, Instant};
use url::Url;

mock! {
    HttpClient {}

    #[async_trait]
    impl HttpClient for HttpClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

#[derive(Default)]
struct FakeView {
    headers: Mutex<Vec<HeaderModel>>,
    dismissals: AtomicUsize,
}

impl FakeView {
    fn last_header(&self) -> HeaderModel {
        self.headers.lock().unwrap().last().cloned().unwrap()
    }

    fn dismissals(&self) -> usize {
        self.dismissals.load(Ordering::SeqCst)
    }
}

impl SurfaceView for FakeView {
    fn render_header(&self, header: &HeaderModel) {
        self.headers.lock().unwrap().push(header.clone());
    }

    fn dismiss(&self, _animated: bool) {
        self.dismissals.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct FakeWebView {
    loaded: Mutex<Option<(String, Option<Url>)>>,
    scripts: Mutex<Vec<(Instant, String)>>,
}

impl FakeWebView {
    fn scripts(&self) -> Vec<String> {
        self.scripts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, s)| s.clone())
            .collect()
    }
}

#[async_trait]
impl WebView for FakeWebView {
    async fn load_html(&self, html: String, base_url: Option<Url>) -> BridgeResult<()> {
        *self.loaded.lock().unwrap() = Some((html, base_url));
        Ok(())
    }

    async fn evaluate_script(&self, script: String) -> BridgeResult<ScriptValue> {
        self.scripts.lock().unwrap().push((Instant::now(), script));
        Ok(Some(Value::Bool(true)))
    }
}

struct StaticBundle;

#[async_trait]
impl ResourceBundle for StaticBundle {
    async fn read(&self, name: &str) -> BridgeResult<Bytes> {
        match name {
            INDEX_HTML => Ok(Bytes::from_static(b"<html><body>widget</body></html>")),
            other => Err(BridgeError::ResourceNotFound(other.to_string())),
        }
    }

    fn base_url(&self) -> BridgeResult<Url> {
        Url::parse("file:///sdk/bundle/").map_err(|e| BridgeError::OperationFailed(e.to_string()))
    }
}

/// Network monitor whose readings are pushed by the test.
struct ChannelMonitor {
    readings: Mutex<Option<mpsc::UnboundedReceiver<PathStatus>>>,
}

struct ChannelStream(mpsc::UnboundedReceiver<PathStatus>);

#[async_trait]
impl NetworkChangeStream for ChannelStream {
    async fn next(&mut self) -> Option<NetworkInfo> {
        self.0.recv().await.map(|status| NetworkInfo {
            status,
            network_type: None,
            is_expensive: false,
            is_constrained: false,
        })
    }
}

#[async_trait]
impl NetworkMonitor for ChannelMonitor {
    async fn get_network_info(&self) -> BridgeResult<NetworkInfo> {
        Err(BridgeError::NotAvailable("push only".into()))
    }

    async fn subscribe_changes(&self) -> BridgeResult<Box<dyn NetworkChangeStream>> {
        let receiver = self
            .readings
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| BridgeError::OperationFailed("already subscribed".into()))?;
        Ok(Box::new(ChannelStream(receiver)))
    }
}

fn http_with_profile(status: u16, body: &'static str) -> MockHttpClient {
    let mut http = MockHttpClient::new();
    http.expect_execute().returning(move |request| {
        let (status, body) = if request.url.ends_with("/api/v1/profile") {
            (status, body)
        } else {
            (404, "")
        };
        Ok(HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from_static(body.as_bytes()),
        })
    });
    http
}

fn config() -> ChatwootConfig {
    ChatwootConfig::builder()
        .account_id(5)
        .api_host("https://chat.example.com")
        .access_token("access-token")
        .pubsub_token("pubsub-token")
        .websocket_url("wss://chat.example.com/cable")
        .inbox_name("Support")
        .build()
        .unwrap()
}

fn dark_theme() -> ThemeSnapshot {
    ThemeSnapshot {
        theme_color: Color::rgb(0.2, 0.2, 0.2),
        text_color: Color::WHITE,
    }
}

struct Harness {
    handle: SurfaceHandle,
    view: Arc<FakeView>,
    webview: Arc<FakeWebView>,
    network: mpsc::UnboundedSender<PathStatus>,
}

fn attach(http: MockHttpClient, conversation_id: Option<i64>, options: SurfaceOptions) -> Harness {
    let (network, readings) = mpsc::unbounded_channel();
    let deps = SurfaceDependencies {
        http_client: Arc::new(http),
        network_monitor: Arc::new(ChannelMonitor {
            readings: Mutex::new(Some(readings)),
        }),
        resources: Arc::new(StaticBundle),
    };

    let view = Arc::new(FakeView::default());
    let webview = Arc::new(FakeWebView::default());
    let handle = ChatSurface::new(config(), dark_theme(), conversation_id, deps)
        .with_options(options)
        .attach(view.clone(), webview.clone())
        .unwrap();

    Harness {
        handle,
        view,
        webview,
        network,
    }
}

fn default_harness() -> Harness {
    attach(
        http_with_profile(200, r#"{"display_name":"Jane Doe"}"#),
        None,
        SurfaceOptions::default(),
    )
}

/// Let every ready task run; the paused clock only advances once the
/// runtime is idle.
async fn settle() {
    sleep(Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn test_attach_renders_loading_header_and_loads_page() {
    let h = default_harness();
    settle().await;

    let first = h.view.headers.lock().unwrap()[0].clone();
    assert_eq!(first.title, "Loading...");
    assert_eq!(first.title_color, Color::GRAY);
    assert_eq!(first.subtitle, "Support");
    assert_eq!(first.avatar, AvatarContent::Loading);
    assert_eq!(first.connection_icon, ImageAsset::system("wifi"));

    let (html, base) = h.webview.loaded.lock().unwrap().clone().unwrap();
    assert!(html.contains("widget"));
    assert_eq!(base.unwrap().as_str(), "file:///sdk/bundle/");
    assert_eq!(h.handle.state(), SurfaceState::Initializing);
}

#[tokio::test(start_paused = true)]
async fn test_profile_replaces_loading_header() {
    let h = default_harness();
    settle().await;

    let header = h.view.last_header();
    assert_eq!(header.title, "Jane Doe");
    assert_eq!(header.title_color, Color::WHITE);
    match header.avatar {
        AvatarContent::Initials(badge) => assert_eq!(badge.initials, "JD"),
        other => panic!("unexpected avatar {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_profile_failure_shows_fallback_name() {
    let h = attach(http_with_profile(500, ""), None, SurfaceOptions::default());
    settle().await;

    assert_eq!(h.view.last_header().title, "Chat User");
}

#[tokio::test(start_paused = true)]
async fn test_undecodable_avatar_falls_back_to_initials() {
    let h = attach(
        http_with_profile(
            200,
            r#"{"name":"Agent Smith","avatar_url":"https://cdn.example.com/a.png"}"#,
        ),
        None,
        SurfaceOptions::default(),
    );
    settle().await;

    match h.view.last_header().avatar {
        AvatarContent::Initials(badge) => assert_eq!(badge.initials, "AS"),
        other => panic!("unexpected avatar {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_configuration_injected_twice_300ms_apart() {
    let h = attach(
        http_with_profile(200, "{}"),
        Some(42),
        SurfaceOptions::default(),
    );
    settle().await;

    h.handle.page_loaded().unwrap();
    settle().await;
    assert_eq!(h.handle.state(), SurfaceState::ConfiguringPage);
    assert_eq!(h.webview.scripts().len(), 1);
    assert!(h.webview.scripts()[0].contains(r#""conversationId":42"#));

    sleep(Duration::from_millis(290)).await;
    assert_eq!(h.webview.scripts().len(), 1);

    h.handle
        .wait_for_state(SurfaceState::Active)
        .await
        .unwrap();
    settle().await;

    let scripts = h.webview.scripts.lock().unwrap().clone();
    assert_eq!(scripts.len(), 2);
    assert!(scripts[1].0 - scripts[0].0 >= Duration::from_millis(300));
    assert!(scripts[1].1.contains("try {"));
}

#[tokio::test(start_paused = true)]
async fn test_await_page_ready_injects_once() {
    let h = attach(
        http_with_profile(200, "{}"),
        None,
        SurfaceOptions::default().with_injection(InjectionStrategy::AwaitPageReady),
    );

    h.handle.page_loaded().unwrap();
    settle().await;
    assert_eq!(h.handle.state(), SurfaceState::Loaded);
    assert!(h.webview.scripts().is_empty());

    h.handle.receive_message("ready", Value::Null).unwrap();
    sleep(Duration::from_secs(1)).await;

    assert_eq!(h.handle.state(), SurfaceState::Active);
    assert_eq!(h.webview.scripts().len(), 1);
    assert!(!h.webview.scripts()[0].contains("conversationId"));
}

#[tokio::test(start_paused = true)]
async fn test_early_ready_is_used_by_the_first_load_only() {
    let h = attach(
        http_with_profile(200, "{}"),
        None,
        SurfaceOptions::default().with_injection(InjectionStrategy::AwaitPageReady),
    );

    h.handle.receive_message("ready", Value::Null).unwrap();
    h.handle.page_loaded().unwrap();
    settle().await;
    assert_eq!(h.handle.state(), SurfaceState::Active);
    assert_eq!(h.webview.scripts().len(), 1);

    // The reloaded document has not announced itself yet.
    h.handle.page_loaded().unwrap();
    settle().await;
    assert_eq!(h.handle.state(), SurfaceState::Loaded);
    assert_eq!(h.webview.scripts().len(), 1);

    h.handle.receive_message("ready", Value::Null).unwrap();
    settle().await;
    assert_eq!(h.handle.state(), SurfaceState::Active);
    assert_eq!(h.webview.scripts().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_reload_restarts_the_retry_delay() {
    let h = attach(
        http_with_profile(200, "{}"),
        None,
        SurfaceOptions::default(),
    );
    settle().await;

    h.handle.page_loaded().unwrap();
    sleep(Duration::from_millis(200)).await;
    h.handle.page_loaded().unwrap();
    settle().await;
    assert_eq!(h.webview.scripts().len(), 2);

    // Past the first load's retry deadline, before the reload's.
    sleep(Duration::from_millis(150)).await;
    assert_eq!(h.webview.scripts().len(), 2);
    assert_eq!(h.handle.state(), SurfaceState::ConfiguringPage);

    h.handle
        .wait_for_state(SurfaceState::Active)
        .await
        .unwrap();
    settle().await;

    let scripts = h.webview.scripts.lock().unwrap().clone();
    assert_eq!(scripts.len(), 3);
    assert!(scripts[2].0 - scripts[1].0 >= Duration::from_millis(300));
    assert!(scripts[2].1.contains("try {"));
}

#[tokio::test(start_paused = true)]
async fn test_close_message_dismisses_exactly_once() {
    let h = default_harness();
    let mut events = h.handle.subscribe();

    h.handle.page_loaded().unwrap();
    h.handle.receive_message("close", Value::Null).unwrap();
    let _ = h.handle.receive_message("close", Value::Null);
    h.handle.closed().await;

    assert_eq!(h.view.dismissals(), 1);
    assert_eq!(h.handle.state(), SurfaceState::Closed);
    assert!(matches!(
        h.handle.receive_message("close", Value::Null),
        Err(SurfaceError::Closed(_))
    ));

    let mut dismissed = 0;
    while let Ok(event) = events.try_recv() {
        if matches!(event, SurfaceEvent::Dismissed { .. }) {
            dismissed += 1;
        }
    }
    assert_eq!(dismissed, 1);
}

#[tokio::test(start_paused = true)]
async fn test_close_before_page_load_is_ignored() {
    let h = default_harness();

    h.handle.receive_message("close", json!({})).unwrap();
    settle().await;

    assert_eq!(h.view.dismissals(), 0);
    assert_eq!(h.handle.state(), SurfaceState::Initializing);
    assert!(h.handle.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_close_button_dismisses_in_any_state() {
    let h = default_harness();

    h.handle.close_button_tapped().unwrap();
    h.handle.closed().await;

    assert_eq!(h.view.dismissals(), 1);
    assert_eq!(h.handle.state(), SurfaceState::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_host_close_asks_the_page_first() {
    let h = default_harness();
    h.handle.page_loaded().unwrap();
    sleep(Duration::from_secs(1)).await;

    h.handle.close().unwrap();
    settle().await;

    assert_eq!(h.webview.scripts().last().unwrap(), &close_request_script());
    assert_eq!(h.view.dismissals(), 0);

    h.handle.receive_message("close", Value::Null).unwrap();
    h.handle.closed().await;
    assert_eq!(h.view.dismissals(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_connectivity_changes_are_deduplicated() {
    let h = default_harness();
    let mut events = h.handle.subscribe();

    for status in [
        PathStatus::Satisfied,
        PathStatus::Unsatisfied,
        PathStatus::Unsatisfied,
        PathStatus::RequiresConnection,
        PathStatus::Satisfied,
        PathStatus::Satisfied,
    ] {
        h.network.send(status).unwrap();
    }
    settle().await;

    let mut flips = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let SurfaceEvent::ConnectivityChanged { connected, .. } = event {
            flips.push(connected);
        }
    }
    assert_eq!(flips, vec![false, true]);

    let icons: Vec<ImageAsset> = h
        .view
        .headers
        .lock()
        .unwrap()
        .iter()
        .map(|header| header.connection_icon.clone())
        .collect();
    assert!(icons.contains(&ImageAsset::system("wifi.slash")));
    assert_eq!(icons.last(), Some(&ImageAsset::system("wifi")));
}

#[tokio::test(start_paused = true)]
async fn test_console_and_unknown_messages_do_not_change_state() {
    let h = default_harness();
    h.handle.page_loaded().unwrap();
    sleep(Duration::from_secs(1)).await;

    h.handle
        .receive_message("console", json!({"type": "error", "message": "boom"}))
        .unwrap();
    h.handle
        .receive_message("console", json!("not an object"))
        .unwrap();
    h.handle.receive_message("analytics", json!({})).unwrap();
    settle().await;

    assert_eq!(h.handle.state(), SurfaceState::Active);
    assert_eq!(h.view.dismissals(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_stops_connectivity_observation() {
    let h = default_harness();
    settle().await;
    assert!(!h.network.is_closed());

    h.handle.destroy().unwrap();
    h.handle.closed().await;
    settle().await;

    assert!(h.network.is_closed());
    assert_eq!(h.view.dismissals(), 0);
    assert_eq!(h.handle.state(), SurfaceState::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_every_handle_stops_the_surface() {
    let Harness {
        handle, network, ..
    } = default_harness();
    settle().await;

    drop(handle);
    settle().await;

    assert!(network.is_closed());
}
