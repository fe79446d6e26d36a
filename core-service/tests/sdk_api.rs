//! Host-facing SDK API: instance and process-wide entry points

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::network::{NetworkChangeStream, NetworkInfo, NetworkMonitor};
use bridge_traits::resources::ResourceBundle;
use bytes::Bytes;
use core_service::{
    ChatSurface, ChatwootConfig, ChatwootSdk, Color, InjectionStrategy, PresentCompletion,
    PresentationStyle, SdkDependencies, SurfaceOptions, SurfacePresenter, ThemeStore,
};
use mockall::mock;
use url::Url;

mock! {
    HttpClient {}

    #[async_trait]
    impl HttpClient for HttpClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

struct Offline;

#[async_trait]
impl NetworkMonitor for Offline {
    async fn get_network_info(&self) -> BridgeResult<NetworkInfo> {
        Err(BridgeError::NotAvailable("offline".into()))
    }

    async fn subscribe_changes(&self) -> BridgeResult<Box<dyn NetworkChangeStream>> {
        Err(BridgeError::NotAvailable("offline".into()))
    }
}

struct EmptyBundle;

#[async_trait]
impl ResourceBundle for EmptyBundle {
    async fn read(&self, name: &str) -> BridgeResult<Bytes> {
        Err(BridgeError::ResourceNotFound(name.to_string()))
    }

    fn base_url(&self) -> BridgeResult<Url> {
        Err(BridgeError::NotAvailable("no bundle".into()))
    }
}

#[derive(Default)]
struct RecordingPresenter {
    presented: Mutex<Vec<(ChatSurface, PresentationStyle, bool)>>,
    pushed: Mutex<Vec<(ChatSurface, bool)>>,
}

impl SurfacePresenter for RecordingPresenter {
    fn present(
        &self,
        surface: ChatSurface,
        style: PresentationStyle,
        animated: bool,
        completion: Option<PresentCompletion>,
    ) {
        self.presented.lock().unwrap().push((surface, style, animated));
        if let Some(done) = completion {
            done();
        }
    }

    fn push(&self, surface: ChatSurface, animated: bool) {
        self.pushed.lock().unwrap().push((surface, animated));
    }
}

fn deps() -> SdkDependencies {
    SdkDependencies::new(
        Arc::new(MockHttpClient::new()),
        Arc::new(Offline),
        Arc::new(EmptyBundle),
    )
}

fn config(account_id: i64) -> ChatwootConfig {
    ChatwootConfig::new(
        account_id,
        "https://chat.example.com",
        "access",
        "pubsub",
        "wss://chat.example.com/cable",
    )
}

fn isolated_sdk() -> ChatwootSdk {
    ChatwootSdk::new(config(1), deps()).with_theme_store(Arc::new(ThemeStore::new()))
}

#[test]
fn test_surface_carries_config_and_conversation() {
    let sdk = isolated_sdk();
    let surface = sdk.create_chat_surface(Some(77));

    assert_eq!(surface.config().account_id, 1);
    assert_eq!(surface.conversation_id(), Some(77));
    assert_eq!(
        surface.webview_settings().message_handlers,
        vec!["console", "close", "ready"]
    );
}

#[test]
fn test_theme_is_captured_at_creation() {
    let sdk = isolated_sdk();
    assert!(sdk.set_theme_color_hex("#000000"));
    let dark = sdk.create_chat_surface(None);

    sdk.set_theme_color(Color::WHITE);
    let light = sdk.create_chat_surface(None);

    assert_eq!(dark.theme().theme_color, Color::BLACK);
    assert_eq!(dark.theme().text_color, Color::WHITE);
    assert_eq!(light.theme().text_color, Color::BLACK);
}

#[test]
fn test_invalid_hex_keeps_previous_colors() {
    let sdk = isolated_sdk();
    assert!(sdk.set_theme_color_hex("1F93FF"));
    assert!(!sdk.set_theme_color_hex("#12345"));
    assert!(!sdk.set_text_color_hex("zzz"));

    assert_eq!(sdk.theme_color().to_hex(), Color::from_hex("1F93FF").unwrap().to_hex());

    assert!(sdk.set_text_color_hex("#FF0000"));
    assert_eq!(sdk.text_color(), Color::from_hex("F00").unwrap());
    sdk.clear_text_color();
    assert_eq!(sdk.text_color(), sdk.theme_color().contrasting_text());
}

#[test]
fn test_present_is_full_screen_and_completes() {
    let sdk = isolated_sdk();
    let presenter = RecordingPresenter::default();
    let completed = Arc::new(AtomicBool::new(false));
    let flag = completed.clone();

    sdk.present_chat(
        &presenter,
        Some(5),
        true,
        Some(Box::new(move || flag.store(true, Ordering::SeqCst))),
    );

    let presented = presenter.presented.lock().unwrap();
    assert_eq!(presented.len(), 1);
    assert_eq!(presented[0].0.conversation_id(), Some(5));
    assert_eq!(presented[0].1, PresentationStyle::FullScreen);
    assert!(presented[0].2);
    assert!(completed.load(Ordering::SeqCst));
}

#[test]
fn test_push_uses_navigation_stack() {
    let sdk = isolated_sdk().with_surface_options(
        SurfaceOptions::default().with_injection(InjectionStrategy::AwaitPageReady),
    );
    let presenter = RecordingPresenter::default();

    sdk.push_chat(&presenter, None, false);

    let pushed = presenter.pushed.lock().unwrap();
    assert_eq!(pushed.len(), 1);
    assert_eq!(pushed[0].0.conversation_id(), None);
    assert_eq!(
        pushed[0].0.options().injection,
        InjectionStrategy::AwaitPageReady
    );
    assert!(!pushed[0].1);
    assert!(presenter.presented.lock().unwrap().is_empty());
}

#[test]
fn test_setup_last_write_wins() {
    core_service::setup(config(10), deps());
    core_service::setup(config(20), deps());

    let surface = core_service::try_create_chat_surface(None).unwrap();
    assert_eq!(surface.config().account_id, 20);

    let presenter = RecordingPresenter::default();
    core_service::present_chat(&presenter, Some(3), false, None);
    core_service::push_chat(&presenter, None, true);

    assert_eq!(presenter.presented.lock().unwrap()[0].0.config().account_id, 20);
    assert_eq!(presenter.pushed.lock().unwrap().len(), 1);
}

#[test]
fn test_global_theme_functions() {
    // Only this test touches the process-wide theme.
    core_service::set_theme_color(Color::rgb(0.5, 0.5, 0.5));
    assert_eq!(core_service::text_color(), Color::WHITE);

    core_service::set_text_color(Color::BLUE);
    assert_eq!(core_service::text_color(), Color::BLUE);

    core_service::clear_text_color();
    assert!(!core_service::set_theme_color_hex("not-a-color"));
    assert_eq!(core_service::theme_color(), Color::rgb(0.5, 0.5, 0.5));
    assert!(core_service::set_text_color_hex("#000"));
    assert_eq!(core_service::text_color(), Color::BLACK);
}
