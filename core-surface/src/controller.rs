//! # Chat Surface Controller
//!
//! One controller task owns everything mutable about a chat surface: its
//! lifecycle state, the header model and the connectivity flag. Host calls
//! and background completions reach it as [`Command`]s over a single
//! channel, so the state is only ever touched from one place.
//!
//! ## Lifecycle
//!
//! ```text
//! Initializing ──page_loaded──> Loaded ──> ConfiguringPage ──> Active
//!       │                          │              │              │
//!       └── close button ──────────┴──── close ───┴──────────────┴──> Closed
//! ```
//!
//! Background tasks hold only a weak sender. Once the surface is closed or
//! every [`SurfaceHandle`] is dropped, their late results are discarded.

use std::sync::Arc;

use bridge_traits::http::HttpClient;
use bridge_traits::network::NetworkMonitor;
use bridge_traits::resources::{ResourceBundle, INDEX_HTML};
use bridge_traits::webview::{WebView, WebViewSettings};
use core_async::sync::{mpsc, watch};
use core_async::time::{sleep, Duration};
use core_profile::{AvatarImage, AvatarLoader, InitialsBadge, Profile, ProfileFetcher};
use core_protocol::{
    close_request_script, initial_injection_script, log_console, retry_injection_script,
    BridgeMessage, PageConfig, BRIDGE_CHANNELS,
};
use core_runtime::config::ChatwootConfig;
use core_runtime::events::{
    CloseSource, EventBus, EventSeverity, EventStream, SurfaceEvent, SurfacePhase,
};
use core_runtime::theme::ThemeSnapshot;
use serde_json::Value;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::connectivity::{ConnectivityObserver, ConnectivityTracker};
use crate::error::{Result, SurfaceError};
use crate::header::{AvatarContent, HeaderModel};
use crate::view::SurfaceView;

/// Lifecycle state of a chat surface.
pub type SurfaceState = SurfacePhase;

/// Delay before the configuration is injected a second time.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(300);

/// Buffer size of each surface's event bus.
pub const SURFACE_EVENT_BUFFER: usize = 32;

/// When the page configuration is injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionStrategy {
    /// Inject on page load, then again after `delay` in case the page's
    /// listeners were not installed yet.
    ImmediateWithRetry { delay: Duration },
    /// Inject once, when the page posts on the `ready` channel.
    AwaitPageReady,
}

impl Default for InjectionStrategy {
    fn default() -> Self {
        InjectionStrategy::ImmediateWithRetry {
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Per-surface tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceOptions {
    /// Display pixels per point, used to size the decoded avatar.
    pub avatar_scale: f64,
    /// When the page configuration is injected.
    pub injection: InjectionStrategy,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            avatar_scale: 2.0,
            injection: InjectionStrategy::default(),
        }
    }
}

impl SurfaceOptions {
    pub fn with_avatar_scale(mut self, scale: f64) -> Self {
        self.avatar_scale = scale;
        self
    }

    pub fn with_injection(mut self, injection: InjectionStrategy) -> Self {
        self.injection = injection;
        self
    }
}

/// Host capabilities a chat surface runs on.
#[derive(Clone)]
pub struct SurfaceDependencies {
    pub http_client: Arc<dyn HttpClient>,
    pub network_monitor: Arc<dyn NetworkMonitor>,
    pub resources: Arc<dyn ResourceBundle>,
}

impl std::fmt::Debug for SurfaceDependencies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceDependencies").finish_non_exhaustive()
    }
}

/// A chat surface that has not been put on screen yet.
///
/// Created by the SDK façade and handed to a
/// [`SurfacePresenter`](crate::view::SurfacePresenter), which builds the
/// native screen and then calls [`attach`](Self::attach).
pub struct ChatSurface {
    id: String,
    config: ChatwootConfig,
    theme: ThemeSnapshot,
    conversation_id: Option<i64>,
    deps: SurfaceDependencies,
    options: SurfaceOptions,
    events: EventBus,
}

impl std::fmt::Debug for ChatSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSurface")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("conversation_id", &self.conversation_id)
            .field("options", &self.options)
            .finish()
    }
}

impl ChatSurface {
    /// The theme is captured here; later theme changes do not affect this
    /// surface.
    pub fn new(
        config: ChatwootConfig,
        theme: ThemeSnapshot,
        conversation_id: Option<i64>,
        deps: SurfaceDependencies,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            config,
            theme,
            conversation_id,
            deps,
            options: SurfaceOptions::default(),
            events: EventBus::new(SURFACE_EVENT_BUFFER),
        }
    }

    pub fn with_options(mut self, options: SurfaceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &ChatwootConfig {
        &self.config
    }

    pub fn theme(&self) -> ThemeSnapshot {
        self.theme
    }

    pub fn conversation_id(&self) -> Option<i64> {
        self.conversation_id
    }

    pub fn options(&self) -> SurfaceOptions {
        self.options
    }

    /// Web view settings the host should apply, including one message
    /// handler per bridge channel.
    pub fn webview_settings(&self) -> WebViewSettings {
        WebViewSettings::with_message_handlers(BRIDGE_CHANNELS)
    }

    /// Subscribe before attaching to observe every event from the start.
    pub fn subscribe(&self) -> EventStream {
        self.events.subscribe()
    }

    /// Start the controller for a native screen that now exists.
    ///
    /// Renders the loading header, starts the profile fetch and the
    /// connectivity subscription, and loads the bundled page into `webview`.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::NoRuntime`] when called outside an async runtime.
    pub fn attach(
        self,
        view: Arc<dyn SurfaceView>,
        webview: Arc<dyn WebView>,
    ) -> Result<SurfaceHandle> {
        let runtime = core_async::runtime::current().ok_or(SurfaceError::NoRuntime)?;

        let (commands, inbox) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SurfaceState::Initializing);

        let handle = SurfaceHandle {
            id: self.id.clone(),
            commands: commands.clone(),
            state: state_rx,
            events: self.events.clone(),
        };

        let span = info_span!("chat_surface", id = %self.id);
        let controller = Controller {
            mailbox: Mailbox(commands.downgrade()),
            header: HeaderModel::initial(&self.config, &self.theme),
            page: PageConfig::new(&self.config, self.conversation_id),
            id: self.id,
            config: self.config,
            theme: self.theme,
            deps: self.deps,
            options: self.options,
            events: self.events,
            view,
            webview,
            state: SurfaceState::Initializing,
            state_tx,
            connectivity: ConnectivityTracker::new(),
            observer: None,
            page_ready: false,
            load_generation: 0,
            dismissed: false,
        };

        runtime.spawn(controller.run(inbox).instrument(span));
        Ok(handle)
    }
}

/// Host-side handle to a running chat surface.
///
/// Every method marshals onto the controller task and returns immediately.
/// Clones share the same surface; dropping every clone tears it down.
#[derive(Clone)]
pub struct SurfaceHandle {
    id: String,
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<SurfaceState>,
    events: EventBus,
}

impl std::fmt::Debug for SurfaceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceHandle")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish()
    }
}

impl SurfaceHandle {
    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| SurfaceError::Closed(self.id.clone()))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The web view finished loading the page.
    pub fn page_loaded(&self) -> Result<()> {
        self.send(Command::PageLoaded)
    }

    /// A message arrived on one of the bridge channels.
    pub fn receive_message(&self, channel: impl Into<String>, payload: Value) -> Result<()> {
        self.send(Command::Message {
            channel: channel.into(),
            payload,
        })
    }

    /// Ask the page to close. The screen is dismissed once the page
    /// answers on the `close` channel.
    pub fn close(&self) -> Result<()> {
        self.send(Command::RequestClose)
    }

    /// The header's back button was tapped; dismisses immediately.
    pub fn close_button_tapped(&self) -> Result<()> {
        self.send(Command::CloseButtonTapped)
    }

    /// The native screen is gone; stop without dismissing.
    pub fn destroy(&self) -> Result<()> {
        self.send(Command::Destroy)
    }

    pub fn state(&self) -> SurfaceState {
        *self.state.borrow()
    }

    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    /// Wait until the surface reaches `target`.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::Closed`] if the controller stops first.
    pub async fn wait_for_state(&self, target: SurfaceState) -> Result<()> {
        let mut state = self.state.clone();
        state
            .wait_for(|current| *current == target)
            .await
            .map(|_| ())
            .map_err(|_| SurfaceError::Closed(self.id.clone()))
    }

    /// Resolves once the controller task has stopped.
    pub async fn closed(&self) {
        self.commands.closed().await;
    }

    pub fn subscribe(&self) -> EventStream {
        self.events.subscribe().for_surface(self.id.clone())
    }
}

#[derive(Debug)]
enum Command {
    PageLoaded,
    Message { channel: String, payload: Value },
    RequestClose,
    CloseButtonTapped,
    Destroy,
    ProfileLoaded { profile: Profile, fallback: bool },
    AvatarLoaded(Option<AvatarImage>),
    Connectivity(bool),
    RetryDue { generation: u64 },
    ScriptFinished { attempt: u8, success: bool },
}

/// Weak sending side used by background tasks.
#[derive(Clone)]
struct Mailbox(mpsc::WeakUnboundedSender<Command>);

impl Mailbox {
    fn post(&self, command: Command) {
        if let Some(sender) = self.0.upgrade() {
            if sender.send(command).is_err() {
                debug!("Surface stopped, dropping late result");
            }
        }
    }
}

struct Controller {
    id: String,
    config: ChatwootConfig,
    theme: ThemeSnapshot,
    page: PageConfig,
    deps: SurfaceDependencies,
    options: SurfaceOptions,
    events: EventBus,
    view: Arc<dyn SurfaceView>,
    webview: Arc<dyn WebView>,
    mailbox: Mailbox,
    state: SurfaceState,
    state_tx: watch::Sender<SurfaceState>,
    header: HeaderModel,
    connectivity: ConnectivityTracker,
    observer: Option<ConnectivityObserver>,
    /// A `ready` message arrived that no page load has consumed yet.
    page_ready: bool,
    /// Bumped on every page load; retries from an earlier load are stale.
    load_generation: u64,
    dismissed: bool,
}

impl Controller {
    async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<Command>) {
        self.start();

        while let Some(command) = inbox.recv().await {
            self.handle(command);
            if self.state == SurfaceState::Closed {
                break;
            }
        }

        self.teardown();
    }

    fn start(&mut self) {
        info!(page = %self.page, "Chat surface attached");
        self.view.render_header(&self.header);

        let fetcher = ProfileFetcher::new(Arc::clone(&self.deps.http_client));
        let base_url = self.config.api_host.clone();
        let token = self.config.access_token.clone();
        let mailbox = self.mailbox.clone();
        core_async::spawn(
            async move {
                let command = match fetcher.fetch(&base_url, &token).await {
                    Ok(profile) => Command::ProfileLoaded {
                        profile,
                        fallback: false,
                    },
                    Err(error) => {
                        warn!(error = %error, "Profile fetch failed, using fallback");
                        Command::ProfileLoaded {
                            profile: Profile::fallback(),
                            fallback: true,
                        }
                    }
                };
                mailbox.post(command);
            }
            .in_current_span(),
        );

        let mailbox = self.mailbox.clone();
        self.observer = Some(ConnectivityObserver::start(
            Arc::clone(&self.deps.network_monitor),
            move |connected| mailbox.post(Command::Connectivity(connected)),
        ));

        let resources = Arc::clone(&self.deps.resources);
        let webview = Arc::clone(&self.webview);
        core_async::spawn(
            async move {
                let html = match resources.read_to_string(INDEX_HTML).await {
                    Ok(html) => html,
                    Err(error) => {
                        error!(error = %error, "Could not load {} from the SDK bundle", INDEX_HTML);
                        return;
                    }
                };
                let base_url = match resources.base_url() {
                    Ok(url) => Some(url),
                    Err(error) => {
                        warn!(error = %error, "Bundle has no base URL, relative assets will not resolve");
                        None
                    }
                };
                if let Err(error) = webview.load_html(html, base_url).await {
                    error!(error = %error, "Web view refused the page");
                }
            }
            .in_current_span(),
        );
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::PageLoaded => self.on_page_loaded(),
            Command::Message { channel, payload } => self.on_message(&channel, &payload),
            Command::RequestClose => self.on_close_requested(),
            Command::CloseButtonTapped => {
                self.emit(SurfaceEvent::CloseRequested {
                    surface_id: self.id.clone(),
                    source: CloseSource::HeaderButton,
                });
                self.finish();
            }
            Command::Destroy => {
                debug!("Surface destroyed by host");
                self.transition(SurfaceState::Closed);
            }
            Command::ProfileLoaded { profile, fallback } => self.on_profile(profile, fallback),
            Command::AvatarLoaded(image) => self.on_avatar(image),
            Command::Connectivity(connected) => self.on_connectivity(connected),
            Command::RetryDue { generation } => {
                if generation != self.load_generation {
                    debug!(generation, "Retry from an earlier page load dropped");
                } else if self.state == SurfaceState::ConfiguringPage {
                    self.inject(2, retry_injection_script(&self.page), true);
                    self.transition(SurfaceState::Active);
                }
            }
            Command::ScriptFinished { attempt, success } => {
                self.emit(SurfaceEvent::ConfigurationInjected {
                    surface_id: self.id.clone(),
                    attempt,
                    success,
                });
            }
        }
    }

    fn on_page_loaded(&mut self) {
        match self.state {
            SurfaceState::Closed => return,
            SurfaceState::Initializing => {}
            _ => debug!("Page finished loading again, configuring from scratch"),
        }

        let ready = std::mem::take(&mut self.page_ready);
        self.load_generation += 1;
        self.transition(SurfaceState::Loaded);

        match self.options.injection {
            InjectionStrategy::ImmediateWithRetry { delay } => {
                self.transition(SurfaceState::ConfiguringPage);
                self.inject(1, initial_injection_script(&self.page), false);

                let mailbox = self.mailbox.clone();
                let generation = self.load_generation;
                core_async::spawn(async move {
                    sleep(delay).await;
                    mailbox.post(Command::RetryDue { generation });
                });
            }
            InjectionStrategy::AwaitPageReady => {
                if ready {
                    self.configure_once();
                }
            }
        }
    }

    fn configure_once(&mut self) {
        self.transition(SurfaceState::ConfiguringPage);
        self.inject(1, retry_injection_script(&self.page), true);
        self.transition(SurfaceState::Active);
    }

    fn on_message(&mut self, channel: &str, payload: &Value) {
        let message = match BridgeMessage::decode(channel, payload) {
            Ok(message) => message,
            Err(error) => {
                warn!(error = %error, "Ignoring malformed bridge message");
                return;
            }
        };

        match message {
            BridgeMessage::ConsoleLog { level, text } => log_console(level, &text),
            BridgeMessage::CloseRequested => match self.state {
                SurfaceState::Initializing => {
                    info!("Close message received before the page loaded, ignoring");
                }
                SurfaceState::Closed => debug!("Duplicate close message ignored"),
                _ => {
                    self.emit(SurfaceEvent::CloseRequested {
                        surface_id: self.id.clone(),
                        source: CloseSource::Page,
                    });
                    self.finish();
                }
            },
            BridgeMessage::PageReady => match self.state {
                SurfaceState::Initializing => self.page_ready = true,
                SurfaceState::Loaded
                    if self.options.injection == InjectionStrategy::AwaitPageReady =>
                {
                    self.configure_once();
                }
                _ => debug!(state = %self.state, "Page ready signal needs no action"),
            },
            BridgeMessage::Unrecognized { channel } => {
                warn!(channel = %channel, "Received message on unknown bridge channel");
            }
        }
    }

    fn on_close_requested(&mut self) {
        if self.state == SurfaceState::Closed {
            return;
        }

        self.emit(SurfaceEvent::CloseRequested {
            surface_id: self.id.clone(),
            source: CloseSource::Host,
        });

        let webview = Arc::clone(&self.webview);
        core_async::spawn(
            async move {
                match webview.evaluate_script(close_request_script()).await {
                    Ok(_) => debug!("Close request delivered to page"),
                    Err(error) => error!(error = %error, "Failed to deliver close request"),
                }
            }
            .in_current_span(),
        );
    }

    fn on_profile(&mut self, profile: Profile, fallback: bool) {
        if !self.header.is_loading() {
            return;
        }

        self.header.apply_profile(&profile, &self.theme);
        self.view.render_header(&self.header);
        self.emit(SurfaceEvent::ProfileLoaded {
            surface_id: self.id.clone(),
            name: profile.name.clone(),
            has_avatar: profile.avatar_url.is_some(),
            fallback,
        });

        if let Some(url) = profile.avatar_url {
            let loader = AvatarLoader::new(
                Arc::clone(&self.deps.http_client),
                self.options.avatar_scale,
            );
            let mailbox = self.mailbox.clone();
            core_async::spawn(
                async move {
                    let image = match loader.load(&url).await {
                        Ok(image) => Some(image),
                        Err(error) => {
                            debug!(error = %error, "Avatar unavailable, showing initials");
                            None
                        }
                    };
                    mailbox.post(Command::AvatarLoaded(image));
                }
                .in_current_span(),
            );
        }
    }

    fn on_avatar(&mut self, image: Option<AvatarImage>) {
        if self.header.avatar != AvatarContent::Downloading {
            return;
        }

        self.header.avatar = match image {
            Some(image) => AvatarContent::Image(image),
            None => AvatarContent::Initials(InitialsBadge::for_name(&self.header.title)),
        };
        self.view.render_header(&self.header);
    }

    fn on_connectivity(&mut self, connected: bool) {
        let Some(connected) = self.connectivity.update(connected) else {
            return;
        };

        self.header.apply_connectivity(connected, &self.config);
        self.view.render_header(&self.header);
        self.emit(SurfaceEvent::ConnectivityChanged {
            surface_id: self.id.clone(),
            connected,
        });
    }

    /// Evaluate an injection script without waiting for it.
    fn inject(&self, attempt: u8, script: core_protocol::Result<String>, reports_outcome: bool) {
        let script = match script {
            Ok(script) => script,
            Err(error) => {
                error!(error = %error, attempt, "Could not build configuration script");
                self.mailbox.post(Command::ScriptFinished {
                    attempt,
                    success: false,
                });
                return;
            }
        };

        let webview = Arc::clone(&self.webview);
        let mailbox = self.mailbox.clone();
        core_async::spawn(
            async move {
                let success = match webview.evaluate_script(script).await {
                    Ok(value) if reports_outcome => value == Some(Value::Bool(true)),
                    Ok(_) => true,
                    Err(error) => {
                        error!(error = %error, attempt, "Configuration script failed");
                        false
                    }
                };
                mailbox.post(Command::ScriptFinished { attempt, success });
            }
            .in_current_span(),
        );
    }

    /// Close and dismiss, at most once.
    fn finish(&mut self) {
        if self.dismissed {
            return;
        }
        self.dismissed = true;

        self.transition(SurfaceState::Closed);
        self.stop_observer();
        self.view.dismiss(true);
        self.emit(SurfaceEvent::Dismissed {
            surface_id: self.id.clone(),
        });
    }

    fn transition(&mut self, to: SurfaceState) {
        if self.state == to {
            return;
        }

        let from = self.state;
        self.state = to;
        self.state_tx.send_replace(to);
        self.emit(SurfaceEvent::StateChanged {
            surface_id: self.id.clone(),
            from,
            to,
        });
    }

    fn emit(&self, event: SurfaceEvent) {
        match event.severity() {
            EventSeverity::Debug => debug!("{}", event.description()),
            EventSeverity::Info => info!("{}", event.description()),
            EventSeverity::Warning => warn!("{}", event.description()),
            EventSeverity::Error => error!("{}", event.description()),
        }
        // No subscribers is fine
        let _ = self.events.emit(event);
    }

    fn stop_observer(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.stop();
        }
    }

    fn teardown(&mut self) {
        self.stop_observer();
        if self.state != SurfaceState::Closed {
            self.transition(SurfaceState::Closed);
        }
        debug!("Chat surface controller stopped");
    }
}
