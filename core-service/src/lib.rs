//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (HTTP, network
//! monitoring, the bundled web widget) into chat surfaces. Desktop hosts
//! typically enable the `desktop-shims` feature (which depends on
//! `bridge-desktop`); mobile hosts pass their own adapters.
//!
//! Two ways in:
//!
//! - [`ChatwootSdk`]: an explicit instance holding the configuration and
//!   dependencies, passed to whatever needs to open a chat.
//! - [`setup`] plus the free functions ([`create_chat_surface`],
//!   [`present_chat`], ...): a process-wide instance for hosts that prefer
//!   a global entry point.
//!
//! ```ignore
//! use core_service::{ChatwootSdk, SdkDependencies};
//!
//! let sdk = ChatwootSdk::new(config, SdkDependencies::desktop("./widget")?);
//! sdk.set_theme_color_hex("#1F93FF");
//! sdk.present_chat(&presenter, Some(42), true, None);
//! ```

pub mod error;

pub use error::{CoreError, Result};

use std::sync::{Arc, PoisonError, RwLock};

use bridge_traits::{http::HttpClient, network::NetworkMonitor, resources::ResourceBundle};
pub use core_surface::{
    ChatSurface, PresentCompletion, PresentationStyle, SurfaceDependencies, SurfaceOptions,
    SurfacePresenter,
};
use tracing::{debug, info};

pub use core_protocol::BRIDGE_CHANNELS;
pub use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
pub use core_runtime::config::{ChatwootConfig, ChatwootConfigBuilder, ImageAsset};
pub use core_runtime::theme::{Color, ThemeSnapshot, ThemeStore};
pub use core_surface::{
    AvatarContent, HeaderModel, InjectionStrategy, SurfaceError, SurfaceHandle, SurfaceState,
    SurfaceView,
};

/// Aggregated handle to all bridge dependencies the SDK requires.
#[derive(Clone)]
pub struct SdkDependencies {
    pub http_client: Arc<dyn HttpClient>,
    pub network_monitor: Arc<dyn NetworkMonitor>,
    pub resources: Arc<dyn ResourceBundle>,
}

impl SdkDependencies {
    /// Construct a dependency bundle from explicit bridge handles.
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        network_monitor: Arc<dyn NetworkMonitor>,
        resources: Arc<dyn ResourceBundle>,
    ) -> Self {
        Self {
            http_client,
            network_monitor,
            resources,
        }
    }

    /// Desktop adapters: reqwest, a TCP reachability probe, and the widget
    /// served from `resource_dir`.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built or `resource_dir` is not a
    /// directory.
    #[cfg(feature = "desktop-shims")]
    pub fn desktop(resource_dir: impl AsRef<std::path::Path>) -> Result<Self> {
        use bridge_desktop::{DirectoryBundle, ProbeNetworkMonitor, ReqwestHttpClient};

        Ok(Self {
            http_client: Arc::new(ReqwestHttpClient::new()?),
            network_monitor: Arc::new(ProbeNetworkMonitor::new()),
            resources: Arc::new(DirectoryBundle::new(resource_dir)?),
        })
    }
}

impl std::fmt::Debug for SdkDependencies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkDependencies").finish_non_exhaustive()
    }
}

impl From<SdkDependencies> for SurfaceDependencies {
    fn from(deps: SdkDependencies) -> Self {
        Self {
            http_client: deps.http_client,
            network_monitor: deps.network_monitor,
            resources: deps.resources,
        }
    }
}

#[derive(Clone)]
enum ThemeSource {
    Global,
    Owned(Arc<ThemeStore>),
}

impl ThemeSource {
    fn store(&self) -> &ThemeStore {
        match self {
            ThemeSource::Global => ThemeStore::global(),
            ThemeSource::Owned(store) => store.as_ref(),
        }
    }
}

struct SdkInner {
    config: ChatwootConfig,
    deps: SdkDependencies,
    theme: ThemeSource,
    options: SurfaceOptions,
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct ChatwootSdk {
    inner: Arc<SdkInner>,
}

impl std::fmt::Debug for ChatwootSdk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatwootSdk")
            .field("config", &self.inner.config)
            .field("options", &self.inner.options)
            .finish()
    }
}

impl ChatwootSdk {
    /// Create an SDK instance. Theme calls go to the process-wide
    /// [`ThemeStore`].
    pub fn new(config: ChatwootConfig, deps: SdkDependencies) -> Self {
        Self::build(config, deps, ThemeSource::Global, SurfaceOptions::default())
    }

    fn build(
        config: ChatwootConfig,
        deps: SdkDependencies,
        theme: ThemeSource,
        options: SurfaceOptions,
    ) -> Self {
        Self {
            inner: Arc::new(SdkInner {
                config,
                deps,
                theme,
                options,
            }),
        }
    }

    /// Use a private theme store instead of the process-wide one.
    pub fn with_theme_store(self, store: Arc<ThemeStore>) -> Self {
        let inner = &self.inner;
        Self::build(
            inner.config.clone(),
            inner.deps.clone(),
            ThemeSource::Owned(store),
            inner.options,
        )
    }

    /// Options applied to every surface this instance creates.
    pub fn with_surface_options(self, options: SurfaceOptions) -> Self {
        let inner = &self.inner;
        Self::build(
            inner.config.clone(),
            inner.deps.clone(),
            inner.theme.clone(),
            options,
        )
    }

    pub fn config(&self) -> &ChatwootConfig {
        &self.inner.config
    }

    pub fn dependencies(&self) -> &SdkDependencies {
        &self.inner.deps
    }

    pub fn theme_store(&self) -> &ThemeStore {
        self.inner.theme.store()
    }

    /// A new chat surface, themed with the colors current at this moment.
    pub fn create_chat_surface(&self, conversation_id: Option<i64>) -> ChatSurface {
        let theme = self.theme_store().snapshot();
        debug!(?conversation_id, "Creating chat surface");

        ChatSurface::new(
            self.inner.config.clone(),
            theme,
            conversation_id,
            self.inner.deps.clone().into(),
        )
        .with_options(self.inner.options)
    }

    /// Present a chat surface modally, full screen.
    pub fn present_chat(
        &self,
        presenter: &dyn SurfacePresenter,
        conversation_id: Option<i64>,
        animated: bool,
        completion: Option<PresentCompletion>,
    ) {
        let surface = self.create_chat_surface(conversation_id);
        presenter.present(surface, PresentationStyle::FullScreen, animated, completion);
    }

    /// Push a chat surface onto the host's navigation stack.
    pub fn push_chat(
        &self,
        presenter: &dyn SurfacePresenter,
        conversation_id: Option<i64>,
        animated: bool,
    ) {
        let surface = self.create_chat_surface(conversation_id);
        presenter.push(surface, animated);
    }

    pub fn set_theme_color(&self, color: Color) {
        self.theme_store().set_theme_color(color);
    }

    /// Returns `false` and keeps the current color when `hex` is invalid.
    pub fn set_theme_color_hex(&self, hex: &str) -> bool {
        self.theme_store().set_theme_color_hex(hex)
    }

    pub fn set_text_color(&self, color: Color) {
        self.theme_store().set_text_color(color);
    }

    /// Returns `false` and keeps the current color when `hex` is invalid.
    pub fn set_text_color_hex(&self, hex: &str) -> bool {
        self.theme_store().set_text_color_hex(hex)
    }

    pub fn clear_text_color(&self) {
        self.theme_store().clear_text_color();
    }

    pub fn theme_color(&self) -> Color {
        self.theme_store().current_theme_color()
    }

    pub fn text_color(&self) -> Color {
        self.theme_store().current_text_color()
    }
}

static SHARED: RwLock<Option<ChatwootSdk>> = RwLock::new(None);

/// Configure the process-wide SDK instance. Calling it again replaces the
/// previous configuration.
pub fn setup(config: ChatwootConfig, deps: SdkDependencies) {
    info!(account_id = config.account_id, api_host = %config.api_host, "SDK configured");
    let sdk = ChatwootSdk::new(config, deps);
    *SHARED.write().unwrap_or_else(PoisonError::into_inner) = Some(sdk);
}

/// The process-wide SDK instance, if [`setup`] has been called.
pub fn shared() -> Option<ChatwootSdk> {
    SHARED
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Like [`create_chat_surface`], but reports a missing [`setup`] as an error.
pub fn try_create_chat_surface(conversation_id: Option<i64>) -> Result<ChatSurface> {
    shared()
        .map(|sdk| sdk.create_chat_surface(conversation_id))
        .ok_or(CoreError::NotConfigured)
}

/// Create a chat surface from the process-wide configuration.
///
/// # Panics
///
/// Panics if [`setup`] has not been called. Opening a chat without
/// credentials is a programming error in the host.
pub fn create_chat_surface(conversation_id: Option<i64>) -> ChatSurface {
    match try_create_chat_surface(conversation_id) {
        Ok(surface) => surface,
        Err(error) => panic!("{}", error),
    }
}

/// Present a chat surface modally, full screen.
///
/// # Panics
///
/// Panics if [`setup`] has not been called.
pub fn present_chat(
    presenter: &dyn SurfacePresenter,
    conversation_id: Option<i64>,
    animated: bool,
    completion: Option<PresentCompletion>,
) {
    let surface = create_chat_surface(conversation_id);
    presenter.present(surface, PresentationStyle::FullScreen, animated, completion);
}

/// Push a chat surface onto the host's navigation stack.
///
/// # Panics
///
/// Panics if [`setup`] has not been called.
pub fn push_chat(presenter: &dyn SurfacePresenter, conversation_id: Option<i64>, animated: bool) {
    let surface = create_chat_surface(conversation_id);
    presenter.push(surface, animated);
}

pub fn set_theme_color(color: Color) {
    ThemeStore::global().set_theme_color(color);
}

pub fn set_theme_color_hex(hex: &str) -> bool {
    ThemeStore::global().set_theme_color_hex(hex)
}

pub fn set_text_color(color: Color) {
    ThemeStore::global().set_text_color(color);
}

pub fn set_text_color_hex(hex: &str) -> bool {
    ThemeStore::global().set_text_color_hex(hex)
}

pub fn clear_text_color() {
    ThemeStore::global().clear_text_color();
}

pub fn theme_color() -> Color {
    ThemeStore::global().current_theme_color()
}

pub fn text_color() -> Color {
    ThemeStore::global().current_text_color()
}
