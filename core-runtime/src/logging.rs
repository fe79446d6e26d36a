//! # Logging & Tracing Infrastructure
//!
//! Structured logging for the SDK with the `tracing` crate:
//! - JSON, pretty and compact output formats
//! - Per-crate filtering
//! - Redaction helpers for tokens
//! - Mirroring into the host's log pipeline via `LoggerSink`
//!
//! ## Overview
//!
//! The SDK never prints. Every crate emits `tracing` events; a host that
//! wants them on stdout calls [`init_logging`], and a host with its own
//! pipeline (OSLog, Logcat) passes a `LoggerSink` so each event that
//! survives filtering is forwarded there too.
//!
//! Console output relayed from the web page is emitted under the
//! [`WEBVIEW_TARGET`] target, so it can be filtered independently of the
//! SDK's own events.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//! use bridge_traits::logging::{ConsoleLogger, LogLevel};
//! use std::sync::Arc;
//!
//! let config = LoggingConfig::default()
//!     .with_format(LogFormat::Pretty)
//!     .with_level(LogLevel::Debug)
//!     .with_logger_sink(Arc::new(ConsoleLogger::default()));
//!
//! init_logging(config)?;
//! tracing::info!("Chat SDK ready");
//! ```

use crate::error::{Error, Result};

use bridge_traits::logging::{LogEntry, LogLevel, LoggerSink};
use core_async::runtime;

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    filter::EnvFilter,
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
    Layer,
};

/// Target used for console messages relayed from the web page.
pub const WEBVIEW_TARGET: &str = "chatwoot::webview";

/// Crates whose events pass the default filter at the configured level.
const SDK_TARGETS: &[&str] = &[
    "chatwoot",
    "chatwoot_sdk",
    "core_runtime",
    "core_profile",
    "core_protocol",
    "core_surface",
    "core_service",
    "bridge_desktop",
];

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format with colors
    Pretty,
    /// Structured JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Compact;
    }
}

/// Logging configuration
#[derive(Clone)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// Minimum log level
    pub level: LogLevel,
    /// Custom filter string (e.g., "core_surface=debug,chatwoot::webview=warn")
    pub filter: Option<String>,
    /// Optional logger sink for forwarding logs to host
    pub logger_sink: Option<Arc<dyn LoggerSink>>,
    /// Display target module in logs
    pub display_target: bool,
    /// Display thread info
    pub display_thread_info: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
            filter: None,
            logger_sink: None,
            display_target: true,
            display_thread_info: false,
        }
    }
}

impl fmt::Debug for LoggingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingConfig")
            .field("format", &self.format)
            .field("level", &self.level)
            .field("filter", &self.filter)
            .field(
                "logger_sink",
                &self.logger_sink.as_ref().map(|_| "LoggerSink { ... }"),
            )
            .field("display_target", &self.display_target)
            .field("display_thread_info", &self.display_thread_info)
            .finish()
    }
}

impl LoggingConfig {
    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set minimum log level
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set custom filter string
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set logger sink for host integration
    pub fn with_logger_sink(mut self, sink: Arc<dyn LoggerSink>) -> Self {
        self.logger_sink = Some(sink);
        self
    }

    /// Enable or disable target display
    pub fn with_target(mut self, display: bool) -> Self {
        self.display_target = display;
        self
    }

    /// Enable or disable thread info
    pub fn with_thread_info(mut self, display: bool) -> Self {
        self.display_thread_info = display;
        self
    }
}

/// Initialize the logging system
///
/// Call once during host start-up. Subsequent calls return an error because
/// a global subscriber is already installed.
///
/// # Errors
///
/// Returns [`Error::Config`] if the filter string is invalid or logging is
/// already initialized.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;
    let sink_layer = LoggerSinkLayer::new(config.logger_sink.clone());
    let registry = tracing_subscriber::registry().with(filter).with(sink_layer);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(config.display_target)
                    .with_thread_ids(config.display_thread_info)
                    .with_thread_names(config.display_thread_info)
                    .with_writer(io::stdout),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_target(config.display_target)
                    .with_thread_ids(config.display_thread_info)
                    .with_thread_names(config.display_thread_info)
                    .with_writer(io::stdout),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(config.display_target)
                    .with_thread_ids(config.display_thread_info)
                    .with_thread_names(config.display_thread_info)
                    .with_writer(io::stdout),
            )
            .try_init(),
    };

    result.map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let filter_string = match &config.filter {
        Some(custom_filter) => custom_filter.clone(),
        None => {
            // SDK crates at the configured level, dependencies at warn
            let base_level = level_directive(config.level);
            let mut directives: Vec<String> = SDK_TARGETS
                .iter()
                .map(|target| format!("{}={}", target, base_level))
                .collect();
            directives.extend(
                ["h2=warn", "hyper=warn", "hyper_util=warn", "reqwest=warn"]
                    .iter()
                    .map(|d| d.to_string()),
            );
            directives.join(",")
        }
    };

    EnvFilter::try_new(filter_string)
        .map_err(|e| Error::Config(format!("Invalid log filter: {}", e)))
}

/// Layer that forwards events to a `LoggerSink` implementation.
struct LoggerSinkLayer {
    sink: Option<Arc<dyn LoggerSink>>,
}

impl LoggerSinkLayer {
    fn new(sink: Option<Arc<dyn LoggerSink>>) -> Self {
        Self { sink }
    }
}

impl<S> Layer<S> for LoggerSinkLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };

        let metadata = event.metadata();
        let level = tracing_level_to_log_level(*metadata.level());

        if level < sink.min_level() {
            return;
        }

        let mut visitor = SinkVisitor::default();
        event.record(&mut visitor);

        let message = visitor
            .message
            .unwrap_or_else(|| metadata.name().to_string());

        let mut entry = LogEntry::new(level, metadata.target(), message);

        for (key, value) in visitor.fields {
            let value = redact_if_sensitive(&key, &value);
            entry = entry.with_field(key, value);
        }

        if let Some(span) = ctx.lookup_current() {
            entry.span_id = Some(span.name().to_string());
        }

        let sink = Arc::clone(sink);

        if let Some(handle) = runtime::current() {
            handle.spawn(async move {
                if let Err(err) = sink.log(entry).await {
                    eprintln!("LoggerSink error: {}", err);
                }
            });
            return;
        }

        if let Err(err) = runtime::block_on(async move { sink.log(entry).await }) {
            eprintln!("LoggerSink error: {}", err);
        }
    }
}

#[derive(Default)]
struct SinkVisitor {
    message: Option<String>,
    fields: HashMap<String, String>,
}

impl SinkVisitor {
    fn record_value(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for SinkVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record_value(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.record_value(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, format!("{:?}", value));
    }
}

fn tracing_level_to_log_level(level: tracing::Level) -> LogLevel {
    match level {
        tracing::Level::TRACE => LogLevel::Trace,
        tracing::Level::DEBUG => LogLevel::Debug,
        tracing::Level::INFO => LogLevel::Info,
        tracing::Level::WARN => LogLevel::Warn,
        tracing::Level::ERROR => LogLevel::Error,
    }
}

/// Redact a field value when its name marks it as a credential.
///
/// ```
/// use core_runtime::logging::redact_if_sensitive;
///
/// assert_eq!(redact_if_sensitive("pubsub_token", "abc"), "[REDACTED]");
/// assert_eq!(redact_if_sensitive("account_id", "42"), "42");
/// ```
pub fn redact_if_sensitive(field_name: &str, value: &str) -> String {
    const SENSITIVE_FIELDS: &[&str] = &[
        "token",
        "password",
        "secret",
        "api_key",
        "authorization",
        "bearer",
    ];

    let field_lower = field_name.to_lowercase();
    if SENSITIVE_FIELDS.iter().any(|&f| field_lower.contains(f)) {
        "[REDACTED]".to_string()
    } else {
        value.to_string()
    }
}

/// Keep the first and last two characters of a secret, for correlating
/// log lines without exposing the value.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 6 {
        return "*".repeat(chars.len());
    }

    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}…{}", head, tail)
}
