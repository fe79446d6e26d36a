//! Host Logging Abstraction
//!
//! Lets the host mirror SDK log events (including console output relayed
//! from the web page) into its own pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Structured log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Target module/component
    pub target: String,
    /// Log message
    pub message: String,
    /// Structured fields
    pub fields: HashMap<String, String>,
    /// Name of the span the event was recorded in
    pub span_id: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            timestamp: Utc::now(),
            target: target.into(),
            message: message.into(),
            fields: HashMap::new(),
            span_id: None,
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_span_id(mut self, span_id: impl Into<String>) -> Self {
        self.span_id = Some(span_id.into());
        self
    }
}

/// Logger sink trait
///
/// Forwards structured logs from the SDK to host logging pipelines:
/// - **iOS**: OSLog
/// - **Android**: Logcat
/// - **Desktop**: Console or file logs
///
/// # Security
///
/// Entries reaching a sink have already passed through the SDK's redaction of
/// token-bearing fields. Sinks must not re-attach credentials.
#[async_trait::async_trait]
pub trait LoggerSink: Send + Sync {
    /// Forward a log entry to the host logging system
    async fn log(&self, entry: LogEntry) -> Result<()>;

    /// Flush any buffered logs
    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Get the minimum log level that will be processed
    fn min_level(&self) -> LogLevel {
        LogLevel::Info
    }
}

/// Console logger implementation for testing/development
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    pub min_level: LogLevel,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
        }
    }
}

#[async_trait::async_trait]
impl LoggerSink for ConsoleLogger {
    async fn log(&self, entry: LogEntry) -> Result<()> {
        if entry.level >= self.min_level {
            let level_str = match entry.level {
                LogLevel::Trace => "TRACE",
                LogLevel::Debug => "DEBUG",
                LogLevel::Info => "INFO",
                LogLevel::Warn => "WARN",
                LogLevel::Error => "ERROR",
            };

            println!(
                "[{}] {} {}: {}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
                level_str,
                entry.target,
                entry.message
            );

            if !entry.fields.is_empty() {
                println!("  Fields: {:?}", entry.fields);
            }
        }
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }
}
