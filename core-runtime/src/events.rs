//! # Event Bus System
//!
//! Lifecycle notifications for chat surfaces, delivered over
//! `tokio::sync::broadcast`.
//!
//! A host can watch a surface without implementing any view callbacks:
//! every state transition, the profile arriving, connectivity flips, the
//! page configuration landing and the final dismissal are all published
//! here as [`SurfaceEvent`]s.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, SurfaceEvent};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let bus = EventBus::new(16);
//! let mut stream = bus.subscribe();
//!
//! bus.emit(SurfaceEvent::ConnectivityChanged {
//!     surface_id: "surface-1".to_string(),
//!     connected: false,
//! })
//! .ok();
//!
//! let event = stream.recv().await.unwrap();
//! assert_eq!(event.surface_id(), "surface-1");
//! # }
//! ```
//!
//! Slow subscribers that fall more than the buffer size behind receive
//! `RecvError::Lagged` and skip the oldest events.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// Default buffer size for the event bus
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Lifecycle phase of a chat surface, as published on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfacePhase {
    Initializing,
    Loaded,
    ConfiguringPage,
    Active,
    Closed,
}

impl fmt::Display for SurfacePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SurfacePhase::Initializing => "initializing",
            SurfacePhase::Loaded => "loaded",
            SurfacePhase::ConfiguringPage => "configuring_page",
            SurfacePhase::Active => "active",
            SurfacePhase::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Where a close request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseSource {
    /// The page posted on the `close` channel.
    Page,
    /// The header close button was tapped.
    HeaderButton,
    /// The host called `close()` directly.
    Host,
}

/// Events emitted by chat surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum SurfaceEvent {
    StateChanged {
        surface_id: String,
        from: SurfacePhase,
        to: SurfacePhase,
    },
    ProfileLoaded {
        surface_id: String,
        name: String,
        has_avatar: bool,
        /// `true` when the fetch failed and the fallback profile is shown.
        fallback: bool,
    },
    ConnectivityChanged {
        surface_id: String,
        connected: bool,
    },
    ConfigurationInjected {
        surface_id: String,
        /// 1 for the initial injection, 2 for the delayed retry.
        attempt: u8,
        success: bool,
    },
    CloseRequested {
        surface_id: String,
        source: CloseSource,
    },
    Dismissed {
        surface_id: String,
    },
}

/// Severity classification for routing events into logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

impl SurfaceEvent {
    pub fn surface_id(&self) -> &str {
        match self {
            SurfaceEvent::StateChanged { surface_id, .. }
            | SurfaceEvent::ProfileLoaded { surface_id, .. }
            | SurfaceEvent::ConnectivityChanged { surface_id, .. }
            | SurfaceEvent::ConfigurationInjected { surface_id, .. }
            | SurfaceEvent::CloseRequested { surface_id, .. }
            | SurfaceEvent::Dismissed { surface_id } => surface_id,
        }
    }

    /// Human-readable one-liner for logs.
    pub fn description(&self) -> String {
        match self {
            SurfaceEvent::StateChanged { from, to, .. } => {
                format!("Surface moved from {} to {}", from, to)
            }
            SurfaceEvent::ProfileLoaded { name, fallback, .. } => {
                if *fallback {
                    format!("Profile unavailable, showing {}", name)
                } else {
                    format!("Profile loaded for {}", name)
                }
            }
            SurfaceEvent::ConnectivityChanged { connected, .. } => {
                if *connected {
                    "Network connection restored".to_string()
                } else {
                    "Network connection lost".to_string()
                }
            }
            SurfaceEvent::ConfigurationInjected {
                attempt, success, ..
            } => {
                if *success {
                    format!("Page configuration injected (attempt {})", attempt)
                } else {
                    format!("Page configuration failed (attempt {})", attempt)
                }
            }
            SurfaceEvent::CloseRequested { source, .. } => {
                format!("Close requested by {:?}", source)
            }
            SurfaceEvent::Dismissed { .. } => "Surface dismissed".to_string(),
        }
    }

    pub fn severity(&self) -> EventSeverity {
        match self {
            SurfaceEvent::StateChanged { .. } => EventSeverity::Debug,
            SurfaceEvent::ProfileLoaded { fallback: true, .. } => EventSeverity::Warning,
            SurfaceEvent::ProfileLoaded { .. } => EventSeverity::Info,
            SurfaceEvent::ConnectivityChanged {
                connected: false, ..
            } => EventSeverity::Warning,
            SurfaceEvent::ConnectivityChanged { .. } => EventSeverity::Info,
            SurfaceEvent::ConfigurationInjected { success: false, .. } => EventSeverity::Error,
            SurfaceEvent::ConfigurationInjected { .. } => EventSeverity::Debug,
            SurfaceEvent::CloseRequested { .. } | SurfaceEvent::Dismissed { .. } => {
                EventSeverity::Info
            }
        }
    }
}

/// Central broadcast channel for surface events.
///
/// Cloning the bus shares the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SurfaceEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to every current subscriber.
    ///
    /// Returns the number of subscribers that received it, or the event back
    /// when nobody is listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: SurfaceEvent,
    ) -> Result<usize, broadcast::error::SendError<SurfaceEvent>> {
        self.sender.send(event)
    }

    pub fn subscribe(&self) -> EventStream {
        EventStream {
            receiver: self.sender.subscribe(),
            surface_filter: None,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}

/// Receiving end of the bus, optionally narrowed to one surface.
pub struct EventStream {
    receiver: broadcast::Receiver<SurfaceEvent>,
    surface_filter: Option<String>,
}

impl EventStream {
    /// Only yield events for `surface_id`.
    pub fn for_surface(mut self, surface_id: impl Into<String>) -> Self {
        self.surface_filter = Some(surface_id.into());
        self
    }

    fn matches(&self, event: &SurfaceEvent) -> bool {
        self.surface_filter
            .as_deref()
            .map_or(true, |id| event.surface_id() == id)
    }

    /// Wait for the next matching event.
    pub async fn recv(&mut self) -> Result<SurfaceEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.matches(&event) {
                return Ok(event);
            }
        }
    }

    /// Take the next matching event if one is already buffered.
    pub fn try_recv(&mut self) -> Result<SurfaceEvent, TryRecvError> {
        loop {
            let event = self.receiver.try_recv()?;
            if self.matches(&event) {
                return Ok(event);
            }
        }
    }
}
