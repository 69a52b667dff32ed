//! Pluggable event sinks.
//!
//! Sinks consume events from the bus and process them
//! (collect in memory, forward to `tracing`, etc.).

use std::sync::{Arc, Mutex};

use crate::events::{EventKind, RenderEvent};

/// Trait for event consumers.
///
/// Implement this to create custom telemetry outputs.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &RenderEvent);

    /// Whether this sink wants events of `kind`. The bus skips the rest.
    fn accepts(&self, _kind: &EventKind) -> bool {
        true
    }

    /// Called at shutdown. Flush buffers, close files, etc.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Handle to the events collected by a [`VecSink`].
pub type SharedEvents = Arc<Mutex<Vec<RenderEvent>>>;

/// A sink that collects events in memory for tests and inspection.
pub struct VecSink {
    events: SharedEvents,
    filter: Option<fn(&EventKind) -> bool>,
}

impl VecSink {
    /// Creates an empty vec sink.
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            filter: None,
        }
    }

    /// Creates a sink that only collects kinds matching `filter`.
    pub fn filtered(filter: fn(&EventKind) -> bool) -> Self {
        Self {
            filter: Some(filter),
            ..Self::new()
        }
    }

    /// Returns a handle that stays readable after the sink is boxed
    /// into a bus.
    pub fn handle(&self) -> SharedEvents {
        Arc::clone(&self.events)
    }
}

impl Default for VecSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &RenderEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }

    fn accepts(&self, kind: &EventKind) -> bool {
        self.filter.map_or(true, |filter| filter(kind))
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// A sink that logs events using the `tracing` crate.
///
/// Guarded misuse and scratch re-syncs are logged at `warn`, per-frame
/// refreshes at `trace`, everything else at `info`.
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &RenderEvent) {
        match &event.kind {
            EventKind::Guarded { .. } | EventKind::ScratchResynced { .. } => {
                tracing::warn!(frame = event.frame, event = ?event.kind, "render_event");
            }
            EventKind::FrameRefreshed { .. } => {
                tracing::trace!(frame = event.frame, event = ?event.kind, "render_event");
            }
            _ => {
                tracing::info!(frame = event.frame, event = ?event.kind, "render_event");
            }
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}
