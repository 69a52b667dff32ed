//! Frame-batched event bus.
//!
//! Producers queue [`RenderEvent`]s through the bus or through cloned
//! [`Emitter`] handles, which may live on other threads. Nothing reaches a
//! sink until the owner calls [`EventBus::flush`], normally once per frame,
//! so sinks run on the owner's thread and never need locking of their own.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{mpsc, Arc};

use crate::events::RenderEvent;
use crate::sinks::EventSink;

#[derive(Debug, Default)]
struct Shared {
    enabled: AtomicBool,
    queued: AtomicU64,
    suppressed: AtomicU64,
}

/// Delivery counters of a bus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusStats {
    /// Events accepted into the queue.
    pub queued: u64,
    /// Events dropped because the bus was disabled.
    pub suppressed: u64,
    /// Events drained by `flush`.
    pub flushed: u64,
    /// Sink deliveries; an event skipped by a sink's filter is not counted.
    pub delivered: u64,
}

/// Cloneable producer handle for an [`EventBus`].
///
/// Follows the bus's enabled flag. Events sent after the bus is dropped are
/// discarded.
#[derive(Debug, Clone)]
pub struct Emitter {
    sender: mpsc::Sender<RenderEvent>,
    shared: Arc<Shared>,
}

impl Emitter {
    /// Queues `event`. Returns false if it was not queued.
    pub fn emit(&self, event: RenderEvent) -> bool {
        if !self.shared.enabled.load(Ordering::Relaxed) {
            self.shared.suppressed.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        if self.sender.send(event).is_err() {
            return false;
        }
        self.shared.queued.fetch_add(1, Ordering::Relaxed);
        true
    }
}

/// Owner of the queue and the sinks.
pub struct EventBus {
    emitter: Emitter,
    queue: mpsc::Receiver<RenderEvent>,
    sinks: Vec<Box<dyn EventSink>>,
    flushed: u64,
    delivered: u64,
}

impl EventBus {
    /// Creates an enabled bus with no sinks.
    pub fn new() -> Self {
        let (sender, queue) = mpsc::channel();
        let shared = Arc::new(Shared {
            enabled: AtomicBool::new(true),
            ..Shared::default()
        });
        Self {
            emitter: Emitter { sender, shared },
            queue,
            sinks: Vec::new(),
            flushed: 0,
            delivered: 0,
        }
    }

    /// Builder form of [`add_sink`](Self::add_sink).
    pub fn with_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.add_sink(sink);
        self
    }

    /// Registers a sink. Sinks see events in registration order.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Returns the number of registered sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Enables or disables queueing for the bus and every emitter.
    /// Events already queued are still flushed.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.emitter.shared.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.emitter.shared.enabled.load(Ordering::Relaxed)
    }

    /// Returns a producer handle sharing this bus's queue.
    pub fn emitter(&self) -> Emitter {
        self.emitter.clone()
    }

    /// Queues `event`. Returns false if the bus is disabled.
    pub fn emit(&self, event: RenderEvent) -> bool {
        self.emitter.emit(event)
    }

    /// Hands every queued event to each sink that accepts its kind.
    /// Returns the number of events drained.
    pub fn flush(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(event) = self.queue.try_recv() {
            drained += 1;
            for sink in self.sinks.iter_mut().filter(|s| s.accepts(&event.kind)) {
                sink.handle(&event);
                self.delivered += 1;
            }
        }
        self.flushed += drained as u64;
        drained
    }

    /// Flushes, then lets every sink finalize. Returns the number of events
    /// drained by the last flush.
    pub fn finalize(&mut self) -> usize {
        let drained = self.flush();
        for sink in &mut self.sinks {
            sink.finalize();
        }
        drained
    }

    pub fn stats(&self) -> BusStats {
        BusStats {
            queued: self.emitter.shared.queued.load(Ordering::Relaxed),
            suppressed: self.emitter.shared.suppressed.load(Ordering::Relaxed),
            flushed: self.flushed,
            delivered: self.delivered,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
