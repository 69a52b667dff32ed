//! # solidwire-telemetry
//!
//! Event bus for render telemetry. Structured events (adjacency builds,
//! buffer attach/release, scratch reissues, guarded misuse) are queued by
//! producers and delivered to pluggable sinks once per frame.

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::{BusStats, Emitter, EventBus};
pub use events::{EventKind, RenderEvent};
pub use sinks::{EventSink, SharedEvents, TracingSink, VecSink};
