//! Render event types.
//!
//! Structured events emitted by the resource manager around adjacency
//! builds, buffer lifecycles and per-frame binding. Events are lightweight
//! value types that carry just enough data for monitoring and debugging.

use serde::{Deserialize, Serialize};
use solidwire_types::{InstanceId, MeshId, ResourceSetId};

/// A render event, tagged with the frame it happened in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderEvent {
    /// Frame counter of the emitting manager (0-indexed).
    pub frame: u64,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// An adjacency table was computed.
    AdjacencyBuilt {
        mesh: MeshId,
        triangles: usize,
        /// Slots left without a neighbor.
        open_slots: usize,
    },

    /// An adjacency table was served from the cache.
    AdjacencyCacheHit { mesh: MeshId },

    /// Buffers were allocated and bound for an instance.
    Attached {
        set: ResourceSetId,
        instance: InstanceId,
        mesh: MeshId,
        /// Bytes uploaded for triangle indices and adjacency.
        uploaded_bytes: usize,
        /// Scratch buffer length in vertices.
        scratch_len: usize,
    },

    /// The scratch requirement grew and every registrant got a new buffer.
    ScratchReissued {
        required: usize,
        registrants: usize,
        generation: u64,
    },

    /// A set was found bound to an outdated scratch buffer and re-bound.
    ScratchResynced { set: ResourceSetId },

    /// A set's bindings were refreshed for the frame.
    FrameRefreshed { set: ResourceSetId },

    /// A set's buffers were freed.
    Released { set: ResourceSetId },

    /// A misuse (double attach, release of an unknown set) was ignored.
    Guarded {
        operation: String,
        reason: String,
    },

    /// Custom event for extensibility.
    Custom {
        /// Arbitrary label.
        label: String,
        /// JSON-encoded payload.
        payload: String,
    },
}

impl RenderEvent {
    /// Creates a new event for the given frame.
    pub fn new(frame: u64, kind: EventKind) -> Self {
        Self { frame, kind }
    }
}
