//! Shared constants: adjacency sentinel, buffer strides and the property
//! names the wire shader binds.

/// Adjacency slot value meaning "no triangle across this edge".
pub const NO_NEIGHBOR: i32 = -1;

/// Every triangle has exactly three edges: (v0,v1), (v1,v2), (v2,v0).
pub const EDGES_PER_TRIANGLE: usize = 3;

/// Bytes per triangle-index element (`uint3`).
pub const TRIANGLE_INDEX_STRIDE: usize = 3 * std::mem::size_of::<u32>();

/// Bytes per adjacency element (`int3`).
pub const ADJACENCY_STRIDE: usize = 3 * std::mem::size_of::<i32>();

/// Bytes per clip-space position in the scratch buffer (`float4`).
pub const CLIP_POSITION_STRIDE: usize = 4 * std::mem::size_of::<f32>();

/// Random-write target slot the scratch buffer is bound to each frame.
pub const DEFAULT_SCRATCH_SLOT: u32 = 1;

/// Default grid size when welding raw vertices into logical vertices.
pub const DEFAULT_WELD_TOLERANCE: f32 = 1.0e-5;

/// Material property names consumed by the wire shader.
pub mod bindings {
    pub const TRIANGLE_INDICES: &str = "triIdxBuffer";
    pub const ADJACENCY: &str = "triAdjBuffer";
    /// Read side of the scratch buffer (fragment stage).
    pub const SCRATCH_READ: &str = "vertsPosBuffer";
    /// Write side of the scratch buffer (vertex stage).
    pub const SCRATCH_WRITE: &str = "vertsPosRWBuffer";
    pub const TRIANGLE_COUNT: &str = "triCount";
}

/// Raw per-vertex edge policy values carried in the second UV component.
pub mod edge_policy {
    /// Exporter-generated filler edge, never drawn.
    pub const FILLER: i32 = -1;
    /// Never drawn.
    pub const HIDDEN: i32 = 0;
    /// Drawn when the neighbor across the edge is back-facing or missing.
    pub const OUTLINE: i32 = 1;
    /// Always drawn when the owning triangle is front-facing.
    pub const ALWAYS: i32 = 2;
}
