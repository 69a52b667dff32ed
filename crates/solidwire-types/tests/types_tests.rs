//! Integration tests for solidwire-types.

use solidwire_types::constants::{
    ADJACENCY_STRIDE, CLIP_POSITION_STRIDE, NO_NEIGHBOR, TRIANGLE_INDEX_STRIDE,
};
use solidwire_types::{LogicalVertexId, MaterialId, MeshId, SolidWireError, TriangleId};

// ─── ID Tests ──────────────────────────────────────────────────

#[test]
fn triangle_id_index() {
    let id = TriangleId(7);
    assert_eq!(id.index(), 7);
}

#[test]
fn logical_vertex_id_index() {
    let id = LogicalVertexId::from(42);
    assert_eq!(id.index(), 42);
}

#[test]
fn ids_are_ordered() {
    assert!(TriangleId(1) < TriangleId(2));
    assert!(MeshId(10) > MeshId(3));
}

#[test]
fn ids_are_serializable() {
    let id = MaterialId(100);
    let json = serde_json::to_string(&id).unwrap();
    let deserialized: MaterialId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, deserialized);
}

// ─── Constant Tests ───────────────────────────────────────────

#[test]
fn strides_match_shader_layout() {
    assert_eq!(TRIANGLE_INDEX_STRIDE, 12);
    assert_eq!(ADJACENCY_STRIDE, 12);
    assert_eq!(CLIP_POSITION_STRIDE, 16);
    assert_eq!(NO_NEIGHBOR, -1);
}

// ─── Error Tests ──────────────────────────────────────────────

#[test]
fn error_display() {
    let err = SolidWireError::InvalidMesh("index count 7 is not divisible by 3".into());
    assert!(err.to_string().contains("not divisible by 3"));
}

#[test]
fn stale_scratch_display() {
    let err = SolidWireError::StaleScratchBuffer {
        set: 4,
        len: 30,
        required: 180,
    };
    let msg = err.to_string();
    assert!(msg.contains("30"));
    assert!(msg.contains("180"));
}

#[test]
fn io_error_converts() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
    let err: SolidWireError = io.into();
    assert!(matches!(err, SolidWireError::Io(_)));
}
