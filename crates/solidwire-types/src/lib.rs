//! # solidwire-types
//!
//! Shared identifiers, error types, and constants for the SolidWire
//! outline renderer.
//!
//! This crate has zero domain logic — it defines the vocabulary
//! that all other SolidWire crates share.

pub mod constants;
pub mod error;
pub mod ids;

pub use error::{SolidWireError, SolidWireResult};
pub use ids::{
    BufferId, InstanceId, LogicalVertexId, MaterialId, MeshId, ResourceSetId, TriangleId,
};
