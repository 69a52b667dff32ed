//! # solidwire-mesh
//!
//! Triangle meshes with logical vertex ids, and the triangle adjacency
//! table that drives per-edge wire visibility.
//!
//! ## Key Types
//!
//! - [`TriangleMesh`] — SoA positions, flat index list, per-vertex logical
//!   ids and edge policy values.
//! - [`AdjacencyTable`] — For every triangle, the neighbor across each of
//!   its three edges, matched by logical vertex id.
//! - [`AdjacencyCache`] — Tables memoized by mesh identity.
//! - [`LogicalTopology`] — Logical edge to triangle index.
//! - Procedural generators, position welding and a CPU reference of the
//!   edge visibility rule.

pub mod adjacency;
pub mod cache;
pub mod config;
pub mod generators;
pub mod mesh;
pub mod topology;
pub mod visibility;
pub mod weld;

pub use adjacency::{AdjacencyTable, ScanStrategy};
pub use cache::{AdjacencyCache, CacheLookup};
pub use config::AdjacencyConfig;
pub use mesh::TriangleMesh;
pub use topology::LogicalTopology;
pub use visibility::{EdgePolicy, WireEdge};
