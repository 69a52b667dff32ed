//! Strongly-typed identifiers.
//!
//! Newtype wrappers prevent accidental mixing of triangle ordinals with
//! logical vertex ids, buffer handles or material handles.

use serde::{Deserialize, Serialize};

/// Ordinal of a triangle in a mesh's index list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TriangleId(pub u32);

/// Topological vertex identity shared by every raw vertex at the same point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LogicalVertexId(pub u32);

/// Identity of a mesh asset, used to memoize adjacency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MeshId(pub u64);

/// Identity of a rendered mesh instance (the object owning a resource set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

/// Handle of a set of GPU buffers attached for one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceSetId(pub u64);

/// Handle of a GPU buffer owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BufferId(pub u64);

/// Handle of a material that consumes bound buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

impl TriangleId {
    /// Returns the raw ordinal as `usize` for array indexing.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl LogicalVertexId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl MaterialId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for TriangleId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}

impl From<u32> for LogicalVertexId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}

impl From<u64> for MeshId {
    fn from(val: u64) -> Self {
        Self(val)
    }
}

impl From<u64> for InstanceId {
    fn from(val: u64) -> Self {
        Self(val)
    }
}

impl From<u32> for MaterialId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}
