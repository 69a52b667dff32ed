//! GPU-visible buffer descriptors and CPU-side storage.
//!
//! A [`BufferDesc`] describes a structured buffer the way the shader sees
//! it: an element count and a stride. [`ComputeBuffer`] is the CPU-side
//! backing store used by the fallback backend.

use serde::{Deserialize, Serialize};
use solidwire_types::constants::{ADJACENCY_STRIDE, CLIP_POSITION_STRIDE, TRIANGLE_INDEX_STRIDE};
use solidwire_types::{SolidWireError, SolidWireResult};

/// How the shader accesses a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BufferUsage {
    /// Uploaded once, read-only on the GPU.
    Structured,
    /// Rewritten by the GPU every frame through a random-write target.
    RandomWrite,
}

/// Shape of a structured buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferDesc {
    /// Debug label.
    pub label: String,
    /// Number of elements (not bytes).
    pub element_count: usize,
    /// Bytes per element.
    pub stride: usize,
    pub usage: BufferUsage,
}

impl BufferDesc {
    /// One `uint3` per triangle.
    pub fn triangle_indices(triangle_count: usize) -> Self {
        Self {
            label: "triangle_indices".into(),
            element_count: triangle_count,
            stride: TRIANGLE_INDEX_STRIDE,
            usage: BufferUsage::Structured,
        }
    }

    /// One `int3` per triangle.
    pub fn adjacency(triangle_count: usize) -> Self {
        Self {
            label: "adjacency".into(),
            element_count: triangle_count,
            stride: ADJACENCY_STRIDE,
            usage: BufferUsage::Structured,
        }
    }

    /// One `float4` clip position per vertex.
    pub fn scratch(vertex_count: usize) -> Self {
        Self {
            label: "clip_positions".into(),
            element_count: vertex_count,
            stride: CLIP_POSITION_STRIDE,
            usage: BufferUsage::RandomWrite,
        }
    }

    /// Total size in bytes.
    pub fn byte_len(&self) -> usize {
        self.element_count * self.stride
    }
}

/// CPU-side storage for one buffer.
///
/// In the CPU fallback this is simply a zero-initialized byte vector.
#[derive(Debug, Clone)]
pub struct ComputeBuffer {
    desc: BufferDesc,
    data: Vec<u8>,
}

impl ComputeBuffer {
    /// Creates a zero-filled buffer for `desc`.
    pub fn zeros(desc: BufferDesc) -> Self {
        let data = vec![0; desc.byte_len()];
        Self { desc, data }
    }

    pub fn desc(&self) -> &BufferDesc {
        &self.desc
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.desc.element_count
    }

    /// Returns true if the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.desc.element_count == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Copies `bytes` to the start of the buffer.
    pub fn write(&mut self, bytes: &[u8]) -> SolidWireResult<()> {
        if bytes.len() > self.data.len() {
            return Err(SolidWireError::Gpu(format!(
                "Write of {} bytes overflows buffer '{}' of {} bytes",
                bytes.len(),
                self.desc.label,
                self.data.len()
            )));
        }
        self.data[..bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Reinterprets the contents as a slice of `T`.
    ///
    /// Fails if the byte length is not a multiple of `T`'s size.
    pub fn cast<T: bytemuck::Pod>(&self) -> SolidWireResult<&[T]> {
        bytemuck::try_cast_slice(&self.data)
            .map_err(|e| SolidWireError::Gpu(format!("Cannot view '{}': {}", self.desc.label, e)))
    }
}
