//! GPU backend trait and CPU fallback.
//!
//! The [`GpuBackend`] trait is the slice of a rendering API the resource
//! manager needs: structured buffer lifetime, per-material bindings and
//! random-write targets. The [`CpuFallback`] implementation keeps
//! everything in memory, serving as a reference for tests and tooling.

use std::collections::{BTreeMap, HashMap};

use solidwire_types::{BufferId, MaterialId, SolidWireError, SolidWireResult};

use crate::buffers::{BufferDesc, ComputeBuffer};

/// Trait for rendering backends.
///
/// # Implementations
/// - [`CpuFallback`] — In-memory reference (always available)
pub trait GpuBackend: Send {
    /// Initialize the backend. Called once before any allocation.
    fn init(&mut self) -> SolidWireResult<()>;

    /// Returns the backend name (e.g., "cpu_fallback").
    fn name(&self) -> &str;

    /// Allocates a zero-initialized buffer.
    fn create_buffer(&mut self, desc: &BufferDesc) -> SolidWireResult<BufferId>;

    /// Uploads `bytes` to the start of a buffer.
    fn write_buffer(&mut self, buffer: BufferId, bytes: &[u8]) -> SolidWireResult<()>;

    /// Frees a buffer. Bindings that still name it become dangling.
    fn release_buffer(&mut self, buffer: BufferId) -> SolidWireResult<()>;

    /// Element count of a live buffer.
    fn buffer_len(&self, buffer: BufferId) -> Option<usize>;

    /// Binds a buffer to a named material property.
    fn bind_buffer(
        &mut self,
        material: MaterialId,
        name: &str,
        buffer: BufferId,
    ) -> SolidWireResult<()>;

    /// Binds an integer to a named material property.
    fn bind_int(&mut self, material: MaterialId, name: &str, value: i32) -> SolidWireResult<()>;

    /// Exposes a buffer as a random-write target for the vertex stage.
    fn set_random_write_target(&mut self, slot: u32, buffer: BufferId) -> SolidWireResult<()>;

    /// Unbinds every random-write target.
    fn clear_random_write_targets(&mut self);

    /// Number of buffers currently allocated.
    fn live_buffer_count(&self) -> usize;

    /// Returns true if buffers live in GPU memory.
    fn is_gpu(&self) -> bool;
}

/// Value bound to a material property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Buffer(BufferId),
    Int(i32),
}

/// CPU fallback backend — in-memory reference implementation.
///
/// Always available, used for:
/// - Platforms without a rendering device
/// - Tests that inspect bindings and buffer contents
/// - Offline tooling (the CLI demo)
#[derive(Default)]
pub struct CpuFallback {
    initialized: bool,
    next_id: u64,
    buffers: HashMap<BufferId, ComputeBuffer>,
    bindings: HashMap<MaterialId, BTreeMap<String, Binding>>,
    random_write_targets: BTreeMap<u32, BufferId>,
    total_allocations: u64,
}

impl CpuFallback {
    /// Creates a new CPU fallback backend.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// CPU-side storage of a live buffer.
    pub fn buffer(&self, buffer: BufferId) -> Option<&ComputeBuffer> {
        self.buffers.get(&buffer)
    }

    /// Value currently bound to `name` on `material`.
    pub fn binding(&self, material: MaterialId, name: &str) -> Option<Binding> {
        self.bindings.get(&material)?.get(name).copied()
    }

    /// Buffer bound to a random-write slot.
    pub fn random_write_target(&self, slot: u32) -> Option<BufferId> {
        self.random_write_targets.get(&slot).copied()
    }

    /// Buffers allocated over the backend's lifetime.
    pub fn total_allocations(&self) -> u64 {
        self.total_allocations
    }

    fn require_live(&self, buffer: BufferId) -> SolidWireResult<()> {
        if self.buffers.contains_key(&buffer) {
            Ok(())
        } else {
            Err(SolidWireError::Gpu(format!("Unknown buffer {:?}", buffer)))
        }
    }

    fn require_init(&self) -> SolidWireResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(SolidWireError::Gpu("Backend used before init".into()))
        }
    }
}

impl GpuBackend for CpuFallback {
    fn init(&mut self) -> SolidWireResult<()> {
        self.initialized = true;
        Ok(())
    }

    fn name(&self) -> &str {
        "cpu_fallback"
    }

    fn create_buffer(&mut self, desc: &BufferDesc) -> SolidWireResult<BufferId> {
        self.require_init()?;
        if desc.element_count == 0 || desc.stride == 0 {
            return Err(SolidWireError::Gpu(format!(
                "Zero-sized buffer '{}' ({} x {} bytes)",
                desc.label, desc.element_count, desc.stride
            )));
        }

        let id = BufferId(self.next_id);
        self.next_id += 1;
        self.total_allocations += 1;
        self.buffers.insert(id, ComputeBuffer::zeros(desc.clone()));
        Ok(id)
    }

    fn write_buffer(&mut self, buffer: BufferId, bytes: &[u8]) -> SolidWireResult<()> {
        self.buffers
            .get_mut(&buffer)
            .ok_or_else(|| SolidWireError::Gpu(format!("Write to unknown buffer {:?}", buffer)))?
            .write(bytes)
    }

    fn release_buffer(&mut self, buffer: BufferId) -> SolidWireResult<()> {
        self.buffers
            .remove(&buffer)
            .map(|_| ())
            .ok_or_else(|| SolidWireError::Gpu(format!("Release of unknown buffer {:?}", buffer)))
    }

    fn buffer_len(&self, buffer: BufferId) -> Option<usize> {
        self.buffers.get(&buffer).map(ComputeBuffer::len)
    }

    fn bind_buffer(
        &mut self,
        material: MaterialId,
        name: &str,
        buffer: BufferId,
    ) -> SolidWireResult<()> {
        self.require_live(buffer)?;
        self.bindings
            .entry(material)
            .or_default()
            .insert(name.to_string(), Binding::Buffer(buffer));
        Ok(())
    }

    fn bind_int(&mut self, material: MaterialId, name: &str, value: i32) -> SolidWireResult<()> {
        self.bindings
            .entry(material)
            .or_default()
            .insert(name.to_string(), Binding::Int(value));
        Ok(())
    }

    fn set_random_write_target(&mut self, slot: u32, buffer: BufferId) -> SolidWireResult<()> {
        self.require_live(buffer)?;
        self.random_write_targets.insert(slot, buffer);
        Ok(())
    }

    fn clear_random_write_targets(&mut self) {
        self.random_write_targets.clear();
    }

    fn live_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    fn is_gpu(&self) -> bool {
        false
    }
}
