//! Scratch buffer pool.
//!
//! Every attached resource set needs a clip-position scratch buffer large
//! enough for the vertices it draws. The pool owns those buffers and their
//! sizing rule.
//!
//! ## Sizing
//!
//! With [`ScratchSizing::SharedMaximum`] every registrant holds a buffer of
//! the pool's capacity, the largest vertex count seen so far. When a new
//! registrant (or a [`ScratchPool::reserve`] call) raises the capacity, the
//! pool allocates a fresh buffer for *every* registrant, frees the old ones
//! and bumps its generation. The caller learns which sets were reissued and
//! must rebind them.
//!
//! With [`ScratchSizing::PerInstance`] each registrant gets a buffer of
//! exactly its own vertex count and nothing is ever reissued.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use solidwire_types::{BufferId, ResourceSetId, SolidWireError, SolidWireResult};
use tracing::debug;

use crate::backend::GpuBackend;
use crate::buffers::BufferDesc;

/// Scratch buffer sizing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScratchSizing {
    /// All registrants share the largest vertex count.
    #[default]
    SharedMaximum,
    /// Each registrant is sized to its own vertex count.
    PerInstance,
}

/// A scratch buffer handed to one resource set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScratchGrant {
    pub buffer: BufferId,
    /// Buffer length in vertices.
    pub len: usize,
    /// Pool generation the buffer was issued in.
    pub generation: u64,
}

/// Outcome of [`ScratchPool::register`].
#[derive(Debug, Clone)]
pub struct Registration {
    pub grant: ScratchGrant,
    /// Previously registered sets whose buffers were replaced.
    pub reissued: Vec<ResourceSetId>,
}

#[derive(Debug, Clone, Copy)]
struct Registrant {
    vertex_count: usize,
    grant: ScratchGrant,
}

/// Owner of every scratch buffer.
#[derive(Debug, Default)]
pub struct ScratchPool {
    sizing: ScratchSizing,
    registrants: BTreeMap<ResourceSetId, Registrant>,
    /// Current shared buffer length. Never shrinks.
    capacity: usize,
    /// Floor requested through `reserve`.
    reserved: usize,
    generation: u64,
}

impl ScratchPool {
    pub fn new(sizing: ScratchSizing) -> Self {
        Self {
            sizing,
            ..Default::default()
        }
    }

    pub fn sizing(&self) -> ScratchSizing {
        self.sizing
    }

    /// Shared buffer length. Zero until the first registration.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Incremented every time the shared buffers are reissued.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.registrants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrants.is_empty()
    }

    pub fn contains(&self, set: ResourceSetId) -> bool {
        self.registrants.contains_key(&set)
    }

    /// The buffer currently issued to `set`.
    pub fn grant(&self, set: ResourceSetId) -> Option<ScratchGrant> {
        self.registrants.get(&set).map(|r| r.grant)
    }

    /// Largest vertex count among live registrants, or the reserved floor.
    pub fn shared_requirement(&self) -> usize {
        self.registrants
            .values()
            .map(|r| r.vertex_count)
            .max()
            .unwrap_or(0)
            .max(self.reserved)
    }

    /// Minimum scratch length `set` must hold to be drawn correctly.
    pub fn required_len(&self, set: ResourceSetId) -> Option<usize> {
        let registrant = self.registrants.get(&set)?;
        Some(match self.sizing {
            ScratchSizing::SharedMaximum => self.shared_requirement(),
            ScratchSizing::PerInstance => registrant.vertex_count,
        })
    }

    /// Issues a scratch buffer to `set`, reissuing every other registrant's
    /// buffer first if `vertex_count` raises the shared capacity.
    pub fn register<B: GpuBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        set: ResourceSetId,
        vertex_count: usize,
    ) -> SolidWireResult<Registration> {
        if self.registrants.contains_key(&set) {
            return Err(SolidWireError::InvariantViolation(format!(
                "Resource set {} is already registered with the scratch pool",
                set.0
            )));
        }

        let (reissued, len) = match self.sizing {
            ScratchSizing::SharedMaximum => {
                let reissued = if vertex_count > self.capacity {
                    self.grow(backend, vertex_count)?
                } else {
                    Vec::new()
                };
                (reissued, self.capacity)
            }
            ScratchSizing::PerInstance => (Vec::new(), vertex_count),
        };

        let grant = ScratchGrant {
            buffer: backend.create_buffer(&BufferDesc::scratch(len))?,
            len,
            generation: self.generation,
        };
        self.registrants.insert(
            set,
            Registrant {
                vertex_count,
                grant,
            },
        );
        debug!(set = set.0, len, generation = self.generation, "scratch granted");

        Ok(Registration { grant, reissued })
    }

    /// Frees the buffer of `set`. Returns the grant it held, if any.
    ///
    /// The shared capacity is kept; later registrants fit without a reissue.
    pub fn unregister<B: GpuBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        set: ResourceSetId,
    ) -> SolidWireResult<Option<ScratchGrant>> {
        match self.registrants.remove(&set) {
            Some(registrant) => {
                backend.release_buffer(registrant.grant.buffer)?;
                Ok(Some(registrant.grant))
            }
            None => Ok(None),
        }
    }

    /// Raises the shared capacity ahead of time. Returns the sets whose
    /// buffers were reissued. No-op under per-instance sizing.
    pub fn reserve<B: GpuBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        vertex_count: usize,
    ) -> SolidWireResult<Vec<ResourceSetId>> {
        if self.sizing == ScratchSizing::PerInstance {
            return Ok(Vec::new());
        }
        self.reserved = self.reserved.max(vertex_count);
        if vertex_count > self.capacity {
            self.grow(backend, vertex_count)
        } else {
            Ok(Vec::new())
        }
    }

    /// Frees every buffer and forgets all registrants.
    pub fn clear<B: GpuBackend + ?Sized>(&mut self, backend: &mut B) -> SolidWireResult<()> {
        for (_, registrant) in std::mem::take(&mut self.registrants) {
            backend.release_buffer(registrant.grant.buffer)?;
        }
        Ok(())
    }

    /// Reallocates every registrant's buffer at `capacity`.
    ///
    /// New buffers are all created before any old one is freed, so a failed
    /// allocation leaves the pool unchanged. With no registrants only the
    /// capacity moves; the generation counts actual reissues.
    fn grow<B: GpuBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        capacity: usize,
    ) -> SolidWireResult<Vec<ResourceSetId>> {
        if self.registrants.is_empty() {
            self.capacity = capacity;
            return Ok(Vec::new());
        }

        let generation = self.generation + 1;
        let mut fresh: Vec<(ResourceSetId, BufferId)> = Vec::with_capacity(self.registrants.len());
        for &set in self.registrants.keys() {
            match backend.create_buffer(&BufferDesc::scratch(capacity)) {
                Ok(buffer) => fresh.push((set, buffer)),
                Err(e) => {
                    for (_, buffer) in fresh {
                        backend.release_buffer(buffer)?;
                    }
                    return Err(e);
                }
            }
        }

        let mut reissued = Vec::with_capacity(fresh.len());
        for (set, buffer) in fresh {
            if let Some(registrant) = self.registrants.get_mut(&set) {
                backend.release_buffer(registrant.grant.buffer)?;
                registrant.grant = ScratchGrant {
                    buffer,
                    len: capacity,
                    generation,
                };
                reissued.push(set);
            }
        }

        debug!(
            from = self.capacity,
            to = capacity,
            reissued = reissued.len(),
            generation,
            "scratch capacity grown"
        );
        self.capacity = capacity;
        self.generation = generation;
        Ok(reissued)
    }
}
