//! Render-resource manager.
//!
//! Owns the buffers every wire-rendered instance needs and republishes
//! them to the instance's materials each frame:
//!
//! | Property                              | Buffer              | Lifetime         |
//! |---------------------------------------|---------------------|------------------|
//! | `triIdxBuffer`                        | triangle indices    | immutable        |
//! | `triAdjBuffer`                        | adjacency table     | immutable        |
//! | `vertsPosRWBuffer` / `vertsPosBuffer` | clip-position scratch | rewritten by GPU |
//! | `triCount`                            | triangle count      | immutable        |
//!
//! Lifecycle per instance: [`ResourceManager::attach`] once,
//! [`ResourceManager::refresh_frame`] every frame,
//! [`ResourceManager::release`] once. Misuse (double attach, release of an
//! unknown set) is guarded: it is logged, reported on the event bus and
//! leaves shared state untouched.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use solidwire_mesh::{AdjacencyCache, AdjacencyTable, TriangleMesh};
use solidwire_telemetry::{EventBus, EventKind, RenderEvent};
use solidwire_types::constants::bindings;
use solidwire_types::{
    BufferId, InstanceId, MaterialId, MeshId, ResourceSetId, SolidWireError, SolidWireResult,
};
use tracing::{debug, info, warn};

use crate::backend::GpuBackend;
use crate::buffers::BufferDesc;
use crate::config::ResourceConfig;
use crate::pool::{ScratchGrant, ScratchPool};

/// Buffers and bindings owned for one mesh instance.
#[derive(Debug, Clone)]
pub struct ResourceSet {
    pub id: ResourceSetId,
    pub instance: InstanceId,
    pub mesh_id: MeshId,
    pub triangle_count: usize,
    pub vertex_count: usize,
    /// Materials the buffers are bound to.
    pub materials: Vec<MaterialId>,
    pub triangle_indices: BufferId,
    pub adjacency: BufferId,
    /// Scratch buffer this set was last bound with.
    pub scratch: ScratchGrant,
    /// Shared with every other set of the same mesh.
    pub table: Arc<AdjacencyTable>,
}

/// Owner of every resource set, generic over the rendering backend.
pub struct ResourceManager<B: GpuBackend> {
    backend: B,
    config: ResourceConfig,
    cache: AdjacencyCache,
    pool: ScratchPool,
    sets: BTreeMap<ResourceSetId, ResourceSet>,
    by_instance: HashMap<InstanceId, ResourceSetId>,
    next_set: u64,
    frame: u64,
    events: Option<EventBus>,
}

impl<B: GpuBackend> ResourceManager<B> {
    /// Validates `config`, initializes `backend` and creates an empty manager.
    pub fn new(mut backend: B, config: ResourceConfig) -> SolidWireResult<Self> {
        config.validate()?;
        backend.init()?;
        info!(
            backend = backend.name(),
            sizing = ?config.scratch_sizing,
            "resource manager ready"
        );
        Ok(Self {
            backend,
            pool: ScratchPool::new(config.scratch_sizing),
            config,
            cache: AdjacencyCache::default(),
            sets: BTreeMap::new(),
            by_instance: HashMap::new(),
            next_set: 0,
            frame: 0,
            events: None,
        })
    }

    /// Replaces the adjacency cache (e.g. one with another scan strategy,
    /// or one seeded with baked tables).
    pub fn with_cache(mut self, cache: AdjacencyCache) -> Self {
        self.cache = cache;
        self
    }

    /// Attaches an event bus; events are flushed on [`Self::advance_frame`].
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    /// Allocates, uploads and binds the buffers of `instance`.
    ///
    /// The mesh is validated before anything is allocated. Adjacency is
    /// taken from the cache by `mesh_id`. Attaching an instance that already
    /// has a set is guarded and returns the existing set.
    pub fn attach(
        &mut self,
        instance: InstanceId,
        mesh_id: MeshId,
        mesh: &TriangleMesh,
        materials: &[MaterialId],
    ) -> SolidWireResult<ResourceSetId> {
        if let Some(&existing) = self.by_instance.get(&instance) {
            self.guard("attach", format!("instance {} already owns set {}", instance.0, existing.0));
            return Ok(existing);
        }

        mesh.validate()?;
        if mesh.triangle_count() == 0 {
            return Err(SolidWireError::InvalidMesh("Mesh has no triangles".into()));
        }

        let lookup = self.cache.get_or_build(mesh_id, mesh)?;
        if lookup.hit {
            self.emit(EventKind::AdjacencyCacheHit { mesh: mesh_id });
        } else {
            self.emit(EventKind::AdjacencyBuilt {
                mesh: mesh_id,
                triangles: lookup.table.triangle_count(),
                open_slots: lookup.table.open_slot_count(),
            });
        }

        let triangle_count = mesh.triangle_count();
        let index_bytes: &[u8] = bytemuck::cast_slice(&mesh.indices);
        let triangle_indices =
            self.upload(&BufferDesc::triangle_indices(triangle_count), index_bytes)?;
        let adjacency = match self.upload(
            &BufferDesc::adjacency(triangle_count),
            lookup.table.as_bytes(),
        ) {
            Ok(buffer) => buffer,
            Err(e) => {
                self.discard(None, &[triangle_indices]);
                return Err(e);
            }
        };

        let id = ResourceSetId(self.next_set);
        let registration = match self.pool.register(&mut self.backend, id, mesh.vertex_count()) {
            Ok(registration) => registration,
            Err(e) => {
                self.discard(None, &[triangle_indices, adjacency]);
                return Err(e);
            }
        };
        self.next_set += 1;

        let set = ResourceSet {
            id,
            instance,
            mesh_id,
            triangle_count,
            vertex_count: mesh.vertex_count(),
            materials: materials.to_vec(),
            triangle_indices,
            adjacency,
            scratch: registration.grant,
            table: lookup.table,
        };
        let bound = bind_immutable(&mut self.backend, &set)
            .and_then(|()| bind_scratch(&mut self.backend, &set));
        if let Err(e) = bound {
            self.discard(Some(id), &[triangle_indices, adjacency]);
            // Sets reissued for this attach still need their new buffers bound.
            if let Err(resync) = self.resync(&registration.reissued) {
                warn!(error = %resync, "re-sync after failed attach also failed");
            }
            return Err(e);
        }
        self.sets.insert(id, set);
        self.by_instance.insert(instance, id);

        if !registration.reissued.is_empty() {
            self.resync(&registration.reissued)?;
            self.emit(EventKind::ScratchReissued {
                required: registration.grant.len,
                registrants: registration.reissued.len() + 1,
                generation: registration.grant.generation,
            });
        }

        let uploaded_bytes = index_bytes.len() + triangle_count * 3 * std::mem::size_of::<i32>();
        info!(
            set = id.0,
            instance = instance.0,
            triangles = triangle_count,
            scratch = registration.grant.len,
            "resource set attached"
        );
        self.emit(EventKind::Attached {
            set: id,
            instance,
            mesh: mesh_id,
            uploaded_bytes,
            scratch_len: registration.grant.len,
        });
        Ok(id)
    }

    /// Per-frame binding of `set`.
    ///
    /// Clears random-write targets, re-syncs the scratch binding if the pool
    /// reissued it since the last bind, re-asserts the immutable bindings
    /// and exposes the scratch buffer on the configured slot. Returns false
    /// (guarded) for an unknown set.
    pub fn refresh_frame(&mut self, set: ResourceSetId) -> SolidWireResult<bool> {
        let Some(current) = self.sets.get(&set).map(|s| s.scratch) else {
            self.guard("refresh_frame", format!("unknown set {}", set.0));
            return Ok(false);
        };

        self.backend.clear_random_write_targets();

        if let Some(grant) = self.pool.grant(set) {
            if grant.buffer != current.buffer {
                warn!(
                    set = set.0,
                    from = current.len,
                    to = grant.len,
                    "scratch buffer was reissued, re-syncing"
                );
                self.resync(&[set])?;
                self.emit(EventKind::ScratchResynced { set });
            }
        }

        let resources = match self.sets.get(&set) {
            Some(resources) => resources,
            None => return Ok(false),
        };
        bind_immutable(&mut self.backend, resources)?;
        bind_scratch(&mut self.backend, resources)?;
        self.backend
            .set_random_write_target(self.config.scratch_slot, resources.scratch.buffer)?;
        debug!(set = set.0, frame = self.frame, "frame refreshed");

        if self.config.emit_frame_events {
            self.emit(EventKind::FrameRefreshed { set });
        }
        Ok(true)
    }

    /// Frees the buffers of `set`. Returns false (guarded) if the set is
    /// unknown or already released.
    pub fn release(&mut self, set: ResourceSetId) -> SolidWireResult<bool> {
        let Some(resources) = self.sets.remove(&set) else {
            self.guard("release", format!("unknown or already released set {}", set.0));
            return Ok(false);
        };
        self.by_instance.remove(&resources.instance);

        let freed = self.free_buffers(
            Some(set),
            &[resources.triangle_indices, resources.adjacency],
        );

        info!(set = set.0, instance = resources.instance.0, "resource set released");
        self.emit(EventKind::Released { set });
        freed.map(|()| true)
    }

    /// Releases the set owned by `instance`, if any.
    pub fn release_instance(&mut self, instance: InstanceId) -> SolidWireResult<bool> {
        match self.by_instance.get(&instance).copied() {
            Some(set) => self.release(set),
            None => {
                self.guard("release_instance", format!("instance {} owns no set", instance.0));
                Ok(false)
            }
        }
    }

    /// Releases every set. Returns how many were released.
    pub fn release_all(&mut self) -> SolidWireResult<usize> {
        let ids: Vec<ResourceSetId> = self.sets.keys().copied().collect();
        let mut released = 0;
        for id in ids {
            if self.release(id)? {
                released += 1;
            }
        }
        Ok(released)
    }

    /// Fails with [`SolidWireError::StaleScratchBuffer`] if `set` is bound
    /// to a scratch buffer the pool has replaced or that is too small.
    pub fn verify_scratch(&self, set: ResourceSetId) -> SolidWireResult<()> {
        let resources = self
            .sets
            .get(&set)
            .ok_or_else(|| SolidWireError::Gpu(format!("Unknown resource set {}", set.0)))?;
        let required = self.pool.required_len(set).unwrap_or(resources.vertex_count);
        let current = self.pool.grant(set).map(|g| g.buffer);

        if current != Some(resources.scratch.buffer) || resources.scratch.len < required {
            return Err(SolidWireError::StaleScratchBuffer {
                set: set.0,
                len: resources.scratch.len,
                required,
            });
        }
        Ok(())
    }

    /// Raises the shared scratch capacity ahead of large attaches.
    ///
    /// Reissued sets are rebound on their next [`Self::refresh_frame`].
    /// Returns the number of sets reissued.
    pub fn reserve_scratch(&mut self, vertex_count: usize) -> SolidWireResult<usize> {
        let reissued = self.pool.reserve(&mut self.backend, vertex_count)?;
        if !reissued.is_empty() {
            self.emit(EventKind::ScratchReissued {
                required: self.pool.capacity(),
                registrants: reissued.len(),
                generation: self.pool.generation(),
            });
        }
        Ok(reissued.len())
    }

    /// Advances the frame counter and flushes telemetry. Returns the new frame.
    pub fn advance_frame(&mut self) -> u64 {
        self.frame += 1;
        if let Some(bus) = self.events.as_mut() {
            bus.flush();
        }
        self.frame
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn set(&self, set: ResourceSetId) -> Option<&ResourceSet> {
        self.sets.get(&set)
    }

    pub fn set_for_instance(&self, instance: InstanceId) -> Option<&ResourceSet> {
        self.by_instance.get(&instance).and_then(|id| self.sets.get(id))
    }

    pub fn sets(&self) -> impl Iterator<Item = &ResourceSet> {
        self.sets.values()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn cache(&self) -> &AdjacencyCache {
        &self.cache
    }

    pub fn pool(&self) -> &ScratchPool {
        &self.pool
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    pub fn event_bus_mut(&mut self) -> Option<&mut EventBus> {
        self.events.as_mut()
    }

    /// Consumes the manager, returning the backend. Sets still attached
    /// keep their buffers allocated.
    pub fn into_backend(self) -> B {
        self.backend
    }

    fn upload(&mut self, desc: &BufferDesc, bytes: &[u8]) -> SolidWireResult<BufferId> {
        let buffer = self.backend.create_buffer(desc)?;
        if let Err(e) = self.backend.write_buffer(buffer, bytes) {
            self.discard(None, &[buffer]);
            return Err(e);
        }
        Ok(buffer)
    }

    /// Frees `buffers` and the scratch grant of `set`, continuing past
    /// failures so nothing else leaks. Returns the first error.
    fn free_buffers(
        &mut self,
        set: Option<ResourceSetId>,
        buffers: &[BufferId],
    ) -> SolidWireResult<()> {
        let mut first = None;
        for &buffer in buffers {
            if let Err(e) = self.backend.release_buffer(buffer) {
                first.get_or_insert(e);
            }
        }
        if let Some(set) = set {
            if let Err(e) = self.pool.unregister(&mut self.backend, set) {
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    /// Rollback of a half-built attach. The caller reports its own error.
    fn discard(&mut self, set: Option<ResourceSetId>, buffers: &[BufferId]) {
        if let Err(e) = self.free_buffers(set, buffers) {
            warn!(error = %e, "rollback of failed attach leaked a buffer");
        }
    }

    /// Adopts the pool's current grant for each set and rebinds it.
    fn resync(&mut self, ids: &[ResourceSetId]) -> SolidWireResult<()> {
        for id in ids {
            let (Some(grant), Some(resources)) = (self.pool.grant(*id), self.sets.get_mut(id))
            else {
                continue;
            };
            resources.scratch = grant;
            bind_scratch(&mut self.backend, resources)?;
        }
        Ok(())
    }

    fn guard(&mut self, operation: &str, reason: String) {
        warn!(operation, %reason, "guarded misuse ignored");
        self.emit(EventKind::Guarded {
            operation: operation.to_string(),
            reason,
        });
    }

    fn emit(&self, kind: EventKind) {
        if let Some(bus) = &self.events {
            bus.emit(RenderEvent::new(self.frame, kind));
        }
    }
}

fn bind_immutable<B: GpuBackend + ?Sized>(
    backend: &mut B,
    set: &ResourceSet,
) -> SolidWireResult<()> {
    for &material in &set.materials {
        backend.bind_buffer(material, bindings::TRIANGLE_INDICES, set.triangle_indices)?;
        backend.bind_buffer(material, bindings::ADJACENCY, set.adjacency)?;
        backend.bind_int(material, bindings::TRIANGLE_COUNT, set.triangle_count as i32)?;
    }
    Ok(())
}

fn bind_scratch<B: GpuBackend + ?Sized>(backend: &mut B, set: &ResourceSet) -> SolidWireResult<()> {
    for &material in &set.materials {
        backend.bind_buffer(material, bindings::SCRATCH_WRITE, set.scratch.buffer)?;
        backend.bind_buffer(material, bindings::SCRATCH_READ, set.scratch.buffer)?;
    }
    Ok(())
}
