//! Adjacency memoization keyed by mesh identity.
//!
//! Adjacency is a pure function of the mesh topology, so every instance
//! referencing the same mesh shares one table. Tables are handed out as
//! `Arc`s and stay cached until evicted.
//!
//! Each entry remembers the topology fingerprint it was built from. A
//! lookup whose mesh has another fingerprint is rejected rather than served
//! a table that belongs to different geometry.

use std::collections::HashMap;
use std::sync::Arc;

use solidwire_types::{MeshId, SolidWireError, SolidWireResult};
use tracing::debug;

use crate::adjacency::{AdjacencyTable, ScanStrategy};
use crate::mesh::TriangleMesh;

/// Result of a cache lookup.
#[derive(Debug, Clone)]
pub struct CacheLookup {
    pub table: Arc<AdjacencyTable>,
    /// True if the table was already cached.
    pub hit: bool,
}

#[derive(Debug)]
struct Entry {
    fingerprint: MeshId,
    table: Arc<AdjacencyTable>,
}

/// Cache of adjacency tables by [`MeshId`].
#[derive(Debug, Default)]
pub struct AdjacencyCache {
    strategy: ScanStrategy,
    entries: HashMap<MeshId, Entry>,
    hits: u64,
    misses: u64,
}

impl AdjacencyCache {
    /// Creates an empty cache that builds with `strategy`.
    pub fn new(strategy: ScanStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    /// Returns the cached table for `mesh_id`, building it from `mesh` on a miss.
    ///
    /// A cached entry whose topology fingerprint does not match `mesh` means
    /// the id was reused for different geometry and is rejected.
    pub fn get_or_build(
        &mut self,
        mesh_id: MeshId,
        mesh: &TriangleMesh,
    ) -> SolidWireResult<CacheLookup> {
        let fingerprint = mesh.fingerprint();
        if let Some(entry) = self.entries.get(&mesh_id) {
            if entry.fingerprint != fingerprint {
                return Err(SolidWireError::InvalidMesh(format!(
                    "Mesh {:?} is cached for topology {:016x} ({} triangles), got {:016x} ({} triangles)",
                    mesh_id,
                    entry.fingerprint.0,
                    entry.table.triangle_count(),
                    fingerprint.0,
                    mesh.triangle_count()
                )));
            }
            self.hits += 1;
            return Ok(CacheLookup {
                table: Arc::clone(&entry.table),
                hit: true,
            });
        }

        let table = Arc::new(AdjacencyTable::from_mesh_with(mesh, self.strategy)?);
        self.misses += 1;
        debug!(?mesh_id, triangles = table.triangle_count(), "adjacency cached");
        self.entries.insert(
            mesh_id,
            Entry {
                fingerprint,
                table: Arc::clone(&table),
            },
        );
        Ok(CacheLookup { table, hit: false })
    }

    /// Seeds the cache with a precomputed table for the topology
    /// `fingerprint`, replacing any previous entry.
    pub fn insert(
        &mut self,
        mesh_id: MeshId,
        fingerprint: MeshId,
        table: AdjacencyTable,
    ) -> Arc<AdjacencyTable> {
        let table = Arc::new(table);
        self.entries.insert(
            mesh_id,
            Entry {
                fingerprint,
                table: Arc::clone(&table),
            },
        );
        table
    }

    pub fn get(&self, mesh_id: MeshId) -> Option<Arc<AdjacencyTable>> {
        self.entries.get(&mesh_id).map(|e| Arc::clone(&e.table))
    }

    pub fn contains(&self, mesh_id: MeshId) -> bool {
        self.entries.contains_key(&mesh_id)
    }

    /// Drops the cached table for `mesh_id`. Outstanding `Arc`s stay valid.
    pub fn evict(&mut self, mesh_id: MeshId) -> bool {
        self.entries.remove(&mesh_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn strategy(&self) -> ScanStrategy {
        self.strategy
    }
}
