//! Asset and bake contract types.
//!
//! [`MeshAsset`] is the JSON boundary between an exporter and the runtime:
//! a named mesh whose raw vertices carry logical ids and edge policy
//! values. [`BakedAdjacency`] is the import-time product: the adjacency
//! table of one mesh, stored with `bincode` so instances load it instead
//! of recomputing it.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use solidwire_mesh::weld::weld_in_place;
use solidwire_mesh::{AdjacencyTable, ScanStrategy, TriangleMesh};
use solidwire_types::{MeshId, SolidWireError, SolidWireResult};
use tracing::info;

/// Version written into every bake. Bumped when the layout changes.
pub const BAKE_FORMAT_VERSION: u32 = 1;

/// A named mesh as written by an exporter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshAsset {
    /// Asset name (used in diagnostics).
    pub name: String,
    pub mesh: TriangleMesh,
}

impl MeshAsset {
    pub fn new(name: impl Into<String>, mesh: TriangleMesh) -> Self {
        Self {
            name: name.into(),
            mesh,
        }
    }

    /// Parses an asset from JSON.
    pub fn from_json(json: &str) -> SolidWireResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SolidWireError::Serialization(format!("Mesh asset: {}", e)))
    }

    pub fn to_json(&self) -> SolidWireResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SolidWireError::Serialization(format!("Mesh asset: {}", e)))
    }

    /// Reads an asset from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> SolidWireResult<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> SolidWireResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Welds logical ids from positions when the asset carries none.
    /// Returns true if ids were assigned.
    pub fn ensure_logical_ids(&mut self, weld_tolerance: f32) -> SolidWireResult<bool> {
        if !self.mesh.logical_ids.is_empty() || self.mesh.vertex_count() == 0 {
            return Ok(false);
        }
        let distinct = weld_in_place(&mut self.mesh, weld_tolerance)?;
        info!(
            asset = %self.name,
            raw = self.mesh.vertex_count(),
            logical = distinct,
            "logical ids welded from positions"
        );
        Ok(true)
    }

    /// Content-addressed identity of the asset's topology.
    pub fn mesh_id(&self) -> MeshId {
        self.mesh.fingerprint()
    }
}

/// Precomputed adjacency of one mesh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BakedAdjacency {
    pub format_version: u32,
    /// Fingerprint of the mesh the table was built from.
    pub mesh_id: MeshId,
    pub triangle_count: usize,
    pub strategy: ScanStrategy,
    pub neighbors: Vec<[i32; 3]>,
}

impl BakedAdjacency {
    /// Builds the adjacency of `mesh` and wraps it for storage.
    pub fn bake(mesh: &TriangleMesh, strategy: ScanStrategy) -> SolidWireResult<Self> {
        let table = AdjacencyTable::from_mesh_with(mesh, strategy)?;
        Ok(Self::from_table(mesh.fingerprint(), strategy, table))
    }

    pub fn from_table(mesh_id: MeshId, strategy: ScanStrategy, table: AdjacencyTable) -> Self {
        Self {
            format_version: BAKE_FORMAT_VERSION,
            mesh_id,
            triangle_count: table.triangle_count(),
            strategy,
            neighbors: table.into_inner(),
        }
    }

    /// Serializes to compact binary format.
    pub fn to_bytes(&self) -> SolidWireResult<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| SolidWireError::Serialization(format!("Bake serialization failed: {}", e)))
    }

    /// Deserializes from binary format, rejecting other format versions.
    pub fn from_bytes(data: &[u8]) -> SolidWireResult<Self> {
        let baked: Self = bincode::deserialize(data).map_err(|e| {
            SolidWireError::Serialization(format!("Bake deserialization failed: {}", e))
        })?;
        if baked.format_version != BAKE_FORMAT_VERSION {
            return Err(SolidWireError::Serialization(format!(
                "Bake format version {} is not supported (expected {})",
                baked.format_version, BAKE_FORMAT_VERSION
            )));
        }
        Ok(baked)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> SolidWireResult<()> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn read(path: impl AsRef<Path>) -> SolidWireResult<Self> {
        Self::from_bytes(&fs::read(path)?)
    }

    /// The stored table.
    pub fn table(&self) -> AdjacencyTable {
        AdjacencyTable::from_raw(self.neighbors.clone())
    }

    pub fn into_table(self) -> AdjacencyTable {
        AdjacencyTable::from_raw(self.neighbors)
    }
}
