//! Asset and bake validation.
//!
//! Validates data before it reaches the resource manager, catching
//! data-level errors early with clear diagnostics.

use solidwire_mesh::TriangleMesh;
use solidwire_types::constants::NO_NEIGHBOR;
use solidwire_types::{SolidWireError, SolidWireResult};

use crate::contract::{BakedAdjacency, MeshAsset};

/// Validates a mesh asset.
///
/// Checks:
/// - The asset has a name
/// - Mesh integrity (SoA consistency, logical ids, valid indices)
/// - The mesh has at least one triangle
pub fn validate_asset(asset: &MeshAsset) -> SolidWireResult<()> {
    if asset.name.trim().is_empty() {
        return Err(SolidWireError::InvalidMesh("Asset name is empty".into()));
    }

    asset
        .mesh
        .validate()
        .map_err(|e| SolidWireError::InvalidMesh(format!("Asset '{}': {}", asset.name, e)))?;

    if asset.mesh.triangle_count() == 0 {
        return Err(SolidWireError::InvalidMesh(format!(
            "Asset '{}' has no triangles",
            asset.name
        )));
    }

    Ok(())
}

/// Validates a bake on its own.
///
/// Checks:
/// - Recorded triangle count matches the table
/// - Every slot is [`NO_NEIGHBOR`] or a triangle ordinal in range
/// - Every filled slot is answered by a slot on the neighbor
pub fn validate_table(baked: &BakedAdjacency) -> SolidWireResult<()> {
    if baked.neighbors.len() != baked.triangle_count {
        return Err(SolidWireError::InvariantViolation(format!(
            "Bake records {} triangles but holds {} rows",
            baked.triangle_count,
            baked.neighbors.len()
        )));
    }

    let count = baked.triangle_count as i64;
    for (t, slots) in baked.neighbors.iter().enumerate() {
        for (e, &u) in slots.iter().enumerate() {
            if u == NO_NEIGHBOR {
                continue;
            }
            if u < 0 || u as i64 >= count {
                return Err(SolidWireError::InvariantViolation(format!(
                    "Triangle {} edge {} points at {} (triangle count: {})",
                    t, e, u, count
                )));
            }
            if !baked.neighbors[u as usize].contains(&(t as i32)) {
                return Err(SolidWireError::InvariantViolation(format!(
                    "Triangle {} edge {} points at {}, which does not point back",
                    t, e, u
                )));
            }
        }
    }

    Ok(())
}

/// Validates a bake against the mesh it is about to be used with.
pub fn validate_baked(baked: &BakedAdjacency, mesh: &TriangleMesh) -> SolidWireResult<()> {
    validate_table(baked)?;

    if baked.triangle_count != mesh.triangle_count() {
        return Err(SolidWireError::InvariantViolation(format!(
            "Bake covers {} triangles, mesh has {}",
            baked.triangle_count,
            mesh.triangle_count()
        )));
    }
    if baked.mesh_id != mesh.fingerprint() {
        return Err(SolidWireError::InvariantViolation(format!(
            "Bake was made for mesh {:?}, not {:?}",
            baked.mesh_id,
            mesh.fingerprint()
        )));
    }

    Ok(())
}
