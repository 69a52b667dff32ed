//! Logical vertex id assignment by position.
//!
//! Exporters normally write logical ids next to the mesh. For meshes that
//! arrive without them, raw vertices are welded by snapping positions to a
//! grid of `tolerance` and numbering each occupied cell in first-seen order.
//! Two points closer than `tolerance` that straddle a cell boundary are not
//! merged.

use std::collections::HashMap;

use solidwire_types::{SolidWireError, SolidWireResult};

use crate::mesh::TriangleMesh;

/// Computes logical ids for every raw vertex of `mesh`.
pub fn weld_logical_ids(mesh: &TriangleMesh, tolerance: f32) -> SolidWireResult<Vec<u32>> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(SolidWireError::InvalidConfig(format!(
            "Weld tolerance must be positive and finite, got {}",
            tolerance
        )));
    }

    let inv = 1.0 / tolerance as f64;
    let mut cells: HashMap<[i64; 3], u32> = HashMap::with_capacity(mesh.vertex_count());
    let mut ids = Vec::with_capacity(mesh.vertex_count());

    for i in 0..mesh.vertex_count() {
        let [x, y, z] = mesh.position(i);
        let cell = [
            (x as f64 * inv).round() as i64,
            (y as f64 * inv).round() as i64,
            (z as f64 * inv).round() as i64,
        ];
        let next = cells.len() as u32;
        ids.push(*cells.entry(cell).or_insert(next));
    }

    Ok(ids)
}

/// Replaces `mesh.logical_ids` with position-welded ids and returns the
/// number of distinct logical vertices.
pub fn weld_in_place(mesh: &mut TriangleMesh, tolerance: f32) -> SolidWireResult<usize> {
    let ids = weld_logical_ids(mesh, tolerance)?;
    let distinct = ids.iter().copied().max().map_or(0, |m| m as usize + 1);
    mesh.logical_ids = ids;
    Ok(distinct)
}
