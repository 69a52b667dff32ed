//! Logical mesh topology.
//!
//! Indexes every undirected logical edge `(min_id, max_id)` to the
//! triangles that contain it. Edges are keyed by logical vertex ids, not
//! raw indices, so triangles on both sides of a UV seam meet on one edge.

use std::collections::HashMap;

use crate::mesh::TriangleMesh;

/// Canonical (undirected) logical edge key.
pub type EdgeKey = (u32, u32);

/// Returns the canonical key of edge `e` of a triangle with corner ids `corners`.
///
/// Edge `e` runs from corner `e` to corner `(e + 1) % 3`.
#[inline]
pub fn edge_key(corners: [u32; 3], e: usize) -> EdgeKey {
    let a = corners[e];
    let b = corners[(e + 1) % 3];
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Edge-to-triangle index over logical vertex ids.
#[derive(Debug, Clone)]
pub struct LogicalTopology {
    /// Logical ids of each triangle's corners.
    corners: Vec<[u32; 3]>,

    /// For each logical edge, the triangles containing it in ascending order.
    /// A triangle appears once per edge even if it is degenerate.
    edge_triangles: HashMap<EdgeKey, Vec<u32>>,
}

impl LogicalTopology {
    /// Build topology from a validated triangle mesh.
    pub fn build(mesh: &TriangleMesh) -> Self {
        let corners = (0..mesh.triangle_count())
            .map(|t| mesh.corner_logical_ids(t))
            .collect();
        Self::from_corners(corners)
    }

    /// Build topology from per-triangle logical corner ids.
    pub fn from_corners(corners: Vec<[u32; 3]>) -> Self {
        let mut edge_triangles: HashMap<EdgeKey, Vec<u32>> = HashMap::new();

        for (t, &tri) in corners.iter().enumerate() {
            let t = t as u32;
            for e in 0..3 {
                let list = edge_triangles.entry(edge_key(tri, e)).or_default();
                if list.last() != Some(&t) {
                    list.push(t);
                }
            }
        }

        Self {
            corners,
            edge_triangles,
        }
    }

    /// Logical corner ids of every triangle.
    pub fn corners(&self) -> &[[u32; 3]] {
        &self.corners
    }

    pub fn triangle_count(&self) -> usize {
        self.corners.len()
    }

    /// Number of distinct logical edges.
    pub fn edge_count(&self) -> usize {
        self.edge_triangles.len()
    }

    /// Triangles containing the logical edge `(a, b)`, in either direction.
    pub fn triangles_on_edge(&self, a: u32, b: u32) -> &[u32] {
        let key = if a <= b { (a, b) } else { (b, a) };
        self.edge_triangles
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Triangles with a higher ordinal than `t` that share at least one
    /// logical edge with it, ascending and without duplicates.
    pub fn forward_candidates(&self, t: usize) -> Vec<u32> {
        let tri = self.corners[t];
        let mut out = Vec::new();
        for e in 0..3 {
            if let Some(list) = self.edge_triangles.get(&edge_key(tri, e)) {
                let start = list.partition_point(|&u| u as usize <= t);
                out.extend_from_slice(&list[start..]);
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Returns the number of boundary edges (edges with only 1 triangle).
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_triangles
            .values()
            .filter(|tris| tris.len() == 1)
            .count()
    }

    /// Returns the number of edges shared by more than 2 triangles.
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edge_triangles
            .values()
            .filter(|tris| tris.len() > 2)
            .count()
    }

    /// Returns true if every logical edge has at least two triangles.
    pub fn is_closed(&self) -> bool {
        self.boundary_edge_count() == 0
    }
}
