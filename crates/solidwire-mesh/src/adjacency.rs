//! Triangle adjacency across logical edges.
//!
//! For every triangle `t` and edge `e` the table holds the ordinal of the
//! triangle on the other side of that edge, or [`NO_NEIGHBOR`]. Edge `e`
//! runs from corner `e` to corner `(e + 1) % 3`, so slot 0 is `(v0, v1)`,
//! slot 1 is `(v1, v2)` and slot 2 is `(v2, v0)`.
//!
//! ## Scan
//!
//! Triangles are visited in ascending ordinal order. Triangle `t` is only
//! tested against triangles `u > t`; a match fills `t`'s slot and the
//! matching slot on `u` at the same time, so the table is symmetric by
//! construction and every pair is tested once. A triangle whose three
//! slots are already filled is skipped.
//!
//! When more than two triangles share a logical edge, the lowest-ordinal
//! free pair wins and later triangles see the slot as taken. Their slot
//! stays [`NO_NEIGHBOR`] unless a still later triangle pairs with them.

use serde::{Deserialize, Serialize};
use solidwire_types::constants::{EDGES_PER_TRIANGLE, NO_NEIGHBOR};
use solidwire_types::{SolidWireResult, TriangleId};
use tracing::{info, warn};

use crate::mesh::TriangleMesh;
use crate::topology::{edge_key, LogicalTopology};

/// How candidate partners are enumerated during the forward scan.
///
/// Both strategies produce identical tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStrategy {
    /// Test every later triangle. O(T²/2).
    Exhaustive,
    /// Test only later triangles sharing a logical edge, via an edge index.
    #[default]
    EdgeIndexed,
}

/// Per-triangle neighbor ordinals, one per edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyTable {
    neighbors: Vec<[i32; 3]>,
}

impl AdjacencyTable {
    /// Builds the table for `triangle_count` triangles whose flat corner
    /// positions map to logical ids through `corner_logical_id`.
    pub fn build<F>(triangle_count: usize, corner_logical_id: F) -> Self
    where
        F: Fn(usize) -> u32,
    {
        Self::build_with(triangle_count, corner_logical_id, ScanStrategy::default())
    }

    /// Same as [`AdjacencyTable::build`] with an explicit scan strategy.
    pub fn build_with<F>(triangle_count: usize, corner_logical_id: F, strategy: ScanStrategy) -> Self
    where
        F: Fn(usize) -> u32,
    {
        let corners: Vec<[u32; 3]> = (0..triangle_count)
            .map(|t| {
                let base = t * 3;
                [
                    corner_logical_id(base),
                    corner_logical_id(base + 1),
                    corner_logical_id(base + 2),
                ]
            })
            .collect();

        match strategy {
            ScanStrategy::Exhaustive => scan_exhaustive(&corners),
            ScanStrategy::EdgeIndexed => scan_indexed(&LogicalTopology::from_corners(corners)),
        }
    }

    /// Validates `mesh` and builds its table with the default strategy.
    pub fn from_mesh(mesh: &TriangleMesh) -> SolidWireResult<Self> {
        Self::from_mesh_with(mesh, ScanStrategy::default())
    }

    /// Validates `mesh` and builds its table.
    pub fn from_mesh_with(mesh: &TriangleMesh, strategy: ScanStrategy) -> SolidWireResult<Self> {
        mesh.validate()?;

        let topology = LogicalTopology::build(mesh);
        let non_manifold = topology.non_manifold_edge_count();
        if non_manifold > 0 {
            warn!(
                non_manifold,
                triangles = mesh.triangle_count(),
                "non-manifold logical edges, keeping first match per edge"
            );
        }

        let table = match strategy {
            ScanStrategy::Exhaustive => scan_exhaustive(topology.corners()),
            ScanStrategy::EdgeIndexed => scan_indexed(&topology),
        };
        info!(
            triangles = table.triangle_count(),
            paired = table.paired_slot_count(),
            open = table.open_slot_count(),
            ?strategy,
            "adjacency built"
        );
        Ok(table)
    }

    /// Wraps an already computed table (e.g. one loaded from a bake).
    pub fn from_raw(neighbors: Vec<[i32; 3]>) -> Self {
        Self { neighbors }
    }

    pub fn triangle_count(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Neighbor across edge `edge` of triangle `t`, if any.
    #[inline]
    pub fn neighbor(&self, t: TriangleId, edge: usize) -> Option<TriangleId> {
        let n = self.neighbors[t.index()][edge];
        (n >= 0).then(|| TriangleId(n as u32))
    }

    /// Raw slot values of triangle `t`.
    #[inline]
    pub fn raw(&self, t: usize) -> [i32; 3] {
        self.neighbors[t]
    }

    pub fn as_slice(&self) -> &[[i32; 3]] {
        &self.neighbors
    }

    /// Flat `[t0e0, t0e1, t0e2, t1e0, ...]` view.
    pub fn as_flat(&self) -> &[i32] {
        bytemuck::cast_slice(&self.neighbors)
    }

    /// Byte view in the `int3` layout the shader reads.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.neighbors)
    }

    pub fn into_inner(self) -> Vec<[i32; 3]> {
        self.neighbors
    }

    /// Number of slots holding a neighbor.
    pub fn paired_slot_count(&self) -> usize {
        self.as_flat().iter().filter(|&&n| n != NO_NEIGHBOR).count()
    }

    /// Number of slots holding [`NO_NEIGHBOR`].
    pub fn open_slot_count(&self) -> usize {
        self.triangle_count() * EDGES_PER_TRIANGLE - self.paired_slot_count()
    }

    /// Returns true if every filled slot is answered by a slot on the
    /// neighbor pointing back, and every slot is in range.
    pub fn is_symmetric(&self) -> bool {
        let count = self.neighbors.len() as i32;
        self.neighbors.iter().enumerate().all(|(t, slots)| {
            slots.iter().all(|&u| {
                u == NO_NEIGHBOR
                    || (u >= 0 && u < count && self.neighbors[u as usize].contains(&(t as i32)))
            })
        })
    }
}

/// Shared mutable state of the forward scan.
struct ForwardScan<'a> {
    corners: &'a [[u32; 3]],
    slots: Vec<[i32; 3]>,
}

impl<'a> ForwardScan<'a> {
    fn new(corners: &'a [[u32; 3]]) -> Self {
        Self {
            corners,
            slots: vec![[NO_NEIGHBOR; 3]; corners.len()],
        }
    }

    #[inline]
    fn is_resolved(&self, t: usize) -> bool {
        self.slots[t].iter().all(|&n| n != NO_NEIGHBOR)
    }

    /// Fills every free slot of `t` that `u` has a free matching slot for.
    fn pair(&mut self, t: usize, u: usize) {
        for e in 0..EDGES_PER_TRIANGLE {
            if self.slots[t][e] != NO_NEIGHBOR {
                continue;
            }
            let key = edge_key(self.corners[t], e);
            for f in 0..EDGES_PER_TRIANGLE {
                if self.slots[u][f] == NO_NEIGHBOR && edge_key(self.corners[u], f) == key {
                    self.slots[t][e] = u as i32;
                    self.slots[u][f] = t as i32;
                    break;
                }
            }
        }
    }

    fn finish(self) -> AdjacencyTable {
        AdjacencyTable {
            neighbors: self.slots,
        }
    }
}

fn scan_exhaustive(corners: &[[u32; 3]]) -> AdjacencyTable {
    let mut scan = ForwardScan::new(corners);
    for t in 0..corners.len() {
        if scan.is_resolved(t) {
            continue;
        }
        for u in t + 1..corners.len() {
            scan.pair(t, u);
            if scan.is_resolved(t) {
                break;
            }
        }
    }
    scan.finish()
}

fn scan_indexed(topology: &LogicalTopology) -> AdjacencyTable {
    let mut scan = ForwardScan::new(topology.corners());
    for t in 0..topology.triangle_count() {
        if scan.is_resolved(t) {
            continue;
        }
        for u in topology.forward_candidates(t) {
            scan.pair(t, u as usize);
            if scan.is_resolved(t) {
                break;
            }
        }
    }
    scan.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_fills_both_sides() {
        let corners = [[0, 1, 2], [2, 1, 3]];
        let mut scan = ForwardScan::new(&corners);
        scan.pair(0, 1);
        assert_eq!(scan.slots[0], [NO_NEIGHBOR, 1, NO_NEIGHBOR]);
        assert_eq!(scan.slots[1], [0, NO_NEIGHBOR, NO_NEIGHBOR]);
    }

    #[test]
    fn doubled_face_fills_all_slots() {
        let corners = [[0, 1, 2], [0, 2, 1]];
        let table = scan_exhaustive(&corners);
        assert_eq!(table.raw(0), [1, 1, 1]);
        assert_eq!(table.raw(1), [0, 0, 0]);
        assert!(table.is_symmetric());
    }
}
