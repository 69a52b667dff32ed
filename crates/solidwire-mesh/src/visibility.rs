//! CPU reference of the per-edge wire decision.
//!
//! The fragment stage draws an edge of a front-facing triangle according to
//! the edge's policy and the facing of the triangle across that edge. This
//! module evaluates the same rule on the host from clip-space positions, for
//! tests and offline tooling.

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};
use solidwire_types::constants::{edge_policy, EDGES_PER_TRIANGLE};
use solidwire_types::{SolidWireError, SolidWireResult, TriangleId};

use crate::adjacency::AdjacencyTable;
use crate::mesh::TriangleMesh;

/// Drawing rule for one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgePolicy {
    /// Never drawn.
    Never,
    /// Drawn when the neighbor is back-facing or missing.
    Conditional,
    /// Always drawn.
    Always,
}

impl EdgePolicy {
    /// Decodes a raw per-vertex value.
    pub fn from_raw(value: i32) -> Self {
        if value <= edge_policy::HIDDEN {
            Self::Never
        } else if value == edge_policy::ALWAYS {
            Self::Always
        } else {
            Self::Conditional
        }
    }

    /// Whether an edge with this policy is drawn, given the neighbor across
    /// it and the per-triangle culled flags.
    pub fn draws(self, neighbor: Option<TriangleId>, culled: &[bool]) -> bool {
        match self {
            Self::Never => false,
            Self::Always => true,
            Self::Conditional => neighbor
                .and_then(|n| culled.get(n.index()).copied())
                .unwrap_or(true),
        }
    }
}

/// An edge selected for drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireEdge {
    pub triangle: TriangleId,
    /// Edge slot 0..3.
    pub edge: u8,
    /// Raw index of the starting corner.
    pub from: u32,
    /// Raw index of the ending corner.
    pub to: u32,
    pub policy: EdgePolicy,
}

/// Perspective divide of a clip-space position.
#[inline]
pub fn project(clip: Vec4) -> Vec2 {
    clip.truncate().truncate() / clip.w
}

/// Returns true if the projected triangle winds clockwise (back-facing).
///
/// Uses the shoelace sum `Σ (x₂ - x₁)(y₂ + y₁)`, positive for clockwise.
pub fn is_back_facing(p0: Vec2, p1: Vec2, p2: Vec2) -> bool {
    let mut a = 0.0;
    a += (p1.x - p0.x) * (p1.y + p0.y);
    a += (p2.x - p1.x) * (p2.y + p1.y);
    a += (p0.x - p2.x) * (p0.y + p2.y);
    a > 0.0
}

/// Back-facing flag of every triangle for the given clip positions.
pub fn culled_triangles(mesh: &TriangleMesh, clip: &[Vec4]) -> SolidWireResult<Vec<bool>> {
    mesh.validate()?;
    if clip.len() < mesh.vertex_count() {
        return Err(SolidWireError::InvalidMesh(format!(
            "Clip position count ({}) is shorter than vertex count ({})",
            clip.len(),
            mesh.vertex_count()
        )));
    }

    Ok((0..mesh.triangle_count())
        .map(|t| {
            let [a, b, c] = mesh.triangle(t);
            is_back_facing(
                project(clip[a as usize]),
                project(clip[b as usize]),
                project(clip[c as usize]),
            )
        })
        .collect())
}

/// Edges of front-facing triangles that the wire shader would draw.
///
/// The policy of edge `e` is read from the vertex that ends it, corner
/// `(e + 1) % 3`.
pub fn visible_edges(
    mesh: &TriangleMesh,
    adjacency: &AdjacencyTable,
    clip: &[Vec4],
) -> SolidWireResult<Vec<WireEdge>> {
    if adjacency.triangle_count() != mesh.triangle_count() {
        return Err(SolidWireError::InvalidMesh(format!(
            "Adjacency covers {} triangles, mesh has {}",
            adjacency.triangle_count(),
            mesh.triangle_count()
        )));
    }

    let culled = culled_triangles(mesh, clip)?;
    let mut edges = Vec::new();

    for (t, &is_culled) in culled.iter().enumerate() {
        if is_culled {
            continue;
        }
        let id = TriangleId(t as u32);
        let corners = mesh.triangle(t);
        for e in 0..EDGES_PER_TRIANGLE {
            let from = corners[e];
            let to = corners[(e + 1) % 3];
            let policy = EdgePolicy::from_raw(mesh.edge_policy_value(to as usize));
            if policy.draws(adjacency.neighbor(id, e), &culled) {
                edges.push(WireEdge {
                    triangle: id,
                    edge: e as u8,
                    from,
                    to,
                    policy,
                });
            }
        }
    }

    Ok(edges)
}
