//! Core triangle mesh type with SoA (Structure of Arrays) layout.
//!
//! Besides positions and the flat index list, every raw vertex carries a
//! logical vertex id and an edge policy value. Raw vertices that were split
//! by a UV seam keep distinct raw indices but share one logical id, which is
//! what adjacency is computed over.

use serde::{Deserialize, Serialize};
use solidwire_types::constants::edge_policy;
use solidwire_types::{MeshId, SolidWireError, SolidWireResult};

/// A triangle mesh stored in Structure-of-Arrays layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    // --- Vertex data (SoA) ---
    /// X coordinates of all vertices.
    pub pos_x: Vec<f32>,
    /// Y coordinates of all vertices.
    pub pos_y: Vec<f32>,
    /// Z coordinates of all vertices.
    pub pos_z: Vec<f32>,

    /// Logical vertex id of each raw vertex.
    ///
    /// Two raw vertices represent the same topological vertex iff their
    /// logical ids are equal. Assets may omit them and weld on load.
    #[serde(default)]
    pub logical_ids: Vec<u32>,

    /// Raw edge policy value of each raw vertex. Empty means every edge
    /// uses the outline policy.
    #[serde(default)]
    pub edge_policy: Vec<i32>,

    // --- Triangle data ---
    /// Triangle indices — each triangle is [v0, v1, v2].
    /// Stored flat: `[t0v0, t0v1, t0v2, t1v0, t1v1, t1v2, ...]`
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos_x.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns the position of vertex `i` as `[x, y, z]`.
    #[inline]
    pub fn position(&self, i: usize) -> [f32; 3] {
        [self.pos_x[i], self.pos_y[i], self.pos_z[i]]
    }

    /// Returns the position as a `glam::Vec3`.
    #[inline]
    pub fn position_vec3(&self, i: usize) -> glam::Vec3 {
        glam::Vec3::new(self.pos_x[i], self.pos_y[i], self.pos_z[i])
    }

    /// Returns the three raw vertex indices of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        let base = t * 3;
        [self.indices[base], self.indices[base + 1], self.indices[base + 2]]
    }

    /// Returns the logical vertex ids of the three corners of triangle `t`.
    #[inline]
    pub fn corner_logical_ids(&self, t: usize) -> [u32; 3] {
        let [a, b, c] = self.triangle(t);
        [
            self.logical_ids[a as usize],
            self.logical_ids[b as usize],
            self.logical_ids[c as usize],
        ]
    }

    /// Logical id of the vertex referenced by flat index position `corner`.
    #[inline]
    pub fn corner_logical_id(&self, corner: usize) -> u32 {
        self.logical_ids[self.indices[corner] as usize]
    }

    /// Raw edge policy value of vertex `i`.
    #[inline]
    pub fn edge_policy_value(&self, i: usize) -> i32 {
        self.edge_policy.get(i).copied().unwrap_or(edge_policy::OUTLINE)
    }

    /// Sets the position of vertex `i`.
    #[inline]
    pub fn set_position(&mut self, i: usize, x: f32, y: f32, z: f32) {
        self.pos_x[i] = x;
        self.pos_y[i] = y;
        self.pos_z[i] = z;
    }

    /// Appends a vertex and returns its raw index.
    pub fn push_vertex(&mut self, position: [f32; 3], logical_id: u32) -> u32 {
        let index = self.pos_x.len() as u32;
        self.pos_x.push(position[0]);
        self.pos_y.push(position[1]);
        self.pos_z.push(position[2]);
        self.logical_ids.push(logical_id);
        if !self.edge_policy.is_empty() {
            self.edge_policy.push(edge_policy::OUTLINE);
        }
        index
    }

    /// Creates an empty mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_capacity: usize, triangle_capacity: usize) -> Self {
        Self {
            pos_x: Vec::with_capacity(vertex_capacity),
            pos_y: Vec::with_capacity(vertex_capacity),
            pos_z: Vec::with_capacity(vertex_capacity),
            logical_ids: Vec::with_capacity(vertex_capacity),
            edge_policy: Vec::new(),
            indices: Vec::with_capacity(triangle_capacity * 3),
        }
    }

    /// Validates mesh integrity.
    ///
    /// Checks:
    /// - All SoA arrays have the same length
    /// - Index count is divisible by 3
    /// - Every raw vertex has a logical id
    /// - Triangle indices are within bounds
    pub fn validate(&self) -> SolidWireResult<()> {
        let n = self.pos_x.len();

        if self.pos_y.len() != n || self.pos_z.len() != n {
            return Err(SolidWireError::InvalidMesh(
                "Position arrays have inconsistent lengths".into(),
            ));
        }

        if self.indices.len() % 3 != 0 {
            return Err(SolidWireError::InvalidMesh(format!(
                "Index count ({}) is not divisible by 3",
                self.indices.len()
            )));
        }

        if self.logical_ids.len() < n {
            return Err(SolidWireError::InvalidMesh(format!(
                "Logical ID count ({}) is shorter than vertex count ({})",
                self.logical_ids.len(),
                n
            )));
        }
        if self.logical_ids.len() != n {
            return Err(SolidWireError::InvalidMesh(format!(
                "Logical ID count ({}) != vertex count ({})",
                self.logical_ids.len(),
                n
            )));
        }

        if !self.edge_policy.is_empty() && self.edge_policy.len() != n {
            return Err(SolidWireError::InvalidMesh(format!(
                "Edge policy count ({}) != vertex count ({})",
                self.edge_policy.len(),
                n
            )));
        }

        for (i, &idx) in self.indices.iter().enumerate() {
            if idx as usize >= n {
                return Err(SolidWireError::InvalidMesh(format!(
                    "Index {} at position {} is out of range (vertex count: {})",
                    idx, i, n
                )));
            }
        }

        Ok(())
    }

    /// Content fingerprint of the mesh topology.
    ///
    /// Covers the index list and logical ids only, so two meshes that differ
    /// in positions alone share adjacency and share a fingerprint.
    ///
    /// The value is persisted in bakes, so it is a fixed FNV-1a over
    /// little-endian words: `u64` length, indices, `u64` length, logical ids.
    /// It does not depend on the toolchain or the target's pointer width.
    pub fn fingerprint(&self) -> MeshId {
        let mut hash = Fnv1a::new();
        hash.write_u64(self.indices.len() as u64);
        for &i in &self.indices {
            hash.write_u32(i);
        }
        hash.write_u64(self.logical_ids.len() as u64);
        for &id in &self.logical_ids {
            hash.write_u32(id);
        }
        MeshId(hash.finish())
    }

    /// Constructs a mesh from interleaved AoS position data.
    ///
    /// `logical_ids` of `None` gives every raw vertex its own identity,
    /// which is only correct for meshes without seams.
    pub fn from_interleaved(
        positions: &[f32],
        indices: &[u32],
        logical_ids: Option<&[u32]>,
    ) -> SolidWireResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(SolidWireError::InvalidMesh(
                "Interleaved positions length not divisible by 3".into(),
            ));
        }

        let n = positions.len() / 3;
        let mut mesh = Self::with_capacity(n, indices.len() / 3);

        for i in 0..n {
            mesh.pos_x.push(positions[i * 3]);
            mesh.pos_y.push(positions[i * 3 + 1]);
            mesh.pos_z.push(positions[i * 3 + 2]);
        }

        mesh.logical_ids = match logical_ids {
            Some(ids) => ids.to_vec(),
            None => (0..n as u32).collect(),
        };
        mesh.indices = indices.to_vec();

        mesh.validate()?;
        Ok(mesh)
    }
}

/// 64-bit FNV-1a.
struct Fnv1a(u64);

impl Fnv1a {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    fn new() -> Self {
        Self(Self::OFFSET)
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::PRIME);
        }
    }

    fn write_u32(&mut self, v: u32) {
        self.write(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    fn finish(&self) -> u64 {
        self.0
    }
}
