//! Procedural mesh generators for tests, demos and benchmarks.
//!
//! These generators produce deterministic meshes with consistent outward
//! winding. Generators that duplicate raw vertices along UV seams also
//! emit the logical ids that weld them back together.

use crate::mesh::TriangleMesh;

/// Generates a flat rectangular quad grid in the XY plane.
///
/// The grid spans `[-width/2, width/2]` in X and `[-height/2, height/2]` in Y,
/// centered at the origin at Z=0. Vertices are shared, so logical ids equal
/// raw indices.
///
/// # Example
/// ```
/// use solidwire_mesh::generators::quad_grid;
/// let mesh = quad_grid(2, 2, 1.0, 1.0);
/// assert_eq!(mesh.vertex_count(), 9);  // 3×3 vertices
/// assert_eq!(mesh.triangle_count(), 8); // 2×2 quads × 2 tris each
/// ```
pub fn quad_grid(cols: usize, rows: usize, width: f32, height: f32) -> TriangleMesh {
    let verts_x = cols + 1;
    let verts_y = rows + 1;
    let mut mesh = TriangleMesh::with_capacity(verts_x * verts_y, cols * rows * 2);

    let half_w = width / 2.0;
    let half_h = height / 2.0;

    for j in 0..verts_y {
        for i in 0..verts_x {
            let u = i as f32 / cols as f32;
            let v = j as f32 / rows as f32;
            let index = mesh.vertex_count() as u32;
            mesh.push_vertex([-half_w + u * width, half_h - v * height, 0.0], index);
        }
    }

    for j in 0..rows {
        for i in 0..cols {
            let top_left = (j * verts_x + i) as u32;
            let top_right = top_left + 1;
            let bot_left = top_left + verts_x as u32;
            let bot_right = bot_left + 1;

            mesh.indices.extend_from_slice(&[top_left, bot_left, top_right]);
            mesh.indices.extend_from_slice(&[top_right, bot_left, bot_right]);
        }
    }

    mesh
}

/// Generates a regular tetrahedron: 4 vertices, 4 triangles, closed.
pub fn tetrahedron(size: f32) -> TriangleMesh {
    let mut mesh = TriangleMesh::with_capacity(4, 4);
    let s = size;
    for (i, p) in [[s, s, s], [-s, -s, s], [-s, s, -s], [s, -s, -s]]
        .into_iter()
        .enumerate()
    {
        mesh.push_vertex(p, i as u32);
    }
    mesh.indices = vec![0, 1, 2, 0, 3, 1, 0, 2, 3, 1, 3, 2];
    mesh
}

/// Generates an axis-aligned cube with one set of 4 raw vertices per face,
/// as a UV-unwrapped export would produce: 24 vertices, 12 triangles.
///
/// With `welded` the raw vertices at each cube corner share that corner's
/// logical id. Without it every raw vertex is its own logical vertex, which
/// leaves the faces topologically disconnected.
pub fn seamed_cube(size: f32, welded: bool) -> TriangleMesh {
    let h = size / 2.0;
    // Corner c has bit 0 = +X, bit 1 = +Y, bit 2 = +Z.
    let corner = |c: u32| {
        [
            if c & 1 != 0 { h } else { -h },
            if c & 2 != 0 { h } else { -h },
            if c & 4 != 0 { h } else { -h },
        ]
    };
    // Counter-clockwise seen from outside.
    const FACES: [[u32; 4]; 6] = [
        [4, 5, 7, 6], // +Z
        [1, 0, 2, 3], // -Z
        [5, 1, 3, 7], // +X
        [0, 4, 6, 2], // -X
        [6, 7, 3, 2], // +Y
        [0, 1, 5, 4], // -Y
    ];

    let mut mesh = TriangleMesh::with_capacity(24, 12);
    for face in FACES {
        let base = mesh.vertex_count() as u32;
        for (k, &c) in face.iter().enumerate() {
            let logical = if welded { c } else { base + k as u32 };
            mesh.push_vertex(corner(c), logical);
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Generates a UV sphere centered at the origin.
///
/// The seam column and both pole rows are duplicated in the vertex buffer
/// (as a UV layout requires) and welded by logical id, so the logical
/// topology is a closed manifold. Pole triangles that would be degenerate
/// are skipped.
///
/// # Arguments
/// - `radius` — Sphere radius.
/// - `stacks` — Number of latitude divisions (at least 2).
/// - `slices` — Number of longitude divisions (at least 3).
pub fn uv_sphere(radius: f32, stacks: usize, slices: usize) -> TriangleMesh {
    let stacks = stacks.max(2);
    let slices = slices.max(3);
    let vertex_count = (stacks + 1) * (slices + 1);
    let tri_count = 2 * stacks * slices - 2 * slices;
    let mut mesh = TriangleMesh::with_capacity(vertex_count, tri_count);

    let south_pole = (1 + (stacks - 1) * slices) as u32;
    for i in 0..=stacks {
        let phi = std::f32::consts::PI * i as f32 / stacks as f32; // 0 to PI
        let sin_phi = phi.sin();
        let cos_phi = phi.cos();

        for j in 0..=slices {
            let theta = 2.0 * std::f32::consts::PI * j as f32 / slices as f32;
            let position = [
                radius * sin_phi * theta.cos(),
                radius * cos_phi,
                radius * sin_phi * theta.sin(),
            ];
            let logical = if i == 0 {
                0
            } else if i == stacks {
                south_pole
            } else {
                (1 + (i - 1) * slices + j % slices) as u32
            };
            mesh.push_vertex(position, logical);
        }
    }

    for i in 0..stacks {
        for j in 0..slices {
            let a = (i * (slices + 1) + j) as u32;
            let b = a + (slices + 1) as u32;

            // Skip degenerate triangles at poles
            if i != 0 {
                mesh.indices.extend_from_slice(&[a, b, a + 1]);
            }
            if i != stacks - 1 {
                mesh.indices.extend_from_slice(&[a + 1, b, b + 1]);
            }
        }
    }

    mesh
}
