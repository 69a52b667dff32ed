//! Integration tests for solidwire-mesh.

use glam::{Vec2, Vec4};
use solidwire_mesh::generators::{quad_grid, seamed_cube, tetrahedron, uv_sphere};
use solidwire_mesh::visibility::{culled_triangles, is_back_facing, visible_edges};
use solidwire_mesh::weld::{weld_in_place, weld_logical_ids};
use solidwire_mesh::{AdjacencyConfig, AdjacencyTable, EdgePolicy, LogicalTopology, TriangleMesh};
use solidwire_types::constants::edge_policy;
use solidwire_types::{MeshId, SolidWireError};

// ─── TriangleMesh Tests ───────────────────────────────────────

fn make_single_triangle() -> TriangleMesh {
    TriangleMesh {
        pos_x: vec![0.0, 1.0, 0.0],
        pos_y: vec![0.0, 0.0, 1.0],
        pos_z: vec![0.0, 0.0, 0.0],
        logical_ids: vec![0, 1, 2],
        edge_policy: Vec::new(),
        indices: vec![0, 1, 2],
    }
}

#[test]
fn basic_counts() {
    let mesh = make_single_triangle();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.triangle_count(), 1);
}

#[test]
fn position_access() {
    let mesh = make_single_triangle();
    assert_eq!(mesh.position(1), [1.0, 0.0, 0.0]);
    assert_eq!(mesh.position_vec3(2), glam::Vec3::new(0.0, 1.0, 0.0));
}

#[test]
fn corner_logical_ids_follow_indices() {
    let mut mesh = make_single_triangle();
    mesh.logical_ids = vec![7, 8, 9];
    mesh.indices = vec![2, 0, 1];
    assert_eq!(mesh.corner_logical_ids(0), [9, 7, 8]);
    assert_eq!(mesh.corner_logical_id(1), 7);
}

#[test]
fn validate_ok() {
    assert!(make_single_triangle().validate().is_ok());
}

#[test]
fn validate_catches_inconsistent_lengths() {
    let mut mesh = make_single_triangle();
    mesh.pos_y.push(99.0);
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_index_count() {
    let mut mesh = make_single_triangle();
    mesh.indices.push(0);
    let err = mesh.validate().unwrap_err();
    assert!(matches!(err, SolidWireError::InvalidMesh(_)));
    assert!(err.to_string().contains("divisible by 3"));
}

#[test]
fn validate_catches_short_logical_ids() {
    let mut mesh = make_single_triangle();
    mesh.logical_ids.pop();
    let err = mesh.validate().unwrap_err();
    assert!(err.to_string().contains("shorter"));
}

#[test]
fn validate_catches_oob_index() {
    let mut mesh = make_single_triangle();
    mesh.indices[2] = 99;
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_edge_policy_length() {
    let mut mesh = make_single_triangle();
    mesh.edge_policy = vec![1, 1];
    assert!(mesh.validate().is_err());
}

#[test]
fn edge_policy_defaults_to_outline() {
    let mesh = make_single_triangle();
    assert_eq!(mesh.edge_policy_value(0), edge_policy::OUTLINE);
}

#[test]
fn from_interleaved() {
    let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let indices = vec![0, 1, 2];
    let mesh = TriangleMesh::from_interleaved(&positions, &indices, None).unwrap();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.pos_x, vec![0.0, 1.0, 0.0]);
    assert_eq!(mesh.logical_ids, vec![0, 1, 2]);
}

#[test]
fn from_interleaved_rejects_bad_ids() {
    let positions = vec![0.0; 9];
    let result = TriangleMesh::from_interleaved(&positions, &[0, 1, 2], Some(&[0, 1]));
    assert!(result.is_err());
}

#[test]
fn fingerprint_ignores_positions() {
    let a = quad_grid(3, 3, 1.0, 1.0);
    let b = quad_grid(3, 3, 5.0, 2.0);
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn fingerprint_tracks_logical_ids() {
    let raw = seamed_cube(1.0, false);
    let welded = seamed_cube(1.0, true);
    assert_ne!(raw.fingerprint(), welded.fingerprint());
}

#[test]
fn fingerprint_is_pinned() {
    // Bakes store this value; it must not change between builds or targets.
    assert_eq!(tetrahedron(1.0).fingerprint(), MeshId(0x6e9c_2072_6d10_b97d));
    assert_eq!(
        TriangleMesh::with_capacity(0, 0).fingerprint(),
        MeshId(0x8820_1fb9_60ff_6465)
    );
}

#[test]
fn mesh_serializes() {
    let mesh = seamed_cube(1.0, true);
    let json = serde_json::to_string(&mesh).unwrap();
    let recovered: TriangleMesh = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered.indices, mesh.indices);
    assert_eq!(recovered.logical_ids, mesh.logical_ids);
}

// ─── Generator Tests ──────────────────────────────────────────

#[test]
fn quad_grid_2x2() {
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    assert_eq!(mesh.vertex_count(), 9);
    assert_eq!(mesh.triangle_count(), 8);
    assert!(mesh.validate().is_ok());
}

#[test]
fn quad_grid_dimensions() {
    let mesh = quad_grid(4, 4, 2.0, 2.0);
    assert!((mesh.pos_x[0] - (-1.0)).abs() < 1e-6);
    assert!((mesh.pos_y[0] - 1.0).abs() < 1e-6);
    assert!((mesh.pos_x[4] - 1.0).abs() < 1e-6);
}

#[test]
fn tetrahedron_counts() {
    let mesh = tetrahedron(1.0);
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.triangle_count(), 4);
    assert!(mesh.validate().is_ok());
}

#[test]
fn seamed_cube_counts() {
    let mesh = seamed_cube(2.0, true);
    assert_eq!(mesh.vertex_count(), 24);
    assert_eq!(mesh.triangle_count(), 12);
    assert!(mesh.validate().is_ok());
    for i in 0..mesh.vertex_count() {
        for c in mesh.position(i) {
            assert!((c.abs() - 1.0).abs() < 1e-6);
        }
    }
}

#[test]
fn uv_sphere_basic() {
    let mesh = uv_sphere(1.0, 8, 16);
    assert_eq!(mesh.vertex_count(), 9 * 17);
    assert_eq!(mesh.triangle_count(), 2 * 8 * 16 - 2 * 16);
    assert!(mesh.validate().is_ok());
}

#[test]
fn uv_sphere_radius() {
    let mesh = uv_sphere(2.5, 8, 16);
    for i in 0..mesh.vertex_count() {
        let dist = mesh.position_vec3(i).length();
        assert!((dist - 2.5).abs() < 1e-4, "Vertex {} at distance {}", i, dist);
    }
}

#[test]
fn uv_sphere_seam_shares_logical_ids() {
    let slices = 16;
    let mesh = uv_sphere(1.0, 8, slices);
    let row = slices + 1;
    for i in 1..8 {
        assert_eq!(mesh.logical_ids[i * row], mesh.logical_ids[i * row + slices]);
    }
    assert!(mesh.logical_ids[..row].iter().all(|&id| id == 0));
}

// ─── Topology Tests ───────────────────────────────────────────

#[test]
fn topology_single_quad() {
    let mesh = quad_grid(1, 1, 1.0, 1.0);
    let topo = LogicalTopology::build(&mesh);
    assert_eq!(topo.edge_count(), 5);
    assert_eq!(topo.boundary_edge_count(), 4);
    assert_eq!(topo.non_manifold_edge_count(), 0);
    assert!(!topo.is_closed());
}

#[test]
fn topology_edge_lookup_is_undirected() {
    let mesh = quad_grid(1, 1, 1.0, 1.0);
    let topo = LogicalTopology::build(&mesh);
    // Diagonal between bottom-left (2) and top-right (1).
    assert_eq!(topo.triangles_on_edge(1, 2), &[0, 1]);
    assert_eq!(topo.triangles_on_edge(2, 1), &[0, 1]);
    assert!(topo.triangles_on_edge(0, 3).is_empty());
}

#[test]
fn topology_welded_cube_is_closed() {
    let topo = LogicalTopology::build(&seamed_cube(1.0, true));
    assert!(topo.is_closed());
    assert_eq!(topo.edge_count(), 18);
}

#[test]
fn topology_raw_cube_is_open() {
    let topo = LogicalTopology::build(&seamed_cube(1.0, false));
    assert_eq!(topo.boundary_edge_count(), 24);
}

#[test]
fn forward_candidates_are_sorted_and_later() {
    let topo = LogicalTopology::build(&quad_grid(3, 3, 1.0, 1.0));
    for t in 0..topo.triangle_count() {
        let candidates = topo.forward_candidates(t);
        assert!(candidates.windows(2).all(|w| w[0] < w[1]));
        assert!(candidates.iter().all(|&u| u as usize > t));
    }
}

// ─── Weld Tests ───────────────────────────────────────────────

#[test]
fn weld_merges_cube_corners() {
    let mesh = seamed_cube(1.0, false);
    let ids = weld_logical_ids(&mesh, 1e-4).unwrap();
    let mut distinct = ids.clone();
    distinct.sort_unstable();
    distinct.dedup();
    assert_eq!(distinct.len(), 8);
}

#[test]
fn weld_numbers_in_first_seen_order() {
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    let ids = weld_logical_ids(&mesh, 1e-4).unwrap();
    assert_eq!(ids, (0..9).collect::<Vec<u32>>());
}

#[test]
fn weld_rejects_bad_tolerance() {
    let mesh = quad_grid(1, 1, 1.0, 1.0);
    assert!(weld_logical_ids(&mesh, 0.0).is_err());
    assert!(weld_logical_ids(&mesh, f32::NAN).is_err());
}

#[test]
fn weld_in_place_reconnects_cube() {
    let mut mesh = seamed_cube(1.0, false);
    let distinct = weld_in_place(&mut mesh, 1e-4).unwrap();
    assert_eq!(distinct, 8);
    let table = AdjacencyTable::from_mesh(&mesh).unwrap();
    assert_eq!(table.open_slot_count(), 0);
}

// ─── Config Tests ─────────────────────────────────────────────

#[test]
fn adjacency_config_toml() {
    let config: AdjacencyConfig =
        toml::from_str("strategy = \"exhaustive\"\nweld_tolerance = 0.001\n").unwrap();
    assert_eq!(config.strategy, solidwire_mesh::ScanStrategy::Exhaustive);
    assert!(config.validate().is_ok());

    let defaults: AdjacencyConfig = toml::from_str("").unwrap();
    assert_eq!(defaults, AdjacencyConfig::default());
}

#[test]
fn adjacency_config_rejects_negative_tolerance() {
    let config = AdjacencyConfig {
        weld_tolerance: -1.0,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

// ─── Visibility Tests ─────────────────────────────────────────

fn clip_from_positions(mesh: &TriangleMesh) -> Vec<Vec4> {
    (0..mesh.vertex_count())
        .map(|i| mesh.position_vec3(i).extend(1.0))
        .collect()
}

#[test]
fn edge_policy_decoding() {
    assert_eq!(EdgePolicy::from_raw(edge_policy::FILLER), EdgePolicy::Never);
    assert_eq!(EdgePolicy::from_raw(edge_policy::HIDDEN), EdgePolicy::Never);
    assert_eq!(EdgePolicy::from_raw(edge_policy::OUTLINE), EdgePolicy::Conditional);
    assert_eq!(EdgePolicy::from_raw(edge_policy::ALWAYS), EdgePolicy::Always);
    assert_eq!(EdgePolicy::from_raw(5), EdgePolicy::Conditional);
}

#[test]
fn winding_decides_facing() {
    let a = Vec2::new(0.0, 0.0);
    let b = Vec2::new(1.0, 0.0);
    let c = Vec2::new(0.0, 1.0);
    assert!(!is_back_facing(a, b, c));
    assert!(is_back_facing(a, c, b));
}

#[test]
fn grid_facing_camera_is_not_culled() {
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    let culled = culled_triangles(&mesh, &clip_from_positions(&mesh)).unwrap();
    assert!(culled.iter().all(|&c| !c));
}

#[test]
fn outline_skips_shared_front_edges() {
    let mesh = quad_grid(1, 1, 1.0, 1.0);
    let table = AdjacencyTable::from_mesh(&mesh).unwrap();
    let edges = visible_edges(&mesh, &table, &clip_from_positions(&mesh)).unwrap();
    assert_eq!(edges.len(), 4);
    assert!(edges.iter().all(|e| e.policy == EdgePolicy::Conditional));
}

#[test]
fn always_policy_draws_every_front_edge() {
    let mut mesh = quad_grid(1, 1, 1.0, 1.0);
    mesh.edge_policy = vec![edge_policy::ALWAYS; mesh.vertex_count()];
    let table = AdjacencyTable::from_mesh(&mesh).unwrap();
    let edges = visible_edges(&mesh, &table, &clip_from_positions(&mesh)).unwrap();
    assert_eq!(edges.len(), 6);
}

#[test]
fn hidden_policy_draws_nothing() {
    let mut mesh = quad_grid(1, 1, 1.0, 1.0);
    mesh.edge_policy = vec![edge_policy::HIDDEN; mesh.vertex_count()];
    let table = AdjacencyTable::from_mesh(&mesh).unwrap();
    let edges = visible_edges(&mesh, &table, &clip_from_positions(&mesh)).unwrap();
    assert!(edges.is_empty());
}

#[test]
fn mirrored_view_culls_everything() {
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    let table = AdjacencyTable::from_mesh(&mesh).unwrap();
    let clip: Vec<Vec4> = clip_from_positions(&mesh)
        .into_iter()
        .map(|p| Vec4::new(-p.x, p.y, p.z, p.w))
        .collect();
    let edges = visible_edges(&mesh, &table, &clip).unwrap();
    assert!(edges.is_empty());
}

#[test]
fn short_clip_buffer_is_rejected() {
    let mesh = quad_grid(1, 1, 1.0, 1.0);
    assert!(culled_triangles(&mesh, &[Vec4::ONE; 2]).is_err());
}
