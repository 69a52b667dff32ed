//! Integration tests for solidwire-io.

use solidwire_gpu::ScratchSizing;
use solidwire_io::config::SolidWireConfig;
use solidwire_io::contract::{BakedAdjacency, MeshAsset, BAKE_FORMAT_VERSION};
use solidwire_io::validator::{validate_asset, validate_baked, validate_table};
use solidwire_mesh::generators::{quad_grid, seamed_cube, tetrahedron, uv_sphere};
use solidwire_mesh::{AdjacencyTable, ScanStrategy};
use solidwire_types::SolidWireError;

// ─── Asset Tests ──────────────────────────────────────────────

#[test]
fn asset_json_round_trip() {
    let asset = MeshAsset::new("cube", seamed_cube(1.0, true));
    let json = asset.to_json().unwrap();
    let recovered = MeshAsset::from_json(&json).unwrap();
    assert_eq!(recovered.name, "cube");
    assert_eq!(recovered.mesh.logical_ids, asset.mesh.logical_ids);
    assert_eq!(recovered.mesh_id(), asset.mesh_id());
}

#[test]
fn asset_without_logical_ids_is_welded() {
    let json = r#"{
        "name": "split_quad",
        "mesh": {
            "pos_x": [0.0, 1.0, 0.0, 1.0, 0.0, 1.0],
            "pos_y": [0.0, 0.0, 1.0, 0.0, 1.0, 1.0],
            "pos_z": [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            "indices": [0, 1, 2, 3, 5, 4]
        }
    }"#;
    let mut asset = MeshAsset::from_json(json).unwrap();
    assert!(asset.mesh.logical_ids.is_empty());
    assert!(validate_asset(&asset).is_err());

    assert!(asset.ensure_logical_ids(1e-4).unwrap());
    assert_eq!(asset.mesh.logical_ids, vec![0, 1, 2, 1, 2, 3]);
    assert!(validate_asset(&asset).is_ok());
    assert!(!asset.ensure_logical_ids(1e-4).unwrap());

    let table = AdjacencyTable::from_mesh(&asset.mesh).unwrap();
    assert_eq!(table.raw(0), [-1, 1, -1]);
}

#[test]
fn loaded_asset_is_welded_with_configured_tolerance() {
    // The second triangle's copies sit 3e-4 away from the first triangle's.
    let json = r#"{
        "name": "loose_quad",
        "mesh": {
            "pos_x": [0.0, 1.0, 0.0, 1.0003, 0.0003, 1.0],
            "pos_y": [0.0, 0.0, 1.0, 0.0, 1.0, 1.0],
            "pos_z": [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            "indices": [0, 1, 2, 3, 5, 4]
        }
    }"#;
    let path = std::env::temp_dir().join(format!("solidwire_asset_{}.json", std::process::id()));
    MeshAsset::from_json(json).unwrap().save(&path).unwrap();

    let mut strict = MeshAsset::load(&path).unwrap();
    assert!(validate_asset(&strict).is_err());
    let defaults = SolidWireConfig::default();
    assert!(strict.ensure_logical_ids(defaults.adjacency.weld_tolerance).unwrap());
    assert!(validate_asset(&strict).is_ok());
    assert_eq!(AdjacencyTable::from_mesh(&strict.mesh).unwrap().paired_slot_count(), 0);

    let config = SolidWireConfig::from_toml_str("[adjacency]\nweld_tolerance = 0.001").unwrap();
    let mut loose = MeshAsset::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert!(loose.ensure_logical_ids(config.adjacency.weld_tolerance).unwrap());
    assert!(validate_asset(&loose).is_ok());
    assert_eq!(loose.mesh.logical_ids, vec![0, 1, 2, 1, 2, 3]);
    assert_eq!(AdjacencyTable::from_mesh(&loose.mesh).unwrap().paired_slot_count(), 2);
}

#[test]
fn asset_parse_error_is_serialization() {
    let result = MeshAsset::from_json("{ not json");
    assert!(matches!(result, Err(SolidWireError::Serialization(_))));
}

#[test]
fn validate_asset_rejects_bad_meshes() {
    let mut asset = MeshAsset::new("grid", quad_grid(2, 2, 1.0, 1.0));
    assert!(validate_asset(&asset).is_ok());

    asset.mesh.indices.push(0);
    assert!(matches!(validate_asset(&asset), Err(SolidWireError::InvalidMesh(_))));

    let unnamed = MeshAsset::new("  ", tetrahedron(1.0));
    assert!(validate_asset(&unnamed).is_err());
}

// ─── Bake Tests ───────────────────────────────────────────────

#[test]
fn bake_binary_round_trip() {
    let mesh = uv_sphere(1.0, 6, 8);
    let baked = BakedAdjacency::bake(&mesh, ScanStrategy::EdgeIndexed).unwrap();
    assert_eq!(baked.format_version, BAKE_FORMAT_VERSION);
    assert_eq!(baked.triangle_count, mesh.triangle_count());

    let bytes = baked.to_bytes().unwrap();
    let recovered = BakedAdjacency::from_bytes(&bytes).unwrap();
    assert_eq!(recovered, baked);
    assert_eq!(recovered.into_table(), AdjacencyTable::from_mesh(&mesh).unwrap());
}

#[test]
fn bake_file_round_trip() {
    let mesh = tetrahedron(1.0);
    let baked = BakedAdjacency::bake(&mesh, ScanStrategy::Exhaustive).unwrap();
    let path = std::env::temp_dir().join(format!("solidwire_bake_{}.bin", std::process::id()));
    baked.write(&path).unwrap();
    let recovered = BakedAdjacency::read(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(recovered.strategy, ScanStrategy::Exhaustive);
    assert!(validate_baked(&recovered, &mesh).is_ok());
}

#[test]
fn bake_rejects_other_versions() {
    let mut baked = BakedAdjacency::bake(&tetrahedron(1.0), ScanStrategy::default()).unwrap();
    baked.format_version = BAKE_FORMAT_VERSION + 1;
    let bytes = baked.to_bytes().unwrap();
    assert!(matches!(
        BakedAdjacency::from_bytes(&bytes),
        Err(SolidWireError::Serialization(_))
    ));
}

#[test]
fn truncated_bake_fails() {
    let bytes = BakedAdjacency::bake(&tetrahedron(1.0), ScanStrategy::default())
        .unwrap()
        .to_bytes()
        .unwrap();
    assert!(BakedAdjacency::from_bytes(&bytes[..bytes.len() / 2]).is_err());
}

// ─── Bake Validation Tests ────────────────────────────────────

#[test]
fn asymmetric_bake_is_rejected() {
    let mut baked = BakedAdjacency::bake(&tetrahedron(1.0), ScanStrategy::default()).unwrap();
    baked.neighbors[0] = [-1, -1, -1];
    assert!(matches!(
        validate_table(&baked),
        Err(SolidWireError::InvariantViolation(_))
    ));
}

#[test]
fn out_of_range_bake_is_rejected() {
    let mut baked = BakedAdjacency::bake(&tetrahedron(1.0), ScanStrategy::default()).unwrap();
    baked.neighbors[1][0] = 17;
    assert!(validate_table(&baked).is_err());
    baked.neighbors[1][0] = -3;
    assert!(validate_table(&baked).is_err());
}

#[test]
fn bake_for_other_mesh_is_rejected() {
    let baked = BakedAdjacency::bake(&seamed_cube(1.0, true), ScanStrategy::default()).unwrap();
    let unwelded = seamed_cube(1.0, false);
    assert!(validate_table(&baked).is_ok());
    assert!(matches!(
        validate_baked(&baked, &unwelded),
        Err(SolidWireError::InvariantViolation(_))
    ));
    assert!(validate_baked(&baked, &tetrahedron(1.0)).is_err());
}

// ─── Config Tests ─────────────────────────────────────────────

#[test]
fn empty_config_uses_defaults() {
    let config = SolidWireConfig::from_toml_str("").unwrap();
    assert_eq!(config, SolidWireConfig::default());
    assert_eq!(config.adjacency.strategy, ScanStrategy::EdgeIndexed);
}

#[test]
fn config_sections_parse() {
    let text = r#"
        [adjacency]
        strategy = "exhaustive"
        weld_tolerance = 0.001

        [resources]
        scratch_sizing = "per_instance"
        scratch_slot = 2
    "#;
    let config = SolidWireConfig::from_toml_str(text).unwrap();
    assert_eq!(config.adjacency.strategy, ScanStrategy::Exhaustive);
    assert!((config.adjacency.weld_tolerance - 0.001).abs() < 1e-9);
    assert_eq!(config.resources.scratch_sizing, ScratchSizing::PerInstance);
    assert_eq!(config.resources.scratch_slot, 2);

    let written = config.to_toml_string().unwrap();
    assert_eq!(SolidWireConfig::from_toml_str(&written).unwrap(), config);
}

#[test]
fn invalid_config_values_are_rejected() {
    let bad_tolerance = "[adjacency]\nweld_tolerance = -1.0";
    assert!(matches!(
        SolidWireConfig::from_toml_str(bad_tolerance),
        Err(SolidWireError::InvalidConfig(_))
    ));
    let bad_slot = "[resources]\nscratch_slot = 9";
    assert!(SolidWireConfig::from_toml_str(bad_slot).is_err());
    let bad_strategy = "[adjacency]\nstrategy = \"parallel\"";
    assert!(SolidWireConfig::from_toml_str(bad_strategy).is_err());
}
