//! CLI command implementations.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use glam::{Mat4, Vec3, Vec4};
use solidwire_gpu::{CpuFallback, GpuBackend, ResourceManager};
use solidwire_io::{validate_asset, validate_table, BakedAdjacency, MeshAsset, SolidWireConfig};
use solidwire_mesh::generators::{quad_grid, seamed_cube, tetrahedron, uv_sphere};
use solidwire_mesh::visibility::visible_edges;
use solidwire_mesh::{AdjacencyCache, AdjacencyTable, LogicalTopology, ScanStrategy, TriangleMesh};
use solidwire_telemetry::{EventBus, EventKind, TracingSink, VecSink};
use solidwire_types::{InstanceId, MaterialId};

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn load_config(path: Option<&str>) -> Result<SolidWireConfig, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => SolidWireConfig::load(path)?,
        None => SolidWireConfig::default(),
    })
}

fn parse_strategy(name: &str) -> Result<ScanStrategy, Box<dyn std::error::Error>> {
    match name {
        "exhaustive" => Ok(ScanStrategy::Exhaustive),
        "edge_indexed" | "edge-indexed" => Ok(ScanStrategy::EdgeIndexed),
        other => {
            eprintln!("Unknown strategy: {other}");
            eprintln!("Available: exhaustive, edge_indexed");
            Err("Unknown strategy".into())
        }
    }
}

fn print_topology(mesh: &TriangleMesh) {
    let topology = LogicalTopology::build(mesh);
    println!("Vertices:       {}", mesh.vertex_count());
    println!("Triangles:      {}", mesh.triangle_count());
    println!("Logical edges:  {}", topology.edge_count());
    println!("Boundary edges: {}", topology.boundary_edge_count());
    println!("Non-manifold:   {}", topology.non_manifold_edge_count());
    println!("Closed:         {}", topology.is_closed());
}

/// Build and bake the adjacency of a mesh asset.
pub fn build(
    mesh_path: &str,
    output_path: Option<&str>,
    strategy: Option<&str>,
    config_path: Option<&str>,
) -> CliResult {
    println!("SolidWire Build");
    println!("───────────────");
    println!();

    let config = load_config(config_path)?;
    let strategy = match strategy {
        Some(name) => parse_strategy(name)?,
        None => config.adjacency.strategy,
    };

    let mut asset = MeshAsset::load(mesh_path)?;
    if asset.ensure_logical_ids(config.adjacency.weld_tolerance)? {
        println!("Logical ids welded from positions.");
    }
    validate_asset(&asset)?;

    println!("Asset:          {}", asset.name);
    print_topology(&asset.mesh);

    let start = Instant::now();
    let baked = BakedAdjacency::bake(&asset.mesh, strategy)?;
    let elapsed = start.elapsed();
    let table = baked.table();

    println!("Strategy:       {:?}", strategy);
    println!("Paired slots:   {}", table.paired_slot_count());
    println!("Open slots:     {}", table.open_slot_count());
    println!("Build time:     {:.3}ms", elapsed.as_secs_f64() * 1000.0);

    let output = match output_path {
        Some(path) => path.to_string(),
        None => Path::new(mesh_path)
            .with_extension("bin")
            .to_string_lossy()
            .into_owned(),
    };
    baked.write(&output)?;
    println!();
    println!("Bake written to: {output}");
    Ok(())
}

/// Validate a mesh asset, bake or config.
///
/// Mesh assets are welded first when they carry no logical ids, as `build`
/// would do.
pub fn validate(path: &str, config_path: Option<&str>) -> CliResult {
    println!("SolidWire Validator");
    println!("───────────────────");
    println!();

    if path.ends_with(".toml") {
        println!("Validating config: {path}");
        let config = SolidWireConfig::load(path)?;
        println!("Strategy:       {:?}", config.adjacency.strategy);
        println!("Scratch sizing: {:?}", config.resources.scratch_sizing);
        println!("✅ Config is valid.");
    } else if path.ends_with(".json") {
        println!("Validating mesh asset: {path}");
        let config = load_config(config_path)?;
        let mut asset = MeshAsset::load(path)?;
        if asset.ensure_logical_ids(config.adjacency.weld_tolerance)? {
            println!("Logical ids welded from positions.");
        }
        validate_asset(&asset)?;
        print_topology(&asset.mesh);
        println!("✅ Mesh asset is valid.");
    } else if path.ends_with(".bin") {
        println!("Validating bake: {path}");
        let baked = BakedAdjacency::read(path)?;
        validate_table(&baked)?;
        println!("✅ Bake is valid ({} triangles).", baked.triangle_count);
    } else {
        return Err(format!("Unsupported file type: {path}").into());
    }

    Ok(())
}

/// Inspect a baked adjacency file.
pub fn inspect(path: &str) -> CliResult {
    println!("SolidWire Bake Inspector");
    println!("────────────────────────");
    println!();

    let baked = BakedAdjacency::read(path)?;
    println!("Format:       v{}", baked.format_version);
    println!("Mesh id:      {:016x}", baked.mesh_id.0);
    println!("Triangles:    {}", baked.triangle_count);
    println!("Strategy:     {:?}", baked.strategy);

    let table = baked.table();
    println!("Paired slots: {}", table.paired_slot_count());
    println!("Open slots:   {}", table.open_slot_count());
    println!("Symmetric:    {}", table.is_symmetric());

    let preview = table.triangle_count().min(8);
    if preview > 0 {
        println!();
        for t in 0..preview {
            println!("  t{:<5} {:?}", t, table.raw(t));
        }
        if table.triangle_count() > preview {
            println!("  ... {} more", table.triangle_count() - preview);
        }
    }

    Ok(())
}

fn demo_shape(name: &str) -> Result<TriangleMesh, Box<dyn std::error::Error>> {
    Ok(match name {
        "cube" => seamed_cube(1.0, true),
        "seamed-cube" => seamed_cube(1.0, false),
        "tetrahedron" => tetrahedron(0.5),
        "sphere" => uv_sphere(0.5, 12, 24),
        "grid" => quad_grid(8, 8, 1.0, 1.0),
        other => {
            eprintln!("Unknown shape: {other}");
            eprintln!("Available: cube, seamed-cube, tetrahedron, sphere, grid");
            return Err("Unknown shape".into());
        }
    })
}

/// Clip-space positions of `mesh` seen from a camera orbiting the origin.
fn orbit_clip_positions(mesh: &TriangleMesh, angle: f32) -> Vec<Vec4> {
    let eye = Vec3::new(3.0 * angle.cos(), 1.5, 3.0 * angle.sin());
    let view_proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_3, 1.0, 0.1, 100.0)
        * Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
    (0..mesh.vertex_count())
        .map(|i| view_proj * mesh.position_vec3(i).extend(1.0))
        .collect()
}

/// Attach procedural meshes and run frames through the resource manager.
pub fn demo(shape: &str, frames: u32, config_path: Option<&str>) -> CliResult {
    println!("SolidWire Demo");
    println!("══════════════");
    println!();

    let config = load_config(config_path)?;
    let mesh = demo_shape(shape)?;
    // A second, larger mesh forces the scratch pool to grow.
    let backdrop = uv_sphere(1.0, 24, 48);

    let sink = VecSink::new();
    let events = sink.handle();
    let mut bus = EventBus::new();
    bus.add_sink(Box::new(sink));
    bus.add_sink(Box::new(TracingSink::new()));

    let mut manager = ResourceManager::new(CpuFallback::new(), config.resources.clone())?
        .with_cache(AdjacencyCache::new(config.adjacency.strategy))
        .with_event_bus(bus);

    let mesh_id = mesh.fingerprint();
    let mut sets = Vec::new();
    for i in 0..2u64 {
        sets.push(manager.attach(InstanceId(i), mesh_id, &mesh, &[MaterialId(i as u32)])?);
    }
    sets.push(manager.attach(InstanceId(2), backdrop.fingerprint(), &backdrop, &[MaterialId(2)])?);

    println!("Shape:          {shape}");
    println!("Instances:      {}", manager.len());
    println!("Live buffers:   {}", manager.backend().live_buffer_count());
    println!("Scratch length: {}", manager.pool().capacity());
    println!();

    // The manager already holds the cached table for this mesh.
    let table = manager
        .set(sets[0])
        .map(|set| Arc::clone(&set.table))
        .ok_or("first demo set is missing")?;
    for frame in 0..frames {
        for &set in &sets {
            manager.refresh_frame(set)?;
            manager.verify_scratch(set)?;
        }
        let angle = frame as f32 * 0.4;
        let edges = visible_edges(&mesh, &table, &orbit_clip_positions(&mesh, angle))?;
        println!("Frame {:>3}: {} wire edges", manager.frame(), edges.len());
        manager.advance_frame();
    }

    let released = manager.release_all()?;
    manager.advance_frame();
    println!();
    println!("Released:       {released} sets");
    println!("Live buffers:   {}", manager.backend().live_buffer_count());

    let events = events.lock().map_err(|_| "event sink poisoned")?;
    let reissues = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::ScratchReissued { .. }))
        .count();
    let hits = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::AdjacencyCacheHit { .. }))
        .count();
    println!("Events:         {}", events.len());
    println!("Cache hits:     {hits}");
    println!("Reissues:       {reissues}");
    Ok(())
}

/// Time both scan strategies on a UV sphere.
pub fn benchmark(resolution: usize) -> CliResult {
    println!("SolidWire Adjacency Benchmark");
    println!("═════════════════════════════");
    println!();

    let mesh = uv_sphere(1.0, resolution, resolution * 2);
    println!("Mesh: uv_sphere ({} verts, {} tris)", mesh.vertex_count(), mesh.triangle_count());
    println!();

    let mut tables = Vec::new();
    for strategy in [ScanStrategy::Exhaustive, ScanStrategy::EdgeIndexed] {
        let start = Instant::now();
        let table = AdjacencyTable::from_mesh_with(&mesh, strategy)?;
        let elapsed = start.elapsed();
        println!(
            "  {:<12} {:>10.3}ms  ({} open slots)",
            format!("{:?}", strategy),
            elapsed.as_secs_f64() * 1000.0,
            table.open_slot_count()
        );
        tables.push(table);
    }

    println!();
    if tables[0] == tables[1] {
        println!("✅ Strategies produced identical tables.");
        Ok(())
    } else {
        Err("Strategies produced different tables".into())
    }
}
