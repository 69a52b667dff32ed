//! SolidWire CLI — adjacency baking, validation and resource demos.

use clap::{Parser, Subcommand};
use tracing::Level;

mod commands;

#[derive(Parser)]
#[command(name = "solidwire")]
#[command(version, about = "SolidWire — triangle adjacency for solid wireframe rendering")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and bake the adjacency of a mesh asset.
    Build {
        /// Path to mesh asset (JSON).
        mesh: String,

        /// Output bake path. Defaults to the mesh path with a `.bin` extension.
        #[arg(short, long)]
        output: Option<String>,

        /// Scan strategy (exhaustive, edge_indexed). Overrides the config.
        #[arg(short, long)]
        strategy: Option<String>,

        /// Path to configuration (TOML).
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Validate a mesh asset (.json), bake (.bin) or config (.toml).
    Validate {
        /// Path to the file.
        path: String,

        /// Configuration (TOML) supplying the weld tolerance for mesh assets.
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Inspect a baked adjacency file.
    Inspect {
        /// Path to bake file.
        path: String,
    },

    /// Attach procedural meshes to the CPU backend and run frames.
    Demo {
        /// Shape (cube, seamed-cube, tetrahedron, sphere, grid).
        #[arg(short, long, default_value = "seamed-cube")]
        shape: String,

        /// Number of frames to run.
        #[arg(short, long, default_value_t = 3)]
        frames: u32,

        /// Path to configuration (TOML).
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Time both scan strategies on a UV sphere.
    Benchmark {
        /// Sphere stacks; slices are twice this.
        #[arg(short, long, default_value_t = 32)]
        resolution: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Build {
            mesh,
            output,
            strategy,
            config,
        } => commands::build(&mesh, output.as_deref(), strategy.as_deref(), config.as_deref()),
        Commands::Validate { path, config } => commands::validate(&path, config.as_deref()),
        Commands::Inspect { path } => commands::inspect(&path),
        Commands::Demo {
            shape,
            frames,
            config,
        } => commands::demo(&shape, frames, config.as_deref()),
        Commands::Benchmark { resolution } => commands::benchmark(resolution),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
