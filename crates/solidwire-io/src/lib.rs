//! # solidwire-io
//!
//! Mesh asset contract, baked adjacency files, configuration loading and
//! validation.
//!
//! Defines the boundary types that external systems (exporters, the CLI,
//! an asset pipeline) use to hand data to the SolidWire runtime.

pub mod config;
pub mod contract;
pub mod validator;

pub use config::SolidWireConfig;
pub use contract::{BakedAdjacency, MeshAsset, BAKE_FORMAT_VERSION};
pub use validator::{validate_asset, validate_baked, validate_table};
