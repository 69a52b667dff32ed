//! Top-level configuration file.
//!
//! ```toml
//! [adjacency]
//! strategy = "edge_indexed"
//! weld_tolerance = 1e-5
//!
//! [resources]
//! scratch_sizing = "shared_maximum"
//! scratch_slot = 1
//! emit_frame_events = false
//! ```
//!
//! Every table and key is optional.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use solidwire_gpu::ResourceConfig;
use solidwire_mesh::AdjacencyConfig;
use solidwire_types::{SolidWireError, SolidWireResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolidWireConfig {
    pub adjacency: AdjacencyConfig,
    pub resources: ResourceConfig,
}

impl SolidWireConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> SolidWireResult<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| SolidWireError::InvalidConfig(format!("TOML parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> SolidWireResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| SolidWireError::Serialization(format!("Config: {}", e)))
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> SolidWireResult<Self> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> SolidWireResult<()> {
        self.adjacency.validate()?;
        self.resources.validate()
    }
}
