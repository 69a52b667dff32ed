//! Adjacency configuration.

use serde::{Deserialize, Serialize};
use solidwire_types::constants::DEFAULT_WELD_TOLERANCE;
use solidwire_types::{SolidWireError, SolidWireResult};

use crate::adjacency::ScanStrategy;

/// Settings for building adjacency and assigning logical ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjacencyConfig {
    /// How the forward scan enumerates candidate neighbors.
    pub strategy: ScanStrategy,

    /// Grid size used when welding raw vertices into logical vertices.
    pub weld_tolerance: f32,
}

impl Default for AdjacencyConfig {
    fn default() -> Self {
        Self {
            strategy: ScanStrategy::default(),
            weld_tolerance: DEFAULT_WELD_TOLERANCE,
        }
    }
}

impl AdjacencyConfig {
    /// Checks that every value is usable.
    pub fn validate(&self) -> SolidWireResult<()> {
        if !(self.weld_tolerance.is_finite() && self.weld_tolerance > 0.0) {
            return Err(SolidWireError::InvalidConfig(format!(
                "weld_tolerance must be positive and finite, got {}",
                self.weld_tolerance
            )));
        }
        Ok(())
    }
}
