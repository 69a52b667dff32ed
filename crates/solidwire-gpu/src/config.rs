//! Resource manager configuration.

use serde::{Deserialize, Serialize};
use solidwire_types::constants::DEFAULT_SCRATCH_SLOT;
use solidwire_types::{SolidWireError, SolidWireResult};

use crate::pool::ScratchSizing;

/// Highest random-write slot; slot 0 aliases the color target.
pub const MAX_RANDOM_WRITE_SLOT: u32 = 7;

/// Settings for buffer ownership and per-frame binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// How scratch buffers are sized across instances.
    pub scratch_sizing: ScratchSizing,

    /// Random-write target slot the scratch buffer is bound to.
    pub scratch_slot: u32,

    /// Emit a telemetry event on every frame refresh.
    pub emit_frame_events: bool,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            scratch_sizing: ScratchSizing::default(),
            scratch_slot: DEFAULT_SCRATCH_SLOT,
            emit_frame_events: false,
        }
    }
}

impl ResourceConfig {
    /// Per-instance scratch sizing, otherwise default.
    pub fn per_instance() -> Self {
        Self {
            scratch_sizing: ScratchSizing::PerInstance,
            ..Default::default()
        }
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> SolidWireResult<()> {
        if !(1..=MAX_RANDOM_WRITE_SLOT).contains(&self.scratch_slot) {
            return Err(SolidWireError::InvalidConfig(format!(
                "scratch_slot must be in 1..={}, got {}",
                MAX_RANDOM_WRITE_SLOT, self.scratch_slot
            )));
        }
        Ok(())
    }
}
