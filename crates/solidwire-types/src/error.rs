//! Error types for the SolidWire crates.
//!
//! All crates return `SolidWireResult<T>` from fallible operations.

use thiserror::Error;

/// Unified error type for SolidWire.
#[derive(Debug, Error)]
pub enum SolidWireError {
    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// GPU backend error.
    #[error("GPU error: {0}")]
    Gpu(String),

    /// A resource set's scratch buffer is smaller than the pool requires.
    #[error("Scratch buffer of resource set {set} holds {len} vertices, {required} required")]
    StaleScratchBuffer {
        set: u64,
        len: usize,
        required: usize,
    },

    /// An adjacency or resource invariant was violated.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Convenience alias for `Result<T, SolidWireError>`.
pub type SolidWireResult<T> = Result<T, SolidWireError>;
