//! # solidwire-gpu
//!
//! GPU buffer ownership for solid wireframe rendering.
//!
//! Provides a [`GpuBackend`] trait with an in-memory [`CpuFallback`], the
//! [`ScratchPool`] that sizes per-vertex clip-position buffers across
//! instances, and the [`ResourceManager`] that attaches, refreshes and
//! releases the buffers of each mesh instance.

pub mod backend;
pub mod buffers;
pub mod config;
pub mod pool;
pub mod resources;

pub use backend::{Binding, CpuFallback, GpuBackend};
pub use buffers::{BufferDesc, BufferUsage, ComputeBuffer};
pub use config::ResourceConfig;
pub use pool::{Registration, ScratchGrant, ScratchPool, ScratchSizing};
pub use resources::{ResourceManager, ResourceSet};
