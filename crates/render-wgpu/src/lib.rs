//! wgpu render backend for the museum viewer.
//!
//! Uploads every mesh and texture once, then draws [`museum_render::FramePlan`]s
//! with a single lit, optionally textured pipeline.
//!
//! # Invariants
//! - GPU resources are created at startup and released once, in a fixed order.
//! - The renderer never mutates camera or scene state.
//! - Untextured draws bind a placeholder texture and clear the shader's
//!   `use_texture` flag.

mod context;
mod gpu;
mod shaders;

pub use context::GpuContext;
pub use gpu::MuseumRenderer;

use museum_common::{MeshId, TextureId};

/// Errors from GPU setup and frame submission.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
    #[error("frame plan draws {0} which was never uploaded")]
    MissingMesh(MeshId),
    #[error("frame plan binds {0} which was never uploaded")]
    MissingTexture(TextureId),
    #[error("frame plan has {draws} draws, renderer was built for {capacity}")]
    TooManyDraws { draws: usize, capacity: usize },
}

pub fn crate_info() -> &'static str {
    "museum-render-wgpu v0.1.0"
}
