//! Rendering core: camera update, scene description and draw sequencing.
//!
//! # Invariants
//! - Every entry is drawn exactly once per frame, in scene order.
//! - All entries share one identity model matrix.
//! - Projection parameters are fixed for the lifetime of the process.
//!
//! Nothing here touches the GPU. Backends consume a [`FramePlan`]; the
//! [`DebugTextRenderer`] renders one as text for tools and tests.

mod camera;
mod frame;
mod renderer;
mod scene;

pub use camera::{CameraController, CameraMatrices, CameraSettings, CameraState, FrameClock};
pub use frame::{DrawCommand, FramePlan, FrameUniforms, LIGHT_POSITION, TextureBinding};
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::{EntryDescription, FrameEntry, Scene, SceneDescription, SceneError};

pub fn crate_info() -> &'static str {
    "museum-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
