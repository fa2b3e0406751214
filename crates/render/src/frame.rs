use crate::camera::CameraMatrices;
use crate::scene::Scene;
use glam::{Mat4, Vec3};
use museum_common::{MeshId, Rgb, TextureId};

/// World-space position of the single point light.
pub const LIGHT_POSITION: Vec3 = Vec3::new(4.0, 4.0, 4.0);

/// What the texture slot of a draw is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureBinding {
    /// The 1x1 placeholder is bound and the shader ignores it.
    Placeholder,
    Texture(TextureId),
}

impl TextureBinding {
    pub fn is_textured(&self) -> bool {
        matches!(self, TextureBinding::Texture(_))
    }
}

impl From<Option<TextureId>> for TextureBinding {
    fn from(texture: Option<TextureId>) -> Self {
        texture.map_or(TextureBinding::Placeholder, TextureBinding::Texture)
    }
}

/// Uniforms shared by every draw in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub mvp: Mat4,
    pub view: Mat4,
    pub model: Mat4,
    pub light_position: Vec3,
}

/// One non-indexed draw of a whole mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// Index of the scene entry this draw came from.
    pub entry: usize,
    pub mesh: MeshId,
    pub vertex_count: u32,
    pub color: Rgb,
    pub texture: TextureBinding,
}

/// Everything a backend needs to draw one frame, in submission order.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub uniforms: FrameUniforms,
    pub draws: Vec<DrawCommand>,
    pub eye: Vec3,
    pub direction: Vec3,
}

impl FramePlan {
    pub fn build(scene: &Scene, camera: &CameraMatrices) -> Self {
        let model = Mat4::IDENTITY;
        let uniforms = FrameUniforms {
            mvp: camera.projection * camera.view * model,
            view: camera.view,
            model,
            light_position: LIGHT_POSITION,
        };
        let draws = scene
            .entries()
            .iter()
            .enumerate()
            .map(|(entry, e)| DrawCommand {
                entry,
                mesh: e.mesh,
                vertex_count: e.vertex_count,
                color: e.color,
                texture: e.texture.into(),
            })
            .collect();
        Self {
            uniforms,
            draws,
            eye: camera.eye,
            direction: camera.direction,
        }
    }

    pub fn total_vertices(&self) -> u64 {
        self.draws.iter().map(|d| d.vertex_count as u64).sum()
    }
}
