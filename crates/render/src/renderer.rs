use crate::frame::{FramePlan, TextureBinding};
use std::fmt::Write;

/// Renderer-agnostic interface over a prepared frame.
///
/// A renderer only reads the plan; camera and scene state are owned by the
/// caller.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, plan: &FramePlan) -> Self::Output;
}

/// Renders a frame plan as human-readable text.
///
/// Used by the CLI and in tests where no GPU is available.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Optional per-entry labels, indexed by scene entry.
    labels: Vec<String>,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(labels: Vec<String>) -> Self {
        Self { labels }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, plan: &FramePlan) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame ({} draws, {} vertices) ===",
            plan.draws.len(),
            plan.total_vertices()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) dir=({:.2}, {:.2}, {:.2})",
            plan.eye.x, plan.eye.y, plan.eye.z, plan.direction.x, plan.direction.y, plan.direction.z
        );
        let light = plan.uniforms.light_position;
        let _ = writeln!(out, "Light: ({:.1}, {:.1}, {:.1})", light.x, light.y, light.z);

        for draw in &plan.draws {
            let label = self
                .labels
                .get(draw.entry)
                .map(String::as_str)
                .unwrap_or("-");
            let texture = match draw.texture {
                TextureBinding::Placeholder => "placeholder".to_string(),
                TextureBinding::Texture(id) => id.to_string(),
            };
            let _ = writeln!(
                out,
                "  [{:>2}] {:<12} {} verts={} color=({:.3}, {:.3}, {:.3}) texture={}",
                draw.entry,
                label,
                draw.mesh,
                draw.vertex_count,
                draw.color.r,
                draw.color.g,
                draw.color.b,
                texture
            );
        }

        out
    }
}
