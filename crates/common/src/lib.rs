//! Shared types used across the museum viewer crates.

mod types;

pub use types::{MeshId, Rgb, TextureId};

pub fn crate_info() -> &'static str {
    "museum-common v0.1.0"
}
