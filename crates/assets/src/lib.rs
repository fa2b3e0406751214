//! Asset loading for the museum viewer: OBJ meshes and BMP textures.
//!
//! Meshes are identified by load order, textures by content hash. The renderer
//! consumes assets by id, never by raw file paths.

mod obj;
mod store;
mod texture;

pub use obj::{MeshData, ObjError, load_obj, parse_obj};
pub use store::{AssetStore, AssetSummary, LoadedMesh};
pub use texture::{TextureData, load_bmp};

use std::path::PathBuf;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse mesh {}: {source}", path.display())]
    Obj {
        path: PathBuf,
        #[source]
        source: ObjError,
    },
    #[error("failed to decode texture {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub fn crate_info() -> &'static str {
    "museum-assets v0.1.0"
}
