use crate::AssetError;
use std::path::Path;

/// Decoded RGBA8 texture, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    /// 1x1 opaque white texture bound for entries that are not textured.
    pub fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![255, 255, 255, 255],
        }
    }

    /// Bytes per row of the tightly packed pixel data.
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

/// Read and decode a BMP file into RGBA8.
pub fn load_bmp(path: impl AsRef<Path>) -> Result<TextureData, AssetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image::load_from_memory_with_format(&bytes, image::ImageFormat::Bmp)
        .map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = (image.width(), image.height());
    tracing::debug!("loaded {} ({width}x{height})", path.display());
    Ok(TextureData {
        width,
        height,
        rgba: image.into_raw(),
    })
}
