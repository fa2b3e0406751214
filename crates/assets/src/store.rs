use crate::{AssetError, MeshData, TextureData, load_bmp, load_obj};
use museum_common::{MeshId, TextureId};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A mesh together with the name it was loaded under.
#[derive(Debug, Clone)]
pub struct LoadedMesh {
    pub name: String,
    pub data: MeshData,
}

/// Counts reported by tools after loading a scene's assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssetSummary {
    pub meshes: usize,
    pub textures: usize,
    pub total_vertices: u64,
}

/// Asset registry.
///
/// Meshes are stored in load order and keep that order as their id. Textures
/// are indexed by a hash of their decoded pixels, so loading the same image
/// twice yields one entry.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    meshes: Vec<LoadedMesh>,
    textures: BTreeMap<TextureId, TextureData>,
    texture_paths: BTreeMap<PathBuf, TextureId>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register mesh data and return its id.
    pub fn add_mesh(&mut self, name: impl Into<String>, data: MeshData) -> MeshId {
        let id = MeshId(self.meshes.len() as u32);
        self.meshes.push(LoadedMesh {
            name: name.into(),
            data,
        });
        id
    }

    /// Load an OBJ file and register it.
    pub fn load_mesh(&mut self, path: impl AsRef<Path>, with_uvs: bool) -> Result<MeshId, AssetError> {
        let path = path.as_ref();
        let data = load_obj(path, with_uvs)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(self.add_mesh(name, data))
    }

    /// Register decoded texture data and return its content-addressed id.
    pub fn add_texture(&mut self, data: TextureData) -> TextureId {
        let id = content_hash(&data);
        self.textures.entry(id).or_insert(data);
        id
    }

    /// Load a BMP file and register it. Repeated paths are not decoded again.
    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> Result<TextureId, AssetError> {
        let path = path.as_ref();
        if let Some(id) = self.texture_paths.get(path) {
            return Ok(*id);
        }
        let data = load_bmp(path)?;
        let id = self.add_texture(data);
        self.texture_paths.insert(path.to_path_buf(), id);
        Ok(id)
    }

    pub fn get_mesh(&self, id: MeshId) -> Option<&LoadedMesh> {
        self.meshes.get(id.0 as usize)
    }

    pub fn get_texture(&self, id: TextureId) -> Option<&TextureData> {
        self.textures.get(&id)
    }

    /// Meshes in load order.
    pub fn meshes(&self) -> impl Iterator<Item = (MeshId, &LoadedMesh)> {
        self.meshes
            .iter()
            .enumerate()
            .map(|(i, m)| (MeshId(i as u32), m))
    }

    pub fn textures(&self) -> impl Iterator<Item = (TextureId, &TextureData)> {
        self.textures.iter().map(|(id, t)| (*id, t))
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn summary(&self) -> AssetSummary {
        AssetSummary {
            meshes: self.meshes.len(),
            textures: self.textures.len(),
            total_vertices: self
                .meshes
                .iter()
                .map(|m| m.data.vertex_count() as u64)
                .sum(),
        }
    }
}

fn content_hash(data: &TextureData) -> TextureId {
    let mut hasher = Sha256::new();
    hasher.update(data.width.to_le_bytes());
    hasher.update(data.height.to_le_bytes());
    hasher.update(&data.rgba);
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    TextureId(u64::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn triangle() -> MeshData {
        MeshData {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            uvs: vec![Default::default(); 3],
            normals: vec![Vec3::Z; 3],
        }
    }

    #[test]
    fn mesh_ids_follow_load_order() {
        let mut store = AssetStore::new();
        let a = store.add_mesh("a", triangle());
        let b = store.add_mesh("b", triangle());
        assert_eq!(a, MeshId(0));
        assert_eq!(b, MeshId(1));
        let names: Vec<_> = store.meshes().map(|(_, m)| m.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn identical_textures_dedup() {
        let mut store = AssetStore::new();
        let a = store.add_texture(TextureData::placeholder());
        let b = store.add_texture(TextureData::placeholder());
        assert_eq!(a, b);
        assert_eq!(store.texture_count(), 1);
    }

    #[test]
    fn distinct_textures_get_distinct_ids() {
        let mut store = AssetStore::new();
        let white = store.add_texture(TextureData::placeholder());
        let black = store.add_texture(TextureData {
            width: 1,
            height: 1,
            rgba: vec![0, 0, 0, 255],
        });
        assert_ne!(white, black);
        assert!(store.get_texture(black).is_some());
    }

    #[test]
    fn load_from_disk_and_summarize() {
        let dir = tempfile::tempdir().unwrap();
        let obj = dir.path().join("Tri.obj");
        std::fs::write(&obj, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let bmp = dir.path().join("t.bmp");
        image::RgbImage::new(4, 4)
            .save_with_format(&bmp, image::ImageFormat::Bmp)
            .unwrap();

        let mut store = AssetStore::new();
        let mesh = store.load_mesh(&obj, false).unwrap();
        let t1 = store.load_texture(&bmp).unwrap();
        let t2 = store.load_texture(&bmp).unwrap();
        assert_eq!(t1, t2);
        assert_eq!(store.get_mesh(mesh).unwrap().name, "Tri");
        assert_eq!(
            store.summary(),
            AssetSummary {
                meshes: 1,
                textures: 1,
                total_vertices: 3
            }
        );
    }

    #[test]
    fn failed_load_registers_nothing() {
        let mut store = AssetStore::new();
        assert!(store.load_mesh("/missing/Museum.obj", false).is_err());
        assert_eq!(store.mesh_count(), 0);
    }
}
