use museum_assets::{AssetError, AssetStore};
use museum_common::{MeshId, Rgb, TextureId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One row of the scene table, before anything is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDescription {
    /// OBJ path relative to the asset root.
    pub mesh_path: PathBuf,
    /// Whether the mesh's texture coordinates are read.
    pub has_uvs: bool,
    pub color: Rgb,
    /// BMP path relative to the asset root. `None` draws with the placeholder.
    pub texture_path: Option<PathBuf>,
}

impl EntryDescription {
    pub fn untextured(mesh_path: impl Into<PathBuf>, color: Rgb) -> Self {
        Self {
            mesh_path: mesh_path.into(),
            has_uvs: false,
            color,
            texture_path: None,
        }
    }

    pub fn textured(mesh_path: impl Into<PathBuf>, color: Rgb, texture_path: impl Into<PathBuf>) -> Self {
        Self {
            mesh_path: mesh_path.into(),
            has_uvs: true,
            color,
            texture_path: Some(texture_path.into()),
        }
    }
}

/// Ordered draw list. Row order is load order and draw order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub entries: Vec<EntryDescription>,
}

impl SceneDescription {
    /// The museum walkthrough: the building, the bust and its hair pieces,
    /// then the planet and the three paintings.
    pub fn museum() -> Self {
        let violet = Rgb::new(0.305256, 0.029248, 0.64);
        let skin = Rgb::new(1.0, 0.804, 0.58);
        let hair = Rgb::new(0.957, 1.0, 0.98);
        Self {
            entries: vec![
                EntryDescription::untextured("models/Museum.obj", violet),
                EntryDescription::untextured("models/Default.obj", skin),
                EntryDescription::untextured("models/Body.obj", skin),
                EntryDescription::untextured("models/Eyelashes.obj", hair),
                EntryDescription::untextured("models/Moustache.obj", hair),
                EntryDescription::untextured("models/Beards.obj", hair),
                EntryDescription::untextured("models/Hair.obj", hair),
                EntryDescription::textured("models/Planet.obj", Rgb::BLACK, "textures/nepplanetsculp.bmp"),
                EntryDescription::textured("models/Painting2.obj", Rgb::BLACK, "textures/Anime.bmp"),
                EntryDescription::textured("models/Painting1.obj", Rgb::BLACK, "textures/Planet.bmp"),
                EntryDescription::textured("models/Painting3.obj", Rgb::BLACK, "textures/God.bmp"),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct texture paths in order of first use.
    pub fn texture_paths(&self) -> Vec<&Path> {
        let mut out: Vec<&Path> = Vec::new();
        for path in self.entries.iter().filter_map(|e| e.texture_path.as_deref()) {
            if !out.contains(&path) {
                out.push(path);
            }
        }
        out
    }
}

/// A loaded draw entry. Immutable once the scene is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameEntry {
    pub mesh: MeshId,
    pub vertex_count: u32,
    pub color: Rgb,
    pub texture: Option<TextureId>,
}

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("scene entry {index}: {source}")]
    Asset {
        index: usize,
        #[source]
        source: AssetError,
    },
    #[error("texture {}: {source}", path.display())]
    Texture {
        path: PathBuf,
        #[source]
        source: AssetError,
    },
    #[error("scene has {entries} entries but {meshes} meshes are loaded")]
    MeshCountMismatch { entries: usize, meshes: usize },
    #[error("entry {index} refers to unknown {mesh}")]
    UnknownMesh { index: usize, mesh: MeshId },
    #[error("entry {index} refers to unknown {texture}")]
    UnknownTexture { index: usize, texture: TextureId },
}

/// The fixed, ordered list of draw entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    entries: Vec<FrameEntry>,
}

impl Scene {
    /// Build a scene over already-loaded assets.
    ///
    /// Fails unless there is exactly one entry per loaded mesh and every id
    /// refers to an asset in `store`.
    pub fn new(entries: Vec<FrameEntry>, store: &AssetStore) -> Result<Self, SceneError> {
        if entries.len() != store.mesh_count() {
            return Err(SceneError::MeshCountMismatch {
                entries: entries.len(),
                meshes: store.mesh_count(),
            });
        }
        for (index, entry) in entries.iter().enumerate() {
            if store.get_mesh(entry.mesh).is_none() {
                return Err(SceneError::UnknownMesh {
                    index,
                    mesh: entry.mesh,
                });
            }
            if let Some(texture) = entry.texture {
                if store.get_texture(texture).is_none() {
                    return Err(SceneError::UnknownTexture { index, texture });
                }
            }
        }
        Ok(Self { entries })
    }

    /// Load every texture, then every mesh in row order, resolving paths
    /// against `root`. Any failure aborts the whole load.
    pub fn load(description: &SceneDescription, root: &Path) -> Result<(Self, AssetStore), SceneError> {
        let mut store = AssetStore::new();

        for path in description.texture_paths() {
            store
                .load_texture(root.join(path))
                .map_err(|source| SceneError::Texture {
                    path: path.to_path_buf(),
                    source,
                })?;
        }

        let mut entries = Vec::with_capacity(description.len());
        for (index, row) in description.entries.iter().enumerate() {
            let mesh = store
                .load_mesh(root.join(&row.mesh_path), row.has_uvs)
                .map_err(|source| SceneError::Asset { index, source })?;
            let texture = row
                .texture_path
                .as_ref()
                .map(|p| store.load_texture(root.join(p)))
                .transpose()
                .map_err(|source| SceneError::Asset { index, source })?;
            let vertex_count = store
                .get_mesh(mesh)
                .map(|m| m.data.vertex_count())
                .unwrap_or_default();
            entries.push(FrameEntry {
                mesh,
                vertex_count,
                color: row.color,
                texture,
            });
        }

        let scene = Self::new(entries, &store)?;
        tracing::info!(
            "loaded scene: {} meshes, {} textures, {} vertices",
            scene.len(),
            store.texture_count(),
            scene.total_vertices()
        );
        Ok((scene, store))
    }

    pub fn entries(&self) -> &[FrameEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_vertices(&self) -> u64 {
        self.entries.iter().map(|e| e.vertex_count as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use museum_assets::TextureData;

    const TRI: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1 2/2 3/3\n";

    fn write_asset_root(description: &SceneDescription) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("models")).unwrap();
        std::fs::create_dir_all(dir.path().join("textures")).unwrap();
        for row in &description.entries {
            std::fs::write(dir.path().join(&row.mesh_path), TRI).unwrap();
        }
        for (i, path) in description.texture_paths().into_iter().enumerate() {
            let mut img = image::RgbImage::new(2, 2);
            img.put_pixel(0, 0, image::Rgb([i as u8, 0, 0]));
            img.save_with_format(dir.path().join(path), image::ImageFormat::Bmp)
                .unwrap();
        }
        dir
    }

    #[test]
    fn museum_table_shape() {
        let desc = SceneDescription::museum();
        assert_eq!(desc.len(), 11);
        assert_eq!(desc.entries[0].mesh_path, PathBuf::from("models/Museum.obj"));
        assert!(desc.entries[..7].iter().all(|e| e.texture_path.is_none() && !e.has_uvs));
        assert!(desc.entries[7..].iter().all(|e| e.texture_path.is_some() && e.has_uvs));
        assert_eq!(desc.texture_paths().len(), 4);
        assert_eq!(desc.texture_paths()[0], Path::new("textures/nepplanetsculp.bmp"));
    }

    #[test]
    fn texture_paths_are_deduplicated() {
        let desc = SceneDescription {
            entries: vec![
                EntryDescription::textured("a.obj", Rgb::BLACK, "t.bmp"),
                EntryDescription::untextured("b.obj", Rgb::WHITE),
                EntryDescription::textured("c.obj", Rgb::BLACK, "t.bmp"),
            ],
        };
        assert_eq!(desc.texture_paths(), vec![Path::new("t.bmp")]);
    }

    #[test]
    fn description_serializes() {
        let json = serde_json::to_string(&SceneDescription::museum()).unwrap();
        let back: SceneDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SceneDescription::museum());
    }

    #[test]
    fn load_keeps_row_order_and_counts() {
        let desc = SceneDescription::museum();
        let root = write_asset_root(&desc);
        let (scene, store) = Scene::load(&desc, root.path()).unwrap();

        assert_eq!(scene.len(), store.mesh_count());
        assert_eq!(store.texture_count(), 4);
        for (i, entry) in scene.entries().iter().enumerate() {
            assert_eq!(entry.mesh, MeshId(i as u32));
            assert_eq!(entry.vertex_count, 3);
            assert_eq!(entry.color, desc.entries[i].color);
            assert_eq!(entry.texture.is_some(), desc.entries[i].texture_path.is_some());
        }
        assert_eq!(scene.total_vertices(), 33);
    }

    #[test]
    fn missing_mesh_is_fatal() {
        let desc = SceneDescription::museum();
        let root = write_asset_root(&desc);
        std::fs::remove_file(root.path().join("models/Hair.obj")).unwrap();
        let err = Scene::load(&desc, root.path()).unwrap_err();
        assert!(matches!(err, SceneError::Asset { index: 6, .. }), "{err}");
    }

    #[test]
    fn missing_texture_is_fatal() {
        let desc = SceneDescription::museum();
        let root = write_asset_root(&desc);
        std::fs::remove_file(root.path().join("textures/God.bmp")).unwrap();
        let err = Scene::load(&desc, root.path()).unwrap_err();
        assert!(matches!(err, SceneError::Texture { .. }));
        assert!(err.to_string().contains("God.bmp"));
    }

    #[test]
    fn entry_count_must_match_meshes() {
        let mut store = AssetStore::new();
        let mesh = store.add_mesh("tri", museum_assets::parse_obj(TRI, true).unwrap());
        let entry = FrameEntry {
            mesh,
            vertex_count: 3,
            color: Rgb::WHITE,
            texture: None,
        };
        assert!(Scene::new(vec![entry], &store).is_ok());
        assert!(matches!(
            Scene::new(vec![entry, entry], &store),
            Err(SceneError::MeshCountMismatch { entries: 2, meshes: 1 })
        ));
    }

    #[test]
    fn unknown_texture_is_rejected() {
        let mut store = AssetStore::new();
        let mesh = store.add_mesh("tri", museum_assets::parse_obj(TRI, true).unwrap());
        let known = store.add_texture(TextureData::placeholder());
        let entry = FrameEntry {
            mesh,
            vertex_count: 3,
            color: Rgb::WHITE,
            texture: Some(TextureId(known.0 ^ 1)),
        };
        assert!(matches!(
            Scene::new(vec![entry], &store),
            Err(SceneError::UnknownTexture { index: 0, .. })
        ));
    }
}
