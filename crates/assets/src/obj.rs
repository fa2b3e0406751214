use crate::AssetError;
use glam::{Vec2, Vec3};
use std::path::Path;

/// De-indexed triangle list: three entries per triangle in every attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
}

impl MeshData {
    /// Number of vertices a non-indexed draw of this mesh consumes.
    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    pub fn triangle_count(&self) -> u32 {
        self.vertex_count() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Errors from the OBJ reader. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ObjError {
    #[error("line {line}: malformed {what}: {text:?}")]
    Malformed {
        line: usize,
        what: &'static str,
        text: String,
    },
    #[error("line {line}: face has {count} vertices, need at least 3")]
    DegenerateFace { line: usize, count: usize },
    #[error("line {line}: {kind} index {index} out of range ({len} defined)")]
    IndexOutOfRange {
        line: usize,
        kind: &'static str,
        index: i64,
        len: usize,
    },
    #[error("mesh has no faces")]
    NoFaces,
}

#[derive(Clone, Copy)]
struct FaceVertex {
    position: usize,
    uv: Option<usize>,
    normal: Option<usize>,
}

/// Read and parse an OBJ file.
///
/// With `with_uvs` unset every vertex gets a zero texture coordinate, even if
/// the file defines `vt` records.
pub fn load_obj(path: impl AsRef<Path>, with_uvs: bool) -> Result<MeshData, AssetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // Exporters write object and group names in arbitrary encodings.
    let source = String::from_utf8_lossy(&bytes);
    let mesh = parse_obj(&source, with_uvs).map_err(|source| AssetError::Obj {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        "loaded {} ({} vertices, uvs={with_uvs})",
        path.display(),
        mesh.vertex_count()
    );
    Ok(mesh)
}

/// Parse OBJ text into a de-indexed triangle list.
///
/// Polygons are fan-triangulated. Statements other than `v`, `vt`, `vn` and
/// `f` are ignored. Texture coordinates are flipped vertically so that
/// `(0, 0)` is the top-left texel.
pub fn parse_obj(source: &str, with_uvs: bool) -> Result<MeshData, ObjError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<Vec2> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut mesh = MeshData::default();

    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let text = raw.split('#').next().unwrap_or("").trim();
        let mut parts = text.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };

        match tag {
            "v" => {
                let [x, y, z] = parse_floats::<3>(&mut parts, line, "vertex", text)?;
                positions.push(Vec3::new(x, y, z));
            }
            "vt" => {
                let [u, v] = parse_floats::<2>(&mut parts, line, "texture coordinate", text)?;
                uvs.push(Vec2::new(u, 1.0 - v));
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(&mut parts, line, "normal", text)?;
                normals.push(Vec3::new(x, y, z));
            }
            "f" => {
                let corners = parts
                    .map(|token| {
                        parse_face_vertex(token, line, positions.len(), uvs.len(), normals.len())
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if corners.len() < 3 {
                    return Err(ObjError::DegenerateFace {
                        line,
                        count: corners.len(),
                    });
                }
                for k in 1..corners.len() - 1 {
                    for corner in [corners[0], corners[k], corners[k + 1]] {
                        mesh.positions.push(positions[corner.position]);
                        mesh.uvs.push(match (with_uvs, corner.uv) {
                            (true, Some(i)) => uvs[i],
                            _ => Vec2::ZERO,
                        });
                        mesh.normals
                            .push(corner.normal.map(|i| normals[i]).unwrap_or(Vec3::ZERO));
                    }
                }
            }
            _ => {}
        }
    }

    if mesh.is_empty() {
        return Err(ObjError::NoFaces);
    }
    Ok(mesh)
}

fn parse_floats<'a, const N: usize>(
    parts: &mut impl Iterator<Item = &'a str>,
    line: usize,
    what: &'static str,
    text: &str,
) -> Result<[f32; N], ObjError> {
    let malformed = || ObjError::Malformed {
        line,
        what,
        text: text.to_string(),
    };
    let mut out = [0.0; N];
    for slot in &mut out {
        *slot = parts
            .next()
            .and_then(|p| p.parse::<f32>().ok())
            .ok_or_else(malformed)?;
    }
    Ok(out)
}

fn parse_face_vertex(
    token: &str,
    line: usize,
    position_count: usize,
    uv_count: usize,
    normal_count: usize,
) -> Result<FaceVertex, ObjError> {
    let mut fields = token.split('/');
    let position = match fields.next() {
        Some(p) if !p.is_empty() => resolve_index(p, line, "vertex", position_count)?,
        _ => {
            return Err(ObjError::Malformed {
                line,
                what: "face vertex",
                text: token.to_string(),
            });
        }
    };
    let uv = match fields.next() {
        Some(t) if !t.is_empty() => Some(resolve_index(t, line, "texture coordinate", uv_count)?),
        _ => None,
    };
    let normal = match fields.next() {
        Some(n) if !n.is_empty() => Some(resolve_index(n, line, "normal", normal_count)?),
        _ => None,
    };
    Ok(FaceVertex {
        position,
        uv,
        normal,
    })
}

/// OBJ indices are 1-based; negative values count back from the last record.
fn resolve_index(
    text: &str,
    line: usize,
    kind: &'static str,
    len: usize,
) -> Result<usize, ObjError> {
    let index: i64 = text.parse().map_err(|_| ObjError::Malformed {
        line,
        what: "index",
        text: text.to_string(),
    })?;
    let resolved = if index > 0 {
        index - 1
    } else {
        len as i64 + index
    };
    if index == 0 || resolved < 0 || resolved >= len as i64 {
        return Err(ObjError::IndexOutOfRange {
            line,
            kind,
            index,
            len,
        });
    }
    Ok(resolved as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
# one triangle
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
";

    #[test]
    fn parse_single_triangle() {
        let mesh = parse_obj(TRIANGLE, true).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.positions[1], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.normals[2], Vec3::Z);
        // v flipped to top-left origin
        assert_eq!(mesh.uvs[0], Vec2::new(0.0, 1.0));
        assert_eq!(mesh.uvs[2], Vec2::new(0.0, 0.0));
    }

    #[test]
    fn uvs_zeroed_when_not_requested() {
        let mesh = parse_obj(TRIANGLE, false).unwrap();
        assert!(mesh.uvs.iter().all(|uv| *uv == Vec2::ZERO));
        assert_eq!(mesh.uvs.len(), 3);
    }

    #[test]
    fn quad_is_fan_triangulated() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let mesh = parse_obj(src, false).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.positions[3], Vec3::ZERO);
        assert_eq!(mesh.positions[4], Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(mesh.positions[5], Vec3::new(0.0, 1.0, 0.0));
        assert!(mesh.normals.iter().all(|n| *n == Vec3::ZERO));
    }

    #[test]
    fn position_and_normal_without_uv() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 1 0\nf 1//1 2//1 3//1\n";
        let mesh = parse_obj(src, true).unwrap();
        assert_eq!(mesh.normals, vec![Vec3::Y; 3]);
        assert_eq!(mesh.uvs, vec![Vec2::ZERO; 3]);
    }

    #[test]
    fn negative_indices_count_back() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let mesh = parse_obj(src, false).unwrap();
        assert_eq!(mesh.positions[0], Vec3::ZERO);
        assert_eq!(mesh.positions[2], Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn ignores_unknown_statements() {
        let src = "mtllib a.mtl\no thing\ng group\ns off\nusemtl m\n\
                   v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        assert_eq!(parse_obj(src, false).unwrap().vertex_count(), 3);
    }

    #[test]
    fn rejects_out_of_range_index() {
        let src = "v 0 0 0\nv 1 0 0\nf 1 2 3\n";
        let err = parse_obj(src, false).unwrap_err();
        assert_eq!(
            err,
            ObjError::IndexOutOfRange {
                line: 3,
                kind: "vertex",
                index: 3,
                len: 2
            }
        );
    }

    #[test]
    fn rejects_zero_index() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n";
        assert!(matches!(
            parse_obj(src, false),
            Err(ObjError::IndexOutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn rejects_malformed_vertex() {
        let err = parse_obj("v 0 zero 0\n", false).unwrap_err();
        assert!(matches!(err, ObjError::Malformed { line: 1, what: "vertex", .. }));
    }

    #[test]
    fn rejects_degenerate_face() {
        let src = "v 0 0 0\nv 1 0 0\nf 1 2\n";
        assert_eq!(
            parse_obj(src, false).unwrap_err(),
            ObjError::DegenerateFace { line: 3, count: 2 }
        );
    }

    #[test]
    fn rejects_mesh_without_faces() {
        assert_eq!(parse_obj("v 0 0 0\n", false).unwrap_err(), ObjError::NoFaces);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load_obj("/definitely/not/here.obj", false).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
        assert!(err.to_string().contains("here.obj"));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.obj");
        std::fs::write(&path, TRIANGLE).unwrap();
        let mesh = load_obj(&path, true).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn load_accepts_non_utf8_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.obj");
        let mut bytes = b"# Statue \xe9t\xe9\no caf\xe9\n".to_vec();
        bytes.extend_from_slice(TRIANGLE.as_bytes());
        std::fs::write(&path, bytes).unwrap();
        let mesh = load_obj(&path, false).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
    }
}
