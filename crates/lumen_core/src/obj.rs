//! Wavefront OBJ loading via `tobj`.
//!
//! Only geometry is kept. Faces are triangulated and every model in the
//! file is merged into a single indexed mesh with one face normal per
//! triangle. Materials referenced through `mtllib` are not loaded.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use lumen_math::Vec3;
use thiserror::Error;

/// Errors that can occur while loading an OBJ file.
#[derive(Error, Debug)]
pub enum ObjError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OBJ load error: {0}")]
    Load(#[from] tobj::LoadError),

    #[error("Model '{model}' references vertex {index}, but it only has {count} vertices")]
    IndexOutOfRange {
        model: String,
        index: u32,
        count: usize,
    },
}

/// Result type for OBJ loading.
pub type ObjResult<T> = Result<T, ObjError>;

/// Geometry read from an OBJ file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjMesh {
    pub positions: Vec<Vec3>,
    /// 0-based, three per triangle
    pub indices: Vec<u32>,
    /// Face normals by edge cross product, one per triangle
    pub normals: Vec<Vec3>,
}

impl ObjMesh {
    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append one tobj model, offsetting its indices past the current vertices.
    fn append(&mut self, model: &tobj::Model) -> ObjResult<()> {
        let mesh = &model.mesh;
        let base = self.positions.len() as u32;
        let count = mesh.positions.len() / 3;

        if let Some(&index) = mesh.indices.iter().find(|&&i| i as usize >= count) {
            return Err(ObjError::IndexOutOfRange {
                model: model.name.clone(),
                index,
                count,
            });
        }

        self.positions.extend(
            mesh.positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0], p[1], p[2])),
        );
        self.indices.extend(mesh.indices.iter().map(|&i| base + i));
        Ok(())
    }

    fn compute_face_normals(&mut self) {
        self.normals = self
            .indices
            .chunks_exact(3)
            .map(|t| {
                let p0 = self.positions[t[0] as usize];
                let p1 = self.positions[t[1] as usize];
                let p2 = self.positions[t[2] as usize];
                (p1 - p0).cross(p2 - p0).normalize_or_zero()
            })
            .collect();
    }
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    }
}

/// Load an OBJ file from disk.
pub fn load_obj<P: AsRef<Path>>(path: P) -> ObjResult<ObjMesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mesh = parse_obj(BufReader::new(file))?;

    log::info!(
        "Loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.positions.len(),
        mesh.triangle_count()
    );

    Ok(mesh)
}

/// Parse OBJ content from any buffered reader.
pub fn parse_obj<R: BufRead>(mut reader: R) -> ObjResult<ObjMesh> {
    // Geometry only; material libraries are skipped
    let (models, _materials) = tobj::load_obj_buf(&mut reader, &load_options(), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })?;

    let mut mesh = ObjMesh::default();
    for model in &models {
        mesh.append(model)?;
    }
    mesh.compute_face_normals();

    log::debug!(
        "Parsed OBJ: {} models, {} vertices, {} triangles",
        models.len(),
        mesh.positions.len(),
        mesh.triangle_count()
    );

    Ok(mesh)
}
