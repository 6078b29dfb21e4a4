//! Triangle primitive as handed out by triangle meshes.

use lumen_math::{Aabb, Vec3};

use crate::MaterialId;

/// Which side of a triangle is ignored by ray tests.
///
/// The front face is the side the normal points out of; a ray hits the
/// front face when its direction opposes the normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode {
    /// Rays hitting the front face are rejected.
    FrontFace,
    /// Rays hitting the back face are rejected.
    #[default]
    BackFace,
    /// Both faces can be hit.
    None,
}

/// A triangle with a precomputed unit normal and centroid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    /// Face normal (unit length)
    pub normal: Vec3,
    /// Average of the three vertices
    pub centroid: Vec3,
    pub cull_mode: CullMode,
    pub material: MaterialId,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// The normal follows the winding: `(v1 - v0) x (v2 - v0)`.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize();
        Self::with_normal(v0, v1, v2, normal)
    }

    /// Create a triangle with a pre-computed normal.
    pub fn with_normal(v0: Vec3, v1: Vec3, v2: Vec3, normal: Vec3) -> Self {
        Self {
            v0,
            v1,
            v2,
            normal: normal.normalize(),
            centroid: (v0 + v1 + v2) / 3.0,
            cull_mode: CullMode::default(),
            material: 0,
        }
    }

    /// Set the cull mode.
    pub fn with_cull_mode(mut self, cull_mode: CullMode) -> Self {
        self.cull_mode = cull_mode;
        self
    }

    /// Set the material index.
    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = material;
        self
    }

    /// Bounding box of the three vertices.
    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        bounds.grow(self.v0);
        bounds.grow(self.v1);
        bounds.grow(self.v2);
        bounds
    }
}
