//! Triangle meshes with separate object-space and world-space data.
//!
//! Source positions and per-triangle normals are kept untouched so a mesh can
//! be re-posed any number of times without reloading it. The world-space copy
//! is regenerated by [`TriangleMesh::update_transforms`], which must run after
//! every change to the transform or the source geometry and before any
//! triangle is queried.

use lumen_math::{Aabb, Transform, Vec3};

use crate::obj::ObjMesh;
use crate::triangle::{CullMode, Triangle};
use crate::MaterialId;

/// A mesh of triangles sharing one material and one cull mode.
#[derive(Clone, Debug)]
pub struct TriangleMesh {
    /// Object-space vertex positions
    positions: Vec<Vec3>,
    /// Object-space face normals, one per triangle
    normals: Vec<Vec3>,
    /// Triangle indices (every 3 indices form a triangle)
    indices: Vec<u32>,

    transformed_positions: Vec<Vec3>,
    transformed_normals: Vec<Vec3>,

    transform: Transform,
    /// Set whenever the world-space arrays no longer match the source data
    dirty: bool,

    pub material: MaterialId,
    pub cull_mode: CullMode,
}

impl TriangleMesh {
    /// Create an empty mesh; fill it with [`append_triangle`](Self::append_triangle).
    pub fn new(cull_mode: CullMode, material: MaterialId) -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            transformed_positions: Vec::new(),
            transformed_normals: Vec::new(),
            transform: Transform::IDENTITY,
            dirty: false,
            material,
            cull_mode,
        }
    }

    /// Create a mesh from positions and indices, computing face normals.
    pub fn from_geometry(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        cull_mode: CullMode,
        material: MaterialId,
    ) -> Self {
        let mut mesh = Self {
            positions,
            indices,
            ..Self::new(cull_mode, material)
        };
        mesh.compute_normals();
        mesh.update_transforms();
        mesh
    }

    /// Create a mesh with caller-provided face normals.
    ///
    /// Falls back to computed normals when the count doesn't match the
    /// number of triangles.
    pub fn with_normals(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        normals: Vec<Vec3>,
        cull_mode: CullMode,
        material: MaterialId,
    ) -> Self {
        let mut mesh = Self {
            positions,
            indices,
            normals,
            ..Self::new(cull_mode, material)
        };
        if mesh.normals.len() != mesh.triangle_count() {
            log::debug!(
                "Normals array length ({}) doesn't match triangle count ({}), computing face normals",
                mesh.normals.len(),
                mesh.triangle_count()
            );
            mesh.compute_normals();
        }
        mesh.update_transforms();
        mesh
    }

    /// Create a mesh from parsed OBJ data.
    pub fn from_obj(obj: ObjMesh, cull_mode: CullMode, material: MaterialId) -> Self {
        Self::with_normals(obj.positions, obj.indices, obj.normals, cull_mode, material)
    }

    /// Append a standalone triangle with its own three vertices.
    ///
    /// The triangle's material and cull mode are ignored; the mesh-wide
    /// values apply. With `update_transforms == false` the caller is
    /// responsible for calling [`update_transforms`](Self::update_transforms)
    /// before the mesh is queried, which is cheaper when appending many.
    pub fn append_triangle(&mut self, triangle: &Triangle, update_transforms: bool) {
        let start = self.positions.len() as u32;

        self.positions.extend([triangle.v0, triangle.v1, triangle.v2]);
        self.indices.extend([start, start + 1, start + 2]);
        self.normals.push(triangle.normal);
        self.dirty = true;

        if update_transforms {
            self.update_transforms();
        }
    }

    /// Recompute object-space face normals from the winding order.
    pub fn compute_normals(&mut self) {
        self.normals = self
            .indices
            .chunks_exact(3)
            .map(|face| {
                let fetch = |i: u32| self.positions.get(i as usize).copied().unwrap_or(Vec3::ZERO);
                let (p0, p1, p2) = (fetch(face[0]), fetch(face[1]), fetch(face[2]));
                (p1 - p0).cross(p2 - p0).normalize_or_zero()
            })
            .collect();
        self.dirty = true;
    }

    /// Replace the whole transform.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.dirty = true;
    }

    /// Replace the translation part of the transform.
    pub fn translate(&mut self, translation: Vec3) {
        self.set_transform(self.transform.with_translation(translation));
    }

    /// Replace the rotation part with a rotation of `yaw` radians around +Y.
    pub fn rotate_y(&mut self, yaw: f32) {
        self.set_transform(self.transform.with_rotation_y(yaw));
    }

    /// Replace the scale part of the transform.
    pub fn scale(&mut self, scale: Vec3) {
        self.set_transform(self.transform.with_scale(scale));
    }

    /// The current object-to-world transform.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Regenerate world-space positions and normals from the source data.
    pub fn update_transforms(&mut self) {
        let matrix = self.transform.matrix();
        let normal_matrix = self.transform.normal_matrix();

        self.transformed_positions.clear();
        self.transformed_positions
            .extend(self.positions.iter().map(|&p| matrix.transform_point3(p)));

        self.transformed_normals.clear();
        self.transformed_normals
            .extend(self.normals.iter().map(|&n| (normal_matrix * n).normalize_or_zero()));

        self.dirty = false;
    }

    /// Returns true if the world-space data is out of date.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Object-space positions.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Object-space face normals.
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Triangle indices.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// World-space positions.
    pub fn transformed_positions(&self) -> &[Vec3] {
        &self.transformed_positions
    }

    /// World-space triangle `index`, or `None` if out of range.
    ///
    /// Must not be called on a dirty mesh.
    pub fn triangle(&self, index: usize) -> Option<Triangle> {
        debug_assert!(
            !self.dirty,
            "triangle queried on a stale mesh, call update_transforms first"
        );

        let face = self.indices.get(index * 3..index * 3 + 3)?;
        let v0 = *self.transformed_positions.get(face[0] as usize)?;
        let v1 = *self.transformed_positions.get(face[1] as usize)?;
        let v2 = *self.transformed_positions.get(face[2] as usize)?;
        let normal = *self.transformed_normals.get(index)?;

        Some(
            Triangle::with_normal(v0, v1, v2, normal)
                .with_cull_mode(self.cull_mode)
                .with_material(self.material),
        )
    }

    /// Iterate over all world-space triangles.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.triangle_count()).filter_map(move |i| self.triangle(i))
    }

    /// Bounding box of the world-space vertices.
    pub fn bounds(&self) -> Aabb {
        self.transformed_positions
            .iter()
            .fold(Aabb::EMPTY, |mut bounds, &p| {
                bounds.grow(p);
                bounds
            })
    }
}
