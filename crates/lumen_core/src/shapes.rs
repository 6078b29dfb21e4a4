//! Analytic primitives: spheres and infinite planes.

use lumen_math::Vec3;

use crate::MaterialId;

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: MaterialId,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: MaterialId) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }
}

/// An infinite plane through `origin` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub origin: Vec3,
    pub normal: Vec3,
    pub material: MaterialId,
}

impl Plane {
    /// Create a new plane. The normal is normalized.
    pub fn new(origin: Vec3, normal: Vec3, material: MaterialId) -> Self {
        Self {
            origin,
            normal: normal.normalize(),
            material,
        }
    }
}
