//! Hittable trait and HitRecord for ray-primitive intersection.
//!
//! Every primitive implements the intersection math once, in
//! [`Hittable::intersect`]. Closest-hit and occlusion queries are built on
//! top of it as provided methods.

use lumen_core::{CullMode, MaterialId, Plane, Sphere, Triangle, TriangleMesh};
use lumen_math::{Ray, Vec3};

/// Determinant threshold below which a ray counts as parallel to a triangle.
const TRIANGLE_EPSILON: f32 = 1e-8;

/// Closest hit found so far along a ray.
///
/// `t` starts at infinity and only ever decreases while a query runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Point of intersection
    pub point: Vec3,
    /// Surface normal at the intersection
    pub normal: Vec3,
    /// Ray parameter of the intersection
    pub t: f32,
    pub did_hit: bool,
    pub material: MaterialId,
}

impl Default for HitRecord {
    fn default() -> Self {
        Self {
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            t: f32::INFINITY,
            did_hit: false,
            material: 0,
        }
    }
}

impl HitRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the record with `hit` if it is closer than the current one.
    ///
    /// Returns true if the record changed.
    #[inline]
    pub fn record(&mut self, ray: &Ray, hit: Intersection) -> bool {
        if hit.t >= self.t {
            return false;
        }
        self.t = hit.t;
        self.point = ray.at(hit.t);
        self.normal = hit.normal;
        self.material = hit.material;
        self.did_hit = true;
        true
    }
}

/// A single ray-primitive intersection inside the ray's valid range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub t: f32,
    pub normal: Vec3,
    pub material: MaterialId,
}

/// Trait for primitives that can be hit by rays.
pub trait Hittable {
    /// Nearest intersection with `t` inside `[ray.t_min, ray.t_max]`.
    fn intersect(&self, ray: &Ray) -> Option<Intersection>;

    /// Closest-hit mode: update `rec` if this primitive is hit closer.
    ///
    /// Returns true if `rec` was updated.
    #[inline]
    fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool {
        match self.intersect(ray) {
            Some(hit) => rec.record(ray, hit),
            None => false,
        }
    }

    /// Occlusion mode: does anything inside the ray's range block it?
    #[inline]
    fn occludes(&self, ray: &Ray) -> bool {
        self.intersect(ray).is_some()
    }
}

impl Hittable for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray.in_range(root) {
            root = (h + sqrtd) / a;
            if !ray.in_range(root) {
                return None;
            }
        }

        let normal = (ray.at(root) - self.center).normalize();
        Some(Intersection {
            t: root,
            normal,
            material: self.material,
        })
    }
}

impl Hittable for Plane {
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() <= f32::EPSILON {
            return None;
        }

        let t = (self.origin - ray.origin()).dot(self.normal) / denom;
        if !ray.in_range(t) {
            return None;
        }

        Some(Intersection {
            t,
            normal: self.normal,
            material: self.material,
        })
    }
}

impl Hittable for Triangle {
    /// Möller-Trumbore ray-triangle intersection with face culling.
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let det = edge1.dot(h);

        // det > 0 when the ray opposes the winding normal (front face)
        match self.cull_mode {
            CullMode::BackFace if det < 0.0 => return None,
            CullMode::FrontFace if det > 0.0 => return None,
            _ => {}
        }

        // Ray is parallel to triangle
        if det.abs() <= TRIANGLE_EPSILON {
            return None;
        }

        let f = 1.0 / det;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !ray.in_range(t) {
            return None;
        }

        Some(Intersection {
            t,
            normal: self.normal,
            material: self.material,
        })
    }
}

/// Brute-force path over every triangle of the mesh.
///
/// Used as a reference for the BVH and as a fallback; the scene queries
/// meshes through the BVH.
impl Hittable for TriangleMesh {
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        self.triangles()
            .filter_map(|tri| tri.intersect(ray))
            .min_by(|a, b| a.t.total_cmp(&b.t))
    }

    fn occludes(&self, ray: &Ray) -> bool {
        self.triangles().any(|tri| tri.occludes(ray))
    }
}
