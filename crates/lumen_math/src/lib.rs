//! Math types shared by every Lumen crate.
//!
//! Re-exports glam and adds the few ray tracing primitives glam lacks:
//! rays with a valid parametric range, axis-aligned boxes with
//! a slab test, and a scale/rotation/translation transform.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use ray::{Ray, RAY_T_MIN};
pub use transform::Transform;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_indexing_matches_axes() {
        let v = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(v[0], v.x);
        assert_eq!(v[1], v.y);
        assert_eq!(v[2], v.z);
    }
}
