use crate::Vec3;

/// Default lower bound of a ray's valid range.
///
/// Keeps secondary rays from re-hitting the surface they start on.
pub const RAY_T_MIN: f32 = 0.0001;

/// A ray with origin, unit direction and a valid parametric range.
///
/// Only hits with `t` inside `[t_min, t_max]` count. Rays are built once
/// per cast and never mutated afterwards.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub t_min: f32,
    pub t_max: f32,
}

impl Ray {
    /// Create a ray with the default range `[RAY_T_MIN, f32::MAX]`.
    ///
    /// The direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::with_range(origin, direction, RAY_T_MIN, f32::MAX)
    }

    /// Create a ray valid over `[t_min, t_max]`.
    pub fn with_range(origin: Vec3, direction: Vec3, t_min: f32, t_max: f32) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            t_min,
            t_max,
        }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// True if `t` lies inside `[t_min, t_max]`.
    #[inline]
    pub fn in_range(&self, t: f32) -> bool {
        self.t_min <= t && t <= self.t_max
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
