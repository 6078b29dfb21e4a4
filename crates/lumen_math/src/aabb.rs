use crate::{Ray, Vec3};

/// Axis-Aligned Bounding Box stored as its min and max corner.
///
/// A box around planar geometry may have zero thickness on one axis; use
/// [`Aabb::padded`] where that matters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb {
    /// A box containing nothing. Growing it by any point yields that point.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create an AABB from two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Returns true if no point was ever added.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Extend the box so it contains `point`.
    #[inline]
    pub fn grow(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// The box grown by `delta` on every side.
    pub fn padded(&self, delta: f32) -> Aabb {
        Aabb {
            min: self.min - Vec3::splat(delta),
            max: self.max + Vec3::splat(delta),
        }
    }

    /// Size of the box along each axis.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the largest extent.
    ///
    /// Ties keep the earlier axis: Y only wins over X when strictly larger,
    /// Z only wins when strictly larger than the current pick.
    pub fn longest_axis(&self) -> usize {
        let extent = self.extent();
        let mut axis = 0;
        if extent.y > extent.x {
            axis = 1;
        }
        if extent.z > extent[axis] {
            axis = 2;
        }
        axis
    }

    /// Returns true if `point` lies inside the box, widened by `epsilon`.
    pub fn contains_point(&self, point: Vec3, epsilon: f32) -> bool {
        point.cmpge(self.min - Vec3::splat(epsilon)).all()
            && point.cmple(self.max + Vec3::splat(epsilon)).all()
    }

    /// Returns true if `other` lies entirely inside this box, widened by `epsilon`.
    pub fn contains(&self, other: &Aabb, epsilon: f32) -> bool {
        self.contains_point(other.min, epsilon) && self.contains_point(other.max, epsilon)
    }

    /// Raw slab interval `(t_enter, t_exit)` of the infinite line through `ray`.
    ///
    /// Zero direction components divide to a signed infinity, which the
    /// min/max folding tolerates. NaNs (origin exactly on a slab plane with a
    /// zero component) are dropped by `f32::min`/`f32::max`.
    #[inline]
    pub fn slab(&self, ray: &Ray) -> (f32, f32) {
        let t1 = (self.min - ray.origin) / ray.direction;
        let t2 = (self.max - ray.origin) / ray.direction;

        let mut t_enter = t1.x.min(t2.x);
        let mut t_exit = t1.x.max(t2.x);

        t_enter = t_enter.max(t1.y.min(t2.y));
        t_exit = t_exit.min(t1.y.max(t2.y));

        t_enter = t_enter.max(t1.z.min(t2.z));
        t_exit = t_exit.min(t1.z.max(t2.z));

        (t_enter, t_exit)
    }

    /// Slab test against the ray's valid range and a closest-hit bound.
    ///
    /// Accepts iff the clipped interval is non-empty, starts before
    /// `closest_t` and ends in front of the origin. Passing the current
    /// closest hit distance lets the box test prune subtrees that can only
    /// produce farther hits.
    #[inline]
    pub fn intersect(&self, ray: &Ray, closest_t: f32) -> bool {
        let (t_enter, t_exit) = self.slab(ray);
        let t_enter = t_enter.max(ray.t_min);
        let t_exit = t_exit.min(ray.t_max);

        t_exit >= t_enter && t_enter < closest_t && t_exit > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn unit_box() -> Aabb {
        Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn test_aabb_from_points_orders_corners() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.min, Vec3::ZERO);
        assert_eq!(aabb.max, Vec3::splat(10.0));
    }

    #[test]
    fn test_aabb_grow_from_empty() {
        let mut aabb = Aabb::EMPTY;
        assert!(aabb.is_empty());

        aabb.grow(Vec3::new(1.0, 2.0, 3.0));
        assert!(!aabb.is_empty());
        assert_eq!(aabb.min, aabb.max);

        aabb.grow(Vec3::new(-1.0, 5.0, 0.0));
        assert_eq!(aabb.min, Vec3::new(-1.0, 2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 5.0, 3.0));
    }

    #[test]
    fn test_aabb_union() {
        let box1 = Aabb::from_points(Vec3::ZERO, Vec3::splat(5.0));
        let box2 = Aabb::from_points(Vec3::splat(3.0), Vec3::splat(10.0));
        let union = box1.union(&box2);

        assert_eq!(union.min, Vec3::ZERO);
        assert_eq!(union.max, Vec3::splat(10.0));
        assert!(union.contains(&box1, 0.0));
        assert!(union.contains(&box2, 0.0));
    }

    #[test]
    fn test_aabb_longest_axis() {
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(10.0, 1.0, 1.0)).longest_axis(), 0);
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0)).longest_axis(), 1);
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 10.0)).longest_axis(), 2);
    }

    #[test]
    fn test_aabb_longest_axis_ties_prefer_earlier_axis() {
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::splat(2.0)).longest_axis(), 0);
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 3.0, 3.0)).longest_axis(), 1);
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = unit_box();

        // Ray pointing at center
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert!(aabb.intersect(&ray, f32::INFINITY));

        // Ray pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z);
        assert!(!aabb.intersect(&ray, f32::INFINITY));

        // Ray missing the box
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Z);
        assert!(!aabb.intersect(&ray, f32::INFINITY));
    }

    #[test]
    fn test_aabb_hit_from_inside() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.3, -0.2, 1.0));
        assert!(unit_box().intersect(&ray, f32::INFINITY));
    }

    #[test]
    fn test_aabb_closest_bound_prunes() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);

        // Box entry is at t=4
        assert!(aabb.intersect(&ray, 4.5));
        assert!(!aabb.intersect(&ray, 3.5));
    }

    #[test]
    fn test_aabb_respects_ray_range() {
        let aabb = unit_box();
        let short = Ray::with_range(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0, 3.0);
        assert!(!aabb.intersect(&short, f32::INFINITY));

        let long = Ray::with_range(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0, 4.5);
        assert!(aabb.intersect(&long, f32::INFINITY));
    }

    #[test]
    fn test_aabb_flat_box_is_hit() {
        // Zero thickness on z, as produced by a quad in the XY plane
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0));
        let ray = Ray::new(Vec3::new(0.2, 0.1, -3.0), Vec3::Z);
        assert!(aabb.intersect(&ray, f32::INFINITY));
    }

    #[test]
    fn test_aabb_axis_parallel_ray() {
        let aabb = unit_box();

        // Direction has zero x and y components
        let inside_slab = Ray::new(Vec3::new(0.5, 0.5, -5.0), Vec3::Z);
        assert!(aabb.intersect(&inside_slab, f32::INFINITY));

        let outside_slab = Ray::new(Vec3::new(1.5, 0.5, -5.0), Vec3::Z);
        assert!(!aabb.intersect(&outside_slab, f32::INFINITY));
    }

    #[test]
    fn test_aabb_slab_matches_sampling() {
        let mut rng = StdRng::seed_from_u64(7);
        let steps = 4000;

        for _ in 0..500 {
            let a = Vec3::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0));
            let b = Vec3::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0));
            let aabb = Aabb::from_points(a, b);

            let origin = Vec3::new(rng.gen_range(-6.0..6.0), rng.gen_range(-6.0..6.0), rng.gen_range(-6.0..6.0));
            let dir = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
            if dir.length_squared() < 1e-4 {
                continue;
            }
            let ray = Ray::with_range(origin, dir, 0.0, 20.0);
            let accepted = aabb.intersect(&ray, f32::INFINITY);

            // Any sample inside the box means the slab test must accept
            let sampled_inside = (0..=steps).any(|i| {
                let t = ray.t_min + (ray.t_max - ray.t_min) * i as f32 / steps as f32;
                aabb.contains_point(ray.at(t), 0.0)
            });
            if sampled_inside {
                assert!(accepted, "slab test missed a box the ray passes through");
            }

            // An accepted ray must really pass through the box
            if accepted {
                let (t_enter, t_exit) = aabb.slab(&ray);
                let t_mid = 0.5 * (t_enter.max(ray.t_min) + t_exit.min(ray.t_max));
                assert!(aabb.contains_point(ray.at(t_mid), 1e-3));
            }
        }
    }
}
