// Object-to-world transform for meshes.
//
// Stored as separate scale, rotation and translation parts so each can be
// replaced on its own (e.g. re-posing a mesh every frame) and composed in a
// fixed order: scale first, then rotation, then translation.

use glam::{Mat3, Mat4, Quat, Vec3};

/// Scale · rotation · translation transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: Vec3,
    pub rotation: Quat,
    pub translation: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale: Vec3::ONE,
        rotation: Quat::IDENTITY,
        translation: Vec3::ZERO,
    };

    /// Replace the translation part.
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    /// Replace the rotation part with a rotation of `yaw` radians around +Y.
    pub fn with_rotation_y(mut self, yaw: f32) -> Self {
        self.rotation = Quat::from_rotation_y(yaw);
        self
    }

    /// Replace the scale part.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// The composed matrix, applying scale, then rotation, then translation.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Matrix for transforming normals (inverse transpose of the linear part).
    ///
    /// Keeps normals perpendicular to surfaces under non-uniform scale.
    pub fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(self.matrix()).inverse().transpose()
    }

    /// Transform a point (translation applies).
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.matrix().transform_point3(point)
    }

    /// Transform a normal and renormalize it.
    pub fn transform_normal(&self, normal: Vec3) -> Vec3 {
        (self.normal_matrix() * normal).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_identity_leaves_points_alone() {
        let point = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Transform::IDENTITY.transform_point(point), point);
        assert_eq!(Transform::IDENTITY.transform_normal(Vec3::Y), Vec3::Y);
    }

    #[test]
    fn test_translation_moves_points_not_normals() {
        let transform = Transform::IDENTITY.with_translation(Vec3::new(10.0, 20.0, 30.0));

        assert_eq!(
            transform.transform_point(Vec3::new(1.0, 2.0, 3.0)),
            Vec3::new(11.0, 22.0, 33.0)
        );
        assert!((transform.transform_normal(Vec3::X) - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_rotation_y() {
        let transform = Transform::IDENTITY.with_rotation_y(PI / 2.0);
        let rotated = transform.transform_point(Vec3::X);

        // +X rotates to -Z around +Y
        assert!((rotated - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_scale_applies_before_translation() {
        let transform = Transform::IDENTITY
            .with_scale(Vec3::splat(2.0))
            .with_translation(Vec3::new(1.0, 0.0, 0.0));

        assert!((transform.transform_point(Vec3::X) - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_normal_stays_perpendicular_under_nonuniform_scale() {
        let transform = Transform::IDENTITY.with_scale(Vec3::new(4.0, 1.0, 1.0));

        // Surface spanned by these two tangents has normal (1,1,0)/sqrt2
        let t1 = Vec3::new(1.0, -1.0, 0.0);
        let t2 = Vec3::Z;
        let normal = Vec3::new(1.0, 1.0, 0.0).normalize();

        let m = transform.matrix();
        let t1w = m.transform_vector3(t1);
        let t2w = m.transform_vector3(t2);
        let nw = transform.transform_normal(normal);

        assert!(nw.dot(t1w).abs() < 1e-5);
        assert!(nw.dot(t2w).abs() < 1e-5);
        assert!((nw.length() - 1.0).abs() < 1e-5);
    }
}
