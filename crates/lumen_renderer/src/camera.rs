//! Pinhole camera for primary ray generation.
//!
//! Left-handed: the camera looks down +Z with +Y up and +X to the right
//! when unrotated.

use lumen_math::{Mat3, Ray, Vec3};

/// Largest pitch magnitude, keeping the basis away from the up-vector pole.
const MAX_PITCH: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// Camera for generating rays into the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub origin: Vec3,
    /// Vertical field of view in degrees
    fov_degrees: f32,
    /// `tan(fov / 2)`, scales image-plane coordinates
    fov_scale: f32,
    yaw: f32,
    pitch: f32,

    // Cached basis (updated whenever the rotation changes)
    forward: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 90.0)
    }
}

impl Camera {
    /// Create a camera at `origin` looking down +Z.
    pub fn new(origin: Vec3, fov_degrees: f32) -> Self {
        let mut camera = Self {
            origin,
            fov_degrees,
            fov_scale: 1.0,
            yaw: 0.0,
            pitch: 0.0,
            forward: Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
        };
        camera.set_fov(fov_degrees);
        camera
    }

    /// Set the rotation in radians: yaw around +Y, pitch around the right axis.
    pub fn with_rotation(mut self, yaw: f32, pitch: f32) -> Self {
        self.set_rotation(yaw, pitch);
        self
    }

    /// Set vertical field of view in degrees.
    pub fn set_fov(&mut self, fov_degrees: f32) {
        self.fov_degrees = fov_degrees.clamp(1.0, 179.0);
        self.fov_scale = (self.fov_degrees.to_radians() / 2.0).tan();
    }

    pub fn fov(&self) -> f32 {
        self.fov_degrees
    }

    pub fn set_rotation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-MAX_PITCH, MAX_PITCH);
        self.update_basis();
    }

    /// Add to the current yaw and pitch.
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.set_rotation(self.yaw + delta_yaw, self.pitch + delta_pitch);
    }

    fn update_basis(&mut self) {
        let rotation = Mat3::from_rotation_y(self.yaw) * Mat3::from_rotation_x(self.pitch);
        self.forward = (rotation * Vec3::Z).normalize();
        self.right = Vec3::Y.cross(self.forward).normalize();
        self.up = self.forward.cross(self.right).normalize();
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// World-space direction through the center of pixel `(x, y)`.
    ///
    /// Pixel rows run top to bottom.
    pub fn ray_direction(&self, x: u32, y: u32, width: u32, height: u32, aspect_ratio: f32) -> Vec3 {
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;

        let cx = (2.0 * px / width as f32 - 1.0) * aspect_ratio * self.fov_scale;
        let cy = (1.0 - 2.0 * py / height as f32) * self.fov_scale;

        (self.right * cx + self.up * cy + self.forward).normalize()
    }

    /// Primary ray through the center of pixel `(x, y)`.
    pub fn generate_ray(&self, x: u32, y: u32, width: u32, height: u32, aspect_ratio: f32) -> Ray {
        Ray::new(self.origin, self.ray_direction(x, y, width, height, aspect_ratio))
    }
}
