//! Material trait for direct-lighting surface response.

use lumen_core::Color;
use lumen_math::Vec3;

use crate::brdf;
use crate::hit::HitRecord;

/// Base reflectivity of dielectrics at normal incidence.
const DIELECTRIC_F0: Color = Color::splat(0.04);

/// Trait for materials that describe how light interacts with surfaces.
///
/// Materials are read-only after scene construction and shared by all
/// render workers.
pub trait Material: Send + Sync {
    /// Response toward `v` for light arriving from `l`.
    ///
    /// `l` points from the hit toward the light and `v` from the hit toward
    /// the viewer; both are unit length.
    fn shade(&self, hit: &HitRecord, l: Vec3, v: Vec3) -> Color;
}

/// Constant color, independent of lighting geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidColor {
    pub color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Material for SolidColor {
    fn shade(&self, _hit: &HitRecord, _l: Vec3, _v: Vec3) -> Color {
        self.color
    }
}

/// Perfectly diffuse surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lambert {
    pub diffuse_color: Color,
    pub diffuse_reflectance: f32,
}

impl Lambert {
    pub fn new(diffuse_color: Color, diffuse_reflectance: f32) -> Self {
        Self {
            diffuse_color,
            diffuse_reflectance,
        }
    }
}

impl Material for Lambert {
    fn shade(&self, _hit: &HitRecord, _l: Vec3, _v: Vec3) -> Color {
        brdf::lambert(self.diffuse_reflectance, self.diffuse_color)
    }
}

/// Diffuse base with a Phong highlight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertPhong {
    pub diffuse_color: Color,
    pub diffuse_reflectance: f32,
    pub specular_reflectance: f32,
    pub phong_exponent: f32,
}

impl LambertPhong {
    pub fn new(
        diffuse_color: Color,
        diffuse_reflectance: f32,
        specular_reflectance: f32,
        phong_exponent: f32,
    ) -> Self {
        Self {
            diffuse_color,
            diffuse_reflectance,
            specular_reflectance,
            phong_exponent,
        }
    }
}

impl Material for LambertPhong {
    fn shade(&self, hit: &HitRecord, l: Vec3, v: Vec3) -> Color {
        brdf::lambert(self.diffuse_reflectance, self.diffuse_color)
            + brdf::phong(self.specular_reflectance, self.phong_exponent, l, v, hit.normal)
    }
}

/// Microfacet material: GGX distribution, Schlick Fresnel, Smith geometry.
///
/// `metalness` blends between a dielectric (0) and a conductor (1), which
/// tints the specular with `albedo` and removes the diffuse part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CookTorrance {
    pub albedo: Color,
    pub metalness: f32,
    pub roughness: f32,
}

impl CookTorrance {
    pub fn new(albedo: Color, metalness: f32, roughness: f32) -> Self {
        Self {
            albedo,
            metalness: metalness.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
        }
    }
}

impl Material for CookTorrance {
    fn shade(&self, hit: &HitRecord, l: Vec3, v: Vec3) -> Color {
        let n = hit.normal;
        let h = (l + v).normalize_or_zero();

        let f0 = DIELECTRIC_F0.lerp(self.albedo, self.metalness);
        let f = brdf::fresnel_schlick(h, v, f0);
        let d = brdf::normal_distribution_ggx(n, h, self.roughness);
        let g = brdf::geometry_smith(n, v, l, self.roughness);

        let denom = 4.0 * n.dot(v) * n.dot(l);
        let specular = if denom > 0.0 {
            f * (d * g / denom)
        } else {
            Color::ZERO
        };

        let kd = (Color::ONE - f) * (1.0 - self.metalness);
        brdf::lambert_rgb(kd, self.albedo) + specular
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn hit_facing_up() -> HitRecord {
        HitRecord {
            normal: Vec3::Y,
            did_hit: true,
            t: 1.0,
            ..HitRecord::default()
        }
    }

    #[test]
    fn test_solid_color_ignores_geometry() {
        let mat = SolidColor::new(Color::new(1.0, 0.0, 0.0));
        let hit = hit_facing_up();
        assert_eq!(mat.shade(&hit, Vec3::Y, Vec3::X), Color::new(1.0, 0.0, 0.0));
        assert_eq!(mat.shade(&hit, -Vec3::Y, Vec3::Z), Color::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_lambert_shade() {
        let mat = Lambert::new(Color::new(0.5, 0.5, 1.0), 1.0);
        let c = mat.shade(&hit_facing_up(), Vec3::Y, Vec3::Y);
        assert!((c - Color::new(0.5, 0.5, 1.0) / PI).length() < 1e-5);
    }

    #[test]
    fn test_lambert_phong_adds_highlight() {
        let mat = LambertPhong::new(Color::ONE, 1.0, 0.5, 20.0);
        let hit = hit_facing_up();
        let l = Vec3::new(-1.0, 1.0, 0.0).normalize();
        let mirror = Vec3::new(1.0, 1.0, 0.0).normalize();

        let diffuse = Color::splat(1.0 / PI);
        let at_mirror = mat.shade(&hit, l, mirror);
        assert!((at_mirror - (diffuse + Color::splat(0.5))).length() < 1e-4);

        let off_mirror = mat.shade(&hit, l, l);
        assert!((off_mirror - diffuse).length() < 1e-4);
    }

    #[test]
    fn test_cook_torrance_rough_dielectric_closed_form() {
        // n = l = v: F = f0, D = 1/pi at roughness 1, G = 1
        let albedo = Color::new(0.75, 0.75, 0.75);
        let mat = CookTorrance::new(albedo, 0.0, 1.0);
        let c = mat.shade(&hit_facing_up(), Vec3::Y, Vec3::Y);

        let specular = 0.04 / (PI * 4.0);
        let diffuse = 0.96 * 0.75 / PI;
        assert!((c - Color::splat(diffuse + specular)).length() < 1e-4);
    }

    #[test]
    fn test_cook_torrance_metal_has_no_diffuse() {
        let albedo = Color::new(0.972, 0.960, 0.915);
        let mat = CookTorrance::new(albedo, 1.0, 1.0);
        let c = mat.shade(&hit_facing_up(), Vec3::Y, Vec3::Y);

        // Pure specular tinted by albedo
        let expected = albedo / (PI * 4.0);
        assert!((c - expected).length() < 1e-4);
    }

    #[test]
    fn test_cook_torrance_below_horizon_is_diffuse_only() {
        let albedo = Color::ONE;
        let mat = CookTorrance::new(albedo, 0.0, 0.5);
        let hit = hit_facing_up();

        let l = Vec3::new(1.0, -0.2, 0.0).normalize();
        let v = Vec3::Y;
        let c = mat.shade(&hit, l, v);
        assert!(c.is_finite());
        assert!(c.min_element() >= 0.0);
    }

    #[test]
    fn test_cook_torrance_energy_sanity() {
        let hit = hit_facing_up();
        let l = Vec3::new(0.3, 1.0, 0.2).normalize();
        let v = Vec3::new(-0.4, 1.0, 0.1).normalize();

        for &metalness in &[0.0, 1.0] {
            for &roughness in &[0.1, 0.6, 1.0] {
                let mat = CookTorrance::new(Color::splat(0.8), metalness, roughness);
                let c = mat.shade(&hit, l, v);
                assert!(c.is_finite());
                assert!(c.min_element() >= 0.0);
            }
        }
    }
}
