//! BRDF building blocks for direct lighting.
//!
//! Conventions: `n` is the unit surface normal, `l` the unit direction
//! toward the light, `v` the unit direction toward the viewer and `h` the
//! normalized half vector between `l` and `v`.

use std::f32::consts::PI;

use lumen_core::Color;
use lumen_math::Vec3;

/// Lambert diffuse with a scalar reflectance.
#[inline]
pub fn lambert(kd: f32, cd: Color) -> Color {
    cd * kd / PI
}

/// Lambert diffuse with a per-channel reflectance.
#[inline]
pub fn lambert_rgb(kd: Color, cd: Color) -> Color {
    cd * kd / PI
}

/// Phong specular lobe, same value on all channels.
///
/// `ks` is the specular reflectance and `exp` the shininess exponent.
#[inline]
pub fn phong(ks: f32, exp: f32, l: Vec3, v: Vec3, n: Vec3) -> Color {
    let r = reflect(-l, n);
    let cos_alpha = r.dot(v).max(0.0);
    Color::splat(ks * cos_alpha.powf(exp))
}

/// Mirror `d` about the plane with normal `n`.
#[inline]
pub fn reflect(d: Vec3, n: Vec3) -> Vec3 {
    d - 2.0 * d.dot(n) * n
}

/// Schlick's Fresnel approximation.
///
/// `f0` is the base reflectivity at normal incidence.
#[inline]
pub fn fresnel_schlick(h: Vec3, v: Vec3, f0: Color) -> Color {
    let factor = (1.0 - h.dot(v)).powi(5);
    f0.lerp(Color::ONE, factor)
}

/// Trowbridge-Reitz GGX normal distribution, `alpha = roughness^2`.
#[inline]
pub fn normal_distribution_ggx(n: Vec3, h: Vec3, roughness: f32) -> f32 {
    let alpha = roughness * roughness;
    let alpha_sq = alpha * alpha;
    let n_dot_h = n.dot(h);
    let denom = n_dot_h * n_dot_h * (alpha_sq - 1.0) + 1.0;
    alpha_sq / (PI * denom * denom)
}

/// Schlick-GGX geometry term for one direction, direct-lighting `k`.
#[inline]
pub fn geometry_schlick_ggx(n: Vec3, v: Vec3, roughness: f32) -> f32 {
    let alpha = roughness * roughness;
    let k = (alpha + 1.0) * (alpha + 1.0) / 8.0;
    let n_dot_v = n.dot(v).max(0.0);
    n_dot_v / (n_dot_v * (1.0 - k) + k)
}

/// Smith's method: masking toward the viewer times shadowing toward the light.
#[inline]
pub fn geometry_smith(n: Vec3, v: Vec3, l: Vec3, roughness: f32) -> f32 {
    geometry_schlick_ggx(n, v, roughness) * geometry_schlick_ggx(n, l, roughness)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_lambert() {
        let c = lambert(1.0, Color::new(1.0, 0.5, 0.0));
        assert!((c - Color::new(1.0 / PI, 0.5 / PI, 0.0)).length() < EPS);

        let c = lambert_rgb(Color::new(0.5, 1.0, 2.0), Color::ONE);
        assert!((c - Color::new(0.5, 1.0, 2.0) / PI).length() < EPS);
    }

    #[test]
    fn test_reflect() {
        let d = Vec3::new(1.0, -1.0, 0.0);
        assert_eq!(reflect(d, Vec3::Y), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_phong_mirror_direction() {
        let n = Vec3::Y;
        let l = Vec3::new(-1.0, 1.0, 0.0).normalize();
        let v = Vec3::new(1.0, 1.0, 0.0).normalize();

        // Viewer sits exactly in the mirror direction
        let c = phong(0.5, 10.0, l, v, n);
        assert!((c - Color::splat(0.5)).length() < EPS);

        // Viewer on the same side as the light sees nothing
        let c = phong(0.5, 10.0, l, l, n);
        assert!(c.length() < EPS);
    }

    #[test]
    fn test_fresnel_schlick_limits() {
        let f0 = Color::new(0.04, 0.04, 0.04);

        // Normal incidence returns f0
        let c = fresnel_schlick(Vec3::Z, Vec3::Z, f0);
        assert!((c - f0).length() < EPS);

        // Grazing angle goes to white
        let c = fresnel_schlick(Vec3::Z, Vec3::X, f0);
        assert!((c - Color::ONE).length() < EPS);
    }

    #[test]
    fn test_ggx_at_normal() {
        // n == h: alpha^2 / (pi * alpha^4) = 1 / (pi * alpha^2)
        let roughness = 0.5;
        let alpha = roughness * roughness;
        let d = normal_distribution_ggx(Vec3::Y, Vec3::Y, roughness);
        assert!((d - 1.0 / (PI * alpha * alpha)).abs() < 1e-3);
    }

    #[test]
    fn test_ggx_rough_is_uniform() {
        // roughness 1: alpha^2 = 1 makes the distribution constant 1/pi
        let h = Vec3::new(1.0, 1.0, 0.0).normalize();
        let d = normal_distribution_ggx(Vec3::Y, h, 1.0);
        assert!((d - 1.0 / PI).abs() < EPS);
    }

    #[test]
    fn test_geometry_schlick_ggx() {
        // Facing the normal: n.v = 1 gives 1 / (1 - k + k) = 1
        assert!((geometry_schlick_ggx(Vec3::Y, Vec3::Y, 0.7) - 1.0).abs() < EPS);

        // Behind the surface is clamped to zero
        assert_eq!(geometry_schlick_ggx(Vec3::Y, -Vec3::Y, 0.7), 0.0);

        // roughness 1: alpha = 1, k = 0.5, n.v = 0.5 -> 0.5 / 0.75
        let v = Vec3::new(3.0f32.sqrt() / 2.0, 0.5, 0.0);
        let g = geometry_schlick_ggx(Vec3::Y, v, 1.0);
        assert!((g - 0.5 / 0.75).abs() < EPS);
    }

    #[test]
    fn test_geometry_smith_is_product() {
        let n = Vec3::Y;
        let v = Vec3::new(0.3, 0.8, 0.1).normalize();
        let l = Vec3::new(-0.5, 0.6, 0.2).normalize();

        let expected = geometry_schlick_ggx(n, v, 0.4) * geometry_schlick_ggx(n, l, 0.4);
        assert!((geometry_smith(n, v, l, 0.4) - expected).abs() < EPS);
    }
}
