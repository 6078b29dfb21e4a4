//! Point and directional lights.

use lumen_math::Vec3;

use crate::color::Color;

/// A light source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Emits from a single position, falling off with squared distance.
    Point {
        origin: Vec3,
        color: Color,
        intensity: f32,
    },
    /// Infinitely far away; `direction` is the direction light travels in.
    Directional {
        direction: Vec3,
        color: Color,
        intensity: f32,
    },
}

impl Light {
    pub fn point(origin: Vec3, color: Color, intensity: f32) -> Self {
        Light::Point {
            origin,
            color,
            intensity,
        }
    }

    /// Create a directional light. The direction is normalized.
    pub fn directional(direction: Vec3, color: Color, intensity: f32) -> Self {
        Light::Directional {
            direction: direction.normalize(),
            color,
            intensity,
        }
    }

    /// Unnormalized vector from `target` toward the light.
    ///
    /// For point lights its length is the distance to the light, which bounds
    /// shadow rays. Directional lights return the reversed light direction.
    pub fn direction_to(&self, target: Vec3) -> Vec3 {
        match *self {
            Light::Point { origin, .. } => origin - target,
            Light::Directional { direction, .. } => -direction,
        }
    }

    /// Distance from `target` to the light; infinite for directional lights.
    pub fn distance(&self, target: Vec3) -> f32 {
        match *self {
            Light::Point { origin, .. } => origin.distance(target),
            Light::Directional { .. } => f32::INFINITY,
        }
    }

    /// Radiance arriving at `target`.
    pub fn radiance(&self, target: Vec3) -> Color {
        match *self {
            Light::Point {
                origin,
                color,
                intensity,
            } => {
                let distance_sq = origin.distance_squared(target);
                if distance_sq <= f32::EPSILON {
                    return color * intensity;
                }
                color * intensity / distance_sq
            }
            Light::Directional {
                color, intensity, ..
            } => color * intensity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::colors;

    #[test]
    fn test_point_light_falloff() {
        let light = Light::point(Vec3::new(0.0, 2.0, 0.0), colors::WHITE, 8.0);

        assert_eq!(light.radiance(Vec3::ZERO), Vec3::splat(2.0));
        assert_eq!(light.radiance(Vec3::new(0.0, -2.0, 0.0)), Vec3::splat(0.5));
    }

    #[test]
    fn test_point_light_direction_and_distance() {
        let light = Light::point(Vec3::new(0.0, 3.0, 4.0), colors::WHITE, 1.0);

        assert_eq!(light.direction_to(Vec3::ZERO), Vec3::new(0.0, 3.0, 4.0));
        assert_eq!(light.distance(Vec3::ZERO), 5.0);
    }

    #[test]
    fn test_directional_light_has_no_falloff() {
        let light = Light::directional(Vec3::new(0.0, -3.0, 0.0), colors::RED, 2.0);

        assert_eq!(light.direction_to(Vec3::new(100.0, 5.0, -7.0)), Vec3::Y);
        assert_eq!(light.radiance(Vec3::ZERO), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(light.radiance(Vec3::splat(1000.0)), Vec3::new(2.0, 0.0, 0.0));
        assert!(light.distance(Vec3::ZERO).is_infinite());
    }
}
