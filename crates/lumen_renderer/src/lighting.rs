//! Lighting modes, per-frame settings and the per-pixel shading kernel.

use std::fmt;

use lumen_core::color::{max_to_one, pack_rgb};
use lumen_core::Color;
use lumen_math::{Ray, RAY_T_MIN};
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::hit::HitRecord;
use crate::scene::Scene;

/// Distance along the normal that shadow rays start from, to avoid
/// self-intersection with the surface they leave.
pub const RAY_OFFSET: f32 = 0.001;

/// What the light loop accumulates per light.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum LightingMode {
    /// Clamped cosine between normal and light direction only
    ObservedArea,
    /// Incoming light radiance only
    Radiance,
    /// Material response only
    Brdf,
    /// Radiance x BRDF x cosine
    #[default]
    Combined,
}

impl LightingMode {
    /// The next mode in cycle order.
    pub fn next(self) -> Self {
        match self {
            LightingMode::ObservedArea => LightingMode::Radiance,
            LightingMode::Radiance => LightingMode::Brdf,
            LightingMode::Brdf => LightingMode::Combined,
            LightingMode::Combined => LightingMode::ObservedArea,
        }
    }
}

impl fmt::Display for LightingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LightingMode::ObservedArea => "Observed Area",
            LightingMode::Radiance => "Radiance",
            LightingMode::Brdf => "BRDF",
            LightingMode::Combined => "Combined",
        };
        f.write_str(name)
    }
}

/// User-facing render toggles. Changes apply from the next frame on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderSettings {
    pub lighting_mode: LightingMode,
    pub shadows_enabled: bool,
    /// Write worker ids instead of colors, to inspect chunk coverage
    pub mark_chunks: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            lighting_mode: LightingMode::default(),
            shadows_enabled: true,
            mark_chunks: false,
        }
    }
}

/// Immutable snapshot of everything workers need for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSettings {
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f32,
    pub lighting_mode: LightingMode,
    pub shadows_enabled: bool,
    pub mark_chunks: bool,
    pub camera: Camera,
}

impl FrameSettings {
    pub fn new(width: u32, height: u32, camera: Camera, settings: &RenderSettings) -> Self {
        Self {
            width,
            height,
            aspect_ratio: width as f32 / height as f32,
            lighting_mode: settings.lighting_mode,
            shadows_enabled: settings.shadows_enabled,
            mark_chunks: settings.mark_chunks,
            camera,
        }
    }
}

/// Shade pixel `(x, y)`: primary ray, closest hit, then the light loop.
///
/// Returns black for misses. The result is scaled so no channel exceeds one.
pub fn trace_pixel(scene: &Scene, frame: &FrameSettings, x: u32, y: u32) -> Color {
    let ray = frame
        .camera
        .generate_ray(x, y, frame.width, frame.height, frame.aspect_ratio);

    let mut rec = HitRecord::new();
    scene.closest_hit(&ray, &mut rec);
    if !rec.did_hit {
        return Color::ZERO;
    }

    let Some(material) = scene.material(rec.material) else {
        return Color::ZERO;
    };

    let offset_point = rec.point + rec.normal * RAY_OFFSET;
    let view = -ray.direction();
    let mut color = Color::ZERO;

    for light in scene.lights() {
        let to_light = light.direction_to(offset_point);
        let light_distance = light.distance(offset_point).min(f32::MAX);
        let l = to_light.normalize_or_zero();

        if frame.shadows_enabled {
            let shadow_ray = Ray::with_range(offset_point, l, RAY_T_MIN, light_distance);
            if scene.occluded(&shadow_ray) {
                continue;
            }
        }

        match frame.lighting_mode {
            LightingMode::ObservedArea => {
                let cos = rec.normal.dot(l).max(0.0);
                color += Color::splat(cos);
            }
            LightingMode::Radiance => {
                color += light.radiance(rec.point);
            }
            LightingMode::Brdf => {
                color += material.shade(&rec, l, view);
            }
            LightingMode::Combined => {
                let cos = rec.normal.dot(l).max(0.0);
                let radiance = light.radiance(rec.point);
                let brdf = material.shade(&rec, l, view);
                color += radiance * brdf * cos;
            }
        }
    }

    max_to_one(color)
}

/// Packed `0x00RRGGBB` value for pixel `(x, y)`.
#[inline]
pub fn shade_pixel(scene: &Scene, frame: &FrameSettings, x: u32, y: u32) -> u32 {
    pack_rgb(trace_pixel(scene, frame, x, y))
}
