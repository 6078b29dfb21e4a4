//! Viewer configuration, read from an optional JSON file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use lumen_renderer::{RenderSettings, RendererConfig};
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file when no CLI argument is given.
pub const CONFIG_ENV: &str = "LUMEN_CONFIG";

/// Which demo scene to build.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    /// Two large solid-color spheres in a box of planes
    SolidSpheres,
    /// Six small solid-color spheres and a point light
    SolidRoom,
    /// Rows of Cook-Torrance and Phong spheres under three lights
    Materials,
    /// Material spheres plus three animated triangles
    #[default]
    Reference,
    /// An OBJ mesh on a floor plane
    Bunny,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    /// Number of frames to render before exiting
    pub frames: u64,
    pub scene: SceneKind,
    /// Worker threads; defaults to the processor count
    pub workers: Option<usize>,
    pub poll_interval_ms: u64,
    pub render: RenderSettings,
    /// Re-pose scene meshes every frame
    pub animate: bool,
    /// Camera yaw speed in radians per second
    pub camera_yaw_speed: f32,
    /// Cycle the lighting mode every N frames
    pub cycle_lighting_every: Option<u64>,
    /// Toggle shadows every N frames
    pub toggle_shadows_every: Option<u64>,
    /// Where to save a screenshot
    pub screenshot: Option<PathBuf>,
    /// Frame to capture; defaults to the last one
    pub screenshot_frame: Option<u64>,
    /// Seconds between FPS reports
    pub stats_interval_secs: f32,
    pub obj_path: PathBuf,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            frames: 100,
            scene: SceneKind::default(),
            workers: None,
            poll_interval_ms: 2,
            render: RenderSettings::default(),
            animate: true,
            camera_yaw_speed: 0.0,
            cycle_lighting_every: None,
            toggle_shadows_every: None,
            screenshot: None,
            screenshot_frame: None,
            stats_interval_secs: 1.0,
            obj_path: PathBuf::from("assets/lowpoly_bunny.obj"),
        }
    }
}

impl ViewerConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid viewer config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_json(&json)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `path`, else from `$LUMEN_CONFIG`, else use defaults.
    pub fn resolve(path: Option<PathBuf>) -> Result<Self> {
        let path = path.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(path) => Self::load(&path),
            None => {
                log::info!("No config given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn renderer_config(&self) -> RendererConfig {
        let defaults = RendererConfig::default();
        RendererConfig {
            worker_count: self.workers.unwrap_or(defaults.worker_count),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    /// The frame that gets captured, if a screenshot was requested.
    pub fn screenshot_frame(&self) -> Option<u64> {
        self.screenshot.as_ref()?;
        Some(
            self.screenshot_frame
                .unwrap_or_else(|| self.frames.saturating_sub(1)),
        )
    }

    /// True if the toggle with period `every` fires before `frame`.
    pub fn fires(every: Option<u64>, frame: u64) -> bool {
        matches!(every, Some(n) if n > 0 && frame > 0 && frame % n == 0)
    }
}
