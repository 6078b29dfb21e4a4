use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use lumen_renderer::{ChunkRenderer, FrameBuffer, FrameStats, Presenter, RenderResult, Scene};

mod config;
mod scenes;

use config::ViewerConfig;

/// Logs frame rates and saves the requested screenshot.
struct HeadlessPresenter {
    stats_interval: Duration,
    last_report: Instant,
    frames_since_report: u32,
    screenshot: Option<(u64, PathBuf)>,
    total_frames: u64,
    total_render_time: Duration,
}

impl HeadlessPresenter {
    fn new(config: &ViewerConfig) -> Self {
        let screenshot = config
            .screenshot_frame()
            .zip(config.screenshot.clone());

        Self {
            stats_interval: Duration::from_secs_f32(config.stats_interval_secs.max(0.0)),
            last_report: Instant::now(),
            frames_since_report: 0,
            screenshot,
            total_frames: 0,
            total_render_time: Duration::ZERO,
        }
    }

    fn average_frame_time(&self) -> Option<Duration> {
        (self.total_frames > 0).then(|| self.total_render_time.div_f64(self.total_frames as f64))
    }

    fn finish(&self) {
        let Some(average) = self.average_frame_time() else {
            return;
        };
        log::info!(
            "Rendered {} frames, average {:.2?} per frame",
            self.total_frames,
            average
        );
    }
}

impl Presenter for HeadlessPresenter {
    fn present(&mut self, framebuffer: &FrameBuffer, stats: &FrameStats) -> RenderResult<()> {
        self.frames_since_report += 1;
        self.total_frames += 1;
        self.total_render_time += stats.elapsed;

        let since_report = self.last_report.elapsed();
        if since_report >= self.stats_interval {
            let fps = self.frames_since_report as f32 / since_report.as_secs_f32();
            log::info!("dFPS: {:.1} (frame {} took {:.2?})", fps, stats.frame_id, stats.elapsed);
            self.last_report = Instant::now();
            self.frames_since_report = 0;
        }

        if let Some((frame, path)) = &self.screenshot {
            if *frame == stats.frame_id {
                framebuffer.save(path)?;
                log::info!("Screenshot saved!");
            }
        }

        Ok(())
    }
}

/// Re-pose the scene for the next frame while no worker holds it.
fn update_scene(scene: &mut Arc<Scene>, config: &ViewerConfig, time: f32, delta_time: f32) {
    let Some(scene) = Arc::get_mut(scene) else {
        log::warn!("Scene still shared with workers, skipping update");
        return;
    };

    if config.camera_yaw_speed != 0.0 {
        scene.camera.rotate(config.camera_yaw_speed * delta_time, 0.0);
    }
    if config.animate {
        scenes::animate(scene, time);
    }
}

fn run(config: &ViewerConfig) -> Result<()> {
    let scene = scenes::build(config.scene, &config.obj_path)
        .with_context(|| format!("Failed to build scene {:?}", config.scene))?;
    let mut scene = Arc::new(scene);

    let mut renderer = ChunkRenderer::new(config.width, config.height, config.renderer_config())
        .context("Failed to start renderer")?;
    renderer.set_settings(config.render);

    log::info!(
        "Rendering {} frames at {}x{} ({}, shadows {})",
        config.frames,
        config.width,
        config.height,
        config.render.lighting_mode,
        if config.render.shadows_enabled { "on" } else { "off" }
    );

    let mut presenter = HeadlessPresenter::new(config);
    let start = Instant::now();
    let mut last_frame_time = start;

    for frame in 0..config.frames {
        let now = Instant::now();
        let delta_time = (now - last_frame_time).as_secs_f32();
        last_frame_time = now;

        update_scene(&mut scene, config, (now - start).as_secs_f32(), delta_time);

        if ViewerConfig::fires(config.cycle_lighting_every, frame) {
            renderer.cycle_lighting_mode();
        }
        if ViewerConfig::fires(config.toggle_shadows_every, frame) {
            renderer.toggle_shadows();
        }

        renderer
            .render(&scene, &mut presenter)
            .with_context(|| format!("Failed to render frame {}", frame))?;
    }

    renderer.shutdown();
    presenter.finish();
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Lumen Viewer");

    let config = ViewerConfig::resolve(std::env::args().nth(1).map(PathBuf::from))?;
    run(&config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneKind;

    fn small_config() -> ViewerConfig {
        ViewerConfig {
            width: 32,
            height: 24,
            frames: 4,
            scene: SceneKind::Reference,
            workers: Some(3),
            stats_interval_secs: 0.0,
            ..ViewerConfig::default()
        }
    }

    #[test]
    fn test_run_headless() {
        run(&small_config()).unwrap();
    }

    #[test]
    fn test_run_with_toggles_and_screenshot() {
        let path = std::env::temp_dir().join(format!("lumen_viewer_test_{}.png", std::process::id()));
        let config = ViewerConfig {
            cycle_lighting_every: Some(1),
            toggle_shadows_every: Some(2),
            camera_yaw_speed: 0.5,
            screenshot: Some(path.clone()),
            ..small_config()
        };

        run(&config).unwrap();
        assert!(path.exists());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_update_scene_skips_shared_scene() {
        let scene = scenes::build(SceneKind::Reference, std::path::Path::new("unused.obj")).unwrap();
        let mut scene = Arc::new(scene);
        let shared = Arc::clone(&scene);
        let before = shared.meshes()[0].transformed_positions().to_vec();

        update_scene(&mut scene, &small_config(), 1.0, 0.1);
        assert_eq!(shared.meshes()[0].transformed_positions(), before.as_slice());

        drop(shared);
        update_scene(&mut scene, &small_config(), 1.0, 0.1);
        assert_ne!(scene.meshes()[0].transformed_positions(), before.as_slice());
    }

    #[test]
    fn test_presenter_counts_frames() {
        let config = small_config();
        let mut presenter = HeadlessPresenter::new(&config);
        let framebuffer = FrameBuffer::new(2, 2).unwrap();
        let stats = FrameStats {
            frame_id: 0,
            elapsed: Duration::from_millis(4),
            slowest_chunk: Duration::from_millis(3),
            workers: 1,
        };

        presenter.present(&framebuffer, &stats).unwrap();
        presenter.present(&framebuffer, &stats).unwrap();
        assert_eq!(presenter.total_frames, 2);
        assert_eq!(presenter.total_render_time, Duration::from_millis(8));
        // Zero interval reports every frame
        assert_eq!(presenter.frames_since_report, 0);
        assert_eq!(presenter.average_frame_time(), Some(Duration::from_millis(4)));
    }

    #[test]
    fn test_average_frame_time_past_u32_frames() {
        let mut presenter = HeadlessPresenter::new(&small_config());
        assert_eq!(presenter.average_frame_time(), None);

        presenter.total_frames = u64::from(u32::MAX) + 2;
        presenter.total_render_time = Duration::from_secs(presenter.total_frames);
        let average = presenter.average_frame_time().unwrap();
        assert!((average.as_secs_f64() - 1.0).abs() < 1e-6);
    }
}
