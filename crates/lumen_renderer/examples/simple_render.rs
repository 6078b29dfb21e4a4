//! Simple render example.
//!
//! Renders two spheres on a plane with the chunk renderer and saves a PNG.
//!
//! Run with: cargo run --example simple_render -- out.png

use std::sync::Arc;

use lumen_core::colors;
use lumen_renderer::{
    Camera, ChunkRenderer, CookTorrance, Lambert, LambertPhong, RendererConfig, Scene, Vec3,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "simple_render.png".to_string());

    println!("Lumen - Simple Render Example");
    println!("=============================");

    let scene = Arc::new(build_scene());
    println!("Scene: {:?}", scene);

    let mut renderer = match ChunkRenderer::new(800, 450, RendererConfig::default()) {
        Ok(renderer) => renderer,
        Err(e) => {
            eprintln!("Error starting renderer: {}", e);
            std::process::exit(1);
        }
    };

    match renderer.render_frame(&scene) {
        Ok(stats) => println!(
            "Rendered frame {} with {} workers in {:?}",
            stats.frame_id, stats.workers, stats.elapsed
        ),
        Err(e) => {
            eprintln!("Error rendering: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = renderer.framebuffer().save(&output) {
        eprintln!("Error saving image: {}", e);
        std::process::exit(1);
    }
    println!("Saved to {}", output);
}

fn build_scene() -> Scene {
    let mut scene = Scene::new("simple");
    scene.camera = Camera::new(Vec3::new(0.0, 1.0, -6.0), 50.0).with_rotation(0.0, 0.1);

    let floor = scene.add_material(Lambert::new(colors::GRAY, 1.0));
    let red = scene.add_material(LambertPhong::new(colors::RED, 0.8, 0.4, 32.0));
    let metal = scene.add_material(CookTorrance::new(Vec3::new(0.972, 0.960, 0.915), 1.0, 0.3));

    scene.add_plane(Vec3::new(0.0, -1.0, 0.0), Vec3::Y, floor);
    scene.add_sphere(Vec3::new(-1.2, 0.0, 0.0), 1.0, red);
    scene.add_sphere(Vec3::new(1.2, 0.0, 0.5), 1.0, metal);

    scene.add_point_light(Vec3::new(-3.0, 4.0, -3.0), 60.0, colors::WHITE);
    scene.add_directional_light(Vec3::new(0.5, -1.0, 0.5), 0.3, Vec3::new(1.0, 0.9, 0.8));

    scene.build_bvh();
    scene
}
