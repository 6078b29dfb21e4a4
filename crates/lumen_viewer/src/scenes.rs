//! Demo scenes.

use std::f32::consts::TAU;
use std::path::Path;

use anyhow::{Context, Result};
use lumen_core::{colors, load_obj, Color, CullMode, Triangle, TriangleMesh};
use lumen_math::Vec3;
use lumen_renderer::{Camera, CookTorrance, Lambert, LambertPhong, Scene, SolidColor};

use crate::config::SceneKind;

const METAL: Color = Color::new(0.972, 0.960, 0.915);
const PLASTIC: Color = Color::new(0.75, 0.75, 0.75);
const GRAY_BLUE: Color = Color::new(0.49, 0.57, 0.57);

/// Build the scene `kind`. Only the bunny scene reads `obj_path`.
pub fn build(kind: SceneKind, obj_path: &Path) -> Result<Scene> {
    let mut scene = match kind {
        SceneKind::SolidSpheres => solid_spheres(),
        SceneKind::SolidRoom => solid_room(),
        SceneKind::Materials => materials(),
        SceneKind::Reference => reference(),
        SceneKind::Bunny => bunny(obj_path)?,
    };
    scene.build_bvh();

    log::info!(
        "Built scene '{}': {} spheres, {} planes, {} meshes ({} triangles), {} lights",
        scene.name,
        scene.spheres().len(),
        scene.planes().len(),
        scene.meshes().len(),
        scene.triangle_count(),
        scene.lights().len()
    );
    Ok(scene)
}

/// Spin every mesh around +Y, one full turn back and forth per `2π` seconds.
pub fn animate(scene: &mut Scene, time: f32) {
    if scene.meshes().is_empty() {
        return;
    }

    let yaw = (time.cos() + 1.0) / 2.0 * TAU;
    for i in 0..scene.meshes().len() {
        if let Some(mesh) = scene.mesh_mut(i) {
            mesh.rotate_y(yaw);
        }
    }
    scene.update_meshes();
}

fn solid_materials(scene: &mut Scene) -> [usize; 5] {
    // Material 0 is the default solid red
    let blue = scene.add_material(SolidColor::new(colors::BLUE));
    let yellow = scene.add_material(SolidColor::new(colors::YELLOW));
    let green = scene.add_material(SolidColor::new(colors::GREEN));
    let magenta = scene.add_material(SolidColor::new(colors::MAGENTA));
    [0, blue, yellow, green, magenta]
}

fn solid_spheres() -> Scene {
    let mut scene = Scene::new("Solid Spheres");
    scene.camera = Camera::new(Vec3::ZERO, 90.0);
    let [red, blue, yellow, green, magenta] = solid_materials(&mut scene);

    scene.add_sphere(Vec3::new(-25.0, 0.0, 100.0), 50.0, red);
    scene.add_sphere(Vec3::new(25.0, 0.0, 100.0), 50.0, blue);

    scene.add_plane(Vec3::new(-75.0, 0.0, 0.0), Vec3::X, green);
    scene.add_plane(Vec3::new(75.0, 0.0, 0.0), -Vec3::X, green);
    scene.add_plane(Vec3::new(0.0, -75.0, 0.0), Vec3::Y, yellow);
    scene.add_plane(Vec3::new(0.0, 75.0, 0.0), -Vec3::Y, yellow);
    scene.add_plane(Vec3::new(0.0, 0.0, 125.0), -Vec3::Z, magenta);

    scene
}

fn solid_room() -> Scene {
    let mut scene = Scene::new("Solid Room");
    scene.camera = Camera::new(Vec3::new(0.0, 3.0, -9.0), 45.0);
    let [red, blue, yellow, green, magenta] = solid_materials(&mut scene);

    for (row, y) in [1.0, 3.0].into_iter().enumerate() {
        for (col, x) in [-1.75, 0.0, 1.75].into_iter().enumerate() {
            let material = if (row + col) % 2 == 0 { red } else { blue };
            scene.add_sphere(Vec3::new(x, y, 0.0), 0.75, material);
        }
    }

    scene.add_plane(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, green);
    scene.add_plane(Vec3::new(5.0, 0.0, 0.0), -Vec3::X, green);
    scene.add_plane(Vec3::ZERO, Vec3::Y, yellow);
    scene.add_plane(Vec3::new(0.0, 10.0, 0.0), -Vec3::Y, yellow);
    scene.add_plane(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z, magenta);

    scene.add_point_light(Vec3::new(0.0, 5.0, -5.0), 70.0, colors::WHITE);
    scene
}

/// Gray-blue box with the back wall at z = 10.
fn add_room(scene: &mut Scene, material: usize) {
    scene.add_plane(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z, material);
    scene.add_plane(Vec3::ZERO, Vec3::Y, material);
    scene.add_plane(Vec3::new(0.0, 10.0, 0.0), -Vec3::Y, material);
    scene.add_plane(Vec3::new(5.0, 0.0, 0.0), -Vec3::X, material);
    scene.add_plane(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, material);
}

fn add_three_point_lights(scene: &mut Scene) {
    scene.add_point_light(Vec3::new(0.0, 5.0, 5.0), 50.0, Color::new(1.0, 0.61, 0.45));
    scene.add_point_light(Vec3::new(-2.5, 5.0, -5.0), 70.0, Color::new(1.0, 0.8, 0.45));
    scene.add_point_light(Vec3::new(2.5, 2.5, -5.0), 50.0, Color::new(0.34, 0.47, 0.68));
}

fn materials() -> Scene {
    let mut scene = Scene::new("Materials");
    scene.camera = Camera::new(Vec3::new(0.0, 3.0, -9.0), 45.0);

    let gray_blue = scene.add_material(Lambert::new(GRAY_BLUE, 1.0));
    add_room(&mut scene, gray_blue);

    for (i, roughness) in [1.0, 0.6, 0.1].into_iter().enumerate() {
        let x = -1.75 + 1.75 * i as f32;
        let metal = scene.add_material(CookTorrance::new(METAL, 1.0, roughness));
        let plastic = scene.add_material(CookTorrance::new(PLASTIC, 0.0, roughness));
        scene.add_sphere(Vec3::new(x, 1.0, 0.0), 0.75, metal);
        scene.add_sphere(Vec3::new(x, 3.0, 0.0), 0.75, plastic);
    }

    for (i, exponent) in [60.0, 40.0, 20.0].into_iter().enumerate() {
        let x = -1.75 + 1.75 * i as f32;
        let phong = scene.add_material(LambertPhong::new(colors::BLUE, 1.0, 1.0, exponent));
        scene.add_sphere(Vec3::new(x, 5.0, 0.0), 0.75, phong);
    }

    add_three_point_lights(&mut scene);
    scene
}

fn reference() -> Scene {
    let mut scene = Scene::new("Reference Scene");
    scene.camera = Camera::new(Vec3::new(0.0, 0.2, -9.0), 45.0);

    let rough_metal = scene.add_material(CookTorrance::new(METAL, 1.0, 1.0));
    let smooth_metal = scene.add_material(CookTorrance::new(METAL, 1.0, 0.1));
    let rough_plastic = scene.add_material(CookTorrance::new(PLASTIC, 0.0, 1.0));
    let medium_plastic = scene.add_material(CookTorrance::new(PLASTIC, 0.0, 0.6));
    let smooth_plastic = scene.add_material(CookTorrance::new(PLASTIC, 0.0, 0.1));
    let gray_blue = scene.add_material(Lambert::new(GRAY_BLUE, 1.0));
    let white = scene.add_material(Lambert::new(colors::WHITE, 1.0));

    add_room(&mut scene, gray_blue);

    scene.add_sphere(Vec3::new(-1.75, 1.0, 0.0), 0.75, rough_metal);
    scene.add_sphere(Vec3::new(1.75, 1.0, 0.0), 0.75, smooth_metal);
    scene.add_sphere(Vec3::new(-1.75, 3.0, 0.0), 0.75, rough_plastic);
    scene.add_sphere(Vec3::new(0.0, 3.0, 0.0), 0.75, medium_plastic);
    scene.add_sphere(Vec3::new(1.75, 3.0, 0.0), 0.75, smooth_plastic);

    // Clockwise as seen from the camera, so the normal faces -Z
    let base = Triangle::new(
        Vec3::new(-0.75, 1.5, 0.0),
        Vec3::new(0.75, 0.0, 0.0),
        Vec3::new(-0.75, 0.0, 0.0),
    );
    for x in [-1.75, 0.0, 1.75] {
        let mut mesh = TriangleMesh::new(CullMode::BackFace, white);
        mesh.append_triangle(&base, false);
        mesh.translate(Vec3::new(x, 4.5, 0.0));
        mesh.update_transforms();
        scene.add_triangle_mesh(mesh);
    }

    add_three_point_lights(&mut scene);
    scene
}

fn bunny(obj_path: &Path) -> Result<Scene> {
    let mut scene = Scene::new("Bunny Scene");
    scene.camera = Camera::new(Vec3::new(0.0, 0.2, -9.0), 45.0);

    let white = scene.add_material(Lambert::new(colors::WHITE, 1.0));
    let gray_blue = scene.add_material(Lambert::new(GRAY_BLUE, 1.0));

    add_three_point_lights(&mut scene);
    scene.add_plane(Vec3::ZERO, Vec3::Y, gray_blue);

    let obj = load_obj(obj_path)
        .with_context(|| format!("Failed to load mesh {}", obj_path.display()))?;
    let mut mesh = TriangleMesh::from_obj(obj, CullMode::BackFace, white);
    mesh.translate(Vec3::new(3.0, 0.0, 0.0));
    mesh.update_transforms();
    scene.add_triangle_mesh(mesh);

    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_renderer::HitRecord;
    use lumen_math::Ray;

    const ALL_BUILTIN: [SceneKind; 4] = [
        SceneKind::SolidSpheres,
        SceneKind::SolidRoom,
        SceneKind::Materials,
        SceneKind::Reference,
    ];

    #[test]
    fn test_builtin_scenes_build() {
        for kind in ALL_BUILTIN {
            let scene = build(kind, Path::new("unused.obj")).unwrap();
            assert!(!scene.is_bvh_stale(), "{kind:?}");
            assert!(!scene.planes().is_empty(), "{kind:?}");
            assert!(!scene.spheres().is_empty(), "{kind:?}");
        }
    }

    #[test]
    fn test_reference_scene_layout() {
        let scene = build(SceneKind::Reference, Path::new("unused.obj")).unwrap();
        assert_eq!(scene.planes().len(), 5);
        assert_eq!(scene.spheres().len(), 5);
        assert_eq!(scene.meshes().len(), 3);
        assert_eq!(scene.triangle_count(), 3);
        assert_eq!(scene.lights().len(), 3);
        assert_eq!(scene.bvh().triangle_count(), 3);
    }

    #[test]
    fn test_reference_triangles_face_camera() {
        let scene = build(SceneKind::Reference, Path::new("unused.obj")).unwrap();

        // Through the middle triangle, which spans x in [-0.75, 0.75], y in [4.5, 6]
        let origin = scene.camera.origin;
        let target = Vec3::new(-0.4, 4.8, 0.0);
        let ray = Ray::new(origin, (target - origin).normalize());

        let mut rec = HitRecord::new();
        scene.closest_hit(&ray, &mut rec);
        assert!(rec.did_hit);
        assert!((rec.point.z).abs() < 1e-3);
        assert!(rec.normal.z < 0.0);
    }

    #[test]
    fn test_animate_rotates_meshes() {
        let mut scene = build(SceneKind::Reference, Path::new("unused.obj")).unwrap();
        let before = scene.meshes()[0].transformed_positions().to_vec();

        animate(&mut scene, 1.0);

        assert!(!scene.is_bvh_stale());
        assert!(scene.meshes().iter().all(|m| !m.is_dirty()));
        assert_ne!(scene.meshes()[0].transformed_positions(), before.as_slice());
    }

    #[test]
    fn test_animate_without_meshes_is_noop() {
        let mut scene = build(SceneKind::SolidRoom, Path::new("unused.obj")).unwrap();
        animate(&mut scene, 2.0);
        assert!(!scene.is_bvh_stale());
        assert!(scene.meshes().is_empty());
    }

    #[test]
    fn test_bunny_missing_obj_errors() {
        let err = build(SceneKind::Bunny, Path::new("/nonexistent/bunny.obj")).unwrap_err();
        assert!(err.to_string().contains("Failed to load mesh"));
    }

    #[test]
    fn test_bunny_from_obj() {
        let path = std::env::temp_dir().join(format!("lumen_bunny_test_{}.obj", std::process::id()));
        std::fs::write(
            &path,
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 2 3\nf 1 3 4\n",
        )
        .unwrap();

        let scene = build(SceneKind::Bunny, &path).unwrap();
        assert_eq!(scene.meshes().len(), 1);
        assert_eq!(scene.triangle_count(), 2);
        assert_eq!(scene.planes().len(), 1);

        let _ = std::fs::remove_file(&path);
    }
}
