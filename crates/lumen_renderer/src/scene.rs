//! Renderable scene: primitives, lights, materials and the mesh BVH.

use lumen_core::{colors, Color, Light, MaterialId, Plane, Sphere, TriangleMesh};
use lumen_math::{Ray, Vec3};

use crate::bvh::Bvh;
use crate::camera::Camera;
use crate::hit::{HitRecord, Hittable};
use crate::material::{Material, SolidColor};

/// A complete scene ready for rendering.
///
/// Built once on the main thread, then shared read-only with the render
/// workers for the duration of a frame. Material 0 always exists and is a
/// solid red fallback.
pub struct Scene {
    pub name: String,
    pub camera: Camera,

    spheres: Vec<Sphere>,
    planes: Vec<Plane>,
    meshes: Vec<TriangleMesh>,
    lights: Vec<Light>,
    materials: Vec<Box<dyn Material>>,

    bvh: Bvh,
    /// Set when meshes changed since the last BVH build
    bvh_stale: bool,
}

impl Scene {
    /// Create an empty scene holding only the fallback material.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            camera: Camera::default(),
            spheres: Vec::new(),
            planes: Vec::new(),
            meshes: Vec::new(),
            lights: Vec::new(),
            materials: vec![Box::new(SolidColor::new(colors::RED))],
            bvh: Bvh::default(),
            bvh_stale: false,
        }
    }

    pub fn add_sphere(&mut self, center: Vec3, radius: f32, material: MaterialId) -> usize {
        self.check_material(material);
        self.spheres.push(Sphere::new(center, radius, material));
        self.spheres.len() - 1
    }

    pub fn add_plane(&mut self, origin: Vec3, normal: Vec3, material: MaterialId) -> usize {
        self.check_material(material);
        self.planes.push(Plane::new(origin, normal, material));
        self.planes.len() - 1
    }

    /// Add a mesh. The BVH has to be rebuilt before the next query.
    pub fn add_triangle_mesh(&mut self, mesh: TriangleMesh) -> usize {
        self.check_material(mesh.material);
        self.meshes.push(mesh);
        self.bvh_stale = true;
        self.meshes.len() - 1
    }

    pub fn add_point_light(&mut self, origin: Vec3, intensity: f32, color: Color) -> usize {
        self.lights.push(Light::point(origin, color, intensity));
        self.lights.len() - 1
    }

    pub fn add_directional_light(&mut self, direction: Vec3, intensity: f32, color: Color) -> usize {
        self.lights.push(Light::directional(direction, color, intensity));
        self.lights.len() - 1
    }

    /// Add a material and return its index.
    pub fn add_material<M: Material + 'static>(&mut self, material: M) -> MaterialId {
        self.materials.push(Box::new(material));
        self.materials.len() - 1
    }

    fn check_material(&self, material: MaterialId) {
        if material >= self.materials.len() {
            log::warn!(
                "Material {} does not exist yet ({} materials), add it before rendering",
                material,
                self.materials.len()
            );
        }
    }

    /// Mutable access to a mesh, e.g. to re-pose it between frames.
    ///
    /// Marks the BVH stale; call [`update_meshes`](Self::update_meshes) afterwards.
    pub fn mesh_mut(&mut self, index: usize) -> Option<&mut TriangleMesh> {
        let mesh = self.meshes.get_mut(index)?;
        self.bvh_stale = true;
        Some(mesh)
    }

    /// Regenerate dirty mesh transforms and rebuild the BVH.
    pub fn update_meshes(&mut self) {
        for mesh in self.meshes.iter_mut().filter(|m| m.is_dirty()) {
            mesh.update_transforms();
        }
        self.build_bvh();
    }

    /// Build the BVH over all meshes.
    pub fn build_bvh(&mut self) {
        self.bvh = Bvh::build(&self.meshes);
        self.bvh_stale = false;
        log::debug!(
            "Scene '{}': BVH rebuilt over {} meshes",
            self.name,
            self.meshes.len()
        );
    }

    /// Closest-hit query over every primitive. Inspect `rec.did_hit`.
    pub fn closest_hit(&self, ray: &Ray, rec: &mut HitRecord) {
        debug_assert!(!self.bvh_stale, "BVH is stale, call update_meshes first");

        for sphere in &self.spheres {
            sphere.hit(ray, rec);
        }
        for plane in &self.planes {
            plane.hit(ray, rec);
        }
        self.bvh.intersect(&self.meshes, ray, rec);
    }

    /// Does any primitive intersect the ray? Brute force over all meshes.
    pub fn does_hit(&self, ray: &Ray) -> bool {
        self.spheres.iter().any(|s| s.occludes(ray))
            || self.planes.iter().any(|p| p.occludes(ray))
            || self.meshes.iter().any(|m| m.occludes(ray))
    }

    /// Occlusion query using the BVH for meshes. Used for shadow rays.
    pub fn occluded(&self, ray: &Ray) -> bool {
        debug_assert!(!self.bvh_stale, "BVH is stale, call update_meshes first");

        self.spheres.iter().any(|s| s.occludes(ray))
            || self.planes.iter().any(|p| p.occludes(ray))
            || self.bvh.occluded(&self.meshes, ray)
    }

    /// Look up a material, `None` if the index is out of range.
    pub fn material(&self, index: MaterialId) -> Option<&dyn Material> {
        debug_assert!(
            index < self.materials.len(),
            "material index {} out of range ({} materials)",
            index,
            self.materials.len()
        );
        self.materials.get(index).map(|m| m.as_ref())
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn meshes(&self) -> &[TriangleMesh] {
        &self.meshes
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    pub fn is_bvh_stale(&self) -> bool {
        self.bvh_stale
    }

    /// Total triangles over all meshes.
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.triangle_count()).sum()
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("spheres", &self.spheres.len())
            .field("planes", &self.planes.len())
            .field("meshes", &self.meshes.len())
            .field("lights", &self.lights.len())
            .field("materials", &self.materials.len())
            .finish()
    }
}
