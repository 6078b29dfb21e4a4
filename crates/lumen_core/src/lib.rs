//! Lumen Core - Scene data for the Lumen ray tracer.
//!
//! This crate provides:
//!
//! - **Primitives**: `Sphere`, `Plane`, `Triangle` with its `CullMode`
//! - **Meshes**: `TriangleMesh` with object-space and world-space data
//! - **Lights**: point and directional `Light`s
//! - **OBJ support**: Wavefront OBJ geometry loaded through `tobj`
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{load_obj, CullMode, TriangleMesh};
//!
//! let obj = load_obj("bunny.obj")?;
//! let mut mesh = TriangleMesh::from_obj(obj, CullMode::BackFace, 1);
//! mesh.translate(Vec3::new(0.0, -1.0, 5.0));
//! mesh.update_transforms();
//! ```

pub mod color;
pub mod light;
pub mod mesh;
pub mod obj;
pub mod shapes;
pub mod triangle;

/// Index into a scene's material list.
pub type MaterialId = usize;

// Re-export commonly used types
pub use color::{colors, Color};
pub use light::Light;
pub use mesh::TriangleMesh;
pub use obj::{load_obj, parse_obj, ObjError, ObjMesh, ObjResult};
pub use shapes::{Plane, Sphere};
pub use triangle::{CullMode, Triangle};
