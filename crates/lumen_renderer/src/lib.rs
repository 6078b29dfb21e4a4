//! Lumen renderer - tile-parallel CPU ray tracing
//!
//! Casts one primary ray per pixel, accelerates triangle meshes with a BVH,
//! shades hits with a direct-lighting loop and splits every frame into
//! column chunks rendered by a fixed pool of worker threads.

pub mod brdf;
pub mod bvh;
pub mod camera;
pub mod chunk;
pub mod error;
pub mod framebuffer;
pub mod hit;
pub mod lighting;
pub mod material;
pub mod scene;
pub mod scheduler;
pub mod worker;

pub use bvh::{Bvh, BvhNode, DEFAULT_LEAF_SIZE};
pub use camera::Camera;
pub use chunk::{split_columns, ColumnChunk};
pub use error::{RenderError, RenderResult};
pub use framebuffer::FrameBuffer;
pub use hit::{HitRecord, Hittable, Intersection};
pub use lighting::{shade_pixel, trace_pixel, FrameSettings, LightingMode, RenderSettings};
pub use material::{CookTorrance, Lambert, LambertPhong, Material, SolidColor};
pub use scene::Scene;
pub use scheduler::{ChunkRenderer, FrameStats, Presenter, RendererConfig};

/// Re-export common math types from lumen_math
pub use lumen_math::{Aabb, Ray, Vec3};
