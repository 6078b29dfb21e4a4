//! Example: Load and inspect an OBJ file.
//!
//! Run with: cargo run --example load_obj -- assets/bunny.obj

use std::env;

use lumen_core::{load_obj, CullMode, TriangleMesh};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: load_obj <path-to-obj-file>");
        println!("\nExample:");
        println!("  cargo run --example load_obj -- assets/bunny.obj");
        return;
    }

    let path = &args[1];
    println!("Loading OBJ file: {}", path);

    match load_obj(path) {
        Ok(obj) => {
            let mesh = TriangleMesh::from_obj(obj, CullMode::BackFace, 0);
            let bounds = mesh.bounds();

            println!("\n=== Mesh: {} ===", path);
            println!("Vertices: {}", mesh.vertex_count());
            println!("Triangles: {}", mesh.triangle_count());
            println!(
                "Bounds: ({:.2}, {:.2}, {:.2}) to ({:.2}, {:.2}, {:.2})",
                bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
            );
        }
        Err(e) => {
            eprintln!("Error loading OBJ: {}", e);
            std::process::exit(1);
        }
    }
}
