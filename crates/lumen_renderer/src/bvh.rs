//! Bounding Volume Hierarchy (BVH) over triangle meshes.
//!
//! Nodes live in one flat array sized `2 * triangle_count` up front. Triangles
//! are referenced through an index array that the build permutes in place, so
//! every node covers a contiguous range of it. Global triangle indices run
//! over the meshes in order; the BVH never copies triangle data and queries
//! take the same mesh slice the BVH was built from.
//!
//! The hierarchy does not track mesh changes. Rebuild it whenever geometry
//! or transforms change.

use lumen_core::{Triangle, TriangleMesh};
use lumen_math::{Aabb, Ray, Vec3};

use crate::hit::{HitRecord, Hittable};

/// Maximum triangles per leaf node before splitting.
pub const DEFAULT_LEAF_SIZE: usize = 2;

/// Padding added to triangle bounds so axis-aligned triangles don't produce
/// zero-thickness boxes.
const BOUNDS_PADDING: f32 = 1e-4;

/// A node of the flattened tree.
///
/// Leaves have `tri_count > 0` and cover `[left_first, left_first + tri_count)`
/// of the index array. Internal nodes have `tri_count == 0`; their children
/// sit at `left_first` and `left_first + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BvhNode {
    pub bounds: Aabb,
    pub left_first: u32,
    pub tri_count: u32,
}

impl BvhNode {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.tri_count > 0
    }

    #[inline]
    pub fn left_child(&self) -> usize {
        self.left_first as usize
    }

    #[inline]
    pub fn right_child(&self) -> usize {
        self.left_first as usize + 1
    }

    /// Range into the triangle index array. Empty for internal nodes.
    #[inline]
    pub fn triangle_range(&self) -> std::ops::Range<usize> {
        let first = self.left_first as usize;
        if self.is_leaf() {
            first..first + self.tri_count as usize
        } else {
            first..first
        }
    }
}

/// Per-triangle data needed while building.
struct BuildPrim {
    bounds: Aabb,
    centroid: Vec3,
}

/// Flattened BVH with root at node 0.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    indices: Vec<u32>,
    nodes_used: usize,
}

impl Bvh {
    /// Build a BVH over every triangle of `meshes`.
    ///
    /// All meshes must have up-to-date transforms.
    pub fn build(meshes: &[TriangleMesh]) -> Self {
        Self::build_with_leaf_size(meshes, DEFAULT_LEAF_SIZE)
    }

    /// Build with a custom leaf size (minimum 1).
    pub fn build_with_leaf_size(meshes: &[TriangleMesh], leaf_size: usize) -> Self {
        let leaf_size = leaf_size.max(1);
        let start = std::time::Instant::now();

        let prims: Vec<BuildPrim> = meshes
            .iter()
            .flat_map(|mesh| (0..mesh.triangle_count()).map(move |i| mesh.triangle(i)))
            .map(|tri| match tri {
                Some(tri) => BuildPrim {
                    bounds: tri.bounds().padded(BOUNDS_PADDING),
                    centroid: tri.centroid,
                },
                None => BuildPrim {
                    bounds: Aabb::EMPTY,
                    centroid: Vec3::ZERO,
                },
            })
            .collect();

        let count = prims.len();
        if count == 0 {
            log::debug!("BVH build skipped, no triangles");
            return Self::default();
        }

        let mut bvh = Self {
            nodes: vec![BvhNode::default(); 2 * count],
            indices: (0..count as u32).collect(),
            nodes_used: 1,
        };

        bvh.nodes[0] = BvhNode {
            bounds: Aabb::EMPTY,
            left_first: 0,
            tri_count: count as u32,
        };
        bvh.refit(0, &prims);
        bvh.subdivide(&prims, leaf_size);

        log::info!(
            "Built BVH: {} triangles, {} nodes in {:.2?}",
            count,
            bvh.nodes_used,
            start.elapsed()
        );

        bvh
    }

    /// Recompute a node's bounds from the triangles in its range.
    fn refit(&mut self, node_idx: usize, prims: &[BuildPrim]) {
        let node = self.nodes[node_idx];
        let first = node.left_first as usize;
        let last = first + node.tri_count as usize;

        let bounds = self.indices[first..last]
            .iter()
            .fold(Aabb::EMPTY, |acc, &i| acc.union(&prims[i as usize].bounds));

        self.nodes[node_idx].bounds = bounds;
    }

    /// Midpoint split along the longest axis, depth-first and left-first.
    fn subdivide(&mut self, prims: &[BuildPrim], leaf_size: usize) {
        let mut stack = vec![0usize];

        while let Some(node_idx) = stack.pop() {
            let node = self.nodes[node_idx];
            let count = node.tri_count as usize;
            if count <= leaf_size {
                continue;
            }

            let axis = node.bounds.longest_axis();
            let split = node.bounds.min[axis] + node.bounds.extent()[axis] * 0.5;

            // Two-pointer partition of the node's index range
            let first = node.left_first as usize;
            let mut i = first;
            let mut j = first + count;
            while i < j {
                if prims[self.indices[i] as usize].centroid[axis] < split {
                    i += 1;
                } else {
                    j -= 1;
                    self.indices.swap(i, j);
                }
            }

            let left_count = i - first;
            if left_count == 0 || left_count == count {
                continue;
            }

            let left = self.nodes_used;
            self.nodes_used += 2;

            self.nodes[left] = BvhNode {
                bounds: Aabb::EMPTY,
                left_first: first as u32,
                tri_count: left_count as u32,
            };
            self.nodes[left + 1] = BvhNode {
                bounds: Aabb::EMPTY,
                left_first: i as u32,
                tri_count: (count - left_count) as u32,
            };
            self.refit(left, prims);
            self.refit(left + 1, prims);

            self.nodes[node_idx].left_first = left as u32;
            self.nodes[node_idx].tri_count = 0;

            stack.push(left + 1);
            stack.push(left);
        }
    }

    /// Closest-hit traversal. Updates `rec` whenever a closer triangle is hit.
    pub fn intersect(&self, meshes: &[TriangleMesh], ray: &Ray, rec: &mut HitRecord) {
        if self.nodes_used == 0 {
            return;
        }
        self.intersect_node(0, meshes, ray, rec);
    }

    fn intersect_node(&self, node_idx: usize, meshes: &[TriangleMesh], ray: &Ray, rec: &mut HitRecord) {
        let node = &self.nodes[node_idx];
        if !node.bounds.intersect(ray, rec.t) {
            return;
        }

        if node.is_leaf() {
            for &index in &self.indices[node.triangle_range()] {
                if let Some(tri) = triangle_at(meshes, index as usize) {
                    tri.hit(ray, rec);
                }
            }
            return;
        }

        self.intersect_node(node.left_child(), meshes, ray, rec);
        self.intersect_node(node.right_child(), meshes, ray, rec);
    }

    /// Any-hit traversal. Returns on the first triangle hit found.
    pub fn occluded(&self, meshes: &[TriangleMesh], ray: &Ray) -> bool {
        if self.nodes_used == 0 {
            return false;
        }
        self.occluded_node(0, meshes, ray)
    }

    fn occluded_node(&self, node_idx: usize, meshes: &[TriangleMesh], ray: &Ray) -> bool {
        let node = &self.nodes[node_idx];
        if !node.bounds.intersect(ray, f32::INFINITY) {
            return false;
        }

        if node.is_leaf() {
            return self.indices[node.triangle_range()].iter().any(|&index| {
                triangle_at(meshes, index as usize).is_some_and(|tri| tri.occludes(ray))
            });
        }

        self.occluded_node(node.left_child(), meshes, ray)
            || self.occluded_node(node.right_child(), meshes, ray)
    }

    /// Nodes in use, root first.
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes[..self.nodes_used]
    }

    /// The permuted triangle index array.
    pub fn triangle_indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of nodes allocated by the build.
    pub fn node_count(&self) -> usize {
        self.nodes_used
    }

    /// Number of nodes the array was pre-sized for.
    pub fn node_capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Number of triangles the BVH was built over.
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes_used == 0
    }

    /// Bounds of the whole hierarchy.
    pub fn bounds(&self) -> Aabb {
        self.nodes().first().map_or(Aabb::EMPTY, |root| root.bounds)
    }
}

/// Look up a triangle by its global index across `meshes`.
pub fn triangle_at(meshes: &[TriangleMesh], index: usize) -> Option<Triangle> {
    debug_assert!(
        index < meshes.iter().map(|m| m.triangle_count()).sum::<usize>(),
        "triangle index {} out of range",
        index
    );

    let mut local = index;
    for mesh in meshes {
        let count = mesh.triangle_count();
        if local < count {
            return mesh.triangle(local);
        }
        local -= count;
    }
    None
}
