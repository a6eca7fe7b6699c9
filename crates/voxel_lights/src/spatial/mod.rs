//! Spatial partitioning data structures
//!
//! Provides bounding boxes and an octree of light spheres used by the overlap pass to find
//! candidate lights for each tile.

mod bounds;
mod octree;

pub use bounds::AABB;
pub use octree::{LightOctree, OctreeConfig, OctreeLight, OctreeNode};
