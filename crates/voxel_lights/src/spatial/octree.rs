//! Octree spatial partitioning structure
//!
//! Divides 3D space into hierarchical regions so the overlap pass can find the lights near a
//! tile without testing every light. Each node subdivides into 8 octants when light density
//! exceeds a threshold. Lights are stored by center; queries expand node bounds by the
//! largest light radius so a light reaching into a node from a neighbor is still found.

use crate::foundation::math::Vec3;
use crate::lights::LightId;

use super::bounds::AABB;

/// Configuration for octree behavior
#[derive(Debug, Clone)]
pub struct OctreeConfig {
    /// Maximum lights per node before subdivision
    pub max_lights_per_node: usize,

    /// Maximum subdivision depth
    pub max_depth: u32,

    /// Minimum node size (prevents excessive subdivision)
    pub min_node_size: f32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_lights_per_node: 8,
            max_depth: 8,
            min_node_size: 1.0,
        }
    }
}

/// Light stored in the octree: its id, center and radius of influence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OctreeLight {
    /// Bake id of the light
    pub id: LightId,
    /// World-space center
    pub position: Vec3,
    /// Radius of influence
    pub radius: f32,
}

impl OctreeLight {
    /// Cube enclosing the light's sphere of influence
    pub fn bounding_box(&self) -> AABB {
        AABB::from_center_extents(self.position, Vec3::new(self.radius, self.radius, self.radius))
    }
}

/// Single node in the octree hierarchy
#[derive(Debug, Clone)]
pub struct OctreeNode {
    /// World-space bounds of this node
    pub bounds: AABB,

    /// Lights contained in this node (if leaf)
    pub lights: Vec<OctreeLight>,

    /// Child nodes (8 octants), None if this is a leaf
    pub children: Option<Box<[OctreeNode; 8]>>,

    /// Depth in the tree (0 = root)
    pub depth: u32,
}

impl OctreeNode {
    /// Create a new leaf node
    pub fn new(bounds: AABB, depth: u32) -> Self {
        Self {
            bounds,
            lights: Vec::new(),
            children: None,
            depth,
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Get the octant index (0-7) for a position within this node's bounds
    fn octant_index(&self, position: Vec3) -> usize {
        let center = self.bounds.center();
        let x_bit = usize::from(position.x >= center.x);
        let y_bit = usize::from(position.y >= center.y);
        let z_bit = usize::from(position.z >= center.z);

        // Octant layout:
        // 0: -X, -Y, -Z    4: -X, -Y, +Z
        // 1: +X, -Y, -Z    5: +X, -Y, +Z
        // 2: -X, +Y, -Z    6: -X, +Y, +Z
        // 3: +X, +Y, -Z    7: +X, +Y, +Z
        (z_bit << 2) | (y_bit << 1) | x_bit
    }

    /// Subdivide this node into 8 children
    fn subdivide(&mut self) {
        if self.children.is_some() {
            return;
        }

        // Children share the parent's exact split values so no point falls between them
        let center = self.bounds.center();
        let (min, max) = (self.bounds.min, self.bounds.max);
        let split = |positive: bool, axis: usize| {
            if positive {
                (center[axis], max[axis])
            } else {
                (min[axis], center[axis])
            }
        };

        let children: [OctreeNode; 8] = std::array::from_fn(|octant| {
            let (min_x, max_x) = split(octant & 1 != 0, 0);
            let (min_y, max_y) = split(octant & 2 != 0, 1);
            let (min_z, max_z) = split(octant & 4 != 0, 2);

            OctreeNode::new(
                AABB::new(Vec3::new(min_x, min_y, min_z), Vec3::new(max_x, max_y, max_z)),
                self.depth + 1,
            )
        });

        // Redistribute existing lights to children
        let lights_to_distribute = std::mem::take(&mut self.lights);
        let mut children = Box::new(children);
        for light in lights_to_distribute {
            let octant = self.octant_index(light.position);
            children[octant].lights.push(light);
        }

        self.children = Some(children);
    }

    /// Insert a light into this node; returns false if it lies outside the node bounds
    pub fn insert(&mut self, light: OctreeLight, config: &OctreeConfig) -> bool {
        if !self.bounds.contains_point(light.position) {
            return false;
        }

        self.insert_contained(light, config);
        true
    }

    /// Insert a light already known to lie in this node
    fn insert_contained(&mut self, light: OctreeLight, config: &OctreeConfig) {
        if self.is_leaf() {
            let should_subdivide = self.lights.len() >= config.max_lights_per_node
                && self.depth < config.max_depth
                && self.bounds.extents().x > config.min_node_size;

            if !should_subdivide {
                self.lights.push(light);
                return;
            }

            self.subdivide();
        }

        let octant = self.octant_index(light.position);
        match self.children {
            Some(ref mut children) => children[octant].insert_contained(light, config),
            None => self.lights.push(light),
        }
    }

    /// Collect lights whose bounding cube may intersect `query`
    ///
    /// `max_radius` is the largest light radius in the tree, used to expand node bounds.
    pub fn query_box(&self, query: &AABB, max_radius: f32, results: &mut Vec<OctreeLight>) {
        if !self.bounds.expanded(max_radius).intersects(query) {
            return;
        }

        for light in &self.lights {
            if light.bounding_box().intersects(query) {
                results.push(*light);
            }
        }

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.query_box(query, max_radius, results);
            }
        }
    }

    /// Count total lights in this node and all children
    pub fn count_lights(&self) -> usize {
        let mut count = self.lights.len();

        if let Some(ref children) = self.children {
            for child in children.iter() {
                count += child.count_lights();
            }
        }

        count
    }
}

/// Octree of light spheres
#[derive(Debug, Clone)]
pub struct LightOctree {
    /// Root node containing every inserted light
    pub root: OctreeNode,

    /// Lights outside the root bounds, tested by every query
    outside: Vec<OctreeLight>,

    /// Configuration
    config: OctreeConfig,

    /// Maximum light radius in the tree (updated on insert)
    max_radius: f32,
}

impl LightOctree {
    /// Create a new octree with given world bounds
    pub fn new(world_bounds: AABB, config: OctreeConfig) -> Self {
        Self {
            root: OctreeNode::new(world_bounds, 0),
            outside: Vec::new(),
            config,
            max_radius: 0.0,
        }
    }

    /// Build an octree sized to hold every light in `lights`
    pub fn from_lights(lights: impl IntoIterator<Item = OctreeLight>, config: OctreeConfig) -> Self {
        let lights: Vec<_> = lights.into_iter().collect();
        let bounds = AABB::from_points(lights.iter().map(|l| l.position))
            .unwrap_or_else(|| AABB::new(Vec3::zeros(), Vec3::zeros()))
            .expanded(1.0);

        let mut octree = Self::new(bounds, config);
        for light in lights {
            octree.insert(light);
        }
        octree
    }

    /// Insert a light into the octree
    ///
    /// Lights outside the root bounds are still kept and found by queries; returns false
    /// for those.
    pub fn insert(&mut self, light: OctreeLight) -> bool {
        if light.radius > self.max_radius {
            self.max_radius = light.radius;
        }

        if self.root.insert(light, &self.config) {
            return true;
        }

        log::debug!("Light {} at {:?} lies outside octree bounds", light.id, light.position);
        self.outside.push(light);
        false
    }

    /// Lights whose bounding cube intersects `query`; callers refine with an exact test
    pub fn query_box(&self, query: &AABB) -> Vec<OctreeLight> {
        let mut results: Vec<OctreeLight> = self
            .outside
            .iter()
            .filter(|light| light.bounding_box().intersects(query))
            .copied()
            .collect();
        self.root.query_box(query, self.max_radius, &mut results);
        results
    }

    /// Get total light count
    pub fn light_count(&self) -> usize {
        self.root.count_lights() + self.outside.len()
    }

    /// Largest radius inserted so far
    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }
}
