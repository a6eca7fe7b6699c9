//! Tile/light overlap queries
//!
//! Each light influences a sphere of radius `range`. The octree narrows the search to lights
//! whose bounding cube reaches the tile box; an exact sphere-vs-box test confirms them.

use crate::foundation::math::utils;
use crate::lights::{BakeLight, MAX_LIGHTS};
use crate::spatial::{LightOctree, OctreeConfig, OctreeLight, AABB};

/// Finds the lights overlapping a tile box
#[derive(Debug, Clone)]
pub struct OverlapIndexer {
    octree: LightOctree,
    lights_by_id: Vec<Option<BakeLight>>,
}

impl OverlapIndexer {
    /// Index a set of lights
    ///
    /// Lights with a non-positive or non-finite range, or a non-finite position, can never
    /// overlap anything and are left out.
    pub fn new(lights: &[BakeLight]) -> Self {
        let mut lights_by_id = vec![None; MAX_LIGHTS];
        let mut indexed = Vec::with_capacity(lights.len());

        for light in lights {
            if !(light.range.is_finite() && light.range > 0.0 && utils::is_finite(&light.position)) {
                log::debug!("Light {} has degenerate placement, skipping overlap", light.id);
                continue;
            }

            lights_by_id[light.id.index()] = Some(*light);
            indexed.push(OctreeLight {
                id: light.id,
                position: light.position,
                radius: light.range,
            });
        }

        log::trace!("Indexed {} of {} lights for overlap", indexed.len(), lights.len());

        Self {
            octree: LightOctree::from_lights(indexed, OctreeConfig::default()),
            lights_by_id,
        }
    }

    /// Number of lights that can produce overlaps
    pub fn indexed_count(&self) -> usize {
        self.octree.light_count()
    }

    /// Lights whose sphere touches `bounds`, in ascending id order
    pub fn overlapping(&self, bounds: &AABB) -> Vec<BakeLight> {
        let mut candidates: Vec<BakeLight> = self
            .octree
            .query_box(bounds)
            .into_iter()
            .filter(|candidate| bounds.intersects_sphere(candidate.position, candidate.radius))
            .filter_map(|candidate| self.lights_by_id[candidate.id.index()])
            .collect();

        candidates.sort_by_key(|light| light.id);
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::lights::LightId;

    fn unit_box_at(center: Vec3) -> AABB {
        AABB::from_center_extents(center, Vec3::new(0.5, 0.5, 0.5))
    }

    #[test]
    fn test_sphere_overlap_is_exact() {
        let lights = [
            BakeLight::new(LightId::new(0), Vec3::new(0.0, 0.0, 0.0), 1.0),
            // Bounding cube reaches the box corner region, sphere does not
            BakeLight::new(LightId::new(1), Vec3::new(1.2, 1.2, 1.2), 1.0),
            BakeLight::new(LightId::new(2), Vec3::new(2.0, 0.0, 0.0), 1.6),
        ];
        let indexer = OverlapIndexer::new(&lights);

        let ids: Vec<_> = indexer
            .overlapping(&unit_box_at(Vec3::zeros()))
            .iter()
            .map(|l| l.id.value())
            .collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn test_light_on_octree_split_is_reported() {
        let mut lights: Vec<_> = (0..8u8)
            .map(|id| {
                let x = if id < 4 { -0.1 } else { 0.9 };
                BakeLight::new(LightId::new(id), Vec3::new(x, 0.0, 0.0), 0.5)
            })
            .collect();
        // Center of the octree root, which is the first split plane
        let root = AABB::from_points(lights.iter().map(|l| l.position)).unwrap().expanded(1.0);
        let split = root.center();
        lights.push(BakeLight::new(LightId::new(8), split, 0.5));

        let indexer = OverlapIndexer::new(&lights);
        assert_eq!(indexer.indexed_count(), 9);

        let query = AABB::from_center_extents(split, Vec3::new(0.1, 0.1, 0.1));
        let ids: Vec<_> = indexer.overlapping(&query).iter().map(|l| l.id.value()).collect();
        assert!(ids.contains(&8), "light on the split plane missing from {ids:?}");
    }

    #[test]
    fn test_results_sorted_by_id() {
        let lights: Vec<_> = (0..12u8)
            .rev()
            .map(|id| BakeLight::new(LightId::new(id), Vec3::new(f32::from(id) * 0.1, 0.0, 0.0), 3.0))
            .collect();
        let indexer = OverlapIndexer::new(&lights);

        let ids: Vec<_> = indexer
            .overlapping(&unit_box_at(Vec3::zeros()))
            .iter()
            .map(|l| l.id.value())
            .collect();
        assert_eq!(ids, (0..12).collect::<Vec<u8>>());
    }

    #[test]
    fn test_degenerate_lights_never_overlap() {
        let lights = [
            BakeLight::new(LightId::new(0), Vec3::zeros(), 0.0),
            BakeLight::new(LightId::new(1), Vec3::zeros(), -1.0),
            BakeLight::new(LightId::new(2), Vec3::new(f32::NAN, 0.0, 0.0), 1.0),
            BakeLight::new(LightId::new(3), Vec3::zeros(), f32::INFINITY),
        ];
        let indexer = OverlapIndexer::new(&lights);

        assert_eq!(indexer.indexed_count(), 0);
        assert!(indexer.overlapping(&unit_box_at(Vec3::zeros())).is_empty());
    }

    #[test]
    fn test_empty_tile() {
        let lights = [BakeLight::new(LightId::new(0), Vec3::new(10.0, 0.0, 0.0), 1.0)];
        let indexer = OverlapIndexer::new(&lights);
        assert!(indexer.overlapping(&unit_box_at(Vec3::zeros())).is_empty());
    }
}
