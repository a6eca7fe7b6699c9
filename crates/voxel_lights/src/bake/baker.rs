//! Bake pipeline
//!
//! Runs the whole bake as one blocking pass:
//!
//! 1. number enabled lights densely in registry order,
//! 2. rebuild the snapshot arrays,
//! 3. for every tile of every layer: overlap query, importance ranking, texel encode.
//!
//! The result is staged in memory. Nothing in the registry changes until the caller applies
//! the [`LightNumbering`], so a bake whose output cannot be committed leaves the previous
//! state intact.

use thiserror::Error;

use crate::core::VolumeConfig;
use crate::lights::{BakeLight, LightId, LightKey, LightRegistry, MAX_LIGHTS};
use crate::snapshot::LightArraySnapshot;
use crate::storage::StoreError;

use super::codec::{encode_texel, IndexTexel};
use super::grid::TileGrid;
use super::overlap::OverlapIndexer;
use super::ranking::{rank, MAX_LIGHTS_PER_TILE};
use super::texture::{IndexTexture, TextureDescriptor, TextureError};

/// Bake errors
#[derive(Debug, Error)]
pub enum BakeError {
    /// More enabled lights than ids
    #[error("{count} enabled lights exceed the limit of {MAX_LIGHTS}")]
    TooManyLights {
        /// Enabled lights in the registry
        count: usize,
    },

    /// Two lights share one id
    #[error("Light id {0} assigned to more than one light")]
    DuplicateLightId(LightId),

    /// Volume configuration failed validation
    #[error("Invalid volume configuration: {0}")]
    InvalidConfig(String),

    /// Texture error
    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    /// Loading or committing the texture failed
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Counters collected during a bake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BakeStats {
    /// Lights that took part in the bake
    pub lights: usize,
    /// Tiles processed over all layers
    pub tiles: usize,
    /// Tiles reached by at least one light
    pub lit_tiles: usize,
    /// Tiles where more lights overlapped than a texel can count
    pub truncated_tiles: usize,
    /// Largest number of overlapping lights seen in one tile
    pub max_candidates: usize,
}

/// Everything a bake produces
#[derive(Debug, Clone)]
pub struct BakeOutput {
    /// Light-index texture
    pub texture: IndexTexture,
    /// Snapshot arrays rebuilt from the baked lights
    pub snapshot: LightArraySnapshot,
    /// Counters
    pub stats: BakeStats,
}

/// Bake already-numbered lights into a fresh index texture and snapshot
pub fn bake_lights(lights: &[BakeLight], config: &VolumeConfig) -> Result<BakeOutput, BakeError> {
    config.validate().map_err(BakeError::InvalidConfig)?;
    let texture = IndexTexture::new(TextureDescriptor::new(config.texture_side()))?;
    bake_lights_into(lights, config, texture)
}

/// Bake already-numbered lights, overwriting every texel of `texture`
///
/// `texture` is usually the one loaded from a store; its side must match the volume.
pub fn bake_lights_into(
    lights: &[BakeLight],
    config: &VolumeConfig,
    mut texture: IndexTexture,
) -> Result<BakeOutput, BakeError> {
    config.validate().map_err(BakeError::InvalidConfig)?;

    let mut seen = [false; MAX_LIGHTS];
    for light in lights {
        if std::mem::replace(&mut seen[light.id.index()], true) {
            return Err(BakeError::DuplicateLightId(light.id));
        }
    }

    let grid = TileGrid::new(config);
    let expected = TextureDescriptor::new(grid.texture_side());
    if texture.descriptor() != expected {
        return Err(TextureError::SizeMismatch {
            expected: expected.texel_count(),
            actual: texture.descriptor().texel_count(),
        }
        .into());
    }
    let indexer = OverlapIndexer::new(lights);

    log::debug!(
        "Baking {} lights into {}x{} index texture ({} tiles, cell size {})",
        lights.len(),
        grid.texture_side(),
        grid.texture_side(),
        grid.tile_count(),
        config.cell_size
    );

    let mut stats = BakeStats {
        lights: lights.len(),
        ..BakeStats::default()
    };

    for tile in grid.tiles() {
        stats.tiles += 1;

        let (x, z) = grid.texel_address(tile);
        let candidates = indexer.overlapping(&grid.tile_bounds(tile));
        if candidates.is_empty() {
            texture.set(x, z, IndexTexel::EMPTY)?;
            continue;
        }

        stats.lit_tiles += 1;
        stats.max_candidates = stats.max_candidates.max(candidates.len());
        if candidates.len() > MAX_LIGHTS_PER_TILE {
            stats.truncated_tiles += 1;
            log::trace!("Tile {:?}: {} lights overlap, keeping the top {}", tile, candidates.len(), MAX_LIGHTS_PER_TILE);
        }

        let ranked: Vec<LightId> = rank(&candidates, grid.tile_center(tile))
            .into_iter()
            .map(|r| r.id)
            .collect();

        texture.set(x, z, encode_texel(&ranked))?;
    }

    let snapshot = LightArraySnapshot::rebuild(lights);

    log::info!(
        "Bake complete: {} lights, {}/{} tiles lit, {} truncated, max {} per tile",
        stats.lights,
        stats.lit_tiles,
        stats.tiles,
        stats.truncated_tiles,
        stats.max_candidates
    );

    Ok(BakeOutput { texture, snapshot, stats })
}

/// Ids handed out by a registry bake, applied once the bake is accepted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightNumbering {
    assignments: Vec<(LightKey, LightId)>,
}

impl LightNumbering {
    /// Assign dense ids to the enabled lights of a registry, in registry order
    pub fn assign(registry: &LightRegistry) -> Result<Self, BakeError> {
        let count = registry.enabled_count();
        if count > MAX_LIGHTS {
            return Err(BakeError::TooManyLights { count });
        }

        let assignments = registry
            .iter()
            .filter(|(_, light)| light.enabled)
            .enumerate()
            .map(|(index, (key, _))| {
                LightId::try_from(index)
                    .map(|id| (key, id))
                    .map_err(|_| BakeError::TooManyLights { count })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { assignments })
    }

    /// Id assigned to a light, if it was enabled
    pub fn id_of(&self, key: LightKey) -> Option<LightId> {
        self.assignments.iter().find(|(k, _)| *k == key).map(|(_, id)| *id)
    }

    /// Number of numbered lights
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// True if no light was numbered
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Sample the numbered lights as they are in `registry`
    pub fn samples(&self, registry: &LightRegistry) -> Vec<BakeLight> {
        self.assignments
            .iter()
            .filter_map(|(key, id)| {
                registry.get(*key).map(|light| BakeLight {
                    id: *id,
                    position: light.position,
                    range: light.range,
                    color: light.color,
                    strength: light.strength,
                })
            })
            .collect()
    }

    /// Write the ids into the registry and record every numbered light as baked
    ///
    /// Lights that were not numbered lose any id from an earlier bake.
    pub fn apply(&self, registry: &mut LightRegistry) {
        for (key, light) in registry.iter_mut() {
            light.number = self.id_of(key);
            if light.number.is_some() {
                light.mark_baked();
            }
        }
    }
}

/// Result of baking a registry: the output plus the numbering it was baked with
#[derive(Debug, Clone)]
pub struct RegistryBake {
    /// Baked texture, snapshot and stats
    pub output: BakeOutput,
    /// Ids to apply to the registry once the output is accepted
    pub numbering: LightNumbering,
}

/// Number the enabled lights of a registry and bake them into a fresh texture
///
/// The registry is not modified; apply [`RegistryBake::numbering`] after committing.
pub fn bake(registry: &LightRegistry, config: &VolumeConfig) -> Result<RegistryBake, BakeError> {
    config.validate().map_err(BakeError::InvalidConfig)?;
    let texture = IndexTexture::new(TextureDescriptor::new(config.texture_side()))?;
    bake_registry_into(registry, config, texture)
}

/// Number the enabled lights of a registry and bake them into `texture`
pub fn bake_registry_into(
    registry: &LightRegistry,
    config: &VolumeConfig,
    texture: IndexTexture,
) -> Result<RegistryBake, BakeError> {
    let numbering = LightNumbering::assign(registry)?;
    let samples = numbering.samples(registry);
    let output = bake_lights_into(&samples, config, texture)?;

    Ok(RegistryBake { output, numbering })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bake::grid::Tile;
    use crate::core::TextureSize;
    use crate::foundation::math::Vec3;
    use crate::lights::PointLight;

    fn small_volume() -> VolumeConfig {
        VolumeConfig::new(Vec3::zeros())
            .with_cell_size(1.0)
            .with_volume_height(4.0)
            .with_texture_size(TextureSize::Small)
    }

    #[test]
    fn test_numbering_is_dense_over_enabled_lights() {
        let mut registry = LightRegistry::new();
        let a = registry.insert(PointLight::new(Vec3::zeros(), 1.0));
        let b = registry.insert(PointLight::new(Vec3::zeros(), 1.0).with_enabled(false));
        let c = registry.insert(PointLight::new(Vec3::zeros(), 1.0));

        let numbering = LightNumbering::assign(&registry).unwrap();
        assert_eq!(numbering.id_of(a), Some(LightId::new(0)));
        assert_eq!(numbering.id_of(b), None);
        assert_eq!(numbering.id_of(c), Some(LightId::new(1)));
        assert_eq!(numbering.len(), 2);
    }

    #[test]
    fn test_too_many_lights_rejected() {
        let mut registry = LightRegistry::new();
        for i in 0..=MAX_LIGHTS {
            registry.insert(PointLight::new(Vec3::new(i as f32, 0.0, 0.0), 1.0));
        }

        let result = bake(&registry, &small_volume());
        assert!(matches!(result, Err(BakeError::TooManyLights { count: 257 })));
        assert!(registry.iter().all(|(_, light)| light.number.is_none()));
    }

    #[test]
    fn test_exactly_max_lights_accepted() {
        let mut registry = LightRegistry::new();
        for i in 0..MAX_LIGHTS {
            registry.insert(PointLight::new(Vec3::new(i as f32, 0.0, 0.0), 0.5));
        }
        // Disabled extras do not count against the limit
        registry.insert(PointLight::new(Vec3::zeros(), 1.0).with_enabled(false));

        let numbering = LightNumbering::assign(&registry).unwrap();
        assert_eq!(numbering.len(), MAX_LIGHTS);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let lights = [
            BakeLight::new(LightId::new(4), Vec3::zeros(), 1.0),
            BakeLight::new(LightId::new(4), Vec3::zeros(), 1.0),
        ];
        let result = bake_lights(&lights, &small_volume());
        assert!(matches!(result, Err(BakeError::DuplicateLightId(id)) if id == LightId::new(4)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = bake_lights(&[], &small_volume().with_cell_size(0.0));
        assert!(matches!(result, Err(BakeError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_bake() {
        let output = bake_lights(&[], &small_volume()).unwrap();
        assert_eq!(output.texture.side(), 256);
        assert_eq!(output.stats.tiles, 4 * 128 * 128);
        assert_eq!(output.stats.lit_tiles, 0);
        assert!(output.texture.texels().iter().all(|t| t.channels() == [0.0; 4]));
    }

    #[test]
    fn test_bake_into_overwrites_stale_texels() {
        let config = small_volume();
        let mut stale = IndexTexture::new(TextureDescriptor::new(256)).unwrap();
        stale.set(10, 10, encode_texel(&[LightId::new(7)])).unwrap();

        let output = bake_lights_into(&[], &config, stale).unwrap();
        assert_eq!(output.texture.get(10, 10).unwrap(), IndexTexel::EMPTY);
    }

    #[test]
    fn test_bake_into_rejects_wrong_size() {
        let target = IndexTexture::new(TextureDescriptor::new(512)).unwrap();
        let result = bake_lights_into(&[], &small_volume(), target);
        assert!(matches!(result, Err(BakeError::Texture(TextureError::SizeMismatch { .. }))));
    }

    #[test]
    fn test_light_reaches_expected_tiles() {
        let config = small_volume();
        let grid = TileGrid::new(&config);

        // Centered on tile (layer 1, row 64, col 64), inside the layer's vertical slab
        let tile = Tile::new(1, 64, 64);
        let center = grid.tile_center(tile);
        let lights = [BakeLight::new(LightId::new(0), center, 0.4)];

        let output = bake_lights(&lights, &config).unwrap();
        assert_eq!(output.stats.lit_tiles, 1);

        let (x, z) = grid.texel_address(tile);
        let decoded = output.texture.decode(x, z).unwrap();
        assert_eq!(decoded.ids(), vec![LightId::new(0)]);

        let (nx, nz) = grid.texel_address(Tile::new(1, 64, 65));
        assert_eq!(output.texture.decode(nx, nz).unwrap().count, 0);
    }

    #[test]
    fn test_truncation_stats() {
        let config = small_volume();
        let lights: Vec<_> = (0..10u8)
            .map(|id| BakeLight::new(LightId::new(id), Vec3::new(0.5, -1.0, 0.5), 0.3).with_strength(f32::from(id)))
            .collect();

        let output = bake_lights(&lights, &config).unwrap();
        assert!(output.stats.truncated_tiles >= 1);
        assert_eq!(output.stats.max_candidates, 10);
    }

    #[test]
    fn test_apply_numbering_marks_baked() {
        let mut registry = LightRegistry::new();
        let a = registry.insert(PointLight::new(Vec3::zeros(), 1.0));
        let b = registry.insert(PointLight::new(Vec3::zeros(), 1.0).with_enabled(false));
        registry.get_mut(b).unwrap().number = Some(LightId::new(9));

        let result = bake(&registry, &small_volume()).unwrap();
        assert_eq!(registry.get(a).unwrap().number, None);

        result.numbering.apply(&mut registry);
        assert_eq!(registry.get(a).unwrap().number, Some(LightId::new(0)));
        assert!(!registry.get(a).unwrap().is_dirty());
        assert_eq!(registry.get(b).unwrap().number, None);
        assert!(!registry.any_dirty());
    }
}
