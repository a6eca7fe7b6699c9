//! Voxel light volume
//!
//! A [`VoxelLightVolume`] ties one volume configuration to the lights placed in it and to
//! the results of its last successful bake. Bakes go through an [`IndexTextureStore`]:
//! the stored texture is loaded (or created), fully rewritten and committed in one call.
//! Only after the commit succeeds do the lights receive their new ids and the volume
//! swap in the new texture and snapshot.

use crate::bake::{bake_registry_into, BakeError, BakeStats, IndexTexture, TextureDescriptor};
use crate::core::{BakeConfig, LightSettings, VolumeConfig};
use crate::foundation::math::Vec3;
use crate::lights::{BakeLight, LightKey, LightRegistry, PointLight};
use crate::snapshot::LightArraySnapshot;
use crate::storage::{IndexTextureStore, TextureKey};

/// Placement data the shader needs to locate a volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderVolume {
    /// World-space center
    pub center: Vec3,
    /// Full size along each axis
    pub extent: Vec3,
    /// Tile edge length
    pub cell_size: f32,
}

/// A baked point-light volume and the lights it owns
#[derive(Debug, Clone)]
pub struct VoxelLightVolume {
    config: VolumeConfig,
    lights: LightRegistry,
    snapshot: LightArraySnapshot,
    texture: Option<IndexTexture>,
    texture_key: Option<TextureKey>,
    last_stats: Option<BakeStats>,
}

impl VoxelLightVolume {
    /// Create an unbaked volume without lights
    pub fn new(config: VolumeConfig) -> Self {
        Self {
            config,
            lights: LightRegistry::new(),
            snapshot: LightArraySnapshot::new(),
            texture: None,
            texture_key: None,
            last_stats: None,
        }
    }

    /// Create a volume holding the lights listed in a bake configuration
    pub fn from_bake_config(config: &BakeConfig) -> Self {
        let mut volume = Self::new(config.volume.clone());
        for settings in &config.lights {
            volume.add_light(PointLight::from(settings));
        }
        volume
    }

    /// Volume configuration
    pub fn config(&self) -> &VolumeConfig {
        &self.config
    }

    /// Replace the configuration; takes effect at the next bake
    pub fn set_config(&mut self, config: VolumeConfig) {
        self.config = config;
    }

    /// Selection priority among registered volumes
    pub fn priority(&self) -> i32 {
        self.config.priority
    }

    /// Add a light; it gets an id at the next bake
    pub fn add_light(&mut self, light: PointLight) -> LightKey {
        self.lights.insert(light)
    }

    /// Remove a light
    ///
    /// Its snapshot slot keeps the last written value until the next bake.
    pub fn remove_light(&mut self, key: LightKey) -> Option<PointLight> {
        self.lights.remove(key)
    }

    /// Get a light
    pub fn light(&self, key: LightKey) -> Option<&PointLight> {
        self.lights.get(key)
    }

    /// Get a mutable light
    pub fn light_mut(&mut self, key: LightKey) -> Option<&mut PointLight> {
        self.lights.get_mut(key)
    }

    /// All lights of the volume
    pub fn lights(&self) -> &LightRegistry {
        &self.lights
    }

    /// Snapshot arrays as of the last bake or refresh
    pub fn snapshot(&self) -> &LightArraySnapshot {
        &self.snapshot
    }

    /// Texture produced by the last successful bake
    pub fn texture(&self) -> Option<&IndexTexture> {
        self.texture.as_ref()
    }

    /// Store key of the last successful bake
    pub fn texture_key(&self) -> Option<&TextureKey> {
        self.texture_key.as_ref()
    }

    /// Counters of the last successful bake
    pub fn last_stats(&self) -> Option<BakeStats> {
        self.last_stats
    }

    /// True once a bake has been committed
    pub fn is_baked(&self) -> bool {
        self.texture.is_some()
    }

    /// True if the volume was never baked or an enabled light moved since
    pub fn needs_rebake(&self) -> bool {
        !self.is_baked() || self.lights.any_dirty()
    }

    /// Bake all enabled lights and commit the texture to `store` under `key`
    ///
    /// On error nothing changes: lights keep their previous ids and the volume keeps its
    /// previous texture and snapshot.
    pub fn bake_into(&mut self, store: &mut dyn IndexTextureStore, key: &TextureKey) -> Result<BakeStats, BakeError> {
        self.config.validate().map_err(BakeError::InvalidConfig)?;

        let descriptor = TextureDescriptor::new(self.config.texture_side());
        let target = store.load_or_create(key, descriptor)?;
        let baked = bake_registry_into(&self.lights, &self.config, target)?;

        if let Err(err) = store.commit(key, &baked.output.texture) {
            log::error!("Failed to commit index texture '{}': {}", key, err);
            return Err(err.into());
        }

        baked.numbering.apply(&mut self.lights);
        let stats = baked.output.stats;
        self.snapshot = baked.output.snapshot;
        self.texture = Some(baked.output.texture);
        self.texture_key = Some(key.clone());
        self.last_stats = Some(stats);

        Ok(stats)
    }

    /// Re-bake into `store` if [`needs_rebake`](Self::needs_rebake) says so
    pub fn rebake_if_dirty(
        &mut self,
        store: &mut dyn IndexTextureStore,
        key: &TextureKey,
    ) -> Result<Option<BakeStats>, BakeError> {
        if !self.needs_rebake() {
            return Ok(None);
        }

        log::debug!("Volume lights changed since the last bake, re-baking '{}'", key);
        self.bake_into(store, key).map(Some)
    }

    /// Rewrite the snapshot slots of enabled, numbered lights from their current state
    ///
    /// Color and strength changes show up without a re-bake; position changes only move
    /// shading, not texture coverage.
    pub fn refresh_snapshot(&mut self) {
        let samples: Vec<BakeLight> = self.lights.iter().filter_map(|(_, light)| light.sample()).collect();
        self.snapshot.refresh(&samples);
    }

    /// Placement data for shader upload
    pub fn shader_volume(&self) -> ShaderVolume {
        ShaderVolume {
            center: self.config.center,
            extent: self.config.extent(),
            cell_size: self.config.cell_size,
        }
    }
}

impl From<&LightSettings> for PointLight {
    fn from(settings: &LightSettings) -> Self {
        Self::new(settings.position, settings.range)
            .with_color(settings.color)
            .with_strength(settings.strength)
            .with_enabled(settings.enabled)
    }
}
