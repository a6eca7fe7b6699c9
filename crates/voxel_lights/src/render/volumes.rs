//! Active volume selection and per-frame publishing

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::utils;
use crate::volume::VoxelLightVolume;

use super::params::{names, ShaderParameterSink};

new_key_type! {
    /// Handle to a volume registered in a [`VolumeRegistry`]
    pub struct VolumeKey;
}

/// Explicit list of volumes the renderer may pick from
#[derive(Debug, Default)]
pub struct VolumeRegistry {
    volumes: SlotMap<VolumeKey, VoxelLightVolume>,
    order: Vec<VolumeKey>,
}

impl VolumeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a volume
    pub fn register(&mut self, volume: VoxelLightVolume) -> VolumeKey {
        let key = self.volumes.insert(volume);
        self.order.push(key);
        log::debug!("Registered voxel light volume {:?}", key);
        key
    }

    /// Unregister a volume and hand it back
    pub fn unregister(&mut self, key: VolumeKey) -> Option<VoxelLightVolume> {
        let volume = self.volumes.remove(key)?;
        self.order.retain(|k| *k != key);
        log::debug!("Unregistered voxel light volume {:?}", key);
        Some(volume)
    }

    /// Get a volume
    pub fn get(&self, key: VolumeKey) -> Option<&VoxelLightVolume> {
        self.volumes.get(key)
    }

    /// Get a mutable volume
    pub fn get_mut(&mut self, key: VolumeKey) -> Option<&mut VoxelLightVolume> {
        self.volumes.get_mut(key)
    }

    /// Number of registered volumes
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if no volume is registered
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Volumes in registration order
    pub fn iter(&self) -> impl Iterator<Item = (VolumeKey, &VoxelLightVolume)> + '_ {
        self.order.iter().filter_map(|key| self.volumes.get(*key).map(|volume| (*key, volume)))
    }

    /// Key of the volume with the highest priority; ties keep the first registered
    pub fn active_key(&self) -> Option<VolumeKey> {
        let mut best: Option<(VolumeKey, i32)> = None;
        for (key, volume) in self.iter() {
            let priority = volume.priority();
            if best.map_or(true, |(_, top)| priority > top) {
                best = Some((key, priority));
            }
        }
        best.map(|(key, _)| key)
    }

    /// Volume with the highest priority
    pub fn active(&self) -> Option<&VoxelLightVolume> {
        self.active_key().and_then(|key| self.volumes.get(key))
    }

    /// Mutable volume with the highest priority
    pub fn active_mut(&mut self) -> Option<&mut VoxelLightVolume> {
        let key = self.active_key()?;
        self.volumes.get_mut(key)
    }
}

/// Push the active volume's parameters to `sink`
///
/// The active volume's snapshot is refreshed first. Without an active volume only the
/// enable toggle is cleared. Returns true if a volume was published.
pub fn publish_frame(registry: &mut VolumeRegistry, sink: &mut dyn ShaderParameterSink) -> bool {
    let Some(volume) = registry.active_mut() else {
        sink.set_float(names::ENABLE_TOGGLE, 0.0);
        return false;
    };

    volume.refresh_snapshot();

    let snapshot = volume.snapshot();
    sink.set_vector_array(names::POINT_POS_RANGE, &snapshot.pos_and_range);
    sink.set_vector_array(names::POINT_COLOR, &snapshot.color);

    let shader = volume.shader_volume();
    sink.set_vector(names::VOXEL_CENTER, utils::pack_xyzw(shader.center, 0.0));
    sink.set_vector(names::VOXEL_SIZE, utils::pack_xyzw(shader.extent, shader.cell_size));

    match volume.texture_key() {
        Some(key) => sink.set_texture(names::VOXEL_INDEX_MAP, key),
        None => log::warn!("Active voxel light volume has not been baked yet"),
    }

    sink.set_float(names::ENABLE_TOGGLE, 1.0);
    true
}
