//! Per-frame light arrays
//!
//! The shader resolves a light id from the index texture, then reads two parallel 256-entry
//! arrays:
//!
//! - `pos_and_range[id] = (x, y, z, inv_range_sqr)`
//! - `color[id] = (r, g, b, range_sqr_over_fade_range_sqr) * strength`
//!
//! A bake rebuilds both arrays from scratch. Between bakes the owner refreshes them in
//! place from the current light state; slots of lights that were disabled or removed since
//! keep their last written value until the next bake clears them.

use crate::foundation::math::utils;
use crate::lights::{Attenuation, BakeLight, MAX_LIGHTS};

/// Position/attenuation and color/attenuation arrays indexed by light id
#[derive(Debug, Clone, PartialEq)]
pub struct LightArraySnapshot {
    /// `(x, y, z, inv_range_sqr)` per light id
    pub pos_and_range: [[f32; 4]; MAX_LIGHTS],
    /// `(r, g, b, range_sqr_over_fade_range_sqr) * strength` per light id
    pub color: [[f32; 4]; MAX_LIGHTS],
}

impl Default for LightArraySnapshot {
    fn default() -> Self {
        Self {
            pos_and_range: [[0.0; 4]; MAX_LIGHTS],
            color: [[0.0; 4]; MAX_LIGHTS],
        }
    }
}

impl LightArraySnapshot {
    /// Create zeroed arrays
    pub fn new() -> Self {
        Self::default()
    }

    /// Build fresh arrays; slots without a light stay zero
    pub fn rebuild<'a>(lights: impl IntoIterator<Item = &'a BakeLight>) -> Self {
        let mut snapshot = Self::new();
        snapshot.refresh(lights);
        snapshot
    }

    /// Overwrite the slots of the given lights, in ascending id order
    ///
    /// Slots of lights not in `lights` keep their previous contents.
    pub fn refresh<'a>(&mut self, lights: impl IntoIterator<Item = &'a BakeLight>) {
        let mut lights: Vec<&BakeLight> = lights.into_iter().collect();
        lights.sort_by_key(|light| light.id);

        for light in lights {
            let atten = Attenuation::from_range(light.range);
            let slot = light.id.index();

            self.pos_and_range[slot] = utils::pack_xyzw(light.position, atten.inv_range_sqr);
            self.color[slot] = utils::pack_xyzw(light.color, atten.range_sqr_over_fade_range_sqr)
                .map(|c| c * light.strength);
        }
    }

    /// Position array as raw bytes for buffer upload
    pub fn pos_and_range_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.pos_and_range.as_slice())
    }

    /// Color array as raw bytes for buffer upload
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.color.as_slice())
    }
}
