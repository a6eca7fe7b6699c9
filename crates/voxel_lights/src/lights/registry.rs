//! Light registry
//!
//! Owns the lights that belong to a volume. Keys stay valid until the light is removed;
//! iteration follows registration order, which is also the order bake ids are handed out in.

use slotmap::{new_key_type, SlotMap};

use super::light::{LightId, PointLight};

new_key_type! {
    /// Handle to a light registered in a [`LightRegistry`]
    pub struct LightKey;
}

/// Registration-ordered collection of point lights
#[derive(Debug, Clone, Default)]
pub struct LightRegistry {
    lights: SlotMap<LightKey, PointLight>,
    order: Vec<LightKey>,
}

impl LightRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a light and return its handle
    pub fn insert(&mut self, light: PointLight) -> LightKey {
        let key = self.lights.insert(light);
        self.order.push(key);
        log::trace!("Registered light {:?}", key);
        key
    }

    /// Remove a light; returns it if the key was still live
    pub fn remove(&mut self, key: LightKey) -> Option<PointLight> {
        let light = self.lights.remove(key)?;
        self.order.retain(|k| *k != key);
        log::trace!("Removed light {:?}", key);
        Some(light)
    }

    /// Get a light by handle
    pub fn get(&self, key: LightKey) -> Option<&PointLight> {
        self.lights.get(key)
    }

    /// Get a mutable light by handle
    pub fn get_mut(&mut self, key: LightKey) -> Option<&mut PointLight> {
        self.lights.get_mut(key)
    }

    /// Check whether a handle is still live
    pub fn contains(&self, key: LightKey) -> bool {
        self.lights.contains_key(key)
    }

    /// Number of registered lights, enabled or not
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if no light is registered
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate lights in registration order
    pub fn iter(&self) -> impl Iterator<Item = (LightKey, &PointLight)> + '_ {
        self.order.iter().filter_map(|key| self.lights.get(*key).map(|light| (*key, light)))
    }

    /// Iterate mutable lights in registration order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (LightKey, &mut PointLight)> + '_ {
        let order = &self.order;
        let mut lights: Vec<_> = self.lights.iter_mut().collect();
        lights.sort_by_key(|(key, _)| order.iter().position(|k| k == key));
        lights.into_iter()
    }

    /// Number of enabled lights
    pub fn enabled_count(&self) -> usize {
        self.iter().filter(|(_, light)| light.enabled).count()
    }

    /// Find the light that received `id` in the last bake
    pub fn find_by_id(&self, id: LightId) -> Option<(LightKey, &PointLight)> {
        self.iter().find(|(_, light)| light.enabled && light.number == Some(id))
    }

    /// True if any enabled light moved or changed range since the last bake
    pub fn any_dirty(&self) -> bool {
        self.iter().any(|(_, light)| light.enabled && light.is_dirty())
    }
}
