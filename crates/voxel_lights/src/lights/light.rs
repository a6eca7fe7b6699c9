//! Point light data
//!
//! A [`PointLight`] is the registry-side description of a light: where it is, how far it
//! reaches, and what it looks like. A bake assigns it a [`LightId`], the 8-bit index the
//! shader uses to look the light up in the snapshot arrays.

use std::fmt;

use approx::abs_diff_eq;

use crate::foundation::math::Vec3;

/// Maximum number of lights a single bake can number (ids must fit in 8 bits)
pub const MAX_LIGHTS: usize = 256;

/// Tolerance used when comparing a light against its baked placement
const PLACEMENT_EPSILON: f32 = 1.0e-5;

/// Stable per-bake light index, dense in `[0, N)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LightId(u8);

impl LightId {
    /// Wrap a raw 8-bit index
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Raw 8-bit value as written into the index texture
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Slot in the 256-entry snapshot arrays
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<usize> for LightId {
    type Error = usize;

    /// Fails with the offending value when it does not fit in 8 bits
    fn try_from(value: usize) -> Result<Self, Self::Error> {
        u8::try_from(value).map(Self).map_err(|_| value)
    }
}

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position and range a light had when it was last baked
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BakedPlacement {
    /// World-space position at bake time
    pub position: Vec3,
    /// Range at bake time
    pub range: f32,
}

/// Immutable copy of a numbered, enabled light taken at the start of a bake or snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BakeLight {
    /// Index assigned for this bake
    pub id: LightId,
    /// World-space position
    pub position: Vec3,
    /// Radius of influence
    pub range: f32,
    /// Linear RGB color
    pub color: Vec3,
    /// Brightness multiplier
    pub strength: f32,
}

impl BakeLight {
    /// Create a white, unit-strength light sample
    pub fn new(id: LightId, position: Vec3, range: f32) -> Self {
        Self {
            id,
            position,
            range,
            color: Vec3::new(1.0, 1.0, 1.0),
            strength: 1.0,
        }
    }

    /// Set the brightness multiplier
    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    /// Set the light color
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }
}

/// Omnidirectional light with a finite range
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    /// World-space position
    pub position: Vec3,
    /// Radius of influence
    pub range: f32,
    /// Linear RGB color, each channel in [0, 1]
    pub color: Vec3,
    /// Brightness multiplier
    pub strength: f32,
    /// Disabled lights are skipped by bakes and snapshots
    pub enabled: bool,
    /// Index assigned by the last bake, `None` until baked
    pub number: Option<LightId>,
    /// Placement recorded by the last bake
    pub baked: Option<BakedPlacement>,
}

impl PointLight {
    /// Create a white, unit-strength light
    pub fn new(position: Vec3, range: f32) -> Self {
        Self {
            position,
            range,
            color: Vec3::new(1.0, 1.0, 1.0),
            strength: 1.0,
            enabled: true,
            number: None,
            baked: None,
        }
    }

    /// Set the light color
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    /// Set the brightness multiplier
    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    /// Enable or disable the light
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sample the light for baking; `None` when disabled or not yet numbered
    pub fn sample(&self) -> Option<BakeLight> {
        if !self.enabled {
            return None;
        }

        self.number.map(|id| BakeLight {
            id,
            position: self.position,
            range: self.range,
            color: self.color,
            strength: self.strength,
        })
    }

    /// True if the light moved or changed range since it was baked (or was never baked)
    pub fn is_dirty(&self) -> bool {
        match self.baked {
            Some(baked) => {
                !abs_diff_eq!(baked.range, self.range, epsilon = PLACEMENT_EPSILON)
                    || !abs_diff_eq!(baked.position, self.position, epsilon = PLACEMENT_EPSILON)
            }
            None => true,
        }
    }

    /// Record the current placement as baked
    pub(crate) fn mark_baked(&mut self) {
        self.baked = Some(BakedPlacement {
            position: self.position,
            range: self.range,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_id_conversion() {
        assert_eq!(LightId::try_from(0usize), Ok(LightId::new(0)));
        assert_eq!(LightId::try_from(255usize), Ok(LightId::new(255)));
        assert_eq!(LightId::try_from(256usize), Err(256));
        assert_eq!(LightId::new(42).index(), 42);
    }

    #[test]
    fn test_sample_requires_number_and_enabled() {
        let mut light = PointLight::new(Vec3::new(1.0, 2.0, 3.0), 4.0).with_strength(2.0);
        assert!(light.sample().is_none());

        light.number = Some(LightId::new(7));
        let sample = light.sample().unwrap();
        assert_eq!(sample.id, LightId::new(7));
        assert_eq!(sample.position, Vec3::new(1.0, 2.0, 3.0));
        assert!((sample.strength - 2.0).abs() < f32::EPSILON);

        light.enabled = false;
        assert!(light.sample().is_none());
    }

    #[test]
    fn test_unbaked_light_is_dirty() {
        let light = PointLight::new(Vec3::zeros(), 5.0);
        assert!(light.is_dirty());
    }

    #[test]
    fn test_dirty_after_move_or_resize() {
        let mut light = PointLight::new(Vec3::zeros(), 5.0);
        light.mark_baked();
        assert!(!light.is_dirty());

        light.position.x += 0.5;
        assert!(light.is_dirty());

        light.mark_baked();
        light.range = 6.0;
        assert!(light.is_dirty());
    }
}
