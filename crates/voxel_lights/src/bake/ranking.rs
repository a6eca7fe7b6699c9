//! Per-tile light importance ranking
//!
//! When more lights overlap a tile than the texel can reference, the brightest ones at the
//! tile center win. Importance is `strength * (range - distance) / range`; it goes negative
//! past the light's range and such lights still compete.
//!
//! Ranked output is ordered highest importance first. Equal scores fall back to ascending
//! light id so identical input always produces the identical texel.

use std::cmp::Ordering;

use crate::foundation::math::Vec3;
use crate::lights::{BakeLight, LightId};

/// Maximum number of lights counted per tile
pub const MAX_LIGHTS_PER_TILE: usize = 8;

/// A light together with its importance for one tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedLight {
    /// Light id
    pub id: LightId,
    /// Importance score at the tile center
    pub score: f32,
}

/// Importance of `light` for a tile centered at `tile_center`
pub fn importance(light: &BakeLight, tile_center: Vec3) -> f32 {
    let dist = (light.position - tile_center).magnitude();
    let falloff = (light.range - dist) / light.range;
    light.strength * falloff
}

/// Highest-first ordering with id tie-break; NaN scores rank below everything
fn by_importance(a: &RankedLight, b: &RankedLight) -> Ordering {
    let key = |score: f32| if score.is_nan() { f32::NEG_INFINITY } else { score };
    key(b.score)
        .partial_cmp(&key(a.score))
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.id.cmp(&b.id))
}

/// Score every candidate and order them highest importance first (no truncation)
pub fn rank_all(candidates: &[BakeLight], tile_center: Vec3) -> Vec<RankedLight> {
    let mut ranked: Vec<RankedLight> = candidates
        .iter()
        .map(|light| RankedLight {
            id: light.id,
            score: importance(light, tile_center),
        })
        .collect();

    ranked.sort_by(by_importance);
    ranked
}

/// The most important candidates for a tile, at most [`MAX_LIGHTS_PER_TILE`], highest first
pub fn rank(candidates: &[BakeLight], tile_center: Vec3) -> Vec<RankedLight> {
    let mut ranked = rank_all(candidates, tile_center);
    ranked.truncate(MAX_LIGHTS_PER_TILE);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light(id: u8, position: Vec3, range: f32, strength: f32) -> BakeLight {
        BakeLight::new(LightId::new(id), position, range).with_strength(strength)
    }

    fn ids(ranked: &[RankedLight]) -> Vec<u8> {
        ranked.iter().map(|r| r.id.value()).collect()
    }

    #[test]
    fn test_importance_formula() {
        let l = light(0, Vec3::new(1.0, 0.0, 0.0), 4.0, 2.0);
        assert!((importance(&l, Vec3::zeros()) - 1.5).abs() < 1.0e-6);

        // Past the range the score goes negative but is still reported
        let far = light(1, Vec3::new(6.0, 0.0, 0.0), 4.0, 1.0);
        assert!((importance(&far, Vec3::zeros()) + 0.5).abs() < 1.0e-6);
    }

    #[test]
    fn test_keeps_top_eight_by_score() {
        // Same placement, distinct strengths: score order equals strength order
        let candidates: Vec<_> = (0..10u8)
            .map(|id| light(id, Vec3::zeros(), 5.0, f32::from(id) + 1.0))
            .collect();

        let ranked = rank(&candidates, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(ranked.len(), MAX_LIGHTS_PER_TILE);
        assert_eq!(ids(&ranked), vec![9, 8, 7, 6, 5, 4, 3, 2]);
    }

    #[test]
    fn test_distance_beats_strength() {
        let candidates = [
            light(0, Vec3::new(4.0, 0.0, 0.0), 5.0, 2.0),
            light(1, Vec3::new(0.5, 0.0, 0.0), 5.0, 1.0),
        ];
        // 2 * 0.2 = 0.4 vs 1 * 0.9 = 0.9
        assert_eq!(ids(&rank(&candidates, Vec3::zeros())), vec![1, 0]);
    }

    #[test]
    fn test_ties_break_by_ascending_id() {
        let candidates = [
            light(5, Vec3::new(0.0, 0.0, 1.0), 2.0, 1.0),
            light(2, Vec3::new(0.0, 0.0, -1.0), 2.0, 1.0),
            light(9, Vec3::new(1.0, 0.0, 0.0), 2.0, 1.0),
        ];
        let ranked = rank(&candidates, Vec3::zeros());
        assert_eq!(ids(&ranked), vec![2, 5, 9]);

        // Input order must not matter
        let reversed: Vec<_> = candidates.iter().rev().copied().collect();
        assert_eq!(rank(&reversed, Vec3::zeros()), ranked);
    }

    #[test]
    fn test_negative_zero_ties_with_zero() {
        // Both lights sit exactly at their range from the center: scores are +0 and -0
        let candidates = [
            light(3, Vec3::new(2.0, 0.0, 0.0), 2.0, 1.0),
            light(1, Vec3::new(-2.0, 0.0, 0.0), 2.0, -1.0),
        ];
        assert_eq!(ids(&rank(&candidates, Vec3::zeros())), vec![1, 3]);
    }

    #[test]
    fn test_nan_scores_rank_last() {
        let candidates = [
            light(0, Vec3::zeros(), 0.0, 1.0),
            light(1, Vec3::new(3.0, 0.0, 0.0), 2.0, 1.0),
        ];
        // Light 0 scores NaN (0 / 0), light 1 scores -0.5
        assert_eq!(ids(&rank(&candidates, Vec3::zeros())), vec![1, 0]);
    }

    #[test]
    fn test_empty_candidates() {
        assert!(rank(&[], Vec3::zeros()).is_empty());
    }
}
