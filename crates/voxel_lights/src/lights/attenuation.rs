//! Precomputed distance attenuation
//!
//! The shader evaluates a squared-distance falloff that fades to zero between 80% and 100%
//! of the light range. Two per-light coefficients are enough to evaluate it without a
//! division per fragment.

/// Fraction of the range where the fade begins
pub const FADE_START_FRACTION: f32 = 0.8;

/// Floor applied to `range²` before inverting
pub const MIN_RANGE_SQR: f32 = 0.0001;

/// Per-light falloff coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    /// `1 / max(0.0001, range²)`, packed into the position array `w`
    pub inv_range_sqr: f32,
    /// `-range² / (fade_start² - range²)`, packed into the color array `w`
    pub range_sqr_over_fade_range_sqr: f32,
}

impl Attenuation {
    /// Compute the coefficients for a light range
    ///
    /// Non-positive ranges are degenerate but not fatal: the inverse is floored to
    /// `1 / 0.0001`, and a zero range uses the fade ratio every positive range produces.
    pub fn from_range(range: f32) -> Self {
        let light_range_sqr = range * range;
        let fade_start_distance_sqr = FADE_START_FRACTION * FADE_START_FRACTION * light_range_sqr;
        let fade_range_sqr = fade_start_distance_sqr - light_range_sqr;

        let range_sqr_over_fade_range_sqr = if fade_range_sqr == 0.0 {
            1.0 / (1.0 - FADE_START_FRACTION * FADE_START_FRACTION)
        } else {
            -light_range_sqr / fade_range_sqr
        };

        Self {
            inv_range_sqr: 1.0 / light_range_sqr.max(MIN_RANGE_SQR),
            range_sqr_over_fade_range_sqr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_range() {
        let atten = Attenuation::from_range(1.0);
        assert_relative_eq!(atten.inv_range_sqr, 1.0);
        assert_relative_eq!(atten.range_sqr_over_fade_range_sqr, 1.0 / 0.36, epsilon = 1.0e-5);
    }

    #[test]
    fn test_inverse_coefficient_shrinks_with_range() {
        let ranges = [0.5, 1.0, 2.0, 5.0, 30.0];
        for pair in ranges.windows(2) {
            let near = Attenuation::from_range(pair[0]);
            let far = Attenuation::from_range(pair[1]);
            assert!(near.inv_range_sqr > far.inv_range_sqr, "range {} vs {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_fade_ratio_is_range_independent() {
        for range in [0.25_f32, 3.0, 17.5] {
            let atten = Attenuation::from_range(range);
            assert_relative_eq!(atten.range_sqr_over_fade_range_sqr, 1.0 / 0.36, epsilon = 1.0e-4);
        }
    }

    #[test]
    fn test_degenerate_range_is_finite() {
        let zero = Attenuation::from_range(0.0);
        assert_relative_eq!(zero.inv_range_sqr, 10_000.0, epsilon = 1.0e-2);
        assert!(zero.range_sqr_over_fade_range_sqr.is_finite());

        let negative = Attenuation::from_range(-2.0);
        assert_relative_eq!(negative.inv_range_sqr, 0.25);
        assert!(negative.range_sqr_over_fade_range_sqr.is_finite());
    }
}
