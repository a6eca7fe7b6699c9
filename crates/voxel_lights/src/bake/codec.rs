//! Index texel codec
//!
//! Every channel of a texel carries a 16-bit integer `a + b * 256` scaled into `[0, 1)` by
//! `1 / 65536`, so two 8-bit fields fit in one float channel. A texel packs a tile's ranked
//! light ids and count:
//!
//! ```text
//! R = (slot0, slot1)   G = (slot2, slot3)
//! B = (slot4, slot5)   A = (slot6, count)
//! ```
//!
//! Only 7 ids have room; a tile with 8 lights reports `count = 8` and the eighth id is not
//! stored. Values are exact in `f32` (16 significant bits against a 24-bit mantissa), which
//! is why the texture must keep full 32-bit float channels.

use bitflags::bitflags;

use crate::lights::LightId;

use super::ranking::MAX_LIGHTS_PER_TILE;

/// Number of light ids a texel can store
pub const STORED_SLOTS: usize = 7;

/// Scale between the packed 16-bit integer and the channel value
const CHANNEL_SCALE: f32 = 65536.0;

/// Four packed channels of one tile
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndexTexel(pub [f32; 4]);

impl IndexTexel {
    /// The texel of a tile no light reaches
    pub const EMPTY: Self = Self([0.0; 4]);

    /// Channel values (R, G, B, A)
    pub const fn channels(&self) -> [f32; 4] {
        self.0
    }
}

bitflags! {
    /// Anomalies found while decoding a texel
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DecodeIssues: u8 {
        /// A channel was NaN or infinite and decoded as zero
        const NOT_FINITE = 1 << 0;
        /// A channel was outside `[0, 1)` and was clamped
        const OUT_OF_RANGE = 1 << 1;
        /// A channel did not land on a 1/65536 step and was floored
        const NOT_INTEGRAL = 1 << 2;
        /// The stored count exceeded the per-tile maximum and was clamped
        const COUNT_OVERFLOW = 1 << 3;
    }
}

/// Decoded contents of one texel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodedTexel {
    /// Raw slot values, ranked order
    pub slots: [u8; STORED_SLOTS],
    /// Number of lights affecting the tile
    pub count: u8,
    /// Problems detected while decoding; empty for well-formed texels
    pub issues: DecodeIssues,
}

impl DecodedTexel {
    /// Stored light ids, highest importance first
    pub fn ids(&self) -> Vec<LightId> {
        let stored = usize::from(self.count).min(STORED_SLOTS);
        self.slots[..stored].iter().copied().map(LightId::new).collect()
    }

    /// True if no anomaly was found
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Pack two 8-bit fields into one channel value
pub fn encode_pair(low: u8, high: u8) -> f32 {
    let combined = f32::from(low) + f32::from(high) * 256.0;
    combined / CHANNEL_SCALE
}

/// Unpack a channel value into its two 8-bit fields
///
/// Malformed values never panic: they are masked into range and flagged.
pub fn decode_pair(value: f32) -> (u8, u8, DecodeIssues) {
    let mut issues = DecodeIssues::empty();

    if !value.is_finite() {
        return (0, 0, DecodeIssues::NOT_FINITE);
    }

    let mut combined = value * CHANNEL_SCALE;
    if !(0.0..CHANNEL_SCALE).contains(&combined) {
        issues |= DecodeIssues::OUT_OF_RANGE;
        combined = combined.clamp(0.0, CHANNEL_SCALE - 1.0);
    }

    let floored = combined.floor();
    if floored != combined {
        issues |= DecodeIssues::NOT_INTEGRAL;
    }

    let packed = floored as u32;
    ((packed % 256) as u8, (packed / 256) as u8, issues)
}

/// Pack a tile's ranked light ids into a texel
///
/// Only the first [`MAX_LIGHTS_PER_TILE`] ids are counted; the ranker never produces more,
/// longer input is truncated.
pub fn encode_texel(ranked_ids: &[LightId]) -> IndexTexel {
    let count = ranked_ids.len().min(MAX_LIGHTS_PER_TILE);

    let mut slots = [0u8; MAX_LIGHTS_PER_TILE];
    for (slot, id) in slots.iter_mut().zip(&ranked_ids[..count]) {
        *slot = id.value();
    }

    IndexTexel([
        encode_pair(slots[0], slots[1]),
        encode_pair(slots[2], slots[3]),
        encode_pair(slots[4], slots[5]),
        encode_pair(slots[6], count as u8),
    ])
}

/// Unpack a texel into slot ids and count
pub fn decode_texel(texel: IndexTexel) -> DecodedTexel {
    let [r, g, b, a] = texel.channels();
    let mut decoded = DecodedTexel::default();

    for (channel, value) in [r, g, b].into_iter().enumerate() {
        let (low, high, issues) = decode_pair(value);
        decoded.slots[channel * 2] = low;
        decoded.slots[channel * 2 + 1] = high;
        decoded.issues |= issues;
    }

    let (slot6, count, issues) = decode_pair(a);
    decoded.slots[6] = slot6;
    decoded.issues |= issues;

    decoded.count = if usize::from(count) > MAX_LIGHTS_PER_TILE {
        decoded.issues |= DecodeIssues::COUNT_OVERFLOW;
        MAX_LIGHTS_PER_TILE as u8
    } else {
        count
    };

    if !decoded.is_clean() {
        log::warn!("Malformed index texel {:?}: {:?}", texel.channels(), decoded.issues);
    }

    decoded
}
