//! Light-index bake
//!
//! Turns a set of point lights into a per-tile light-index texture:
//! tile grid → overlap query → importance ranking → texel encoding.

mod baker;
pub mod codec;
pub mod grid;
mod overlap;
pub mod ranking;
mod texture;

pub use baker::{bake, bake_lights, bake_lights_into, bake_registry_into, BakeError, BakeOutput, BakeStats, LightNumbering, RegistryBake};
pub use codec::{decode_texel, encode_texel, DecodeIssues, DecodedTexel, IndexTexel, STORED_SLOTS};
pub use grid::{Tile, TileGrid};
pub use overlap::OverlapIndexer;
pub use ranking::{rank, RankedLight, MAX_LIGHTS_PER_TILE};
pub use texture::{IndexTexture, TexelFormat, TextureDescriptor, TextureError};
