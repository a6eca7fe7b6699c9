//! # Voxel Lights
//!
//! Bakes point lights into a per-tile light-index texture so a shader can find the lights
//! touching any world position with one texture fetch and two array reads.
//!
//! ## Features
//!
//! - **Tile Grid**: a square footprint split into four vertical layers, packed as 2x2
//!   quadrants of one texture
//! - **Overlap Query**: octree broad phase plus exact sphere-vs-box tests per tile
//! - **Importance Ranking**: the eight most important lights per tile, packed losslessly
//!   into four 32-bit float channels
//! - **Light Arrays**: 256-slot position/range and color arrays for shader upload
//! - **Storage**: all-or-nothing commits to memory or OpenEXR files
//! - **Render Contract**: priority-based volume selection and shader parameter publishing
//!
//! ## Quick Start
//!
//! ```rust
//! use voxel_lights::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = VolumeConfig::new(Vec3::zeros()).with_texture_size(TextureSize::Small);
//!     let mut volume = VoxelLightVolume::new(config);
//!     volume.add_light(PointLight::new(Vec3::new(2.0, 0.0, 2.0), 3.0));
//!
//!     let mut store = MemoryTextureStore::new();
//!     let key = TextureKey::new("level_01")?;
//!     volume.bake_into(&mut store, &key)?;
//!
//!     let mut volumes = VolumeRegistry::new();
//!     volumes.register(volume);
//!
//!     let mut params = ParameterBlock::new();
//!     publish_frame(&mut volumes, &mut params);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

// Core modules
pub mod core;
pub mod foundation;
pub mod config;

// Bake pipeline
pub mod spatial;
pub mod lights;
pub mod bake;
pub mod snapshot;

// Host-facing surfaces
pub mod storage;
pub mod render;
pub mod volume;

pub use snapshot::LightArraySnapshot;
pub use volume::{ShaderVolume, VoxelLightVolume};

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        bake::{bake, bake_lights, BakeError, BakeOutput, BakeStats, IndexTexture, TileGrid},
        core::{BakeConfig, Config, TextureSize, VolumeConfig},
        foundation::math::Vec3,
        lights::{BakeLight, LightId, LightKey, LightRegistry, PointLight},
        render::{publish_frame, ParameterBlock, ShaderParameterSink, VolumeRegistry},
        snapshot::LightArraySnapshot,
        storage::{ExrTextureStore, IndexTextureStore, MemoryTextureStore, StoreError, TextureKey},
        volume::{ShaderVolume, VoxelLightVolume},
    };
}
