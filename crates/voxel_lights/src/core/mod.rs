//! # Core Module
//!
//! Shared configuration types used by every stage of the bake.
//!
//! ## Organization
//!
//! - **Config**: volume and bake-run configuration
//! - **Foundation**: low-level utilities (math, logging), re-exported for convenience

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    BakeConfig,
    LightSettings,
    TextureSize,
    VolumeConfig,
    LAYER_COUNT,
};
pub use crate::config::{Config, ConfigError};
