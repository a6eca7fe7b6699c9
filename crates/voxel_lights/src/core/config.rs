//! # Bake Configuration
//!
//! Configuration for the baking volume and for a complete bake run.
//!
//! ## Configuration Categories
//!
//! - **Volume Config**: grid placement, cell size, vertical extent, texture size and priority
//! - **Bake Config**: a volume plus the output location and log filter used by a bake run
//! - **Light Settings**: serialized point lights baked by a run
//!
//! Both types serialize through [`Config`], so they can be kept in TOML or RON files.

use serde::{Serialize, Deserialize};

use crate::config::{Config, ConfigError};
use crate::foundation::math::{utils, Vec3};

/// Number of vertical layers multiplexed into one index texture
pub const LAYER_COUNT: u32 = 4;

/// # Texture Size
///
/// Side length of the full index texture. The texture hosts the 4 vertical layers as a
/// 2x2 tiling, so each layer covers a quadrant of half this resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextureSize {
    /// 256x256 texture, 4 layers of 128x128 tiles
    Small,
    /// 512x512 texture, 4 layers of 256x256 tiles
    #[default]
    Mid,
    /// 1024x1024 texture, 4 layers of 512x512 tiles
    Large,
}

impl TextureSize {
    /// Side length of the full index texture in texels
    pub const fn texture_side(self) -> u32 {
        match self {
            Self::Small => 256,
            Self::Mid => 512,
            Self::Large => 1024,
        }
    }

    /// Tiles per row/column of a single layer
    pub const fn quadrant_resolution(self) -> u32 {
        self.texture_side() / 2
    }
}

/// # Volume Configuration
///
/// Describes the region baked into the index texture. The footprint is
/// `cell_size * quadrant_resolution` wide on X and Z; vertically the volume spans
/// `center.y - volume_height ..= center.y + volume_height`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeConfig {
    /// World-space center of the volume
    pub center: Vec3,
    /// Edge length of one tile on X and Z
    pub cell_size: f32,
    /// Vertical half height of the volume
    pub volume_height: f32,
    /// Index texture resolution
    pub texture_size: TextureSize,
    /// Selection priority when several volumes are registered; higher wins
    pub priority: i32,
}

impl VolumeConfig {
    /// Create a volume configuration with default sizing at the given center
    pub fn new(center: Vec3) -> Self {
        Self {
            center,
            ..Self::default()
        }
    }

    /// Set the tile edge length
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the vertical half height
    pub fn with_volume_height(mut self, volume_height: f32) -> Self {
        self.volume_height = volume_height;
        self
    }

    /// Set the texture resolution
    pub fn with_texture_size(mut self, texture_size: TextureSize) -> Self {
        self.texture_size = texture_size;
        self
    }

    /// Set the selection priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Tiles per row/column of a single layer
    pub const fn quadrant_resolution(&self) -> u32 {
        self.texture_size.quadrant_resolution()
    }

    /// Side length of the full index texture
    pub const fn texture_side(&self) -> u32 {
        self.texture_size.texture_side()
    }

    /// Width of the footprint on X and Z
    pub fn footprint_size(&self) -> f32 {
        self.cell_size * self.quadrant_resolution() as f32
    }

    /// Half of the footprint width
    pub fn footprint_half_size(&self) -> f32 {
        self.footprint_size() * 0.5
    }

    /// Full extent of the volume (x, y, z)
    pub fn extent(&self) -> Vec3 {
        let footprint = self.footprint_size();
        Vec3::new(footprint, self.volume_height * 2.0, footprint)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !utils::is_finite(&self.center) {
            return Err(format!("Volume center must be finite, got {:?}", self.center));
        }

        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(format!("Cell size must be positive, got {}", self.cell_size));
        }

        if !self.volume_height.is_finite() || self.volume_height <= 0.0 {
            return Err(format!("Volume height must be positive, got {}", self.volume_height));
        }

        Ok(())
    }
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            center: Vec3::zeros(),
            cell_size: 1.0,
            volume_height: 30.0,
            texture_size: TextureSize::default(),
            priority: 0,
        }
    }
}

impl Config for VolumeConfig {}

/// Serialized point light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSettings {
    /// World-space position
    pub position: Vec3,
    /// Radius of influence
    pub range: f32,
    /// Linear RGB color
    pub color: Vec3,
    /// Brightness multiplier
    pub strength: f32,
    /// Disabled lights are kept but not baked
    pub enabled: bool,
}

impl LightSettings {
    /// White, unit-strength light
    pub fn new(position: Vec3, range: f32) -> Self {
        Self {
            position,
            range,
            ..Self::default()
        }
    }
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            range: 1.0,
            color: Vec3::new(1.0, 1.0, 1.0),
            strength: 1.0,
            enabled: true,
        }
    }
}

/// # Bake Configuration
///
/// Top-level settings for a bake run: which volume to bake, where the index texture lives,
/// and how chatty the logger is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BakeConfig {
    /// Baking volume
    pub volume: VolumeConfig,
    /// Root directory for file-backed texture storage
    pub output_dir: String,
    /// Storage key of the index texture (usually the scene name)
    pub texture_key: String,
    /// Log filter passed to `env_logger`
    pub log_filter: String,
    /// Lights to bake, in id order
    #[serde(default)]
    pub lights: Vec<LightSettings>,
}

impl BakeConfig {
    /// Create a bake configuration for a volume
    pub fn new(volume: VolumeConfig) -> Self {
        Self {
            volume,
            ..Self::default()
        }
    }

    /// Set the storage location
    pub fn with_output(mut self, output_dir: impl Into<String>, texture_key: impl Into<String>) -> Self {
        self.output_dir = output_dir.into();
        self.texture_key = texture_key.into();
        self
    }

    /// Append a light
    pub fn with_light(mut self, light: LightSettings) -> Self {
        self.lights.push(light);
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.volume.validate().map_err(ConfigError::Invalid)?;

        if self.texture_key.is_empty() {
            return Err(ConfigError::Invalid("Texture key cannot be empty".to_string()));
        }

        for (index, light) in self.lights.iter().enumerate() {
            if !utils::is_finite(&light.position) || !light.range.is_finite() || !light.strength.is_finite() {
                return Err(ConfigError::Invalid(format!("Light {index} has non-finite parameters")));
            }
        }

        Ok(())
    }
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            volume: VolumeConfig::default(),
            output_dir: "baked".to_string(),
            texture_key: "default".to_string(),
            log_filter: "info".to_string(),
            lights: Vec::new(),
        }
    }
}

impl Config for BakeConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_texture_size_resolutions() {
        assert_eq!(TextureSize::Small.texture_side(), 256);
        assert_eq!(TextureSize::Small.quadrant_resolution(), 128);
        assert_eq!(TextureSize::Mid.quadrant_resolution(), 256);
        assert_eq!(TextureSize::Large.texture_side(), 1024);
        assert_eq!(TextureSize::Large.quadrant_resolution(), 512);
    }

    #[test]
    fn test_volume_extent() {
        let config = VolumeConfig::new(Vec3::zeros())
            .with_cell_size(0.5)
            .with_volume_height(10.0)
            .with_texture_size(TextureSize::Small);

        let extent = config.extent();
        assert_relative_eq!(extent.x, 64.0);
        assert_relative_eq!(extent.y, 20.0);
        assert_relative_eq!(extent.z, 64.0);
        assert_relative_eq!(config.footprint_half_size(), 32.0);
    }

    #[test]
    fn test_validation_rejects_degenerate_volume() {
        assert!(VolumeConfig::default().validate().is_ok());
        assert!(VolumeConfig::default().with_cell_size(0.0).validate().is_err());
        assert!(VolumeConfig::default().with_cell_size(f32::NAN).validate().is_err());
        assert!(VolumeConfig::default().with_volume_height(-1.0).validate().is_err());
        assert!(VolumeConfig::new(Vec3::new(f32::INFINITY, 0.0, 0.0)).validate().is_err());
    }

    #[test]
    fn test_bake_config_toml_round_trip() {
        let config = BakeConfig::new(
            VolumeConfig::new(Vec3::new(1.0, 2.0, 3.0))
                .with_texture_size(TextureSize::Large)
                .with_priority(3),
        )
        .with_output("out", "level_01")
        .with_light(LightSettings::new(Vec3::new(4.0, 1.0, -2.0), 6.0))
        .with_light(LightSettings {
            strength: 2.5,
            enabled: false,
            ..LightSettings::default()
        });

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = BakeConfig::from_str_with_format(&text, "bake.toml").unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_bake_config_ron_round_trip() {
        let config = BakeConfig::default();
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let parsed = BakeConfig::from_str_with_format(&text, "bake.ron").unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_lights_default_when_missing() {
        let text = "(volume: (center: (0.0, 0.0, 0.0), cell_size: 1.0, volume_height: 30.0, \
                    texture_size: Small, priority: 0), output_dir: \"baked\", \
                    texture_key: \"scene\", log_filter: \"info\")";
        let parsed = BakeConfig::from_str_with_format(text, "bake.ron").unwrap();
        assert!(parsed.lights.is_empty());
        assert_eq!(parsed.volume.texture_size, TextureSize::Small);
    }

    #[test]
    fn test_non_finite_light_rejected() {
        let config = BakeConfig::default().with_light(LightSettings::new(Vec3::zeros(), f32::NAN));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = BakeConfig::new(VolumeConfig::new(Vec3::new(0.0, 5.0, 0.0)).with_priority(2))
            .with_output("out", "level_02")
            .with_light(LightSettings::new(Vec3::new(1.0, 2.0, 3.0), 4.0));

        for name in ["bake.toml", "bake.ron"] {
            let path = dir.path().join(name);
            let path = path.to_str().unwrap();
            config.save_to_file(path).unwrap();
            assert_eq!(BakeConfig::load_from_file(path).unwrap(), config);
        }

        let bad = dir.path().join("bake.yaml");
        assert!(matches!(
            config.save_to_file(bad.to_str().unwrap()),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = BakeConfig::from_str_with_format("", "bake.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_empty_texture_key_rejected() {
        let config = BakeConfig::default().with_output("out", "");
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
