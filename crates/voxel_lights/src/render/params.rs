//! Shader parameter plumbing
//!
//! The crate never talks to a GPU API. Renderers implement [`ShaderParameterSink`] and
//! receive the global parameters the voxel light shader reads, under the names in
//! [`names`].

use std::collections::HashMap;

use crate::storage::TextureKey;

/// Global shader parameter names
pub mod names {
    /// `vec4[256]`: position xyz, `inv_range_sqr` in w
    pub const POINT_POS_RANGE: &str = "_TOPointPosRange";
    /// `vec4[256]`: color times strength, `range_sqr_over_fade_range_sqr` times strength in w
    pub const POINT_COLOR: &str = "_TOPointColor";
    /// `vec4`: volume center
    pub const VOXEL_CENTER: &str = "_TPVoxelCenter";
    /// `vec4`: volume extent in xyz, cell size in w
    pub const VOXEL_SIZE: &str = "_TPVoxelSize";
    /// Light-index texture
    pub const VOXEL_INDEX_MAP: &str = "_VoxelIdxMap";
    /// `float`: 1 while a volume is active, 0 otherwise
    pub const ENABLE_TOGGLE: &str = "_IfEnableVoxelPointLights";
}

/// Receiver of global shader parameters
pub trait ShaderParameterSink {
    /// Set a scalar
    fn set_float(&mut self, name: &str, value: f32);

    /// Set a four-component vector
    fn set_vector(&mut self, name: &str, value: [f32; 4]);

    /// Set a vector array
    fn set_vector_array(&mut self, name: &str, values: &[[f32; 4]]);

    /// Bind the stored texture identified by `key`
    fn set_texture(&mut self, name: &str, key: &TextureKey);
}

/// Value recorded by a [`ParameterBlock`]
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    /// Scalar
    Float(f32),
    /// Four-component vector
    Vector([f32; 4]),
    /// Vector array
    VectorArray(Vec<[f32; 4]>),
    /// Texture bound by store key
    Texture(TextureKey),
}

/// Sink that records the latest value per parameter name
///
/// Useful for renderers that batch parameter updates, and for inspecting what a frame
/// published.
#[derive(Debug, Clone, Default)]
pub struct ParameterBlock {
    values: HashMap<String, ParameterValue>,
}

impl ParameterBlock {
    /// Create an empty block
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest value of a parameter
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    /// Latest scalar value of a parameter
    pub fn float(&self, name: &str) -> Option<f32> {
        match self.values.get(name)? {
            ParameterValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Latest vector value of a parameter
    pub fn vector(&self, name: &str) -> Option<[f32; 4]> {
        match self.values.get(name)? {
            ParameterValue::Vector(value) => Some(*value),
            _ => None,
        }
    }

    /// Latest vector array of a parameter
    pub fn vector_array(&self, name: &str) -> Option<&[[f32; 4]]> {
        match self.values.get(name)? {
            ParameterValue::VectorArray(values) => Some(values),
            _ => None,
        }
    }

    /// Latest texture bound to a parameter
    pub fn texture(&self, name: &str) -> Option<&TextureKey> {
        match self.values.get(name)? {
            ParameterValue::Texture(key) => Some(key),
            _ => None,
        }
    }

    /// Number of parameters set
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if nothing was set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Forget all values
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl ShaderParameterSink for ParameterBlock {
    fn set_float(&mut self, name: &str, value: f32) {
        self.values.insert(name.to_owned(), ParameterValue::Float(value));
    }

    fn set_vector(&mut self, name: &str, value: [f32; 4]) {
        self.values.insert(name.to_owned(), ParameterValue::Vector(value));
    }

    fn set_vector_array(&mut self, name: &str, values: &[[f32; 4]]) {
        self.values.insert(name.to_owned(), ParameterValue::VectorArray(values.to_vec()));
    }

    fn set_texture(&mut self, name: &str, key: &TextureKey) {
        self.values.insert(name.to_owned(), ParameterValue::Texture(key.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_keeps_latest_value() {
        let mut block = ParameterBlock::new();
        block.set_float(names::ENABLE_TOGGLE, 1.0);
        block.set_float(names::ENABLE_TOGGLE, 0.0);
        block.set_vector(names::VOXEL_CENTER, [1.0, 2.0, 3.0, 0.0]);

        assert_eq!(block.len(), 2);
        assert_eq!(block.float(names::ENABLE_TOGGLE), Some(0.0));
        assert_eq!(block.vector(names::VOXEL_CENTER), Some([1.0, 2.0, 3.0, 0.0]));
        // Type mismatches read as absent
        assert_eq!(block.float(names::VOXEL_CENTER), None);
    }

    #[test]
    fn test_block_records_arrays_and_textures() {
        let mut block = ParameterBlock::new();
        let key = TextureKey::new("scene").unwrap();
        block.set_vector_array(names::POINT_COLOR, &[[1.0; 4], [2.0; 4]]);
        block.set_texture(names::VOXEL_INDEX_MAP, &key);

        assert_eq!(block.vector_array(names::POINT_COLOR).map(<[_]>::len), Some(2));
        assert_eq!(block.texture(names::VOXEL_INDEX_MAP), Some(&key));

        block.clear();
        assert!(block.is_empty());
    }
}
