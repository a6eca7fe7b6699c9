//! Index texture
//!
//! A square grid of [`IndexTexel`]s addressed by `(x, z)`, stored row-major with `z` as the
//! row. The texture only accepts a texel format that keeps every channel bit-exact.

use thiserror::Error;

use super::codec::{decode_texel, DecodedTexel, IndexTexel};

/// Texture errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextureError {
    /// Format cannot store packed indices exactly
    #[error("Texel format {0:?} cannot hold packed light indices losslessly")]
    LossyFormat(TexelFormat),

    /// Side is zero or not a power of two
    #[error("Texture side must be a positive power of two, got {0}")]
    InvalidSide(u32),

    /// Texel address outside the texture
    #[error("Texel ({x}, {z}) is outside a {side}x{side} texture")]
    OutOfBounds {
        /// Column
        x: u32,
        /// Row
        z: u32,
        /// Texture side
        side: u32,
    },

    /// Texel count does not match the descriptor
    #[error("Expected {expected} texels, got {actual}")]
    SizeMismatch {
        /// Texels the descriptor requires
        expected: usize,
        /// Texels supplied
        actual: usize,
    },
}

/// Pixel formats a host might offer for the index texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TexelFormat {
    /// Four 32-bit float channels
    Rgba32Float,
    /// Four 16-bit half-float channels (11-bit significand)
    Rgba16Float,
    /// Four 16-bit normalized channels
    Rgba16Unorm,
    /// Four 8-bit normalized channels
    Rgba8Unorm,
}

impl TexelFormat {
    /// True if every `k / 65536` channel value with `k < 65536` survives a store/load
    pub const fn is_lossless(self) -> bool {
        matches!(self, Self::Rgba32Float)
    }
}

/// Size and format of an index texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureDescriptor {
    /// Width and height in texels
    pub side: u32,
    /// Channel format
    pub format: TexelFormat,
}

impl TextureDescriptor {
    /// Float32 texture of the given side
    pub const fn new(side: u32) -> Self {
        Self {
            side,
            format: TexelFormat::Rgba32Float,
        }
    }

    /// Number of texels
    pub const fn texel_count(&self) -> usize {
        (self.side as usize) * (self.side as usize)
    }

    /// Reject lossy formats and degenerate sizes
    pub fn validate(&self) -> Result<(), TextureError> {
        if !self.format.is_lossless() {
            return Err(TextureError::LossyFormat(self.format));
        }

        if !self.side.is_power_of_two() {
            return Err(TextureError::InvalidSide(self.side));
        }

        Ok(())
    }
}

/// Light-index texture produced by a bake
#[derive(Debug, Clone, PartialEq)]
pub struct IndexTexture {
    descriptor: TextureDescriptor,
    texels: Vec<IndexTexel>,
}

impl IndexTexture {
    /// Create a texture with every texel empty
    pub fn new(descriptor: TextureDescriptor) -> Result<Self, TextureError> {
        descriptor.validate()?;
        Ok(Self {
            descriptor,
            texels: vec![IndexTexel::EMPTY; descriptor.texel_count()],
        })
    }

    /// Wrap existing texel data (row-major, `z` as the row)
    pub fn from_texels(descriptor: TextureDescriptor, texels: Vec<IndexTexel>) -> Result<Self, TextureError> {
        descriptor.validate()?;
        if texels.len() != descriptor.texel_count() {
            return Err(TextureError::SizeMismatch {
                expected: descriptor.texel_count(),
                actual: texels.len(),
            });
        }
        Ok(Self { descriptor, texels })
    }

    /// Size and format
    pub const fn descriptor(&self) -> TextureDescriptor {
        self.descriptor
    }

    /// Width and height in texels
    pub const fn side(&self) -> u32 {
        self.descriptor.side
    }

    /// All texels, row-major
    pub fn texels(&self) -> &[IndexTexel] {
        &self.texels
    }

    fn offset(&self, x: u32, z: u32) -> Result<usize, TextureError> {
        let side = self.side();
        if x >= side || z >= side {
            return Err(TextureError::OutOfBounds { x, z, side });
        }
        Ok(z as usize * side as usize + x as usize)
    }

    /// Read a texel
    pub fn get(&self, x: u32, z: u32) -> Result<IndexTexel, TextureError> {
        self.offset(x, z).map(|offset| self.texels[offset])
    }

    /// Write a texel
    pub fn set(&mut self, x: u32, z: u32, texel: IndexTexel) -> Result<(), TextureError> {
        let offset = self.offset(x, z)?;
        self.texels[offset] = texel;
        Ok(())
    }

    /// Read and decode a texel
    pub fn decode(&self, x: u32, z: u32) -> Result<DecodedTexel, TextureError> {
        self.get(x, z).map(decode_texel)
    }

    /// Reset every texel to empty
    pub fn clear(&mut self) {
        self.texels.fill(IndexTexel::EMPTY);
    }
}
