//! Index texture storage
//!
//! The bake never knows where textures live. Hosts hand it an [`IndexTextureStore`] and a
//! [`TextureKey`] (typically derived from the scene or level name); the store loads an
//! existing texture or creates an empty one, and persists the finished texture in a single
//! commit.
//!
//! Stores must reject lossy texel formats: the packed light indices only survive formats
//! with full 32-bit float channels.

mod exr_store;
mod memory;

use std::fmt;

use thiserror::Error;

use crate::bake::{IndexTexture, TextureDescriptor, TextureError};

pub use exr_store::{ExrTextureStore, TEXTURE_FILE_NAME};
pub use memory::MemoryTextureStore;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding or decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Texture error
    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    /// Key is empty or not a clean relative path
    #[error("Invalid texture key: {0:?}")]
    InvalidKey(String),
}

/// Opaque, host-supplied identity of a stored texture
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureKey(String);

impl TextureKey {
    /// Validate and wrap a key
    ///
    /// Keys are relative, `/`-separated names without empty, `.` or `..` components.
    pub fn new(key: impl Into<String>) -> Result<Self, StoreError> {
        let key = key.into();
        let valid = !key.is_empty()
            && !key.contains('\\')
            && key
                .split('/')
                .all(|part| !part.is_empty() && part != "." && part != "..");

        if valid {
            Ok(Self(key))
        } else {
            Err(StoreError::InvalidKey(key))
        }
    }

    /// Key as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TextureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persistent home of baked index textures
pub trait IndexTextureStore {
    /// Load the texture stored under `key`, or create an empty one matching `descriptor`
    ///
    /// A stored texture with a different size is replaced by a fresh one. Nothing is
    /// written until [`commit`](Self::commit).
    fn load_or_create(&mut self, key: &TextureKey, descriptor: TextureDescriptor) -> Result<IndexTexture, StoreError>;

    /// Persist a complete texture under `key`; on error the previous contents stay in place
    fn commit(&mut self, key: &TextureKey, texture: &IndexTexture) -> Result<(), StoreError>;
}
