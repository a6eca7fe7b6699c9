//! In-memory texture store

use std::collections::HashMap;

use crate::bake::{IndexTexture, TextureDescriptor};

use super::{IndexTextureStore, StoreError, TextureKey};

/// Keeps committed textures in a map; useful for tools and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryTextureStore {
    textures: HashMap<TextureKey, IndexTexture>,
}

impl MemoryTextureStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed texture for a key
    pub fn get(&self, key: &TextureKey) -> Option<&IndexTexture> {
        self.textures.get(key)
    }

    /// Number of committed textures
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// True if nothing was committed
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl IndexTextureStore for MemoryTextureStore {
    fn load_or_create(&mut self, key: &TextureKey, descriptor: TextureDescriptor) -> Result<IndexTexture, StoreError> {
        descriptor.validate()?;

        match self.textures.get(key) {
            Some(texture) if texture.descriptor() == descriptor => Ok(texture.clone()),
            Some(texture) => {
                log::info!(
                    "Stored texture '{}' is {}x{}, recreating at {}x{}",
                    key, texture.side(), texture.side(), descriptor.side, descriptor.side
                );
                Ok(IndexTexture::new(descriptor)?)
            }
            None => Ok(IndexTexture::new(descriptor)?),
        }
    }

    fn commit(&mut self, key: &TextureKey, texture: &IndexTexture) -> Result<(), StoreError> {
        texture.descriptor().validate()?;
        self.textures.insert(key.clone(), texture.clone());
        log::debug!("Committed texture '{}' to memory store", key);
        Ok(())
    }
}
