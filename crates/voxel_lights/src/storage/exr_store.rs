//! OpenEXR file store
//!
//! Textures live at `<root>/<key>/VoxelPointInfo.exr` as 32-bit float RGBA images, with
//! image row `y` holding texel row `z`. Commits write a sibling temporary file and rename it
//! over the target, so an interrupted commit never leaves a half-written texture behind.

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, Rgba, Rgba32FImage};

use crate::bake::{IndexTexel, IndexTexture, TextureDescriptor};

use super::{IndexTextureStore, StoreError, TextureKey};

/// File name of the index texture inside a key's directory
pub const TEXTURE_FILE_NAME: &str = "VoxelPointInfo.exr";

/// Directory-backed store of OpenEXR index textures
#[derive(Debug, Clone)]
pub struct ExrTextureStore {
    root: PathBuf,
}

impl ExrTextureStore {
    /// Store textures below `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path of the texture stored under `key`
    pub fn texture_path(&self, key: &TextureKey) -> PathBuf {
        self.root.join(key.as_str()).join(TEXTURE_FILE_NAME)
    }

    fn read_texture(path: &Path) -> Result<IndexTexture, StoreError> {
        let image = image::open(path)?.into_rgba32f();
        let side = image.width();
        if image.height() != side {
            log::warn!("Stored texture {} is not square ({}x{})", path.display(), side, image.height());
        }

        let texels = image.pixels().map(|pixel| IndexTexel(pixel.0)).collect();
        Ok(IndexTexture::from_texels(TextureDescriptor::new(side), texels)?)
    }
}

impl IndexTextureStore for ExrTextureStore {
    fn load_or_create(&mut self, key: &TextureKey, descriptor: TextureDescriptor) -> Result<IndexTexture, StoreError> {
        descriptor.validate()?;

        let path = self.texture_path(key);
        if !path.exists() {
            log::debug!("No stored texture at {}, creating {}x{}", path.display(), descriptor.side, descriptor.side);
            return Ok(IndexTexture::new(descriptor)?);
        }

        match Self::read_texture(&path) {
            Ok(texture) if texture.descriptor() == descriptor => {
                log::debug!("Loaded index texture from {}", path.display());
                Ok(texture)
            }
            Ok(texture) => {
                log::info!(
                    "Stored texture {} is {}x{}, recreating at {}x{}",
                    path.display(), texture.side(), texture.side(), descriptor.side, descriptor.side
                );
                Ok(IndexTexture::new(descriptor)?)
            }
            Err(StoreError::Texture(err)) => {
                log::warn!("Stored texture {} is unusable ({}), recreating", path.display(), err);
                Ok(IndexTexture::new(descriptor)?)
            }
            Err(err) => Err(err),
        }
    }

    fn commit(&mut self, key: &TextureKey, texture: &IndexTexture) -> Result<(), StoreError> {
        texture.descriptor().validate()?;

        let path = self.texture_path(key);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let side = texture.side();
        let mut image = Rgba32FImage::new(side, side);
        for (x, z, pixel) in image.enumerate_pixels_mut() {
            *pixel = Rgba(texture.get(x, z)?.channels());
        }

        let staging = path.with_extension("exr.tmp");
        let written = DynamicImage::ImageRgba32F(image)
            .save_with_format(&staging, ImageFormat::OpenExr)
            .map_err(StoreError::from)
            .and_then(|()| fs::rename(&staging, &path).map_err(StoreError::from));

        if let Err(err) = written {
            // Best effort: the target file is untouched either way
            let _ = fs::remove_file(&staging);
            return Err(err);
        }

        log::info!("Committed {}x{} index texture to {}", side, side, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bake::{encode_texel, IndexTexel};
    use crate::lights::LightId;

    #[test]
    fn test_commit_and_reload_is_bit_exact() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ExrTextureStore::new(dir.path());
        let key = TextureKey::new("levels/forest").unwrap();
        let descriptor = TextureDescriptor::new(16);

        let mut texture = store.load_or_create(&key, descriptor).unwrap();
        for z in 0..16u32 {
            for x in 0..16u32 {
                let ids: Vec<_> = (0..=(x % 9) as u8).map(|i| LightId::new(i * 28 + z as u8)).collect();
                texture.set(x, z, encode_texel(&ids)).unwrap();
            }
        }
        texture.set(15, 15, IndexTexel([65535.0 / 65536.0; 4])).unwrap();
        store.commit(&key, &texture).unwrap();

        assert!(store.texture_path(&key).exists());
        assert!(!store.texture_path(&key).with_extension("exr.tmp").exists());

        let reloaded = store.load_or_create(&key, descriptor).unwrap();
        assert_eq!(reloaded, texture);
    }

    #[test]
    fn test_missing_texture_is_created_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ExrTextureStore::new(dir.path());
        let key = TextureKey::new("new_scene").unwrap();

        let texture = store.load_or_create(&key, TextureDescriptor::new(8)).unwrap();
        assert!(texture.texels().iter().all(|t| *t == IndexTexel::EMPTY));
        // Nothing is written before commit
        assert!(!store.texture_path(&key).exists());
    }

    #[test]
    fn test_corrupt_texture_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ExrTextureStore::new(dir.path());
        let key = TextureKey::new("broken").unwrap();

        let path = store.texture_path(&key);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"not an exr file").unwrap();

        let result = store.load_or_create(&key, TextureDescriptor::new(8));
        assert!(matches!(result, Err(StoreError::Image(_))));
        // The unreadable file is left for the user to inspect
        assert_eq!(fs::read(&path).unwrap(), b"not an exr file");
    }

    #[test]
    fn test_resized_texture_is_recreated() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ExrTextureStore::new(dir.path());
        let key = TextureKey::new("scene").unwrap();

        let mut small = store.load_or_create(&key, TextureDescriptor::new(4)).unwrap();
        small.set(0, 0, encode_texel(&[LightId::new(3)])).unwrap();
        store.commit(&key, &small).unwrap();

        let large = store.load_or_create(&key, TextureDescriptor::new(8)).unwrap();
        assert_eq!(large.side(), 8);
        assert_eq!(large.get(0, 0).unwrap(), IndexTexel::EMPTY);
    }
}
