//! Texture bookkeeping
//!
//! Headless runs never upload pixels anywhere; a texture is its path and
//! decoded size. Loading the same path twice hands back the same handle.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Texture not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to decode texture {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Handle to a loaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    pub const INVALID: Self = Self(0);

    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureInfo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Default)]
pub struct TextureService {
    textures: HashMap<TextureHandle, TextureInfo>,
    by_path: HashMap<PathBuf, TextureHandle>,
    next_id: u32,
}

impl TextureService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a texture, reading its size from the image header
    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> Result<TextureHandle, TextureError> {
        let path = path.as_ref();
        if let Some(&handle) = self.by_path.get(path) {
            return Ok(handle);
        }
        if !path.exists() {
            return Err(TextureError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let (width, height) =
            image::image_dimensions(path).map_err(|source| TextureError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        self.next_id += 1;
        let handle = TextureHandle(self.next_id);
        self.textures.insert(
            handle,
            TextureInfo {
                path: path.to_path_buf(),
                width,
                height,
            },
        );
        self.by_path.insert(path.to_path_buf(), handle);

        log::debug!("Loaded texture {} ({}x{}) as {:?}", path.display(), width, height, handle);
        Ok(handle)
    }

    /// Forget a texture; false when the handle is unknown
    pub fn unload_texture(&mut self, handle: TextureHandle) -> bool {
        match self.textures.remove(&handle) {
            Some(info) => {
                self.by_path.remove(&info.path);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&TextureInfo> {
        self.textures.get(&handle)
    }

    pub fn size(&self, handle: TextureHandle) -> Option<(u32, u32)> {
        self.get(handle).map(|info| (info.width, info.height))
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn clear(&mut self) {
        self.textures.clear();
        self.by_path.clear();
    }
}
