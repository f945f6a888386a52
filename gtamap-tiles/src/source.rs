use std::path::{Path, PathBuf};

use tracing::debug;

use crate::buffer::TileImage;
use crate::error::TileError;
use crate::tile::TileKey;

/// A directory of pre-rendered tiles laid out as `{z}/{x}/{y}.{ext}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSource {
    root: PathBuf,
    extension: String,
}

impl TileSource {
    pub const DEFAULT_EXTENSION: &'static str = "jpg";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: Self::DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `true` when the tile directory exists.
    pub fn is_available(&self) -> bool {
        self.root.is_dir()
    }

    pub fn path(&self, key: TileKey) -> PathBuf {
        self.root
            .join(key.z.to_string())
            .join(key.x.to_string())
            .join(format!("{}.{}", key.y, self.extension))
    }

    /// Read and decode one tile.
    pub fn load(&self, key: TileKey) -> crate::Result<TileImage> {
        if !key.is_valid() {
            return Err(TileError::InvalidKey {
                z: key.z,
                x: key.x,
                y: key.y,
            });
        }
        let path = self.path(key);
        let bytes = std::fs::read(&path).map_err(|source| TileError::Io {
            path: path.clone(),
            source,
        })?;
        let decoded = image::load_from_memory(&bytes)
            .map_err(|source| TileError::Decode {
                path: path.clone(),
                source,
            })?
            .to_rgba8();
        debug!(z = key.z, x = key.x, y = key.y, "Decoded tile");
        Ok(TileImage::from(decoded))
    }
}
