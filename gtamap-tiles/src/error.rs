use std::path::PathBuf;

use thiserror::Error;

/// Errors from locating or decoding map tiles.
#[derive(Debug, Error)]
pub enum TileError {
    #[error("tile {z}/{x}/{y} is outside the pyramid")]
    InvalidKey { z: u8, x: u32, y: u32 },

    #[error("failed to read tile {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode tile {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl TileError {
    /// The tile file does not exist. Expected at the edges of the atlas.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
