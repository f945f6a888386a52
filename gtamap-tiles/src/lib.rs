pub mod buffer;
pub mod cache;
pub mod error;
pub mod loader;
pub mod source;
pub mod tile;

pub use buffer::TileImage;
pub use cache::TileCache;
pub use error::TileError;
pub use loader::{load_batch, BatchResult, LoadCancel};
pub use source::TileSource;
pub use tile::{native_zoom, visible_tiles, TileKey, TilePlacement, MAX_NATIVE_ZOOM};

/// Convenience result type for the tiles crate.
pub type Result<T> = std::result::Result<T, TileError>;
