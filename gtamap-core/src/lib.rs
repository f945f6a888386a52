pub mod error;
pub mod input;
pub mod marker;
pub mod parser;
pub mod projection;
pub mod store;
pub mod transform;

// Re-export primary types for convenience.
pub use error::{MarkerError, ProjectionError, StoreError};
pub use input::{build_marker, parse_paste_shorthand, PastedPair};
pub use marker::{
    now_millis, parse_hex_color, IdGenerator, Marker, MarkerColor, MarkerDraft, MonotonicIds,
    DEFAULT_COLOR, PALETTE,
};
pub use parser::{import_batch, BraceTuples, CoordinateParser, TupleExtractor, Vector3Calls};
pub use projection::{AffineTransform, MapProjection, MapView, TILE_SIZE};
pub use store::{KeyValueStore, MarkerStore, MemoryStore, MARKERS_KEY};
pub use transform::{
    format_clipboard, format_coordinates, round2, viewport_to_world, world_to_viewport,
    GameBounds, ViewportCoords, WorldCoords, GTA_BOUNDS,
};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, MarkerError>;
