use thiserror::Error;

/// Errors surfaced to the user action that triggered them.
///
/// None of these are fatal: a failed operation leaves the marker
/// collection exactly as it was before the call.
#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("invalid {axis} coordinate: {input:?}")]
    InvalidCoordinate { axis: &'static str, input: String },

    #[error("a title is required")]
    MissingTitle,

    #[error("no valid coordinates found (expected {{x, y, z, heading}} or vector3(x, y, z))")]
    NoMatchesFound,

    #[error("failed to read markers from {key:?}: {reason}")]
    PersistenceRead { key: String, reason: String },

    #[error("failed to write markers to {key:?}: {reason}")]
    PersistenceWrite { key: String, reason: String },
}

impl MarkerError {
    /// `true` for the user-input errors a dialog should show inline.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidCoordinate { .. } | Self::MissingTitle | Self::NoMatchesFound
        )
    }
}

/// Errors from a key/value store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors from constructing or reconfiguring a map view.
#[derive(Debug, Error, PartialEq)]
pub enum ProjectionError {
    #[error("invalid map view size: {width}×{height} (must be > 0)")]
    InvalidSize { width: u32, height: u32 },

    #[error("invalid zoom range: {min}..={max}")]
    InvalidZoomRange { min: f64, max: f64 },
}
