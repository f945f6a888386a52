use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::buffer::TileImage;
use crate::source::TileSource;
use crate::tile::TileKey;

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Generation counter shared between the UI and the loader.
///
/// Advancing the generation makes an in-flight batch skip the tiles it has
/// not started yet. Used when the view moves on before a batch finishes.
#[derive(Debug, Default)]
pub struct LoadCancel {
    generation: AtomicU64,
}

impl LoadCancel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// Batch loading
// ---------------------------------------------------------------------------

/// Outcome of one batch. Every requested key ends up in exactly one list.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub loaded: Vec<(TileKey, TileImage)>,
    /// Tiles that could not be read or decoded.
    pub missing: Vec<TileKey>,
    /// Tiles skipped because the batch was cancelled.
    pub skipped: Vec<TileKey>,
    pub elapsed: Duration,
}

impl BatchResult {
    pub fn cancelled(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Decode `keys` in parallel.
///
/// Missing files are expected (the atlas does not cover the whole pyramid)
/// and logged at debug level; other failures are logged as warnings.
pub fn load_batch(source: &TileSource, keys: &[TileKey], cancel: &LoadCancel) -> BatchResult {
    let start = Instant::now();
    let gen = cancel.generation();

    let results: Vec<_> = keys
        .par_iter()
        .map(|&key| {
            if cancel.generation() != gen {
                return (key, None);
            }
            (key, Some(source.load(key)))
        })
        .collect();

    let mut batch = BatchResult::default();
    for (key, result) in results {
        match result {
            None => batch.skipped.push(key),
            Some(Ok(image)) => batch.loaded.push((key, image)),
            Some(Err(e)) => {
                if e.is_not_found() {
                    debug!("{e}");
                } else {
                    warn!("{e}");
                }
                batch.missing.push(key);
            }
        }
    }
    batch.elapsed = start.elapsed();

    debug!(
        requested = keys.len(),
        loaded = batch.loaded.len(),
        missing = batch.missing.len(),
        skipped = batch.skipped.len(),
        elapsed_ms = batch.elapsed.as_millis(),
        "Tile batch complete"
    );
    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_advances_generation() {
        let cancel = LoadCancel::new();
        assert_eq!(cancel.generation(), 0);
        cancel.cancel();
        cancel.cancel();
        assert_eq!(cancel.generation(), 2);
    }

    #[test]
    fn missing_directory_reports_every_key() {
        let source = TileSource::new("no-such-tile-dir");
        let keys = [TileKey::new(0, 0, 0), TileKey::new(1, 1, 1), TileKey::new(1, 5, 0)];
        let batch = load_batch(&source, &keys, &LoadCancel::new());
        assert!(batch.loaded.is_empty());
        assert!(!batch.cancelled());
        let mut missing = batch.missing.clone();
        missing.sort();
        assert_eq!(missing, keys.to_vec());
    }

    #[test]
    fn empty_batch() {
        let batch = load_batch(&TileSource::new("x"), &[], &LoadCancel::new());
        assert!(batch.loaded.is_empty() && batch.missing.is_empty() && batch.skipped.is_empty());
    }
}
