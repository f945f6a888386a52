use std::collections::HashSet;
use std::sync::mpsc;
use std::sync::Arc;

use eframe::egui;
use tracing::{debug, error, info};

use gtamap_tiles::{load_batch, BatchResult, LoadCancel, TileCache, TileKey, TilePlacement, TileSource};

use crate::app::GtaMapApp;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

pub(crate) enum TileRequest {
    /// Decode these tiles and send back one [`BatchResult`].
    Load { keys: Vec<TileKey> },
    /// Switch to another tile directory for all following batches.
    SetSource(TileSource),
}

/// UI-side bookkeeping for tiles that are uploaded, in flight, or known to
/// be absent from the atlas.
pub(crate) struct TileState {
    pub(crate) textures: TileCache<egui::TextureHandle>,
    pub(crate) pending: HashSet<TileKey>,
    pub(crate) missing: HashSet<TileKey>,
    pub(crate) tx: Option<mpsc::Sender<TileRequest>>,
    pub(crate) rx: Option<mpsc::Receiver<BatchResult>>,
    pub(crate) cancel: Arc<LoadCancel>,
    /// Native zoom of the last request; a change cancels the in-flight batch.
    pub(crate) requested_zoom: Option<u8>,
    pub(crate) source_available: bool,
}

impl TileState {
    pub(crate) fn new(ctx: &egui::Context, source: TileSource, capacity: usize) -> Self {
        let cancel = Arc::new(LoadCancel::new());
        let source_available = source.is_available();
        if !source_available {
            error!("Tile directory not found: {}", source.root().display());
        }
        let (tx, rx) = match spawn_tile_worker(ctx.clone(), source, cancel.clone()) {
            Some((tx, rx)) => (Some(tx), Some(rx)),
            None => (None, None),
        };
        Self {
            textures: TileCache::new(capacity),
            pending: HashSet::new(),
            missing: HashSet::new(),
            tx,
            rx,
            cancel,
            requested_zoom: None,
            source_available,
        }
    }

    /// Keys that still need a request: not uploaded, not in flight, not known missing.
    pub(crate) fn wanted(&self, placements: &[TilePlacement]) -> Vec<TileKey> {
        placements
            .iter()
            .map(|p| p.key)
            .filter(|k| {
                !self.textures.contains(k) && !self.pending.contains(k) && !self.missing.contains(k)
            })
            .collect()
    }

    /// Record a finished batch. Returns the decoded images still to upload.
    pub(crate) fn settle(&mut self, batch: BatchResult) -> Vec<(TileKey, gtamap_tiles::TileImage)> {
        for key in &batch.missing {
            self.pending.remove(key);
            self.missing.insert(*key);
        }
        for key in &batch.skipped {
            self.pending.remove(key);
        }
        for (key, _) in &batch.loaded {
            self.pending.remove(key);
        }
        batch.loaded
    }

    fn forget(&mut self) {
        self.cancel.cancel();
        self.textures.clear();
        self.pending.clear();
        self.missing.clear();
        self.requested_zoom = None;
    }
}

// ---------------------------------------------------------------------------
// Worker thread
// ---------------------------------------------------------------------------

/// Spawn the tile decoding thread. It exits when the request sender is dropped.
///
/// Returns `None` when the OS refuses to start the thread; the map then
/// shows no imagery but markers keep working.
pub(crate) fn spawn_tile_worker(
    ctx: egui::Context,
    source: TileSource,
    cancel: Arc<LoadCancel>,
) -> Option<(mpsc::Sender<TileRequest>, mpsc::Receiver<BatchResult>)> {
    let (req_tx, req_rx) = mpsc::channel::<TileRequest>();
    let (resp_tx, resp_rx) = mpsc::channel::<BatchResult>();

    let spawned = std::thread::Builder::new()
        .name("tile-worker".into())
        .spawn(move || tile_worker(ctx, source, req_rx, resp_tx, cancel));
    match spawned {
        Ok(_) => Some((req_tx, resp_rx)),
        Err(e) => {
            error!("Failed to spawn tile worker: {e}");
            None
        }
    }
}

fn tile_worker(
    ctx: egui::Context,
    mut source: TileSource,
    rx: mpsc::Receiver<TileRequest>,
    tx: mpsc::Sender<BatchResult>,
    cancel: Arc<LoadCancel>,
) {
    debug!("Tile worker started on {}", source.root().display());
    while let Ok(request) = rx.recv() {
        match request {
            TileRequest::SetSource(next) => {
                debug!("Tile worker switched to {}", next.root().display());
                source = next;
            }
            TileRequest::Load { keys } => {
                let batch = load_batch(&source, &keys, &cancel);
                if tx.send(batch).is_err() {
                    return;
                }
                ctx.request_repaint();
            }
        }
    }
    debug!("Tile worker stopped");
}

// ---------------------------------------------------------------------------
// impl GtaMapApp: tile dispatch & polling
// ---------------------------------------------------------------------------

impl GtaMapApp {
    /// Upload every decoded tile the worker has sent since the last frame.
    pub(crate) fn poll_tiles(&mut self, ctx: &egui::Context) {
        let Some(rx) = self.tiles.rx.as_ref() else {
            return;
        };
        let batches: Vec<BatchResult> = rx.try_iter().collect();
        for batch in batches {
            for (key, image) in self.tiles.settle(batch) {
                let color_image = egui::ColorImage::from_rgba_unmultiplied(
                    [image.width as usize, image.height as usize],
                    &image.pixels,
                );
                let texture = ctx.load_texture(
                    format!("tile-{}-{}-{}", key.z, key.x, key.y),
                    color_image,
                    egui::TextureOptions::LINEAR,
                );
                self.tiles.textures.insert(key, texture);
            }
        }
    }

    /// Ask the worker for visible tiles that are neither cached nor in flight.
    pub(crate) fn request_tiles(&mut self, placements: &[TilePlacement]) {
        if self.tiles.tx.is_none() {
            return;
        }
        let keys = self.tiles.wanted(placements);
        if keys.is_empty() {
            return;
        }
        let zoom = keys[0].z;
        if self.tiles.requested_zoom.is_some_and(|z| z != zoom) {
            self.tiles.cancel.cancel();
        }
        self.tiles.requested_zoom = Some(zoom);
        debug!(count = keys.len(), z = zoom, "Requesting tiles");
        self.tiles.pending.extend(keys.iter().copied());
        let sent = self
            .tiles
            .tx
            .as_ref()
            .is_some_and(|tx| tx.send(TileRequest::Load { keys }).is_ok());
        if !sent {
            error!("Tile worker is gone; map imagery disabled");
            self.tiles.tx = None;
            self.tiles.pending.clear();
        }
    }

    /// Point the worker at another atlas directory and drop everything cached.
    pub(crate) fn set_tile_source(&mut self, source: TileSource) {
        info!("Tile directory: {}", source.root().display());
        self.tiles.source_available = source.is_available();
        self.tiles.forget();
        if let Some(tx) = self.tiles.tx.as_ref() {
            let _ = tx.send(TileRequest::SetSource(source));
        }
    }
}

#[cfg(test)]
mod tests {
    use gtamap_tiles::TileImage;

    use super::*;

    fn state() -> TileState {
        TileState {
            textures: TileCache::new(8),
            pending: HashSet::new(),
            missing: HashSet::new(),
            tx: None,
            rx: None,
            cancel: Arc::new(LoadCancel::new()),
            requested_zoom: None,
            source_available: false,
        }
    }

    fn placement(z: u8, x: u32, y: u32) -> TilePlacement {
        TilePlacement {
            key: TileKey::new(z, x, y),
            x: 0.0,
            y: 0.0,
            size: 256.0,
        }
    }

    #[test]
    fn settle_moves_keys_out_of_pending() {
        let mut tiles = state();
        let (a, b, c) = (TileKey::new(1, 0, 0), TileKey::new(1, 1, 0), TileKey::new(1, 0, 1));
        tiles.pending.extend([a, b, c]);

        let batch = BatchResult {
            loaded: vec![(a, TileImage::new(2, 2))],
            missing: vec![b],
            skipped: vec![c],
            ..BatchResult::default()
        };
        let uploads = tiles.settle(batch);

        assert_eq!(uploads.len(), 1);
        assert!(tiles.pending.is_empty());
        assert!(tiles.missing.contains(&b));
        assert!(!tiles.missing.contains(&c));
    }

    #[test]
    fn wanted_skips_pending_and_missing() {
        let mut tiles = state();
        tiles.pending.insert(TileKey::new(2, 0, 0));
        tiles.missing.insert(TileKey::new(2, 1, 0));
        let wanted = tiles.wanted(&[placement(2, 0, 0), placement(2, 1, 0), placement(2, 2, 0)]);
        assert_eq!(wanted, vec![TileKey::new(2, 2, 0)]);
    }

    #[test]
    fn forget_cancels_in_flight_work() {
        let mut tiles = state();
        tiles.missing.insert(TileKey::new(0, 0, 0));
        tiles.requested_zoom = Some(3);
        let before = tiles.cancel.generation();
        tiles.forget();
        assert_eq!(tiles.cancel.generation(), before + 1);
        assert!(tiles.missing.is_empty());
        assert_eq!(tiles.requested_zoom, None);
    }
}
