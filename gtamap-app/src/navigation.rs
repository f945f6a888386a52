use tracing::{debug, warn};

use gtamap_core::ViewportCoords;

use crate::app::GtaMapApp;

impl GtaMapApp {
    /// Zoom by `delta` levels about the view centre.
    pub(crate) fn zoom_center(&mut self, delta: f64) {
        let (cx, cy) = (self.view.width as f64 / 2.0, self.view.height as f64 / 2.0);
        self.view.zoom_at(cx, cy, self.view.zoom + delta);
    }

    pub(crate) fn zoom_at_cursor(&mut self, sx: f64, sy: f64, delta: f64) {
        self.view.zoom_at(sx, sy, self.view.zoom + delta);
    }

    /// Keyboard pan: positive `dx` moves the camera east, positive `dy` south.
    pub(crate) fn pan_camera(&mut self, dx: f64, dy: f64) {
        self.view.pan_by_pixels(-dx, -dy);
    }

    pub(crate) fn reset_view(&mut self) {
        self.view
            .set_view(ViewportCoords::ORIGIN, self.preferences.default_zoom);
    }

    pub(crate) fn check_resize(&mut self, width: u32, height: u32) {
        if width > 0
            && height > 0
            && (width != self.view.width || height != self.view.height)
            && self.view.set_size(width, height).is_ok()
        {
            debug!(width, height, "Map resized");
        }
    }

    /// Apply every focus request queued since the last frame. Only the
    /// last one is visible, but each is consumed exactly once.
    pub(crate) fn apply_focus(&mut self) {
        while let Some(focus) = self.annotations.take_focus() {
            self.view.focus_on(focus.target, focus.min_zoom);
        }
    }

    /// Re-read zoom limits from preferences after the settings window changes them.
    pub(crate) fn apply_zoom_range(&mut self) {
        let (min, max) = (self.preferences.min_zoom, self.preferences.max_zoom);
        if let Err(e) = self.view.set_zoom_range(min, max) {
            warn!("{e}");
        }
    }
}
