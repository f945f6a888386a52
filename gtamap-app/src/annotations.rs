//! Marker state owned by the app: the store, id generation, pending focus
//! requests, and the notice shown in the sidebar.
//!
//! Kept free of egui so every action the UI can trigger is testable against
//! an in-memory store.

use std::collections::VecDeque;

use tracing::{error, info, warn};

use gtamap_core::{
    build_marker, now_millis, world_to_viewport, CoordinateParser, IdGenerator, KeyValueStore,
    Marker, MarkerDraft, MarkerError, MarkerStore, MonotonicIds, ViewportCoords, DEFAULT_COLOR,
};

/// Zoom the map is raised to (never lowered to) when locating a marker.
pub(crate) const DEFAULT_FOCUS_ZOOM: f64 = 3.0;

/// One-shot request for the map to centre on a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FocusCommand {
    pub(crate) target: ViewportCoords,
    pub(crate) min_zoom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NoticeLevel {
    Info,
    Error,
}

/// Latest user-visible status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Notice {
    pub(crate) level: NoticeLevel,
    pub(crate) text: String,
}

impl Notice {
    fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

pub(crate) struct Annotations<S: KeyValueStore> {
    store: MarkerStore<S>,
    ids: Box<dyn IdGenerator>,
    clock: fn() -> i64,
    parser: CoordinateParser,
    focus_queue: VecDeque<FocusCommand>,
    notice: Option<Notice>,
    focus_zoom: f64,
}

impl<S: KeyValueStore> Annotations<S> {
    /// Load markers from `backend`. A malformed payload starts empty and
    /// leaves a notice instead of failing.
    pub(crate) fn load(backend: S) -> Self {
        Self::with_ids(backend, Box::new(MonotonicIds::new()), now_millis)
    }

    pub(crate) fn with_ids(backend: S, ids: Box<dyn IdGenerator>, clock: fn() -> i64) -> Self {
        let (store, load_error) = MarkerStore::initialize_or_empty(backend);
        let notice = load_error.map(|e| {
            error!("Starting with no markers: {e}");
            Notice::error(format!("Could not load saved markers: {e}"))
        });
        Self {
            store,
            ids,
            clock,
            parser: CoordinateParser::default(),
            focus_queue: VecDeque::new(),
            notice,
            focus_zoom: DEFAULT_FOCUS_ZOOM,
        }
    }

    // -- Queries -----------------------------------------------------------

    pub(crate) fn markers(&self) -> &[Marker] {
        self.store.markers()
    }

    pub(crate) fn len(&self) -> usize {
        self.store.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub(crate) fn find(&self, id: &str) -> Option<&Marker> {
        self.store.find(id)
    }

    pub(crate) fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub(crate) fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub(crate) fn set_focus_zoom(&mut self, zoom: f64) {
        self.focus_zoom = zoom;
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &S {
        self.store.backend()
    }

    // -- Actions -----------------------------------------------------------

    /// Add a marker from the add-marker dialog's text fields.
    pub(crate) fn add_from_fields(
        &mut self,
        x_text: &str,
        y_text: &str,
        title: &str,
        color: Option<&str>,
    ) -> Result<(), MarkerError> {
        let marker = build_marker(x_text, y_text, title, color, self.ids.as_mut(), (self.clock)())?;
        self.commit_one(marker)
    }

    /// Add a marker at a map position. A blank title creates nothing.
    ///
    /// Returns whether a marker was added.
    pub(crate) fn add_at(&mut self, x: f64, y: f64, title: &str) -> Result<bool, MarkerError> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(false);
        }
        let marker = MarkerDraft::new(x, y, Some(title.to_string()), Some(DEFAULT_COLOR))
            .commit(self.ids.as_mut(), (self.clock)());
        self.commit_one(marker)?;
        Ok(true)
    }

    /// Parse pasted text and add every marker it contains in one write.
    ///
    /// Returns the number of markers added.
    pub(crate) fn import_text(
        &mut self,
        text: &str,
        title: &str,
        color: Option<&str>,
    ) -> Result<usize, MarkerError> {
        let markers = self
            .parser
            .import(text, title, color, self.ids.as_mut(), (self.clock)())?;
        let count = markers.len();
        match self.store.add_batch(markers).map(|_| ()) {
            Ok(()) => {
                self.notice = Some(Notice::info(format!("Imported {count} markers")));
                Ok(count)
            }
            Err(e) => Err(self.report(e)),
        }
    }

    /// Number of markers [`import_text`](Self::import_text) would add.
    pub(crate) fn preview_import(&self, text: &str) -> usize {
        self.parser.preview_count(text)
    }

    pub(crate) fn remove(&mut self, id: &str) -> Result<(), MarkerError> {
        self.store.remove(id).map(|_| ()).map_err(|e| self.report(e))
    }

    pub(crate) fn clear(&mut self) -> Result<(), MarkerError> {
        self.store.clear().map(|_| ()).map_err(|e| self.report(e))
    }

    /// Queue a focus request for the marker. Unknown ids are ignored.
    pub(crate) fn locate(&mut self, id: &str) {
        let Some(marker) = self.store.find(id) else {
            warn!(id, "Locate requested for unknown marker");
            return;
        };
        self.focus_queue.push_back(FocusCommand {
            target: world_to_viewport(marker.x, marker.y),
            min_zoom: self.focus_zoom,
        });
    }

    /// Next pending focus request. Each request is delivered once.
    pub(crate) fn take_focus(&mut self) -> Option<FocusCommand> {
        self.focus_queue.pop_front()
    }

    // -- Helpers -----------------------------------------------------------

    fn commit_one(&mut self, marker: Marker) -> Result<(), MarkerError> {
        let title = marker.display_title().to_string();
        match self.store.add(marker).map(|_| ()) {
            Ok(()) => {
                info!(title, "Added marker");
                Ok(())
            }
            Err(e) => Err(self.report(e)),
        }
    }

    /// Store failures also go to the sidebar notice; validation errors only
    /// belong to the dialog that caused them.
    fn report(&mut self, e: MarkerError) -> MarkerError {
        if !e.is_validation() {
            error!("{e}");
            self.notice = Some(Notice::error(e.to_string()));
        }
        e
    }
}
