/// Modal dialog currently shown over the map. At most one at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) enum ActiveDialog {
    #[default]
    None,
    AddMarker,
    BulkImport,
    /// Naming a marker dropped by double-clicking the map at `(x, y)`.
    TitlePrompt { x: f64, y: f64 },
}

impl ActiveDialog {
    pub(crate) fn is_open(&self) -> bool {
        *self != Self::None
    }
}

/// Text fields of the add-marker dialog.
#[derive(Debug, Clone, Default)]
pub(crate) struct AddMarkerForm {
    pub(crate) x: String,
    pub(crate) y: String,
    pub(crate) title: String,
    pub(crate) color_index: usize,
    pub(crate) error: Option<String>,
}

/// State of the bulk-import dialog.
#[derive(Debug, Clone, Default)]
pub(crate) struct BulkImportForm {
    pub(crate) text: String,
    pub(crate) title: String,
    pub(crate) color_index: usize,
    /// Result of the last "Preview" click.
    pub(crate) preview: Option<usize>,
    pub(crate) error: Option<String>,
}

/// State of the double-click title prompt.
#[derive(Debug, Clone, Default)]
pub(crate) struct TitlePromptForm {
    pub(crate) title: String,
    pub(crate) error: Option<String>,
}

impl AddMarkerForm {
    pub(crate) fn reset(&mut self, color_index: usize) {
        *self = Self {
            color_index,
            ..Self::default()
        };
    }
}

impl BulkImportForm {
    pub(crate) fn reset(&mut self, color_index: usize) {
        *self = Self {
            color_index,
            ..Self::default()
        };
    }
}
