use eframe::egui;
use tracing::{info, warn};

use gtamap_core::{MapView, ViewportCoords, WorldCoords};
use gtamap_tiles::TileSource;

use crate::annotations::Annotations;
use crate::app_state::{ActiveDialog, AddMarkerForm, BulkImportForm, TitlePromptForm};
use crate::file_store::FileStore;
use crate::preferences::{AppPreferences, LastView};
use crate::tile_bridge::TileState;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Zoom levels per point of scroll delta.
pub(crate) const ZOOM_SPEED: f64 = 0.01;
/// Zoom levels per `+`/`-` key press.
pub(crate) const KEY_ZOOM_STEP: f64 = 1.0;
/// Pixels to pan per arrow-key press.
pub(crate) const PAN_PIXELS: f64 = 80.0;
pub(crate) const HUD_MARGIN: f32 = 8.0;
pub(crate) const HUD_CORNER_RADIUS: f32 = 6.0;
pub(crate) const SIDEBAR_WIDTH: f32 = 300.0;
/// How long the popup's Copy button reads "Copied!".
pub(crate) const COPIED_FEEDBACK_SECS: f64 = 1.2;
/// Shown where the atlas has no tile.
pub(crate) const MAP_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0x14, 0x1c, 0x24);

// ---------------------------------------------------------------------------
// Application struct
// ---------------------------------------------------------------------------

pub(crate) struct GtaMapApp {
    // Markers
    pub(crate) annotations: Annotations<FileStore>,

    // Camera
    pub(crate) view: MapView,
    pub(crate) cursor_world: Option<WorldCoords>,
    pub(crate) drag_active: bool,

    // Tiles
    pub(crate) tiles: TileState,

    // Dialogs
    pub(crate) active_dialog: ActiveDialog,
    pub(crate) add_form: AddMarkerForm,
    pub(crate) import_form: BulkImportForm,
    pub(crate) prompt_form: TitlePromptForm,

    // Marker popup
    pub(crate) selected_marker: Option<String>,
    pub(crate) copied_until: Option<f64>,

    // UI state
    pub(crate) preferences: AppPreferences,
    pub(crate) show_hud: bool,
    pub(crate) show_help: bool,
    pub(crate) show_about: bool,
    pub(crate) show_settings: bool,
    pub(crate) menu_bar_height: f32,
    pub(crate) tiles_dir_buf: String,
    pub(crate) data_dir_buf: String,
}

// ---------------------------------------------------------------------------
// Constructor
// ---------------------------------------------------------------------------

impl GtaMapApp {
    pub(crate) fn new(egui_ctx: &egui::Context, prefs: AppPreferences) -> Self {
        let store = FileStore::open(&prefs.data_dir);
        let data_dir_display = store.directory().to_string_lossy().to_string();
        let mut annotations = Annotations::load(store);
        annotations.set_focus_zoom(prefs.focus_zoom);

        let source = tile_source_for(&prefs.tiles_dir);
        let tiles_dir_display = source.root().to_string_lossy().to_string();
        let tiles = TileState::new(egui_ctx, source, prefs.tile_cache_capacity);

        let view = initial_view(&prefs);
        let color_index = prefs.default_color_index;

        let mut add_form = AddMarkerForm::default();
        add_form.reset(color_index);
        let mut import_form = BulkImportForm::default();
        import_form.reset(color_index);

        Self {
            annotations,

            view,
            cursor_world: None,
            drag_active: false,

            tiles,

            active_dialog: ActiveDialog::None,
            add_form,
            import_form,
            prompt_form: TitlePromptForm::default(),

            selected_marker: None,
            copied_until: None,

            show_hud: prefs.show_hud,
            show_help: false,
            show_about: false,
            show_settings: false,
            menu_bar_height: 0.0,
            tiles_dir_buf: tiles_dir_display,
            data_dir_buf: data_dir_display,
            preferences: prefs,
        }
    }

    pub(crate) fn capture_last_view(&self) -> LastView {
        LastView {
            lat: self.view.center.lat,
            lng: self.view.center.lng,
            zoom: self.view.zoom,
        }
    }

    /// Persist a preference change made through the UI.
    pub(crate) fn save_preferences(&mut self) {
        self.preferences.show_hud = self.show_hud;
        self.preferences.save();
    }
}

/// Tile directory from preferences, or the bundled atlas when unset.
pub(crate) fn tile_source_for(custom_dir: &str) -> TileSource {
    if custom_dir.trim().is_empty() {
        TileSource::new(crate::app_dir::tiles_directory())
    } else {
        TileSource::new(custom_dir.trim())
    }
}

/// Starting camera: the last session's view when enabled, else the default.
pub(crate) fn initial_view(prefs: &AppPreferences) -> MapView {
    let w = prefs.window_width.max(1.0) as u32;
    let h = prefs.window_height.max(1.0) as u32;
    let mut view = match MapView::with_zoom_range(w, h, prefs.min_zoom, prefs.max_zoom) {
        Ok(view) => view,
        Err(e) => {
            warn!("{e}; using the default zoom range");
            MapView::default()
        }
    };
    view.set_view(ViewportCoords::ORIGIN, prefs.default_zoom);

    if prefs.restore_last_view {
        if let Some(lv) = prefs.last_view {
            if lv.lat.is_finite() && lv.lng.is_finite() && lv.zoom.is_finite() {
                info!("Restoring last view at zoom {:.2}", lv.zoom);
                view.set_view(ViewportCoords::new(lv.lat, lv.lng), lv.zoom);
            }
        }
    }
    view
}

// ---------------------------------------------------------------------------
// eframe::App
// ---------------------------------------------------------------------------

impl eframe::App for GtaMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());
        self.poll_tiles(ctx);

        self.draw_menu_bar(ctx);
        self.draw_sidebar(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(MAP_BACKGROUND))
            .show(ctx, |ui| {
                self.draw_map(ui, ctx);
            });

        self.show_hud(ctx);
        self.show_add_marker_dialog(ctx);
        self.show_bulk_import_dialog(ctx);
        self.show_title_prompt(ctx);
        self.show_settings_window(ctx);
        self.show_help_window(ctx);
        self.draw_about_window(ctx);

        self.handle_keyboard(ctx);

        if self.copied_until.is_some() || !self.tiles.pending.is_empty() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.preferences.last_view = Some(self.capture_last_view());
        self.preferences.show_hud = self.show_hud;
        self.preferences.save();
        info!("Saved preferences on exit");
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub(crate) fn run() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting GtaMap");

    let prefs = AppPreferences::load();

    let viewport = egui::ViewportBuilder::default()
        .with_title("GTA Map")
        .with_inner_size([prefs.window_width, prefs.window_height])
        .with_min_inner_size([480.0, 320.0]);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "GtaMap",
        options,
        Box::new(move |cc| {
            egui_material_icons::initialize(&cc.egui_ctx);
            Ok(Box::new(GtaMapApp::new(&cc.egui_ctx, prefs)))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_view_restores_last_session() {
        let prefs = AppPreferences {
            last_view: Some(LastView {
                lat: -1.5,
                lng: 2.25,
                zoom: 4.0,
            }),
            ..AppPreferences::default()
        };
        let view = initial_view(&prefs);
        assert_eq!(view.center, ViewportCoords::new(-1.5, 2.25));
        assert_eq!(view.zoom, 4.0);
    }

    #[test]
    fn initial_view_ignores_last_view_when_disabled() {
        let prefs = AppPreferences {
            restore_last_view: false,
            default_zoom: 1.0,
            last_view: Some(LastView {
                lat: 10.0,
                lng: 10.0,
                zoom: 5.0,
            }),
            ..AppPreferences::default()
        };
        let view = initial_view(&prefs);
        assert_eq!(view.center, ViewportCoords::ORIGIN);
        assert_eq!(view.zoom, 1.0);
    }

    #[test]
    fn initial_view_clamps_restored_zoom() {
        let prefs = AppPreferences {
            max_zoom: 3.0,
            last_view: Some(LastView {
                lat: 0.0,
                lng: 0.0,
                zoom: 9.0,
            }),
            ..AppPreferences::default()
        };
        assert_eq!(initial_view(&prefs).zoom, 3.0);
    }

    #[test]
    fn tile_source_defaults_next_to_executable() {
        let source = tile_source_for("  ");
        assert!(source.root().ends_with("tiles/styleAtlas"));
        assert_eq!(tile_source_for("/srv/atlas").root(), std::path::Path::new("/srv/atlas"));
    }
}
