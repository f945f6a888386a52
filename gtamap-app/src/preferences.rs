use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use gtamap_core::PALETTE;

// ---------------------------------------------------------------------------
// Last-view snapshot
// ---------------------------------------------------------------------------

/// Camera captured on exit so the next session can reopen where this one
/// left off.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LastView {
    pub lat: f64,
    pub lng: f64,
    pub zoom: f64,
}

// ---------------------------------------------------------------------------
// Application preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    /// Custom tile atlas directory. When empty, `tiles/styleAtlas` next to the executable is used.
    #[serde(default)]
    pub tiles_dir: String,
    /// Custom marker data directory. When empty, a `data/` folder next to the executable is used.
    #[serde(default)]
    pub data_dir: String,
    #[serde(default)]
    pub min_zoom: f64,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,
    #[serde(default = "default_zoom")]
    pub default_zoom: f64,
    /// Locating a marker zooms in to at least this level.
    #[serde(default = "default_focus_zoom")]
    pub focus_zoom: f64,
    /// Palette entry preselected in the add-marker and bulk-import dialogs.
    #[serde(default)]
    pub default_color_index: usize,
    #[serde(default)]
    pub sidebar_collapsed: bool,
    #[serde(default = "default_true")]
    pub show_hud: bool,
    /// HUD panel background opacity 0.0..=1.0 (default 0.65).
    #[serde(default = "default_hud_panel_opacity")]
    pub hud_panel_opacity: f32,
    /// Decoded tiles kept as textures.
    #[serde(default = "default_tile_cache_capacity")]
    pub tile_cache_capacity: usize,
    #[serde(default = "default_true")]
    pub restore_last_view: bool,
    #[serde(default)]
    pub last_view: Option<LastView>,
}

fn default_window_width() -> f32 {
    1280.0
}
fn default_window_height() -> f32 {
    800.0
}
fn default_max_zoom() -> f64 {
    5.0
}
fn default_zoom() -> f64 {
    2.0
}
fn default_focus_zoom() -> f64 {
    3.0
}
fn default_true() -> bool {
    true
}
fn default_hud_panel_opacity() -> f32 {
    0.65
}
fn default_tile_cache_capacity() -> usize {
    256
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            tiles_dir: String::new(),
            data_dir: String::new(),
            min_zoom: 0.0,
            max_zoom: default_max_zoom(),
            default_zoom: default_zoom(),
            focus_zoom: default_focus_zoom(),
            default_color_index: 0,
            sidebar_collapsed: false,
            show_hud: true,
            hud_panel_opacity: default_hud_panel_opacity(),
            tile_cache_capacity: default_tile_cache_capacity(),
            restore_last_view: true,
            last_view: None,
        }
    }
}

impl AppPreferences {
    /// Load preferences from next to the executable, then from the user
    /// config directory, falling back to defaults.
    pub fn load() -> Self {
        let mut candidates = vec![config_path()];
        if let Some(dir) = crate::app_dir::config_directory() {
            candidates.push(dir.join("preferences.json"));
        }
        for path in candidates {
            if path.exists() {
                if let Some(prefs) = Self::load_from(&path) {
                    return prefs;
                }
            } else {
                debug!("No preferences file at {}", path.display());
            }
        }
        Self::default()
    }

    /// Read one preferences file. `None` if it cannot be read or parsed.
    pub fn load_from(path: &Path) -> Option<Self> {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<AppPreferences>(&json) {
                Ok(prefs) => {
                    info!("Loaded preferences from {}", path.display());
                    Some(prefs.sanitized())
                }
                Err(e) => {
                    error!("Failed to parse preferences: {e}");
                    None
                }
            },
            Err(e) => {
                error!("Failed to read preferences file: {e}");
                None
            }
        }
    }

    /// Persist preferences to disk.
    pub fn save(&self) {
        self.save_to(&config_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences");
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    /// Repair values a hand-edited file may have broken.
    pub fn sanitized(mut self) -> Self {
        if !self.min_zoom.is_finite() || !self.max_zoom.is_finite() || self.min_zoom > self.max_zoom
        {
            self.min_zoom = 0.0;
            self.max_zoom = default_max_zoom();
        }
        if !self.default_zoom.is_finite() {
            self.default_zoom = default_zoom();
        }
        self.default_zoom = self.default_zoom.clamp(self.min_zoom, self.max_zoom);
        if !self.focus_zoom.is_finite() {
            self.focus_zoom = default_focus_zoom();
        }
        if self.default_color_index >= PALETTE.len() {
            self.default_color_index = 0;
        }
        self.hud_panel_opacity = self.hud_panel_opacity.clamp(0.0, 1.0);
        self.tile_cache_capacity = self.tile_cache_capacity.max(16);
        self.window_width = self.window_width.max(480.0);
        self.window_height = self.window_height.max(320.0);
        self
    }
}

fn config_path() -> PathBuf {
    crate::app_dir::exe_directory().join("preferences.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let prefs: AppPreferences = serde_json::from_str("{}").unwrap();
        assert_eq!(prefs, AppPreferences::default());
        assert_eq!(prefs.default_zoom, 2.0);
        assert_eq!(prefs.focus_zoom, 3.0);
        assert!(prefs.restore_last_view);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        let prefs = AppPreferences {
            sidebar_collapsed: true,
            default_color_index: 3,
            last_view: Some(LastView {
                lat: -1703.47,
                lng: -218.78,
                zoom: 4.0,
            }),
            ..AppPreferences::default()
        };
        prefs.save_to(&path);
        assert_eq!(AppPreferences::load_from(&path), Some(prefs));
    }

    #[test]
    fn malformed_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ nope").unwrap();
        assert_eq!(AppPreferences::load_from(&path), None);
        assert_eq!(AppPreferences::load_from(&dir.path().join("missing.json")), None);
    }

    #[test]
    fn sanitize_repairs_out_of_range_values() {
        let prefs = AppPreferences {
            min_zoom: 4.0,
            max_zoom: 1.0,
            default_zoom: 9.0,
            default_color_index: 42,
            hud_panel_opacity: 3.0,
            tile_cache_capacity: 0,
            ..AppPreferences::default()
        }
        .sanitized();
        assert_eq!((prefs.min_zoom, prefs.max_zoom), (0.0, 5.0));
        assert_eq!(prefs.default_zoom, 5.0);
        assert_eq!(prefs.default_color_index, 0);
        assert_eq!(prefs.hud_panel_opacity, 1.0);
        assert_eq!(prefs.tile_cache_capacity, 16);
    }
}
