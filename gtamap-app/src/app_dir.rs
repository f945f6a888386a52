//! Directory where the executable lives. Preferences, marker data, and the
//! tile atlas are looked up next to it so the app runs as a standalone folder.

use std::path::PathBuf;

/// Directory containing the running executable. Falls back to current directory if unavailable.
pub fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Default tile atlas location.
pub fn tiles_directory() -> PathBuf {
    exe_directory().join("tiles").join("styleAtlas")
}

/// Per-user config directory. Read as a fallback when no preferences file
/// sits next to the executable (e.g. an installed, read-only copy).
pub fn config_directory() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "GtaMap").map(|d| d.config_dir().to_path_buf())
}
