use eframe::egui;

use crate::annotations::Annotations;
use crate::app::{tile_source_for, GtaMapApp};
use crate::file_store::FileStore;
use crate::ui::color_picker::color_picker;

impl GtaMapApp {
    pub(crate) fn show_settings_window(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }

        let mut open = true;
        egui::Window::new("Settings")
            .open(&mut open)
            .resizable(true)
            .default_width(340.0)
            .frame(
                egui::Frame::window(&ctx.style())
                    .fill(egui::Color32::from_rgba_unmultiplied(10, 10, 10, 210)),
            )
            .show(ctx, |ui| {
                if ui
                    .checkbox(
                        &mut self.preferences.restore_last_view,
                        "Restore last view on startup",
                    )
                    .changed()
                {
                    self.preferences.save();
                }

                ui.add_space(6.0);
                ui.label("Tile atlas folder:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.tiles_dir_buf)
                        .desired_width(ui.available_width()),
                );
                ui.horizontal(|ui| {
                    if ui.small_button("Browse...").clicked() {
                        if let Some(folder) = pick_folder(&self.tiles_dir_buf) {
                            self.tiles_dir_buf = folder;
                        }
                    }
                    if ui.small_button("Apply").clicked() {
                        let dir = self.tiles_dir_buf.trim().to_string();
                        self.apply_tiles_dir(dir);
                    }
                    if ui.small_button("Reset").clicked() {
                        self.apply_tiles_dir(String::new());
                    }
                });

                ui.add_space(6.0);
                ui.label("Marker data folder:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.data_dir_buf)
                        .desired_width(ui.available_width()),
                );
                ui.horizontal(|ui| {
                    if ui.small_button("Browse...").clicked() {
                        if let Some(folder) = pick_folder(&self.data_dir_buf) {
                            self.data_dir_buf = folder;
                        }
                    }
                    if ui.small_button("Apply").clicked() {
                        let dir = self.data_dir_buf.trim().to_string();
                        self.apply_data_dir(dir);
                    }
                    if ui.small_button("Reset").clicked() {
                        self.apply_data_dir(String::new());
                    }
                });

                ui.add_space(10.0);
                ui.heading("Map");
                let mut range_changed = false;
                range_changed |= ui
                    .add(
                        egui::Slider::new(&mut self.preferences.min_zoom, 0.0..=5.0)
                            .step_by(0.5)
                            .text("Minimum zoom"),
                    )
                    .changed();
                range_changed |= ui
                    .add(
                        egui::Slider::new(&mut self.preferences.max_zoom, 0.0..=8.0)
                            .step_by(0.5)
                            .text("Maximum zoom"),
                    )
                    .changed();
                if range_changed {
                    if self.preferences.min_zoom > self.preferences.max_zoom {
                        self.preferences.max_zoom = self.preferences.min_zoom;
                    }
                    self.preferences.default_zoom = self
                        .preferences
                        .default_zoom
                        .clamp(self.preferences.min_zoom, self.preferences.max_zoom);
                    self.apply_zoom_range();
                    self.preferences.save();
                }
                let (min_zoom, max_zoom) = (self.preferences.min_zoom, self.preferences.max_zoom);
                if ui
                    .add(
                        egui::Slider::new(&mut self.preferences.default_zoom, min_zoom..=max_zoom)
                            .step_by(0.5)
                            .text("Reset zoom"),
                    )
                    .changed()
                {
                    self.preferences.save();
                }
                if ui
                    .add(
                        egui::Slider::new(&mut self.preferences.focus_zoom, 0.0..=8.0)
                            .step_by(0.5)
                            .text("Locate zoom (at least)"),
                    )
                    .changed()
                {
                    self.annotations.set_focus_zoom(self.preferences.focus_zoom);
                    self.preferences.save();
                }
                if ui
                    .add(
                        egui::Slider::new(&mut self.preferences.tile_cache_capacity, 16..=1024)
                            .logarithmic(true)
                            .text("Cached tiles"),
                    )
                    .changed()
                {
                    self.tiles
                        .textures
                        .set_capacity(self.preferences.tile_cache_capacity);
                    self.preferences.save();
                }

                ui.add_space(10.0);
                ui.heading("Markers & HUD");
                ui.label("Default marker colour:");
                if color_picker(ui, &mut self.preferences.default_color_index) {
                    self.preferences.save();
                }
                if ui
                    .add(
                        egui::Slider::new(&mut self.preferences.hud_panel_opacity, 0.0..=1.0)
                            .text("HUD panel opacity"),
                    )
                    .changed()
                {
                    self.preferences.save();
                }
            });

        if !open {
            self.show_settings = false;
        }
    }

    fn apply_tiles_dir(&mut self, dir: String) {
        self.preferences.tiles_dir = dir;
        self.preferences.save();
        let source = tile_source_for(&self.preferences.tiles_dir);
        self.tiles_dir_buf = source.root().to_string_lossy().to_string();
        self.set_tile_source(source);
    }

    /// Switch to another data folder and load the markers stored there.
    fn apply_data_dir(&mut self, dir: String) {
        self.preferences.data_dir = dir;
        self.preferences.save();
        let store = FileStore::open(&self.preferences.data_dir);
        self.data_dir_buf = store.directory().to_string_lossy().to_string();
        self.annotations = Annotations::load(store);
        self.annotations.set_focus_zoom(self.preferences.focus_zoom);
        self.selected_marker = None;
    }
}

fn pick_folder(current: &str) -> Option<String> {
    let start = std::path::Path::new(current);
    let mut dialog = rfd::FileDialog::new();
    if start.is_dir() {
        dialog = dialog.set_directory(start);
    }
    dialog
        .pick_folder()
        .map(|folder| folder.to_string_lossy().to_string())
}
