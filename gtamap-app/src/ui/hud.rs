use eframe::egui;

use gtamap_core::{format_coordinates, GTA_BOUNDS};
use gtamap_tiles::native_zoom;

use crate::app::{GtaMapApp, HUD_CORNER_RADIUS, HUD_MARGIN};

impl GtaMapApp {
    pub(crate) fn show_hud(&mut self, ctx: &egui::Context) {
        if !self.show_hud {
            return;
        }

        let hud_alpha =
            (self.preferences.hud_panel_opacity.clamp(0.0, 1.0) * 255.0).round() as u8;

        // -- Bottom-right: cursor & camera --
        egui::Area::new(egui::Id::new("hud_cursor"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-HUD_MARGIN, -HUD_MARGIN])
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(hud_alpha))
                    .inner_margin(egui::Margin::same(8))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(220, 220, 220));
                        ui.style_mut().spacing.item_spacing.y = 2.0;

                        match self.cursor_world {
                            Some(world) => {
                                ui.label(
                                    egui::RichText::new(format!(
                                        "Cursor: {}",
                                        format_coordinates(world.x, world.y)
                                    ))
                                    .monospace(),
                                );
                                if !GTA_BOUNDS.contains(world.x, world.y) {
                                    ui.colored_label(
                                        egui::Color32::from_rgb(255, 180, 50),
                                        "Outside the playable area",
                                    );
                                }
                            }
                            None => {
                                ui.label(egui::RichText::new("Cursor: -").monospace());
                            }
                        }
                        ui.label(format!(
                            "Zoom: {:.2} (tiles z{})",
                            self.view.zoom,
                            native_zoom(self.view.zoom, gtamap_tiles::MAX_NATIVE_ZOOM)
                        ));
                        ui.label(format!("Markers: {}", self.annotations.len()));
                        if !self.tiles.pending.is_empty() {
                            ui.colored_label(
                                egui::Color32::YELLOW,
                                format!("Loading {} tiles\u{2026}", self.tiles.pending.len()),
                            );
                        }
                    });
            });
    }
}
