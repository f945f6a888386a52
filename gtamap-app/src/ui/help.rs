use eframe::egui;

use crate::app::GtaMapApp;

impl GtaMapApp {
    pub(crate) fn show_help_window(&mut self, ctx: &egui::Context) {
        if !self.show_help {
            return;
        }

        let mut open = true;
        egui::Window::new("Controls & Shortcuts")
            .open(&mut open)
            .resizable(false)
            .default_width(340.0)
            .frame(
                egui::Frame::window(&ctx.style())
                    .fill(egui::Color32::from_rgba_unmultiplied(10, 10, 10, 210)),
            )
            .show(ctx, |ui| {
                ui.style_mut().visuals.override_text_color =
                    Some(egui::Color32::from_rgb(220, 220, 220));

                ui.heading("Keyboard");
                ui.add_space(2.0);
                help_grid(
                    ui,
                    "help_kb",
                    &[
                        ("A", "Add marker"),
                        ("I", "Bulk import"),
                        ("S", "Toggle sidebar"),
                        ("H", "Toggle HUD"),
                        ("R", "Reset view"),
                        ("Arrow keys", "Pan map"),
                        ("+ / -", "Zoom in / out"),
                        ("Esc", "Close popup / dialogs"),
                        ("F1", "This help window"),
                    ],
                );

                ui.add_space(8.0);
                ui.heading("Mouse");
                ui.add_space(2.0);
                help_grid(
                    ui,
                    "help_mouse",
                    &[
                        ("Left drag", "Pan"),
                        ("Scroll wheel", "Zoom at cursor"),
                        ("Double-click", "Drop a marker (asks for a title)"),
                        ("Click a pin", "Show title, coordinates, Copy / Remove"),
                    ],
                );

                ui.add_space(8.0);
                ui.heading("Sidebar icons");
                ui.add_space(2.0);
                {
                    use egui_material_icons::icons::*;
                    let icons: &[(&str, &str)] = &[
                        (ICON_ADD_LOCATION, "Add a marker by coordinates"),
                        (ICON_UPLOAD_FILE, "Import {x, y, z, h} or vector3(...) lists"),
                        (ICON_MY_LOCATION, "Centre the map on a marker"),
                        (ICON_CLOSE, "Remove a marker"),
                    ];
                    egui::Grid::new("help_icons")
                        .num_columns(2)
                        .spacing([12.0, 2.0])
                        .show(ui, |ui| {
                            for &(k, d) in icons {
                                ui.label(
                                    egui::RichText::new(k)
                                        .size(18.0)
                                        .color(egui::Color32::WHITE),
                                );
                                ui.label(d);
                                ui.end_row();
                            }
                        });
                }
            });

        if !open {
            self.show_help = false;
        }
    }
}

fn help_grid(ui: &mut egui::Ui, id: &str, rows: &[(&str, &str)]) {
    egui::Grid::new(id)
        .num_columns(2)
        .spacing([12.0, 2.0])
        .show(ui, |ui| {
            for &(k, d) in rows {
                ui.label(egui::RichText::new(k).strong().color(egui::Color32::WHITE));
                ui.label(d);
                ui.end_row();
            }
        });
}
