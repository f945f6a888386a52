use eframe::egui;

use crate::app::GtaMapApp;

impl GtaMapApp {
    /// Draw the top menu bar. Must be called **before** the side and central
    /// panels so that `egui` reserves vertical space for it.
    pub(crate) fn draw_menu_bar(&mut self, ctx: &egui::Context) {
        let resp = egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                self.menu_file(ui, ctx);
                self.menu_view(ui);
                self.menu_help(ui);
            });
        });
        self.menu_bar_height = resp.response.rect.height();
    }

    fn menu_file(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.menu_button("File", |ui| {
            if ui.add(shortcut_item("Add Marker\u{2026}", "A")).clicked() {
                ui.close();
                self.open_add_marker();
            }
            if ui.add(shortcut_item("Bulk Import\u{2026}", "I")).clicked() {
                ui.close();
                self.open_bulk_import();
            }
            ui.separator();
            if ui
                .add_enabled(!self.annotations.is_empty(), egui::Button::new("Clear All Markers"))
                .clicked()
            {
                ui.close();
                if self.annotations.clear().is_ok() {
                    self.selected_marker = None;
                }
            }
            ui.separator();
            if ui.button("Quit").clicked() {
                ui.close();
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
    }

    fn menu_view(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("View", |ui| {
            if ui
                .add(shortcut_item(
                    if self.preferences.sidebar_collapsed {
                        "Show Sidebar"
                    } else {
                        "Hide Sidebar"
                    },
                    "S",
                ))
                .clicked()
            {
                ui.close();
                self.toggle_sidebar();
            }
            if ui
                .add(shortcut_item(
                    if self.show_hud { "Hide HUD" } else { "Show HUD" },
                    "H",
                ))
                .clicked()
            {
                ui.close();
                self.show_hud = !self.show_hud;
                self.save_preferences();
            }
            ui.separator();
            if ui.add(shortcut_item("Reset View", "R")).clicked() {
                ui.close();
                self.reset_view();
            }
            ui.separator();
            if ui.button("Settings\u{2026}").clicked() {
                ui.close();
                self.show_settings = !self.show_settings;
            }
        });
    }

    fn menu_help(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("Help", |ui| {
            if ui.add(shortcut_item("Controls", "F1")).clicked() {
                ui.close();
                self.show_help = true;
            }
            ui.separator();
            if ui.button("About GTA Map").clicked() {
                ui.close();
                self.show_about = true;
            }
        });
    }

    pub(crate) fn draw_about_window(&mut self, ctx: &egui::Context) {
        if !self.show_about {
            return;
        }
        let mut open = true;
        egui::Window::new("About GTA Map")
            .open(&mut open)
            .resizable(false)
            .collapsible(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(4.0);
                    ui.heading(
                        egui::RichText::new("GTA Map")
                            .strong()
                            .color(egui::Color32::from_rgb(77, 144, 254)),
                    );
                    ui.add_space(4.0);
                    ui.label("Annotate the GTA V map with your own markers.");
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                            .small()
                            .color(egui::Color32::from_rgb(160, 160, 160)),
                    );
                    ui.add_space(4.0);
                });
            });
        if !open {
            self.show_about = false;
        }
    }
}

/// Build a `Button` with a right-aligned keyboard shortcut hint.
fn shortcut_item(label: &str, shortcut: &str) -> egui::Button<'static> {
    let text = format!("{label}    {shortcut}");
    egui::Button::new(egui::RichText::new(text).size(13.0)).wrap_mode(egui::TextWrapMode::Extend)
}
