use eframe::egui;

use crate::annotations::NoticeLevel;
use crate::app::{GtaMapApp, HUD_CORNER_RADIUS, HUD_MARGIN, SIDEBAR_WIDTH};

impl GtaMapApp {
    pub(crate) fn toggle_sidebar(&mut self) {
        self.preferences.sidebar_collapsed = !self.preferences.sidebar_collapsed;
        self.save_preferences();
    }

    /// Marker list on the left. Must be drawn before the central map panel.
    pub(crate) fn draw_sidebar(&mut self, ctx: &egui::Context) {
        use egui_material_icons::icons::*;

        if self.preferences.sidebar_collapsed {
            self.draw_sidebar_expand_button(ctx);
            return;
        }

        let mut toggle = false;
        let mut locate: Option<String> = None;
        let mut remove: Option<String> = None;
        let mut clear_all = false;

        egui::SidePanel::left("sidebar")
            .exact_width(SIDEBAR_WIDTH)
            .resizable(false)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    ui.heading(egui::RichText::new("GTA Map").strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .small_button("\u{2190}")
                            .on_hover_text("Collapse sidebar")
                            .clicked()
                        {
                            toggle = true;
                        }
                    });
                });
                ui.separator();

                ui.horizontal(|ui| {
                    if ui
                        .button(format!("{ICON_ADD_LOCATION}  Add Marker"))
                        .clicked()
                    {
                        self.open_add_marker();
                    }
                    if ui
                        .button(format!("{ICON_UPLOAD_FILE}  Bulk Import"))
                        .clicked()
                    {
                        self.open_bulk_import();
                    }
                });

                let mut dismiss = false;
                if let Some(notice) = self.annotations.notice() {
                    ui.add_space(6.0);
                    let (icon, color) = match notice.level {
                        NoticeLevel::Info => (ICON_INFO, egui::Color32::from_rgb(120, 190, 255)),
                        NoticeLevel::Error => (ICON_ERROR, egui::Color32::from_rgb(255, 110, 100)),
                    };
                    egui::Frame::NONE
                        .fill(egui::Color32::from_black_alpha(90))
                        .inner_margin(egui::Margin::same(6))
                        .corner_radius(HUD_CORNER_RADIUS)
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.colored_label(color, format!("{icon}  {}", notice.text));
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        if ui.small_button(ICON_CLOSE).clicked() {
                                            dismiss = true;
                                        }
                                    },
                                );
                            });
                        });
                }
                if dismiss {
                    self.annotations.dismiss_notice();
                }

                ui.add_space(8.0);
                let count = self.annotations.len();
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(format!("Markers ({count})")).strong().size(15.0));
                    if count > 0 {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui
                                .small_button("Clear All")
                                .on_hover_text("Clear all markers")
                                .clicked()
                            {
                                clear_all = true;
                            }
                        });
                    }
                });
                ui.separator();

                if count == 0 {
                    ui.add_space(16.0);
                    ui.vertical_centered(|ui| {
                        ui.label("No markers yet");
                        ui.label(
                            egui::RichText::new("Double-click the map or use the buttons above")
                                .small()
                                .color(egui::Color32::from_rgb(150, 150, 150)),
                        );
                    });
                    return;
                }

                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for marker in self.annotations.markers() {
                            let selected = self.selected_marker.as_deref() == Some(marker.id.as_str());
                            ui.horizontal(|ui| {
                                let [r, g, b] = marker.rgb();
                                let (rect, _) = ui.allocate_exact_size(
                                    egui::vec2(10.0, 10.0),
                                    egui::Sense::hover(),
                                );
                                ui.painter().circle_filled(
                                    rect.center(),
                                    5.0,
                                    egui::Color32::from_rgb(r, g, b),
                                );
                                let title = egui::RichText::new(marker.display_title());
                                let title = if selected { title.strong() } else { title };
                                ui.label(title)
                                    .on_hover_text(marker.formatted_coordinates());
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        if ui
                                            .small_button(ICON_CLOSE)
                                            .on_hover_text("Remove marker")
                                            .clicked()
                                        {
                                            remove = Some(marker.id.clone());
                                        }
                                        if ui
                                            .small_button(ICON_MY_LOCATION)
                                            .on_hover_text("Locate on map")
                                            .clicked()
                                        {
                                            locate = Some(marker.id.clone());
                                        }
                                    },
                                );
                            });
                        }
                    });
            });

        if toggle {
            self.toggle_sidebar();
        }
        if let Some(id) = locate {
            self.annotations.locate(&id);
            self.selected_marker = Some(id);
            self.copied_until = None;
        }
        if let Some(id) = remove {
            if self.annotations.remove(&id).is_ok() && self.selected_marker.as_deref() == Some(&id) {
                self.selected_marker = None;
            }
        }
        if clear_all && self.annotations.clear().is_ok() {
            self.selected_marker = None;
        }
    }

    fn draw_sidebar_expand_button(&mut self, ctx: &egui::Context) {
        let top_y = HUD_MARGIN + self.menu_bar_height;
        egui::Area::new(egui::Id::new("sidebar_expand"))
            .anchor(egui::Align2::LEFT_TOP, [HUD_MARGIN, top_y])
            .show(ctx, |ui| {
                if ui
                    .button("\u{2192}")
                    .on_hover_text("Expand sidebar")
                    .clicked()
                {
                    self.toggle_sidebar();
                }
            });
    }
}
