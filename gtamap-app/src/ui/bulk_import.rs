use eframe::egui;

use gtamap_core::MarkerError;

use crate::app::GtaMapApp;
use crate::app_state::ActiveDialog;
use crate::ui::color_picker::{color_picker, palette_hex};
use crate::ui::{dialog_message, dialog_window, error_label};

impl GtaMapApp {
    pub(crate) fn open_bulk_import(&mut self) {
        self.import_form.reset(self.preferences.default_color_index);
        self.active_dialog = ActiveDialog::BulkImport;
    }

    pub(crate) fn show_bulk_import_dialog(&mut self, ctx: &egui::Context) {
        if self.active_dialog != ActiveDialog::BulkImport {
            return;
        }

        let mut open = true;
        let mut preview = false;
        let mut import = false;
        dialog_window("Bulk Import Coordinates")
            .open(&mut open)
            .default_width(420.0)
            .show(ctx, |ui| {
                ui.label("Title *");
                ui.add(
                    egui::TextEdit::singleline(&mut self.import_form.title)
                        .hint_text("e.g. Drug Spots, Gang Territories")
                        .desired_width(f32::INFINITY),
                );

                ui.add_space(6.0);
                let text = ui.add(
                    egui::TextEdit::multiline(&mut self.import_form.text)
                        .hint_text("Paste Lua coordinates: {x, y, z, h},...")
                        .desired_rows(6)
                        .desired_width(f32::INFINITY)
                        .code_editor(),
                );
                if text.changed() {
                    self.import_form.error = None;
                    self.import_form.preview = None;
                }

                if let Some(ref error) = self.import_form.error {
                    error_label(ui, error);
                }
                if let Some(count) = self.import_form.preview {
                    ui.colored_label(
                        egui::Color32::from_rgb(100, 220, 120),
                        format!(
                            "{}  Found {count} valid coordinate{}",
                            egui_material_icons::icons::ICON_CHECK,
                            if count == 1 { "" } else { "s" }
                        ),
                    );
                }

                ui.add_space(6.0);
                ui.label("Color");
                color_picker(ui, &mut self.import_form.color_index);

                ui.add_space(8.0);
                let has_text = !self.import_form.text.trim().is_empty();
                ui.horizontal(|ui| {
                    if ui.add_enabled(has_text, egui::Button::new("Preview")).clicked() {
                        preview = true;
                    }
                    if ui.add_enabled(has_text, egui::Button::new("Import All")).clicked() {
                        import = true;
                    }
                    if ui.add_enabled(has_text, egui::Button::new("Clear")).clicked() {
                        self.import_form.reset(self.preferences.default_color_index);
                    }
                });
            });

        if preview {
            self.preview_bulk_import();
        }
        if import {
            let color = palette_hex(self.import_form.color_index);
            let result = self.annotations.import_text(
                &self.import_form.text,
                &self.import_form.title,
                Some(color),
            );
            match result {
                Ok(_) => {
                    self.import_form.reset(self.preferences.default_color_index);
                    self.active_dialog = ActiveDialog::None;
                }
                Err(e) => {
                    self.import_form.preview = None;
                    self.import_form.error = Some(dialog_message(&e, true));
                }
            }
        }
        if !open {
            self.active_dialog = ActiveDialog::None;
        }
    }

    fn preview_bulk_import(&mut self) {
        let form = &mut self.import_form;
        form.error = None;
        form.preview = None;
        if form.title.trim().is_empty() {
            form.error = Some(dialog_message(&MarkerError::MissingTitle, true));
            return;
        }
        match self.annotations.preview_import(&form.text) {
            0 => form.error = Some(dialog_message(&MarkerError::NoMatchesFound, true)),
            count => form.preview = Some(count),
        }
    }
}
