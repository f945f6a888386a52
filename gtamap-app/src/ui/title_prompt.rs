use eframe::egui;

use gtamap_core::format_coordinates;

use crate::app::GtaMapApp;
use crate::app_state::ActiveDialog;
use crate::ui::{dialog_message, dialog_window, error_label};

impl GtaMapApp {
    /// Name a marker dropped by double-clicking the map. Cancelling or
    /// submitting a blank title creates nothing.
    pub(crate) fn show_title_prompt(&mut self, ctx: &egui::Context) {
        let ActiveDialog::TitlePrompt { x, y } = self.active_dialog else {
            return;
        };

        let mut open = true;
        let mut submit = false;
        let mut cancel = false;
        dialog_window("Enter marker title")
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(format_coordinates(x, y))
                        .monospace()
                        .color(egui::Color32::from_rgb(160, 160, 160)),
                );
                ui.add_space(4.0);
                let title = ui.add(
                    egui::TextEdit::singleline(&mut self.prompt_form.title)
                        .hint_text("Marker title")
                        .desired_width(260.0),
                );
                if !title.has_focus() && self.prompt_form.title.is_empty() {
                    title.request_focus();
                }
                if title.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                if let Some(ref error) = self.prompt_form.error {
                    error_label(ui, error);
                }
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        submit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if submit {
            match self.annotations.add_at(x, y, &self.prompt_form.title) {
                Ok(_) => cancel = true,
                Err(e) => self.prompt_form.error = Some(dialog_message(&e, false)),
            }
        }
        if cancel || !open {
            self.prompt_form = Default::default();
            self.active_dialog = ActiveDialog::None;
        }
    }
}
