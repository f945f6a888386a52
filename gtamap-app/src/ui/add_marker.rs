use eframe::egui;

use gtamap_core::parse_paste_shorthand;

use crate::app::GtaMapApp;
use crate::app_state::ActiveDialog;
use crate::ui::color_picker::{color_picker, palette_hex};
use crate::ui::{dialog_message, dialog_window, error_label};

impl GtaMapApp {
    pub(crate) fn open_add_marker(&mut self) {
        self.add_form.reset(self.preferences.default_color_index);
        self.active_dialog = ActiveDialog::AddMarker;
    }

    pub(crate) fn show_add_marker_dialog(&mut self, ctx: &egui::Context) {
        if self.active_dialog != ActiveDialog::AddMarker {
            return;
        }

        let x_id = egui::Id::new("add_marker_x");
        // A pasted "x, y" or vector3(...) fills both fields at once.
        if ctx.memory(|m| m.has_focus(x_id)) {
            let pasted = ctx.input_mut(|i| {
                let mut found = None;
                i.events.retain(|event| match event {
                    egui::Event::Paste(text) if found.is_none() => {
                        match parse_paste_shorthand(text) {
                            Some(pair) => {
                                found = Some(pair);
                                false
                            }
                            None => true,
                        }
                    }
                    _ => true,
                });
                found
            });
            if let Some(pair) = pasted {
                self.add_form.x = pair.x;
                self.add_form.y = pair.y;
            }
        }

        let mut open = true;
        let mut submit = false;
        dialog_window("Add Marker")
            .open(&mut open)
            .default_width(320.0)
            .show(ctx, |ui| {
                egui::Grid::new("add_marker_coords")
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("X");
                        let x = ui.add(
                            egui::TextEdit::singleline(&mut self.add_form.x)
                                .id(x_id)
                                .hint_text("-1000.00")
                                .desired_width(200.0),
                        );
                        ui.end_row();
                        ui.label("Y");
                        let y = ui.add(
                            egui::TextEdit::singleline(&mut self.add_form.y)
                                .hint_text("500.00")
                                .desired_width(200.0),
                        );
                        ui.end_row();
                        ui.label("Title *");
                        let title = ui.add(
                            egui::TextEdit::singleline(&mut self.add_form.title)
                                .hint_text("e.g. Bank Heist, Drug Lab, Meeting Point")
                                .desired_width(200.0),
                        );
                        ui.end_row();
                        if x.changed() || y.changed() || title.changed() {
                            self.add_form.error = None;
                        }
                        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
                        if enter && (x.lost_focus() || y.lost_focus() || title.lost_focus()) {
                            submit = true;
                        }
                    });

                ui.add_space(6.0);
                ui.label("Color");
                color_picker(ui, &mut self.add_form.color_index);

                if let Some(ref error) = self.add_form.error {
                    ui.add_space(4.0);
                    error_label(ui, error);
                }

                ui.add_space(8.0);
                if ui.button("Add Marker").clicked() {
                    submit = true;
                }
            });

        if submit {
            let color = palette_hex(self.add_form.color_index);
            let result = self.annotations.add_from_fields(
                &self.add_form.x,
                &self.add_form.y,
                &self.add_form.title,
                Some(color),
            );
            match result {
                Ok(()) => {
                    self.add_form.reset(self.preferences.default_color_index);
                    self.active_dialog = ActiveDialog::None;
                }
                Err(e) => self.add_form.error = Some(dialog_message(&e, false)),
            }
        }
        if !open {
            self.active_dialog = ActiveDialog::None;
        }
    }
}
