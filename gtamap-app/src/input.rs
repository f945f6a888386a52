use eframe::egui;

use gtamap_core::viewport_to_world;

use crate::app::{GtaMapApp, KEY_ZOOM_STEP, PAN_PIXELS, ZOOM_SPEED};
use crate::app_state::ActiveDialog;

impl GtaMapApp {
    /// Pointer handling for the map canvas. `pin` is the marker under the
    /// pointer, if any.
    pub(crate) fn handle_canvas_input(
        &mut self,
        ctx: &egui::Context,
        response: &egui::Response,
        pin: Option<String>,
    ) {
        let origin = response.rect.min;
        self.cursor_world = response.hover_pos().map(|pos| {
            let point = self
                .view
                .screen_to_viewport((pos.x - origin.x) as f64, (pos.y - origin.y) as f64);
            viewport_to_world(point.lat, point.lng)
        });

        if self.active_dialog.is_open() {
            return;
        }

        let scroll_y = ctx.input(|i| i.raw_scroll_delta.y);
        if scroll_y.abs() > 0.0 && response.hovered() {
            if let Some(pos) = response.hover_pos() {
                self.zoom_at_cursor(
                    (pos.x - origin.x) as f64,
                    (pos.y - origin.y) as f64,
                    scroll_y as f64 * ZOOM_SPEED,
                );
            }
        }

        if response.drag_started_by(egui::PointerButton::Primary) {
            self.drag_active = true;
        }
        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            self.view.pan_by_pixels(delta.x as f64, delta.y as f64);
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            self.drag_active = false;
        }

        if response.double_clicked() && pin.is_none() {
            if let Some(world) = self.cursor_world {
                self.selected_marker = None;
                self.prompt_form = Default::default();
                self.active_dialog = ActiveDialog::TitlePrompt {
                    x: world.x,
                    y: world.y,
                };
            }
        } else if response.clicked() {
            if pin.is_none() || pin != self.selected_marker {
                self.copied_until = None;
            }
            self.selected_marker = pin;
        }
    }

    pub(crate) fn handle_keyboard(&mut self, ctx: &egui::Context) {
        let text_editing = ctx.memory(|m| m.focused().is_some());

        ctx.input(|input| {
            if input.key_pressed(egui::Key::Escape) {
                if self.active_dialog.is_open() {
                    self.active_dialog = ActiveDialog::None;
                } else if self.selected_marker.is_some() {
                    self.selected_marker = None;
                } else if self.show_settings {
                    self.show_settings = false;
                } else if self.show_help {
                    self.show_help = false;
                } else if self.show_about {
                    self.show_about = false;
                }
            }

            if text_editing || self.active_dialog.is_open() {
                return;
            }

            if input.key_pressed(egui::Key::ArrowLeft) {
                self.pan_camera(-PAN_PIXELS, 0.0);
            }
            if input.key_pressed(egui::Key::ArrowRight) {
                self.pan_camera(PAN_PIXELS, 0.0);
            }
            if input.key_pressed(egui::Key::ArrowUp) {
                self.pan_camera(0.0, -PAN_PIXELS);
            }
            if input.key_pressed(egui::Key::ArrowDown) {
                self.pan_camera(0.0, PAN_PIXELS);
            }

            if input.key_pressed(egui::Key::Plus) || input.key_pressed(egui::Key::Equals) {
                self.zoom_center(KEY_ZOOM_STEP);
            }
            if input.key_pressed(egui::Key::Minus) {
                self.zoom_center(-KEY_ZOOM_STEP);
            }

            if input.key_pressed(egui::Key::R) && !input.modifiers.ctrl {
                self.reset_view();
            }
            if input.key_pressed(egui::Key::H) {
                self.show_hud = !self.show_hud;
                self.save_preferences();
            }
            if input.key_pressed(egui::Key::S) && !input.modifiers.ctrl {
                self.toggle_sidebar();
            }
            if input.key_pressed(egui::Key::A) {
                self.open_add_marker();
            }
            if input.key_pressed(egui::Key::I) {
                self.open_bulk_import();
            }
            if input.key_pressed(egui::Key::F1) {
                self.show_help = !self.show_help;
            }
        });
    }
}
