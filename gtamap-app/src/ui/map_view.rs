use eframe::egui;

use gtamap_core::{format_clipboard, world_to_viewport};
use gtamap_tiles::{visible_tiles, TileKey, TilePlacement, MAX_NATIVE_ZOOM};

use crate::app::{GtaMapApp, COPIED_FEEDBACK_SECS};

/// Radius of a pin's round head.
const PIN_RADIUS: f32 = 9.0;
/// Distance from the pin's tip (the marker position) to its head centre.
const PIN_HEIGHT: f32 = 22.0;

/// A marker as drawn this frame.
pub(crate) struct Pin {
    pub(crate) id: String,
    /// Screen position of the marker; the pin's point.
    pub(crate) tip: egui::Pos2,
    pub(crate) color: egui::Color32,
}

impl Pin {
    fn head(&self) -> egui::Pos2 {
        self.tip - egui::vec2(0.0, PIN_HEIGHT)
    }

    fn hit_rect(&self) -> egui::Rect {
        egui::Rect::from_min_max(
            self.head() - egui::vec2(PIN_RADIUS, PIN_RADIUS),
            self.tip + egui::vec2(PIN_RADIUS, 0.0),
        )
    }
}

/// The topmost pin under `pos`. Pins drawn later sit on top.
pub(crate) fn pin_at(pins: &[Pin], pos: egui::Pos2) -> Option<&Pin> {
    pins.iter().rev().find(|pin| {
        pin.head().distance(pos) <= PIN_RADIUS + 1.0 || pin.hit_rect().contains(pos)
    })
}

/// UV sub-rectangle of `ancestor` that covers `key`. `None` when `ancestor`
/// is not an ancestor of `key`.
pub(crate) fn ancestor_uv(key: TileKey, ancestor: TileKey) -> Option<egui::Rect> {
    if ancestor.z > key.z {
        return None;
    }
    let shift = key.z - ancestor.z;
    if key.x >> shift != ancestor.x || key.y >> shift != ancestor.y {
        return None;
    }
    let span = 1u32 << shift;
    let size = 1.0 / span as f32;
    let min = egui::pos2(
        (key.x - ancestor.x * span) as f32 * size,
        (key.y - ancestor.y * span) as f32 * size,
    );
    Some(egui::Rect::from_min_size(min, egui::vec2(size, size)))
}

fn full_uv() -> egui::Rect {
    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0))
}

impl GtaMapApp {
    pub(crate) fn draw_map(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let available = ui.available_size();
        self.check_resize(available.x.max(1.0) as u32, available.y.max(1.0) as u32);
        self.apply_focus();

        let (response, painter) = ui.allocate_painter(available, egui::Sense::click_and_drag());
        let origin = response.rect.min;

        // -- Tiles --
        let placements = visible_tiles(&self.view, MAX_NATIVE_ZOOM);
        for placement in &placements {
            self.draw_tile(&painter, origin, placement);
        }
        self.request_tiles(&placements);

        if !self.tiles.source_available {
            painter.text(
                response.rect.center(),
                egui::Align2::CENTER_CENTER,
                format!(
                    "Tile atlas not found at {}\nChoose a folder in View \u{203a} Settings",
                    self.tiles_dir_buf
                ),
                egui::FontId::proportional(14.0),
                egui::Color32::from_rgb(170, 170, 170),
            );
        }

        // -- Pins --
        let pins = self.visible_pins(response.rect);
        for pin in &pins {
            draw_pin(&painter, pin, self.selected_marker.as_deref() == Some(pin.id.as_str()));
        }
        let hovered = response
            .hover_pos()
            .and_then(|pos| pin_at(&pins, pos))
            .map(|pin| pin.id.clone());
        if hovered.is_some() && !self.drag_active {
            ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        self.handle_canvas_input(ctx, &response, hovered);
        self.draw_marker_popup(ctx, origin);
    }

    /// Draw one tile, or a coarser cached ancestor stretched over it while
    /// the tile itself loads.
    fn draw_tile(&mut self, painter: &egui::Painter, origin: egui::Pos2, placement: &TilePlacement) {
        let rect = egui::Rect::from_min_size(
            origin + egui::vec2(placement.x as f32, placement.y as f32),
            egui::Vec2::splat(placement.size as f32),
        );
        if let Some(texture) = self.tiles.textures.get(&placement.key) {
            painter.image(texture.id(), rect, full_uv(), egui::Color32::WHITE);
            return;
        }
        let key = placement.key;
        for z in (0..key.z).rev() {
            let shift = key.z - z;
            let ancestor = TileKey::new(z, key.x >> shift, key.y >> shift);
            if let (Some(texture), Some(uv)) =
                (self.tiles.textures.peek(&ancestor), ancestor_uv(key, ancestor))
            {
                painter.image(texture.id(), rect, uv, egui::Color32::WHITE);
                return;
            }
        }
    }

    fn visible_pins(&self, map_rect: egui::Rect) -> Vec<Pin> {
        let cull = map_rect.expand(PIN_HEIGHT + PIN_RADIUS);
        self.annotations
            .markers()
            .iter()
            .filter_map(|marker| {
                let (sx, sy) = self.view.viewport_to_screen(world_to_viewport(marker.x, marker.y));
                let tip = map_rect.min + egui::vec2(sx as f32, sy as f32);
                if !cull.contains(tip) {
                    return None;
                }
                let [r, g, b] = marker.rgb();
                Some(Pin {
                    id: marker.id.clone(),
                    tip,
                    color: egui::Color32::from_rgb(r, g, b),
                })
            })
            .collect()
    }

    /// Title, coordinates, Copy and Remove for the selected marker.
    fn draw_marker_popup(&mut self, ctx: &egui::Context, origin: egui::Pos2) {
        let Some(id) = self.selected_marker.clone() else {
            return;
        };
        let Some(marker) = self.annotations.find(&id).cloned() else {
            self.selected_marker = None;
            return;
        };

        let now = ctx.input(|i| i.time);
        if self.copied_until.is_some_and(|until| now >= until) {
            self.copied_until = None;
        }

        let (sx, sy) = self.view.viewport_to_screen(world_to_viewport(marker.x, marker.y));
        let anchor = origin + egui::vec2(sx as f32, sy as f32 - PIN_HEIGHT - PIN_RADIUS - 6.0);

        let mut copy = false;
        let mut remove = false;
        let mut close = false;
        egui::Area::new(egui::Id::new("marker_popup"))
            .fixed_pos(anchor)
            .pivot(egui::Align2::CENTER_BOTTOM)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(&ctx.style()).show(ui, |ui| {
                    ui.set_min_width(160.0);
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(marker.display_title()).strong());
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui
                                .small_button(egui_material_icons::icons::ICON_CLOSE)
                                .clicked()
                            {
                                close = true;
                            }
                        });
                    });
                    ui.label(egui::RichText::new(marker.formatted_coordinates()).monospace());
                    ui.add_space(4.0);
                    ui.horizontal(|ui| {
                        let copied = self.copied_until.is_some();
                        let label = if copied { "Copied!" } else { "Copy" };
                        if ui
                            .add_enabled(!copied, egui::Button::new(label))
                            .on_hover_text("Copy coordinates")
                            .clicked()
                        {
                            copy = true;
                        }
                        if ui.button("Remove").on_hover_text("Remove marker").clicked() {
                            remove = true;
                        }
                    });
                });
            });

        if copy {
            ctx.copy_text(format_clipboard(marker.x, marker.y));
            self.copied_until = Some(now + COPIED_FEEDBACK_SECS);
        }
        if remove && self.annotations.remove(&marker.id).is_ok() {
            close = true;
        }
        if close {
            self.selected_marker = None;
            self.copied_until = None;
        }
    }
}

fn draw_pin(painter: &egui::Painter, pin: &Pin, selected: bool) {
    let head = pin.head();
    let outline = egui::Stroke::new(2.0, egui::Color32::WHITE);

    // Drop shadow.
    painter.circle_filled(
        head + egui::vec2(0.0, 2.0),
        PIN_RADIUS + 2.0,
        egui::Color32::from_black_alpha(70),
    );

    // Tapered body from the head's sides down to the tip.
    let half = PIN_RADIUS * 0.75;
    painter.add(egui::Shape::convex_polygon(
        vec![
            head + egui::vec2(-half, half * 0.6),
            head + egui::vec2(half, half * 0.6),
            pin.tip,
        ],
        pin.color,
        outline,
    ));
    painter.circle(head, PIN_RADIUS, pin.color, outline);
    painter.circle_filled(head, PIN_RADIUS * 0.4, egui::Color32::WHITE);

    if selected {
        painter.circle_stroke(
            head,
            PIN_RADIUS + 4.0,
            egui::Stroke::new(2.0, egui::Color32::from_rgb(255, 210, 80)),
        );
    }
}
