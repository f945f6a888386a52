use eframe::egui;

use gtamap_core::PALETTE;

const SWATCH: f32 = 22.0;

/// Row of palette swatches. Returns `true` when the selection changed.
pub(crate) fn color_picker(ui: &mut egui::Ui, selected: &mut usize) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 6.0;
        for (index, color) in PALETTE.iter().enumerate() {
            let [r, g, b] = color.rgb();
            let (rect, response) =
                ui.allocate_exact_size(egui::vec2(SWATCH, SWATCH), egui::Sense::click());
            let painter = ui.painter();
            painter.rect_filled(rect, 4.0, egui::Color32::from_rgb(r, g, b));
            if index == *selected {
                painter.rect_stroke(
                    rect.expand(2.0),
                    5.0,
                    egui::Stroke::new(2.0, egui::Color32::WHITE),
                    egui::StrokeKind::Outside,
                );
            } else if response.hovered() {
                painter.rect_stroke(
                    rect,
                    4.0,
                    egui::Stroke::new(1.0, egui::Color32::from_gray(200)),
                    egui::StrokeKind::Inside,
                );
            }
            if response.on_hover_text(color.label).clicked() && index != *selected {
                *selected = index;
                changed = true;
            }
        }
    });
    changed
}

/// Hex string of the palette entry, falling back to the first colour.
pub(crate) fn palette_hex(index: usize) -> &'static str {
    PALETTE.get(index).unwrap_or(&PALETTE[0]).hex
}
