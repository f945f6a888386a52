mod add_marker;
mod bulk_import;
mod color_picker;
mod help;
mod hud;
mod map_view;
mod menu_bar;
mod settings;
mod sidebar;
mod title_prompt;

use eframe::egui;

use gtamap_core::MarkerError;

/// Inline message for a dialog that rejected the user's input.
pub(crate) fn dialog_message(err: &MarkerError, plural: bool) -> String {
    match err {
        MarkerError::InvalidCoordinate { .. } => "Please enter valid coordinates".to_string(),
        MarkerError::MissingTitle if plural => "Please enter a title for the markers".to_string(),
        MarkerError::MissingTitle => "Please enter a title for the marker".to_string(),
        MarkerError::NoMatchesFound => {
            "No valid coordinates found. Make sure they are in format: {x, y, z, heading}"
                .to_string()
        }
        other => other.to_string(),
    }
}

/// Centered, fixed-size dialog window.
pub(crate) fn dialog_window<'open>(title: &str) -> egui::Window<'open> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
}

pub(crate) fn error_label(ui: &mut egui::Ui, text: &str) {
    ui.colored_label(
        egui::Color32::from_rgb(255, 110, 100),
        format!("{}  {text}", egui_material_icons::icons::ICON_WARNING),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_messages() {
        let invalid = MarkerError::InvalidCoordinate {
            axis: "x",
            input: "abc".into(),
        };
        assert_eq!(dialog_message(&invalid, false), "Please enter valid coordinates");
        assert_eq!(
            dialog_message(&MarkerError::MissingTitle, true),
            "Please enter a title for the markers"
        );
        let write = MarkerError::PersistenceWrite {
            key: "gta-markers".into(),
            reason: "disk full".into(),
        };
        assert_eq!(dialog_message(&write, false), write.to_string());
    }
}
