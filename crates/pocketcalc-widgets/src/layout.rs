//! Layout helpers: header title, keypad spacing.

use egui::{Ui, Vec2};

use crate::{sizing, theme};

/// Draw the panel title.
pub fn header_title(ui: &mut Ui, text: &str) {
    ui.label(
        egui::RichText::new(text)
            .size(16.0)
            .strong()
            .color(theme::TITLE),
    );
}

/// Apply keypad gaps to the current ui.
pub fn keypad_spacing(ui: &mut Ui) {
    ui.spacing_mut().item_spacing = Vec2::splat(sizing::KEY_GAP);
}
