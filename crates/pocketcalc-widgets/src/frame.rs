//! Panel frame.

use egui::{Color32, CornerRadius, Frame, Margin, Stroke};

use crate::{sizing, theme};

/// The dark calculator panel with a deep drop shadow.
pub fn panel_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .corner_radius(CornerRadius::same(sizing::PANEL_RADIUS))
        .stroke(Stroke::new(1.0, theme::PANEL_BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 40,
            offset: [0, 20],
            color: Color32::from_black_alpha(102),
        })
        .inner_margin(Margin::same(sizing::PANEL_PADDING))
}
