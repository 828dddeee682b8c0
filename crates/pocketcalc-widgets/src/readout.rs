//! The calculator readout.
//!
//! Sizing depends only on the text length: long values shrink, and anything
//! past the visible width shows its trailing characters.

use egui::{vec2, Align2, CornerRadius, FontId, Pos2, Sense, Stroke, Ui};

use crate::{sizing, theme};

/// Length above which the readout switches to the small font.
pub const SHRINK_AFTER: usize = 8;
/// Maximum number of characters shown.
pub const MAX_VISIBLE: usize = 12;

/// Font metrics for a given readout length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadoutStyle {
    pub font_size: f32,
    /// Extra spacing between glyphs, in points.
    pub letter_spacing: f32,
}

impl ReadoutStyle {
    /// Style for text of `len` characters.
    pub fn for_len(len: usize) -> Self {
        if len > SHRINK_AFTER {
            Self {
                font_size: 32.0,
                letter_spacing: -0.64,
            }
        } else {
            Self {
                font_size: 48.0,
                letter_spacing: -1.92,
            }
        }
    }
}

/// Trailing `MAX_VISIBLE` characters of `text`.
pub fn visible_text(text: &str) -> &str {
    let len = text.chars().count();
    if len <= MAX_VISIBLE {
        return text;
    }
    match text.char_indices().nth(len - MAX_VISIBLE) {
        Some((start, _)) => &text[start..],
        None => text,
    }
}

/// The readout well.
pub struct Readout<'a> {
    text: &'a str,
}

impl<'a> Readout<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn show(self, ui: &mut Ui) {
        let size = vec2(ui.available_width(), sizing::READOUT_MIN_HEIGHT);
        let (rect, _response) = ui.allocate_exact_size(size, Sense::hover());

        if !ui.is_rect_visible(rect) {
            return;
        }

        let radius = CornerRadius::same(sizing::READOUT_RADIUS);
        ui.painter().rect_filled(rect, radius, theme::READOUT_BG);
        ui.painter().rect_stroke(
            rect,
            radius,
            Stroke::new(1.0, theme::READOUT_BORDER),
            egui::StrokeKind::Inside,
        );

        let style = ReadoutStyle::for_len(self.text.chars().count());
        let shown = visible_text(self.text);

        let mut job = egui::text::LayoutJob::default();
        job.append(
            shown,
            0.0,
            egui::TextFormat {
                font_id: FontId::proportional(style.font_size),
                color: theme::TEXT,
                extra_letter_spacing: style.letter_spacing,
                ..Default::default()
            },
        );
        let galley = ui.painter().layout_job(job);

        let anchor = Pos2::new(rect.right() - 24.0, rect.bottom() - 20.0);
        let pos = Align2::RIGHT_BOTTOM
            .anchor_size(anchor, galley.size())
            .min;
        ui.painter().galley(pos, galley, theme::TEXT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_shrinks_after_eight() {
        assert_eq!(ReadoutStyle::for_len(8).font_size, 48.0);
        assert_eq!(ReadoutStyle::for_len(9).font_size, 32.0);
    }

    #[test]
    fn test_short_text_shown_whole() {
        assert_eq!(visible_text("123"), "123");
        assert_eq!(visible_text("123456789012"), "123456789012");
    }

    #[test]
    fn test_long_text_keeps_tail() {
        assert_eq!(visible_text("1234567890123"), "234567890123");
        assert_eq!(visible_text("0.30000000000000004"), "000000000004");
    }
}
