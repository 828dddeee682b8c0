//! Button components: keypad keys, close control, launcher.

use std::time::Duration;

use egui::{
    vec2, Align2, Color32, CornerRadius, CursorIcon, FontId, Rect, Sense, Stroke, StrokeKind, Ui,
};

use crate::{sizing, theme};

/// Duration of the press-shrink feedback after a click, seconds.
const PRESS_ANIMATION: f64 = 0.15;
/// Key scale while the press feedback runs.
const PRESS_SCALE: f32 = 0.95;

/// Visual role of a keypad key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcButtonKind {
    /// Digit and decimal keys.
    Number,
    /// The double-width zero key.
    Zero,
    /// C, ±, %.
    Function,
    /// + − × ÷. Inverted while it is the pending operator.
    Operator,
    /// The equals key.
    Equals,
}

impl CalcButtonKind {
    fn colors(self, active: bool) -> (Color32, Color32) {
        match self {
            Self::Number | Self::Zero => (theme::NUMBER_BG, theme::TEXT),
            Self::Function => (theme::FUNCTION_BG, theme::FUNCTION_TEXT),
            Self::Operator if active => (theme::ACTIVE_BG, theme::ACCENT_TEXT),
            Self::Operator | Self::Equals => (theme::ACCENT, theme::TEXT),
        }
    }

    fn corner_radius(self) -> u8 {
        match self {
            Self::Zero => sizing::PILL_RADIUS,
            _ => sizing::KEY_RADIUS,
        }
    }
}

/// A keypad key.
pub struct CalcButton<'a> {
    label: &'a str,
    kind: CalcButtonKind,
    active: bool,
    width: f32,
}

impl<'a> CalcButton<'a> {
    /// Create a key with the given label and role.
    pub fn new(label: &'a str, kind: CalcButtonKind) -> Self {
        Self {
            label,
            kind,
            active: false,
            width: sizing::KEY_HEIGHT,
        }
    }

    /// Mark an operator key as the pending operator.
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Set the key width (the zero key spans two columns).
    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Show the key and return true if clicked.
    ///
    /// A click shrinks the key for `PRESS_ANIMATION` seconds afterwards.
    pub fn show(self, ui: &mut Ui) -> bool {
        let size = vec2(self.width, sizing::KEY_HEIGHT);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());
        let clicked = response.clicked();

        let now = ui.input(|i| i.time);
        if clicked {
            ui.ctx().data_mut(|d| d.insert_temp(response.id, now));
        }
        let pressed_at = ui.ctx().data(|d| d.get_temp::<f64>(response.id));
        let elapsed = pressed_at.map(|t| now - t);
        if let Some(remaining) = elapsed.and_then(press_remaining) {
            ui.ctx().request_repaint_after(Duration::from_secs_f64(remaining));
        }

        if ui.is_rect_visible(rect) {
            let hover_grow = if response.hovered() && !(self.active && self.kind == CalcButtonKind::Operator) {
                0.02
            } else {
                0.0
            };
            let scale = press_scale(elapsed) + hover_grow;
            let key_rect = Rect::from_center_size(rect.center(), rect.size() * scale);

            let (bg_color, text_color) = self.kind.colors(self.active);
            let radius = CornerRadius::same(self.kind.corner_radius());
            ui.painter().rect_filled(key_rect, radius, bg_color);
            // Top highlight
            ui.painter().rect_stroke(
                key_rect,
                radius,
                Stroke::new(1.0, Color32::from_white_alpha(12)),
                StrokeKind::Inside,
            );

            let font_size = if self.label.chars().count() > 1 { 18.0 } else { 20.0 };
            let text_pos = match self.kind {
                CalcButtonKind::Zero => {
                    egui::pos2(key_rect.left() + sizing::KEY_HEIGHT / 2.0, key_rect.center().y)
                }
                _ => key_rect.center(),
            };
            ui.painter().text(
                text_pos,
                Align2::CENTER_CENTER,
                self.label,
                FontId::proportional(font_size),
                text_color,
            );
        }

        response.on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

/// Seconds of press feedback left, `elapsed` seconds after a click.
fn press_remaining(elapsed: f64) -> Option<f64> {
    let remaining = PRESS_ANIMATION - elapsed;
    (elapsed >= 0.0 && remaining > 0.0).then_some(remaining)
}

/// Key scale for the press feedback. `elapsed` is the time since the last
/// click, if any.
fn press_scale(elapsed: Option<f64>) -> f32 {
    match elapsed.and_then(press_remaining) {
        Some(_) => PRESS_SCALE,
        None => 1.0,
    }
}

/// The round red close control. Returns true if clicked.
pub fn close_button(ui: &mut Ui) -> bool {
    let size = vec2(sizing::CLOSE_SIZE, sizing::CLOSE_SIZE);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let radius = if response.hovered() {
            sizing::CLOSE_SIZE * 0.55
        } else {
            sizing::CLOSE_SIZE * 0.5
        };
        ui.painter().circle_filled(rect.center(), radius, theme::CLOSE);
        ui.painter().text(
            rect.center(),
            Align2::CENTER_CENTER,
            "×",
            FontId::proportional(10.0),
            Color32::from_white_alpha(230),
        );
    }

    let clicked = response.clicked();
    response
        .on_hover_text("Close")
        .on_hover_cursor(CursorIcon::PointingHand);
    clicked
}

/// Pill button the host shows while no calculator is mounted.
pub fn launcher_button(ui: &mut Ui, label: &str) -> bool {
    let font_id = FontId::proportional(14.0);
    let galley = ui
        .painter()
        .layout_no_wrap(label.to_string(), font_id.clone(), Color32::PLACEHOLDER);
    let size = vec2(galley.size().x + 32.0, 36.0);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let bg_color = if response.hovered() {
            theme::ACCENT_TEXT
        } else {
            theme::ACCENT
        };
        ui.painter()
            .rect_filled(rect, CornerRadius::same(18), bg_color);
        ui.painter().text(
            rect.center(),
            Align2::CENTER_CENTER,
            label,
            font_id,
            theme::TEXT,
        );
    }

    let clicked = response.clicked();
    response.on_hover_cursor(CursorIcon::PointingHand);
    clicked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_scale_after_click() {
        assert_eq!(press_scale(None), 1.0);
        assert_eq!(press_scale(Some(0.0)), PRESS_SCALE);
        assert_eq!(press_scale(Some(0.1)), PRESS_SCALE);
        assert_eq!(press_scale(Some(0.15)), 1.0);
        assert_eq!(press_scale(Some(2.0)), 1.0);
    }

    #[test]
    fn test_press_remaining_schedules_repaint() {
        let remaining = press_remaining(0.05).unwrap();
        assert!((remaining - 0.1).abs() < 1e-9);
        assert_eq!(press_remaining(0.2), None);
        assert_eq!(press_remaining(-1.0), None);
    }

    #[test]
    fn test_click_starts_feedback() {
        let ctx = egui::Context::default();
        let id = egui::Id::new("key");
        ctx.data_mut(|d| d.insert_temp(id, 10.0_f64));
        let pressed_at = ctx.data(|d| d.get_temp::<f64>(id));
        assert_eq!(press_scale(pressed_at.map(|t| 10.05 - t)), PRESS_SCALE);
        assert_eq!(press_scale(pressed_at.map(|t| 10.5 - t)), 1.0);
    }
}
