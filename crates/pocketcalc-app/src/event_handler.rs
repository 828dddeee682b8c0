//! Event handling: applies UI actions and window pointer events to the
//! mounted calculator.

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Size};
use pocketcalc_core::{CalculatorWidget, MouseButton, PanelConfig, PointerEvent};

use crate::surface::HostSurface;
use crate::ui::UiAction;

/// Owns the calculator slot and translates high-level events into widget calls.
///
/// The host keeps at most one calculator. Closing drops it; the launcher
/// mounts a fresh one.
pub struct EventHandler {
    calculator: Option<CalculatorWidget>,
    config: PanelConfig,
    surface: Rc<HostSurface>,
    /// Set by the widget's close callback, consumed after each dispatch.
    close_requested: Rc<Cell<bool>>,
    /// Last known cursor position in window points.
    cursor: Point,
}

impl EventHandler {
    pub fn new(config: PanelConfig, surface: Rc<HostSurface>) -> Self {
        Self {
            calculator: None,
            config,
            surface,
            close_requested: Rc::new(Cell::new(false)),
            cursor: Point::ZERO,
        }
    }

    pub fn calculator(&self) -> Option<&CalculatorWidget> {
        self.calculator.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.calculator.is_some()
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Mount a fresh calculator unless one is already shown.
    pub fn open(&mut self, viewport: Size) {
        if self.calculator.is_some() {
            return;
        }
        let flag = self.close_requested.clone();
        let widget = CalculatorWidget::mount(viewport, self.config.clone(), move || flag.set(true))
            .with_surface(self.surface.clone());
        self.calculator = Some(widget);
    }

    /// Apply an action produced by the UI. Returns true if a redraw is needed.
    pub fn handle_action(&mut self, action: UiAction, viewport: Size) -> bool {
        match action {
            UiAction::Open => self.open(viewport),
            UiAction::Press(key) => {
                if let Some(widget) = self.calculator.as_mut() {
                    widget.press(key);
                }
            }
            UiAction::Grab(pointer) => {
                self.cursor = pointer;
                if let Some(widget) = self.calculator.as_mut() {
                    widget.grab(pointer);
                }
            }
            UiAction::Close => {
                if let Some(widget) = self.calculator.as_mut() {
                    widget.close();
                }
            }
        }
        self.unmount_if_closed();
        true
    }

    /// Apply a window-level pointer event. Returns true if the panel moved or
    /// a drag ended.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> bool {
        if let Some(position) = event.position() {
            self.cursor = position;
        }
        let Some(widget) = self.calculator.as_mut() else {
            return false;
        };
        let was_dragging = widget.drag().is_dragging();
        let moved = widget.handle_pointer_event(&event).is_some();
        moved || was_dragging != widget.drag().is_dragging()
    }

    /// Cursor moved to `position` (window points).
    pub fn cursor_moved(&mut self, position: Point) -> bool {
        self.handle_pointer_event(PointerEvent::Move { position })
    }

    /// Button press or release at the last known cursor position.
    pub fn mouse_input(&mut self, button: MouseButton, pressed: bool) -> bool {
        let position = self.cursor;
        let event = if pressed {
            PointerEvent::Down { position, button }
        } else {
            PointerEvent::Up { position, button }
        };
        self.handle_pointer_event(event)
    }

    /// The window lost focus or the pointer left for good.
    pub fn cancel(&mut self) -> bool {
        self.handle_pointer_event(PointerEvent::Cancel)
    }

    pub fn set_chrome_hovered(&mut self, hovered: bool) {
        if let Some(widget) = self.calculator.as_mut() {
            widget.set_chrome_hovered(hovered);
        }
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        if let Some(widget) = self.calculator.as_mut() {
            widget.set_viewport(viewport);
        }
    }

    fn unmount_if_closed(&mut self) {
        if self.close_requested.replace(false) {
            // Dropping the widget releases any drag lease it still holds.
            self.calculator = None;
            log::info!("Calculator unmounted");
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(PanelConfig::default(), Rc::new(HostSurface::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pocketcalc_core::{CalcKey, Digit, Operator};

    fn viewport() -> Size {
        Size::new(1280.0, 800.0)
    }

    fn mounted() -> EventHandler {
        let mut handler = EventHandler::default();
        handler.open(viewport());
        handler
    }

    fn press(handler: &mut EventHandler, key: CalcKey) {
        handler.handle_action(UiAction::Press(key), viewport());
    }

    #[test]
    fn test_starts_unmounted() {
        let handler = EventHandler::default();
        assert!(!handler.is_mounted());
    }

    #[test]
    fn test_open_mounts_once() {
        let mut handler = EventHandler::default();
        handler.handle_action(UiAction::Open, viewport());
        press(&mut handler, CalcKey::Digit(Digit::ALL[5]));

        // A second open keeps the existing instance.
        handler.handle_action(UiAction::Open, viewport());
        assert_eq!(handler.calculator().map(|w| w.accumulator().text()), Some("5"));
    }

    #[test]
    fn test_keypad_actions() {
        let mut handler = mounted();
        press(&mut handler, CalcKey::Digit(Digit::ALL[6]));
        press(&mut handler, CalcKey::Operator(Operator::Multiply));
        press(&mut handler, CalcKey::Digit(Digit::ALL[7]));
        press(&mut handler, CalcKey::Equals);
        assert_eq!(handler.calculator().map(|w| w.accumulator().text()), Some("42"));
    }

    #[test]
    fn test_close_unmounts_and_reopen_is_fresh() {
        let mut handler = mounted();
        press(&mut handler, CalcKey::Digit(Digit::ALL[9]));

        handler.handle_action(UiAction::Close, viewport());
        assert!(!handler.is_mounted());

        handler.handle_action(UiAction::Open, viewport());
        assert_eq!(handler.calculator().map(|w| w.accumulator().text()), Some("0"));
    }

    #[test]
    fn test_drag_through_window_events() {
        let mut handler = mounted();
        handler.handle_action(UiAction::Grab(Point::new(500.0, 150.0)), viewport());
        assert!(handler.surface.is_captured());

        assert!(handler.cursor_moved(Point::new(600.0, 250.0)));
        assert!(handler.mouse_input(MouseButton::Left, false));

        assert!(!handler.surface.is_captured());
        assert_eq!(
            handler.calculator().map(|w| w.position()),
            Some(Point::new(580.0, 240.0))
        );

        // Moves after release do nothing.
        assert!(!handler.cursor_moved(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_focus_loss_ends_drag() {
        let mut handler = mounted();
        handler.handle_action(UiAction::Grab(Point::new(500.0, 150.0)), viewport());
        assert!(handler.cancel());
        assert!(!handler.surface.is_captured());
        assert!(!handler.cancel());
    }

    #[test]
    fn test_close_mid_drag_releases_surface() {
        let mut handler = mounted();
        handler.handle_action(UiAction::Grab(Point::new(500.0, 150.0)), viewport());
        handler.handle_action(UiAction::Close, viewport());
        assert!(!handler.surface.is_captured());
        assert_eq!(handler.surface.acquisitions(), 1);
    }

    #[test]
    fn test_pointer_events_without_calculator() {
        let mut handler = EventHandler::default();
        assert!(!handler.cursor_moved(Point::new(10.0, 10.0)));
        assert_eq!(handler.cursor(), Point::new(10.0, 10.0));
    }
}
