//! Calculator widget: accumulator + drag controller + close callback.

use std::fmt;
use std::rc::Rc;

use kurbo::{Point, Size};

use super::state::PanelState;
use crate::accumulator::{Accumulator, CalcKey};
use crate::config::PanelConfig;
use crate::drag::{DragController, DragSurface};
use crate::input::PointerEvent;

/// One mounted calculator.
///
/// The widget never unmounts itself: `close` only notifies the host, which
/// decides whether to hide or drop the widget.
pub struct CalculatorWidget {
    accumulator: Accumulator,
    drag: DragController,
    config: PanelConfig,
    chrome_hovered: bool,
    on_close: Box<dyn FnMut()>,
}

impl CalculatorWidget {
    /// Mount a calculator centered in `viewport`.
    pub fn mount(viewport: Size, config: PanelConfig, on_close: impl FnMut() + 'static) -> Self {
        let position = config.initial_position(viewport);
        log::info!(
            "Calculator mounted at ({:.0}, {:.0}) in {:.0}x{:.0}",
            position.x,
            position.y,
            viewport.width,
            viewport.height
        );

        Self {
            accumulator: Accumulator::new(),
            drag: DragController::new(position, viewport, config.drag_bounds),
            config,
            chrome_hovered: false,
            on_close: Box::new(on_close),
        }
    }

    /// Use `surface` for pointer capture and selection suppression during drags.
    pub fn with_surface(mut self, surface: Rc<dyn DragSurface>) -> Self {
        self.drag = self.drag.with_surface(surface);
        self
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Current panel top-left in viewport pixels.
    pub fn position(&self) -> Point {
        self.drag.position()
    }

    /// Handle a keypad press.
    pub fn press(&mut self, key: CalcKey) {
        self.accumulator.press(key);
        log::debug!("{:?} -> {:?}", key, self.accumulator.text());
    }

    /// Pointer-down on the panel chrome (already hit-tested by the caller).
    pub fn grab(&mut self, pointer: Point) {
        let position = self.drag.position();
        self.drag.begin_drag(pointer, position);
    }

    /// Window-level pointer event; returns the new position if the panel moved.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) -> Option<Point> {
        self.drag.handle_pointer_event(event)
    }

    /// Abort any live drag.
    pub fn release(&mut self) {
        self.drag.end_drag();
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.drag.set_viewport(viewport);
    }

    pub fn set_chrome_hovered(&mut self, hovered: bool) {
        self.chrome_hovered = hovered;
    }

    pub fn panel_state(&self) -> PanelState {
        if self.drag.is_dragging() {
            PanelState::Dragging
        } else if self.chrome_hovered {
            PanelState::Hovered
        } else {
            PanelState::Normal
        }
    }

    /// The close control was activated. Notifies the host.
    pub fn close(&mut self) {
        self.drag.end_drag();
        log::info!("Calculator close requested");
        (self.on_close)();
    }
}

impl fmt::Debug for CalculatorWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalculatorWidget")
            .field("display", self.accumulator.state())
            .field("position", &self.drag.position())
            .field("dragging", &self.drag.is_dragging())
            .finish()
    }
}
