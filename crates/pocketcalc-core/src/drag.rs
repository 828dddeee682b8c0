//! Drag controller for repositioning the calculator panel.
//!
//! A drag session starts when the pointer goes down on the panel chrome and
//! ends on pointer release, wherever the release happens. While a session is
//! live the host surface is leased: pointer capture is held and text
//! selection is suppressed. The lease is released when the session is
//! dropped, so ending the drag, cancelling it, or dropping the controller
//! mid-gesture all restore the surface exactly once.

use std::rc::Rc;

use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

use crate::input::PointerEvent;

/// Host-side affordances held for the duration of a drag.
pub trait DragSurface {
    /// Capture the pointer and suppress text selection.
    fn acquire(&self);
    /// Undo everything `acquire` did.
    fn release(&self);
}

/// Surface that does nothing, for hosts without global affordances.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSurface;

impl DragSurface for NoopSurface {
    fn acquire(&self) {}
    fn release(&self) {}
}

/// Scoped hold on a [`DragSurface`]. Releases on drop.
pub struct SurfaceLease {
    surface: Rc<dyn DragSurface>,
}

impl SurfaceLease {
    fn acquire(surface: Rc<dyn DragSurface>) -> Self {
        surface.acquire();
        Self { surface }
    }
}

impl Drop for SurfaceLease {
    fn drop(&mut self) {
        self.surface.release();
    }
}

/// Region the panel's top-left corner may occupy.
///
/// Horizontal: `[min_x, viewport_width - right_margin]`. Vertical:
/// `[min_y, +inf)`. The panel can be tucked mostly off the left, top and
/// bottom edges but always keeps a grab strip on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragBounds {
    pub min_x: f64,
    pub right_margin: f64,
    pub min_y: f64,
}

impl Default for DragBounds {
    fn default() -> Self {
        Self {
            min_x: -300.0,
            right_margin: 50.0,
            min_y: -500.0,
        }
    }
}

impl DragBounds {
    /// Clamp a panel position for the given viewport.
    ///
    /// On a viewport too narrow for the horizontal range, `min_x` wins.
    pub fn clamp(&self, position: Point, viewport: Size) -> Point {
        let max_x = viewport.width - self.right_margin;
        Point::new(
            position.x.min(max_x).max(self.min_x),
            position.y.max(self.min_y),
        )
    }
}

/// A live drag gesture.
pub struct DragSession {
    offset: Vec2,
    _lease: SurfaceLease,
}

impl DragSession {
    /// Pointer position relative to the panel's top-left corner at grab time.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }
}

/// Owns the panel position and translates it while a drag is active.
pub struct DragController {
    position: Point,
    viewport: Size,
    bounds: DragBounds,
    surface: Rc<dyn DragSurface>,
    session: Option<DragSession>,
}

impl DragController {
    /// Create a controller with the panel at `position`.
    pub fn new(position: Point, viewport: Size, bounds: DragBounds) -> Self {
        Self {
            position,
            viewport,
            bounds,
            surface: Rc::new(NoopSurface),
            session: None,
        }
    }

    /// Use `surface` for the affordances leased by future sessions.
    pub fn with_surface(mut self, surface: Rc<dyn DragSurface>) -> Self {
        self.surface = surface;
        self
    }

    /// Current panel position.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Update the viewport used for horizontal clamping.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn bounds(&self) -> DragBounds {
        self.bounds
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// The live session, if dragging.
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Start dragging from a pointer-down on the panel chrome.
    ///
    /// The caller is responsible for the hit test: pointer-downs on buttons
    /// or the close control must not reach here. A second call while already
    /// dragging re-grabs without leasing the surface again.
    pub fn begin_drag(&mut self, pointer: Point, panel_position: Point) {
        self.position = panel_position;
        let offset = pointer - panel_position;

        match &mut self.session {
            Some(session) => session.offset = offset,
            None => {
                log::debug!("Drag started at {:?} (offset {:?})", pointer, offset);
                self.session = Some(DragSession {
                    offset,
                    _lease: SurfaceLease::acquire(self.surface.clone()),
                });
            }
        }
    }

    /// Track the pointer. Returns the clamped panel position while dragging.
    pub fn on_pointer_move(&mut self, pointer: Point) -> Option<Point> {
        let offset = self.session.as_ref()?.offset;
        self.position = self.bounds.clamp(pointer - offset, self.viewport);
        Some(self.position)
    }

    /// Finish the drag. Calling it again is a no-op.
    pub fn end_drag(&mut self) {
        if self.session.take().is_some() {
            log::debug!("Drag ended at {:?}", self.position);
        }
    }

    /// Route a window-level pointer event.
    ///
    /// Pointer-downs are ignored; starting a drag needs the caller's hit test.
    /// Any button release ends the drag where the last move left the panel.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) -> Option<Point> {
        match *event {
            PointerEvent::Move { position } => self.on_pointer_move(position),
            PointerEvent::Up { .. } | PointerEvent::Cancel => {
                self.end_drag();
                None
            }
            PointerEvent::Down { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseButton;
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingSurface {
        acquired: Cell<u32>,
        released: Cell<u32>,
    }

    impl DragSurface for CountingSurface {
        fn acquire(&self) {
            self.acquired.set(self.acquired.get() + 1);
        }

        fn release(&self) {
            self.released.set(self.released.get() + 1);
        }
    }

    fn controller() -> DragController {
        DragController::new(
            Point::new(100.0, 100.0),
            Size::new(1024.0, 768.0),
            DragBounds::default(),
        )
    }

    #[test]
    fn test_move_follows_pointer_with_offset() {
        let mut drag = controller();
        drag.begin_drag(Point::new(120.0, 110.0), Point::new(100.0, 100.0));

        let offset = drag.session().unwrap().offset();
        assert!((offset.x - 20.0).abs() < f64::EPSILON);
        assert!((offset.y - 10.0).abs() < f64::EPSILON);

        let pos = drag.on_pointer_move(Point::new(220.0, 310.0)).unwrap();
        assert!((pos.x - 200.0).abs() < f64::EPSILON);
        assert!((pos.y - 300.0).abs() < f64::EPSILON);
        assert_eq!(drag.position(), pos);
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let mut drag = controller();
        assert_eq!(drag.on_pointer_move(Point::new(500.0, 500.0)), None);
        assert_eq!(drag.position(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_clamps_left_right_and_top() {
        let mut drag = controller();
        drag.begin_drag(Point::new(100.0, 100.0), Point::new(100.0, 100.0));

        let pos = drag.on_pointer_move(Point::new(-1000.0, -1000.0)).unwrap();
        assert!((pos.x + 300.0).abs() < f64::EPSILON);
        assert!((pos.y + 500.0).abs() < f64::EPSILON);

        let pos = drag.on_pointer_move(Point::new(5000.0, 100.0)).unwrap();
        assert!((pos.x - (1024.0 - 50.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_bottom_clamp() {
        let mut drag = controller();
        drag.begin_drag(Point::new(100.0, 100.0), Point::new(100.0, 100.0));
        let pos = drag.on_pointer_move(Point::new(100.0, 50_000.0)).unwrap();
        assert!((pos.y - 50_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_every_point_on_path_stays_in_bounds() {
        let viewport = Size::new(800.0, 600.0);
        let mut drag = DragController::new(Point::new(50.0, 50.0), viewport, DragBounds::default());
        drag.begin_drag(Point::new(60.0, 60.0), Point::new(50.0, 50.0));

        for step in 0..200 {
            let t = step as f64;
            let pointer = Point::new((t * 37.0) % 3000.0 - 1500.0, 1200.0 - t * 17.0);
            let pos = drag.on_pointer_move(pointer).unwrap();
            assert!(pos.x >= -300.0 && pos.x <= viewport.width - 50.0);
            assert!(pos.y >= -500.0);
        }
    }

    #[test]
    fn test_narrow_viewport_prefers_min_x() {
        let bounds = DragBounds::default();
        let pos = bounds.clamp(Point::new(0.0, 0.0), Size::new(100.0, 100.0));
        assert!(pos.x.abs() < f64::EPSILON);

        let pos = bounds.clamp(Point::new(0.0, 0.0), Size::new(-500.0, 100.0));
        assert!((pos.x + 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_end_drag_is_idempotent() {
        let surface = Rc::new(CountingSurface::default());
        let mut drag = controller().with_surface(surface.clone());

        drag.begin_drag(Point::new(100.0, 100.0), Point::new(100.0, 100.0));
        drag.end_drag();
        drag.end_drag();

        assert!(!drag.is_dragging());
        assert_eq!(surface.acquired.get(), 1);
        assert_eq!(surface.released.get(), 1);
        assert_eq!(drag.on_pointer_move(Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_regrab_does_not_lease_twice() {
        let surface = Rc::new(CountingSurface::default());
        let mut drag = controller().with_surface(surface.clone());

        drag.begin_drag(Point::new(100.0, 100.0), Point::new(100.0, 100.0));
        drag.begin_drag(Point::new(130.0, 100.0), Point::new(100.0, 100.0));
        assert_eq!(surface.acquired.get(), 1);
        assert_eq!(surface.released.get(), 0);

        drag.end_drag();
        assert_eq!(surface.released.get(), 1);
    }

    #[test]
    fn test_dropping_controller_releases_surface() {
        let surface = Rc::new(CountingSurface::default());
        {
            let mut drag = controller().with_surface(surface.clone());
            drag.begin_drag(Point::new(100.0, 100.0), Point::new(100.0, 100.0));
        }
        assert_eq!(surface.acquired.get(), 1);
        assert_eq!(surface.released.get(), 1);
    }

    #[test]
    fn test_pointer_events_drive_session() {
        let surface = Rc::new(CountingSurface::default());
        let mut drag = controller().with_surface(surface.clone());

        // Pointer-down alone never starts a drag.
        let down = PointerEvent::Down {
            position: Point::new(110.0, 110.0),
            button: MouseButton::Left,
        };
        assert_eq!(drag.handle_pointer_event(&down), None);
        assert!(!drag.is_dragging());

        drag.begin_drag(Point::new(110.0, 110.0), drag.position());
        let moved = drag.handle_pointer_event(&PointerEvent::Move {
            position: Point::new(210.0, 160.0),
        });
        assert_eq!(moved, Some(Point::new(200.0, 150.0)));

        // Release far outside the panel ends it without moving the panel.
        let released = drag.handle_pointer_event(&PointerEvent::Up {
            position: Point::new(5000.0, 5000.0),
            button: MouseButton::Left,
        });
        assert_eq!(released, None);
        assert!(!drag.is_dragging());
        assert_eq!(drag.position(), Point::new(200.0, 150.0));
        assert_eq!(surface.released.get(), 1);
    }

    #[test]
    fn test_any_button_release_ends_session() {
        for button in [MouseButton::Right, MouseButton::Middle] {
            let surface = Rc::new(CountingSurface::default());
            let mut drag = controller().with_surface(surface.clone());
            drag.begin_drag(Point::new(110.0, 110.0), Point::new(100.0, 100.0));

            drag.handle_pointer_event(&PointerEvent::Up {
                position: Point::new(300.0, 300.0),
                button,
            });
            assert!(!drag.is_dragging(), "{:?} release", button);
            assert_eq!(drag.position(), Point::new(100.0, 100.0));
            assert_eq!(surface.acquired.get(), 1);
            assert_eq!(surface.released.get(), 1);
        }
    }

    #[test]
    fn test_cancel_ends_session() {
        let surface = Rc::new(CountingSurface::default());
        let mut drag = controller().with_surface(surface.clone());
        drag.begin_drag(Point::new(100.0, 100.0), Point::new(100.0, 100.0));

        assert_eq!(drag.handle_pointer_event(&PointerEvent::Cancel), None);
        assert!(!drag.is_dragging());
        assert_eq!(surface.released.get(), 1);
    }
}
