//! PocketCalc Core Library
//!
//! Platform-agnostic state for the floating calculator widget: the
//! four-function accumulator, the drag controller, and the panel config.

pub mod accumulator;
pub mod config;
pub mod drag;
pub mod input;
pub mod number;
pub mod widget;

pub use accumulator::{Accumulator, CalcKey, Digit, DigitError, DisplayState, EntryMode, Operator};
pub use config::{ConfigError, ConfigResult, PanelConfig};
pub use drag::{DragBounds, DragController, DragSession, DragSurface, NoopSurface, SurfaceLease};
pub use input::{MouseButton, PointerEvent};
pub use number::{format_number, parse_display};
pub use widget::{CalculatorWidget, PanelState};
