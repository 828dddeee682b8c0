//! The mounted calculator widget.
//!
//! A widget instance owns an accumulator, a drag controller and the host's
//! close callback. Instances share nothing: mounting a second calculator
//! gives it its own readout and position.

mod calculator;
mod state;

pub use calculator::CalculatorWidget;
pub use state::PanelState;
