//! Skinned egui components for the PocketCalc panel.
//!
//! - **Buttons**: keypad buttons, the round close control, the host launcher
//! - **Readout**: the right-aligned display with length-based sizing
//! - **Frame**: the dark panel frame
//! - **Layout**: header title, keypad grid spacing

pub mod buttons;
pub mod frame;
pub mod layout;
pub mod readout;

pub use buttons::{CalcButton, CalcButtonKind, close_button, launcher_button};
pub use frame::panel_frame;
pub use layout::{header_title, keypad_spacing};
pub use readout::{Readout, ReadoutStyle, visible_text};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Keypad button height
    pub const KEY_HEIGHT: f32 = 64.0;
    /// Gap between keypad buttons
    pub const KEY_GAP: f32 = 12.0;
    /// Keypad button corner radius
    pub const KEY_RADIUS: u8 = 16;
    /// Double-width zero key radius (pill)
    pub const PILL_RADIUS: u8 = 32;
    /// Close control diameter
    pub const CLOSE_SIZE: f32 = 16.0;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 24;
    /// Panel inner margin on each side
    pub const PANEL_PADDING: i8 = 20;
    /// Readout corner radius
    pub const READOUT_RADIUS: u8 = 16;
    /// Readout minimum height
    pub const READOUT_MIN_HEIGHT: f32 = 80.0;
}

/// Panel colors.
pub mod theme {
    use egui::Color32;

    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgb(16, 16, 17);
    /// Panel border
    pub const PANEL_BORDER: Color32 = Color32::from_rgba_premultiplied(26, 26, 26, 26);
    /// Readout well
    pub const READOUT_BG: Color32 = Color32::from_rgb(23, 23, 24);
    /// Readout border
    pub const READOUT_BORDER: Color32 = Color32::from_rgba_premultiplied(20, 20, 20, 20);
    /// Readout and title text
    pub const TEXT: Color32 = Color32::WHITE;
    /// Header title
    pub const TITLE: Color32 = Color32::from_rgba_premultiplied(230, 230, 230, 230);
    /// Digit keys
    pub const NUMBER_BG: Color32 = Color32::from_rgb(69, 69, 69);
    /// Function keys (C, ±, %)
    pub const FUNCTION_BG: Color32 = Color32::from_rgb(152, 152, 152);
    /// Function key text
    pub const FUNCTION_TEXT: Color32 = Color32::BLACK;
    /// Operator and equals keys
    pub const ACCENT: Color32 = Color32::from_rgb(255, 136, 0);
    /// Accent text when an operator is pending
    pub const ACCENT_TEXT: Color32 = Color32::from_rgb(255, 149, 0);
    /// Pending operator background
    pub const ACTIVE_BG: Color32 = Color32::from_rgb(248, 248, 248);
    /// Close control
    pub const CLOSE: Color32 = Color32::from_rgb(247, 99, 79);
}
