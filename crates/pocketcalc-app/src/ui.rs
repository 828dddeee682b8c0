//! UI components using egui.

use std::rc::Rc;

use egui::{
    pos2, vec2, Align2, Context, CursorIcon, Direction, Id, Layout, Order, PointerButton, Pos2,
    Sense, Vec2,
};
use kurbo::Point;
use pocketcalc_core::{CalcKey, CalculatorWidget, Digit, Operator};
use pocketcalc_widgets::{
    close_button, header_title, keypad_spacing, launcher_button, panel_frame, sizing, CalcButton,
    CalcButtonKind, Readout,
};

use crate::surface::HostSurface;

/// Panel title shown in the header.
pub const TITLE: &str = "Calculator";

/// Label of the host launcher.
pub const LAUNCHER_LABEL: &str = "Open calculator";

/// Actions that can be triggered from the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiAction {
    /// A keypad key was clicked.
    Press(CalcKey),
    /// Primary button went down on the panel chrome, in window points.
    Grab(Point),
    /// The close control was clicked.
    Close,
    /// The host launcher was clicked.
    Open,
}

/// UI state carried between frames.
#[derive(Debug)]
pub struct UiState {
    /// Pointer is over the panel chrome (not over a control).
    pub chrome_hovered: bool,
    /// Drag surface shared with the mounted widget.
    pub surface: Rc<HostSurface>,
}

impl UiState {
    pub fn new(surface: Rc<HostSurface>) -> Self {
        Self {
            chrome_hovered: false,
            surface,
        }
    }
}

struct KeyDef {
    label: &'static str,
    key: CalcKey,
    kind: CalcButtonKind,
}

impl KeyDef {
    const fn new(label: &'static str, key: CalcKey, kind: CalcButtonKind) -> Self {
        Self { label, key, kind }
    }

    const fn digit(label: &'static str, value: usize) -> Self {
        let kind = if value == 0 {
            CalcButtonKind::Zero
        } else {
            CalcButtonKind::Number
        };
        Self::new(label, CalcKey::Digit(Digit::ALL[value]), kind)
    }

    const fn operator(label: &'static str, operator: Operator) -> Self {
        Self::new(label, CalcKey::Operator(operator), CalcButtonKind::Operator)
    }

    const fn function(label: &'static str, key: CalcKey) -> Self {
        Self::new(label, key, CalcButtonKind::Function)
    }
}

const KEYPAD: &[&[KeyDef]] = &[
    &[
        KeyDef::function("C", CalcKey::Clear),
        KeyDef::function("±", CalcKey::ToggleSign),
        KeyDef::function("%", CalcKey::Percent),
        KeyDef::operator("÷", Operator::Divide),
    ],
    &[
        KeyDef::digit("7", 7),
        KeyDef::digit("8", 8),
        KeyDef::digit("9", 9),
        KeyDef::operator("×", Operator::Multiply),
    ],
    &[
        KeyDef::digit("4", 4),
        KeyDef::digit("5", 5),
        KeyDef::digit("6", 6),
        KeyDef::operator("−", Operator::Subtract),
    ],
    &[
        KeyDef::digit("1", 1),
        KeyDef::digit("2", 2),
        KeyDef::digit("3", 3),
        KeyDef::operator("+", Operator::Add),
    ],
    &[
        KeyDef::digit("0", 0),
        KeyDef::new(".", CalcKey::Decimal, CalcButtonKind::Number),
        KeyDef::new("=", CalcKey::Equals, CalcButtonKind::Equals),
    ],
];

const KEYPAD_COLUMNS: f32 = 4.0;

/// Render the UI and return any action triggered this frame.
pub fn render_ui(
    ctx: &Context,
    ui_state: &mut UiState,
    widget: Option<&CalculatorWidget>,
) -> Option<UiAction> {
    let selection_enabled = ui_state.surface.selection_enabled();
    ctx.style_mut(|style| style.interaction.selectable_labels = selection_enabled);

    match widget {
        Some(widget) => render_calculator(ctx, ui_state, widget),
        None => {
            ui_state.chrome_hovered = false;
            render_launcher(ctx)
        }
    }
}

fn render_launcher(ctx: &Context) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(Id::new("launcher"))
        .anchor(Align2::LEFT_TOP, Vec2::new(16.0, 16.0))
        .show(ctx, |ui| {
            if launcher_button(ui, LAUNCHER_LABEL) {
                action = Some(UiAction::Open);
            }
        });

    action
}

fn render_calculator(
    ctx: &Context,
    ui_state: &mut UiState,
    widget: &CalculatorWidget,
) -> Option<UiAction> {
    let mut action = None;
    let position = widget.position();
    let panel_width = widget.config().width as f32;
    let pending = widget.accumulator().pending_operator();

    // The area's own response is the chrome: it is registered before the
    // controls, so buttons win the hit test over it.
    let area = egui::Area::new(Id::new("calculator"))
        .fixed_pos(pos2(position.x as f32, position.y as f32))
        // Drag bounds allow tucking the panel partly off screen.
        .constrain(false)
        .order(Order::Foreground)
        .sense(Sense::drag())
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.style_mut().interaction.selectable_labels = false;
                let padding = 2.0 * f32::from(sizing::PANEL_PADDING);
                let inner_width = (panel_width - padding).max(0.0);
                ui.set_width(inner_width);

                ui.vertical(|ui| {
                    ui.spacing_mut().item_spacing = vec2(0.0, 16.0);

                    ui.horizontal(|ui| {
                        if close_button(ui) {
                            action = Some(UiAction::Close);
                        }
                        let title_width = (ui.available_width()
                            - sizing::CLOSE_SIZE
                            - ui.spacing().item_spacing.x)
                            .max(0.0);
                        ui.allocate_ui_with_layout(
                            vec2(title_width, sizing::CLOSE_SIZE),
                            Layout::centered_and_justified(Direction::LeftToRight),
                            |ui| header_title(ui, TITLE),
                        );
                    });

                    Readout::new(widget.accumulator().text()).show(ui);

                    if let Some(key) = render_keypad(ui, inner_width, pending) {
                        action = Some(UiAction::Press(key));
                    }
                });
            });
        });

    let chrome = area.response;
    ui_state.chrome_hovered = chrome.hovered();

    // A press and release within one frame never starts a drag.
    let primary_down = ctx.input(|i| i.pointer.primary_down());
    if primary_down && chrome.drag_started_by(PointerButton::Primary) {
        let pointer = ctx
            .input(|i| i.pointer.press_origin())
            .or_else(|| chrome.interact_pointer_pos());
        if let Some(pointer) = pointer {
            action = action.or(Some(UiAction::Grab(to_point(pointer))));
        }
    }

    let panel_state = widget.panel_state();
    if panel_state.is_dragging() {
        ctx.set_cursor_icon(CursorIcon::Grabbing);
    } else if panel_state.shows_grab() && ui_state.chrome_hovered {
        ctx.set_cursor_icon(CursorIcon::Grab);
    }

    action
}

fn render_keypad(
    ui: &mut egui::Ui,
    inner_width: f32,
    pending: Option<Operator>,
) -> Option<CalcKey> {
    let mut pressed = None;
    let gap = sizing::KEY_GAP;
    let key_width = ((inner_width - gap * (KEYPAD_COLUMNS - 1.0)) / KEYPAD_COLUMNS).max(0.0);

    ui.vertical(|ui| {
        keypad_spacing(ui);
        for row in KEYPAD {
            ui.horizontal(|ui| {
                keypad_spacing(ui);
                for def in *row {
                    let width = match def.kind {
                        CalcButtonKind::Zero => key_width * 2.0 + gap,
                        _ => key_width,
                    };
                    let active = match def.key {
                        CalcKey::Operator(operator) => pending == Some(operator),
                        _ => false,
                    };
                    let clicked = CalcButton::new(def.label, def.kind)
                        .active(active)
                        .width(width)
                        .show(ui);
                    if clicked {
                        pressed = Some(def.key);
                    }
                }
            });
        }
    });

    pressed
}

fn to_point(pos: Pos2) -> Point {
    Point::new(pos.x as f64, pos.y as f64)
}
