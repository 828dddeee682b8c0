//! Four-function accumulator behind the calculator readout.
//!
//! Input arrives one key at a time. The readout text is edited in place
//! while a number is being entered and is only re-derived from a value when
//! an operation commits. Operations fold strictly left to right: pressing an
//! operator immediately collapses the pending operation before recording the
//! new one, so there is no precedence.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::number::{format_number, parse_display};

/// Errors building calculator input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigitError {
    #[error("Digit out of range: {0}")]
    OutOfRange(u8),
}

/// A single decimal digit, `0..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digit(u8);

impl Digit {
    pub const ZERO: Digit = Digit(0);

    /// Every digit, indexed by value.
    pub const ALL: [Digit; 10] = [
        Digit(0),
        Digit(1),
        Digit(2),
        Digit(3),
        Digit(4),
        Digit(5),
        Digit(6),
        Digit(7),
        Digit(8),
        Digit(9),
    ];

    /// Create a digit, rejecting values above 9.
    pub fn new(value: u8) -> Result<Self, DigitError> {
        if value <= 9 {
            Ok(Self(value))
        } else {
            Err(DigitError::OutOfRange(value))
        }
    }

    /// Numeric value of the digit.
    pub fn value(self) -> u8 {
        self.0
    }

    /// The digit as a display character.
    pub fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

impl TryFrom<u8> for Digit {
    type Error = DigitError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> Self {
        digit.0
    }
}

/// Binary operators on the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Apply the operator with IEEE-754 semantics (division by zero yields
    /// an infinity or NaN).
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
            Operator::Multiply => lhs * rhs,
            Operator::Divide => lhs / rhs,
        }
    }

    /// Keypad label.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "−",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
        }
    }
}

/// Whether the next digit extends the readout or starts a new number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntryMode {
    /// Digits append to the readout.
    #[default]
    Entering,
    /// An operator or equals was just pressed; the next digit replaces the readout.
    FreshOperand,
}

/// Everything the readout and operator keys need to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    /// Literal readout text. Never empty, at most one decimal point.
    pub text: String,
    /// Left-hand operand waiting for the pending operator.
    pub previous_operand: Option<f64>,
    /// Operator chosen but not applied yet.
    pub pending_operator: Option<Operator>,
    pub entry: EntryMode,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            text: "0".to_string(),
            previous_operand: None,
            pending_operator: None,
            entry: EntryMode::Entering,
        }
    }
}

/// A key on the calculator pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalcKey {
    Digit(Digit),
    Decimal,
    Clear,
    ToggleSign,
    Percent,
    Operator(Operator),
    Equals,
}

/// The arithmetic state machine.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    state: DisplayState,
}

impl Accumulator {
    /// Create an accumulator showing `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current display state.
    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// Current readout text.
    pub fn text(&self) -> &str {
        &self.state.text
    }

    /// Operator waiting for its second operand, if any.
    pub fn pending_operator(&self) -> Option<Operator> {
        self.state.pending_operator
    }

    /// Dispatch a keypad press.
    pub fn press(&mut self, key: CalcKey) {
        match key {
            CalcKey::Digit(digit) => self.input_digit(digit),
            CalcKey::Decimal => self.input_decimal(),
            CalcKey::Clear => self.clear(),
            CalcKey::ToggleSign => self.toggle_sign(),
            CalcKey::Percent => self.percent(),
            CalcKey::Operator(op) => self.apply_operator(op),
            CalcKey::Equals => self.evaluate(),
        }
    }

    pub fn input_digit(&mut self, digit: Digit) {
        match self.state.entry {
            EntryMode::FreshOperand => {
                self.state.text = digit.as_char().to_string();
                self.state.entry = EntryMode::Entering;
            }
            EntryMode::Entering if self.state.text == "0" => {
                self.state.text = digit.as_char().to_string();
            }
            EntryMode::Entering => self.state.text.push(digit.as_char()),
        }
    }

    pub fn input_decimal(&mut self) {
        match self.state.entry {
            EntryMode::FreshOperand => {
                self.state.text = "0.".to_string();
                self.state.entry = EntryMode::Entering;
            }
            EntryMode::Entering => {
                if !self.state.text.contains('.') {
                    self.state.text.push('.');
                }
            }
        }
    }

    /// Reset to the initial state.
    pub fn clear(&mut self) {
        self.state = DisplayState::default();
    }

    /// Negate the readout. Leaves the pending operation alone.
    pub fn toggle_sign(&mut self) {
        self.state.text = format_number(-parse_display(&self.state.text));
    }

    /// Divide the readout by 100.
    pub fn percent(&mut self) {
        self.state.text = format_number(parse_display(&self.state.text) / 100.0);
    }

    /// Record `op` as pending, first folding any operation already pending.
    ///
    /// The fold uses the operator that was pending, not `op`: `5 + 3 ×`
    /// computes `5 + 3` and leaves `×` pending.
    pub fn apply_operator(&mut self, op: Operator) {
        self.fold(Some(op));
    }

    /// Fold the pending operation and show only the result.
    pub fn evaluate(&mut self) {
        self.fold(None);
        self.state.pending_operator = None;
        self.state.previous_operand = None;
        self.state.entry = EntryMode::FreshOperand;
    }

    fn fold(&mut self, next: Option<Operator>) {
        let input = parse_display(&self.state.text);

        match (self.state.previous_operand, self.state.pending_operator) {
            (None, _) => self.state.previous_operand = Some(input),
            (Some(previous), Some(pending)) => {
                // A NaN left operand folds as zero.
                let lhs = if previous.is_nan() { 0.0 } else { previous };
                let result = pending.apply(lhs, input);
                log::debug!("{} {} {} = {}", lhs, pending.symbol(), input, result);
                self.state.text = format_number(result);
                self.state.previous_operand = Some(result);
            }
            (Some(_), None) => {}
        }

        self.state.pending_operator = next;
        self.state.entry = EntryMode::FreshOperand;
    }
}
