//! Panel interaction state.

/// How the pointer is interacting with the panel chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    /// Pointer elsewhere.
    #[default]
    Normal,
    /// Pointer over draggable chrome.
    Hovered,
    /// A drag session is live.
    Dragging,
}

impl PanelState {
    /// Whether the chrome should show a grab affordance.
    pub fn shows_grab(&self) -> bool {
        matches!(self, Self::Hovered | Self::Dragging)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging)
    }
}
