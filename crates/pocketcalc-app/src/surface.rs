//! Host side of the drag affordances.

use std::cell::Cell;

use pocketcalc_core::DragSurface;

/// Window-wide state a drag borrows: pointer capture and text selection.
///
/// Winit keeps delivering `CursorMoved` to the window while a button is held,
/// so capture is a bookkeeping flag here. Selection suppression is read back by
/// the UI each frame.
#[derive(Debug, Default)]
pub struct HostSurface {
    captured: Cell<bool>,
    acquisitions: Cell<u32>,
}

impl HostSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a drag holds the surface.
    pub fn is_captured(&self) -> bool {
        self.captured.get()
    }

    /// Text selection is disabled while captured.
    pub fn selection_enabled(&self) -> bool {
        !self.captured.get()
    }

    /// Number of drags that have acquired the surface so far.
    pub fn acquisitions(&self) -> u32 {
        self.acquisitions.get()
    }
}

impl DragSurface for HostSurface {
    fn acquire(&self) {
        if self.captured.replace(true) {
            log::warn!("Drag surface acquired twice");
        }
        self.acquisitions.set(self.acquisitions.get() + 1);
        log::debug!("Pointer captured, text selection off");
    }

    fn release(&self) {
        if self.captured.replace(false) {
            log::debug!("Pointer released, text selection on");
        }
    }
}
