//! Delayed transitions.
//!
//! Every timer is stamped with the generation that was current when it was
//! scheduled. Returning to role selection bumps the generation, so a timer
//! that was already in flight arrives stale and is dropped by the reducer.

use till_types::Role;

use crate::overlays::SheetId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Transient phase → terminal login phase.
    AdvancePhase(Role),
    /// Decorative line of a login panel.
    RevealLine(Role),
    /// Entering overlay sheet → visible.
    RevealOverlay(SheetId),
    /// Exiting overlay sheet → gone.
    UnmountOverlay(SheetId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub generation: u64,
    pub kind: TimerKind,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

impl Generation {
    pub fn timer(self, kind: TimerKind) -> Timer {
        Timer {
            generation: self.0,
            kind,
        }
    }

    pub fn is_current(self, timer: &Timer) -> bool {
        timer.generation == self.0
    }

    pub fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}
