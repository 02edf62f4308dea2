//! Staged reveal of a login panel.
//!
//! When a login phase is entered the panel container shows immediately and
//! the decorative line follows after a short delay. Flags are tracked per
//! role so the two panels never share animation state.

use enum_map::EnumMap;
use serde::Serialize;
use till_core::config::Timings;
use till_types::Role;

use crate::common::{Generation, TimerKind};
use crate::effects::LoginEffect;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RevealFlags {
    pub container: bool,
    pub line: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealSequencer {
    flags: EnumMap<Role, RevealFlags>,
}

impl RevealSequencer {
    pub fn flags(&self, role: Role) -> RevealFlags {
        self.flags[role]
    }

    /// Shows the container for `role` and schedules the line.
    pub fn start(&mut self, role: Role, generation: Generation, timings: &Timings) -> LoginEffect {
        self.flags[role] = RevealFlags {
            container: true,
            line: false,
        };
        LoginEffect::StartTimer {
            timer: generation.timer(TimerKind::RevealLine(role)),
            delay: timings.line_reveal(),
        }
    }

    /// Shows the line for `role`. Returns `false` if the container was never
    /// revealed (the line never appears on its own).
    pub fn reveal_line(&mut self, role: Role) -> bool {
        let flags = &mut self.flags[role];
        if !flags.container {
            return false;
        }
        flags.line = true;
        true
    }

    pub fn reset(&mut self) {
        self.flags = EnumMap::default();
    }
}
