use std::time::Duration;

use serde::Serialize;
use till_core::config::Timings;

use super::{ForgotPasswordState, NewPasswordState, OtpState};
use crate::common::TaskKind;

/// Identity of one mounted sheet. Timers target sheets, not kinds, so a
/// late timer can never touch a newer sheet of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SheetId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    ForgotPassword,
    OtpVerification,
    NewPassword,
    ManagerForgotPin,
}

impl OverlayKind {
    /// How long the sheet takes to slide out before it is unmounted.
    pub fn exit_delay(self, timings: &Timings) -> Duration {
        match self {
            OverlayKind::ManagerForgotPin => timings.pin_notice_exit(),
            OverlayKind::ForgotPassword
            | OverlayKind::OtpVerification
            | OverlayKind::NewPassword => timings.overlay_exit(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayStage {
    /// Mounted, not yet slid in.
    Entering,
    Visible,
    /// Sliding out; unmounted when its timer fires.
    Exiting,
}

/// An overlay together with its form and submission slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Overlay {
    ForgotPassword(ForgotPasswordState),
    OtpVerification(OtpState),
    NewPassword(NewPasswordState),
    ManagerForgotPin,
}

impl Overlay {
    pub fn kind(&self) -> OverlayKind {
        match self {
            Overlay::ForgotPassword(_) => OverlayKind::ForgotPassword,
            Overlay::OtpVerification(_) => OverlayKind::OtpVerification,
            Overlay::NewPassword(_) => OverlayKind::NewPassword,
            Overlay::ManagerForgotPin => OverlayKind::ManagerForgotPin,
        }
    }

    /// Auth calls this overlay can have in flight.
    pub fn tasks(&self) -> &'static [TaskKind] {
        match self {
            Overlay::ForgotPassword(_) => &[TaskKind::ForgotPassword],
            Overlay::OtpVerification(_) => &[TaskKind::VerifyOtp, TaskKind::ForgotPassword],
            Overlay::NewPassword(_) => &[TaskKind::ResetPassword],
            Overlay::ManagerForgotPin => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlaySheet {
    pub id: SheetId,
    pub stage: OverlayStage,
    pub overlay: Overlay,
}

impl OverlaySheet {
    pub fn kind(&self) -> OverlayKind {
        self.overlay.kind()
    }
}

/// At most one active sheet plus at most one sheet sliding out.
///
/// Both being mounted at once is the cross-fade window of a swap. There is a
/// single outgoing slot: when another sheet starts exiting while one is still
/// sliding out, the older one is unmounted at once and its pending unmount
/// timer later finds nothing to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayStack {
    active: Option<OverlaySheet>,
    outgoing: Option<OverlaySheet>,
    next_id: u64,
}

impl OverlayStack {
    pub fn active(&self) -> Option<&OverlaySheet> {
        self.active.as_ref()
    }

    pub fn active_overlay_mut(&mut self) -> Option<&mut Overlay> {
        self.active.as_mut().map(|sheet| &mut sheet.overlay)
    }

    pub fn outgoing(&self) -> Option<&OverlaySheet> {
        self.outgoing.as_ref()
    }

    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_kind(&self) -> Option<OverlayKind> {
        self.active.as_ref().map(OverlaySheet::kind)
    }

    pub fn is_mounted(&self, kind: OverlayKind) -> bool {
        self.sheets().any(|sheet| sheet.kind() == kind)
    }

    pub fn is_revealed(&self, kind: OverlayKind) -> bool {
        self.active
            .as_ref()
            .is_some_and(|sheet| sheet.kind() == kind && sheet.stage == OverlayStage::Visible)
    }

    pub fn sheets(&self) -> impl Iterator<Item = &OverlaySheet> {
        self.outgoing.iter().chain(self.active.iter())
    }

    /// Mounts `overlay` as the active sheet. A previously active sheet starts
    /// exiting and its id is returned so the caller can schedule its unmount.
    /// It replaces any sheet still sliding out.
    pub fn mount(&mut self, overlay: Overlay) -> (SheetId, Option<SheetId>) {
        let id = SheetId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        let previous = self.active.take().map(|mut sheet| {
            sheet.stage = OverlayStage::Exiting;
            let previous_id = sheet.id;
            self.outgoing = Some(sheet);
            previous_id
        });

        self.active = Some(OverlaySheet {
            id,
            stage: OverlayStage::Entering,
            overlay,
        });
        (id, previous)
    }

    /// Starts sliding the active sheet out, replacing any sheet still
    /// sliding out.
    pub fn begin_exit(&mut self) -> Option<&OverlaySheet> {
        let mut sheet = self.active.take()?;
        sheet.stage = OverlayStage::Exiting;
        self.outgoing = Some(sheet);
        self.outgoing.as_ref()
    }

    /// Entering → Visible. Ignored unless `id` is the active entering sheet.
    pub fn reveal(&mut self, id: SheetId) -> bool {
        match self.active.as_mut() {
            Some(sheet) if sheet.id == id && sheet.stage == OverlayStage::Entering => {
                sheet.stage = OverlayStage::Visible;
                true
            }
            _ => false,
        }
    }

    /// Drops the outgoing sheet if it is `id`, discarding its form state.
    pub fn unmount(&mut self, id: SheetId) -> bool {
        if self.outgoing.as_ref().is_some_and(|sheet| sheet.id == id) {
            self.outgoing = None;
            true
        } else {
            false
        }
    }

    /// Unmounts everything immediately. Sheet ids keep increasing.
    pub fn clear(&mut self) {
        self.active = None;
        self.outgoing = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forgot() -> Overlay {
        Overlay::ForgotPassword(ForgotPasswordState::default())
    }

    #[test]
    fn test_enter_reveal_exit_unmount() {
        let mut stack = OverlayStack::default();
        let (id, previous) = stack.mount(forgot());
        assert!(previous.is_none());
        assert!(stack.is_mounted(OverlayKind::ForgotPassword));
        assert!(!stack.is_revealed(OverlayKind::ForgotPassword));

        assert!(stack.reveal(id));
        assert!(stack.is_revealed(OverlayKind::ForgotPassword));

        let exiting = stack.begin_exit().map(|sheet| sheet.id);
        assert_eq!(exiting, Some(id));
        assert!(!stack.is_revealed(OverlayKind::ForgotPassword));
        assert!(stack.is_mounted(OverlayKind::ForgotPassword));

        assert!(stack.unmount(id));
        assert!(!stack.is_mounted(OverlayKind::ForgotPassword));
        assert_eq!(stack.sheets().count(), 0);
    }

    #[test]
    fn test_swap_keeps_both_mounted() {
        let mut stack = OverlayStack::default();
        let (first, _) = stack.mount(forgot());
        stack.reveal(first);

        let (second, previous) = stack.mount(Overlay::ManagerForgotPin);
        assert_eq!(previous, Some(first));
        assert_eq!(stack.sheets().count(), 2);
        assert_eq!(stack.outgoing().map(|s| s.stage), Some(OverlayStage::Exiting));
        assert_eq!(stack.active_kind(), Some(OverlayKind::ManagerForgotPin));

        // A stale reveal for the old sheet does nothing.
        assert!(!stack.reveal(first));
        assert!(stack.reveal(second));
        assert!(stack.unmount(first));
        assert!(!stack.unmount(first));
        assert!(stack.is_revealed(OverlayKind::ManagerForgotPin));
    }

    #[test]
    fn test_second_exit_drops_the_older_outgoing_sheet() {
        let mut stack = OverlayStack::default();
        let (first, _) = stack.mount(forgot());
        let (second, _) = stack.mount(Overlay::ManagerForgotPin);
        assert_eq!(stack.outgoing().map(|s| s.id), Some(first));

        // Closing while the first sheet is still in its swap window.
        stack.begin_exit();
        assert_eq!(stack.outgoing().map(|s| s.id), Some(second));
        assert!(!stack.is_mounted(OverlayKind::ForgotPassword));
        assert_eq!(stack.sheets().count(), 1);

        // The first sheet's unmount timer is now a no-op.
        assert!(!stack.unmount(first));
        assert!(stack.unmount(second));
    }

    #[test]
    fn test_clear_never_reuses_ids() {
        let mut stack = OverlayStack::default();
        let (first, _) = stack.mount(forgot());
        stack.clear();
        let (second, _) = stack.mount(forgot());
        assert_ne!(first, second);
        assert!(!stack.reveal(first));
    }

    #[test]
    fn test_exit_delays() {
        let timings = Timings::default();
        assert_eq!(
            OverlayKind::ManagerForgotPin.exit_delay(&timings),
            Duration::from_millis(300)
        );
        assert_eq!(
            OverlayKind::OtpVerification.exit_delay(&timings),
            Duration::from_millis(500)
        );
    }
}
