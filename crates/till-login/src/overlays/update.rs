//! Sheet lifecycle shared by every overlay.

use till_core::error::SubmitError;

use super::{Overlay, OverlayKind, SheetId, forgot_password, otp};
use crate::common::TimerKind;
use crate::effects::LoginEffect;
use crate::state::LoginState;

/// Mounts `overlay` and schedules its slide-in. If another sheet was active
/// it stays mounted for `overlay_swap` before being unmounted.
pub(super) fn mount(state: &mut LoginState, overlay: Overlay) -> Vec<LoginEffect> {
    let kind = overlay.kind();
    let (id, previous) = state.overlays.mount(overlay);
    tracing::debug!(?kind, ?id, "overlay mounted");

    let timings = &state.settings.timings;
    let mut effects = vec![LoginEffect::StartTimer {
        timer: state.timers.timer(TimerKind::RevealOverlay(id)),
        delay: timings.overlay_mount(),
    }];
    if let Some(previous) = previous {
        effects.push(LoginEffect::StartTimer {
            timer: state.timers.timer(TimerKind::UnmountOverlay(previous)),
            delay: timings.overlay_swap(),
        });
    }
    effects
}

/// Slides the active overlay out. In-flight calls it started are abandoned.
pub fn close_overlay(state: &mut LoginState) -> Vec<LoginEffect> {
    let Some(sheet) = state.overlays.begin_exit() else {
        return vec![];
    };
    let (id, kind) = (sheet.id, sheet.kind());
    for task in sheet.overlay.tasks() {
        state.tasks.state_mut(*task).clear();
    }
    tracing::debug!(?kind, ?id, "overlay closing");

    vec![LoginEffect::StartTimer {
        timer: state.timers.timer(TimerKind::UnmountOverlay(id)),
        delay: kind.exit_delay(&state.settings.timings),
    }]
}

pub fn reveal_sheet(state: &mut LoginState, id: SheetId) -> Vec<LoginEffect> {
    if !state.overlays.reveal(id) {
        tracing::trace!(?id, "reveal for unknown sheet ignored");
    }
    vec![]
}

pub fn unmount_sheet(state: &mut LoginState, id: SheetId) -> Vec<LoginEffect> {
    if state.overlays.unmount(id) {
        tracing::debug!(?id, "overlay unmounted");
    }
    vec![]
}

/// `forgot_password` answers both the first request and an OTP resend.
pub fn handle_reset_code_sent(
    state: &mut LoginState,
    result: Result<(), SubmitError>,
) -> Vec<LoginEffect> {
    match state.overlays.active_kind() {
        Some(OverlayKind::ForgotPassword) => forgot_password::handle_code_sent(state, result),
        Some(OverlayKind::OtpVerification) => otp::handle_resent(state, result),
        _ => {
            tracing::debug!("reset code result without a matching overlay dropped");
            vec![]
        }
    }
}
