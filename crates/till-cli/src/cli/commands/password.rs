//! Password recovery command handlers.
//!
//! Walks the admin panel's overlays: forgot password, verification code,
//! new password.

use anyhow::{Context, Result, bail};
use till_login::features::credentials::SubmissionState;
use till_login::overlays::{Overlay, OverlayKind};
use till_login::{LoginEvent, LoginRuntime};
use till_types::Role;

use super::{Session, code_slots, ensure_submitted, ensure_valid, enter, report, settle};

pub struct ResetOptions<'a> {
    pub email: &'a str,
    pub otp: &'a str,
    pub password: &'a str,
    pub confirm: &'a str,
}

fn active_overlay(rt: &LoginRuntime) -> Option<&Overlay> {
    rt.state().overlays.active().map(|sheet| &sheet.overlay)
}

fn forgot_submission(rt: &LoginRuntime) -> Option<&SubmissionState> {
    match active_overlay(rt) {
        Some(Overlay::ForgotPassword(form)) => Some(&form.submission),
        _ => None,
    }
}

fn otp_submission(rt: &LoginRuntime) -> Option<&SubmissionState> {
    match active_overlay(rt) {
        Some(Overlay::OtpVerification(form)) => Some(&form.submission),
        _ => None,
    }
}

fn new_password_submission(rt: &LoginRuntime) -> Option<&SubmissionState> {
    match active_overlay(rt) {
        Some(Overlay::NewPassword(form)) => Some(&form.submission),
        _ => None,
    }
}

fn expect_overlay(rt: &LoginRuntime, kind: OverlayKind) -> Result<()> {
    match rt.state().overlays.active_kind() {
        Some(active) if active == kind => Ok(()),
        other => bail!("expected the {kind:?} step, screen shows {other:?}"),
    }
}

async fn request_code(rt: &mut LoginRuntime, email: &str) -> Result<()> {
    enter(rt, Role::Admin).await?;
    rt.dispatch(LoginEvent::OpenForgotPassword);
    rt.dispatch(LoginEvent::ResetEmailChanged(email.to_string()));
    rt.dispatch(LoginEvent::SubmitForgotPassword);
    if let Some(Overlay::ForgotPassword(form)) = active_overlay(rt) {
        ensure_valid(&form.errors)?;
    }

    settle(rt, forgot_submission).await?;
    ensure_submitted(forgot_submission(rt))?;
    expect_overlay(rt, OverlayKind::OtpVerification)
}

/// Opens the code sheet for a code that was already emailed, without asking
/// the backend for a new one.
async fn open_code_sheet(rt: &mut LoginRuntime, email: &str) -> Result<()> {
    enter(rt, Role::Admin).await?;
    rt.dispatch(LoginEvent::OpenForgotPassword);
    rt.dispatch(LoginEvent::ResetEmailChanged(email.to_string()));
    rt.dispatch(LoginEvent::UseExistingResetCode);
    if let Some(Overlay::ForgotPassword(form)) = active_overlay(rt) {
        ensure_valid(&form.errors)?;
    }
    expect_overlay(rt, OverlayKind::OtpVerification)
}

pub async fn forgot(session: &Session, email: &str) -> Result<()> {
    let mut rt = session.runtime();
    request_code(&mut rt, email).await?;
    report(
        session,
        &rt,
        &format!("Verification code sent to {}", email.trim()),
    )
}

/// Verifies the emailed `otp` and sets the new password.
pub async fn reset(session: &Session, opts: ResetOptions<'_>) -> Result<()> {
    let slots = code_slots(opts.otp);
    if let Err(errors) = session.settings().policy.validate_otp_form(&slots) {
        bail!("{errors}");
    }

    let mut rt = session.runtime();
    open_code_sheet(&mut rt, opts.email).await?;

    for digit in slots.into_iter().flatten() {
        rt.dispatch(LoginEvent::OtpKey(digit));
    }
    rt.dispatch(LoginEvent::SubmitOtp);
    settle(&mut rt, otp_submission).await?;
    ensure_submitted(otp_submission(&rt))?;
    expect_overlay(&rt, OverlayKind::NewPassword)?;

    rt.dispatch(LoginEvent::NewPasswordChanged(opts.password.to_string()));
    rt.dispatch(LoginEvent::ConfirmPasswordChanged(opts.confirm.to_string()));
    rt.dispatch(LoginEvent::SubmitNewPassword);
    if let Some(Overlay::NewPassword(form)) = active_overlay(&rt) {
        ensure_valid(&form.errors)?;
    }
    settle(&mut rt, new_password_submission).await?;
    ensure_submitted(new_password_submission(&rt))?;

    let notice = rt
        .state()
        .admin_form
        .notice
        .clone()
        .context("password reset finished without confirmation")?;
    report(session, &rt, &notice)
}
