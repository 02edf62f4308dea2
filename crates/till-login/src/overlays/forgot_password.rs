use serde::Serialize;
use till_core::error::{Field, FieldErrors, SubmitError};
use till_types::ForgotPasswordRequest;

use super::Overlay;
use super::otp::OtpState;
use super::update::mount;
use crate::effects::{AuthCall, LoginEffect};
use crate::features::credentials::SubmissionState;
use crate::features::phase::Phase;
use crate::state::LoginState;

/// "Forgot password" sheet: asks for the account email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ForgotPasswordState {
    pub email: String,
    pub errors: FieldErrors,
    pub submission: SubmissionState,
}

/// Opens the sheet from the admin panel, prefilled with the typed email.
pub fn open(state: &mut LoginState) -> Vec<LoginEffect> {
    if state.phase != Phase::AdminLogin
        || state.overlays.has_active()
        || state.admin_submission.is_loading
    {
        return vec![];
    }
    let overlay = Overlay::ForgotPassword(ForgotPasswordState {
        email: state.admin_form.email.trim().to_string(),
        ..Default::default()
    });
    mount(state, overlay)
}

pub fn email_changed(state: &mut LoginState, email: String) -> Vec<LoginEffect> {
    if let Some(Overlay::ForgotPassword(form)) = state.overlays.active_overlay_mut() {
        form.email = email;
        form.errors.remove(Field::Email);
        form.submission.clear_validation();
    }
    vec![]
}

pub fn submit(state: &mut LoginState) -> Vec<LoginEffect> {
    let Some(Overlay::ForgotPassword(form)) = state.overlays.active_overlay_mut() else {
        return vec![];
    };
    if form.submission.is_loading {
        tracing::debug!("reset code request already in flight");
        return vec![];
    }
    if let Err(fields) = state.settings.policy.validate_forgot_password_form(&form.email) {
        form.errors = fields.clone();
        form.submission.fail(SubmitError::validation(fields));
        return vec![];
    }
    form.errors.clear();
    form.submission.begin();

    let request = ForgotPasswordRequest {
        email: form.email.trim().to_string(),
    };
    vec![state.start_auth(AuthCall::ForgotPassword(request))]
}

/// Swaps to the code sheet without requesting a new code, so a code that
/// was already emailed stays valid.
pub fn use_existing_code(state: &mut LoginState) -> Vec<LoginEffect> {
    let Some(Overlay::ForgotPassword(form)) = state.overlays.active_overlay_mut() else {
        return vec![];
    };
    if form.submission.is_loading {
        return vec![];
    }
    if let Err(fields) = state.settings.policy.validate_forgot_password_form(&form.email) {
        form.errors = fields.clone();
        form.submission.fail(SubmitError::validation(fields));
        return vec![];
    }
    form.errors.clear();
    form.submission.succeed();
    let email = form.email.trim().to_string();
    tracing::info!("continuing with an existing reset code");
    mount(state, Overlay::OtpVerification(OtpState::new(email)))
}

/// On success the sheet is replaced by the verification code sheet.
pub(super) fn handle_code_sent(
    state: &mut LoginState,
    result: Result<(), SubmitError>,
) -> Vec<LoginEffect> {
    let Some(Overlay::ForgotPassword(form)) = state.overlays.active_overlay_mut() else {
        return vec![];
    };
    match result {
        Ok(()) => {
            form.submission.succeed();
            let email = form.email.trim().to_string();
            tracing::info!("reset code sent");
            mount(state, Overlay::OtpVerification(OtpState::new(email)))
        }
        Err(err) => {
            tracing::info!(kind = ?err.kind(), "reset code request failed");
            form.submission.fail(err);
            vec![]
        }
    }
}
