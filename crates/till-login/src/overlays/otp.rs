use serde::Serialize;
use till_core::error::{FieldErrors, SubmitError};
use till_core::validation::OTP_LENGTH;
use till_types::{ForgotPasswordRequest, VerifyOtpRequest};

use super::Overlay;
use super::new_password::NewPasswordState;
use super::update::mount;
use crate::common::DigitSlots;
use crate::effects::{AuthCall, LoginEffect};
use crate::features::credentials::SubmissionState;
use crate::state::LoginState;

pub fn resend_notice(email: &str) -> String {
    format!("A new code has been sent to {email}")
}

/// Verification code sheet for the email a reset code was sent to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OtpState {
    pub email: String,
    pub digits: DigitSlots<OTP_LENGTH>,
    pub errors: FieldErrors,
    pub submission: SubmissionState,
    /// Resend runs independently of verification.
    pub resend: SubmissionState,
    pub notice: Option<String>,
}

impl OtpState {
    pub fn new(email: String) -> Self {
        Self {
            email,
            ..Default::default()
        }
    }

    /// The verify button is enabled only with every slot filled.
    pub fn can_verify(&self) -> bool {
        self.digits.is_complete() && !self.submission.is_loading
    }

    fn is_busy(&self) -> bool {
        self.submission.is_loading || self.resend.is_loading
    }
}

fn active_form(state: &mut LoginState) -> Option<&mut OtpState> {
    match state.overlays.active_overlay_mut() {
        Some(Overlay::OtpVerification(form)) => Some(form),
        _ => None,
    }
}

pub fn key(state: &mut LoginState, index: Option<usize>, digit: char) -> Vec<LoginEffect> {
    if let Some(form) = active_form(state)
        && !form.is_busy()
    {
        let accepted = match index {
            Some(index) => form.digits.set(index, digit),
            None => form.digits.push(digit),
        };
        if accepted {
            form.errors.clear();
            form.submission.clear_validation();
        }
    }
    vec![]
}

pub fn backspace(state: &mut LoginState) -> Vec<LoginEffect> {
    if let Some(form) = active_form(state)
        && !form.is_busy()
    {
        form.digits.backspace();
        form.errors.clear();
        form.submission.clear_validation();
    }
    vec![]
}

/// Verifies the typed code. Does nothing until all five digits are present.
pub fn submit(state: &mut LoginState) -> Vec<LoginEffect> {
    let policy = state.settings.policy.clone();
    let Some(form) = active_form(state) else {
        return vec![];
    };
    if !form.can_verify() {
        tracing::debug!(filled = form.digits.filled(), "verification code incomplete");
        return vec![];
    }
    if let Err(fields) = policy.validate_otp_form(form.digits.as_slice()) {
        form.errors = fields.clone();
        form.submission.fail(SubmitError::validation(fields));
        return vec![];
    }
    form.notice = None;
    form.submission.begin();

    let request = VerifyOtpRequest {
        email: form.email.clone(),
        otp: form.digits.value(),
    };
    vec![state.start_auth(AuthCall::VerifyOtp(request))]
}

/// Sends a fresh code to the same email.
pub fn resend(state: &mut LoginState) -> Vec<LoginEffect> {
    let Some(form) = active_form(state) else {
        return vec![];
    };
    if form.is_busy() {
        return vec![];
    }
    form.notice = None;
    form.resend.begin();

    let request = ForgotPasswordRequest {
        email: form.email.clone(),
    };
    vec![state.start_auth(AuthCall::ForgotPassword(request))]
}

pub(super) fn handle_resent(
    state: &mut LoginState,
    result: Result<(), SubmitError>,
) -> Vec<LoginEffect> {
    if let Some(form) = active_form(state) {
        match result {
            Ok(()) => {
                form.resend.succeed();
                form.digits.clear();
                form.errors.clear();
                form.notice = Some(resend_notice(&form.email));
                tracing::info!("verification code resent");
            }
            Err(err) => {
                tracing::info!(kind = ?err.kind(), "verification code resend failed");
                form.resend.fail(err);
            }
        }
    }
    vec![]
}

/// On success the sheet is replaced by the new password sheet. If the
/// backend returns no token the code itself is used to authorize the reset.
pub fn handle_verified(
    state: &mut LoginState,
    result: Result<Option<String>, SubmitError>,
) -> Vec<LoginEffect> {
    let Some(form) = active_form(state) else {
        return vec![];
    };
    match result {
        Ok(token) => {
            form.submission.succeed();
            let token = token.unwrap_or_else(|| form.digits.value());
            let next = NewPasswordState::new(form.email.clone(), token);
            tracing::info!("verification code accepted");
            mount(state, Overlay::NewPassword(next))
        }
        Err(err) => {
            tracing::info!(kind = ?err.kind(), "verification code rejected");
            form.submission.fail(err);
            form.digits.clear();
            vec![]
        }
    }
}
