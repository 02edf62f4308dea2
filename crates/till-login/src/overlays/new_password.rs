use serde::Serialize;
use till_core::error::{Field, FieldErrors, SubmitError};
use till_types::ResetPasswordRequest;

use super::Overlay;
use super::update::close_overlay;
use crate::effects::{AuthCall, LoginEffect};
use crate::features::credentials::{PASSWORD_RESET_NOTICE, SubmissionState};
use crate::state::LoginState;

/// Final reset step: choose and confirm the new password.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewPasswordState {
    pub email: String,
    #[serde(skip)]
    pub token: String,
    #[serde(skip)]
    pub password: String,
    #[serde(skip)]
    pub confirm: String,
    pub errors: FieldErrors,
    pub submission: SubmissionState,
}

impl NewPasswordState {
    pub fn new(email: String, token: String) -> Self {
        Self {
            email,
            token,
            ..Default::default()
        }
    }
}

fn active_form(state: &mut LoginState) -> Option<&mut NewPasswordState> {
    match state.overlays.active_overlay_mut() {
        Some(Overlay::NewPassword(form)) => Some(form),
        _ => None,
    }
}

pub fn password_changed(state: &mut LoginState, password: String) -> Vec<LoginEffect> {
    if let Some(form) = active_form(state) {
        form.password = password;
        form.errors.remove(Field::NewPassword);
        form.submission.clear_validation();
    }
    vec![]
}

pub fn confirm_changed(state: &mut LoginState, confirm: String) -> Vec<LoginEffect> {
    if let Some(form) = active_form(state) {
        form.confirm = confirm;
        form.errors.remove(Field::ConfirmPassword);
        form.submission.clear_validation();
    }
    vec![]
}

pub fn submit(state: &mut LoginState) -> Vec<LoginEffect> {
    let policy = state.settings.policy.clone();
    let Some(form) = active_form(state) else {
        return vec![];
    };
    if form.submission.is_loading {
        return vec![];
    }
    if let Err(fields) = policy.validate_reset_password_form(&form.password, &form.confirm) {
        form.errors = fields.clone();
        form.submission.fail(SubmitError::validation(fields));
        return vec![];
    }
    form.errors.clear();
    form.submission.begin();

    let request = ResetPasswordRequest {
        token: form.token.clone(),
        new_password: form.password.clone(),
    };
    vec![state.start_auth(AuthCall::ResetPassword(request))]
}

/// On success the sheet closes and the admin panel shows a notice.
pub fn handle_reset(state: &mut LoginState, result: Result<(), SubmitError>) -> Vec<LoginEffect> {
    let Some(form) = active_form(state) else {
        return vec![];
    };
    match result {
        Ok(()) => {
            form.submission.succeed();
            state.admin_form.password.clear();
            state.admin_form.notice = Some(PASSWORD_RESET_NOTICE.to_string());
            tracing::info!("password reset completed");
            close_overlay(state)
        }
        Err(err) => {
            tracing::info!(kind = ?err.kind(), "password reset failed");
            form.submission.fail(err);
            vec![]
        }
    }
}
