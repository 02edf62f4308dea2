//! Credential submitter reducer.

use till_core::error::{Field, SubmitError};
use till_types::{AdminLoginRequest, AuthUser, PinLoginRequest, Role};

use super::{AdminLoginForm, PinForm};
use crate::effects::{AuthCall, LoginEffect};
use crate::features::phase::Phase;
use crate::state::LoginState;

fn admin_form_active(state: &LoginState) -> bool {
    state.phase == Phase::AdminLogin && !state.overlays.has_active()
}

fn pin_pad_active(state: &LoginState) -> bool {
    state.phase == Phase::ManagerLogin && !state.overlays.has_active()
}

pub fn email_changed(state: &mut LoginState, email: String) -> Vec<LoginEffect> {
    if admin_form_active(state) {
        state.admin_form.email = email;
        state.admin_form.errors.remove(Field::Email);
        state.admin_submission.clear_validation();
    }
    vec![]
}

pub fn password_changed(state: &mut LoginState, password: String) -> Vec<LoginEffect> {
    if admin_form_active(state) {
        state.admin_form.password = password;
        state.admin_form.errors.remove(Field::Password);
        state.admin_submission.clear_validation();
    }
    vec![]
}

/// Validates the admin form and, if it passes, starts the login call.
pub fn submit_admin_login(state: &mut LoginState) -> Vec<LoginEffect> {
    if !admin_form_active(state) {
        return vec![];
    }
    if state.tasks.admin_login.is_running() {
        tracing::debug!("admin login already in flight");
        return vec![];
    }

    let form = &mut state.admin_form;
    if let Err(fields) = state
        .settings
        .policy
        .validate_admin_login_form(&form.email, &form.password)
    {
        tracing::debug!(%fields, "admin login form invalid");
        form.errors = fields.clone();
        state.admin_submission.fail(SubmitError::validation(fields));
        return vec![];
    }
    form.errors.clear();
    form.notice = None;

    let request = AdminLoginRequest {
        email: form.email.trim().to_string(),
        password: form.password.clone(),
        role: Role::Admin,
    };
    state.admin_submission.begin();
    vec![state.start_auth(AuthCall::AdminLogin(request))]
}

pub fn handle_admin_login_finished(
    state: &mut LoginState,
    result: Result<AuthUser, SubmitError>,
) -> Vec<LoginEffect> {
    match result {
        Ok(user) => {
            state.admin_submission.succeed();
            state.admin_form = AdminLoginForm::default();
            let target = state.settings.routes.admin_destination(&user.role).to_string();
            tracing::info!(role = %user.role, %target, "admin login succeeded");
            vec![LoginEffect::Navigate { target }]
        }
        Err(err) => {
            tracing::info!(kind = ?err.kind(), "admin login failed");
            state.admin_submission.fail(err);
            vec![]
        }
    }
}

/// Types a PIN digit. `index` targets a specific slot; `None` fills the next
/// empty one. Completing the PIN submits it.
pub fn pin_key(state: &mut LoginState, index: Option<usize>, digit: char) -> Vec<LoginEffect> {
    if !pin_pad_active(state) {
        return vec![];
    }
    if state.tasks.pin_login.is_running() {
        tracing::debug!("PIN login in flight, keystroke ignored");
        return vec![];
    }

    let digits = &mut state.pin_form.digits;
    let accepted = match index {
        Some(index) => digits.set(index, digit),
        None => digits.push(digit),
    };
    if !accepted {
        return vec![];
    }
    state.pin_form.errors.clear();
    state.pin_submission.clear_validation();

    if state.pin_form.digits.is_complete() {
        submit_pin(state)
    } else {
        vec![]
    }
}

pub fn pin_backspace(state: &mut LoginState) -> Vec<LoginEffect> {
    if pin_pad_active(state) && !state.tasks.pin_login.is_running() {
        state.pin_form.digits.backspace();
        state.pin_form.errors.clear();
        state.pin_submission.clear_validation();
    }
    vec![]
}

fn submit_pin(state: &mut LoginState) -> Vec<LoginEffect> {
    let form = &mut state.pin_form;
    if let Err(fields) = state
        .settings
        .policy
        .validate_manager_pin_form(form.digits.as_slice())
    {
        form.errors = fields.clone();
        state.pin_submission.fail(SubmitError::validation(fields));
        return vec![];
    }

    let request = PinLoginRequest {
        pin: form.digits.value(),
        role: Role::Manager,
    };
    state.pin_submission.begin();
    vec![state.start_auth(AuthCall::PinLogin(request))]
}

/// On failure the PIN is cleared so the next attempt starts from an empty pad.
pub fn handle_pin_login_finished(
    state: &mut LoginState,
    result: Result<AuthUser, SubmitError>,
) -> Vec<LoginEffect> {
    match result {
        Ok(user) => {
            state.pin_submission.succeed();
            state.pin_form = PinForm::default();
            let target = state.settings.routes.pin_destination(&user.role).to_string();
            tracing::info!(role = %user.role, %target, "PIN login succeeded");
            vec![LoginEffect::Navigate { target }]
        }
        Err(err) => {
            tracing::info!(kind = ?err.kind(), "PIN login failed");
            state.pin_submission.fail(err);
            state.pin_form.digits.clear();
            vec![]
        }
    }
}
