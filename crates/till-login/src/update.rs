//! Login reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(state, event)`
//! and executes the returned effects.

use crate::common::TimerKind;
use crate::effects::LoginEffect;
use crate::events::LoginEvent;
use crate::features::{credentials, phase};
use crate::overlays::{self, forgot_password, forgot_pin, new_password, otp};
use crate::state::LoginState;

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(state: &mut LoginState, event: LoginEvent) -> Vec<LoginEffect> {
    match event {
        LoginEvent::SelectRole(role) => phase::select_role(state, role),
        LoginEvent::ReturnToRoleSelection => phase::return_to_role_selection(state),
        LoginEvent::TimerFired(timer) => {
            if !state.timers.is_current(&timer) {
                tracing::trace!(?timer, "stale timer dropped");
                return vec![];
            }
            match timer.kind {
                TimerKind::AdvancePhase(role) => phase::advance_phase(state, role),
                TimerKind::RevealLine(role) => {
                    state.reveal.reveal_line(role);
                    vec![]
                }
                TimerKind::RevealOverlay(id) => overlays::reveal_sheet(state, id),
                TimerKind::UnmountOverlay(id) => overlays::unmount_sheet(state, id),
            }
        }

        LoginEvent::EmailChanged(email) => credentials::email_changed(state, email),
        LoginEvent::PasswordChanged(password) => credentials::password_changed(state, password),
        LoginEvent::SubmitAdminLogin => credentials::submit_admin_login(state),

        LoginEvent::PinKey(digit) => credentials::pin_key(state, None, digit),
        LoginEvent::PinDigit { index, digit } => credentials::pin_key(state, Some(index), digit),
        LoginEvent::PinBackspace => credentials::pin_backspace(state),

        LoginEvent::OpenForgotPassword => forgot_password::open(state),
        LoginEvent::OpenForgotPin => forgot_pin::open(state),
        LoginEvent::CloseOverlay => overlays::close_overlay(state),
        LoginEvent::ResetEmailChanged(email) => forgot_password::email_changed(state, email),
        LoginEvent::SubmitForgotPassword => forgot_password::submit(state),
        LoginEvent::UseExistingResetCode => forgot_password::use_existing_code(state),
        LoginEvent::OtpKey(digit) => otp::key(state, None, digit),
        LoginEvent::OtpDigit { index, digit } => otp::key(state, Some(index), digit),
        LoginEvent::OtpBackspace => otp::backspace(state),
        LoginEvent::SubmitOtp => otp::submit(state),
        LoginEvent::ResendOtp => otp::resend(state),
        LoginEvent::NewPasswordChanged(password) => new_password::password_changed(state, password),
        LoginEvent::ConfirmPasswordChanged(confirm) => {
            new_password::confirm_changed(state, confirm)
        }
        LoginEvent::SubmitNewPassword => new_password::submit(state),

        LoginEvent::TaskCompleted { kind, completed } => {
            if !state.tasks.state_mut(kind).finish_if_active(completed.id) {
                tracing::debug!(?kind, task = ?completed.id, "stale task result dropped");
                return vec![];
            }
            update(state, *completed.result)
        }
        LoginEvent::AdminLoginFinished(result) => {
            credentials::handle_admin_login_finished(state, result)
        }
        LoginEvent::PinLoginFinished(result) => {
            credentials::handle_pin_login_finished(state, result)
        }
        LoginEvent::ResetCodeSent(result) => overlays::handle_reset_code_sent(state, result),
        LoginEvent::OtpVerified(result) => otp::handle_verified(state, result),
        LoginEvent::PasswordResetFinished(result) => new_password::handle_reset(state, result),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use till_core::error::{Field, SubmitError, SubmitErrorKind};
    use till_types::{AuthUser, Role};

    use super::*;
    use crate::common::{TaskCompleted, TaskId, TaskKind, Timer};
    use crate::effects::AuthCall;
    use crate::features::phase::Phase;
    use crate::overlays::{FORGOT_PIN_MESSAGE, Overlay, OverlayKind, OverlayStage, resend_notice};

    // ------------------------------------------------------------------
    // Helpers: play effects back into the reducer by hand.
    // ------------------------------------------------------------------

    fn timers(effects: &[LoginEffect]) -> Vec<(Timer, Duration)> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                LoginEffect::StartTimer { timer, delay } => Some((*timer, *delay)),
                _ => None,
            })
            .collect()
    }

    fn fire_all(state: &mut LoginState, effects: &[LoginEffect]) -> Vec<LoginEffect> {
        let mut out = Vec::new();
        for (timer, _) in timers(effects) {
            out.extend(update(state, LoginEvent::TimerFired(timer)));
        }
        out
    }

    fn auth_call(effects: &[LoginEffect]) -> (TaskId, AuthCall) {
        let calls: Vec<_> = effects
            .iter()
            .filter_map(|effect| match effect {
                LoginEffect::Auth { task, call } => Some((*task, call.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(calls.len(), 1, "expected exactly one auth call in {effects:?}");
        calls.into_iter().next().unwrap()
    }

    fn complete(
        state: &mut LoginState,
        task: TaskId,
        kind: TaskKind,
        result: LoginEvent,
    ) -> Vec<LoginEffect> {
        update(
            state,
            LoginEvent::TaskCompleted {
                kind,
                completed: TaskCompleted {
                    id: task,
                    result: Box::new(result),
                },
            },
        )
    }

    fn enter(role: Role) -> LoginState {
        let mut state = LoginState::default();
        let effects = update(&mut state, LoginEvent::SelectRole(role));
        fire_all(&mut state, &effects);
        state
    }

    fn type_pin(state: &mut LoginState, pin: &str) -> Vec<LoginEffect> {
        pin.chars()
            .flat_map(|digit| update(state, LoginEvent::PinKey(digit)))
            .collect()
    }

    // ------------------------------------------------------------------
    // Phase and reveal
    // ------------------------------------------------------------------

    #[test]
    fn test_phase_cycle_closes() {
        for (role, transient, login) in [
            (Role::Admin, Phase::ToGold, Phase::AdminLogin),
            (Role::Manager, Phase::ToBlack, Phase::ManagerLogin),
        ] {
            let mut state = LoginState::default();
            let effects = update(&mut state, LoginEvent::SelectRole(role));
            assert_eq!(state.phase, transient);
            assert_eq!(timers(&effects)[0].1, Duration::from_millis(900));

            fire_all(&mut state, &effects);
            assert_eq!(state.phase, login);

            let effects = update(&mut state, LoginEvent::ReturnToRoleSelection);
            assert_eq!(effects, vec![LoginEffect::CancelTimers]);
            assert_eq!(state.phase, Phase::Idle);
            assert_eq!(state.role, None);
        }
    }

    #[test]
    fn test_select_role_outside_idle_is_ignored() {
        let mut state = LoginState::default();
        update(&mut state, LoginEvent::SelectRole(Role::Admin));
        assert!(update(&mut state, LoginEvent::SelectRole(Role::Manager)).is_empty());
        assert_eq!(state.role, Some(Role::Admin));

        // Back is also ignored mid-transition.
        assert!(update(&mut state, LoginEvent::ReturnToRoleSelection).is_empty());
        assert_eq!(state.phase, Phase::ToGold);
    }

    #[test]
    fn test_line_follows_container() {
        let mut state = LoginState::default();
        let effects = update(&mut state, LoginEvent::SelectRole(Role::Manager));
        let effects = fire_all(&mut state, &effects);

        let flags = state.reveal.flags(Role::Manager);
        assert!(flags.container);
        assert!(!flags.line);
        let line_timers = timers(&effects);
        assert_eq!(line_timers.len(), 1);
        assert_eq!(line_timers[0].1, Duration::from_millis(200));

        fire_all(&mut state, &effects);
        assert!(state.reveal.flags(Role::Manager).line);
        assert!(!state.reveal.flags(Role::Admin).container);
    }

    #[test]
    fn test_stale_timer_after_reset_writes_nothing() {
        let mut state = LoginState::default();
        let select = update(&mut state, LoginEvent::SelectRole(Role::Admin));
        let reveal = fire_all(&mut state, &select);
        update(&mut state, LoginEvent::ReturnToRoleSelection);

        // Both the line timer and a replayed phase timer are stale now.
        fire_all(&mut state, &reveal);
        fire_all(&mut state, &select);

        assert_eq!(state.phase, Phase::Idle);
        assert!(!state.reveal.flags(Role::Admin).container);
        assert!(!state.reveal.flags(Role::Admin).line);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut state = enter(Role::Manager);
        type_pin(&mut state, "12");

        update(&mut state, LoginEvent::ReturnToRoleSelection);
        let once = state.view();
        assert!(update(&mut state, LoginEvent::ReturnToRoleSelection).is_empty());
        assert_eq!(state.view(), once);
        assert_eq!(state.pin_form.digits.filled(), 0);
    }

    // ------------------------------------------------------------------
    // Credential submission
    // ------------------------------------------------------------------

    #[test]
    fn test_admin_scenario_lands_on_dashboard() {
        let mut state = enter(Role::Admin);
        update(&mut state, LoginEvent::EmailChanged("a@b.co".into()));
        update(&mut state, LoginEvent::PasswordChanged("secret1".into()));

        let effects = update(&mut state, LoginEvent::SubmitAdminLogin);
        let (task, call) = auth_call(&effects);
        assert!(matches!(call, AuthCall::AdminLogin(ref req) if req.email == "a@b.co"));

        let effects = complete(
            &mut state,
            task,
            TaskKind::AdminLogin,
            LoginEvent::AdminLoginFinished(Ok(AuthUser::with_role("admin"))),
        );

        assert_eq!(
            effects,
            vec![LoginEffect::Navigate {
                target: "/dashboard".into()
            }]
        );
        assert!(!state.admin_submission.is_loading);
    }

    #[test]
    fn test_cashier_pin_scenario_lands_on_pos() {
        let mut state = enter(Role::Manager);
        let effects = type_pin(&mut state, "1234");
        let (task, call) = auth_call(&effects);
        assert!(matches!(
            call,
            AuthCall::PinLogin(ref req) if req.pin == "1234" && req.role == Role::Manager
        ));

        // Fifth keystroke is rejected.
        assert!(update(&mut state, LoginEvent::PinKey('5')).is_empty());
        assert_eq!(state.pin_form.digits.value(), "1234");

        let effects = complete(
            &mut state,
            task,
            TaskKind::PinLogin,
            LoginEvent::PinLoginFinished(Ok(AuthUser::with_role("cashier"))),
        );
        assert_eq!(
            effects,
            vec![LoginEffect::Navigate {
                target: "/pos".into()
            }]
        );
    }

    #[test]
    fn test_new_submission_clears_previous_error() {
        let mut state = enter(Role::Admin);
        update(&mut state, LoginEvent::EmailChanged("a@b.co".into()));
        update(&mut state, LoginEvent::PasswordChanged("secret1".into()));

        let (task, _) = auth_call(&update(&mut state, LoginEvent::SubmitAdminLogin));
        complete(
            &mut state,
            task,
            TaskKind::AdminLogin,
            LoginEvent::AdminLoginFinished(Err(SubmitError::rejected("Invalid credentials"))),
        );
        assert!(state.admin_submission.error.is_some());

        update(&mut state, LoginEvent::SubmitAdminLogin);
        assert!(state.admin_submission.is_loading);
        assert!(state.admin_submission.error.is_none());
    }

    #[test]
    fn test_stale_auth_result_never_navigates() {
        let mut state = enter(Role::Manager);
        let (task, _) = auth_call(&type_pin(&mut state, "1234"));

        update(&mut state, LoginEvent::ReturnToRoleSelection);
        let effects = complete(
            &mut state,
            task,
            TaskKind::PinLogin,
            LoginEvent::PinLoginFinished(Ok(AuthUser::with_role("manager"))),
        );

        assert!(effects.is_empty());
        assert_eq!(state.phase, Phase::Idle);
        assert!(!state.pin_submission.is_loading);
    }

    #[test]
    fn test_double_submit_issues_one_call() {
        let mut state = enter(Role::Admin);
        update(&mut state, LoginEvent::EmailChanged("a@b.co".into()));
        update(&mut state, LoginEvent::PasswordChanged("secret1".into()));

        let first = update(&mut state, LoginEvent::SubmitAdminLogin);
        let second = update(&mut state, LoginEvent::SubmitAdminLogin);
        auth_call(&first);
        assert!(second.is_empty());
    }

    // ------------------------------------------------------------------
    // Overlays
    // ------------------------------------------------------------------

    #[test]
    fn test_overlays_only_open_from_their_panel() {
        let mut state = enter(Role::Manager);
        assert!(update(&mut state, LoginEvent::OpenForgotPassword).is_empty());

        let effects = update(&mut state, LoginEvent::OpenForgotPin);
        assert!(state.overlays.is_mounted(OverlayKind::ManagerForgotPin));
        assert!(!state.overlays.is_revealed(OverlayKind::ManagerForgotPin));
        fire_all(&mut state, &effects);
        assert!(state.overlays.is_revealed(OverlayKind::ManagerForgotPin));
        assert_eq!(
            FORGOT_PIN_MESSAGE,
            "Please contact your administrator to reset your PIN."
        );

        let effects = update(&mut state, LoginEvent::CloseOverlay);
        assert_eq!(timers(&effects)[0].1, Duration::from_millis(300));
        assert!(state.overlays.is_mounted(OverlayKind::ManagerForgotPin));
        fire_all(&mut state, &effects);
        assert!(!state.overlays.is_mounted(OverlayKind::ManagerForgotPin));
    }

    #[test]
    fn test_pin_pad_is_inert_under_overlay() {
        let mut state = enter(Role::Manager);
        update(&mut state, LoginEvent::OpenForgotPin);
        assert!(type_pin(&mut state, "1234").is_empty());
        assert_eq!(state.pin_form.digits.filled(), 0);
    }

    #[test]
    fn test_full_password_reset_flow() {
        let mut state = enter(Role::Admin);
        update(
            &mut state,
            LoginEvent::EmailChanged("owner@shop.com".into()),
        );

        // Forgot password, prefilled from the login form.
        let effects = update(&mut state, LoginEvent::OpenForgotPassword);
        fire_all(&mut state, &effects);
        assert!(state.overlays.is_revealed(OverlayKind::ForgotPassword));
        let (task, call) = auth_call(&update(&mut state, LoginEvent::SubmitForgotPassword));
        assert!(matches!(call, AuthCall::ForgotPassword(ref req) if req.email == "owner@shop.com"));

        // Swap to the code sheet; both are mounted until the swap delay.
        let swap = complete(
            &mut state,
            task,
            TaskKind::ForgotPassword,
            LoginEvent::ResetCodeSent(Ok(())),
        );
        assert_eq!(state.overlays.active_kind(), Some(OverlayKind::OtpVerification));
        assert!(state.overlays.is_mounted(OverlayKind::ForgotPassword));
        let delays: Vec<_> = timers(&swap).into_iter().map(|(_, d)| d).collect();
        assert_eq!(delays, vec![Duration::from_millis(100), Duration::from_millis(1000)]);
        fire_all(&mut state, &swap);
        assert!(!state.overlays.is_mounted(OverlayKind::ForgotPassword));
        assert!(state.overlays.is_revealed(OverlayKind::OtpVerification));

        // Verify is gated on five digits.
        for digit in "1234".chars() {
            update(&mut state, LoginEvent::OtpKey(digit));
        }
        assert!(update(&mut state, LoginEvent::SubmitOtp).is_empty());
        update(&mut state, LoginEvent::OtpKey('5'));
        let (task, call) = auth_call(&update(&mut state, LoginEvent::SubmitOtp));
        assert!(matches!(call, AuthCall::VerifyOtp(ref req) if req.otp == "12345"));

        let swap = complete(
            &mut state,
            task,
            TaskKind::VerifyOtp,
            LoginEvent::OtpVerified(Ok(Some("reset-token".into()))),
        );
        fire_all(&mut state, &swap);
        assert!(state.overlays.is_revealed(OverlayKind::NewPassword));

        // Mismatched confirmation fails locally.
        update(
            &mut state,
            LoginEvent::NewPasswordChanged("newpass99".into()),
        );
        update(
            &mut state,
            LoginEvent::ConfirmPasswordChanged("newpass98".into()),
        );
        assert!(update(&mut state, LoginEvent::SubmitNewPassword).is_empty());
        let Some(Overlay::NewPassword(form)) = state.overlays.active().map(|s| &s.overlay) else {
            panic!("new password sheet expected");
        };
        assert_eq!(
            form.errors.get(Field::ConfirmPassword),
            Some("Passwords do not match")
        );

        update(
            &mut state,
            LoginEvent::ConfirmPasswordChanged("newpass99".into()),
        );
        let (task, call) = auth_call(&update(&mut state, LoginEvent::SubmitNewPassword));
        assert!(matches!(call, AuthCall::ResetPassword(ref req) if req.token == "reset-token"));

        let close = complete(
            &mut state,
            task,
            TaskKind::ResetPassword,
            LoginEvent::PasswordResetFinished(Ok(())),
        );
        assert_eq!(timers(&close)[0].1, Duration::from_millis(500));
        assert!(!state.overlays.has_active());
        fire_all(&mut state, &close);
        assert_eq!(state.overlays.sheets().count(), 0);
        assert_eq!(
            state.admin_form.notice.as_deref(),
            Some(crate::features::credentials::PASSWORD_RESET_NOTICE)
        );
    }

    #[test]
    fn test_missing_reset_token_falls_back_to_code() {
        let mut state = enter(Role::Admin);
        update(
            &mut state,
            LoginEvent::EmailChanged("owner@shop.com".into()),
        );
        update(&mut state, LoginEvent::OpenForgotPassword);
        let (task, _) = auth_call(&update(&mut state, LoginEvent::SubmitForgotPassword));
        complete(
            &mut state,
            task,
            TaskKind::ForgotPassword,
            LoginEvent::ResetCodeSent(Ok(())),
        );
        for digit in "54321".chars() {
            update(&mut state, LoginEvent::OtpKey(digit));
        }
        let (task, _) = auth_call(&update(&mut state, LoginEvent::SubmitOtp));
        complete(
            &mut state,
            task,
            TaskKind::VerifyOtp,
            LoginEvent::OtpVerified(Ok(None)),
        );

        let Some(Overlay::NewPassword(form)) = state.overlays.active().map(|s| &s.overlay) else {
            panic!("new password sheet expected");
        };
        assert_eq!(form.token, "54321");
        assert_eq!(form.email, "owner@shop.com");
    }

    #[test]
    fn test_resend_clears_digits_and_sets_notice() {
        let mut state = enter(Role::Admin);
        update(&mut state, LoginEvent::OpenForgotPassword);
        update(
            &mut state,
            LoginEvent::ResetEmailChanged("owner@shop.com".into()),
        );
        let (task, _) = auth_call(&update(&mut state, LoginEvent::SubmitForgotPassword));
        complete(
            &mut state,
            task,
            TaskKind::ForgotPassword,
            LoginEvent::ResetCodeSent(Ok(())),
        );
        update(&mut state, LoginEvent::OtpKey('1'));

        let (task, call) = auth_call(&update(&mut state, LoginEvent::ResendOtp));
        assert!(matches!(call, AuthCall::ForgotPassword(ref req) if req.email == "owner@shop.com"));
        complete(
            &mut state,
            task,
            TaskKind::ForgotPassword,
            LoginEvent::ResetCodeSent(Ok(())),
        );

        let Some(Overlay::OtpVerification(form)) = state.overlays.active().map(|s| &s.overlay)
        else {
            panic!("code sheet expected");
        };
        assert_eq!(form.digits.filled(), 0);
        assert_eq!(form.notice, Some(resend_notice("owner@shop.com")));
        assert!(!form.resend.is_loading);
    }

    #[test]
    fn test_closing_overlay_abandons_its_call() {
        let mut state = enter(Role::Admin);
        update(&mut state, LoginEvent::OpenForgotPassword);
        update(
            &mut state,
            LoginEvent::ResetEmailChanged("owner@shop.com".into()),
        );
        let (task, _) = auth_call(&update(&mut state, LoginEvent::SubmitForgotPassword));

        update(&mut state, LoginEvent::CloseOverlay);
        let effects = complete(
            &mut state,
            task,
            TaskKind::ForgotPassword,
            LoginEvent::ResetCodeSent(Ok(())),
        );

        assert!(effects.is_empty());
        assert!(!state.overlays.is_mounted(OverlayKind::OtpVerification));
        assert_eq!(
            state.overlays.outgoing().map(|sheet| sheet.stage),
            Some(OverlayStage::Exiting)
        );
    }

    #[test]
    fn test_existing_code_skips_the_request() {
        let mut state = enter(Role::Admin);
        update(
            &mut state,
            LoginEvent::EmailChanged("owner@shop.com".into()),
        );
        update(&mut state, LoginEvent::OpenForgotPassword);

        let swap = update(&mut state, LoginEvent::UseExistingResetCode);
        assert!(swap.iter().all(|effect| !matches!(effect, LoginEffect::Auth { .. })));
        assert_eq!(
            state.overlays.active_kind(),
            Some(OverlayKind::OtpVerification)
        );
        assert!(!state.tasks.forgot_password.is_running());

        for digit in "12345".chars() {
            update(&mut state, LoginEvent::OtpKey(digit));
        }
        let (_, call) = auth_call(&update(&mut state, LoginEvent::SubmitOtp));
        assert!(matches!(
            call,
            AuthCall::VerifyOtp(ref req) if req.email == "owner@shop.com" && req.otp == "12345"
        ));
    }

    #[test]
    fn test_existing_code_needs_a_valid_email() {
        let mut state = enter(Role::Admin);
        update(&mut state, LoginEvent::OpenForgotPassword);
        update(&mut state, LoginEvent::ResetEmailChanged("owner".into()));

        assert!(update(&mut state, LoginEvent::UseExistingResetCode).is_empty());
        assert_eq!(
            state.overlays.active_kind(),
            Some(OverlayKind::ForgotPassword)
        );
        let Some(Overlay::ForgotPassword(form)) = state.overlays.active().map(|s| &s.overlay) else {
            panic!("forgot password sheet expected");
        };
        assert_eq!(
            form.errors.get(Field::Email),
            Some("Please enter a valid email address")
        );
        assert_eq!(
            form.submission.error.as_ref().map(SubmitError::kind),
            Some(SubmitErrorKind::ValidationFailed)
        );
    }

    #[test]
    fn test_local_failures_are_recorded_as_validation_errors() {
        let mut state = enter(Role::Admin);
        update(&mut state, LoginEvent::SubmitAdminLogin);
        let err = state.admin_submission.error.clone().unwrap();
        assert_eq!(err.kind(), SubmitErrorKind::ValidationFailed);
        assert_eq!(err.to_string(), "Email is required; Password is required");

        // Typing again drops the stale validation failure.
        update(&mut state, LoginEvent::EmailChanged("a".into()));
        assert!(state.admin_submission.error.is_none());
    }

    #[test]
    fn test_invalid_reset_email_stays_local() {
        let mut state = enter(Role::Admin);
        update(&mut state, LoginEvent::OpenForgotPassword);
        assert!(update(&mut state, LoginEvent::SubmitForgotPassword).is_empty());

        let Some(Overlay::ForgotPassword(form)) = state.overlays.active().map(|s| &s.overlay) else {
            panic!("forgot password sheet expected");
        };
        assert_eq!(form.errors.get(Field::Email), Some("Email is required"));
        assert!(!form.submission.is_loading);
        assert!(matches!(
            form.submission.error,
            Some(SubmitError::ValidationFailed { ref fields }) if fields.len() == 1
        ));
    }
}
