//! Auth call handler.
//!
//! Turns an `AuthService` answer into the result event the reducer expects.
//! Transport errors are logged here and replaced by the generic network
//! message; the cause is never shown to the user.

use anyhow::Result;
use till_core::auth::AuthService;
use till_core::error::SubmitError;
use till_types::{AuthResponse, AuthUser};

use crate::effects::AuthCall;
use crate::events::LoginEvent;

const ADMIN_LOGIN_FALLBACK: &str = "Login failed";
const PIN_LOGIN_FALLBACK: &str = "PIN login failed";
const FORGOT_PASSWORD_FALLBACK: &str = "Failed to send reset code";
const VERIFY_OTP_FALLBACK: &str = "Invalid verification code";
const RESET_PASSWORD_FALLBACK: &str = "Failed to reset password";

pub async fn run_auth_call(auth: &dyn AuthService, call: AuthCall) -> LoginEvent {
    match call {
        AuthCall::AdminLogin(request) => {
            let response = auth.admin_login(request).await;
            LoginEvent::AdminLoginFinished(
                answer(response, "admin login")
                    .and_then(|response| signed_in_user(response, ADMIN_LOGIN_FALLBACK)),
            )
        }
        AuthCall::PinLogin(request) => {
            let response = auth.pin_login(request).await;
            LoginEvent::PinLoginFinished(
                answer(response, "PIN login")
                    .and_then(|response| signed_in_user(response, PIN_LOGIN_FALLBACK)),
            )
        }
        AuthCall::ForgotPassword(request) => {
            let response = auth.forgot_password(request).await;
            LoginEvent::ResetCodeSent(
                answer(response, "forgot password")
                    .and_then(|response| accepted(&response, FORGOT_PASSWORD_FALLBACK)),
            )
        }
        AuthCall::VerifyOtp(request) => {
            let response = auth.verify_otp(request).await;
            LoginEvent::OtpVerified(answer(response, "verify code").and_then(|response| {
                accepted(&response, VERIFY_OTP_FALLBACK)?;
                Ok(response.token.filter(|token| !token.trim().is_empty()))
            }))
        }
        AuthCall::ResetPassword(request) => {
            let response = auth.reset_password(request).await;
            LoginEvent::PasswordResetFinished(
                answer(response, "reset password")
                    .and_then(|response| accepted(&response, RESET_PASSWORD_FALLBACK)),
            )
        }
    }
}

fn answer(response: Result<AuthResponse>, operation: &str) -> Result<AuthResponse, SubmitError> {
    response.map_err(|err| {
        tracing::warn!(operation, error = %format!("{err:#}"), "auth call failed");
        SubmitError::transport()
    })
}

fn accepted(response: &AuthResponse, fallback: &str) -> Result<(), SubmitError> {
    if response.success {
        Ok(())
    } else {
        Err(SubmitError::from_rejection(response, fallback))
    }
}

/// A login only counts when the backend both succeeds and names the user.
fn signed_in_user(response: AuthResponse, fallback: &str) -> Result<AuthUser, SubmitError> {
    match response.user {
        Some(user) if response.success => Ok(user),
        _ => Err(SubmitError::from_rejection(&response, fallback)),
    }
}
