//! Authentication backend access.
//!
//! [`AuthService`] is the seam between the login sequencer and whatever
//! answers the auth calls. [`HttpAuthService`] talks to the REST backend;
//! tests plug in their own implementations.
//!
//! An `Err` from any method means the call never produced a usable answer
//! (connection refused, timeout, unparseable body). A backend that answers
//! `success: false` is an `Ok` response.

mod http;

use anyhow::Result;
use futures_util::future::BoxFuture;
pub use http::{HttpAuthService, resolve_base_url};
use till_types::{
    AdminLoginRequest, AuthResponse, ForgotPasswordRequest, PinLoginRequest, ResetPasswordRequest,
    VerifyOtpRequest,
};

pub trait AuthService: Send + Sync {
    /// Email + password login.
    fn admin_login(&self, request: AdminLoginRequest) -> BoxFuture<'_, Result<AuthResponse>>;

    /// Four-digit PIN login.
    fn pin_login(&self, request: PinLoginRequest) -> BoxFuture<'_, Result<AuthResponse>>;

    /// Sends a verification code to the account's email.
    fn forgot_password(&self, request: ForgotPasswordRequest)
    -> BoxFuture<'_, Result<AuthResponse>>;

    /// Exchanges the emailed code for a reset token.
    fn verify_otp(&self, request: VerifyOtpRequest) -> BoxFuture<'_, Result<AuthResponse>>;

    /// Sets a new password using the reset token.
    fn reset_password(&self, request: ResetPasswordRequest)
    -> BoxFuture<'_, Result<AuthResponse>>;
}
