//! Login effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent timers and I/O only; the reducer never sleeps, spawns or
//! talks to the network itself.
//!
//! ## Timer cancellation
//!
//! `CancelTimers` is emitted whenever the screen returns to role selection.
//! The runtime cancels every pending sleep; timers that already fired are
//! dropped by the reducer's generation check instead.

use std::time::Duration;

use till_types::{
    AdminLoginRequest, ForgotPasswordRequest, PinLoginRequest, ResetPasswordRequest,
    VerifyOtpRequest,
};

use crate::common::{TaskId, TaskKind, Timer};

/// One call to the auth backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCall {
    AdminLogin(AdminLoginRequest),
    PinLogin(PinLoginRequest),
    ForgotPassword(ForgotPasswordRequest),
    VerifyOtp(VerifyOtpRequest),
    ResetPassword(ResetPasswordRequest),
}

impl AuthCall {
    pub fn kind(&self) -> TaskKind {
        match self {
            AuthCall::AdminLogin(_) => TaskKind::AdminLogin,
            AuthCall::PinLogin(_) => TaskKind::PinLogin,
            AuthCall::ForgotPassword(_) => TaskKind::ForgotPassword,
            AuthCall::VerifyOtp(_) => TaskKind::VerifyOtp,
            AuthCall::ResetPassword(_) => TaskKind::ResetPassword,
        }
    }
}

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginEffect {
    /// Post `TimerFired(timer)` back after `delay`.
    StartTimer { timer: Timer, delay: Duration },

    /// Cancel every pending timer.
    CancelTimers,

    /// Run an auth call and post its result as a task completion.
    Auth { task: TaskId, call: AuthCall },

    /// Leave the login screen.
    Navigate { target: String },
}
