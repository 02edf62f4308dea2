//! Events fed to the reducer.
//!
//! User intents come from the presentation layer (or the CLI), timer and
//! task events come back from the runtime inbox.

use till_core::error::SubmitError;
use till_types::{AuthUser, Role};

use crate::common::{TaskCompleted, TaskKind, Timer};

#[derive(Debug)]
pub enum LoginEvent {
    // ------------------------------------------------------------------
    // Phase
    // ------------------------------------------------------------------
    SelectRole(Role),
    ReturnToRoleSelection,
    TimerFired(Timer),

    // ------------------------------------------------------------------
    // Admin login form
    // ------------------------------------------------------------------
    EmailChanged(String),
    PasswordChanged(String),
    SubmitAdminLogin,

    // ------------------------------------------------------------------
    // Manager PIN pad
    // ------------------------------------------------------------------
    /// Next digit into the first empty slot.
    PinKey(char),
    /// Digit typed into a specific slot.
    PinDigit {
        index: usize,
        digit: char,
    },
    PinBackspace,

    // ------------------------------------------------------------------
    // Overlays
    // ------------------------------------------------------------------
    OpenForgotPassword,
    OpenForgotPin,
    CloseOverlay,
    ResetEmailChanged(String),
    SubmitForgotPassword,
    /// Skip the request and go straight to the code sheet, for a code that
    /// was already emailed.
    UseExistingResetCode,
    OtpKey(char),
    OtpDigit {
        index: usize,
        digit: char,
    },
    OtpBackspace,
    SubmitOtp,
    ResendOtp,
    NewPasswordChanged(String),
    ConfirmPasswordChanged(String),
    SubmitNewPassword,

    // ------------------------------------------------------------------
    // Task lifecycle
    // ------------------------------------------------------------------
    /// Wraps one of the result events below; dropped if the task is stale.
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<LoginEvent>>,
    },
    AdminLoginFinished(Result<AuthUser, SubmitError>),
    PinLoginFinished(Result<AuthUser, SubmitError>),
    ResetCodeSent(Result<(), SubmitError>),
    /// Carries the reset token, if the backend issued one.
    OtpVerified(Result<Option<String>, SubmitError>),
    PasswordResetFinished(Result<(), SubmitError>),
}
