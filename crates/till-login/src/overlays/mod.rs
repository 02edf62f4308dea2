//! Password reset and "forgot PIN" overlays.
//!
//! Each overlay is a sheet on an [`OverlayStack`] carrying its own form and
//! submission state, so closing or replacing a sheet drops that state with
//! it. Sheets slide in after `overlay_mount` and are unmounted after their
//! exit delay.

pub mod forgot_password;
pub mod forgot_pin;
pub mod new_password;
pub mod otp;
mod stack;
mod update;

pub use forgot_password::ForgotPasswordState;
pub use forgot_pin::FORGOT_PIN_MESSAGE;
pub use new_password::NewPasswordState;
pub use otp::{OtpState, resend_notice};
pub use stack::{Overlay, OverlayKind, OverlaySheet, OverlayStack, OverlayStage, SheetId};
pub use update::{close_overlay, handle_reset_code_sent, reveal_sheet, unmount_sheet};
