//! Admin email/password form and manager PIN pad.

mod state;
mod update;

pub use state::{AdminLoginForm, PASSWORD_RESET_NOTICE, PinForm, SubmissionState};
pub use update::{
    email_changed, handle_admin_login_finished, handle_pin_login_finished, password_changed,
    pin_backspace, pin_key, submit_admin_login,
};
