use super::Overlay;
use super::update::mount;
use crate::effects::LoginEffect;
use crate::features::phase::Phase;
use crate::state::LoginState;

/// PINs are managed by an administrator; there is no self-service reset.
pub const FORGOT_PIN_MESSAGE: &str = "Please contact your administrator to reset your PIN.";

pub fn open(state: &mut LoginState) -> Vec<LoginEffect> {
    if state.phase != Phase::ManagerLogin
        || state.overlays.has_active()
        || state.pin_submission.is_loading
    {
        return vec![];
    }
    mount(state, Overlay::ManagerForgotPin)
}
