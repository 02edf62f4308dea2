//! Login command handlers.

use anyhow::{Context, Result, bail};
use till_login::LoginEvent;
use till_types::Role;

use super::{Session, code_slots, ensure_submitted, ensure_valid, enter, report, settle};

pub async fn admin(session: &Session, email: &str, password: &str) -> Result<()> {
    let mut rt = session.runtime();
    enter(&mut rt, Role::Admin).await?;

    rt.dispatch(LoginEvent::EmailChanged(email.to_string()));
    rt.dispatch(LoginEvent::PasswordChanged(password.to_string()));
    rt.dispatch(LoginEvent::SubmitAdminLogin);
    ensure_valid(&rt.state().admin_form.errors)?;

    settle(&mut rt, |rt| Some(&rt.state().admin_submission)).await?;
    ensure_submitted(Some(&rt.state().admin_submission))?;

    let target = rt
        .navigation()
        .context("login finished without a destination")?
        .to_string();
    report(session, &rt, &format!("Signed in. Continue to {target}"))
}

/// Types the PIN one digit at a time; the fourth digit submits it.
pub async fn manager(session: &Session, pin: &str) -> Result<()> {
    let slots = code_slots(pin);
    if let Err(errors) = session.settings().policy.validate_manager_pin_form(&slots) {
        bail!("{errors}");
    }

    let mut rt = session.runtime();
    enter(&mut rt, Role::Manager).await?;
    for digit in slots.into_iter().flatten() {
        rt.dispatch(LoginEvent::PinKey(digit));
    }

    settle(&mut rt, |rt| Some(&rt.state().pin_submission)).await?;
    ensure_submitted(Some(&rt.state().pin_submission))?;

    let target = rt
        .navigation()
        .context("PIN login finished without a destination")?
        .to_string();
    report(session, &rt, &format!("Signed in. Continue to {target}"))
}
