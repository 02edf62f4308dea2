//! CLI command handlers.
//!
//! The login and password commands drive a headless `LoginRuntime` through
//! the same events a touch screen would send, then report where it ended.

pub mod config;
pub mod login;
pub mod password;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use serde::Serialize;
use till_core::auth::{AuthService, HttpAuthService};
use till_core::config::Config;
use till_core::error::FieldErrors;
use till_login::features::credentials::SubmissionState;
use till_login::{LoginEvent, LoginRuntime, LoginSettings, LoginView, Phase};
use till_types::Role;

/// Upper bound for any single step of a flow (transition or request).
const STEP_TIMEOUT: Duration = Duration::from_secs(60);

pub struct Session {
    auth: Arc<dyn AuthService>,
    settings: LoginSettings,
    json: bool,
}

impl Session {
    pub fn new(config: &Config, auth_url: Option<&str>, json: bool) -> Result<Self> {
        let auth = match auth_url.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => HttpAuthService::new(url, config.auth.timeout())?,
            None => HttpAuthService::from_config(&config.auth)?,
        };
        tracing::debug!(base_url = auth.base_url(), "auth service ready");

        Ok(Self {
            auth: Arc::new(auth),
            settings: LoginSettings::from_config(config),
            json,
        })
    }

    pub fn settings(&self) -> &LoginSettings {
        &self.settings
    }

    pub fn runtime(&self) -> LoginRuntime {
        LoginRuntime::new(self.settings.clone(), Arc::clone(&self.auth))
    }
}

/// Picks `role` and waits for its login panel.
pub async fn enter(rt: &mut LoginRuntime, role: Role) -> Result<()> {
    rt.dispatch(LoginEvent::SelectRole(role));
    rt.run_until(STEP_TIMEOUT, |rt| rt.state().phase == Phase::login_for(role))
        .await
}

/// Waits until `submission` (selected from the runtime) stops loading.
pub async fn settle<F>(rt: &mut LoginRuntime, submission: F) -> Result<()>
where
    F: Fn(&LoginRuntime) -> Option<&SubmissionState>,
{
    rt.run_until(STEP_TIMEOUT, |rt| {
        rt.navigation().is_some() || submission(rt).is_none_or(|s| !s.is_loading)
    })
    .await
}

/// Fails with the field messages if local validation rejected the input.
pub fn ensure_valid(errors: &FieldErrors) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        bail!("{errors}")
    }
}

/// Splits a typed code into digit slots the way the keypad would see it.
pub fn code_slots(code: &str) -> Vec<Option<char>> {
    code.trim().chars().map(Some).collect()
}

/// Fails with the submission error, if there is one.
pub fn ensure_submitted(submission: Option<&SubmissionState>) -> Result<()> {
    match submission.and_then(|s| s.error.as_ref()) {
        Some(err) => bail!("{err}"),
        None => Ok(()),
    }
}

#[derive(Serialize)]
struct Report<'a> {
    navigation: Option<&'a str>,
    message: &'a str,
    view: LoginView,
}

/// Prints the outcome, either as a line of text or as a JSON report.
pub fn report(session: &Session, rt: &LoginRuntime, message: &str) -> Result<()> {
    if session.json {
        let report = Report {
            navigation: rt.navigation(),
            message,
            view: rt.view(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{message}");
    }
    Ok(())
}
