//! Login screen state.
//!
//! `LoginState` is owned by the runtime and mutated only by the reducer.
//! `LoginView` is the read-only snapshot a presentation layer renders from.

use enum_map::EnumMap;
use serde::Serialize;
use till_core::config::{Config, Timings};
use till_core::routing::Routes;
use till_core::validation::ValidationPolicy;
use till_types::Role;

use crate::common::{Generation, TaskSeq, Tasks};
use crate::effects::{AuthCall, LoginEffect};
use crate::features::credentials::{AdminLoginForm, PinForm, SubmissionState};
use crate::features::phase::Phase;
use crate::features::reveal::{RevealFlags, RevealSequencer};
use crate::overlays::{Overlay, OverlaySheet, OverlayStack};

/// Everything configurable about the screen's behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginSettings {
    pub timings: Timings,
    pub routes: Routes,
    pub policy: ValidationPolicy,
}

impl LoginSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timings: config.timings.clone(),
            routes: config.routes.clone(),
            policy: config.validation.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct LoginState {
    pub phase: Phase,
    /// Role picked on the selection screen, kept through the transition.
    pub role: Option<Role>,
    pub reveal: RevealSequencer,
    pub overlays: OverlayStack,

    pub admin_form: AdminLoginForm,
    pub admin_submission: SubmissionState,
    pub pin_form: PinForm,
    pub pin_submission: SubmissionState,

    pub timers: Generation,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,

    pub settings: LoginSettings,
}

impl LoginState {
    pub fn new(settings: LoginSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Allocates a task id, marks the call's kind as running and returns the
    /// effect that performs it.
    pub fn start_auth(&mut self, call: AuthCall) -> LoginEffect {
        let task = self.task_seq.next_id();
        self.tasks.state_mut(call.kind()).start(task);
        tracing::debug!(kind = ?call.kind(), ?task, "auth call started");
        LoginEffect::Auth { task, call }
    }

    pub fn clear_errors(&mut self) {
        self.admin_form.errors.clear();
        self.admin_submission.error = None;
        self.pin_form.errors.clear();
        self.pin_submission.error = None;
    }

    /// Back to a fresh role selection screen.
    ///
    /// Pending timers become stale and in-flight calls are abandoned; the
    /// task id sequence keeps counting so their completions can't match.
    pub fn reset_to_idle(&mut self) {
        self.phase = Phase::Idle;
        self.role = None;
        self.reveal.reset();
        self.overlays.clear();
        self.admin_form = AdminLoginForm::default();
        self.admin_submission = SubmissionState::default();
        self.pin_form = PinForm::default();
        self.pin_submission = SubmissionState::default();
        self.tasks.clear_all();
        self.timers.bump();
    }

    pub fn view(&self) -> LoginView {
        LoginView {
            phase: self.phase,
            role: self.role,
            reveal: EnumMap::from_fn(|role| self.reveal.flags(role)),
            overlays: self.overlays.sheets().cloned().collect(),
            admin_form: self.admin_form.clone(),
            admin_submission: self.admin_submission.clone(),
            pin_form: self.pin_form.clone(),
            pin_submission: self.pin_submission.clone(),
        }
    }
}

/// Serializable snapshot of everything a login screen renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginView {
    pub phase: Phase,
    pub role: Option<Role>,
    pub reveal: EnumMap<Role, RevealFlags>,
    /// Outgoing sheet first, then the active one.
    pub overlays: Vec<OverlaySheet>,
    pub admin_form: AdminLoginForm,
    pub admin_submission: SubmissionState,
    pub pin_form: PinForm,
    pub pin_submission: SubmissionState,
}

impl LoginView {
    pub fn is_loading(&self) -> bool {
        self.admin_submission.is_loading
            || self.pin_submission.is_loading
            || self.overlays.iter().any(|sheet| match &sheet.overlay {
                Overlay::ForgotPassword(form) => form.submission.is_loading,
                Overlay::OtpVerification(form) => {
                    form.submission.is_loading || form.resend.is_loading
                }
                Overlay::NewPassword(form) => form.submission.is_loading,
                Overlay::ManagerForgotPin => false,
            })
    }
}
