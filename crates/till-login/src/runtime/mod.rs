//! Login runtime: owns state, runs the event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! Timers and auth calls run as spawned tokio tasks that send a
//! `LoginEvent` to `inbox_tx` when they finish. The runtime drains
//! `inbox_rx` and feeds each event back through the reducer.
//!
//! Every method that executes effects spawns tasks, so it must be called
//! from within a tokio runtime.

mod handlers;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use till_core::auth::AuthService;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::common::TaskCompleted;
use crate::effects::LoginEffect;
use crate::events::LoginEvent;
use crate::state::{LoginSettings, LoginState, LoginView};
use crate::update;

pub struct LoginRuntime {
    state: LoginState,
    auth: Arc<dyn AuthService>,
    /// Inbox sender - spawned tasks send events here.
    inbox_tx: mpsc::UnboundedSender<LoginEvent>,
    inbox_rx: mpsc::UnboundedReceiver<LoginEvent>,
    /// Shared by every pending timer; replaced after each cancel.
    timer_cancel: CancellationToken,
    navigation: Option<String>,
}

impl LoginRuntime {
    pub fn new(settings: LoginSettings, auth: Arc<dyn AuthService>) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            state: LoginState::new(settings),
            auth,
            inbox_tx,
            inbox_rx,
            timer_cancel: CancellationToken::new(),
            navigation: None,
        }
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    pub fn view(&self) -> LoginView {
        self.state.view()
    }

    /// Where the screen navigated to after a successful login, if it did.
    pub fn navigation(&self) -> Option<&str> {
        self.navigation.as_deref()
    }

    /// Runs one event through the reducer and executes the resulting effects.
    pub fn dispatch(&mut self, event: LoginEvent) {
        let effects = update::update(&mut self.state, event);
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Dispatches every event already waiting in the inbox. Returns how many
    /// were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.inbox_rx.try_recv() {
            self.dispatch(event);
            handled += 1;
        }
        handled
    }

    /// Processes inbox events until `done` holds.
    ///
    /// # Errors
    /// Returns an error if `timeout` elapses first.
    pub async fn run_until<F>(&mut self, timeout: Duration, mut done: F) -> Result<()>
    where
        F: FnMut(&Self) -> bool,
    {
        let deadline = Instant::now() + timeout;
        loop {
            self.pump();
            if done(&*self) {
                return Ok(());
            }
            match tokio::time::timeout_at(deadline, self.inbox_rx.recv()).await {
                Ok(Some(event)) => self.dispatch(event),
                Ok(None) => bail!("login event inbox closed"),
                Err(_) => bail!("timed out after {timeout:?} waiting for the login screen"),
            }
        }
    }

    fn execute_effect(&mut self, effect: LoginEffect) {
        match effect {
            LoginEffect::StartTimer { timer, delay } => {
                let tx = self.inbox_tx.clone();
                let cancel = self.timer_cancel.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        () = cancel.cancelled() => {}
                        () = tokio::time::sleep(delay) => {
                            let _ = tx.send(LoginEvent::TimerFired(timer));
                        }
                    }
                });
            }
            LoginEffect::CancelTimers => {
                self.timer_cancel.cancel();
                self.timer_cancel = CancellationToken::new();
            }
            LoginEffect::Auth { task, call } => {
                let kind = call.kind();
                let auth = Arc::clone(&self.auth);
                let tx = self.inbox_tx.clone();
                tokio::spawn(async move {
                    let event = handlers::run_auth_call(auth.as_ref(), call).await;
                    let completed = TaskCompleted {
                        id: task,
                        result: Box::new(event),
                    };
                    let _ = tx.send(LoginEvent::TaskCompleted { kind, completed });
                });
            }
            LoginEffect::Navigate { target } => {
                tracing::info!(%target, "navigating");
                self.navigation = Some(target);
            }
        }
    }
}

impl Drop for LoginRuntime {
    fn drop(&mut self) {
        self.timer_cancel.cancel();
    }
}
