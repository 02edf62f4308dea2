//! Phase controller reducer.

use till_types::Role;

use super::Phase;
use crate::common::TimerKind;
use crate::effects::LoginEffect;
use crate::state::LoginState;

/// Starts the transition into a role's login panel.
///
/// Only valid from `Idle`; anything else is ignored.
pub fn select_role(state: &mut LoginState, role: Role) -> Vec<LoginEffect> {
    if state.phase != Phase::Idle {
        tracing::debug!(phase = ?state.phase, %role, "role selection ignored");
        return vec![];
    }

    state.role = Some(role);
    state.phase = Phase::transition_for(role);
    state.clear_errors();
    tracing::info!(%role, "role selected");

    vec![LoginEffect::StartTimer {
        timer: state.timers.timer(TimerKind::AdvancePhase(role)),
        delay: state.settings.timings.phase_transition(),
    }]
}

/// Lands on the login panel once the background transition has played.
pub fn advance_phase(state: &mut LoginState, role: Role) -> Vec<LoginEffect> {
    if state.phase != Phase::transition_for(role) || state.role != Some(role) {
        return vec![];
    }

    state.phase = Phase::login_for(role);
    vec![
        state
            .reveal
            .start(role, state.timers, &state.settings.timings),
    ]
}

/// Goes back to role selection, discarding everything entered so far.
///
/// A no-op from `Idle` (so repeated calls are harmless) and while a
/// transition is still playing.
pub fn return_to_role_selection(state: &mut LoginState) -> Vec<LoginEffect> {
    match state.phase {
        Phase::Idle => vec![],
        Phase::ToBlack | Phase::ToGold => {
            tracing::debug!(phase = ?state.phase, "return ignored during transition");
            vec![]
        }
        Phase::AdminLogin | Phase::ManagerLogin => {
            state.reset_to_idle();
            tracing::info!("returned to role selection");
            vec![LoginEffect::CancelTimers]
        }
    }
}
