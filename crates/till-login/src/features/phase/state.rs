use serde::Serialize;
use till_types::Role;

/// Top-level mode of the login screen.
///
/// ```text
/// Idle ──select admin──▶ ToGold ──(timer)──▶ AdminLogin ──back──▶ Idle
/// Idle ──select manager─▶ ToBlack ─(timer)──▶ ManagerLogin ─back──▶ Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Idle,
    /// Background sweeping to black before the manager panel.
    ToBlack,
    /// Background sweeping to gold before the admin panel.
    ToGold,
    AdminLogin,
    ManagerLogin,
}

impl Phase {
    pub fn transition_for(role: Role) -> Self {
        match role {
            Role::Admin => Phase::ToGold,
            Role::Manager => Phase::ToBlack,
        }
    }

    pub fn login_for(role: Role) -> Self {
        match role {
            Role::Admin => Phase::AdminLogin,
            Role::Manager => Phase::ManagerLogin,
        }
    }

    pub fn is_login(self) -> bool {
        matches!(self, Phase::AdminLogin | Phase::ManagerLogin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_phases() {
        assert_eq!(Phase::transition_for(Role::Admin), Phase::ToGold);
        assert_eq!(Phase::transition_for(Role::Manager), Phase::ToBlack);
        assert!(!Phase::ToGold.is_login());
        assert!(Phase::login_for(Role::Manager).is_login());
        assert!(!Phase::Idle.is_login());
    }
}
