//! Post-login destination routing.

use serde::{Deserialize, Serialize};
use till_types::UserRole;

/// Destination paths keyed by account role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Routes {
    pub admin: String,
    pub manager: String,
    pub cashier: String,
    pub waiter: String,
    pub fallback: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            admin: "/dashboard".to_string(),
            manager: "/manager".to_string(),
            cashier: "/pos".to_string(),
            waiter: "/waiter".to_string(),
            fallback: "/dashboard".to_string(),
        }
    }
}

impl Routes {
    /// Destination after an email/password login.
    ///
    /// Every role lands on the admin destination, superadmin included.
    pub fn admin_destination(&self, _role: &UserRole) -> &str {
        &self.admin
    }

    /// Destination after a PIN login.
    pub fn pin_destination(&self, role: &UserRole) -> &str {
        match role {
            UserRole::Manager => &self.manager,
            UserRole::Cashier => &self.cashier,
            UserRole::Waiter => &self.waiter,
            UserRole::Admin | UserRole::SuperAdmin | UserRole::Other(_) => &self.fallback,
        }
    }
}
