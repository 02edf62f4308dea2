//! Shared types for the till workspace.
//!
//! These are the shapes exchanged with the authentication backend plus the
//! small role enums every other crate matches on.

use std::fmt;

use enum_map::Enum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Roles
// ============================================================================

/// Role picked on the role-selection screen.
///
/// Sent to the backend as a hint; the account's real role comes back in
/// [`AuthUser::role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account role reported by the backend after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserRole {
    Admin,
    SuperAdmin,
    Manager,
    Cashier,
    Waiter,
    /// Any role this build does not know about.
    Other(String),
}

impl UserRole {
    pub fn as_str(&self) -> &str {
        match self {
            UserRole::Admin => "admin",
            UserRole::SuperAdmin => "superadmin",
            UserRole::Manager => "manager",
            UserRole::Cashier => "cashier",
            UserRole::Waiter => "waiter",
            UserRole::Other(other) => other,
        }
    }
}

impl From<String> for UserRole {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => UserRole::Admin,
            "superadmin" | "super_admin" | "super-admin" => UserRole::SuperAdmin,
            "manager" => UserRole::Manager,
            "cashier" => UserRole::Cashier,
            "waiter" => UserRole::Waiter,
            _ => UserRole::Other(value),
        }
    }
}

impl From<&str> for UserRole {
    fn from(value: &str) -> Self {
        UserRole::from(value.to_string())
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Authenticated account returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Backend identifier, numeric or string depending on the deployment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: UserRole,
}

impl AuthUser {
    pub fn with_role(role: impl Into<UserRole>) -> Self {
        Self {
            id: None,
            name: None,
            email: None,
            role: role.into(),
        }
    }
}

/// Envelope every auth endpoint answers with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthUser>,
    /// Reset token handed out by OTP verification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Field-keyed validation messages from the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Map<String, Value>>,
}

impl AuthResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn ok_with_user(user: AuthUser) -> Self {
        Self {
            success: true,
            user: Some(user),
            ..Self::default()
        }
    }

    /// Joins every value of `errors` into one line.
    ///
    /// Array values contribute each of their items. Returns `None` when the
    /// map is absent or every value is empty.
    pub fn joined_errors(&self) -> Option<String> {
        let errors = self.errors.as_ref()?;
        let mut parts = Vec::new();
        for value in errors.values() {
            collect_error_text(value, &mut parts);
        }
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

fn collect_error_text(value: &Value, parts: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::String(s) => {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_error_text(item, parts);
            }
        }
        other => parts.push(other.to_string()),
    }
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinLoginRequest {
    pub pin: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}
