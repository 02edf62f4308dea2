//! Local form validation.
//!
//! Pure checks run before any request leaves the process. Each returns the
//! full set of field messages so a form can show all of them at once.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Field, FieldErrors};

/// Number of digit slots in a manager PIN.
pub const PIN_LENGTH: usize = 4;

/// Number of digit slots in an emailed verification code.
pub const OTP_LENGTH: usize = 5;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Tunable validation rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Minimum length accepted on the login form.
    pub min_password_length: usize,
    /// Minimum length for a newly chosen password.
    pub min_new_password_length: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            min_password_length: 6,
            min_new_password_length: 8,
        }
    }
}

impl ValidationPolicy {
    pub fn validate_admin_login_form(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check_email(email, &mut errors);

        if password.is_empty() {
            errors.insert(Field::Password, "Password is required");
        } else if password.chars().count() < self.min_password_length {
            errors.insert(
                Field::Password,
                format!(
                    "Password must be at least {} characters",
                    self.min_password_length
                ),
            );
        }

        errors.into_result()
    }

    pub fn validate_manager_pin_form(&self, digits: &[Option<char>]) -> Result<(), FieldErrors> {
        check_digits(
            digits,
            PIN_LENGTH,
            Field::Pin,
            "Please enter all 4 digits",
            "PIN must contain only digits",
        )
    }

    pub fn validate_forgot_password_form(&self, email: &str) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check_email(email, &mut errors);
        errors.into_result()
    }

    pub fn validate_otp_form(&self, digits: &[Option<char>]) -> Result<(), FieldErrors> {
        check_digits(
            digits,
            OTP_LENGTH,
            Field::Otp,
            "Please enter the 5-digit code",
            "Code must contain only digits",
        )
    }

    pub fn validate_reset_password_form(
        &self,
        password: &str,
        confirm: &str,
    ) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if password.is_empty() {
            errors.insert(Field::NewPassword, "Password is required");
        } else if password.chars().count() < self.min_new_password_length {
            errors.insert(
                Field::NewPassword,
                format!(
                    "Password must be at least {} characters",
                    self.min_new_password_length
                ),
            );
        } else if !password.chars().any(char::is_alphabetic)
            || !password.chars().any(|c| c.is_ascii_digit())
        {
            errors.insert(
                Field::NewPassword,
                "Password must contain at least one letter and one number",
            );
        }

        if confirm.is_empty() {
            errors.insert(Field::ConfirmPassword, "Please confirm your password");
        } else if confirm != password {
            errors.insert(Field::ConfirmPassword, "Passwords do not match");
        }

        errors.into_result()
    }
}

fn check_email(email: &str, errors: &mut FieldErrors) {
    let email = email.trim();
    if email.is_empty() {
        errors.insert(Field::Email, "Email is required");
    } else if !EMAIL_RE.is_match(email) {
        errors.insert(Field::Email, "Please enter a valid email address");
    }
}

fn check_digits(
    digits: &[Option<char>],
    expected: usize,
    field: Field,
    incomplete: &str,
    not_numeric: &str,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if digits.len() != expected || digits.iter().any(Option::is_none) {
        errors.insert(field, incomplete);
    } else if !digits.iter().flatten().all(char::is_ascii_digit) {
        errors.insert(field, not_numeric);
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(s: &str) -> Vec<Option<char>> {
        s.chars().map(|c| (c != '_').then_some(c)).collect()
    }

    #[test]
    fn test_admin_form_requires_both_fields() {
        let policy = ValidationPolicy::default();
        let errors = policy.validate_admin_login_form("", "").unwrap_err();
        assert_eq!(errors.get(Field::Email), Some("Email is required"));
        assert_eq!(errors.get(Field::Password), Some("Password is required"));
    }

    #[test]
    fn test_admin_form_checks_shape() {
        let policy = ValidationPolicy::default();
        let errors = policy
            .validate_admin_login_form("not-an-email", "abc")
            .unwrap_err();
        assert_eq!(
            errors.get(Field::Email),
            Some("Please enter a valid email address")
        );
        assert_eq!(
            errors.get(Field::Password),
            Some("Password must be at least 6 characters")
        );
        assert!(
            policy
                .validate_admin_login_form(" a@b.com ", "secret123")
                .is_ok()
        );
    }

    #[test]
    fn test_pin_form() {
        let policy = ValidationPolicy::default();
        assert!(policy.validate_manager_pin_form(&slots("1234")).is_ok());
        assert_eq!(
            policy
                .validate_manager_pin_form(&slots("12_4"))
                .unwrap_err()
                .get(Field::Pin),
            Some("Please enter all 4 digits")
        );
        assert_eq!(
            policy
                .validate_manager_pin_form(&slots("12a4"))
                .unwrap_err()
                .get(Field::Pin),
            Some("PIN must contain only digits")
        );
        assert!(policy.validate_manager_pin_form(&slots("12345")).is_err());
    }

    #[test]
    fn test_otp_form() {
        let policy = ValidationPolicy::default();
        assert!(policy.validate_otp_form(&slots("12345")).is_ok());
        assert!(policy.validate_otp_form(&slots("1234_")).is_err());
    }

    #[test]
    fn test_reset_password_form() {
        let policy = ValidationPolicy::default();
        assert!(
            policy
                .validate_reset_password_form("newpass123", "newpass123")
                .is_ok()
        );

        let errors = policy
            .validate_reset_password_form("short1", "")
            .unwrap_err();
        assert_eq!(
            errors.get(Field::NewPassword),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(
            errors.get(Field::ConfirmPassword),
            Some("Please confirm your password")
        );

        let errors = policy
            .validate_reset_password_form("onlyletters", "different")
            .unwrap_err();
        assert_eq!(
            errors.get(Field::NewPassword),
            Some("Password must contain at least one letter and one number")
        );
        assert_eq!(
            errors.get(Field::ConfirmPassword),
            Some("Passwords do not match")
        );
    }
}
