use serde::Serialize;
use till_core::error::{FieldErrors, SubmitError, SubmitErrorKind};
use till_core::validation::PIN_LENGTH;

use crate::common::DigitSlots;

/// Shown on the admin form after a completed password reset.
pub const PASSWORD_RESET_NOTICE: &str =
    "Password reset successfully. Please log in with your new password.";

/// Loading flag plus the last failure of one submit button.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionState {
    pub is_loading: bool,
    pub error: Option<SubmitError>,
}

impl SubmissionState {
    pub fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn succeed(&mut self) {
        self.is_loading = false;
        self.error = None;
    }

    pub fn fail(&mut self, error: SubmitError) {
        self.is_loading = false;
        self.error = Some(error);
    }

    /// Drops a local validation failure once the user edits the form.
    /// Backend and network errors stay until the next attempt.
    pub fn clear_validation(&mut self) {
        if self
            .error
            .as_ref()
            .is_some_and(|err| err.kind() == SubmitErrorKind::ValidationFailed)
        {
            self.error = None;
        }
    }

    /// Message to render under the button, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdminLoginForm {
    pub email: String,
    #[serde(skip)]
    pub password: String,
    pub errors: FieldErrors,
    /// Informational banner, e.g. after a password reset.
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PinForm {
    pub digits: DigitSlots<PIN_LENGTH>,
    pub errors: FieldErrors,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_lifecycle() {
        let mut submission = SubmissionState::default();
        submission.fail(SubmitError::rejected("Invalid credentials"));
        assert_eq!(
            submission.error_message().as_deref(),
            Some("Invalid credentials")
        );

        submission.begin();
        assert!(submission.is_loading);
        assert!(submission.error.is_none());

        submission.succeed();
        assert_eq!(submission, SubmissionState::default());
    }

    #[test]
    fn test_editing_drops_only_validation_failures() {
        let mut submission = SubmissionState::default();
        submission.fail(SubmitError::validation(FieldErrors::new()));
        submission.clear_validation();
        assert_eq!(submission.error, None);

        submission.fail(SubmitError::transport());
        submission.clear_validation();
        assert_eq!(submission.error, Some(SubmitError::transport()));
    }

    #[test]
    fn test_password_is_not_serialized() {
        let form = AdminLoginForm {
            email: "a@b.co".into(),
            password: "hunter22".into(),
            ..Default::default()
        };
        let json = serde_json::to_string(&form).unwrap();
        assert!(json.contains("a@b.co"));
        assert!(!json.contains("hunter22"));
    }
}
