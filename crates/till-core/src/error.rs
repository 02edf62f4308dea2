//! Submission error taxonomy.
//!
//! Every failed login/reset attempt ends in exactly one [`SubmitError`]:
//! local validation, a rejection from the backend, or a transport failure.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use till_types::AuthResponse;

/// Shown for any transport or unexpected failure. The cause is logged, not displayed.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and try again.";

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Email,
    Password,
    Pin,
    Otp,
    NewPassword,
    ConfirmPassword,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Password => "password",
            Field::Pin => "pin",
            Field::Otp => "otp",
            Field::NewPassword => "new_password",
            Field::ConfirmPassword => "confirm_password",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-keyed validation messages, ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `field`. The first message for a field wins.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    pub fn remove(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// `Ok(())` when empty, otherwise the errors themselves.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (_, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            f.write_str(message)?;
            first = false;
        }
        Ok(())
    }
}

/// Discriminant of [`SubmitError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitErrorKind {
    ValidationFailed,
    RemoteRejected,
    TransportFailure,
}

/// Why a submission attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmitError {
    /// Local validation failed; nothing was sent.
    ValidationFailed { fields: FieldErrors },
    /// The backend answered with `success: false`.
    RemoteRejected { message: String },
    /// The request never produced a usable answer.
    TransportFailure { message: String },
}

impl SubmitError {
    pub fn kind(&self) -> SubmitErrorKind {
        match self {
            SubmitError::ValidationFailed { .. } => SubmitErrorKind::ValidationFailed,
            SubmitError::RemoteRejected { .. } => SubmitErrorKind::RemoteRejected,
            SubmitError::TransportFailure { .. } => SubmitErrorKind::TransportFailure,
        }
    }

    pub fn validation(fields: FieldErrors) -> Self {
        SubmitError::ValidationFailed { fields }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        SubmitError::RemoteRejected {
            message: message.into(),
        }
    }

    pub fn transport() -> Self {
        SubmitError::TransportFailure {
            message: NETWORK_ERROR_MESSAGE.to_string(),
        }
    }

    /// Builds the rejection for an unsuccessful response.
    ///
    /// Picks the first non-blank of `error`, `message`, the joined `errors`
    /// values, then `fallback`.
    pub fn from_rejection(response: &AuthResponse, fallback: &str) -> Self {
        let non_blank = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let message = non_blank(&response.error)
            .or_else(|| non_blank(&response.message))
            .or_else(|| response.joined_errors())
            .unwrap_or_else(|| fallback.to_string());
        SubmitError::RemoteRejected { message }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::ValidationFailed { fields } => write!(f, "{fields}"),
            SubmitError::RemoteRejected { message } | SubmitError::TransportFailure { message } => {
                f.write_str(message)
            }
        }
    }
}

impl std::error::Error for SubmitError {}
