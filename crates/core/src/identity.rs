//! Identity fields entered on the form.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// IdentityField
// ---------------------------------------------------------------------------

/// The three tracked inputs that drive a lock check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityField {
    FirstName,
    LastName,
    Email,
}

impl IdentityField {
    pub const ALL: [IdentityField; 3] = [
        IdentityField::FirstName,
        IdentityField::LastName,
        IdentityField::Email,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IdentityField::FirstName => "first_name",
            IdentityField::LastName => "last_name",
            IdentityField::Email => "email",
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// IdentityInput
// ---------------------------------------------------------------------------

/// First name, last name and email as typed by the user.
///
/// A check only proceeds when all three are non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
pub struct IdentityInput {
    #[validate(length(min = 1, message = "first_name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
}

impl IdentityInput {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    pub fn get(&self, field: IdentityField) -> &str {
        match field {
            IdentityField::FirstName => &self.first_name,
            IdentityField::LastName => &self.last_name,
            IdentityField::Email => &self.email,
        }
    }

    /// `true` when every field carries a value.
    pub fn is_complete(&self) -> bool {
        IdentityField::ALL.iter().all(|f| !self.get(*f).is_empty())
    }

    /// Reject incomplete input with a [`CoreError::Validation`] naming the
    /// missing fields.
    pub fn ensure_complete(&self) -> Result<(), CoreError> {
        self.validate().map_err(|errors| {
            let mut missing: Vec<String> =
                errors.field_errors().keys().map(|k| k.to_string()).collect();
            missing.sort_unstable();
            CoreError::Validation(format!("Missing required fields: {}", missing.join(", ")))
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn complete_input_passes() {
        let input = IdentityInput::new("Jane", "Doe", "jane@x.com");
        assert!(input.is_complete());
        assert!(input.ensure_complete().is_ok());
    }

    #[test]
    fn any_empty_field_is_incomplete() {
        for field in IdentityField::ALL {
            let mut input = IdentityInput::new("Jane", "Doe", "jane@x.com");
            match field {
                IdentityField::FirstName => input.first_name.clear(),
                IdentityField::LastName => input.last_name.clear(),
                IdentityField::Email => input.email.clear(),
            }
            assert!(!input.is_complete(), "{field} empty should be incomplete");
        }
    }

    #[test]
    fn validation_error_lists_missing_fields() {
        let input = IdentityInput::new("", "Doe", "");
        let err = input.ensure_complete().unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "Missing required fields: email, first_name");
    }
}
