use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{ContactError, FieldError};

/// Buyer details collected on the checkout page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub full_name: String,
    pub email: String,
    pub confirm_email: String,
    pub phone: String,
}

impl ContactDetails {
    /// A confirmation mismatch is reported on its own, before field checks.
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.email != self.confirm_email {
            return Err(ContactError::EmailMismatch);
        }

        let mut errors = Vec::new();
        if self.full_name.trim().is_empty() {
            errors.push(FieldError::FullNameRequired);
        }
        if self.email.trim().is_empty() {
            errors.push(FieldError::EmailRequired);
        } else if !email_pattern().is_match(&self.email) {
            errors.push(FieldError::EmailInvalid);
        }
        if self.phone.trim().is_empty() {
            errors.push(FieldError::PhoneRequired);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ContactError::InvalidFields(errors))
        }
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern"))
}
