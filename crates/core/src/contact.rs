//! Contact form validation.
//!
//! Mirrors the checks the contact page runs before "sending" a message: all
//! three fields are required, then the email must look like `x@y.z`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Email, EmailError};

/// Message shown when the form was accepted.
pub const SUCCESS_MESSAGE: &str = "Message sent successfully! We will be in touch soon.";

/// Severity of the alert shown to the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Success,
    Warning,
    Danger,
}

/// Reasons a contact form is rejected.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ContactError {
    /// Name, email or message is blank.
    #[error("Please complete all required fields.")]
    MissingFields,
    /// The email address is malformed.
    #[error("Please enter a valid email address.")]
    InvalidEmail(#[source] EmailError),
}

impl ContactError {
    /// Alert level used when showing this error.
    #[must_use]
    pub const fn level(&self) -> AlertLevel {
        match self {
            Self::MissingFields => AlertLevel::Warning,
            Self::InvalidEmail(_) => AlertLevel::Danger,
        }
    }
}

/// Raw contact form fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// A validated contact message.
#[derive(Debug, Clone, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: Email,
    pub message: String,
    pub received_at: DateTime<Utc>,
}

impl ContactForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns `ContactError::MissingFields` if any trimmed field is empty,
    /// otherwise `ContactError::InvalidEmail` if the email is malformed.
    pub fn validate(&self) -> Result<ContactSubmission, ContactError> {
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();

        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(ContactError::MissingFields);
        }

        let email = Email::parse(email).map_err(ContactError::InvalidEmail)?;

        Ok(ContactSubmission {
            name: name.to_owned(),
            email,
            message: message.to_owned(),
            received_at: Utc::now(),
        })
    }
}
