//! Contact form route handlers.
//!
//! Messages are validated and logged; nothing is delivered anywhere.

use axum::{Form, Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use showroom_core::contact::SUCCESS_MESSAGE;
use showroom_core::{AlertLevel, ContactForm};
use tracing::instrument;

/// Response for form submission.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    /// How the page should style the alert.
    pub level: AlertLevel,
    pub message: String,
}

/// Submit the contact form.
///
/// POST /contact
#[instrument(skip(form))]
pub async fn submit(Form(form): Form<ContactForm>) -> impl IntoResponse {
    match form.validate() {
        Ok(submission) => {
            tracing::info!(
                email = %submission.email,
                name = %submission.name,
                message_len = submission.message.len(),
                received_at = %submission.received_at,
                "Contact message received"
            );
            (
                StatusCode::OK,
                Json(ContactResponse {
                    success: true,
                    level: AlertLevel::Success,
                    message: SUCCESS_MESSAGE.to_string(),
                }),
            )
        }
        Err(e) => {
            tracing::debug!(error = %e, "Contact form rejected");
            (
                StatusCode::BAD_REQUEST,
                Json(ContactResponse {
                    success: false,
                    level: e.level(),
                    message: e.to_string(),
                }),
            )
        }
    }
}
