use axum::{extract::State, response::Json, routing::post, Router};

use crate::api::errors::ApiError;
use crate::models::{SendConfirmationEmailRequest, SendConfirmationEmailResponse};
use crate::services::{EmailOutcome, EmailService};

/// Confirmation email routes
pub fn email_routes(email_service: EmailService) -> Router {
    Router::new()
        .route("/send-confirmation-email", post(send_confirmation_email))
        .with_state(email_service)
}

/// Send (or simulate) a booking confirmation email.
///
/// Always reports `success: true` once the request is well-formed: delivery
/// failure is logged and reflected in `emailSent`, never in the status code.
#[tracing::instrument(skip(email_service, request))]
async fn send_confirmation_email(
    State(email_service): State<EmailService>,
    Json(request): Json<SendConfirmationEmailRequest>,
) -> Result<Json<SendConfirmationEmailResponse>, ApiError> {
    let (email, booking_data) = match (request.email, request.booking_data) {
        (Some(email), Some(booking_data)) if !email.trim().is_empty() => (email, booking_data),
        _ => {
            return Err(ApiError::Validation(
                "Missing email or booking data".to_string(),
            ))
        }
    };

    let response = match email_service.send_confirmation(&email, &booking_data).await {
        Ok(EmailOutcome::Sent { email_id }) => SendConfirmationEmailResponse {
            success: true,
            message: "Confirmation email sent successfully".to_string(),
            email_sent: true,
            email_id: Some(email_id),
            simulated_content: None,
        },
        Ok(EmailOutcome::Simulated { text }) => SendConfirmationEmailResponse {
            success: true,
            message: "Email simulated (no provider configured)".to_string(),
            email_sent: false,
            email_id: None,
            simulated_content: Some(text),
        },
        Err(err) => {
            tracing::error!(error = %err, "confirmation email failed");
            SendConfirmationEmailResponse {
                success: true,
                message: "Booking confirmed, email will be sent shortly".to_string(),
                email_sent: false,
                email_id: None,
                simulated_content: None,
            }
        }
    };

    Ok(Json(response))
}
