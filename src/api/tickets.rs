use axum::{
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::models::GenerateTicketRequest;
use crate::services::ticket_service;

/// Ticket download routes
pub fn ticket_routes() -> Router {
    Router::new().route("/generate", post(generate_ticket))
}

/// Render the e-ticket PDF for download.
#[tracing::instrument(skip(request))]
async fn generate_ticket(Json(request): Json<GenerateTicketRequest>) -> Result<Response, ApiError> {
    let booking_data = request
        .booking_data
        .ok_or_else(|| ApiError::Validation("Booking data is required".to_string()))?;

    let bytes = ticket_service::render_ticket(&booking_data);
    let filename = format!("ticket-{}.pdf", booking_data.reference());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}
