use axum::{extract::State, response::Json, routing::post, Router};

use crate::api::errors::ApiError;
use crate::models::{BookingConfirmation, CreateBookingRequest};
use crate::services::BookingService;

/// Booking routes
pub fn booking_routes(booking_service: BookingService) -> Router {
    Router::new()
        .route("/create", post(create))
        .with_state(booking_service)
}

/// Create a booking and send the confirmation email best-effort.
#[tracing::instrument(skip(booking_service, request))]
async fn create(
    State(booking_service): State<BookingService>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<BookingConfirmation>, ApiError> {
    let response = booking_service.create(request).await?;
    Ok(Json(response))
}
