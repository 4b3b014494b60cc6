use axum::{response::Json, routing::post, Router};

use crate::api::errors::ApiError;
use crate::models::{FlightSearchRequest, FlightSearchResponse};
use crate::services::flight_search;

/// Flight search routes
pub fn flight_routes() -> Router {
    Router::new().route("/search", post(search))
}

/// Search flights for an origin/destination/date triple.
#[tracing::instrument(skip(request))]
async fn search(
    Json(request): Json<FlightSearchRequest>,
) -> Result<Json<FlightSearchResponse>, ApiError> {
    let missing = |field: &Option<String>| field.as_deref().map_or(true, |v| v.trim().is_empty());
    if missing(&request.from) || missing(&request.to) || missing(&request.depart_date) {
        return Err(ApiError::Validation(
            "From, to, and departure date are required".to_string(),
        ));
    }

    Ok(Json(flight_search::search_flights(&request)))
}
