use axum::{routing::get, Router};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::auth_routes;
use super::bookings::booking_routes;
use super::emails::email_routes;
use super::flights::flight_routes;
use super::health::health_check;
use super::tickets::ticket_routes;
use crate::auth::{AuthService, SessionStore};
use crate::config::EmailConfig;
use crate::services::{BookingService, EmailService};

pub fn create_routes(db: PgPool, email_config: Option<EmailConfig>) -> Router {
    let sessions = SessionStore::with_default_ttl();
    let auth_service = AuthService::new(db.clone(), sessions);
    let email_service = EmailService::new(email_config);
    let booking_service = BookingService::new(db, email_service.clone());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes(auth_service))
        .nest("/api/flights", flight_routes())
        .nest("/api/bookings", booking_routes(booking_service))
        .nest("/api/tickets", ticket_routes())
        .nest("/api", email_routes(email_service))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
