// Business logic services

pub mod booking_service;
pub mod email_service;
pub mod flight_search;
pub mod ticket_service;

pub use booking_service::BookingService;
pub use email_service::{EmailError, EmailOutcome, EmailService};
