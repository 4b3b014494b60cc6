// API routes and handlers

pub mod auth;
pub mod bookings;
pub mod emails;
pub mod errors;
pub mod flights;
pub mod health;
pub mod routes;
pub mod tickets;
