use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::models::{
    BookingConfirmation, BookingDetails, BookingRecord, CreateBookingRequest, EmailBookingData,
    Passenger,
};
use crate::services::email_service::{EmailOutcome, EmailService};

#[derive(Debug, Clone)]
pub struct BookingService {
    db: PgPool,
    email: EmailService,
}

impl BookingService {
    pub fn new(db: PgPool, email: EmailService) -> Self {
        Self { db, email }
    }

    /// Persist a booking and kick off the confirmation email.
    ///
    /// The insert is the system of record; the notification is best-effort
    /// and its failure never fails the booking.
    pub async fn create(
        &self,
        request: CreateBookingRequest,
    ) -> Result<BookingConfirmation, ApiError> {
        let user_id = request.user_id.ok_or(ApiError::MissingUserId)?;

        let booking_reference = booking_reference(Utc::now());
        let outbound_flight_id = request
            .flights
            .outbound
            .as_ref()
            .and_then(|flight| flight.id.clone());
        let passenger_name = primary_passenger_name(&request.passengers);
        let passenger_email = request
            .passengers
            .first()
            .and_then(|passenger| passenger.email.clone())
            .unwrap_or_else(|| "N/A".to_string());

        let record = sqlx::query_as::<_, BookingRecord>(
            "INSERT INTO bookings
                 (id, user_id, flight_id, passenger_name, passenger_email, total_price, booking_status)
             VALUES ($1, $2, $3, $4, $5, $6, 'confirmed')
             RETURNING id, booking_status, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&outbound_flight_id)
        .bind(&passenger_name)
        .bind(&passenger_email)
        .bind(request.total_amount)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(booking_id = %record.id, reference = %booking_reference, "booking confirmed");

        let email_data = EmailBookingData {
            booking_reference: Some(booking_reference.clone()),
            flights: Some(request.flights.clone()),
            passengers: Some(request.passengers.clone()),
            total_amount: Some(request.total_amount),
            status: Some(record.booking_status.clone()),
            booking_date: Some(record.created_at),
        };

        match self.email.send_confirmation(&passenger_email, &email_data).await {
            Ok(EmailOutcome::Sent { .. }) | Ok(EmailOutcome::Simulated { .. }) => {}
            Err(err) => {
                tracing::error!(error = %err, reference = %booking_reference,
                    "confirmation email failed, booking is still confirmed");
            }
        }

        Ok(BookingConfirmation {
            success: true,
            booking_reference,
            booking: BookingDetails {
                id: record.id,
                booking_status: record.booking_status,
                created_at: record.created_at,
                flights: request.flights,
                passengers: request.passengers,
                total_amount: request.total_amount,
            },
        })
    }
}

/// Human-facing booking reference: "SB" plus the last six digits of the
/// current epoch millis. Not guaranteed unique; collisions are accepted.
pub fn booking_reference(now: DateTime<Utc>) -> String {
    format!("SB{:06}", now.timestamp_millis().rem_euclid(1_000_000))
}

fn primary_passenger_name(passengers: &[Passenger]) -> String {
    let Some(passenger) = passengers.first() else {
        return "N/A".to_string();
    };

    let name = format!(
        "{} {}",
        passenger.first_name.as_deref().unwrap_or_default(),
        passenger.last_name.as_deref().unwrap_or_default()
    );
    let name = name.trim();

    if name.is_empty() {
        "N/A".to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_reference_format() {
        let now = DateTime::from_timestamp_millis(1_700_000_123_456).unwrap();
        assert_eq!(booking_reference(now), "SB123456");
    }

    #[test]
    fn test_booking_reference_zero_padding() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_042).unwrap();
        assert_eq!(booking_reference(now), "SB000042");
    }

    #[test]
    fn test_primary_passenger_name() {
        let full = Passenger {
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            ..Passenger::default()
        };
        assert_eq!(primary_passenger_name(&[full]), "Jane Doe");

        let first_only = Passenger {
            first_name: Some("Jane".to_string()),
            ..Passenger::default()
        };
        assert_eq!(primary_passenger_name(&[first_only]), "Jane");

        assert_eq!(primary_passenger_name(&[]), "N/A");
        assert_eq!(primary_passenger_name(&[Passenger::default()]), "N/A");
    }
}
