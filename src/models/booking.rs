use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A flight as echoed back from the client at booking time.
///
/// Every nested field is optional: this data round-trips through the browser
/// unvalidated, and missing pieces render as "N/A" instead of failing the
/// booking or the confirmation email.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedFlight {
    pub id: Option<String>,
    pub airline: Option<String>,
    pub flight_number: Option<String>,
    pub departure: Option<BookedLeg>,
    pub arrival: Option<BookedLeg>,
    pub duration: Option<String>,
    pub aircraft: Option<String>,
    pub stops: Option<i32>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookedLeg {
    pub airport: Option<String>,
    pub time: Option<String>,
    pub date: Option<String>,
}

/// The outbound/return pair selected in the booking wizard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightSelection {
    pub outbound: Option<BookedFlight>,
    #[serde(rename = "return")]
    pub return_flight: Option<BookedFlight>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[serde(default)]
    pub flights: FlightSelection,
    #[serde(default)]
    pub passengers: Vec<Passenger>,
    #[serde(default)]
    pub total_amount: f64,
    pub user_id: Option<Uuid>,
}

/// The columns returned by the booking insert.
#[derive(Debug, Clone, FromRow)]
pub struct BookingRecord {
    pub id: Uuid,
    pub booking_status: String,
    pub created_at: DateTime<Utc>,
}

/// Response body for a created booking: the inserted row merged with the
/// echoed request payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub success: bool,
    pub booking_reference: String,
    pub booking: BookingDetails,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    pub id: Uuid,
    pub booking_status: String,
    pub created_at: DateTime<Utc>,
    pub flights: FlightSelection,
    pub passengers: Vec<Passenger>,
    pub total_amount: f64,
}

/// Everything the email and ticket renderers need about a booking.
///
/// Also accepted straight from clients on the send-confirmation-email
/// endpoint, hence all-optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailBookingData {
    pub booking_reference: Option<String>,
    pub flights: Option<FlightSelection>,
    pub passengers: Option<Vec<Passenger>>,
    pub total_amount: Option<f64>,
    pub status: Option<String>,
    pub booking_date: Option<DateTime<Utc>>,
}

impl EmailBookingData {
    pub fn passengers(&self) -> &[Passenger] {
        self.passengers.as_deref().unwrap_or(&[])
    }

    pub fn reference(&self) -> &str {
        self.booking_reference.as_deref().unwrap_or("N/A")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendConfirmationEmailRequest {
    pub email: Option<String>,
    pub booking_data: Option<EmailBookingData>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendConfirmationEmailResponse {
    pub success: bool,
    pub message: String,
    pub email_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulated_content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTicketRequest {
    pub booking_data: Option<EmailBookingData>,
}
