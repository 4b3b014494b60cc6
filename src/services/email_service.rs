use chrono::{DateTime, Utc};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;

use crate::config::EmailConfig;
use crate::models::{BookedFlight, EmailBookingData, Passenger};
use crate::services::ticket_service;

/// Confirmation email pipeline: pure content rendering plus best-effort SMTP
/// delivery. Without configured credentials every send degrades to
/// simulate/log mode, so a missing provider can never fail a booking.
#[derive(Debug, Clone)]
pub struct EmailService {
    config: Option<EmailConfig>,
}

#[derive(Debug)]
pub enum EmailOutcome {
    Sent { email_id: String },
    Simulated { text: String },
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
    #[error("Failed to build email: {0}")]
    Build(String),
    #[error("SMTP transport error: {0}")]
    Transport(String),
    #[error("Email sending failed: {0}")]
    Send(String),
}

impl EmailService {
    pub fn new(config: Option<EmailConfig>) -> Self {
        Self { config }
    }

    /// Render and deliver a booking confirmation.
    ///
    /// Attempts delivery exactly once; there are no retries. A PDF ticket is
    /// attached when it renders, otherwise the email goes out without one.
    pub async fn send_confirmation(
        &self,
        to: &str,
        data: &EmailBookingData,
    ) -> Result<EmailOutcome, EmailError> {
        let text = render_text(data);

        let Some(config) = &self.config else {
            tracing::info!(recipient = %to, "email provider not configured, simulating send");
            tracing::debug!(content = %text, "simulated confirmation email");
            return Ok(EmailOutcome::Simulated { text });
        };

        let html = render_html(data);
        let subject = format!("Flight Booking Confirmed - {}", data.reference());

        let alternative = MultiPart::alternative_plain_html(text, html);
        let ticket = ticket_service::render_ticket(data);
        let body = if ticket.is_empty() {
            alternative
        } else {
            let content_type = ContentType::parse("application/pdf")
                .map_err(|e| EmailError::Build(e.to_string()))?;
            MultiPart::mixed().multipart(alternative).singlepart(
                Attachment::new(format!("ticket-{}.pdf", data.reference()))
                    .body(ticket, content_type),
            )
        };

        let from: Mailbox = config
            .from_header()
            .parse()
            .map_err(|_| EmailError::InvalidAddress(config.from_header()))?;
        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|_| EmailError::InvalidAddress(to.to_string()))?;

        let email = Message::builder()
            .from(from)
            .to(to_mailbox)
            .subject(subject)
            .multipart(body)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mailer = SmtpTransport::relay(&config.smtp_host)
            .map_err(|e| EmailError::Transport(e.to_string()))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();

        let response = tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| EmailError::Send(e.to_string()))?
            .map_err(|e| EmailError::Send(e.to_string()))?;

        let email_id = response.message().collect::<Vec<_>>().join(" ");
        tracing::info!(recipient = %to, "confirmation email sent");

        Ok(EmailOutcome::Sent { email_id })
    }
}

pub(crate) fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

pub(crate) fn stops_label(stops: Option<i32>) -> String {
    match stops {
        Some(0) => "Direct Flight".to_string(),
        Some(n) => format!("{} Stop(s)", n),
        None => "0 Stop(s)".to_string(),
    }
}

pub(crate) fn format_amount(amount: Option<f64>) -> String {
    match amount {
        Some(amount) => format!("${}", amount),
        None => "$0.00".to_string(),
    }
}

pub(crate) fn format_booking_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%B %d, %Y").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

fn salutation(passengers: &[Passenger]) -> (String, String) {
    let first = passengers.first();
    (
        first
            .and_then(|p| p.first_name.clone())
            .unwrap_or_else(|| "Valued".to_string()),
        first
            .and_then(|p| p.last_name.clone())
            .unwrap_or_else(|| "Customer".to_string()),
    )
}

/// Render the plain-text confirmation body.
///
/// Pure and deterministic: identical booking data produces byte-identical
/// output, and every missing field renders as "N/A".
pub fn render_text(data: &EmailBookingData) -> String {
    let passengers = data.passengers();
    let (first_name, last_name) = salutation(passengers);

    let mut text = format!(
        "Dear {} {},\n\n\
         🎉 Your flight booking has been confirmed!\n\n\
         BOOKING DETAILS\n\
         ===============\n\
         Booking Reference: {}\n\
         Total Amount: {}\n\
         Booking Date: {}\n\n\
         FLIGHT INFORMATION\n\
         ==================\n",
        first_name,
        last_name,
        data.reference(),
        format_amount(data.total_amount),
        format_booking_date(data.booking_date),
    );

    let flights = data.flights.clone().unwrap_or_default();
    if let Some(outbound) = &flights.outbound {
        text.push_str(&flight_text_block("OUTBOUND FLIGHT", outbound));
    }
    if let Some(return_flight) = &flights.return_flight {
        text.push_str(&flight_text_block("RETURN FLIGHT", return_flight));
    }

    text.push_str("\nPASSENGER INFORMATION\n====================\n");
    for (index, passenger) in passengers.iter().enumerate() {
        text.push_str(&format!(
            "{}. {} {}\n   Email: {}\n   Phone: {}\n   Date of Birth: {}\n   Gender: {}\n",
            index + 1,
            or_na(&passenger.first_name),
            or_na(&passenger.last_name),
            or_na(&passenger.email),
            or_na(&passenger.phone),
            or_na(&passenger.date_of_birth),
            or_na(&passenger.gender),
        ));
    }

    text.push_str(&format!(
        "\nIMPORTANT REMINDERS\n\
         ==================\n\
         • Please arrive at the airport at least 2 hours before domestic flights and 3 hours before international flights\n\
         • Bring a valid government-issued photo ID for domestic flights or passport for international flights\n\
         • Check-in online 24 hours before your flight to save time at the airport\n\
         • Keep this booking reference handy: {}\n\n\
         Need help? Contact our support team at support@skybooker.com\n\n\
         Thank you for choosing SkyBooker!\n\n\
         Best regards,\n\
         The SkyBooker Team\n\n\
         ---\n\
         This is an automated message. Please do not reply to this email.",
        data.reference(),
    ));

    text
}

fn flight_text_block(title: &str, flight: &BookedFlight) -> String {
    let departure = flight.departure.clone().unwrap_or_default();
    let arrival = flight.arrival.clone().unwrap_or_default();

    format!(
        "\n✈️ {}\n\
         Flight: {} {}\n\
         From: {} at {}\n\
         To: {} at {}\n\
         Date: {}\n\
         Duration: {}\n\
         Aircraft: {}\n\
         {}\n",
        title,
        or_na(&flight.airline),
        or_na(&flight.flight_number),
        or_na(&departure.airport),
        or_na(&departure.time),
        or_na(&arrival.airport),
        or_na(&arrival.time),
        or_na(&departure.date),
        or_na(&flight.duration),
        or_na(&flight.aircraft),
        stops_label(flight.stops),
    )
}

/// Render the HTML confirmation body. Same determinism and "N/A" contract as
/// [`render_text`].
pub fn render_html(data: &EmailBookingData) -> String {
    let passengers = data.passengers();
    let (first_name, last_name) = salutation(passengers);

    let mut html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Flight Booking Confirmation</title>
  <style>
    body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; }}
    .header {{ background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 20px; text-align: center; border-radius: 8px 8px 0 0; }}
    .content {{ background: #f8f9fa; padding: 20px; border-radius: 0 0 8px 8px; }}
    .section {{ background: white; margin: 15px 0; padding: 15px; border-radius: 6px; border-left: 4px solid #667eea; }}
    .flight-card {{ background: #e3f2fd; padding: 15px; margin: 10px 0; border-radius: 6px; }}
    .passenger {{ background: #f1f8e9; padding: 10px; margin: 5px 0; border-radius: 4px; }}
    .highlight {{ color: #667eea; font-weight: bold; }}
    .amount {{ font-size: 1.2em; color: #2e7d32; font-weight: bold; }}
    .footer {{ text-align: center; margin-top: 30px; padding: 20px; background: #f5f5f5; border-radius: 6px; }}
    h2 {{ color: #667eea; margin-top: 0; }}
  </style>
</head>
<body>
  <div class="header">
    <h1>🎉 Flight Booking Confirmed!</h1>
    <p>Thank you for choosing SkyBooker</p>
  </div>

  <div class="content">
    <div class="section">
      <h2>Booking Details</h2>
      <p><strong>Dear {first_name} {last_name},</strong></p>
      <p>Your flight booking has been successfully confirmed!</p>
      <p><span class="highlight">Booking Reference:</span> <strong>{reference}</strong></p>
      <p><span class="highlight">Total Amount:</span> <span class="amount">{amount}</span></p>
      <p><span class="highlight">Booking Date:</span> {date}</p>
    </div>
"#,
        first_name = first_name,
        last_name = last_name,
        reference = data.reference(),
        amount = format_amount(data.total_amount),
        date = format_booking_date(data.booking_date),
    );

    let flights = data.flights.clone().unwrap_or_default();
    if let Some(outbound) = &flights.outbound {
        html.push_str(&flight_html_block("✈️ Outbound Flight", outbound));
    }
    if let Some(return_flight) = &flights.return_flight {
        html.push_str(&flight_html_block("🔄 Return Flight", return_flight));
    }

    html.push_str("\n    <div class=\"section\">\n      <h2>👥 Passenger Information</h2>\n");
    for (index, passenger) in passengers.iter().enumerate() {
        html.push_str(&format!(
            "      <div class=\"passenger\">\n        <p><strong>{}. {} {}</strong></p>\n        <p><strong>Email:</strong> {}</p>\n        <p><strong>Phone:</strong> {}</p>\n        <p><strong>Date of Birth:</strong> {}</p>\n        <p><strong>Gender:</strong> {}</p>\n      </div>\n",
            index + 1,
            or_na(&passenger.first_name),
            or_na(&passenger.last_name),
            or_na(&passenger.email),
            or_na(&passenger.phone),
            or_na(&passenger.date_of_birth),
            or_na(&passenger.gender),
        ));
    }
    html.push_str("    </div>\n");

    html.push_str(&format!(
        r#"
    <div class="section">
      <h2>📋 Important Reminders</h2>
      <ul>
        <li>Please arrive at the airport at least 2 hours before domestic flights and 3 hours before international flights</li>
        <li>Bring a valid government-issued photo ID for domestic flights or passport for international flights</li>
        <li>Check-in online 24 hours before your flight to save time at the airport</li>
        <li>Keep this booking reference handy: <strong>{reference}</strong></li>
      </ul>
    </div>

    <div class="footer">
      <p>Need help? Contact our support team at support@skybooker.com</p>
      <p><strong>Thank you for choosing SkyBooker for your travel needs!</strong></p>
      <p>Best regards,<br>The SkyBooker Team</p>
      <hr>
      <p style="font-size: 0.9em; color: #666;">This is an automated confirmation email. Please do not reply to this email.</p>
    </div>
  </div>
</body>
</html>"#,
        reference = data.reference(),
    ));

    html
}

fn flight_html_block(title: &str, flight: &BookedFlight) -> String {
    let departure = flight.departure.clone().unwrap_or_default();
    let arrival = flight.arrival.clone().unwrap_or_default();

    format!(
        r#"
    <div class="section">
      <h2>{title}</h2>
      <div class="flight-card">
        <p><strong>{airline} {number}</strong></p>
        <p><strong>From:</strong> {from_airport} at {from_time}</p>
        <p><strong>To:</strong> {to_airport} at {to_time}</p>
        <p><strong>Date:</strong> {date}</p>
        <p><strong>Duration:</strong> {duration}</p>
        <p><strong>Aircraft:</strong> {aircraft}</p>
        <p><strong>Flight Type:</strong> {flight_type}</p>
      </div>
    </div>
"#,
        title = title,
        airline = or_na(&flight.airline),
        number = or_na(&flight.flight_number),
        from_airport = or_na(&departure.airport),
        from_time = or_na(&departure.time),
        to_airport = or_na(&arrival.airport),
        to_time = or_na(&arrival.time),
        date = or_na(&departure.date),
        duration = or_na(&flight.duration),
        aircraft = or_na(&flight.aircraft),
        flight_type = stops_label(flight.stops),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookedLeg, FlightSelection};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn sample_flight(stops: i32) -> BookedFlight {
        BookedFlight {
            id: Some("DE4711-0".to_string()),
            airline: Some("Delta".to_string()),
            flight_number: Some("DE4711".to_string()),
            departure: Some(BookedLeg {
                airport: Some("JFK".to_string()),
                time: Some("08:15".to_string()),
                date: Some("2025-11-01".to_string()),
            }),
            arrival: Some(BookedLeg {
                airport: Some("LAX".to_string()),
                time: Some("11:15".to_string()),
                date: Some("2025-11-01".to_string()),
            }),
            duration: Some("3h 0m".to_string()),
            aircraft: Some("Boeing 737".to_string()),
            stops: Some(stops),
            price: Some(450.0),
        }
    }

    fn sample_booking() -> EmailBookingData {
        EmailBookingData {
            booking_reference: Some("SB123456".to_string()),
            flights: Some(FlightSelection {
                outbound: Some(sample_flight(0)),
                return_flight: None,
            }),
            passengers: Some(vec![Passenger {
                first_name: Some("Jane".to_string()),
                last_name: Some("Doe".to_string()),
                email: Some("jane@example.com".to_string()),
                phone: None,
                date_of_birth: Some("1990-04-01".to_string()),
                gender: None,
            }]),
            total_amount: Some(450.0),
            status: Some("confirmed".to_string()),
            booking_date: Some(Utc.with_ymd_and_hms(2025, 11, 1, 12, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let data = sample_booking();

        assert_eq!(render_text(&data), render_text(&data));
        assert_eq!(render_html(&data), render_html(&data));
    }

    #[test]
    fn test_text_content() {
        let text = render_text(&sample_booking());

        assert!(text.starts_with("Dear Jane Doe,"));
        assert!(text.contains("Booking Reference: SB123456"));
        assert!(text.contains("Total Amount: $450"));
        assert!(text.contains("Booking Date: November 01, 2025"));
        assert!(text.contains("OUTBOUND FLIGHT"));
        assert!(!text.contains("RETURN FLIGHT"));
        assert!(text.contains("1. Jane Doe"));
        assert!(text.contains("Keep this booking reference handy: SB123456"));
    }

    #[test]
    fn test_missing_fields_render_as_na() {
        let text = render_text(&sample_booking());

        assert!(text.contains("Phone: N/A"));
        assert!(text.contains("Gender: N/A"));
    }

    #[test]
    fn test_salutation_falls_back_to_valued_customer() {
        let data = EmailBookingData::default();
        let text = render_text(&data);
        let html = render_html(&data);

        assert!(text.starts_with("Dear Valued Customer,"));
        assert!(html.contains("Dear Valued Customer,"));
        assert!(text.contains("Booking Reference: N/A"));
        assert!(text.contains("Total Amount: $0.00"));
        assert!(text.contains("Booking Date: N/A"));
    }

    #[test]
    fn test_stops_label() {
        assert_eq!(stops_label(Some(0)), "Direct Flight");
        assert_eq!(stops_label(Some(1)), "1 Stop(s)");
        assert_eq!(stops_label(Some(2)), "2 Stop(s)");
        assert_eq!(stops_label(None), "0 Stop(s)");
    }

    #[test]
    fn test_direct_flight_label_in_both_bodies() {
        let data = sample_booking();
        assert!(render_text(&data).contains("Direct Flight"));
        assert!(render_html(&data).contains("Direct Flight"));

        let mut with_stops = sample_booking();
        with_stops.flights = Some(FlightSelection {
            outbound: Some(sample_flight(2)),
            return_flight: None,
        });
        assert!(render_text(&with_stops).contains("2 Stop(s)"));
        assert!(render_html(&with_stops).contains("2 Stop(s)"));
    }

    #[test]
    fn test_return_flight_block_is_conditional() {
        let mut data = sample_booking();
        data.flights = Some(FlightSelection {
            outbound: Some(sample_flight(0)),
            return_flight: Some(sample_flight(1)),
        });

        let text = render_text(&data);
        assert!(text.contains("RETURN FLIGHT"));

        let html = render_html(&data);
        assert!(html.contains("Return Flight"));
    }

    #[test]
    fn test_passenger_enumeration() {
        let mut data = sample_booking();
        data.passengers.as_mut().unwrap().push(Passenger {
            first_name: Some("John".to_string()),
            ..Passenger::default()
        });

        let text = render_text(&data);
        assert!(text.contains("1. Jane Doe"));
        assert!(text.contains("2. John N/A"));
    }

    #[tokio::test]
    async fn test_unconfigured_service_simulates() {
        let service = EmailService::new(None);
        let outcome = service
            .send_confirmation("jane@example.com", &sample_booking())
            .await
            .unwrap();

        match outcome {
            EmailOutcome::Simulated { text } => assert!(text.contains("SB123456")),
            EmailOutcome::Sent { .. } => panic!("should not send without configuration"),
        }
    }
}
