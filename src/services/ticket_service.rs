use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::models::{BookedFlight, EmailBookingData};
use crate::services::email_service::{format_amount, format_booking_date, or_na, stops_label};

const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;

const LEFT_COL: f64 = 20.0;
const RIGHT_COL: f64 = 120.0;

/// Render the e-ticket PDF for a booking.
///
/// Any layout or font error falls back to a minimal single-page document
/// carrying the booking reference; callers always get bytes (possibly empty
/// if even the fallback cannot be produced). Content overflow past the
/// single page is not handled.
pub fn render_ticket(data: &EmailBookingData) -> Vec<u8> {
    match render_full(data) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, "ticket rendering failed, using fallback document");
            render_fallback(data)
        }
    }
}

/// Text placement helper over a single layer, positioned in millimeters
/// from the top-left corner the way the layout constants were tuned.
struct TicketPage<'a> {
    layer: &'a PdfLayerReference,
    regular: &'a IndirectFontRef,
    bold: &'a IndirectFontRef,
}

impl TicketPage<'_> {
    fn text(&self, text: &str, size: f64, x: f64, y_from_top: f64) {
        self.layer.use_text(
            text,
            size as f32,
            Mm(x as f32),
            Mm((PAGE_HEIGHT - y_from_top) as f32),
            self.regular,
        );
    }

    fn text_bold(&self, text: &str, size: f64, x: f64, y_from_top: f64) {
        self.layer.use_text(
            text,
            size as f32,
            Mm(x as f32),
            Mm((PAGE_HEIGHT - y_from_top) as f32),
            self.bold,
        );
    }
}

fn render_full(data: &EmailBookingData) -> anyhow::Result<Vec<u8>> {
    let (doc, page_index, layer_index) = PdfDocument::new(
        "SkyBooker E-Ticket",
        Mm(PAGE_WIDTH as f32),
        Mm(PAGE_HEIGHT as f32),
        "ticket",
    );
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let layer = doc.get_page(page_index).get_layer(layer_index);

    let page = TicketPage {
        layer: &layer,
        regular: &regular,
        bold: &bold,
    };

    // Header
    page.text_bold("SkyBooker", 20.0, LEFT_COL, 15.0);
    page.text("Electronic Ticket", 12.0, LEFT_COL, 25.0);
    page.text_bold(
        &format!("Booking Reference: {}", data.reference()),
        14.0,
        LEFT_COL,
        35.0,
    );

    let mut y = 50.0;

    page.text_bold("PASSENGER INFORMATION", 14.0, LEFT_COL, y);
    y += 10.0;
    for (index, passenger) in data.passengers().iter().enumerate() {
        page.text(
            &format!(
                "Passenger {}: {} {}",
                index + 1,
                or_na(&passenger.first_name),
                or_na(&passenger.last_name)
            ),
            12.0,
            LEFT_COL,
            y,
        );
        y += 7.0;
        page.text(&format!("Email: {}", or_na(&passenger.email)), 12.0, LEFT_COL, y);
        y += 7.0;
        page.text(&format!("Phone: {}", or_na(&passenger.phone)), 12.0, LEFT_COL, y);
        y += 10.0;
    }

    let flights = data.flights.clone().unwrap_or_default();
    if let Some(outbound) = &flights.outbound {
        y = flight_block(&page, "OUTBOUND FLIGHT", outbound, y);
    }
    if let Some(return_flight) = &flights.return_flight {
        y = flight_block(&page, "RETURN FLIGHT", return_flight, y);
    }

    page.text_bold("BOOKING DETAILS", 14.0, LEFT_COL, y);
    y += 10.0;
    page.text(
        &format!("Total Amount: {}", format_amount(data.total_amount)),
        12.0,
        LEFT_COL,
        y,
    );
    y += 7.0;
    page.text(
        &format!("Booking Date: {}", format_booking_date(data.booking_date)),
        12.0,
        LEFT_COL,
        y,
    );
    y += 7.0;
    page.text(
        &format!("Status: {}", or_na(&data.status)),
        12.0,
        LEFT_COL,
        y,
    );
    y += 15.0;

    page.text_bold("IMPORTANT INFORMATION", 14.0, LEFT_COL, y);
    y += 10.0;
    for line in [
        "• Please arrive at the airport at least 2 hours before domestic flights",
        "• Bring a valid government-issued photo ID for domestic flights",
        "• Check-in online 24 hours before your flight to save time",
        "• Keep this e-ticket with you during your journey",
    ] {
        page.text(line, 10.0, LEFT_COL, y);
        y += 7.0;
    }

    // Barcode representation
    y += 10.0;
    page.text_bold("||||| |||| | |||| ||||| | |||| |||||", 12.0, 70.0, y);
    y += 5.0;
    page.text(data.reference(), 10.0, 88.0, y);

    Ok(doc.save_to_bytes()?)
}

fn flight_block(page: &TicketPage, title: &str, flight: &BookedFlight, mut y: f64) -> f64 {
    let departure = flight.departure.clone().unwrap_or_default();
    let arrival = flight.arrival.clone().unwrap_or_default();

    page.text_bold(title, 14.0, LEFT_COL, y);
    y += 10.0;
    page.text_bold(
        &format!(
            "{} - Flight {}",
            or_na(&flight.airline),
            or_na(&flight.flight_number)
        ),
        12.0,
        LEFT_COL,
        y,
    );
    y += 8.0;

    page.text_bold("DEPARTURE", 10.0, LEFT_COL, y);
    page.text_bold("ARRIVAL", 10.0, RIGHT_COL, y);
    y += 7.0;

    page.text_bold(or_na(&departure.time), 16.0, LEFT_COL, y);
    page.text_bold(or_na(&arrival.time), 16.0, RIGHT_COL, y);
    y += 8.0;

    page.text(or_na(&departure.airport), 12.0, LEFT_COL, y);
    page.text(or_na(&arrival.airport), 12.0, RIGHT_COL, y);
    y += 7.0;

    page.text(or_na(&departure.date), 12.0, LEFT_COL, y);
    page.text(or_na(&arrival.date), 12.0, RIGHT_COL, y);
    y += 10.0;

    page.text(&format!("Duration: {}", or_na(&flight.duration)), 12.0, LEFT_COL, y);
    page.text(&format!("Aircraft: {}", or_na(&flight.aircraft)), 12.0, RIGHT_COL, y);
    y += 7.0;

    page.text(&format!("Stops: {}", stops_label(flight.stops)), 12.0, LEFT_COL, y);
    y += 15.0;

    y
}

fn render_fallback(data: &EmailBookingData) -> Vec<u8> {
    let (doc, page_index, layer_index) = PdfDocument::new(
        "SkyBooker E-Ticket",
        Mm(PAGE_WIDTH as f32),
        Mm(PAGE_HEIGHT as f32),
        "ticket",
    );
    let font = match doc.add_builtin_font(BuiltinFont::Helvetica) {
        Ok(font) => font,
        Err(_) => return Vec::new(),
    };
    let layer = doc.get_page(page_index).get_layer(layer_index);

    layer.use_text(
        "SkyBooker Ticket",
        14.0,
        Mm(20.0),
        Mm((PAGE_HEIGHT - 20.0) as f32),
        &font,
    );
    layer.use_text(
        format!("Booking Reference: {}", data.reference()),
        12.0,
        Mm(20.0),
        Mm((PAGE_HEIGHT - 30.0) as f32),
        &font,
    );
    layer.use_text(
        "A detailed ticket will be provided at check-in.",
        12.0,
        Mm(20.0),
        Mm((PAGE_HEIGHT - 40.0) as f32),
        &font,
    );

    doc.save_to_bytes().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookedLeg, FlightSelection, Passenger};

    fn sample_booking() -> EmailBookingData {
        EmailBookingData {
            booking_reference: Some("SB654321".to_string()),
            flights: Some(FlightSelection {
                outbound: Some(BookedFlight {
                    id: Some("UN1234-0".to_string()),
                    airline: Some("United".to_string()),
                    flight_number: Some("UN1234".to_string()),
                    departure: Some(BookedLeg {
                        airport: Some("SFO".to_string()),
                        time: Some("09:30".to_string()),
                        date: Some("2025-12-24".to_string()),
                    }),
                    arrival: Some(BookedLeg {
                        airport: Some("ORD".to_string()),
                        time: Some("15:30".to_string()),
                        date: Some("2025-12-24".to_string()),
                    }),
                    duration: Some("4h 0m".to_string()),
                    aircraft: Some("Boeing 787".to_string()),
                    stops: Some(0),
                    price: Some(620.0),
                }),
                return_flight: None,
            }),
            passengers: Some(vec![Passenger {
                first_name: Some("Sam".to_string()),
                last_name: Some("Lee".to_string()),
                email: Some("sam@example.com".to_string()),
                phone: Some("555-0100".to_string()),
                date_of_birth: None,
                gender: None,
            }]),
            total_amount: Some(620.0),
            status: Some("confirmed".to_string()),
            booking_date: None,
        }
    }

    #[test]
    fn test_render_ticket_produces_pdf_bytes() {
        let bytes = render_ticket(&sample_booking());

        assert!(!bytes.is_empty());
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_ticket_tolerates_empty_booking() {
        let bytes = render_ticket(&EmailBookingData::default());

        assert!(!bytes.is_empty());
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_fallback_document() {
        let bytes = render_fallback(&sample_booking());

        assert!(!bytes.is_empty());
        assert!(bytes.starts_with(b"%PDF"));
    }
}
