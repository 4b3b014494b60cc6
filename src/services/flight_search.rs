use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Flight, FlightLeg, FlightSearchRequest, FlightSearchResponse};

const AIRLINES: &[&str] = &[
    "American Airlines",
    "Delta",
    "United",
    "Southwest",
    "JetBlue",
    "Alaska Airlines",
];

const AIRCRAFT: &[&str] = &[
    "Boeing 737",
    "Airbus A320",
    "Boeing 777",
    "Airbus A330",
    "Boeing 787",
];

/// Run a mock flight search: outbound always, return legs only for a
/// round trip with a return date. Nothing here is persisted.
pub fn search_flights(request: &FlightSearchRequest) -> FlightSearchResponse {
    let from = request.from.as_deref().unwrap_or_default();
    let to = request.to.as_deref().unwrap_or_default();
    let depart_date = request.depart_date.as_deref().unwrap_or_default();

    let outbound = generate_mock_flights(from, to, depart_date);

    let return_flights = match (request.trip_type.as_deref(), request.return_date.as_deref()) {
        (Some("round-trip"), Some(return_date)) => generate_mock_flights(to, from, return_date),
        _ => Vec::new(),
    };

    FlightSearchResponse {
        outbound,
        return_flights,
        search_params: request.clone(),
    }
}

/// Synthesize a pseudo-random flight list for one origin/destination/date.
///
/// There is no backing inventory or external API; every search rolls fresh
/// data. Kept in its own function so tests can pin down the distribution.
pub fn generate_mock_flights(from: &str, to: &str, date: &str) -> Vec<Flight> {
    let mut rng = rand::thread_rng();
    let num_flights = rng.gen_range(3..=10);

    let mut flights = Vec::with_capacity(num_flights);

    for i in 0..num_flights {
        let airline = *AIRLINES.choose(&mut rng).unwrap();
        let flight_number = format!(
            "{}{}",
            airline[..2].to_uppercase(),
            rng.gen_range(1000..10000)
        );

        let departure_hour: u32 = rng.gen_range(4..24);
        let departure_minute: u32 = rng.gen_range(0..4) * 15;
        let duration_hours: u32 = rng.gen_range(1..=8);
        // 60% of flights are direct
        let stops: u32 = if rng.gen_bool(0.6) {
            0
        } else {
            rng.gen_range(1..=2)
        };
        let base_price: u32 = rng.gen_range(200..1000);
        // direct flights cost more
        let price = if stops == 0 { base_price + 100 } else { base_price };

        let arrival_hour = (departure_hour + duration_hours) % 24;

        flights.push(Flight {
            id: format!("{}-{}", flight_number, i),
            airline: airline.to_string(),
            flight_number,
            departure: FlightLeg {
                airport: from.to_string(),
                time: format!("{:02}:{:02}", departure_hour, departure_minute),
                date: date.to_string(),
            },
            arrival: FlightLeg {
                airport: to.to_string(),
                time: format!("{:02}:{:02}", arrival_hour, departure_minute),
                date: date.to_string(),
            },
            duration: format!("{}h {}m", duration_hours, rng.gen_range(0..60)),
            price,
            stops,
            aircraft: AIRCRAFT.choose(&mut rng).unwrap().to_string(),
        });
    }

    flights.sort_by_key(|flight| flight.price);
    flights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_count_in_range() {
        for _ in 0..20 {
            let flights = generate_mock_flights("JFK", "LAX", "2025-11-01");
            assert!((3..=10).contains(&flights.len()));
        }
    }

    #[test]
    fn test_flights_sorted_by_price() {
        let flights = generate_mock_flights("JFK", "LAX", "2025-11-01");
        for pair in flights.windows(2) {
            assert!(pair[0].price <= pair[1].price);
        }
    }

    #[test]
    fn test_flight_fields() {
        let flights = generate_mock_flights("JFK", "LAX", "2025-11-01");

        for flight in &flights {
            assert_eq!(flight.departure.airport, "JFK");
            assert_eq!(flight.arrival.airport, "LAX");
            assert_eq!(flight.departure.date, "2025-11-01");
            assert!(flight.stops <= 2);
            assert!((200..=1099).contains(&flight.price));
            assert!(flight.id.starts_with(&flight.flight_number));
            // flight number is two airline letters plus four digits
            assert_eq!(flight.flight_number.len(), 6);
            assert!(flight
                .airline
                .to_uppercase()
                .starts_with(&flight.flight_number[..2]));
        }
    }

    #[test]
    fn test_round_trip_swaps_airports() {
        let request = FlightSearchRequest {
            from: Some("JFK".to_string()),
            to: Some("LAX".to_string()),
            depart_date: Some("2025-11-01".to_string()),
            return_date: Some("2025-11-08".to_string()),
            passengers: Some(1),
            trip_type: Some("round-trip".to_string()),
        };

        let response = search_flights(&request);

        assert!(!response.outbound.is_empty());
        assert!(!response.return_flights.is_empty());
        for flight in &response.return_flights {
            assert_eq!(flight.departure.airport, "LAX");
            assert_eq!(flight.arrival.airport, "JFK");
            assert_eq!(flight.departure.date, "2025-11-08");
        }
    }

    #[test]
    fn test_one_way_has_no_return_flights() {
        let request = FlightSearchRequest {
            from: Some("JFK".to_string()),
            to: Some("LAX".to_string()),
            depart_date: Some("2025-11-01".to_string()),
            return_date: None,
            passengers: Some(1),
            trip_type: Some("one-way".to_string()),
        };

        let response = search_flights(&request);

        assert!(response.return_flights.is_empty());
    }
}
