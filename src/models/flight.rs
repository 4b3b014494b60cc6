use serde::{Deserialize, Serialize};

/// A synthesized flight offered in search results.
///
/// Flights are never persisted; they travel through the booking flow by
/// value inside request and response bodies.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: String,
    pub airline: String,
    pub flight_number: String,
    pub departure: FlightLeg,
    pub arrival: FlightLeg,
    pub duration: String,
    pub price: u32,
    pub stops: u32,
    pub aircraft: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlightLeg {
    pub airport: String,
    pub time: String,
    pub date: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub depart_date: Option<String>,
    pub return_date: Option<String>,
    pub passengers: Option<u32>,
    pub trip_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchResponse {
    pub outbound: Vec<Flight>,
    #[serde(rename = "return")]
    pub return_flights: Vec<Flight>,
    pub search_params: FlightSearchRequest,
}
