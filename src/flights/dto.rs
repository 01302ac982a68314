use serde::{Deserialize, Serialize};

use crate::flights::types::FlightRecord;

/// Request body for a flight search.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub adults: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct FlightsResponse {
    pub status: &'static str,
    pub flights: Vec<FlightRecord>,
}

impl FlightsResponse {
    pub fn success(flights: Vec<FlightRecord>) -> Self {
        Self {
            status: "success",
            flights,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct AirlineParams {
    pub airline_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PriceParams {
    pub min: Option<String>,
    pub max: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OriginParams {
    pub origin_code: Option<String>,
}
