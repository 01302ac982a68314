use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AmadeusConfig;
use crate::flights::types::{FlightRecord, SearchQuery};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider rejected the configured credentials")]
    Auth,

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected provider response: {0}")]
    Malformed(String),
}

/// External flight-offer search service.
#[async_trait]
pub trait FlightProvider: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<FlightRecord>, ProviderError>;
}

/// Client for the Amadeus flight-offers API: a client-credentials
/// token fetch followed by the offer-search call.
pub struct AmadeusClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    api_secret: String,
}

impl AmadeusClient {
    pub fn new(config: &AmadeusConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        })
    }

    async fn fetch_token(&self) -> Result<String, ProviderError> {
        let response = self
            .http
            .post(format!("{}/v1/security/oauth2/token", self.base_url))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.api_key.as_str()),
                ("client_secret", self.api_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            warn!("provider rejected credentials during token fetch");
            return Err(ProviderError::Auth);
        }

        let body: TokenResponse = response.error_for_status()?.json().await?;
        body.access_token.ok_or_else(|| {
            ProviderError::Malformed("access token missing from token response".into())
        })
    }
}

#[async_trait]
impl FlightProvider for AmadeusClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<FlightRecord>, ProviderError> {
        info!(origin = %query.origin, destination = %query.destination,
              departure_date = %query.departure_date, adults = query.adults,
              "fetching flight offers");

        let token = self.fetch_token().await?;

        let mut params = vec![
            ("originLocationCode", query.origin.clone()),
            ("destinationLocationCode", query.destination.clone()),
            ("departureDate", query.departure_date.clone()),
            ("adults", query.adults.to_string()),
            ("currencyCode", "USD".to_string()),
            ("max", "50".to_string()),
        ];
        if let Some(return_date) = &query.return_date {
            params.push(("returnDate", return_date.clone()));
        }

        let response = self
            .http
            .get(format!("{}/v2/shopping/flight-offers", self.base_url))
            .bearer_auth(&token)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            warn!("provider rejected credentials during offer search");
            return Err(ProviderError::Auth);
        }

        let body: OfferResponse = response.error_for_status()?.json().await?;
        let records: Vec<FlightRecord> = body
            .data
            .into_iter()
            .filter_map(|offer| {
                map_offer(offer, &query.departure_date, query.return_date.as_deref())
            })
            .collect();

        info!(offers = records.len(), "flight offers retrieved");
        Ok(records)
    }
}

// Wire types for the subset of the offer payload this service reads.

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OfferResponse {
    #[serde(default)]
    data: Vec<Offer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Offer {
    id: Option<String>,
    #[serde(default)]
    itineraries: Vec<Itinerary>,
    price: Option<OfferPrice>,
    #[serde(default)]
    traveler_pricings: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Itinerary {
    #[serde(default)]
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Segment {
    carrier_code: Option<String>,
    departure: Option<Endpoint>,
    arrival: Option<Endpoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Endpoint {
    iata_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfferPrice {
    grand_total: Option<String>,
    currency: Option<String>,
}

/// Shapes one provider offer into a flight record. Offers missing the
/// data this service needs are dropped, not errors.
fn map_offer(offer: Offer, departure_date: &str, return_date: Option<&str>) -> Option<FlightRecord> {
    let offer_id = offer.id.as_deref().unwrap_or("N/A").to_string();

    let segments = offer
        .itineraries
        .first()
        .map(|i| i.segments.as_slice())
        .unwrap_or_default();
    let (first, last) = match (segments.first(), segments.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            warn!(offer_id = %offer_id, "offer has no segments");
            return None;
        }
    };

    let airline = match first.carrier_code.as_deref() {
        Some(code) if !code.is_empty() => code.to_string(),
        _ => {
            warn!(offer_id = %offer_id, "offer missing carrier code");
            return None;
        }
    };

    let price = match &offer.price {
        Some(price) => price,
        None => {
            warn!(offer_id = %offer_id, "offer missing price");
            return None;
        }
    };
    let grand_total = match price.grand_total.as_deref() {
        Some(total) if !total.is_empty() => total.to_string(),
        _ => {
            warn!(offer_id = %offer_id, "offer missing grand total");
            return None;
        }
    };
    if grand_total.parse::<f64>().is_err() {
        warn!(offer_id = %offer_id, grand_total = %grand_total, "offer price is not numeric");
        return None;
    }
    let currency = price.currency.clone().unwrap_or_else(|| "USD".to_string());

    let origin = match first.departure.as_ref().and_then(|e| e.iata_code.clone()) {
        Some(code) => code,
        None => {
            warn!(offer_id = %offer_id, "offer missing departure airport");
            return None;
        }
    };
    let destination = match last.arrival.as_ref().and_then(|e| e.iata_code.clone()) {
        Some(code) => code,
        None => {
            warn!(offer_id = %offer_id, "offer missing arrival airport");
            return None;
        }
    };
    if origin == destination {
        warn!(offer_id = %offer_id, "offer departs and arrives at the same airport");
        return None;
    }

    if offer.traveler_pricings.is_empty() {
        warn!(offer_id = %offer_id, "offer has no traveler pricings");
        return None;
    }

    Some(FlightRecord {
        airline,
        origin,
        destination,
        departure_date: departure_date.to_string(),
        return_date: return_date.map(str::to_string),
        price: format!("{grand_total} {currency}"),
    })
}

#[cfg(test)]
pub(crate) struct StubProvider {
    pub records: Vec<FlightRecord>,
}

#[cfg(test)]
#[async_trait]
impl FlightProvider for StubProvider {
    async fn search(&self, _query: &SearchQuery) -> Result<Vec<FlightRecord>, ProviderError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn offer(value: serde_json::Value) -> Offer {
        serde_json::from_value(value).expect("offer fixture")
    }

    fn connecting_offer() -> Offer {
        offer(json!({
            "id": "1",
            "itineraries": [{
                "segments": [
                    {"carrierCode": "AA", "departure": {"iataCode": "JFK"},
                     "arrival": {"iataCode": "ORD"}},
                    {"carrierCode": "AA", "departure": {"iataCode": "ORD"},
                     "arrival": {"iataCode": "LAX"}}
                ]
            }],
            "price": {"grandTotal": "250.00", "currency": "USD"},
            "travelerPricings": [{}]
        }))
    }

    #[test]
    fn maps_connecting_itinerary_end_to_end() {
        let record = map_offer(connecting_offer(), "2024-12-20", Some("2024-12-27"))
            .expect("offer should map");
        assert_eq!(record.airline, "AA");
        assert_eq!(record.origin, "JFK");
        assert_eq!(record.destination, "LAX");
        assert_eq!(record.departure_date, "2024-12-20");
        assert_eq!(record.return_date.as_deref(), Some("2024-12-27"));
        assert_eq!(record.price, "250.00 USD");
    }

    #[test]
    fn one_way_offer_has_no_return_date() {
        let record = map_offer(connecting_offer(), "2024-12-20", None).expect("offer should map");
        assert_eq!(record.return_date, None);
    }

    #[test]
    fn currency_defaults_to_usd() {
        let record = map_offer(
            offer(json!({
                "id": "2",
                "itineraries": [{"segments": [
                    {"carrierCode": "DL", "departure": {"iataCode": "JFK"},
                     "arrival": {"iataCode": "SFO"}}
                ]}],
                "price": {"grandTotal": "310.50"},
                "travelerPricings": [{}]
            })),
            "2024-12-20",
            None,
        )
        .expect("offer should map");
        assert_eq!(record.price, "310.50 USD");
    }

    #[test]
    fn skips_offer_without_segments() {
        let mapped = map_offer(
            offer(json!({
                "id": "3",
                "itineraries": [{"segments": []}],
                "price": {"grandTotal": "99.00", "currency": "USD"},
                "travelerPricings": [{}]
            })),
            "2024-12-20",
            None,
        );
        assert!(mapped.is_none());
    }

    #[test]
    fn skips_offer_missing_carrier_code() {
        let mapped = map_offer(
            offer(json!({
                "id": "4",
                "itineraries": [{"segments": [
                    {"departure": {"iataCode": "JFK"}, "arrival": {"iataCode": "LAX"}}
                ]}],
                "price": {"grandTotal": "99.00", "currency": "USD"},
                "travelerPricings": [{}]
            })),
            "2024-12-20",
            None,
        );
        assert!(mapped.is_none());
    }

    #[test]
    fn skips_offer_with_non_numeric_price() {
        let mapped = map_offer(
            offer(json!({
                "id": "5",
                "itineraries": [{"segments": [
                    {"carrierCode": "AA", "departure": {"iataCode": "JFK"},
                     "arrival": {"iataCode": "LAX"}}
                ]}],
                "price": {"grandTotal": "call us", "currency": "USD"},
                "travelerPricings": [{}]
            })),
            "2024-12-20",
            None,
        );
        assert!(mapped.is_none());
    }

    #[test]
    fn skips_offer_returning_to_its_origin() {
        let mapped = map_offer(
            offer(json!({
                "id": "6",
                "itineraries": [{"segments": [
                    {"carrierCode": "AA", "departure": {"iataCode": "JFK"},
                     "arrival": {"iataCode": "JFK"}}
                ]}],
                "price": {"grandTotal": "99.00", "currency": "USD"},
                "travelerPricings": [{}]
            })),
            "2024-12-20",
            None,
        );
        assert!(mapped.is_none());
    }

    #[test]
    fn skips_offer_without_traveler_pricings() {
        let mapped = map_offer(
            offer(json!({
                "id": "7",
                "itineraries": [{"segments": [
                    {"carrierCode": "AA", "departure": {"iataCode": "JFK"},
                     "arrival": {"iataCode": "LAX"}}
                ]}],
                "price": {"grandTotal": "99.00", "currency": "USD"},
                "travelerPricings": []
            })),
            "2024-12-20",
            None,
        );
        assert!(mapped.is_none());
    }

    #[test]
    fn offer_response_tolerates_missing_data_field() {
        let body: OfferResponse = serde_json::from_value(json!({})).expect("decode");
        assert!(body.data.is_empty());
    }
}
