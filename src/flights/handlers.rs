use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{
    AirlineParams, ClearResponse, FlightsResponse, OriginParams, PriceParams, SearchRequest,
};
use crate::{error::ApiError, flights::types::SearchQuery, state::AppState};

pub fn flight_routes() -> Router<AppState> {
    Router::new()
        .route("/api/flights", get(list_flights))
        .route("/api/flights/search", post(search_flights))
        .route("/api/flights/clear", post(clear_flights))
        .route("/api/flights/airline", get(flights_by_airline))
        .route("/api/flights/price", get(flights_by_price))
        .route("/api/flights/origin", get(flights_by_origin))
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[instrument(skip(state, payload))]
pub async fn search_flights(
    State(state): State<AppState>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<FlightsResponse>, ApiError> {
    let (origin, destination, departure_date) = match (
        present(payload.origin),
        present(payload.destination),
        present(payload.departure_date),
    ) {
        (Some(o), Some(d), Some(date)) => (o, d, date),
        _ => {
            warn!("flight search missing required fields");
            return Err(ApiError::Validation(
                "origin, destination and departureDate are required".into(),
            ));
        }
    };

    let query = SearchQuery {
        origin,
        destination,
        departure_date,
        return_date: present(payload.return_date),
        adults: payload.adults.unwrap_or(1),
    };

    let offers = state.provider.search(&query).await?;
    let new_flights = state.flights.append(offers);

    info!(origin = %query.origin, destination = %query.destination,
          added = new_flights.len(), "flight search completed");
    Ok(Json(FlightsResponse::success(new_flights)))
}

#[instrument(skip(state))]
pub async fn list_flights(State(state): State<AppState>) -> Json<FlightsResponse> {
    Json(FlightsResponse::success(state.flights.list()))
}

#[instrument(skip(state))]
pub async fn clear_flights(State(state): State<AppState>) -> Json<ClearResponse> {
    state.flights.clear();
    Json(ClearResponse {
        status: "success",
        message: "All flights have been cleared",
    })
}

#[instrument(skip(state))]
pub async fn flights_by_airline(
    State(state): State<AppState>,
    Query(params): Query<AirlineParams>,
) -> Result<Json<FlightsResponse>, ApiError> {
    let code = present(params.airline_code).ok_or_else(|| {
        warn!("airline filter missing airline_code");
        ApiError::Validation("airline_code query parameter is required".into())
    })?;
    Ok(Json(FlightsResponse::success(
        state.flights.filter_by_airline(&code),
    )))
}

#[instrument(skip(state))]
pub async fn flights_by_price(
    State(state): State<AppState>,
    Query(params): Query<PriceParams>,
) -> Result<Json<FlightsResponse>, ApiError> {
    let (min, max) = match (present(params.min), present(params.max)) {
        (Some(min), Some(max)) => (min, max),
        _ => {
            warn!("price filter missing min or max");
            return Err(ApiError::Validation(
                "min and max query parameters are required".into(),
            ));
        }
    };

    let min: f64 = min
        .parse()
        .map_err(|_| ApiError::InvalidRange("min and max must be numeric".into()))?;
    let max: f64 = max
        .parse()
        .map_err(|_| ApiError::InvalidRange("min and max must be numeric".into()))?;

    let flights = state
        .flights
        .filter_by_price_range(min, max)
        .map_err(|e| ApiError::InvalidRange(e.to_string()))?;
    Ok(Json(FlightsResponse::success(flights)))
}

#[instrument(skip(state))]
pub async fn flights_by_origin(
    State(state): State<AppState>,
    Query(params): Query<OriginParams>,
) -> Result<Json<FlightsResponse>, ApiError> {
    let code = present(params.origin_code).ok_or_else(|| {
        warn!("origin filter missing origin_code");
        ApiError::Validation("origin_code query parameter is required".into())
    })?;
    Ok(Json(FlightsResponse::success(
        state.flights.filter_by_origin(&code),
    )))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::flights::provider::StubProvider;
    use crate::flights::types::FlightRecord;
    use crate::state::AppState;

    fn aa_jfk_lax() -> FlightRecord {
        FlightRecord {
            airline: "AA".into(),
            origin: "JFK".into(),
            destination: "LAX".into(),
            departure_date: "2024-12-20".into(),
            return_date: Some("2024-12-27".into()),
            price: "250.00 USD".into(),
        }
    }

    fn search_body() -> SearchRequest {
        SearchRequest {
            origin: Some("JFK".into()),
            destination: Some("LAX".into()),
            departure_date: Some("2024-12-20".into()),
            return_date: Some("2024-12-27".into()),
            adults: None,
        }
    }

    async fn state_with_offers(records: Vec<FlightRecord>) -> AppState {
        AppState::for_tests_with(Arc::new(StubProvider { records })).await
    }

    #[tokio::test]
    async fn search_stores_offers_and_returns_only_new_ones() {
        let state = state_with_offers(vec![aa_jfk_lax()]).await;

        let body = search_flights(State(state.clone()), Json(search_body()))
            .await
            .expect("search should succeed");
        assert_eq!(body.status, "success");
        assert_eq!(body.flights, vec![aa_jfk_lax()]);

        // The provider returns the same offer again: nothing new.
        let body = search_flights(State(state.clone()), Json(search_body()))
            .await
            .expect("search should succeed");
        assert!(body.flights.is_empty());
        assert_eq!(state.flights.list().len(), 1);
    }

    #[tokio::test]
    async fn search_requires_origin_destination_and_date() {
        let state = state_with_offers(vec![]).await;

        let mut body = search_body();
        body.departure_date = None;
        let err = search_flights(State(state), Json(body))
            .await
            .expect_err("missing departureDate");
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn list_and_clear_roundtrip() {
        let state = state_with_offers(vec![aa_jfk_lax()]).await;
        search_flights(State(state.clone()), Json(search_body()))
            .await
            .expect("seed the cache");

        let listed = list_flights(State(state.clone())).await;
        assert_eq!(listed.flights.len(), 1);

        let cleared = clear_flights(State(state.clone())).await;
        assert_eq!(cleared.message, "All flights have been cleared");
        assert!(list_flights(State(state)).await.flights.is_empty());
    }

    #[tokio::test]
    async fn airline_filter_hits_and_misses() {
        let state = state_with_offers(vec![aa_jfk_lax()]).await;
        search_flights(State(state.clone()), Json(search_body()))
            .await
            .expect("seed the cache");

        let hits = flights_by_airline(
            State(state.clone()),
            Query(AirlineParams {
                airline_code: Some("AA".into()),
            }),
        )
        .await
        .expect("filter should succeed");
        assert_eq!(hits.flights.len(), 1);

        let misses = flights_by_airline(
            State(state),
            Query(AirlineParams {
                airline_code: Some("DL".into()),
            }),
        )
        .await
        .expect("filter should succeed");
        assert!(misses.flights.is_empty());
    }

    #[tokio::test]
    async fn price_filter_validates_bounds() {
        let state = state_with_offers(vec![aa_jfk_lax()]).await;
        search_flights(State(state.clone()), Json(search_body()))
            .await
            .expect("seed the cache");

        let hits = flights_by_price(
            State(state.clone()),
            Query(PriceParams {
                min: Some("200".into()),
                max: Some("300".into()),
            }),
        )
        .await
        .expect("filter should succeed");
        assert_eq!(hits.flights.len(), 1);

        let err = flights_by_price(
            State(state.clone()),
            Query(PriceParams {
                min: Some("400".into()),
                max: Some("300".into()),
            }),
        )
        .await
        .expect_err("inverted range");
        assert!(matches!(err, ApiError::InvalidRange(_)));

        let err = flights_by_price(
            State(state),
            Query(PriceParams {
                min: Some("cheap".into()),
                max: Some("300".into()),
            }),
        )
        .await
        .expect_err("non-numeric bound");
        assert!(matches!(err, ApiError::InvalidRange(_)));
    }

    #[tokio::test]
    async fn origin_filter_requires_its_parameter() {
        let state = state_with_offers(vec![]).await;
        let err = flights_by_origin(State(state), Query(OriginParams { origin_code: None }))
            .await
            .expect_err("missing origin_code");
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
