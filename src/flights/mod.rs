use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod provider;
pub mod store;
pub mod types;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::flight_routes())
}
