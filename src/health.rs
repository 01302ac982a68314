use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::{error, instrument};

use crate::{error::ApiError, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/db-check", get(db_check))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Verifies both connectivity and that the users table exists, so a
/// broken database surfaces here instead of on unrelated endpoints.
#[instrument(skip(state))]
pub async fn db_check(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    if let Err(e) = sqlx::query("SELECT 1").execute(&state.db).await {
        error!(error = %e, "database connectivity check failed");
        return Err(ApiError::DatabaseUnhealthy(
            "Database connection failed".into(),
        ));
    }

    let table: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'users'")
            .fetch_optional(&state.db)
            .await?;
    if table.is_none() {
        error!("users table is missing");
        return Err(ApiError::DatabaseUnhealthy(
            "users table does not exist".into(),
        ));
    }

    Ok(Json(json!({ "database_status": "healthy" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_healthy() {
        let body = health().await;
        assert_eq!(body.0["status"], "healthy");
    }

    #[tokio::test]
    async fn db_check_passes_after_migrations() {
        let state = crate::state::AppState::for_tests().await;
        let body = db_check(State(state)).await.expect("db should be healthy");
        assert_eq!(body.0["database_status"], "healthy");
    }
}
