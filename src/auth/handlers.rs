use axum::{
    extract::State,
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{CreateAccountRequest, LoginRequest, MessageResponse, UpdatePasswordRequest};
use crate::{
    auth::{
        password::{generate_salt, hash_password, verify_password},
        repo::User,
    },
    error::ApiError,
    state::AppState,
};

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/create-account", post(create_account))
        .route("/login", post(login))
        .route("/update-password", put(update_password))
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[instrument(skip(state, payload))]
pub async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let (username, password) = match (present(payload.username), present(payload.password)) {
        (Some(u), Some(p)) => (u, p),
        _ => {
            warn!("create-account missing username or password");
            return Err(ApiError::Validation(
                "Username and password are required".into(),
            ));
        }
    };

    if User::find_by_username(&state.db, &username).await?.is_some() {
        warn!(username = %username, "username already exists");
        return Err(ApiError::DuplicateUsername);
    }

    let salt = generate_salt();
    let hashed = hash_password(&password, &salt)?;
    let user = User::create(&state.db, &username, &salt, &hashed).await?;

    info!(user_id = user.id, username = %user.username, "account created");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Account created successfully",
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (username, password) = match (present(payload.username), present(payload.password)) {
        (Some(u), Some(p)) => (u, p),
        _ => {
            warn!("login missing username or password");
            return Err(ApiError::Validation(
                "Username and password are required".into(),
            ));
        }
    };

    // Unknown username and wrong password answer identically so that
    // account existence does not leak.
    let user = match User::find_by_username(&state.db, &username).await? {
        Some(u) => u,
        None => {
            warn!(username = %username, "login unknown username");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&password, &user.salt, &user.hashed_password)? {
        warn!(username = %username, user_id = user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(MessageResponse {
        message: "Login successful",
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_password(
    State(state): State<AppState>,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (username, current_password, new_password) = match (
        present(payload.username),
        present(payload.current_password),
        present(payload.new_password),
    ) {
        (Some(u), Some(c), Some(n)) => (u, c, n),
        _ => {
            warn!("update-password missing fields");
            return Err(ApiError::Validation("All fields are required".into()));
        }
    };

    let user = match User::find_by_username(&state.db, &username).await? {
        Some(u) => u,
        None => {
            warn!(username = %username, "update-password unknown username");
            return Err(ApiError::UserNotFound);
        }
    };

    if !verify_password(&current_password, &user.salt, &user.hashed_password)? {
        warn!(username = %username, user_id = user.id, "update-password wrong current password");
        return Err(ApiError::InvalidCurrentPassword);
    }

    let salt = generate_salt();
    let hashed = hash_password(&new_password, &salt)?;
    User::update_password(&state.db, &username, &salt, &hashed).await?;

    info!(user_id = user.id, username = %user.username, "password updated");
    Ok(Json(MessageResponse {
        message: "Password updated successfully",
    }))
}
