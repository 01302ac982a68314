use serde::{Deserialize, Serialize};

/// Request body for account creation.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Request body for a password update.
#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub username: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Confirmation returned by every account operation.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
