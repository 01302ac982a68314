use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User record in the database. Password material is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub salt: Vec<u8>,
    #[serde(skip_serializing)]
    pub hashed_password: Vec<u8>,
}
