pub use crate::auth::repo_types::User;
use sqlx::SqlitePool;

impl User {
    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(db: &SqlitePool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, salt, hashed_password
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password material.
    pub async fn create(
        db: &SqlitePool,
        username: &str,
        salt: &[u8],
        hashed_password: &[u8],
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, salt, hashed_password)
            VALUES (?1, ?2, ?3)
            RETURNING id, username, salt, hashed_password
            "#,
        )
        .bind(username)
        .bind(salt)
        .bind(hashed_password)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Replace salt and digest in place. Both columns always change
    /// together.
    pub async fn update_password(
        db: &SqlitePool,
        username: &str,
        salt: &[u8],
        hashed_password: &[u8],
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET salt = ?1, hashed_password = ?2
            WHERE username = ?3
            "#,
        )
        .bind(salt)
        .bind(hashed_password)
        .bind(username)
        .execute(db)
        .await?;
        Ok(())
    }
}
