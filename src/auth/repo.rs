use sqlx::PgPool;
use uuid::Uuid;

use crate::{auth::repo_types::User, error::ApiError};

impl User {
    /// Find a user by (lowercased) email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, mobile, created_at, last_login
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, mobile, created_at, last_login
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password. A concurrent signup racing on
    /// the same email surfaces as a unique violation, mapped to Duplicate.
    pub async fn create(
        db: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
        mobile: Option<&str>,
    ) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, mobile)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, mobile, created_at, last_login
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(mobile)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Record a successful login.
    pub async fn touch_last_login(db: &PgPool, id: Uuid) -> Result<(), ApiError> {
        sqlx::query("UPDATE users SET last_login = now() WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}
