//! User account repository

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Database representation of a user role
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Agent,
    Customer,
    Provider,
}

/// Database row for a user account
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const SELECT_USER: &str = r#"
    SELECT user_id, email, username, password_hash, full_name, phone, address,
           role, is_active, created_at, updated_at
    FROM users
"#;

/// Data access for the `users` table
pub struct UserRepository;

impl UserRepository {
    pub async fn find_by_id(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Option<UserRow>, DatabaseError> {
        let sql = format!("{SELECT_USER} WHERE user_id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id)
            .fetch_optional(conn)
            .await?;
        Ok(row)
    }

    pub async fn find_by_username(
        conn: &mut PgConnection,
        username: &str,
    ) -> Result<Option<UserRow>, DatabaseError> {
        let sql = format!("{SELECT_USER} WHERE username = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(username)
            .fetch_optional(conn)
            .await?;
        Ok(row)
    }

    /// Emails are matched case-insensitively
    pub async fn find_by_email(
        conn: &mut PgConnection,
        email: &str,
    ) -> Result<Option<UserRow>, DatabaseError> {
        let sql = format!("{SELECT_USER} WHERE lower(email) = lower($1)");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(conn)
            .await?;
        Ok(row)
    }

    pub async fn insert(conn: &mut PgConnection, user: &UserRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id, email, username, password_hash, full_name, phone, address,
                role, is_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(user.user_id)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(user.role)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Rewrites the mutable columns of an existing user
    pub async fn update(conn: &mut PgConnection, user: &UserRow) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, username = $3, password_hash = $4, full_name = $5,
                phone = $6, address = $7, role = $8, is_active = $9, updated_at = $10
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(user.role)
        .bind(user.is_active)
        .bind(user.updated_at)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("User", user.user_id));
        }
        Ok(())
    }

    pub async fn list(
        conn: &mut PgConnection,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<UserRow>, DatabaseError> {
        let sql = format!("{SELECT_USER} ORDER BY created_at, user_id OFFSET $1 LIMIT $2");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(offset)
            .bind(limit)
            .fetch_all(conn)
            .await?;
        Ok(rows)
    }

    pub async fn count(conn: &mut PgConnection) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(conn)
            .await?;
        Ok(count)
    }
}
