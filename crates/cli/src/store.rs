//! User store access.
//!
//! Commands talk to the database through [`UserStore`] so the reset flow can
//! be exercised against an in-memory store in tests. [`PgUserStore`] is the
//! production implementation.
//!
//! Queries are built at runtime because the table name is configurable;
//! values are always bound, only the validated table name is spliced in.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use supermarket_core::{Email, PasswordHash};

use crate::config::TableName;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx (connect, query, update).
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// A user record as far as this tool cares.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub email: Email,
    pub password: PasswordHash,
}

/// Persistent store of user records, keyed by email.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up the user with this exact email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserRecord>, StoreError>;

    /// Overwrite the password of the user with this email.
    ///
    /// Returns the number of records updated (0 or 1).
    async fn update_password(&self, email: &Email, hash: &PasswordHash)
    -> Result<u64, StoreError>;

    /// Release the underlying connection. Called exactly once per command.
    async fn disconnect(&self);
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    email: String,
    password: PasswordHash,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email)
            .map_err(|e| StoreError::DataCorruption(format!("invalid email in database: {e}")))?;

        Ok(Self {
            email,
            password: row.password,
        })
    }
}

/// `PostgreSQL`-backed user store.
pub struct PgUserStore {
    pool: PgPool,
    table: TableName,
}

impl PgUserStore {
    /// Connect to the user database.
    ///
    /// A single connection is enough: commands issue their queries one after
    /// another.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the connection cannot be established.
    pub async fn connect(database_url: &SecretString, table: TableName) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url.expose_secret())
            .await?;

        Ok(Self { pool, table })
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserRecord>, StoreError> {
        let sql = format!(
            "SELECT email, password FROM {} WHERE email = $1",
            self.table.quoted()
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn update_password(
        &self,
        email: &Email,
        hash: &PasswordHash,
    ) -> Result<u64, StoreError> {
        let sql = format!(
            "UPDATE {} SET password = $1 WHERE email = $2",
            self.table.quoted()
        );

        let result = sqlx::query(&sql)
            .bind(hash)
            .bind(email)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn disconnect(&self) {
        tracing::debug!(table = self.table.as_str(), "Closing database connection");
        self.pool.close().await;
    }
}
