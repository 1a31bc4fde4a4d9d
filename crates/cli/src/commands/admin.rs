//! Admin account password commands.
//!
//! # Usage
//!
//! ```bash
//! # Reset the default admin account to the default password
//! sm-cli admin reset-password
//!
//! # Reset a specific account
//! sm-cli admin reset-password -e ops@supermarket.com -p 'temporary-pass'
//!
//! # Check that a password works for an account
//! sm-cli admin check-password -e ops@supermarket.com -p 'temporary-pass'
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string for the user database
//! - `USER_TABLE` - Table holding user records (default: `User`)
//! - `ADMIN_RESET_PASSWORD` - Password to set/check when `-p` is not given

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use supermarket_core::{
    DEFAULT_COST, Email, EmailError, PasswordError, hash_password, verify_password,
};

use crate::config::{CliConfig, ConfigError};
use crate::store::{PgUserStore, StoreError, UserStore};

/// Account targeted when no email is given.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@supermarket.com";

/// Password set when none is given.
pub const DEFAULT_ADMIN_PASSWORD: &str = "password123";

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// No user record with the target email.
    #[error("No user found with email: {0}")]
    NotFound(Email),

    /// The password does not match the stored hash.
    #[error("Password does not match for user: {0}")]
    Mismatch(Email),

    /// Connection, query or update failure.
    #[error("Database error: {0}")]
    Store(#[from] StoreError),

    /// Password hashing or verification failure.
    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Reset a user's password.
///
/// # Arguments
///
/// * `email` - Email of the account to reset
/// * `password` - New plaintext password
///
/// # Errors
///
/// Returns `AdminError::NotFound` if no user has this email; the store is
/// never written in that case. Any configuration, database, or hashing
/// failure is returned as-is.
pub async fn reset_password(email: &str, password: &SecretString) -> Result<(), AdminError> {
    let config = CliConfig::from_env()?;
    let email = Email::parse(email)?;

    tracing::info!("Connecting to database...");
    let store = PgUserStore::connect(&config.database_url, config.user_table).await?;

    run_reset(&store, &email, password, DEFAULT_COST).await
}

/// Check a plaintext password against a user's stored hash.
///
/// # Errors
///
/// Returns `AdminError::Mismatch` if the password does not verify, and
/// `AdminError::NotFound` if no user has this email.
pub async fn check_password(email: &str, password: &SecretString) -> Result<(), AdminError> {
    let config = CliConfig::from_env()?;
    let email = Email::parse(email)?;

    tracing::info!("Connecting to database...");
    let store = PgUserStore::connect(&config.database_url, config.user_table).await?;

    run_check(&store, &email, password).await
}

/// Reset against an already connected store, then disconnect it.
///
/// The store is disconnected exactly once whatever the outcome.
///
/// # Errors
///
/// See [`reset_password`].
pub async fn run_reset<S: UserStore + ?Sized>(
    store: &S,
    email: &Email,
    password: &SecretString,
    cost: u32,
) -> Result<(), AdminError> {
    let result = reset_with(store, email, password, cost).await;
    store.disconnect().await;
    result
}

/// Check against an already connected store, then disconnect it.
///
/// # Errors
///
/// See [`check_password`].
pub async fn run_check<S: UserStore + ?Sized>(
    store: &S,
    email: &Email,
    password: &SecretString,
) -> Result<(), AdminError> {
    let result = check_with(store, email, password).await;
    store.disconnect().await;
    result
}

async fn reset_with<S: UserStore + ?Sized>(
    store: &S,
    email: &Email,
    password: &SecretString,
    cost: u32,
) -> Result<(), AdminError> {
    let user = store
        .find_by_email(email)
        .await?
        .ok_or_else(|| AdminError::NotFound(email.clone()))?;

    tracing::info!("Resetting password for: {}", user.email);
    let hash = hash_password(password.expose_secret(), cost)?;

    // Row may have been deleted since the lookup
    let updated = store.update_password(&user.email, &hash).await?;
    if updated == 0 {
        return Err(AdminError::NotFound(user.email));
    }

    tracing::info!("Password reset successfully!");
    tracing::info!("  Email: {}", user.email);
    tracing::info!("  Password: {}", password.expose_secret());
    tracing::info!("");
    tracing::warn!("Change this password after logging in. It is shown in plain text above.");

    Ok(())
}

async fn check_with<S: UserStore + ?Sized>(
    store: &S,
    email: &Email,
    password: &SecretString,
) -> Result<(), AdminError> {
    let user = store
        .find_by_email(email)
        .await?
        .ok_or_else(|| AdminError::NotFound(email.clone()))?;

    if !verify_password(password.expose_secret(), &user.password)? {
        return Err(AdminError::Mismatch(user.email));
    }

    tracing::info!("Password matches for: {}", user.email);
    Ok(())
}
