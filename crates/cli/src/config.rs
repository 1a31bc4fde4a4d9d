//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string for the user database
//!
//! ## Optional
//! - `USER_TABLE` - Table holding user records (default: `User`)
//! - `RUST_LOG` - Log filter (default: `info`)

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_USER_TABLE: &str = "User";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),
}

/// A table name that is safe to splice into SQL.
///
/// Identifiers cannot be bound as query parameters, so the name is restricted
/// to `[A-Za-z_][A-Za-z0-9_]*` and always emitted double-quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    /// Postgres truncates identifiers beyond this many bytes.
    const MAX_LENGTH: usize = 63;

    /// Validate a table name.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the name is empty, too long,
    /// or contains anything but ASCII letters, digits and underscores.
    pub fn parse(name: &str) -> Result<Self, String> {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return Err("table name cannot be empty".to_owned());
        };
        if name.len() > Self::MAX_LENGTH {
            return Err(format!(
                "table name must be at most {} characters",
                Self::MAX_LENGTH
            ));
        }
        if !(first.is_ascii_alphabetic() || first == '_') {
            return Err("table name must start with a letter or underscore".to_owned());
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err("table name may only contain letters, digits and underscores".to_owned());
        }
        Ok(Self(name.to_owned()))
    }

    /// Returns the name double-quoted for use in SQL.
    #[must_use]
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }

    /// Returns the bare table name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TableName {
    fn default() -> Self {
        Self(DEFAULT_USER_TABLE.to_owned())
    }
}

/// Configuration for commands that touch the user database.
///
/// `Debug` is derived: `SecretString` already redacts itself.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// `PostgreSQL` connection URL (contains password)
    pub database_url: SecretString,
    /// Table holding user records
    pub user_table: TableName,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `DATABASE_URL` is missing or `USER_TABLE` is
    /// not a plain identifier.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = std::env::var("DATABASE_URL")
            .map(SecretString::from)
            .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL"))?;

        let user_table = match std::env::var("USER_TABLE") {
            Ok(name) => TableName::parse(&name)
                .map_err(|reason| ConfigError::InvalidEnvVar("USER_TABLE", reason))?,
            Err(_) => TableName::default(),
        };

        Ok(Self {
            database_url,
            user_table,
        })
    }
}
