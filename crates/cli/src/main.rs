//! Supermarket CLI - Admin account management tools.
//!
//! # Usage
//!
//! ```bash
//! # Reset the admin account (admin@supermarket.com) to the default password
//! sm-cli admin reset-password
//!
//! # Reset another account to a chosen password
//! sm-cli admin reset-password -e ops@supermarket.com -p 'temporary-pass'
//!
//! # Verify a password against the stored hash
//! sm-cli admin check-password -e ops@supermarket.com -p 'temporary-pass'
//! ```
//!
//! # Commands
//!
//! - `admin reset-password` - Overwrite an existing user's password hash
//! - `admin check-password` - Verify a password against an existing user
//!
//! Exits with status 1 if the user does not exist or anything fails.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use commands::admin::{DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD};

mod commands;
mod config;
mod store;

#[derive(Parser)]
#[command(name = "sm-cli")]
#[command(author, version, about = "Supermarket CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Reset an existing user's password
    ResetPassword {
        #[command(flatten)]
        target: Target,
    },
    /// Check a password against an existing user's stored hash
    CheckPassword {
        #[command(flatten)]
        target: Target,
    },
}

#[derive(clap::Args)]
struct Target {
    /// Email of the account
    #[arg(short, long, default_value = DEFAULT_ADMIN_EMAIL)]
    email: String,

    /// Plaintext password
    #[arg(
        short,
        long,
        env = "ADMIN_RESET_PASSWORD",
        hide_env_values = true,
        default_value = DEFAULT_ADMIN_PASSWORD
    )]
    password: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing (info unless RUST_LOG says otherwise)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::admin::AdminError> {
    match cli.command {
        Commands::Admin { action } => match action {
            AdminAction::ResetPassword { target } => {
                let password = SecretString::from(target.password);
                commands::admin::reset_password(&target.email, &password).await?;
            }
            AdminAction::CheckPassword { target } => {
                let password = SecretString::from(target.password);
                commands::admin::check_password(&target.email, &password).await?;
            }
        },
    }
    Ok(())
}
