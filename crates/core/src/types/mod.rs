//! Core types for Supermarket.
//!
//! This module provides type-safe wrappers for user lookup keys and stored
//! credentials.

pub mod email;
pub mod password;

pub use email::{Email, EmailError};
pub use password::{DEFAULT_COST, PasswordError, PasswordHash, hash_password, verify_password};
