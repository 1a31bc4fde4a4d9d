//! Supermarket Core - Shared domain types.
//!
//! This crate provides the types shared by the Supermarket admin tooling:
//! - `cli` - Command-line tools for admin account management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no database
//! access, no HTTP clients. Password hashing lives here because it is CPU-only
//! and is needed by both the reset command and the login check.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails and password hashes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
