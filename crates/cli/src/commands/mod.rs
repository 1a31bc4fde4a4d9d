//! CLI command implementations.

pub mod admin;
