//! Core domain library for ShareBin (config, validation, storage, models).

/// Configuration loading and defaults.
pub mod config;
/// Shared defaults and fixed sizes.
pub mod constants;
/// In-process paste and user storage.
pub mod db;
/// Environment variable helpers.
pub mod env;
/// Application error types (storage/domain).
pub mod error;
/// Relative time rendering.
pub mod humanize;
/// Identifier and token generation.
pub mod ids;
/// Data models for API requests and persistence.
pub mod models;
/// Paste password hashing.
pub mod password;
/// Paste submission validation.
pub mod validation;

pub use config::Config;
pub use constants::DEFAULT_PORT;
pub use db::Database;
pub use error::AppError;
pub use validation::{validate_paste, ValidationError};
