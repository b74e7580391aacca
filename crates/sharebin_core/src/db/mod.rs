//! In-process persistence for pastes and users.
//!
//! Stands in for the external key-value store the service is deployed
//! against. Each table guards its own state; no lock is held across calls.

/// Paste storage helpers.
pub mod paste;
/// User storage helpers.
pub mod user;

use crate::error::AppError;
use std::sync::{PoisonError, RwLockReadGuard, RwLockWriteGuard};

/// Database handle grouping the paste and user tables.
#[derive(Default)]
pub struct Database {
    pub pastes: paste::PasteDb,
    pub users: user::UserDb,
}

impl Database {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(table: &'static str) -> impl FnOnce(PoisonError<T>) -> AppError {
    move |_| AppError::StorageMessage(format!("{} table lock is poisoned", table))
}

pub(crate) fn read_table<'a, T>(
    lock: &'a std::sync::RwLock<T>,
    table: &'static str,
) -> Result<RwLockReadGuard<'a, T>, AppError> {
    lock.read().map_err(poisoned(table))
}

pub(crate) fn write_table<'a, T>(
    lock: &'a std::sync::RwLock<T>,
    table: &'static str,
) -> Result<RwLockWriteGuard<'a, T>, AppError> {
    lock.write().map_err(poisoned(table))
}
