//! Paste storage operations.

use super::{read_table, write_table};
use crate::{error::AppError, models::paste::Paste};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

const TABLE: &str = "pastes";

#[derive(Default)]
struct PasteTable {
    by_id: HashMap<String, Paste>,
    /// Safety token -> paste id.
    by_safety: HashMap<String, String>,
}

impl PasteTable {
    fn remove(&mut self, id: &str) -> Option<Paste> {
        let paste = self.by_id.remove(id)?;
        self.by_safety.remove(&paste.safety);
        Some(paste)
    }
}

/// Accessor for stored pastes.
#[derive(Default)]
pub struct PasteDb {
    inner: RwLock<PasteTable>,
}

impl PasteDb {
    /// Insert a new paste.
    ///
    /// # Errors
    /// Returns [`AppError::Conflict`] when the id or safety token is already
    /// taken, or a storage error when the table lock is poisoned.
    pub fn create(&self, paste: Paste) -> Result<(), AppError> {
        let mut table = write_table(&self.inner, TABLE)?;
        if table.by_id.contains_key(&paste.id) || table.by_safety.contains_key(&paste.safety) {
            return Err(AppError::Conflict(format!(
                "Paste id '{}' already exists",
                paste.id
            )));
        }
        table.by_safety.insert(paste.safety.clone(), paste.id.clone());
        table.by_id.insert(paste.id.clone(), paste);
        Ok(())
    }

    /// Fetch a paste by id without touching its view count.
    ///
    /// # Returns
    /// `Ok(None)` when the paste is missing or expired as of `now`.
    pub fn get(&self, id: &str, now: DateTime<Utc>) -> Result<Option<Paste>, AppError> {
        let table = read_table(&self.inner, TABLE)?;
        Ok(table
            .by_id
            .get(id)
            .filter(|paste| !paste.is_expired_at(now))
            .cloned())
    }

    /// Fetch a paste and count the read.
    ///
    /// Expired pastes are dropped on the way.
    ///
    /// # Returns
    /// The paste as stored after the increment, or `Ok(None)` when missing or
    /// expired.
    pub fn record_view(&self, id: &str, now: DateTime<Utc>) -> Result<Option<Paste>, AppError> {
        let mut table = write_table(&self.inner, TABLE)?;
        let expired = match table.by_id.get(id) {
            None => return Ok(None),
            Some(paste) => paste.is_expired_at(now),
        };
        if expired {
            table.remove(id);
            return Ok(None);
        }
        Ok(table.by_id.get_mut(id).map(|paste| {
            paste.views = paste.views.saturating_add(1);
            paste.clone()
        }))
    }

    /// Delete the paste owning `safety`.
    ///
    /// # Returns
    /// The deleted paste id, or `Ok(None)` when no paste matches.
    pub fn delete_by_safety(&self, safety: &str) -> Result<Option<String>, AppError> {
        let mut table = write_table(&self.inner, TABLE)?;
        let Some(id) = table.by_safety.get(safety).cloned() else {
            return Ok(None);
        };
        Ok(table.remove(&id).map(|paste| paste.id))
    }

    /// Drop every paste that has expired as of `now`.
    ///
    /// # Returns
    /// Number of pastes removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let mut table = write_table(&self.inner, TABLE)?;
        let expired: Vec<String> = table
            .by_id
            .values()
            .filter(|paste| paste.is_expired_at(now))
            .map(|paste| paste.id.clone())
            .collect();
        for id in &expired {
            table.remove(id);
        }
        Ok(expired.len())
    }

    /// Number of stored pastes, including expired ones not yet purged.
    pub fn len(&self) -> Result<usize, AppError> {
        Ok(read_table(&self.inner, TABLE)?.by_id.len())
    }

    /// Whether the table holds no pastes.
    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.len()? == 0)
    }
}
