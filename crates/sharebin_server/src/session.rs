//! Signed cookie sessions and the per-session list of created pastes.

use crate::AppError;
use async_trait::async_trait;
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha512};
use sharebin_core::{
    config::SessionConfig,
    constants::{SESSION_COOKIE_NAME, SESSION_MAX_AGE_SECS, SESSION_RECENT_PASTES_LIMIT},
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};
use tower_sessions::{
    cookie::{
        time::{Duration, OffsetDateTime},
        Key, SameSite,
    },
    service::SignedCookie,
    session::{Error as SessionError, Id, Record},
    session_store::{self, SessionStore},
    Expiry, Session, SessionManagerLayer,
};

pub const SESSION_PASTES_KEY: &str = "pastes.recent";

/// Derive the cookie signing key from a configured secret.
///
/// SHA-512 yields exactly the 64 bytes the signing key needs, whatever the
/// secret's length.
pub fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

fn random_key() -> Key {
    let mut bytes = [0u8; 64];
    OsRng.fill_bytes(&mut bytes);
    Key::from(&bytes)
}

/// In-process session records.
///
/// Expired records stop loading immediately and are dropped by
/// [`SessionRecords::purge_expired`].
#[derive(Clone, Debug, Default)]
pub struct SessionRecords {
    records: Arc<Mutex<HashMap<Id, Record>>>,
}

impl SessionRecords {
    fn lock(&self) -> session_store::Result<MutexGuard<'_, HashMap<Id, Record>>> {
        self.records
            .lock()
            .map_err(|_| session_store::Error::Backend("session table lock is poisoned".to_string()))
    }

    /// Drop every record whose expiry has passed.
    ///
    /// # Returns
    /// The number of records removed.
    pub fn purge_expired(&self) -> Result<usize, AppError> {
        let now = OffsetDateTime::now_utc();
        let mut records = self
            .lock()
            .map_err(|err| AppError::StorageMessage(err.to_string()))?;
        let before = records.len();
        records.retain(|_, record| record.expiry_date > now);
        Ok(before - records.len())
    }

    /// Number of stored records, expired or not.
    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionStore for SessionRecords {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let mut records = self.lock()?;
        while records.contains_key(&record.id) {
            record.id = Id::default();
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.lock()?.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let now = OffsetDateTime::now_utc();
        Ok(self
            .lock()?
            .get(session_id)
            .filter(|record| record.expiry_date > now)
            .cloned())
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.lock()?.remove(session_id);
        Ok(())
    }
}

/// Periodically drop expired session records.
pub fn spawn_session_purge(
    records: SessionRecords,
    interval: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            match records.purge_expired() {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "Purged expired sessions"),
                Err(err) => tracing::warn!("Failed to purge expired sessions: {}", err),
            }
        }
    })
}

/// Build the session layer over the in-process store.
///
/// Without a configured secret a random key is used, so sessions do not
/// survive a restart.
pub fn session_layer(
    config: &SessionConfig,
    records: SessionRecords,
) -> SessionManagerLayer<SessionRecords, SignedCookie> {
    let key = match config.secret.as_deref() {
        Some(secret) => signing_key(secret),
        None => {
            tracing::warn!("SESSION_SECRET is not set; using a random signing key");
            random_key()
        }
    };
    if config.store_url.is_some() {
        tracing::warn!(
            "SESSION_STORE_URL is set but only the in-process session store is available"
        );
    }

    SessionManagerLayer::new(records)
        .with_name(SESSION_COOKIE_NAME)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_path("/")
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(SESSION_MAX_AGE_SECS)))
        .with_signed(key)
}

fn session_failure(err: SessionError) -> AppError {
    AppError::StorageMessage(format!("Session store failure: {}", err))
}

/// Ids of pastes created in this session, most recent first.
pub async fn recent_pastes(session: &Session) -> Result<Vec<String>, AppError> {
    Ok(session
        .get::<Vec<String>>(SESSION_PASTES_KEY)
        .await
        .map_err(session_failure)?
        .unwrap_or_default())
}

/// Record a newly created paste at the front of the session list.
pub async fn remember_paste(session: &Session, id: &str) -> Result<(), AppError> {
    let mut ids = recent_pastes(session).await?;
    ids.retain(|existing| existing != id);
    ids.insert(0, id.to_string());
    ids.truncate(SESSION_RECENT_PASTES_LIMIT);
    session
        .insert(SESSION_PASTES_KEY, ids)
        .await
        .map_err(session_failure)
}
