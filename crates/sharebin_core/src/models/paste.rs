//! Paste-related data models.

use crate::{humanize::natural_time_since, ids};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Keep `Some(..)` for a field that is present, even when its value is `null`.
///
/// Paired with `#[serde(default)]` so an absent field stays `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Request payload for creating a paste.
///
/// Fields are optional so validation can report which one is missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PasteSubmission {
    #[serde(default)]
    pub files: Option<Vec<FileSubmission>>,
    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,
    #[serde(default)]
    pub password: Option<String>,
}

/// One file inside a [`PasteSubmission`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileSubmission {
    /// Outer `None`: key absent. Inner `None`: explicit `null`.
    #[serde(default, deserialize_with = "present")]
    pub content: Option<Option<String>>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub syntax: Option<String>,
}

impl FileSubmission {
    /// Build a file submission carrying only content.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(Some(content.into())),
            ..Self::default()
        }
    }
}

impl PasteSubmission {
    /// Wrap a plain-text body as a single unnamed file.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            files: Some(vec![FileSubmission::with_content(text)]),
            ..Self::default()
        }
    }
}

/// A file stored inside a paste.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PasteFile {
    pub filename: String,
    pub syntax: Option<String>,
    pub content: String,
    /// Line count (newlines + 1).
    pub loc: usize,
    /// Length in Unicode scalar values.
    pub charcount: usize,
}

impl PasteFile {
    /// Build a stored file, filling in derived counts and a default name.
    ///
    /// # Arguments
    /// - `index`: Position of the file within its paste.
    /// - `filename`: Caller-supplied name; blank names fall back to `file_<index>`.
    /// - `syntax`: Optional highlighting hint, normalized to lowercase.
    /// - `content`: File text.
    pub fn new(
        index: usize,
        filename: Option<String>,
        syntax: Option<String>,
        content: String,
    ) -> Self {
        let filename = filename
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("file_{}", index));
        Self {
            filename,
            syntax: normalize_syntax(syntax.as_deref()),
            loc: content.matches('\n').count() + 1,
            charcount: content.chars().count(),
            content,
        }
    }
}

/// Normalize an optional syntax hint.
///
/// # Returns
/// Lowercased syntax when non-empty after trimming, otherwise `None`.
pub fn normalize_syntax(syntax: Option<&str>) -> Option<String> {
    syntax
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| value.to_ascii_lowercase())
}

/// A stored paste.
///
/// `Debug` redacts the safety token and password hash.
#[derive(Clone)]
pub struct Paste {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub password_hash: Option<String>,
    pub safety: String,
    pub views: u64,
    pub files: Vec<PasteFile>,
}

impl Paste {
    /// Create a paste with a fresh identifier and safety token.
    pub fn new(files: Vec<PasteFile>) -> Self {
        Self {
            id: ids::generate_id(),
            created_at: Utc::now(),
            expires_at: None,
            password_hash: None,
            safety: ids::generate_safety_token(),
            views: 0,
            files,
        }
    }

    /// Whether the paste has expired as of `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    /// Whether reading the paste requires a password.
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

impl fmt::Debug for Paste {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paste")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .field("has_password", &self.has_password())
            .field("views", &self.views)
            .field("files", &self.files.len())
            .finish_non_exhaustive()
    }
}

/// Response body for a newly created paste.
///
/// This is the only place the safety token leaves the server.
#[derive(Serialize)]
pub struct CreatedPaste {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub expires: Option<DateTime<Utc>>,
    pub safety: String,
}

impl From<&Paste> for CreatedPaste {
    fn from(value: &Paste) -> Self {
        Self {
            id: value.id.clone(),
            created_at: value.created_at,
            expires: value.expires_at,
            safety: value.safety.clone(),
        }
    }
}

/// Public view of a paste returned by the read endpoint.
#[derive(Debug, Serialize)]
pub struct PasteView {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Relative creation time, e.g. `"3 hours ago"`.
    pub created_ago: String,
    pub expires: Option<DateTime<Utc>>,
    /// Relative expiry, e.g. `"2 days from now"`.
    pub expires_in: Option<String>,
    pub views: u64,
    pub has_password: bool,
    pub files: Vec<PasteFile>,
}

impl PasteView {
    /// Build the view with relative times measured from `now`.
    pub fn at(value: &Paste, now: DateTime<Utc>) -> Self {
        Self {
            id: value.id.clone(),
            created_at: value.created_at,
            created_ago: natural_time_since(value.created_at, now),
            expires: value.expires_at,
            expires_in: value
                .expires_at
                .map(|expires_at| natural_time_since(expires_at, now)),
            views: value.views,
            has_password: value.has_password(),
            files: value.files.clone(),
        }
    }
}

impl From<&Paste> for PasteView {
    fn from(value: &Paste) -> Self {
        Self::at(value, Utc::now())
    }
}

/// Query parameters for reading a paste.
#[derive(Default, Deserialize)]
pub struct PasteAccessQuery {
    pub password: Option<String>,
}
