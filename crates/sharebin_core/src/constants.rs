//! Shared constants used across sharebin crates.

/// Default API port for sharebin.
pub const DEFAULT_PORT: u16 = 8181;

/// Default maximum number of characters accepted per file.
pub const DEFAULT_CHAR_LIMIT: usize = 300_000;

/// Default maximum number of files accepted per paste.
pub const DEFAULT_FILE_LIMIT: usize = 5;

/// Default global rate limit: requests allowed per window.
pub const DEFAULT_RATE_LIMIT_REQUESTS: u32 = 120;
/// Default global rate limit window in seconds.
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Session cookie lifetime in seconds. Not configurable.
pub const SESSION_MAX_AGE_SECS: i64 = 86_400;
/// Name of the signed session cookie.
pub const SESSION_COOKIE_NAME: &str = "sharebin.sid";
/// Upper bound on paste ids remembered per session.
pub const SESSION_RECENT_PASTES_LIMIT: usize = 50;

/// Id of the administrator account created from `ADMIN_TOKEN`.
pub const ADMIN_USER_ID: i64 = 1;
/// Username of that account unless `ADMIN_USERNAME` overrides it.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Random bytes behind a paste identifier (72 bits, 18 hex chars).
pub const PASTE_ID_BYTES: usize = 9;
/// Random bytes behind a safety or user token.
pub const TOKEN_BYTES: usize = 64;

/// Extra request body allowance on top of the paste content budget, covering
/// JSON structure, filenames, and other metadata.
pub const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

/// Worst-case encoded size of one character in a JSON body (`\uXXXX`).
pub const MAX_ENCODED_CHAR_BYTES: usize = 6;
