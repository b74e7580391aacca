//! Configuration loading from environment variables.

use crate::constants::{
    BODY_OVERHEAD_BYTES, DEFAULT_CHAR_LIMIT, DEFAULT_FILE_LIMIT, DEFAULT_PORT,
    DEFAULT_RATE_LIMIT_REQUESTS, DEFAULT_RATE_LIMIT_WINDOW_SECS, MAX_ENCODED_CHAR_BYTES,
};
use crate::constants::DEFAULT_ADMIN_USERNAME;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Runtime configuration for sharebin.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub limits: PasteLimits,
    pub rate_limit: RateLimitConfig,
    pub session: SessionConfig,
    pub admin: AdminConfig,
    /// Route every request to the maintenance page.
    pub maintenance: bool,
}

/// Per-paste size limits enforced by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasteLimits {
    /// Maximum characters per file.
    pub char_limit: usize,
    /// Maximum files per paste.
    pub file_limit: usize,
}

/// Global request-rate ceiling applied before routing.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests allowed per window. Zero disables limiting.
    pub requests: u32,
    pub window_secs: u64,
    /// Let loopback callers through without counting them.
    pub ignore_localhost: bool,
    /// External counter store; only in-process counting ships.
    pub store_url: Option<String>,
}

/// Session cookie settings.
#[derive(Clone, Default)]
pub struct SessionConfig {
    /// Cookie signing secret. A random secret is used when unset.
    pub secret: Option<String>,
    /// External session store; only the in-process store ships.
    pub store_url: Option<String>,
}

/// Administrator account created at startup.
///
/// Without a token no account is created and the user endpoints answer 401.
#[derive(Clone)]
pub struct AdminConfig {
    pub username: String,
    pub token: Option<String>,
}

fn redacted(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "<redacted>"
    } else {
        "<unset>"
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &redacted(&self.secret))
            .field("store_url", &self.store_url)
            .finish()
    }
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("token", &redacted(&self.token))
            .finish()
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            token: None,
        }
    }
}

impl Default for PasteLimits {
    fn default() -> Self {
        Self {
            char_limit: DEFAULT_CHAR_LIMIT,
            file_limit: DEFAULT_FILE_LIMIT,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests: DEFAULT_RATE_LIMIT_REQUESTS,
            window_secs: DEFAULT_RATE_LIMIT_WINDOW_SECS,
            ignore_localhost: true,
            store_url: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            limits: PasteLimits::default(),
            rate_limit: RateLimitConfig::default(),
            session: SessionConfig::default(),
            admin: AdminConfig::default(),
            maintenance: false,
        }
    }
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env_flag_or(name, false)
}

fn env_flag_or(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(default)
}

fn env_parse_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring unparsable {}='{}'", name, raw);
                default
            }
        },
        Err(_) => default,
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self {
            port: env_parse_or("PORT", DEFAULT_PORT),
            limits: PasteLimits {
                char_limit: env_parse_or("CHAR_LIMIT", DEFAULT_CHAR_LIMIT),
                file_limit: env_parse_or("FILE_LIMIT", DEFAULT_FILE_LIMIT),
            },
            rate_limit: RateLimitConfig {
                requests: env_parse_or("RATE_LIMIT_REQUESTS", DEFAULT_RATE_LIMIT_REQUESTS),
                window_secs: env_parse_or("RATE_LIMIT_WINDOW_SECS", DEFAULT_RATE_LIMIT_WINDOW_SECS),
                ignore_localhost: env_flag_or("RATE_LIMIT_IGNORE_LOCALHOST", true),
                store_url: env_nonempty("LIMITER_STORE_URL"),
            },
            session: SessionConfig {
                secret: env_nonempty("SESSION_SECRET"),
                store_url: env_nonempty("SESSION_STORE_URL"),
            },
            admin: AdminConfig {
                username: env_nonempty("ADMIN_USERNAME")
                    .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string()),
                token: env_nonempty("ADMIN_TOKEN"),
            },
            maintenance: env_flag_enabled("MAINTENANCE"),
        }
    }

    /// Largest request body the API accepts, derived from the paste limits.
    pub fn max_body_size(&self) -> usize {
        self.limits
            .char_limit
            .saturating_mul(MAX_ENCODED_CHAR_BYTES)
            .saturating_mul(self.limits.file_limit.max(1))
            .saturating_add(BODY_OVERHEAD_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_env_flag, Config};
    use crate::env::{env_lock, EnvOverrides};

    #[test]
    fn parse_env_flag_accepts_truthy_values() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert_eq!(parse_env_flag(value), Some(true), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_accepts_falsy_values() {
        for value in ["", "0", "false", "FALSE", " no ", "off"] {
            assert_eq!(parse_env_flag(value), Some(false), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_rejects_unknown_values() {
        assert_eq!(parse_env_flag("maybe"), None);
        assert_eq!(parse_env_flag("enabled"), None);
    }

    #[test]
    fn from_env_reads_limits_and_flags() {
        let _lock = env_lock().lock().expect("env lock");
        let _env = EnvOverrides::new()
            .set("PORT", "9000")
            .set("CHAR_LIMIT", "1000")
            .set("FILE_LIMIT", "2")
            .set("RATE_LIMIT_REQUESTS", "10")
            .set("RATE_LIMIT_WINDOW_SECS", "30")
            .set("RATE_LIMIT_IGNORE_LOCALHOST", "off")
            .set("SESSION_SECRET", "  hunter2  ")
            .set("MAINTENANCE", "yes")
            .remove("LIMITER_STORE_URL")
            .set("SESSION_STORE_URL", "redis://cache:6379/1")
            .set("ADMIN_USERNAME", "root")
            .set("ADMIN_TOKEN", "bootstrap-token");

        let config = Config::from_env();
        assert_eq!(config.port, 9000);
        assert_eq!(config.limits.char_limit, 1000);
        assert_eq!(config.limits.file_limit, 2);
        assert_eq!(config.rate_limit.requests, 10);
        assert_eq!(config.rate_limit.window_secs, 30);
        assert!(!config.rate_limit.ignore_localhost);
        assert!(config.rate_limit.store_url.is_none());
        assert_eq!(config.session.secret.as_deref(), Some("hunter2"));
        assert_eq!(
            config.session.store_url.as_deref(),
            Some("redis://cache:6379/1")
        );
        assert!(config.maintenance);
        assert_eq!(config.admin.username, "root");
        assert_eq!(config.admin.token.as_deref(), Some("bootstrap-token"));
    }

    #[test]
    fn from_env_falls_back_to_defaults_on_garbage() {
        let _lock = env_lock().lock().expect("env lock");
        let _env = EnvOverrides::new()
            .set("PORT", "not-a-port")
            .set("CHAR_LIMIT", "-5")
            .remove("FILE_LIMIT")
            .remove("RATE_LIMIT_REQUESTS")
            .remove("RATE_LIMIT_WINDOW_SECS")
            .remove("RATE_LIMIT_IGNORE_LOCALHOST")
            .set("SESSION_SECRET", "   ")
            .remove("MAINTENANCE")
            .remove("ADMIN_USERNAME")
            .set("ADMIN_TOKEN", "");

        let config = Config::from_env();
        let defaults = Config::default();
        assert_eq!(config.port, defaults.port);
        assert_eq!(config.limits, defaults.limits);
        assert_eq!(config.rate_limit.requests, defaults.rate_limit.requests);
        assert!(config.rate_limit.ignore_localhost);
        assert!(config.session.secret.is_none());
        assert!(!config.maintenance);
        assert_eq!(config.admin.username, "admin");
        assert!(config.admin.token.is_none());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut config = Config::default();
        config.session.secret = Some("cookie-secret".to_string());
        config.admin.token = Some("admin-token".to_string());
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("cookie-secret"));
        assert!(!rendered.contains("admin-token"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn max_body_size_covers_worst_case_encoding() {
        let mut config = Config::default();
        config.limits.char_limit = 10;
        config.limits.file_limit = 3;
        assert_eq!(config.max_body_size(), 10 * 6 * 3 + 64 * 1024);

        config.limits.file_limit = 0;
        assert_eq!(config.max_body_size(), 10 * 6 + 64 * 1024);
    }
}
