//! Process-global environment mutation helpers.

use std::sync::{Mutex, OnceLock};

/// Return the global lock used to serialize environment mutations in tests.
pub fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// Set an environment variable through a compatibility wrapper.
///
/// Rust toolchains differ on whether env mutation APIs are `unsafe`.
#[allow(unused_unsafe)]
pub fn set_env_var(key: &str, value: &str) {
    // SAFETY: Callers must serialize mutation when test threads may run in parallel.
    unsafe {
        std::env::set_var(key, value);
    }
}

/// Remove an environment variable through a compatibility wrapper.
#[allow(unused_unsafe)]
pub fn remove_env_var(key: &str) {
    // SAFETY: Callers must serialize mutation when test threads may run in parallel.
    unsafe {
        std::env::remove_var(key);
    }
}

/// A batch of environment overrides restored in reverse order on drop.
///
/// ```ignore
/// let _env = EnvOverrides::new().set("PORT", "9000").remove("BIND");
/// ```
#[derive(Default)]
pub struct EnvOverrides {
    previous: Vec<(String, Option<String>)>,
}

impl EnvOverrides {
    /// Start an empty override set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key=value` until the override set is dropped.
    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.remember(key);
        set_env_var(key, value);
        self
    }

    /// Remove `key` until the override set is dropped.
    pub fn remove(mut self, key: &str) -> Self {
        self.remember(key);
        remove_env_var(key);
        self
    }

    fn remember(&mut self, key: &str) {
        self.previous
            .push((key.to_string(), std::env::var(key).ok()));
    }
}

impl Drop for EnvOverrides {
    fn drop(&mut self) {
        for (key, previous) in self.previous.drain(..).rev() {
            match previous {
                Some(value) => set_env_var(&key, &value),
                None => remove_env_var(&key),
            }
        }
    }
}
