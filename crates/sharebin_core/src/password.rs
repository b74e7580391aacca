//! Argon2id hashing for paste passwords.
//!
//! Both functions are CPU-bound; async callers should run them on a
//! blocking thread.

use crate::error::AppError;
use argon2::{
    password_hash::{
        rand_core::OsRng, Error as PasswordHashError, PasswordHash, PasswordHasher,
        PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Argon2 memory cost in kibibytes (~19 MB).
const ARGON2_MEMORY_COST: u32 = 19_456;
/// Argon2 time cost (iterations).
const ARGON2_TIME_COST: u32 = 2;
/// Argon2 parallelism (lanes).
const ARGON2_PARALLELISM: u32 = 1;

fn configured_argon2() -> Result<Argon2<'static>, AppError> {
    let params = Params::new(
        ARGON2_MEMORY_COST,
        ARGON2_TIME_COST,
        ARGON2_PARALLELISM,
        None,
    )
    .map_err(|err| {
        tracing::error!("Invalid argon2 parameters: {}", err);
        AppError::Internal
    })?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash `password` into a PHC string.
///
/// # Errors
/// Returns [`AppError::Internal`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = configured_argon2()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| {
            tracing::error!("Password hashing failed: {}", err);
            AppError::Internal
        })?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC string.
///
/// # Returns
/// `Ok(false)` on a mismatch.
///
/// # Errors
/// Returns [`AppError::Internal`] when the stored hash cannot be parsed.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|err| {
        tracing::error!("Stored password hash is malformed: {}", err);
        AppError::Internal
    })?;
    match configured_argon2()?.verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(err) => {
            tracing::error!("Password verification failed: {}", err);
            Err(AppError::Internal)
        }
    }
}
