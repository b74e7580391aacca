//! Random identifiers and bearer secrets.
//!
//! Everything here draws from the operating system CSPRNG. Calls share no
//! state, so uniqueness rests on entropy alone.

use crate::constants::{PASTE_ID_BYTES, TOKEN_BYTES};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt::Write;

fn random_bytes<const N: usize>() -> [u8; N] {
    let mut buf = [0u8; N];
    OsRng.fill_bytes(&mut buf);
    buf
}

/// Generate a paste identifier: 18 lowercase hex characters.
pub fn generate_id() -> String {
    let bytes = random_bytes::<PASTE_ID_BYTES>();
    let mut id = String::with_capacity(PASTE_ID_BYTES * 2);
    for byte in bytes {
        // Writing to a String cannot fail.
        let _ = write!(id, "{:02x}", byte);
    }
    id
}

/// Generate a safety token for deleting a paste.
///
/// URL-safe base64 without padding over 64 random bytes (86 characters).
/// The caller returns it once at creation and must never log it.
pub fn generate_safety_token() -> String {
    URL_SAFE_NO_PAD.encode(random_bytes::<TOKEN_BYTES>())
}

/// Generate a bearer token for a user account.
pub fn generate_user_token() -> String {
    URL_SAFE_NO_PAD.encode(random_bytes::<TOKEN_BYTES>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_18_lowercase_hex_chars() {
        for _ in 0..256 {
            let id = generate_id();
            assert_eq!(id.len(), 18, "id: {}", id);
            assert!(
                id.chars()
                    .all(|ch| ch.is_ascii_digit() || ('a'..='f').contains(&ch)),
                "id: {}",
                id
            );
        }
    }

    #[test]
    fn generated_ids_do_not_repeat_across_10k_samples() {
        let ids: HashSet<String> = (0..10_000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn safety_tokens_are_url_safe_and_decode_to_64_bytes() {
        let token = generate_safety_token();
        assert_eq!(token.len(), 86);
        assert!(token
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'));
        let decoded = URL_SAFE_NO_PAD.decode(&token).expect("decode");
        assert_eq!(decoded.len(), TOKEN_BYTES);
    }

    #[test]
    fn tokens_are_independent_of_each_other() {
        assert_ne!(generate_safety_token(), generate_safety_token());
        assert_ne!(generate_user_token(), generate_safety_token());
    }
}
