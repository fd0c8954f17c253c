//! Random key material generation.

use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes behind a session key (36 hex characters).
pub const SESSION_KEY_BYTES: usize = 18;

/// Number of random bytes behind a login key (52 hex characters).
pub const LOGIN_KEY_BYTES: usize = 26;

/// Generates a session key: 18 bytes from the OS CSPRNG rendered as 36 hex
/// characters. 144 bits of entropy makes collisions across any realistic
/// population negligible, so uniqueness is assumed rather than retried.
pub fn generate_session_key() -> String {
    random_hex(SESSION_KEY_BYTES)
}

/// Generates a login key: 26 bytes rendered as 52 hex characters.
pub fn generate_login_key() -> String {
    random_hex(LOGIN_KEY_BYTES)
}

fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_key_is_36_hex_chars() {
        let key = generate_session_key();
        assert_eq!(key.len(), 36);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn login_key_is_52_hex_chars() {
        let key = generate_login_key();
        assert_eq!(key.len(), 52);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn consecutive_keys_differ() {
        assert_ne!(generate_session_key(), generate_session_key());
        assert_ne!(generate_login_key(), generate_login_key());
    }
}
