//! Common validation rules shared across request payloads.

use validator::ValidationError;

/// Login keys are issued as 26 random bytes rendered to hex, so a candidate
/// that is not exactly 52 characters can be rejected before any hash
/// comparison work is done.
pub fn validate_login_key(login_key: &str) -> Result<(), ValidationError> {
    if login_key.len() != 52 {
        return Err(ValidationError::new("login_key_invalid_length"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_key_rejects_empty() {
        assert!(validate_login_key("").is_err());
    }

    #[test]
    fn login_key_rejects_wrong_length() {
        assert!(validate_login_key(&"a".repeat(51)).is_err());
        assert!(validate_login_key(&"a".repeat(53)).is_err());
    }

    #[test]
    fn login_key_accepts_exactly_52_chars() {
        assert!(validate_login_key(&"a".repeat(52)).is_ok());
    }
}
