//! CSRF protection

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Name of the hidden form field carrying the token.
pub const CSRF_FORM_FIELD: &str = "csrf_token";
/// Header alternative for non-form clients.
pub const CSRF_HEADER_NAME: &str = "x-csrf-token";

pub fn generate_csrf_token() -> String {
    let mut token = [0u8; 32];
    rand::rng().fill_bytes(&mut token);
    hex::encode(token)
}

/// Compares fixed-length digests so the running time does not depend on how much of the
/// submitted token matches.
pub fn validate_csrf_token(token: &str, expected: &str) -> bool {
    if token.is_empty() || expected.is_empty() {
        return false;
    }
    let a = Sha256::digest(token.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_unique_hex() {
        let a = generate_csrf_token();
        let b = generate_csrf_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_validate() {
        let token = generate_csrf_token();
        assert!(validate_csrf_token(&token, &token));
        assert!(!validate_csrf_token(&generate_csrf_token(), &token));
        assert!(!validate_csrf_token("", &token));
        assert!(!validate_csrf_token("", ""));
    }
}
