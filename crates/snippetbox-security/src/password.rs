//! Password hashing with bcrypt

use snippetbox_shared::constants::BCRYPT_COST;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
}

pub struct PasswordService;

impl PasswordService {
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        Self::hash_with_cost(password, BCRYPT_COST)
    }

    pub fn hash_with_cost(password: &str, cost: u32) -> Result<String, PasswordError> {
        bcrypt::hash(password, cost).map_err(|e| PasswordError::HashError(e.to_string()))
    }

    /// `Ok(false)` for a wrong password; `Err` only when `hash` is not a bcrypt hash.
    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        bcrypt::verify(password, hash).map_err(|e| PasswordError::HashError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum cost keeps the tests fast; production always goes through `hash`.
    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordService::hash_with_cost("pa$$word", TEST_COST).unwrap();
        assert_ne!(hash, "pa$$word");
        assert!(PasswordService::verify("pa$$word", &hash).unwrap());
        assert!(!PasswordService::verify("password", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = PasswordService::hash_with_cost("pa$$word", TEST_COST).unwrap();
        let b = PasswordService::hash_with_cost("pa$$word", TEST_COST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_default_cost_is_twelve() {
        let hash = PasswordService::hash("pa$$word").unwrap();
        assert!(hash.starts_with("$2b$12$"));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(PasswordService::verify("pa$$word", "not-a-hash").is_err());
    }
}
