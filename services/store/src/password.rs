//! Password hashing and verification
//!
//! Plaintext passwords are transformed through bcrypt with a fixed cost of
//! 10 before storage; verification goes through the library's compare, never
//! plaintext equality. Each hash carries its own salt, so re-hashing the
//! same password on a profile update produces a fresh credential.

use anyhow::Result;

/// Fixed bcrypt cost factor
const BCRYPT_COST: u32 = 10;

/// Hash a plaintext password for storage
pub fn hash(password: &str) -> Result<String> {
    let hashed = bcrypt::hash(password, BCRYPT_COST)?;
    Ok(hashed)
}

/// Verify a plaintext password against a stored hash
pub fn verify(password: &str, hashed: &str) -> Result<bool> {
    let matches = bcrypt::verify(password, hashed)?;
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_never_plaintext() {
        let hashed = hash("secret1").unwrap();
        assert_ne!(hashed, "secret1");
        assert!(hashed.starts_with("$2"));
    }

    #[test]
    fn test_verify_round_trip() {
        let hashed = hash("secret1").unwrap();
        assert!(verify("secret1", &hashed).unwrap());
        assert!(!verify("wrong", &hashed).unwrap());
    }

    #[test]
    fn test_rehash_produces_distinct_credential() {
        // Per-hash salts mean two hashes of the same password differ.
        let first = hash("secret1").unwrap();
        let second = hash("secret1").unwrap();
        assert_ne!(first, second);
        assert!(verify("secret1", &second).unwrap());
    }
}
