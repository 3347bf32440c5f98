//! Argon2id password hashing and verification for the user directory.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password with Argon2id and a fresh random salt.
///
/// Returns the PHC-format hash string stored in the user directory.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC-format hash.
///
/// Returns false for a wrong password or an unparseable hash; the caller
/// treats both as "no match".
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is unparseable");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("admin123").unwrap();
        assert!(verify_password("admin123", &hash));
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("admin123").unwrap();
        assert!(!verify_password("admin124", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("admin123").unwrap();
        let b = hash_password("admin123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_is_no_match() {
        assert!(!verify_password("admin123", "not-a-phc-hash"));
    }
}
