use anyhow::{anyhow, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hashes a password with Argon2id, returning a PHC-format string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("password hashing failed: {e}"))
}

/// Checks a password against a stored PHC string.
/// A malformed stored hash is an error; a wrong password is `Ok(false)`.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| anyhow!("stored password hash is malformed: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// A well-formed Argon2id hash with the default cost parameters that no password matches.
/// Logins for unknown usernames are checked against it so they take as long as real ones.
const UNMATCHABLE_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Runs `hash_password` off the async executor; Argon2 is deliberately slow.
pub async fn hash_password_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

/// Runs `verify_password` off the async executor.
pub async fn verify_password_blocking(password: String, stored_hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash)).await?
}

/// Verifies a login attempt. With no stored hash the same Argon2 work runs against
/// an unmatchable hash and the answer is always `false`.
pub async fn verify_login(password: String, stored_hash: Option<String>) -> Result<bool> {
    match stored_hash {
        Some(hash) => verify_password_blocking(password, hash).await,
        None => {
            verify_password_blocking(password, UNMATCHABLE_HASH.to_string()).await?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse battery", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let a = hash_password("s3cret-pass").unwrap();
        let b = hash_password("s3cret-pass").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_unmatchable_hash_costs_as_much_as_a_real_one() {
        let real = hash_password("whatever-password").unwrap();
        let real = PasswordHash::new(&real).unwrap();
        let unmatchable = PasswordHash::new(UNMATCHABLE_HASH).unwrap();
        assert_eq!(unmatchable.algorithm, real.algorithm);
        assert_eq!(unmatchable.version, real.version);
        assert_eq!(unmatchable.params.to_string(), real.params.to_string());
        assert!(!verify_password("", UNMATCHABLE_HASH).unwrap());
    }

    #[tokio::test]
    async fn test_verify_login_without_account_is_rejected() {
        assert!(!verify_login("any password".to_string(), None).await.unwrap());

        let hash = hash_password("right-password").unwrap();
        assert!(verify_login("right-password".to_string(), Some(hash.clone()))
            .await
            .unwrap());
        assert!(!verify_login("wrong-password".to_string(), Some(hash))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_blocking_wrappers() {
        let hash = hash_password_blocking("hunter2hunter2".to_string())
            .await
            .unwrap();
        assert!(verify_password_blocking("hunter2hunter2".to_string(), hash)
            .await
            .unwrap());
    }
}
