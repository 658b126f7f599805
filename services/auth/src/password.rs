//! Password hashing with Argon2id
//!
//! Hashes are stored in PHC string format, so the salt and cost parameters
//! travel with each hash and verification keeps working after the configured
//! costs change.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use tracing::error;

use crate::error::{AuthError, AuthResult};

/// Argon2 cost configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashingConfig {
    /// Create a new HashingConfig from environment variables
    ///
    /// # Environment Variables
    /// - `ARGON2_MEMORY_KIB`: Memory cost in KiB (default: 19456)
    /// - `ARGON2_ITERATIONS`: Number of passes (default: 2)
    /// - `ARGON2_PARALLELISM`: Lanes (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let read = |name: &str, fallback: u32| {
            std::env::var(name)
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(fallback)
        };

        Self {
            memory_kib: read("ARGON2_MEMORY_KIB", defaults.memory_kib),
            iterations: read("ARGON2_ITERATIONS", defaults.iterations),
            parallelism: read("ARGON2_PARALLELISM", defaults.parallelism),
        }
    }

    /// Cheapest valid parameters, for tests only
    pub fn insecure_fast() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: 1,
            parallelism: 1,
        }
    }
}

/// Salted, deliberately slow password hashing
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    /// Build a hasher from cost parameters
    pub fn new(config: HashingConfig) -> AuthResult<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| AuthError::Crypto(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Crypto(format!("Failed to hash password: {}", e)))?;

        Ok(hash.to_string())
    }

    /// Check a password against a stored PHC hash
    pub fn verify(&self, password: &str, password_hash: &str) -> AuthResult<bool> {
        let parsed_hash = PasswordHash::new(password_hash).map_err(|e| {
            error!("Stored password hash could not be parsed: {}", e);
            AuthError::Crypto(format!("Failed to parse password hash: {}", e))
        })?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// [`Self::hash`] on the blocking thread pool
    pub async fn hash_blocking(&self, password: String) -> AuthResult<String> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Crypto(format!("Hashing task failed: {}", e)))?
    }

    /// [`Self::verify`] on the blocking thread pool
    pub async fn verify_blocking(&self, password: String, password_hash: String) -> AuthResult<bool> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &password_hash))
            .await
            .map_err(|e| AuthError::Crypto(format!("Verification task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(HashingConfig::insecure_fast()).unwrap()
    }

    #[test]
    fn test_hash_is_salted_and_verifiable() {
        let hasher = hasher();
        let first = hasher.hash("correct horse").unwrap();
        let second = hasher.hash("correct horse").unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(!first.contains("correct horse"));
        assert!(hasher.verify("correct horse", &first).unwrap());
        assert!(!hasher.verify("battery staple", &first).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            hasher().verify("anything", "not-a-phc-string"),
            Err(AuthError::Crypto(_))
        ));
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let config = HashingConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        assert!(CredentialHasher::new(config).is_err());
    }

    #[test]
    #[serial]
    fn test_hashing_config_from_env() {
        unsafe {
            std::env::set_var("ARGON2_MEMORY_KIB", "4096");
            std::env::set_var("ARGON2_ITERATIONS", "3");
            std::env::remove_var("ARGON2_PARALLELISM");
        }

        let config = HashingConfig::from_env();
        assert_eq!(config.memory_kib, 4096);
        assert_eq!(config.iterations, 3);
        assert_eq!(config.parallelism, Params::DEFAULT_P_COST);

        unsafe {
            std::env::remove_var("ARGON2_MEMORY_KIB");
            std::env::remove_var("ARGON2_ITERATIONS");
        }
    }

    #[tokio::test]
    async fn test_blocking_variants() {
        let hasher = hasher();
        let hash = hasher.hash_blocking("correct horse".to_string()).await.unwrap();
        assert!(
            hasher
                .verify_blocking("correct horse".to_string(), hash)
                .await
                .unwrap()
        );
    }
}
