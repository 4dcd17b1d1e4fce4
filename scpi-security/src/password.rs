//! Argon2id password hashing.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=...`), so the
//! parameters used at registration travel with the hash and verification
//! keeps working after the configured cost changes.

use argon2::password_hash::{
    self, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SecurityError};

/// Salt size in bytes.
pub const SALT_SIZE: usize = 16;

/// Argon2id cost parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordParams {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_cost")]
    pub memory_cost: u32,
    /// Time cost (iterations).
    #[serde(default = "default_time_cost")]
    pub time_cost: u32,
    /// Parallelism factor.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_cost() -> u32 {
    65536 // 64 MiB
}

fn default_time_cost() -> u32 {
    3
}

fn default_parallelism() -> u32 {
    4
}

impl Default for PasswordParams {
    fn default() -> Self {
        Self {
            memory_cost: default_memory_cost(),
            time_cost: default_time_cost(),
            parallelism: default_parallelism(),
        }
    }
}

impl PasswordParams {
    /// Smallest parameters Argon2 accepts. Only for tests and local development.
    #[must_use]
    pub const fn minimal() -> Self {
        Self {
            memory_cost: Params::MIN_M_COST,
            time_cost: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }
}

/// Hashes and verifies passwords.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    rng: SystemRandom,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("params", self.argon2.params())
            .finish_non_exhaustive()
    }
}

impl PasswordHasher {
    /// Creates a hasher, rejecting parameters Argon2 does not accept.
    pub fn new(params: &PasswordParams) -> Result<Self> {
        let argon2_params = Params::new(
            params.memory_cost,
            params.time_cost,
            params.parallelism,
            None,
        )
        .map_err(|e| SecurityError::configuration(format!("Invalid Argon2 params: {e}")))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params),
            rng: SystemRandom::new(),
        })
    }

    /// Hashes `password` with a fresh random salt and returns the PHC string.
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = self.generate_salt()?;
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| SecurityError::password_hash(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Checks `password` against a stored PHC string.
    ///
    /// Returns `Ok(false)` on mismatch and an error if the stored hash is unreadable.
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool> {
        let parsed =
            PasswordHash::new(stored).map_err(|e| SecurityError::password_hash(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(SecurityError::password_hash(e.to_string())),
        }
    }

    fn generate_salt(&self) -> Result<SaltString> {
        let mut bytes = [0u8; SALT_SIZE];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| SecurityError::password_hash("Failed to generate random salt"))?;
        SaltString::encode_b64(&bytes).map_err(|e| SecurityError::password_hash(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(&PasswordParams::minimal()).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash("password").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("password", &hash).unwrap());
        assert!(!hasher.verify("wrongpassword", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let hasher = hasher();
        let first = hasher.hash("same").unwrap();
        let second = hasher.hash("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_uses_parameters_from_hash() {
        let stronger = PasswordHasher::new(&PasswordParams {
            memory_cost: 64,
            time_cost: 2,
            parallelism: 1,
        })
        .unwrap();
        let hash = stronger.hash("password").unwrap();

        assert!(hasher().verify("password", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        let result = hasher().verify("password", "not-a-phc-string");
        assert!(matches!(result, Err(SecurityError::PasswordHash { .. })));
    }

    #[test]
    fn test_invalid_params() {
        let result = PasswordHasher::new(&PasswordParams {
            memory_cost: 1,
            time_cost: 0,
            parallelism: 1,
        });
        assert!(matches!(result, Err(SecurityError::ConfigurationError { .. })));
    }

    #[test]
    fn test_params_deserialize_with_defaults() {
        let params: PasswordParams = serde_json::from_str(r#"{"time_cost": 5}"#).unwrap();
        assert_eq!(params.time_cost, 5);
        assert_eq!(params.memory_cost, 65536);
        assert_eq!(params.parallelism, 4);
    }
}
