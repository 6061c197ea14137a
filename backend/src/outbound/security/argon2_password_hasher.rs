//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=...`), so parameters
//! travel with each hash and older hashes keep verifying after a tuning
//! change.

use argon2::{Algorithm, Argon2, Params, Version};
use argon2::password_hash::{
    Error as PhcError, PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use rand::RngCore;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

const SALT_LEN: usize = 16;

/// Argon2id hasher using the crate's default cost parameters.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Argon2id with explicit memory (KiB) and iteration costs.
    ///
    /// # Errors
    /// Returns [`PasswordHasherError::Hashing`] when the costs are out of
    /// range.
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self, PasswordHasherError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

fn hashing_error(error: PhcError) -> PasswordHasherError {
    PasswordHasherError::hashing(error.to_string())
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        let mut salt_bytes = [0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes).map_err(hashing_error)?;

        let encoded = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(hashing_error)?;
        Ok(PasswordHash::new(encoded.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        let parsed = PhcHash::new(hash.as_str()).map_err(hashing_error)?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(other) => Err(hashing_error(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::new()
    }

    #[rstest]
    fn hashes_never_contain_the_password(hasher: Argon2PasswordHasher) {
        let hash = hasher.hash("admin").expect("hashing succeeds");
        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(!hash.as_str().contains("admin"));
    }

    #[rstest]
    fn verify_accepts_the_original_password(hasher: Argon2PasswordHasher) {
        let hash = hasher.hash("admin").expect("hashing succeeds");
        assert!(hasher.verify("admin", &hash).expect("verification runs"));
        assert!(!hasher.verify("Admin", &hash).expect("verification runs"));
    }

    #[rstest]
    fn salts_differ_between_hashes(hasher: Argon2PasswordHasher) {
        let first = hasher.hash("user").expect("hashing succeeds");
        let second = hasher.hash("user").expect("hashing succeeds");
        assert_ne!(first, second);
    }

    #[rstest]
    fn cheap_hashes_verify_with_the_default_hasher() {
        let cheap = Argon2PasswordHasher::with_cost(Params::MIN_M_COST, 1).expect("valid costs");
        let hash = cheap.hash("user").expect("hashing succeeds");
        assert!(hash.as_str().contains("m=8,t=1"));
        assert!(Argon2PasswordHasher::new().verify("user", &hash).expect("verification runs"));
    }

    #[rstest]
    fn out_of_range_costs_are_rejected() {
        assert!(Argon2PasswordHasher::with_cost(0, 0).is_err());
    }

    #[rstest]
    fn malformed_hashes_are_errors(hasher: Argon2PasswordHasher) {
        let err = hasher
            .verify("user", &PasswordHash::new("plain-text"))
            .expect_err("not a PHC string");
        assert!(matches!(err, PasswordHasherError::Hashing { .. }));
    }
}
