//! Port for one-way password hashing.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing or verification failed for a reason other than a mismatch.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Produces and checks salted password hashes.
///
/// Hashing is CPU-bound; callers on the async runtime should treat it as a
/// short blocking operation.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plain-text password with a fresh salt.
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError>;

    /// Check a plain-text password against a stored hash. A mismatch is
    /// `Ok(false)`, not an error.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError>;
}
