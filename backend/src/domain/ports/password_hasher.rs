//! Port for slow, salted password hashing.

use async_trait::async_trait;

use crate::domain::{Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing or verification could not run.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// Password hashing is CPU-bound; adapters keep it off the async executor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError>;

    /// `Ok(false)` for a mismatch; `Err` only when verification cannot run.
    async fn verify(
        &self,
        candidate: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError>;
}
