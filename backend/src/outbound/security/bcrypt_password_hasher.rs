//! Bcrypt-backed `PasswordHasher`.
//!
//! Hashing at production cost takes hundreds of milliseconds, so both
//! operations run on Tokio's blocking pool.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{Password, PasswordHash};

/// Bcrypt hasher with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

fn join_error(error: tokio::task::JoinError) -> PasswordHashError {
    PasswordHashError::hash(format!("hashing task failed: {error}"))
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        let plaintext = Zeroizing::new(password.expose().to_owned());
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(plaintext.as_str(), cost))
            .await
            .map_err(join_error)?
            .map_err(|error| PasswordHashError::hash(error.to_string()))?;
        PasswordHash::new(hashed).map_err(|error| PasswordHashError::hash(error.to_string()))
    }

    async fn verify(
        &self,
        candidate: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        let candidate = Zeroizing::new(candidate.to_owned());
        let stored = hash.as_ref().to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(candidate.as_str(), &stored))
            .await
            .map_err(join_error)?
            .map_err(|error| PasswordHashError::hash(error.to_string()))
    }
}
