//! Driving port for listing registered users.

use async_trait::async_trait;

use crate::domain::{Error, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every registered user. Adapters must not expose password hashes.
    async fn list_users(&self) -> Result<Vec<User>, Error>;
}
