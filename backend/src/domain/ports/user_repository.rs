//! Port abstraction for the credential store and its errors.
use async_trait::async_trait;

use crate::domain::{EmailAddress, NewUser, PasswordHash, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
        /// The addressed user does not exist.
        NotFound { user_id: String } => "user not found: {user_id}",
    }
}

/// Credential store for registered users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by normalised email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// List every registered user.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Insert a user with an empty place list.
    ///
    /// Fails with [`UserPersistenceError::DuplicateEmail`] when the email is
    /// taken; nothing is written in that case.
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Overwrite the stored password hash.
    async fn update_password(
        &self,
        id: &UserId,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError>;
}
