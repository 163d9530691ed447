//! Driving port for account use-cases: signup, login and password reset.
//!
//! Inbound adapters call this port without knowing how passwords are hashed,
//! how tokens are signed or where users are stored.

use async_trait::async_trait;

use crate::domain::{AuthSession, Error, LoginCredentials, PasswordResetRequest, SignupRequest};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register a new account and sign a token for it.
    async fn signup(&self, request: SignupRequest) -> Result<AuthSession, Error>;

    /// Verify credentials and sign a token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error>;

    /// Replace the password of an existing account and sign a token.
    async fn reset_password(&self, request: PasswordResetRequest) -> Result<AuthSession, Error>;
}
