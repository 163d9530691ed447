//! Port for issuing and verifying signed bearer tokens.

use crate::domain::{AuthToken, AuthenticatedUser, EmailAddress, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// Signing failed.
        Issue { message: String } => "token signing failed: {message}",
        /// The token is malformed, has a bad signature or has expired.
        Invalid { message: String } => "token rejected: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign an expiring token carrying the user id and email.
    fn issue(&self, user_id: &UserId, email: &EmailAddress) -> Result<AuthToken, TokenError>;

    /// Check signature and expiry and return the embedded identity.
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenError>;
}
