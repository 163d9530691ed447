//! Authentication primitives: passwords, credentials and issued tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::{EmailAddress, ImagePath, UserId, UserName};

/// Minimum number of characters in a new password.
pub const PASSWORD_MIN: usize = 6;

/// Domain error returned when credential values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Password shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
    /// Stored hash was blank.
    EmptyPasswordHash,
    /// Token was blank.
    EmptyToken,
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::EmptyPasswordHash => write!(f, "password hash must not be empty"),
            Self::EmptyToken => write!(f, "token must not be empty"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// New password chosen at signup or reset.
///
/// ## Invariants
/// - At least [`PASSWORD_MIN`] characters; whitespace is kept verbatim.
/// - The plaintext is zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    pub fn new(raw: impl Into<String>) -> Result<Self, CredentialValidationError> {
        let raw = Zeroizing::new(raw.into());
        if raw.chars().count() < PASSWORD_MIN {
            return Err(CredentialValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self(raw))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Salted one-way password hash as produced by the password hasher.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(hash: impl Into<String>) -> Result<Self, CredentialValidationError> {
        let hash = hash.into();
        if hash.trim().is_empty() {
            return Err(CredentialValidationError::EmptyPasswordHash);
        }
        Ok(Self(hash))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Login credentials as submitted by the client.
///
/// Login never reports validation failures: any value that cannot match a
/// stored account is rejected as invalid credentials instead.
///
/// # Examples
/// ```
/// use places_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::new("  Ana@X.com", "secret1");
/// assert_eq!(creds.email(), "ana@x.com");
/// assert_eq!(creds.password(), "secret1");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Capture credentials, normalising the email the same way signup does.
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        }
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Validated signup form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    pub name: UserName,
    pub email: EmailAddress,
    pub password: Password,
    pub image: ImagePath,
}

/// Validated password reset form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetRequest {
    pub email: EmailAddress,
    pub password: Password,
}

/// Signed bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Result<Self, CredentialValidationError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(CredentialValidationError::EmptyToken);
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for AuthToken {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Identity proven by a verified bearer token.
///
/// Handlers receive this as an explicit argument rather than reading it from
/// shared request state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    user_id: UserId,
    email: String,
}

impl AuthenticatedUser {
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}

/// Outcome of signup, login and password reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: UserId,
    pub email: EmailAddress,
    pub token: AuthToken,
}
