//! Account domain service.
//!
//! Implements signup, login and password reset on top of the credential
//! store, the password hasher and the token signer. Failure messages are
//! static client-facing strings; causes are logged, never returned.

use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::domain::ports::{
    AccountCommand, PasswordHashError, PasswordHasher, TokenError, TokenService,
    UserPersistenceError, UserRepository, UsersQuery,
};
use crate::domain::{
    AuthSession, EmailAddress, Error, LoginCredentials, NewUser, PasswordResetRequest,
    SignupRequest, User,
};

pub(crate) const SIGNUP_EXISTS: &str = "User exists already, please login instead.";
pub(crate) const SIGNUP_FAILED: &str = "Signing up failed, please try again later.";
pub(crate) const LOGIN_INVALID: &str = "Invalid credentials, could not log you in.";
pub(crate) const LOGIN_FAILED: &str = "Logging in failed, please try again later.";
pub(crate) const RESET_INVALID: &str = "Invalid credentials, could not reset password.";
pub(crate) const RESET_FAILED: &str = "Resetting the password failed, please try again later.";
pub(crate) const USERS_FAILED: &str = "Fetching users failed, please try again later.";

/// Log an infrastructure failure and return the static internal error.
fn internal(message: &'static str, cause: impl Display) -> Error {
    error!(error = %cause, "{message}");
    Error::internal(message)
}

/// Account service implementing [`AccountCommand`] and [`UsersQuery`].
#[derive(Clone)]
pub struct AccountService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<U, H, T> AccountService<U, H, T> {
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

impl<U, H, T> AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    fn session_for(&self, user: &User, failure: &'static str) -> Result<AuthSession, Error> {
        let token = self
            .tokens
            .issue(&user.id(), user.email())
            .map_err(|err: TokenError| internal(failure, err))?;
        Ok(AuthSession {
            user_id: user.id(),
            email: user.email().clone(),
            token,
        })
    }

    async fn lookup(
        &self,
        email: &EmailAddress,
        failure: &'static str,
    ) -> Result<Option<User>, Error> {
        self.users
            .find_by_email(email)
            .await
            .map_err(|err| internal(failure, err))
    }
}

#[async_trait]
impl<U, H, T> AccountCommand for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn signup(&self, request: SignupRequest) -> Result<AuthSession, Error> {
        if self.lookup(&request.email, SIGNUP_FAILED).await?.is_some() {
            debug!(email = %request.email, "signup rejected: email already registered");
            return Err(Error::conflict(SIGNUP_EXISTS));
        }

        let password_hash = self
            .hasher
            .hash(&request.password)
            .await
            .map_err(|err: PasswordHashError| internal(SIGNUP_FAILED, err))?;

        let new_user = NewUser {
            name: request.name,
            email: request.email,
            password_hash,
            image: request.image,
        };
        let user = self.users.insert(&new_user).await.map_err(|err| match err {
            UserPersistenceError::DuplicateEmail { email } => {
                debug!(%email, "signup lost a race on email uniqueness");
                Error::conflict(SIGNUP_EXISTS)
            }
            other => internal(SIGNUP_FAILED, other),
        })?;

        info!(user_id = %user.id(), "user signed up");
        self.session_for(&user, SIGNUP_FAILED)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        let Ok(email) = EmailAddress::new(credentials.email()) else {
            debug!("login rejected: malformed email");
            return Err(Error::unauthorized(LOGIN_INVALID));
        };
        let Some(user) = self.lookup(&email, LOGIN_FAILED).await? else {
            debug!(%email, "login rejected: unknown email");
            return Err(Error::unauthorized(LOGIN_INVALID));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .await
            .map_err(|err| internal(LOGIN_FAILED, err))?;
        if !matches {
            debug!(user_id = %user.id(), "login rejected: password mismatch");
            return Err(Error::unauthorized(LOGIN_INVALID));
        }

        info!(user_id = %user.id(), "user logged in");
        self.session_for(&user, LOGIN_FAILED)
    }

    async fn reset_password(&self, request: PasswordResetRequest) -> Result<AuthSession, Error> {
        let Some(user) = self.lookup(&request.email, RESET_FAILED).await? else {
            debug!(email = %request.email, "password reset rejected: unknown email");
            return Err(Error::invalid_request(RESET_INVALID));
        };

        let password_hash = self
            .hasher
            .hash(&request.password)
            .await
            .map_err(|err| internal(RESET_FAILED, err))?;
        self.users
            .update_password(&user.id(), &password_hash)
            .await
            .map_err(|err| match err {
                UserPersistenceError::NotFound { user_id } => {
                    debug!(%user_id, "password reset rejected: user vanished");
                    Error::invalid_request(RESET_INVALID)
                }
                other => internal(RESET_FAILED, other),
            })?;

        info!(user_id = %user.id(), "password reset");
        // The token identity comes from the looked-up record.
        self.session_for(&user, RESET_FAILED)
    }
}

#[async_trait]
impl<U, H, T> UsersQuery for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users
            .list()
            .await
            .map_err(|err| internal(USERS_FAILED, err))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
