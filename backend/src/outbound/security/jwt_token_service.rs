//! HS256 bearer tokens carrying the user id and email.
//!
//! Expiry is checked against the injected [`Clock`] rather than the system
//! time so tests can move time deterministically.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{AuthToken, AuthenticatedUser, EmailAddress, UserId};

/// Shortest signing key accepted, in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

/// Errors raised while configuring the token service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenConfigError {
    #[error("token signing key must be at least {min} bytes, got {actual}")]
    SecretTooShort { min: usize, actual: usize },
    #[error("token lifetime must be positive")]
    ZeroTtl,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    user_id: String,
    email: String,
    iat: i64,
    exp: i64,
}

/// Token service signing with a shared HMAC secret.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Build a token service from raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`TokenConfigError`] when the key is shorter than
    /// [`MIN_SECRET_BYTES`] or the lifetime is zero.
    pub fn new(
        secret: &[u8],
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TokenConfigError> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(TokenConfigError::SecretTooShort {
                min: MIN_SECRET_BYTES,
                actual: secret.len(),
            });
        }
        let ttl_seconds = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        if ttl_seconds == 0 {
            return Err(TokenConfigError::ZeroTtl);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl_seconds,
            clock,
        })
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: &UserId, email: &EmailAddress) -> Result<AuthToken, TokenError> {
        let iat = self.clock.utc().timestamp();
        let claims = Claims {
            user_id: user_id.to_string(),
            email: email.as_ref().to_owned(),
            iat,
            exp: iat.saturating_add(self.ttl_seconds),
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|error| TokenError::issue(error.to_string()))?;
        AuthToken::new(token).map_err(|error| TokenError::issue(error.to_string()))
    }

    fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenError> {
        let decoded = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|error| TokenError::invalid(error.to_string()))?;
        let claims = decoded.claims;
        if claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenError::invalid("token expired"));
        }
        let user_id = UserId::new(&claims.user_id)
            .map_err(|error| TokenError::invalid(format!("bad userId claim: {error}")))?;
        Ok(AuthenticatedUser::new(user_id, claims.email))
    }
}
