//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers that need a caller declare an [`AuthenticatedUser`] argument; the
//! identity travels explicitly through the call chain instead of being
//! attached to shared request state. Any missing, malformed, forged or expired
//! token is rejected with `403 Authentication failed!`.

use std::future::{Ready, ready};

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use tracing::{debug, error};

use crate::domain::{AuthenticatedUser, Error};

use super::error::INTERNAL_MESSAGE;
use super::state::HttpState;

/// Message returned for every authentication failure.
pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed!";

/// Extract the token from an `Authorization: Bearer <token>` header value.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let Some(state) = req.app_data::<web::Data<HttpState>>() else {
        error!("HttpState missing from app data");
        return Err(Error::internal(INTERNAL_MESSAGE));
    };

    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| {
            debug!("request without bearer token");
            Error::forbidden(AUTH_FAILED_MESSAGE)
        })?;

    state.tokens.verify(token).map_err(|err| {
        debug!(error = %err, "bearer token rejected");
        Error::forbidden(AUTH_FAILED_MESSAGE)
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
