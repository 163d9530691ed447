//! Failure payload shared by every use case.
//!
//! The domain picks an [`ErrorCode`] and the client-visible message; the HTTP
//! adapter decides the status. Nothing here depends on Actix.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::TraceId;

/// Failure category. Clients may branch on it; messages are for humans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Input failed validation or named something unusable, such as an
    /// address the geocoder cannot place.
    InvalidRequest,
    /// Credentials or bearer token rejected.
    Unauthorized,
    /// Authenticated, but not the owner.
    Forbidden,
    NotFound,
    /// Email already registered.
    Conflict,
    /// Storage, geocoding or token failure the caller cannot fix.
    InternalError,
}

impl ErrorCode {
    /// Message used when a caller supplies a blank one.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "Invalid inputs passed, please check your data.",
            Self::Unauthorized => "Authentication failed!",
            Self::Forbidden => "You are not allowed to perform this action.",
            Self::NotFound => "Could not find the requested resource.",
            Self::Conflict => "Resource exists already.",
            Self::InternalError => "An unknown error occurred!",
        }
    }
}

/// Error returned by services and serialised as the response body.
///
/// ## Invariants
/// - `message` is never blank.
/// - `traceId` is captured from the request scope at construction time.
///
/// # Examples
/// ```
/// use places_backend::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("Could not find place for the provided id.");
/// assert_eq!(err.code(), ErrorCode::NotFound);
///
/// let blank = Error::new(ErrorCode::InternalError, "  ");
/// assert_eq!(blank.message(), "An unknown error occurred!");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "ErrorBody", into = "ErrorBody")]
pub struct Error {
    #[schema(example = "invalid_request")]
    code: ErrorCode,
    #[schema(example = "Invalid inputs passed, please check your data.")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level validation information, e.g. `{"field", "code", "reason"}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Rejection of a deserialised error payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    #[error("error message must not be empty")]
    EmptyMessage,
}

impl Error {
    /// Build an error, substituting [`ErrorCode::fallback_message`] for a
    /// blank message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.fallback_message().to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Strict variant used when reading a payload back.
    ///
    /// # Errors
    /// [`ErrorValidationError::EmptyMessage`] for a blank message.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self::new(code, message))
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Override the captured trace identifier.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

/// Wire shape of [`Error`]; validation runs on the way in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorBody {
    fn from(
        Error {
            code,
            message,
            trace_id,
            details,
        }: Error,
    ) -> Self {
        Self {
            code,
            message,
            trace_id,
            details,
        }
    }
}

impl TryFrom<ErrorBody> for Error {
    type Error = ErrorValidationError;

    fn try_from(body: ErrorBody) -> Result<Self, Self::Error> {
        let mut error = Self::try_new(body.code, body.message)?;
        error.trace_id = body.trace_id;
        error.details = body.details;
        Ok(error)
    }
}
