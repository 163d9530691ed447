//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and status
//! codes. Every body carries `message`; `code`, `traceId` and `details` are
//! additive.

use actix_web::{HttpRequest, HttpResponse, ResponseError, error::JsonPayloadError, http::StatusCode};
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Message for request bodies that fail validation.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid inputs passed, please check your data.";

/// Fallback message for failures raised outside the domain services.
pub const INTERNAL_MESSAGE: &str = "An unknown error occurred!";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::Conflict => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::Unauthorized | ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Internal errors keep their static message but never expose details.
fn strip_internal_details(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) && error.details().is_some() {
        let mut stripped = Error::internal(error.message());
        if let Some(id) = error.trace_id() {
            stripped = stripped.with_trace_id(id.to_owned());
        }
        stripped
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(strip_internal_details(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(INTERNAL_MESSAGE)
    }
}

/// Turn JSON body extraction failures into validation errors.
///
/// Registered through `web::JsonConfig::error_handler`.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected JSON payload");
    Error::invalid_request(INVALID_INPUT_MESSAGE)
        .with_details(serde_json::json!({ "code": "invalid_json" }))
        .into()
}
