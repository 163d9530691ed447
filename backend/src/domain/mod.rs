//! Domain primitives, aggregates, ports and services.
//!
//! Purpose: Define strongly typed entities for users and places, the
//! transport-agnostic error payload, and the use-case services that inbound
//! adapters drive through ports. Nothing here knows about HTTP, SQL or the
//! geocoding provider.
//!
//! Public surface:
//! - Error / ErrorCode: failure payload with a stable category.
//! - User, Place and their value types.
//! - AccountService, PlaceService: implementations of the driving ports.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod image;
pub mod place;
pub mod place_service;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    AuthSession, AuthToken, AuthenticatedUser, CredentialValidationError, LoginCredentials,
    PASSWORD_MIN, Password, PasswordHash, PasswordResetRequest, SignupRequest,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::image::{ImageKind, ImagePath, ImageUpload, ImageValidationError, MAX_IMAGE_BYTES};
pub use self::place::{
    Address, Coordinates, DESCRIPTION_MIN, NewPlaceRequest, Place, PlaceDescription,
    PlaceDetails, PlaceDraft, PlaceId, PlaceTitle, PlaceValidationError,
};
pub use self::place_service::PlaceService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EMAIL_MAX, EmailAddress, NewUser, USER_NAME_MAX, User, UserId, UserName, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use places_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("Authentication failed!"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
