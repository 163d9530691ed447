//! Credential adapters: bcrypt password hashing and HS256 bearer tokens.

mod bcrypt_password_hasher;
mod jwt_token_service;

pub use bcrypt_password_hasher::BcryptPasswordHasher;
pub use jwt_token_service::{JwtTokenService, MIN_SECRET_BYTES, TokenConfigError};
