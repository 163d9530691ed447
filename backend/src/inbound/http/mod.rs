//! HTTP inbound adapter exposing the REST endpoints under `/api`.
//!
//! Handlers translate requests into calls on the driving ports held in
//! [`state::HttpState`] and map domain errors to JSON responses.

pub mod app;
pub mod auth;
pub mod error;
pub mod health;
pub(crate) mod multipart;
pub mod places;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
