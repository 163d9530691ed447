//! Port for resolving free-text addresses to coordinates.

use async_trait::async_trait;

use crate::domain::{Address, Coordinates};

use super::define_port_error;

define_port_error! {
    /// Errors raised by geocoding adapters.
    pub enum GeocodingError {
        /// The provider found no location for the address.
        ZeroResults => "no location found for address",
        /// The request did not complete in time.
        Timeout { message: String } => "geocoding request timed out: {message}",
        /// The request failed before a response arrived.
        Transport { message: String } => "geocoding transport failed: {message}",
        /// The provider answered with a non-success HTTP status.
        Status { status: u16, message: String } =>
            "geocoding provider returned status {status}: {message}",
        /// The provider reported an application-level failure.
        Rejected { status: String, message: String } =>
            "geocoding provider rejected request ({status}): {message}",
        /// The response body could not be interpreted.
        Decode { message: String } => "geocoding response decode failed: {message}",
    }
}

/// External geocoding provider.
///
/// [`GeocodingError::ZeroResults`] is a user-facing validation failure; every
/// other variant is an upstream fault.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, address: &Address) -> Result<Coordinates, GeocodingError>;
}
