//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`) are called by inbound adapters.
//! Driven ports (repositories, geocoder, image store, hasher, tokens) are
//! implemented by outbound adapters and consumed by the domain services.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod geocoder;
mod image_store;
mod password_hasher;
mod place_repository;
mod places_command;
mod places_query;
mod token_service;
mod user_repository;
mod users_query;

pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use geocoder::{Geocoder, GeocodingError};
#[cfg(test)]
pub use geocoder::MockGeocoder;
pub use image_store::{ImageStore, ImageStoreError};
#[cfg(test)]
pub use image_store::MockImageStore;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use place_repository::MockPlaceRepository;
pub use place_repository::{PlacePersistenceError, PlaceRepository};
#[cfg(test)]
pub use places_command::MockPlacesCommand;
pub use places_command::PlacesCommand;
#[cfg(test)]
pub use places_query::MockPlacesQuery;
pub use places_query::PlacesQuery;
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
