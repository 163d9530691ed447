//! Places sharing API: accounts, geocoded places and their images.
//!
//! The crate follows a hexagonal layout. [`domain`] holds value types,
//! ports and services; [`inbound`] adapts HTTP requests onto the driving
//! ports; [`outbound`] implements the driven ports against PostgreSQL, the
//! geocoding provider, bcrypt, JWT and the local filesystem.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
