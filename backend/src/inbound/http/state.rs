//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, ImageStore, PlacesCommand, PlacesQuery, TokenService, UsersQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub places: Arc<dyn PlacesCommand>,
    pub places_query: Arc<dyn PlacesQuery>,
    /// Stores multipart uploads before the use-case runs and discards them
    /// when it fails.
    pub images: Arc<dyn ImageStore>,
    /// Verifies bearer tokens for the authentication extractor.
    pub tokens: Arc<dyn TokenService>,
}
