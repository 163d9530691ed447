//! Port abstraction for the place store.
//!
//! Every mutation that touches a place's existence also touches the owner's
//! place list. Adapters must apply both writes in one atomic unit so the list
//! and the places' `creator` fields never disagree.

use async_trait::async_trait;

use crate::domain::{Place, PlaceDetails, PlaceDraft, PlaceId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by place repository adapters.
    pub enum PlacePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "place repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "place repository query failed: {message}",
        /// The owning user does not exist.
        OwnerNotFound { user_id: String } => "place owner not found: {user_id}",
        /// The addressed place does not exist.
        NotFound { place_id: String } => "place not found: {place_id}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaceRepository: Send + Sync {
    /// Fetch a place by identifier.
    async fn find_by_id(&self, id: &PlaceId) -> Result<Option<Place>, PlacePersistenceError>;

    /// Places owned by `owner`, in the order of the owner's place list.
    ///
    /// Returns `None` when the user does not exist, so callers can tell an
    /// unknown user apart from one without places.
    async fn list_by_owner(
        &self,
        owner: &UserId,
    ) -> Result<Option<Vec<Place>>, PlacePersistenceError>;

    /// Insert a place and append its id to the owner's list atomically.
    async fn create_for_owner(
        &self,
        draft: &PlaceDraft,
        owner: &UserId,
    ) -> Result<Place, PlacePersistenceError>;

    /// Overwrite title and description; `None` when the place is absent.
    async fn update_details(
        &self,
        id: &PlaceId,
        details: &PlaceDetails,
    ) -> Result<Option<Place>, PlacePersistenceError>;

    /// Remove a place and pull its id from the owner's list atomically.
    async fn delete_for_owner(
        &self,
        id: &PlaceId,
        owner: &UserId,
    ) -> Result<(), PlacePersistenceError>;
}
