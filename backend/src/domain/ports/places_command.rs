//! Driving port for creating, editing and deleting places.
//!
//! Every operation receives the authenticated caller explicitly.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, NewPlaceRequest, Place, PlaceDetails, PlaceId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlacesCommand: Send + Sync {
    /// Geocode the address, then store the place and link it to its creator.
    async fn create_place(&self, request: NewPlaceRequest) -> Result<Place, Error>;

    /// Replace title and description.
    async fn update_place(
        &self,
        id: &PlaceId,
        details: PlaceDetails,
        requester: &AuthenticatedUser,
    ) -> Result<Place, Error>;

    /// Delete a place owned by `requester` and release its image.
    async fn delete_place(&self, id: &PlaceId, requester: &AuthenticatedUser)
    -> Result<(), Error>;
}
