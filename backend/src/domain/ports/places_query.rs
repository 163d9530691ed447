//! Driving port for reading places.

use async_trait::async_trait;

use crate::domain::{Error, Place, PlaceId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlacesQuery: Send + Sync {
    /// Fetch one place; not found when absent.
    async fn place_by_id(&self, id: &PlaceId) -> Result<Place, Error>;

    /// Places owned by a user.
    ///
    /// An unknown user and a user without places both surface as not found.
    async fn places_by_user(&self, user_id: &UserId) -> Result<Vec<Place>, Error>;
}
