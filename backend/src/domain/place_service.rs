//! Place domain service.
//!
//! Reads and mutates places on behalf of inbound adapters. Creation geocodes
//! the address before anything is written; deletion commits the store change
//! first and releases the image afterwards as a best-effort step outside the
//! transaction.

use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{
    Geocoder, GeocodingError, ImageStore, PlacePersistenceError, PlaceRepository, PlacesCommand,
    PlacesQuery, UserRepository,
};
use crate::domain::{
    AuthenticatedUser, Error, NewPlaceRequest, Place, PlaceDetails, PlaceDraft, PlaceId, UserId,
};

pub(crate) const PLACE_NOT_FOUND: &str = "Could not find place for the provided id.";
pub(crate) const PLACE_FETCH_FAILED: &str = "Something went wrong, could not find a place.";
pub(crate) const USER_PLACES_NOT_FOUND: &str = "Could not find places for the provided user id.";
pub(crate) const USER_PLACES_FAILED: &str = "Fetching places failed, please try again later.";
pub(crate) const LOCATION_NOT_FOUND: &str = "Could not find location for the specified address.";
pub(crate) const CREATOR_NOT_FOUND: &str = "Could not find user for provided id.";
pub(crate) const CREATE_FAILED: &str = "Creating place failed, please try again.";
pub(crate) const UPDATE_FAILED: &str = "Something went wrong, could not update place.";
pub(crate) const UPDATE_FORBIDDEN: &str = "You are not allowed to edit this place.";
pub(crate) const DELETE_FAILED: &str = "Something went wrong, could not delete place.";
pub(crate) const DELETE_FORBIDDEN: &str = "You are not allowed to delete this place.";

fn internal(message: &'static str, cause: impl Display) -> Error {
    error!(error = %cause, "{message}");
    Error::internal(message)
}

/// Why a user's place listing came back empty-handed.
///
/// Both cases answer not found; the distinction only reaches the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlacesMiss {
    UnknownUser,
    NoPlaces,
}

impl PlacesMiss {
    fn as_str(self) -> &'static str {
        match self {
            Self::UnknownUser => "unknown_user",
            Self::NoPlaces => "no_places",
        }
    }
}

/// Whether `requester` may edit the details of `place`.
///
/// Any authenticated user may edit any place's title and description.
fn may_update(_place: &Place, _requester: &AuthenticatedUser) -> bool {
    true
}

/// Place service implementing [`PlacesQuery`] and [`PlacesCommand`].
#[derive(Clone)]
pub struct PlaceService<P, U, G, I> {
    places: Arc<P>,
    users: Arc<U>,
    geocoder: Arc<G>,
    images: Arc<I>,
}

impl<P, U, G, I> PlaceService<P, U, G, I> {
    pub fn new(places: Arc<P>, users: Arc<U>, geocoder: Arc<G>, images: Arc<I>) -> Self {
        Self {
            places,
            users,
            geocoder,
            images,
        }
    }
}

impl<P, U, G, I> PlaceService<P, U, G, I>
where
    P: PlaceRepository,
    U: UserRepository,
    G: Geocoder,
    I: ImageStore,
{
    fn map_geocoding_error(error: GeocodingError) -> Error {
        match error {
            GeocodingError::ZeroResults => {
                debug!("place rejected: address has no geocoding results");
                Error::invalid_request(LOCATION_NOT_FOUND)
            }
            other => internal(CREATE_FAILED, other),
        }
    }

    async fn find_place(&self, id: &PlaceId, failure: &'static str) -> Result<Place, Error> {
        self.places
            .find_by_id(id)
            .await
            .map_err(|err| internal(failure, err))?
            .ok_or_else(|| Error::not_found(PLACE_NOT_FOUND))
    }
}

#[async_trait]
impl<P, U, G, I> PlacesQuery for PlaceService<P, U, G, I>
where
    P: PlaceRepository,
    U: UserRepository,
    G: Geocoder,
    I: ImageStore,
{
    async fn place_by_id(&self, id: &PlaceId) -> Result<Place, Error> {
        self.find_place(id, PLACE_FETCH_FAILED).await
    }

    async fn places_by_user(&self, user_id: &UserId) -> Result<Vec<Place>, Error> {
        let listing = self
            .places
            .list_by_owner(user_id)
            .await
            .map_err(|err| internal(USER_PLACES_FAILED, err))?;
        let miss = match listing {
            Some(places) if !places.is_empty() => return Ok(places),
            Some(_) => PlacesMiss::NoPlaces,
            None => PlacesMiss::UnknownUser,
        };
        debug!(%user_id, reason = miss.as_str(), "no places for user");
        Err(Error::not_found(USER_PLACES_NOT_FOUND))
    }
}

#[async_trait]
impl<P, U, G, I> PlacesCommand for PlaceService<P, U, G, I>
where
    P: PlaceRepository,
    U: UserRepository,
    G: Geocoder,
    I: ImageStore,
{
    async fn create_place(&self, request: NewPlaceRequest) -> Result<Place, Error> {
        let location = self
            .geocoder
            .resolve(&request.address)
            .await
            .map_err(Self::map_geocoding_error)?;

        let creator = request.creator;
        if self
            .users
            .find_by_id(&creator)
            .await
            .map_err(|err| internal(CREATE_FAILED, err))?
            .is_none()
        {
            debug!(%creator, "place rejected: creator does not exist");
            return Err(Error::not_found(CREATOR_NOT_FOUND));
        }

        let draft = PlaceDraft {
            title: request.title,
            description: request.description,
            address: request.address,
            location,
            image: request.image,
        };
        let place = self
            .places
            .create_for_owner(&draft, &creator)
            .await
            .map_err(|err| match err {
                PlacePersistenceError::OwnerNotFound { user_id } => {
                    debug!(%user_id, "place rejected: creator vanished before commit");
                    Error::not_found(CREATOR_NOT_FOUND)
                }
                other => internal(CREATE_FAILED, other),
            })?;

        info!(place_id = %place.id(), %creator, "place created");
        Ok(place)
    }

    async fn update_place(
        &self,
        id: &PlaceId,
        details: PlaceDetails,
        requester: &AuthenticatedUser,
    ) -> Result<Place, Error> {
        let place = self.find_place(id, UPDATE_FAILED).await?;
        if !may_update(&place, requester) {
            debug!(place_id = %id, requester = %requester.user_id(), "update forbidden");
            return Err(Error::forbidden(UPDATE_FORBIDDEN));
        }

        let updated = self
            .places
            .update_details(id, &details)
            .await
            .map_err(|err| internal(UPDATE_FAILED, err))?
            .ok_or_else(|| Error::not_found(PLACE_NOT_FOUND))?;

        info!(place_id = %id, requester = %requester.user_id(), "place updated");
        Ok(updated)
    }

    async fn delete_place(&self, id: &PlaceId, requester: &AuthenticatedUser) -> Result<(), Error> {
        let place = self.find_place(id, DELETE_FAILED).await?;
        if place.creator() != requester.user_id() {
            debug!(place_id = %id, requester = %requester.user_id(), "delete forbidden");
            return Err(Error::forbidden(DELETE_FORBIDDEN));
        }

        self.places
            .delete_for_owner(id, &place.creator())
            .await
            .map_err(|err| match err {
                PlacePersistenceError::NotFound { .. } => Error::not_found(PLACE_NOT_FOUND),
                other => internal(DELETE_FAILED, other),
            })?;
        info!(place_id = %id, "place deleted");

        if let Err(err) = self.images.remove(place.image()).await {
            warn!(place_id = %id, image = %place.image(), error = %err, "image cleanup failed");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "place_service_tests.rs"]
mod tests;
