//! Internal Diesel row structs and their conversions to domain types.
//!
//! Rows never leave the persistence layer. Stored values are re-validated on
//! the way out so a corrupted row surfaces as a query error instead of an
//! invalid domain value.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Address, Coordinates, EmailAddress, ImagePath, PasswordHash, Place, PlaceDescription,
    PlaceDraft, PlaceId, PlaceTitle, User, UserId, UserName,
};

use super::schema::{places, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub image_path: String,
    pub place_ids: Vec<Uuid>,
    #[expect(dead_code, reason = "audit column not surfaced by the API")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "audit column not surfaced by the API")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub image_path: &'a str,
    pub place_ids: Vec<Uuid>,
}

/// Row struct for reading from the places table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = places)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PlaceRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub image_path: String,
    pub creator_id: Uuid,
    #[expect(dead_code, reason = "audit column not surfaced by the API")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "audit column not surfaced by the API")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating place records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = places)]
pub(crate) struct NewPlaceRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub address: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub image_path: &'a str,
    pub creator_id: Uuid,
}

/// Stored value that no longer satisfies a domain invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("corrupt {table}.{column} for row {id}: {reason}")]
pub(crate) struct CorruptRow {
    table: &'static str,
    column: &'static str,
    id: Uuid,
    reason: String,
}

impl CorruptRow {
    fn new(table: &'static str, column: &'static str, id: Uuid, reason: impl ToString) -> Self {
        Self {
            table,
            column,
            id,
            reason: reason.to_string(),
        }
    }
}

impl UserRow {
    pub fn into_domain(self) -> Result<User, CorruptRow> {
        let id = self.id;
        let name = UserName::new(&self.name).map_err(|err| CorruptRow::new("users", "name", id, err))?;
        let email =
            EmailAddress::new(&self.email).map_err(|err| CorruptRow::new("users", "email", id, err))?;
        let password_hash = PasswordHash::new(self.password_hash)
            .map_err(|err| CorruptRow::new("users", "password_hash", id, err))?;
        let image = ImagePath::new(self.image_path)
            .map_err(|err| CorruptRow::new("users", "image_path", id, err))?;
        let places = self.place_ids.into_iter().map(PlaceId::from_uuid).collect();

        Ok(User::new(
            UserId::from_uuid(id),
            name,
            email,
            password_hash,
            image,
            places,
        ))
    }
}

impl PlaceRow {
    pub fn into_domain(self) -> Result<Place, CorruptRow> {
        let id = self.id;
        let title =
            PlaceTitle::new(&self.title).map_err(|err| CorruptRow::new("places", "title", id, err))?;
        let description = PlaceDescription::new(&self.description)
            .map_err(|err| CorruptRow::new("places", "description", id, err))?;
        let address =
            Address::new(&self.address).map_err(|err| CorruptRow::new("places", "address", id, err))?;
        let location = Coordinates::new(self.latitude, self.longitude)
            .map_err(|err| CorruptRow::new("places", "latitude/longitude", id, err))?;
        let image = ImagePath::new(self.image_path)
            .map_err(|err| CorruptRow::new("places", "image_path", id, err))?;

        Ok(Place::new(
            PlaceId::from_uuid(id),
            PlaceDraft {
                title,
                description,
                address,
                location,
                image,
            },
            UserId::from_uuid(self.creator_id),
        ))
    }
}

impl<'a> NewPlaceRow<'a> {
    pub fn from_draft(id: Uuid, draft: &'a PlaceDraft, owner: &UserId) -> Self {
        Self {
            id,
            title: draft.title.as_ref(),
            description: draft.description.as_ref(),
            address: draft.address.as_ref(),
            latitude: draft.location.lat(),
            longitude: draft.location.lng(),
            image_path: draft.image.as_ref(),
            creator_id: *owner.as_uuid(),
        }
    }
}
