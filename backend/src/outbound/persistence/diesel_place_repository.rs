//! PostgreSQL-backed `PlaceRepository` implementation using Diesel ORM.
//!
//! Inserts and deletes run in one transaction together with the rewrite of
//! the owner's `place_ids`. The owner row is locked with `SELECT ... FOR
//! UPDATE` first, so concurrent writers for the same user serialise on it.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{PlacePersistenceError, PlaceRepository};
use crate::domain::{Place, PlaceDetails, PlaceDraft, PlaceId, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewPlaceRow, PlaceRow};
use super::pool::{DbPool, PoolError};
use super::schema::{places, users};

/// Diesel-backed implementation of the place store.
#[derive(Clone)]
pub struct DieselPlaceRepository {
    pool: DbPool,
}

impl DieselPlaceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a place transaction.
#[derive(Debug)]
enum TxError {
    Diesel(diesel::result::Error),
    OwnerNotFound,
    PlaceNotFound,
}

impl From<diesel::result::Error> for TxError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

fn pool_error(error: PoolError) -> PlacePersistenceError {
    map_pool_error(error, PlacePersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> PlacePersistenceError {
    map_diesel_error(
        error,
        PlacePersistenceError::query,
        PlacePersistenceError::connection,
    )
}

fn row_to_place(row: PlaceRow) -> Result<Place, PlacePersistenceError> {
    row.into_domain()
        .map_err(|err| PlacePersistenceError::query(err.to_string()))
}

/// Lock the owner row and return its place list, or `None` if absent.
async fn lock_owner_places(
    conn: &mut AsyncPgConnection,
    owner: Uuid,
) -> Result<Option<Vec<Uuid>>, diesel::result::Error> {
    users::table
        .find(owner)
        .select(users::place_ids)
        .for_update()
        .first::<Vec<Uuid>>(conn)
        .await
        .optional()
}

async fn write_owner_places(
    conn: &mut AsyncPgConnection,
    owner: Uuid,
    place_ids: &[Uuid],
) -> Result<(), diesel::result::Error> {
    diesel::update(users::table.find(owner))
        .set((
            users::place_ids.eq(place_ids),
            users::updated_at.eq(diesel::dsl::now),
        ))
        .execute(conn)
        .await
        .map(|_| ())
}

/// Order `rows` by their position in `order`; ids without a row are skipped.
fn order_by_ids(rows: Vec<PlaceRow>, order: &[Uuid]) -> Vec<PlaceRow> {
    let mut by_id: HashMap<Uuid, PlaceRow> = rows.into_iter().map(|row| (row.id, row)).collect();
    order.iter().filter_map(|id| by_id.remove(id)).collect()
}

#[async_trait]
impl PlaceRepository for DieselPlaceRepository {
    async fn find_by_id(&self, id: &PlaceId) -> Result<Option<Place>, PlacePersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        places::table
            .find(id.as_uuid())
            .select(PlaceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_place)
            .transpose()
    }

    async fn list_by_owner(
        &self,
        owner: &UserId,
    ) -> Result<Option<Vec<Place>>, PlacePersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let Some(place_ids) = users::table
            .find(owner.as_uuid())
            .select(users::place_ids)
            .first::<Vec<Uuid>>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
        else {
            return Ok(None);
        };
        if place_ids.is_empty() {
            return Ok(Some(Vec::new()));
        }

        let rows: Vec<PlaceRow> = places::table
            .filter(places::id.eq_any(&place_ids))
            .select(PlaceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        order_by_ids(rows, &place_ids)
            .into_iter()
            .map(row_to_place)
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    async fn create_for_owner(
        &self,
        draft: &PlaceDraft,
        owner: &UserId,
    ) -> Result<Place, PlacePersistenceError> {
        let mut pooled = self.pool.get().await.map_err(pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let owner_id = *owner.as_uuid();
        let row = NewPlaceRow::from_draft(Uuid::new_v4(), draft, owner);

        let inserted = conn
            .transaction(|conn| {
                async move {
                    let mut place_ids = lock_owner_places(conn, owner_id)
                        .await?
                        .ok_or(TxError::OwnerNotFound)?;

                    let inserted = diesel::insert_into(places::table)
                        .values(&row)
                        .returning(PlaceRow::as_returning())
                        .get_result(conn)
                        .await?;

                    place_ids.push(inserted.id);
                    write_owner_places(conn, owner_id, &place_ids).await?;
                    Ok::<_, TxError>(inserted)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| match err {
                TxError::OwnerNotFound => PlacePersistenceError::owner_not_found(owner.to_string()),
                TxError::PlaceNotFound => PlacePersistenceError::query("unexpected missing place"),
                TxError::Diesel(error) => diesel_error(error),
            })?;
        row_to_place(inserted)
    }

    async fn update_details(
        &self,
        id: &PlaceId,
        details: &PlaceDetails,
    ) -> Result<Option<Place>, PlacePersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::update(places::table.find(id.as_uuid()))
            .set((
                places::title.eq(details.title.as_ref()),
                places::description.eq(details.description.as_ref()),
                places::updated_at.eq(diesel::dsl::now),
            ))
            .returning(PlaceRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_place)
            .transpose()
    }

    async fn delete_for_owner(
        &self,
        id: &PlaceId,
        owner: &UserId,
    ) -> Result<(), PlacePersistenceError> {
        let mut pooled = self.pool.get().await.map_err(pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let owner_id = *owner.as_uuid();
        let place_id = *id.as_uuid();

        conn.transaction(|conn| {
            async move {
                let mut place_ids = lock_owner_places(conn, owner_id)
                    .await?
                    .ok_or(TxError::OwnerNotFound)?;

                let deleted = diesel::delete(
                    places::table
                        .filter(places::id.eq(place_id))
                        .filter(places::creator_id.eq(owner_id)),
                )
                .execute(conn)
                .await?;
                if deleted == 0 {
                    return Err(TxError::PlaceNotFound);
                }

                place_ids.retain(|existing| *existing != place_id);
                write_owner_places(conn, owner_id, &place_ids).await?;
                Ok::<_, TxError>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| match err {
            TxError::OwnerNotFound => PlacePersistenceError::owner_not_found(owner.to_string()),
            TxError::PlaceNotFound => PlacePersistenceError::not_found(id.to_string()),
            TxError::Diesel(error) => diesel_error(error),
        })
    }
}
