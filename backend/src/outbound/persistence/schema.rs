//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered users.
    ///
    /// `place_ids` is the ordered inverse of `places.creator_id`; it is only
    /// rewritten inside the transactions that insert or delete places.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        /// Normalised (trimmed, lower-case) address; unique.
        email -> Varchar,
        password_hash -> Varchar,
        image_path -> Varchar,
        place_ids -> Array<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Shared places with their geocoded coordinates.
    places (id) {
        id -> Uuid,
        title -> Text,
        description -> Text,
        address -> Text,
        latitude -> Float8,
        longitude -> Float8,
        image_path -> Varchar,
        /// Owning user; immutable after insert.
        creator_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(places -> users (creator_id));
diesel::allow_tables_to_appear_in_same_query!(users, places);
