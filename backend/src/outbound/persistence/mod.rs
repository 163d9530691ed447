//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. No business rules live here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Async pooling**: connections come from a `bb8` pool through
//!   `diesel-async`.
//! - **Typed errors**: every Diesel failure becomes a port error.
//!
//! # Example
//!
//! ```no_run
//! use places_backend::outbound::persistence::{
//!     DbPool, DieselPlaceRepository, DieselUserRepository, PoolConfig,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/places")).await?;
//! let users = DieselUserRepository::new(pool.clone());
//! let places = DieselPlaceRepository::new(pool);
//! # let _ = (users, places);
//! # Ok(())
//! # }
//! ```

mod diesel_error_mapping;
mod diesel_place_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_place_repository::DieselPlaceRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
