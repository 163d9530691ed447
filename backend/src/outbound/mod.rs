//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of domain port traits:
//!
//! - **persistence**: PostgreSQL-backed user and place repositories (Diesel)
//! - **geocoding**: HTTP geocoding client (reqwest)
//! - **security**: bcrypt password hashing and JWT bearer tokens
//! - **storage**: local-disk image store (cap-std)
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod geocoding;
pub mod persistence;
pub mod security;
pub mod storage;
