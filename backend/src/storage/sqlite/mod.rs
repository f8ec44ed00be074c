//! # SQLite Storage Module
//!
//! - **connection.rs** - pool setup, pragmas and schema
//! - **child_repository.rs** - [`ChildStorage`](crate::storage::ChildStorage) over the `children` table

pub mod child_repository;
pub mod connection;

pub use child_repository::ChildRepository as SqliteChildRepository;
pub use connection::{DbConnection, StoreSettings};
