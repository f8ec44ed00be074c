//! # Storage Module
//!
//! Durable persistence for child registrations (the record store).
//!
//! The domain layer only sees the [`ChildStorage`] trait, so the SQLite
//! implementation can be swapped out (or replaced by a failing/slow double in
//! tests) without touching the intake and listing logic.
//!
//! ## Guarantees
//!
//! - **Atomic append**: a record is either fully stored or not at all
//! - **Insertion order**: listings return records in the order they were stored
//! - **Whole records only**: a row that cannot be decoded fails the listing

pub mod sqlite;
pub mod traits;

pub use sqlite::{DbConnection, SqliteChildRepository, StoreSettings};
pub use traits::ChildStorage;
