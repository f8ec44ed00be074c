//! # REST API Interface Layer
//!
//! - `POST /submit-data` - record intake
//! - `GET /get-data` - all records with derived vaccination schedules
//! - `GET /vaccines` - the active schedule rule set
//!
//! Failures are returned as [`RegistryError`](crate::error::RegistryError)
//! responses carrying a machine-readable kind.

pub mod child_apis;
pub mod mappers;
pub mod vaccine_apis;

pub use child_apis::{get_data, submit_data};
pub use vaccine_apis::list_vaccines;
