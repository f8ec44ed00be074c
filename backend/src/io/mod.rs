//! # IO Module
//!
//! Translates HTTP requests into domain operations and domain results into
//! JSON responses. No business rules live here.

pub mod rest;

pub use rest::*;
