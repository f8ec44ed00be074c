//! # Domain Module
//!
//! Registration rules and schedule derivation, independent of HTTP and of the
//! storage engine.
//!
//! - **child_service** - intake validation and listing
//! - **vaccination_schedule** - configurable rule set and the pure derivation
//! - **reminder_service** - guardian notifications after intake
//! - **models** - domain types

pub mod child_service;
pub mod models;
pub mod reminder_service;
pub mod vaccination_schedule;

pub use child_service::ChildService;
pub use reminder_service::{ReminderNotifier, SmtpConfig, SmtpReminderNotifier};
pub use vaccination_schedule::{ScheduleRules, VaccineRule};
