pub mod child;
pub mod schedule;
