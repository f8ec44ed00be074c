use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::schedule::ScheduledDose;

/// Domain model representing one child's registration.
///
/// Instances only exist once intake validation has passed, so every field
/// here satisfies the record invariants (non-empty name, guardian, email).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: String,
    pub name: String,
    pub parent_id: String,
    pub parent_email: String,
    /// Free text; empty when the guardian did not provide one
    pub gender: String,
    pub dob: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Child {
    /// Generate a unique ID for a child
    pub fn generate_id() -> String {
        format!("child::{}", uuid::Uuid::new_v4())
    }
}

/// A stored child together with the schedule derived for it at read time
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledChild {
    pub child: Child,
    pub schedule: Vec<ScheduledDose>,
}
