//! # Storage Traits
//!
//! Storage abstraction used by the domain layer.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::child::Child;

/// Trait defining the interface for child record storage operations
///
/// Records are immutable once stored, so the interface only appends and reads.
#[async_trait]
pub trait ChildStorage: Send + Sync {
    /// Store a new child record. Must be atomic: on error nothing is visible.
    ///
    /// Callers await this to completion, so implementations bound their own
    /// wait for the backing store and must not commit after returning an error.
    async fn store_child(&self, child: &Child) -> Result<()>;

    /// List all child records in insertion order
    async fn list_children(&self) -> Result<Vec<Child>>;
}
