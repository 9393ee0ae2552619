//! # Storage Traits
//!
//! The repository abstraction the domain services are written against. One
//! implementation exists per animal kind; each owns exactly one table.

use async_trait::async_trait;
use shared::AnimalRecord;

use crate::backend::domain::errors::RescueResult;

/// Trait defining the persistence operations for one kind of animal
#[async_trait]
pub trait AnimalStorage: Send + Sync {
    /// Create the backing table if it does not exist yet. Safe to call on every startup.
    async fn ensure_schema(&self) -> RescueResult<()>;

    /// Store a new record and return it with the store-assigned id.
    /// Fails with `DuplicateName` if the name is already taken.
    async fn insert(&self, record: &AnimalRecord) -> RescueResult<AnimalRecord>;

    /// Overwrite the mutable fields of the record with the same name.
    /// The reservation flag is left untouched. Fails with `NotFound` if no row matched.
    async fn update(&self, record: &AnimalRecord) -> RescueResult<()>;

    /// Every record, in insertion order
    async fn fetch_all(&self) -> RescueResult<Vec<AnimalRecord>>;

    async fn fetch_by_name(&self, name: &str) -> RescueResult<Option<AnimalRecord>>;

    async fn fetch_by_id(&self, id: i64) -> RescueResult<Option<AnimalRecord>>;

    /// Records with `reserved = false`
    async fn fetch_available(&self) -> RescueResult<Vec<AnimalRecord>>;

    /// Records with `reserved = true`
    async fn fetch_unavailable(&self) -> RescueResult<Vec<AnimalRecord>>;

    /// Set the reservation flag of the row with the given id.
    /// Fails with `NotFound` if the id does not exist.
    async fn set_reserved(&self, id: i64, reserved: bool) -> RescueResult<()>;
}
