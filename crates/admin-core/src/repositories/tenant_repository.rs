//! Tenant registry port

use async_trait::async_trait;

use crate::domain::{NewTenantRecord, RegistryPatch, Tenant};
use crate::error::DomainError;

/// Raw persistence of tenant rows in the shared registry table. No
/// cross-entity invariant is checked here; every operation is a single round
/// trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn insert(&self, record: NewTenantRecord) -> Result<Tenant, DomainError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Tenant>, DomainError>;
    /// Newest first, by id descending.
    async fn list_all(&self) -> Result<Vec<Tenant>, DomainError>;
    async fn update_fields(&self, id: i32, patch: RegistryPatch) -> Result<Tenant, DomainError>;
    /// Returns the number of rows removed; 0 is not an error at store level.
    async fn delete_by_id(&self, id: i32) -> Result<u64, DomainError>;
}
