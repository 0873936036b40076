//! Admin user repository port

use async_trait::async_trait;

use crate::domain::{AdminUser, AdminUserRecord};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminUserRepository: Send + Sync {
    async fn insert(&self, record: AdminUserRecord) -> Result<AdminUser, DomainError>;
    /// Newest first, by id descending.
    async fn list_all(&self) -> Result<Vec<AdminUser>, DomainError>;
    /// The stored credential hash travels next to the user, never on it.
    async fn find_by_id_with_hash(
        &self,
        id: i32,
    ) -> Result<Option<(AdminUser, String)>, DomainError>;
    async fn find_by_correo_with_hash(
        &self,
        correo: String,
    ) -> Result<Option<(AdminUser, String)>, DomainError>;
    /// Whole-row rewrite.
    async fn update_full(&self, id: i32, record: AdminUserRecord)
        -> Result<AdminUser, DomainError>;
    async fn delete_by_id(&self, id: i32) -> Result<(), DomainError>;
    async fn touch_ultimo_ingreso(&self, id: i32) -> Result<(), DomainError>;
}
