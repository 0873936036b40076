//! Schema provisioner port

use async_trait::async_trait;

use crate::domain::SchemaHandle;
use crate::error::DomainError;

/// Seed data for a new tenant's isolated schema.
#[derive(Debug, Clone)]
pub struct TenantSeed {
    pub nombre: String,
    pub email_contacto: String,
    pub telefono_contacto: Option<String>,
    pub credencial_hash: String,
    pub estado: bool,
}

/// Mutation of the schema-internal record. `credencial_hash` rotates the
/// stored hash only when present; `rename_to` moves the schema itself.
#[derive(Debug, Clone)]
pub struct SchemaUpdate {
    pub nombre: String,
    pub email_contacto: String,
    pub telefono_contacto: Option<String>,
    pub credencial_hash: Option<String>,
    pub estado: bool,
    pub rename_to: Option<SchemaHandle>,
}

/// Sole authority over the per-tenant isolated schemas: mints and retires
/// their identifiers, and owns the bootstrap record inside each one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchemaProvisioner: Send + Sync {
    /// Create the tenant's schema and its bootstrap record as one atomic
    /// step, returning the minted handle. On any internal failure nothing
    /// partial remains.
    async fn provision(&self, seed: TenantSeed) -> Result<SchemaHandle, DomainError>;

    /// Update the schema-internal record, optionally renaming the schema.
    /// Renaming is all-or-nothing. Returns the handle valid after the call.
    async fn update(
        &self,
        esquema: SchemaHandle,
        cambios: SchemaUpdate,
    ) -> Result<SchemaHandle, DomainError>;

    /// Irreversibly drop the schema and everything inside it. Reports
    /// `SchemaNotFound` distinctly when the schema is already absent.
    async fn deprovision(&self, esquema: SchemaHandle) -> Result<(), DomainError>;
}
