//! # Admin Core - Domain Module
//!
//! Domain entities for the admin platform.

pub mod admin_user;
pub mod esquema;
pub mod tenant;

// Re-export all entities
pub use admin_user::{AdminUser, AdminUserRecord, Rol};
pub use esquema::SchemaHandle;
pub use tenant::{NewTenantRecord, RegistryPatch, Tenant};
