//! Ports: repository, provisioner, and session traits

pub mod admin_user_repository;
pub mod schema_provisioner;
pub mod session_store;
pub mod tenant_repository;

pub use admin_user_repository::AdminUserRepository;
pub use schema_provisioner::{SchemaProvisioner, SchemaUpdate, TenantSeed};
pub use session_store::SessionStore;
pub use tenant_repository::TenantRepository;
