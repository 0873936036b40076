//! PostgreSQL adapter implementations

pub mod admin_user_repo_impl;
pub mod schema_provisioner_impl;
pub mod tenant_repo_impl;

pub use admin_user_repo_impl::PgAdminUserRepository;
pub use schema_provisioner_impl::PgSchemaProvisioner;
pub use tenant_repo_impl::PgTenantRepository;
