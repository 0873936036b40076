//! # Admin Infrastructure
//!
//! PostgreSQL adapters and the session store (adapters).

pub mod database;
pub mod session;

pub use database::{
    create_pool, run_migrations, PgAdminUserRepository, PgSchemaProvisioner, PgTenantRepository,
};
pub use session::MemorySessionStore;
