//! # Admin Core - Services Module
//!
//! Orchestration services over the ports.

pub mod admin_user_service;
pub mod tenant_service;

pub use admin_user_service::{AdminUserService, NewAdminUserInput, UpdateAdminUserInput};
pub use tenant_service::{NewTenantInput, TenantService, UpdateTenantInput};
