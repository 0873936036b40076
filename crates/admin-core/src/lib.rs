//! # Admin Core
//!
//! Domain entities, ports, and orchestration services for the multi-tenant
//! admin platform.

pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;

pub use domain::*;
pub use error::DomainError;
