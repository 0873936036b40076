//! # Admin Shared
//!
//! Shared configuration, telemetry, and utilities for the admin platform.

pub mod config;
pub mod constants;
pub mod error;
pub mod telemetry;
pub mod utils;

pub use error::AppError;
