//! # Admin Security
//!
//! Credential hashing primitives for the admin platform.

pub mod password;

pub use password::{PasswordError, PasswordService};
