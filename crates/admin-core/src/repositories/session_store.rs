//! Session collaborator port

use crate::domain::AdminUser;
use crate::error::DomainError;

/// Capability contract for the external session collaborator that keeps the
/// authenticated operator between requests (browser-local storage in the
/// reference client).
pub trait SessionStore: Send + Sync {
    fn store(&self, user: &AdminUser) -> Result<(), DomainError>;
    fn get(&self) -> Result<Option<AdminUser>, DomainError>;
    fn clear(&self);
}
