//! In-memory session store

use std::sync::RwLock;

use tracing::warn;

use admin_core::domain::AdminUser;
use admin_core::error::DomainError;
use admin_core::repositories::SessionStore;

/// Keeps the authenticated operator as a serialized JSON blob, the same shape
/// the reference client persists in browser storage. A corrupt entry is
/// discarded on read.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: RwLock<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn store(&self, user: &AdminUser) -> Result<(), DomainError> {
        let raw =
            serde_json::to_string(user).map_err(|e| DomainError::InternalError(e.to_string()))?;
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = Some(raw);
        Ok(())
    }

    fn get(&self) -> Result<Option<AdminUser>, DomainError> {
        let raw = self
            .slot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        match raw {
            None => Ok(None),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(user) => Ok(Some(user)),
                Err(e) => {
                    warn!("Discarding corrupt session entry: {}", e);
                    self.clear();
                    Ok(None)
                }
            },
        }
    }

    fn clear(&self) {
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use admin_core::domain::Rol;

    use super::*;

    fn sample_user() -> AdminUser {
        AdminUser {
            id: 1,
            nombre: "Laura Gómez".into(),
            correo: "laura@zebra.co".into(),
            telefono: None,
            rol: Rol::Admin,
            activo: true,
            ultimo_ingreso: None,
            fecha_creacion: Utc::now(),
        }
    }

    #[test]
    fn store_and_get_round_trip() {
        let store = MemorySessionStore::new();
        store.store(&sample_user()).unwrap();
        let user = store.get().unwrap().unwrap();
        assert_eq!(user.correo, "laura@zebra.co");
    }

    #[test]
    fn clear_empties_the_slot() {
        let store = MemorySessionStore::new();
        store.store(&sample_user()).unwrap();
        store.clear();
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn corrupt_entry_is_discarded_on_read() {
        let store = MemorySessionStore::new();
        *store.slot.write().unwrap() = Some("{no es json".into());

        assert!(store.get().unwrap().is_none());
        // The corrupt blob is gone, not just skipped.
        assert!(store.slot.read().unwrap().is_none());
    }
}
