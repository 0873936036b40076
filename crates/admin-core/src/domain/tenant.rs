// ============================================================================
// Admin Core - Tenant Entities
// File: crates/admin-core/src/domain/tenant.rs
// ============================================================================
//! Tenant registry entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::esquema::SchemaHandle;

/// One row of the shared tenant registry.
///
/// The credential hash is persisted on the row but never carried here, so it
/// cannot leak through serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: i32,
    pub nombre: String,
    pub nit: Option<String>,
    pub email_contacto: String,
    pub telefono_contacto: Option<String>,
    pub direccion: Option<String>,
    pub estado: bool,
    pub ultimo_ingreso: Option<DateTime<Utc>>,
    pub fecha_creacion: DateTime<Utc>,
    pub esquema: Option<SchemaHandle>,
}

/// Fields persisted at creation time. `id` and `fecha_creacion` are assigned
/// by the store.
#[derive(Debug, Clone)]
pub struct NewTenantRecord {
    pub nombre: String,
    pub nit: Option<String>,
    pub email_contacto: String,
    pub telefono_contacto: Option<String>,
    pub direccion: Option<String>,
    pub estado: bool,
    pub credencial_hash: String,
    pub esquema: SchemaHandle,
}

/// Partial registry update.
///
/// Plain `Option` fields are written when present. The nested `Option` fields
/// distinguish "leave alone" (`None`) from "set to NULL" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct RegistryPatch {
    pub nombre: Option<String>,
    pub email_contacto: Option<String>,
    pub estado: Option<bool>,
    pub esquema: Option<SchemaHandle>,
    pub nit: Option<Option<String>>,
    pub telefono_contacto: Option<Option<String>>,
    pub direccion: Option<Option<String>>,
}

impl RegistryPatch {
    pub fn is_empty(&self) -> bool {
        self.nombre.is_none()
            && self.email_contacto.is_none()
            && self.estado.is_none()
            && self.esquema.is_none()
            && self.nit.is_none()
            && self.telefono_contacto.is_none()
            && self.direccion.is_none()
    }

    /// Reference semantics of the partial update; the SQL adapter mirrors
    /// this field for field.
    pub fn apply_to(&self, tenant: &mut Tenant) {
        if let Some(nombre) = &self.nombre {
            tenant.nombre = nombre.clone();
        }
        if let Some(email) = &self.email_contacto {
            tenant.email_contacto = email.clone();
        }
        if let Some(estado) = self.estado {
            tenant.estado = estado;
        }
        if let Some(esquema) = &self.esquema {
            tenant.esquema = Some(esquema.clone());
        }
        if let Some(nit) = &self.nit {
            tenant.nit = nit.clone();
        }
        if let Some(telefono) = &self.telefono_contacto {
            tenant.telefono_contacto = telefono.clone();
        }
        if let Some(direccion) = &self.direccion {
            tenant.direccion = direccion.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tenant() -> Tenant {
        Tenant {
            id: 1,
            nombre: "Acme".into(),
            nit: Some("900123456".into()),
            email_contacto: "a@acme.com".into(),
            telefono_contacto: Some("3001234567".into()),
            direccion: Some("Calle 10 # 5-20".into()),
            estado: true,
            ultimo_ingreso: None,
            fecha_creacion: Utc::now(),
            esquema: Some(SchemaHandle::parse("tenant_acme_x4k2q9").unwrap()),
        }
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut tenant = sample_tenant();
        let before = tenant.clone();
        let patch = RegistryPatch::default();
        assert!(patch.is_empty());
        patch.apply_to(&mut tenant);
        assert_eq!(tenant.nombre, before.nombre);
        assert_eq!(tenant.nit, before.nit);
        assert_eq!(tenant.telefono_contacto, before.telefono_contacto);
    }

    #[test]
    fn tri_state_fields_distinguish_clear_from_absent() {
        let mut tenant = sample_tenant();
        let patch = RegistryPatch {
            nit: Some(None),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        patch.apply_to(&mut tenant);
        assert_eq!(tenant.nit, None);
        // Untouched tri-state field survives.
        assert!(tenant.telefono_contacto.is_some());
    }

    #[test]
    fn plain_fields_overwrite_when_present() {
        let mut tenant = sample_tenant();
        let patch = RegistryPatch {
            nombre: Some("Acme Norte".into()),
            estado: Some(false),
            ..Default::default()
        };
        patch.apply_to(&mut tenant);
        assert_eq!(tenant.nombre, "Acme Norte");
        assert!(!tenant.estado);
    }

    #[test]
    fn tenant_never_serializes_credentials() {
        let tenant = sample_tenant();
        let json = serde_json::to_string(&tenant).unwrap();
        assert!(!json.contains("credencial"));
        assert!(json.contains("tenant_acme_x4k2q9"));
    }
}
