// ============================================================================
// Admin Core - Tenant Lifecycle Service
// File: crates/admin-core/src/services/tenant_service.rs
// ============================================================================
//! Tenant lifecycle orchestration: registry plus schema provisioner, treated
//! as one logical unit from the caller's perspective.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, info, warn};
use validator::{Validate, ValidateEmail};

use admin_security::password::PasswordService;
use admin_shared::constants::{
    ADDRESS_MAX_LENGTH, ADDRESS_MIN_LENGTH, MIN_PASSWORD_LENGTH, NIT_MAX_LENGTH, NIT_MIN_LENGTH,
    PHONE_MAX_LENGTH, PHONE_MIN_LENGTH,
};

use crate::domain::{NewTenantRecord, RegistryPatch, SchemaHandle, Tenant};
use crate::error::DomainError;
use crate::repositories::{SchemaProvisioner, SchemaUpdate, TenantRepository, TenantSeed};

/// Creation payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewTenantInput {
    #[validate(length(min = 1, message = "El nombre es obligatorio"))]
    pub nombre: String,

    #[validate(length(min = 3, max = 50))]
    pub nit: Option<String>,

    #[validate(email(message = "Email de contacto inválido"))]
    pub email_contacto: String,

    #[validate(length(min = 3, max = 50))]
    pub telefono_contacto: Option<String>,

    #[validate(length(min = 3, max = 200))]
    pub direccion: Option<String>,

    #[serde(rename = "contraseña")]
    #[validate(length(min = 4, message = "La contraseña debe tener al menos 4 caracteres"))]
    pub contrasena: String,

    pub estado: Option<bool>,
}

/// Update payload. Plain `Option` fields are applied when present; the nested
/// `Option` fields distinguish "leave alone" from "set to NULL". `esquema`
/// requests a schema rename.
#[derive(Debug, Clone, Default)]
pub struct UpdateTenantInput {
    pub nombre: Option<String>,
    pub nit: Option<Option<String>>,
    pub email_contacto: Option<String>,
    pub telefono_contacto: Option<Option<String>>,
    pub direccion: Option<Option<String>>,
    pub contrasena: Option<String>,
    pub estado: Option<bool>,
    pub esquema: Option<String>,
}

impl UpdateTenantInput {
    fn validate(&self) -> Result<(), DomainError> {
        if let Some(nombre) = &self.nombre {
            if nombre.is_empty() {
                return Err(DomainError::ValidationError(
                    "El nombre es obligatorio".into(),
                ));
            }
        }
        if let Some(email) = &self.email_contacto {
            if !email.validate_email() {
                return Err(DomainError::ValidationError(
                    "Email de contacto inválido".into(),
                ));
            }
        }
        check_opt_len("nit", self.nit.as_ref(), NIT_MIN_LENGTH, NIT_MAX_LENGTH)?;
        check_opt_len(
            "telefono_contacto",
            self.telefono_contacto.as_ref(),
            PHONE_MIN_LENGTH,
            PHONE_MAX_LENGTH,
        )?;
        check_opt_len(
            "direccion",
            self.direccion.as_ref(),
            ADDRESS_MIN_LENGTH,
            ADDRESS_MAX_LENGTH,
        )?;
        if let Some(contrasena) = &self.contrasena {
            if contrasena.chars().count() < MIN_PASSWORD_LENGTH {
                return Err(DomainError::ValidationError(
                    "La contraseña debe tener al menos 4 caracteres".into(),
                ));
            }
        }
        Ok(())
    }
}

fn check_opt_len(
    field: &str,
    value: Option<&Option<String>>,
    min: usize,
    max: usize,
) -> Result<(), DomainError> {
    if let Some(Some(value)) = value {
        let len = value.chars().count();
        if len < min || len > max {
            return Err(DomainError::ValidationError(format!(
                "{field} debe tener entre {min} y {max} caracteres"
            )));
        }
    }
    Ok(())
}

/// Orchestrates tenant lifecycle operations. Exclusive owner of the
/// registry-versus-provisioner sequencing; nothing else may call the
/// provisioner.
pub struct TenantService<R: TenantRepository, P: SchemaProvisioner> {
    registry: Arc<R>,
    provisioner: Arc<P>,
}

impl<R: TenantRepository, P: SchemaProvisioner> TenantService<R, P> {
    pub fn new(registry: Arc<R>, provisioner: Arc<P>) -> Self {
        Self {
            registry,
            provisioner,
        }
    }

    pub async fn list_tenants(&self) -> Result<Vec<Tenant>, DomainError> {
        self.registry.list_all().await
    }

    pub async fn get_tenant(&self, id: i32) -> Result<Option<Tenant>, DomainError> {
        self.registry.find_by_id(id).await
    }

    /// Create a tenant: provision the isolated schema first, then insert the
    /// registry row pointing at it.
    pub async fn create_tenant(&self, input: NewTenantInput) -> Result<Tenant, DomainError> {
        input
            .validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;
        info!("Creating tenant: {}", input.nombre);

        let credencial_hash = PasswordService::hash(&input.contrasena)
            .map_err(|e| DomainError::PasswordHashError(e.to_string()))?;
        let estado = input.estado.unwrap_or(true);

        // The schema is the heavier, riskier step; it goes first because a
        // schema without a row can be compensated, a row pointing at nothing
        // cannot.
        let esquema = self
            .provisioner
            .provision(TenantSeed {
                nombre: input.nombre.clone(),
                email_contacto: input.email_contacto.clone(),
                telefono_contacto: input.telefono_contacto.clone(),
                credencial_hash: credencial_hash.clone(),
                estado,
            })
            .await?;

        let record = NewTenantRecord {
            nombre: input.nombre,
            nit: input.nit,
            email_contacto: input.email_contacto,
            telefono_contacto: input.telefono_contacto,
            direccion: input.direccion,
            estado,
            credencial_hash,
            esquema: esquema.clone(),
        };

        match self.registry.insert(record).await {
            Ok(tenant) => {
                info!("Tenant created: id={} esquema={}", tenant.id, esquema);
                Ok(tenant)
            }
            Err(insert_err) => {
                warn!(
                    "Registry insert failed after provisioning {}: {}",
                    esquema, insert_err
                );
                match self.provisioner.deprovision(esquema.clone()).await {
                    Ok(()) => Err(insert_err),
                    // Already gone counts as a clean compensation.
                    Err(DomainError::SchemaNotFound(_)) => Err(insert_err),
                    Err(cleanup_err) => {
                        error!(
                            "Orphaned schema {}: compensating deprovision failed: {} (original: {})",
                            esquema, cleanup_err, insert_err
                        );
                        Err(DomainError::PartialProvisioningFailure {
                            original: Box::new(insert_err),
                            cleanup: Box::new(cleanup_err),
                        })
                    }
                }
            }
        }
    }

    /// Update a tenant: schema-side fields first, then the registry row.
    ///
    /// The two writes are deliberately independent; a failure between them
    /// leaves the schema-side fields updated and the registry copy stale.
    pub async fn update_tenant(
        &self,
        id: i32,
        input: UpdateTenantInput,
    ) -> Result<Tenant, DomainError> {
        input.validate()?;

        let current = self
            .registry
            .find_by_id(id)
            .await?
            .ok_or(DomainError::TenantNotFound)?;
        // A registry row without a schema is not a tenant for update
        // purposes.
        let esquema = current
            .esquema
            .clone()
            .ok_or(DomainError::TenantNotFound)?;

        let credencial_hash = match &input.contrasena {
            Some(secret) => Some(
                PasswordService::hash(secret)
                    .map_err(|e| DomainError::PasswordHashError(e.to_string()))?,
            ),
            None => None,
        };

        let rename_to = match &input.esquema {
            Some(raw) => Some(SchemaHandle::parse(raw)?),
            None => None,
        };

        let cambios = SchemaUpdate {
            nombre: input
                .nombre
                .clone()
                .unwrap_or_else(|| current.nombre.clone()),
            email_contacto: input
                .email_contacto
                .clone()
                .unwrap_or_else(|| current.email_contacto.clone()),
            telefono_contacto: match &input.telefono_contacto {
                Some(value) => value.clone(),
                None => current.telefono_contacto.clone(),
            },
            credencial_hash,
            estado: input.estado.unwrap_or(current.estado),
            rename_to,
        };

        let efectivo = self.provisioner.update(esquema.clone(), cambios).await?;

        let mut patch = RegistryPatch {
            nombre: input.nombre,
            email_contacto: input.email_contacto,
            estado: input.estado,
            esquema: None,
            nit: input.nit,
            telefono_contacto: input.telefono_contacto,
            direccion: input.direccion,
        };
        if efectivo != esquema {
            patch.esquema = Some(efectivo);
        }
        if !patch.is_empty() {
            self.registry.update_fields(id, patch).await?;
        }

        self.registry
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::InternalError("tenant disappeared during update".into()))
    }

    /// Delete a tenant: tear the schema down first so a failure leaves the
    /// registry row in place and the operation can be retried.
    pub async fn delete_tenant(&self, id: i32) -> Result<(), DomainError> {
        let current = self
            .registry
            .find_by_id(id)
            .await?
            .ok_or(DomainError::TenantNotFound)?;
        let esquema = current
            .esquema
            .clone()
            .ok_or(DomainError::TenantNotFound)?;

        match self.provisioner.deprovision(esquema.clone()).await {
            Ok(()) => {}
            Err(DomainError::SchemaNotFound(name)) => {
                warn!(
                    "Schema {} already absent while deleting tenant {}",
                    name, id
                );
            }
            Err(e) => return Err(e),
        }

        let affected = self.registry.delete_by_id(id).await?;
        if affected == 0 {
            warn!("Tenant {} row already removed", id);
        }
        info!("Tenant deleted: id={} esquema={}", id, esquema);
        Ok(())
    }
}
