//! Domain errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Tenant not found")]
    TenantNotFound,

    #[error("Admin user not found")]
    UserNotFound,

    #[error("Tenant already exists: {0}")]
    DuplicateTenant(String),

    #[error("Admin user email already exists: {0}")]
    DuplicateUserEmail(String),

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Schema provisioning error: {0}")]
    SchemaProvisioningError(String),

    #[error("Schema rename error: {0}")]
    SchemaRenameError(String),

    #[error("Schema not found: {0}")]
    SchemaNotFound(String),

    #[error("Unable to generate unique schema name")]
    UnableToGenerateUniqueName,

    #[error("Partial provisioning failure: {original} (cleanup failed: {cleanup})")]
    PartialProvisioningFailure {
        original: Box<DomainError>,
        cleanup: Box<DomainError>,
    },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// HTTP-style status expected by outward-facing callers.
    pub fn status_code(&self) -> u16 {
        match self {
            DomainError::ValidationError(_) => 400,
            DomainError::TenantNotFound => 404,
            _ => 500,
        }
    }

    /// Generic localized message shown to end users. The specific error kind
    /// stays in logs for operators.
    pub fn public_message(&self) -> &'static str {
        match self {
            DomainError::ValidationError(_) => "Datos inválidos",
            DomainError::TenantNotFound => "Tenant no encontrado",
            DomainError::UserNotFound => "Usuario no encontrado",
            DomainError::DuplicateTenant(_) => "El tenant ya existe con esos datos",
            DomainError::DuplicateUserEmail(_) => "Ya existe un usuario con ese correo",
            _ => "Error interno del servidor",
        }
    }
}
