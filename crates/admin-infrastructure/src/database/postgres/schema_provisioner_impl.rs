// ============================================================================
// Admin Infrastructure - PostgreSQL Schema Provisioner
// File: crates/admin-infrastructure/src/database/postgres/schema_provisioner_impl.rs
// ============================================================================
//! Per-tenant schema provisioning: mints schema identifiers, creates and
//! drops the isolated schemas, and maintains the bootstrap record inside
//! each one.

use async_trait::async_trait;
use rand::Rng;
use sqlx::PgPool;
use tracing::{error, info};

use admin_core::domain::SchemaHandle;
use admin_core::error::DomainError;
use admin_core::repositories::{SchemaProvisioner, SchemaUpdate, TenantSeed};

// PostgreSQL condition codes observed on schema DDL.
const PG_INVALID_SCHEMA_NAME: &str = "3F000";
const PG_UNDEFINED_TABLE: &str = "42P01";
const PG_DUPLICATE_SCHEMA: &str = "42P06";

const MAX_MINT_ATTEMPTS: usize = 5;
const SLUG_MAX_LENGTH: usize = 20;
const SUFFIX_LENGTH: usize = 6;

pub struct PgSchemaProvisioner {
    pool: PgPool,
}

impl PgSchemaProvisioner {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn schema_exists(&self, name: &str) -> Result<bool, DomainError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = $1)",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error checking schema existence: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(exists)
    }

    /// Mint a fresh schema identifier derived from the tenant name plus a
    /// random suffix. Collisions with existing schemas retry a bounded
    /// number of times.
    async fn mint_handle(&self, nombre: &str) -> Result<SchemaHandle, DomainError> {
        let base = slugify(nombre);
        for _ in 0..MAX_MINT_ATTEMPTS {
            let candidate = format!("tenant_{}_{}", base, random_suffix());
            let handle = SchemaHandle::parse(&candidate)?;
            if !self.schema_exists(handle.as_str()).await? {
                return Ok(handle);
            }
        }
        Err(DomainError::UnableToGenerateUniqueName)
    }
}

fn pg_error_code(e: &sqlx::Error) -> Option<String> {
    match e {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        _ => None,
    }
}

/// Reduce a display name to an identifier fragment: lowercase ASCII
/// alphanumerics, everything else collapsed to underscores.
fn slugify(nombre: &str) -> String {
    let mut slug = String::new();
    let mut last_was_sep = true;
    for c in nombre.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
        if slug.len() >= SLUG_MAX_LENGTH {
            break;
        }
    }
    let trimmed = slug.trim_matches('_');
    if trimmed.is_empty() {
        "org".to_string()
    } else {
        trimmed.to_string()
    }
}

fn random_suffix() -> String {
    rand::rng()
        .sample_iter(rand::distr::Alphanumeric)
        .map(char::from)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .take(SUFFIX_LENGTH)
        .collect()
}

#[async_trait]
impl SchemaProvisioner for PgSchemaProvisioner {
    async fn provision(&self, seed: TenantSeed) -> Result<SchemaHandle, DomainError> {
        let esquema = self.mint_handle(&seed.nombre).await?;
        info!("Provisioning schema {}", esquema);

        // Schema, bootstrap table, and bootstrap row ride a single
        // transaction; a failure at any point rolls all of it back.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::SchemaProvisioningError(e.to_string()))?;

        sqlx::query(&format!(r#"CREATE SCHEMA "{}""#, esquema.as_str()))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("Failed to create schema {}: {}", esquema, e);
                DomainError::SchemaProvisioningError(e.to_string())
            })?;

        sqlx::query(&format!(
            r#"
            CREATE TABLE "{}".configuracion (
                id                SERIAL PRIMARY KEY,
                nombre            TEXT NOT NULL,
                email_contacto    TEXT NOT NULL,
                telefono_contacto TEXT,
                credencial_hash   TEXT NOT NULL,
                estado            BOOLEAN NOT NULL DEFAULT TRUE,
                fecha_creacion    TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
            esquema.as_str()
        ))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to create bootstrap table in {}: {}", esquema, e);
            DomainError::SchemaProvisioningError(e.to_string())
        })?;

        sqlx::query(&format!(
            r#"
            INSERT INTO "{}".configuracion
                (nombre, email_contacto, telefono_contacto, credencial_hash, estado)
            VALUES ($1, $2, $3, $4, $5)
            "#,
            esquema.as_str()
        ))
        .bind(&seed.nombre)
        .bind(&seed.email_contacto)
        .bind(&seed.telefono_contacto)
        .bind(&seed.credencial_hash)
        .bind(seed.estado)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to seed bootstrap record in {}: {}", esquema, e);
            DomainError::SchemaProvisioningError(e.to_string())
        })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::SchemaProvisioningError(e.to_string()))?;

        info!("Schema provisioned: {}", esquema);
        Ok(esquema)
    }

    async fn update(
        &self,
        esquema: SchemaHandle,
        cambios: SchemaUpdate,
    ) -> Result<SchemaHandle, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        sqlx::query(&format!(
            r#"
            UPDATE "{}".configuracion
               SET nombre = $1,
                   email_contacto = $2,
                   telefono_contacto = $3,
                   estado = $4,
                   credencial_hash = COALESCE($5, credencial_hash)
            "#,
            esquema.as_str()
        ))
        .bind(&cambios.nombre)
        .bind(&cambios.email_contacto)
        .bind(&cambios.telefono_contacto)
        .bind(cambios.estado)
        .bind(&cambios.credencial_hash)
        .execute(&mut *tx)
        .await
        .map_err(|e| match pg_error_code(&e).as_deref() {
            Some(PG_INVALID_SCHEMA_NAME) | Some(PG_UNDEFINED_TABLE) => {
                DomainError::SchemaNotFound(esquema.to_string())
            }
            _ => {
                error!("Failed to update record in {}: {}", esquema, e);
                DomainError::DatabaseError(e.to_string())
            }
        })?;

        let efectivo = match &cambios.rename_to {
            Some(nuevo) if nuevo != &esquema => {
                sqlx::query(&format!(
                    r#"ALTER SCHEMA "{}" RENAME TO "{}""#,
                    esquema.as_str(),
                    nuevo.as_str()
                ))
                .execute(&mut *tx)
                .await
                .map_err(|e| match pg_error_code(&e).as_deref() {
                    Some(PG_DUPLICATE_SCHEMA) => {
                        DomainError::SchemaRenameError(format!("schema {nuevo} already exists"))
                    }
                    Some(PG_INVALID_SCHEMA_NAME) => {
                        DomainError::SchemaNotFound(esquema.to_string())
                    }
                    _ => {
                        error!("Failed to rename schema {} to {}: {}", esquema, nuevo, e);
                        DomainError::DatabaseError(e.to_string())
                    }
                })?;
                info!("Schema {} renamed to {}", esquema, nuevo);
                nuevo.clone()
            }
            _ => esquema.clone(),
        };

        tx.commit()
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(efectivo)
    }

    async fn deprovision(&self, esquema: SchemaHandle) -> Result<(), DomainError> {
        info!("Dropping schema {}", esquema);

        sqlx::query(&format!(r#"DROP SCHEMA "{}" CASCADE"#, esquema.as_str()))
            .execute(&self.pool)
            .await
            .map_err(|e| match pg_error_code(&e).as_deref() {
                Some(PG_INVALID_SCHEMA_NAME) => DomainError::SchemaNotFound(esquema.to_string()),
                _ => {
                    error!("Failed to drop schema {}: {}", esquema, e);
                    DomainError::SchemaProvisioningError(e.to_string())
                }
            })?;

        info!("Schema dropped: {}", esquema);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_collapses_separators() {
        assert_eq!(slugify("Acme S.A.S."), "acme_s_a_s");
        assert_eq!(slugify("Zebra  Colombia"), "zebra_colombia");
    }

    #[test]
    fn slugify_drops_non_ascii() {
        assert_eq!(slugify("Compañía"), "compa_a");
    }

    #[test]
    fn slugify_never_returns_empty() {
        assert_eq!(slugify("¡¡¡"), "org");
        assert_eq!(slugify(""), "org");
    }

    #[test]
    fn slugify_bounds_length() {
        let slug = slugify("una razón social larguísima de verdad");
        assert!(slug.len() <= SLUG_MAX_LENGTH);
    }

    #[test]
    fn random_suffix_is_identifier_safe() {
        for _ in 0..20 {
            let suffix = random_suffix();
            assert_eq!(suffix.len(), SUFFIX_LENGTH);
            assert!(suffix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn minted_candidates_parse_as_handles() {
        let candidate = format!("tenant_{}_{}", slugify("Acme S.A.S."), random_suffix());
        assert!(SchemaHandle::parse(&candidate).is_ok());
    }
}
