// ============================================================================
// Admin Infrastructure - PostgreSQL Tenant Repository
// File: crates/admin-infrastructure/src/database/postgres/tenant_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};

use admin_core::domain::{NewTenantRecord, RegistryPatch, SchemaHandle, Tenant};
use admin_core::error::DomainError;
use admin_core::repositories::TenantRepository;

pub struct PgTenantRepository {
    pool: PgPool,
}

impl PgTenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct TenantRow {
    pub id: i32,
    pub nombre: String,
    pub nit: Option<String>,
    pub email_contacto: String,
    pub telefono_contacto: Option<String>,
    pub direccion: Option<String>,
    pub estado: bool,
    pub ultimo_ingreso: Option<DateTime<Utc>>,
    pub fecha_creacion: DateTime<Utc>,
    pub esquema: Option<String>,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Tenant {
            id: row.id,
            nombre: row.nombre,
            nit: row.nit,
            email_contacto: row.email_contacto,
            telefono_contacto: row.telefono_contacto,
            direccion: row.direccion,
            estado: row.estado,
            ultimo_ingreso: row.ultimo_ingreso,
            fecha_creacion: row.fecha_creacion,
            // A malformed identifier is treated the same as a missing one:
            // the row is not a tenant for update/delete purposes.
            esquema: row.esquema.and_then(|s| SchemaHandle::parse(&s).ok()),
        }
    }
}

const TENANT_COLUMNS: &str = "id, nombre, nit, email_contacto, telefono_contacto, direccion, \
     estado, ultimo_ingreso, fecha_creacion, esquema";

fn map_insert_error(e: sqlx::Error, email_contacto: &str) -> DomainError {
    error!("Database error writing tenant: {}", e);
    let msg = e.to_string();
    if msg.contains("unique") || msg.contains("duplicate") {
        DomainError::DuplicateTenant(email_contacto.to_string())
    } else {
        DomainError::DatabaseError(msg)
    }
}

#[async_trait]
impl TenantRepository for PgTenantRepository {
    async fn insert(&self, record: NewTenantRecord) -> Result<Tenant, DomainError> {
        info!("Inserting tenant row: {}", record.nombre);

        let row: TenantRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO admin_platform.tenants
                (nombre, nit, email_contacto, telefono_contacto, direccion,
                 estado, credencial_hash, esquema)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TENANT_COLUMNS}
            "#
        ))
        .bind(&record.nombre)
        .bind(&record.nit)
        .bind(&record.email_contacto)
        .bind(&record.telefono_contacto)
        .bind(&record.direccion)
        .bind(record.estado)
        .bind(&record.credencial_hash)
        .bind(record.esquema.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, &record.email_contacto))?;

        info!("Tenant row inserted: {}", row.id);
        Ok(row.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Tenant>, DomainError> {
        let row: Option<TenantRow> = sqlx::query_as(&format!(
            r#"
            SELECT {TENANT_COLUMNS}
            FROM admin_platform.tenants
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding tenant by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_all(&self) -> Result<Vec<Tenant>, DomainError> {
        let rows: Vec<TenantRow> = sqlx::query_as(&format!(
            r#"
            SELECT {TENANT_COLUMNS}
            FROM admin_platform.tenants
            ORDER BY id DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing tenants: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn update_fields(&self, id: i32, patch: RegistryPatch) -> Result<Tenant, DomainError> {
        let row: Option<TenantRow> = sqlx::query_as(&format!(
            r#"
            UPDATE admin_platform.tenants
               SET nombre            = CASE WHEN $2  THEN $3  ELSE nombre END,
                   email_contacto    = CASE WHEN $4  THEN $5  ELSE email_contacto END,
                   estado            = CASE WHEN $6  THEN $7  ELSE estado END,
                   esquema           = CASE WHEN $8  THEN $9  ELSE esquema END,
                   nit               = CASE WHEN $10 THEN $11 ELSE nit END,
                   telefono_contacto = CASE WHEN $12 THEN $13 ELSE telefono_contacto END,
                   direccion         = CASE WHEN $14 THEN $15 ELSE direccion END
             WHERE id = $1
            RETURNING {TENANT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.nombre.is_some())
        .bind(&patch.nombre)
        .bind(patch.email_contacto.is_some())
        .bind(&patch.email_contacto)
        .bind(patch.estado.is_some())
        .bind(patch.estado)
        .bind(patch.esquema.is_some())
        .bind(patch.esquema.as_ref().map(|s| s.as_str().to_string()))
        .bind(patch.nit.is_some())
        .bind(patch.nit.clone().flatten())
        .bind(patch.telefono_contacto.is_some())
        .bind(patch.telefono_contacto.clone().flatten())
        .bind(patch.direccion.is_some())
        .bind(patch.direccion.clone().flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, patch.email_contacto.as_deref().unwrap_or("")))?;

        row.map(|r| r.into()).ok_or(DomainError::TenantNotFound)
    }

    async fn delete_by_id(&self, id: i32) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM admin_platform.tenants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error deleting tenant row: {}", e);
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(result.rows_affected())
    }
}
