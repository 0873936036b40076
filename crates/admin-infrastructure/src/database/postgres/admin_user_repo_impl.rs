// ============================================================================
// Admin Infrastructure - PostgreSQL Admin User Repository
// File: crates/admin-infrastructure/src/database/postgres/admin_user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};

use admin_core::domain::{AdminUser, AdminUserRecord, Rol};
use admin_core::error::DomainError;
use admin_core::repositories::AdminUserRepository;

pub struct PgAdminUserRepository {
    pool: PgPool,
}

impl PgAdminUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct AdminUserRow {
    pub id: i32,
    pub nombre: String,
    pub correo: String,
    pub telefono: Option<String>,
    pub rol: String,
    pub activo: bool,
    pub ultimo_ingreso: Option<DateTime<Utc>>,
    pub fecha_creacion: DateTime<Utc>,
}

// Row type carrying the stored credential hash next to the user fields.
#[derive(Debug, FromRow)]
struct AdminUserWithHashRow {
    #[sqlx(flatten)]
    user: AdminUserRow,
    credencial_hash: String,
}

impl From<AdminUserRow> for AdminUser {
    fn from(row: AdminUserRow) -> Self {
        AdminUser {
            id: row.id,
            nombre: row.nombre,
            correo: row.correo,
            telefono: row.telefono,
            rol: Rol::from_str(&row.rol).unwrap_or_default(),
            activo: row.activo,
            ultimo_ingreso: row.ultimo_ingreso,
            fecha_creacion: row.fecha_creacion,
        }
    }
}

const USER_COLUMNS: &str =
    "id, nombre, correo, telefono, rol, activo, ultimo_ingreso, fecha_creacion";

fn map_write_error(e: sqlx::Error, correo: &str) -> DomainError {
    error!("Database error writing admin user: {}", e);
    let msg = e.to_string();
    if msg.contains("unique") || msg.contains("duplicate") {
        DomainError::DuplicateUserEmail(correo.to_string())
    } else {
        DomainError::DatabaseError(msg)
    }
}

#[async_trait]
impl AdminUserRepository for PgAdminUserRepository {
    async fn insert(&self, record: AdminUserRecord) -> Result<AdminUser, DomainError> {
        let row: AdminUserRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO admin_platform.admin_users
                (nombre, correo, telefono, rol, activo, credencial_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&record.nombre)
        .bind(&record.correo)
        .bind(&record.telefono)
        .bind(record.rol.as_str())
        .bind(record.activo)
        .bind(&record.credencial_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &record.correo))?;

        info!("Admin user created: {}", row.id);
        Ok(row.into())
    }

    async fn list_all(&self) -> Result<Vec<AdminUser>, DomainError> {
        let rows: Vec<AdminUserRow> = sqlx::query_as(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM admin_platform.admin_users
            ORDER BY id DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing admin users: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn find_by_id_with_hash(
        &self,
        id: i32,
    ) -> Result<Option<(AdminUser, String)>, DomainError> {
        let row: Option<AdminUserWithHashRow> = sqlx::query_as(&format!(
            r#"
            SELECT {USER_COLUMNS}, credencial_hash
            FROM admin_platform.admin_users
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding admin user by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| (r.user.into(), r.credencial_hash)))
    }

    async fn find_by_correo_with_hash(
        &self,
        correo: String,
    ) -> Result<Option<(AdminUser, String)>, DomainError> {
        let row: Option<AdminUserWithHashRow> = sqlx::query_as(&format!(
            r#"
            SELECT {USER_COLUMNS}, credencial_hash
            FROM admin_platform.admin_users
            WHERE correo = $1
            "#
        ))
        .bind(&correo)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding admin user by correo: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| (r.user.into(), r.credencial_hash)))
    }

    async fn update_full(
        &self,
        id: i32,
        record: AdminUserRecord,
    ) -> Result<AdminUser, DomainError> {
        let row: Option<AdminUserRow> = sqlx::query_as(&format!(
            r#"
            UPDATE admin_platform.admin_users
               SET nombre = $2,
                   correo = $3,
                   telefono = $4,
                   rol = $5,
                   activo = $6,
                   credencial_hash = $7
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&record.nombre)
        .bind(&record.correo)
        .bind(&record.telefono)
        .bind(record.rol.as_str())
        .bind(record.activo)
        .bind(&record.credencial_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &record.correo))?;

        row.map(|r| r.into()).ok_or(DomainError::UserNotFound)
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM admin_platform.admin_users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error deleting admin user: {}", e);
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(())
    }

    async fn touch_ultimo_ingreso(&self, id: i32) -> Result<(), DomainError> {
        sqlx::query("UPDATE admin_platform.admin_users SET ultimo_ingreso = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error recording last login: {}", e);
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(())
    }
}
