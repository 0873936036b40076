//! Admin user entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform operator role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rol {
    Admin,
    Soporte,
}

impl Rol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rol::Admin => "admin",
            Rol::Soporte => "soporte",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Rol::Admin),
            "soporte" => Some(Rol::Soporte),
            _ => None,
        }
    }
}

impl Default for Rol {
    fn default() -> Self {
        Rol::Soporte
    }
}

/// Platform operator account. Lives in the shared admin-user table; no
/// per-entity schema is involved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: i32,
    pub nombre: String,
    pub correo: String,
    pub telefono: Option<String>,
    pub rol: Rol,
    pub activo: bool,
    pub ultimo_ingreso: Option<DateTime<Utc>>,
    pub fecha_creacion: DateTime<Utc>,
}

/// Full row content for insert and for whole-row update. The storage update
/// is whole-row even though the service API accepts partial input.
#[derive(Debug, Clone)]
pub struct AdminUserRecord {
    pub nombre: String,
    pub correo: String,
    pub telefono: Option<String>,
    pub rol: Rol,
    pub activo: bool,
    pub credencial_hash: String,
}
