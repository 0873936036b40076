// ============================================================================
// Admin Core - Admin User Service
// File: crates/admin-core/src/services/admin_user_service.rs
// ============================================================================
//! Admin user management and authentication over the shared admin-user table.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, info, warn};
use validator::{Validate, ValidateEmail};

use admin_security::password::PasswordService;
use admin_shared::constants::{MIN_PASSWORD_LENGTH, PHONE_MAX_LENGTH, PHONE_MIN_LENGTH};
use admin_shared::utils::mask_email;

use crate::domain::{AdminUser, AdminUserRecord, Rol};
use crate::error::DomainError;
use crate::repositories::AdminUserRepository;

/// Creation payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAdminUserInput {
    #[validate(length(min = 1, message = "El nombre es obligatorio"))]
    pub nombre: String,

    #[validate(email(message = "Correo inválido"))]
    pub correo: String,

    #[validate(length(min = 3, max = 50))]
    pub telefono: Option<String>,

    pub rol: Rol,

    #[serde(rename = "contraseña")]
    #[validate(length(min = 4, message = "La contraseña debe tener al menos 4 caracteres"))]
    pub contrasena: String,

    pub activo: Option<bool>,
}

/// Update payload. `telefono` distinguishes "leave alone" from "set to NULL";
/// the remaining fields are applied when present.
#[derive(Debug, Clone, Default)]
pub struct UpdateAdminUserInput {
    pub nombre: Option<String>,
    pub correo: Option<String>,
    pub telefono: Option<Option<String>>,
    pub rol: Option<Rol>,
    pub activo: Option<bool>,
    pub contrasena: Option<String>,
}

impl UpdateAdminUserInput {
    fn validate(&self) -> Result<(), DomainError> {
        if let Some(nombre) = &self.nombre {
            if nombre.is_empty() {
                return Err(DomainError::ValidationError(
                    "El nombre es obligatorio".into(),
                ));
            }
        }
        if let Some(correo) = &self.correo {
            if !correo.validate_email() {
                return Err(DomainError::ValidationError("Correo inválido".into()));
            }
        }
        if let Some(Some(telefono)) = &self.telefono {
            let len = telefono.chars().count();
            if len < PHONE_MIN_LENGTH || len > PHONE_MAX_LENGTH {
                return Err(DomainError::ValidationError(format!(
                    "telefono debe tener entre {PHONE_MIN_LENGTH} y {PHONE_MAX_LENGTH} caracteres"
                )));
            }
        }
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

/// CRUD plus authentication for platform operators. No schema coordination
/// is involved here.
pub struct AdminUserService<R: AdminUserRepository> {
    repo: Arc<R>,
}

impl<R: AdminUserRepository> AdminUserService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list_users(&self) -> Result<Vec<AdminUser>, DomainError> {
        self.repo.list_all().await
    }

    pub async fn create_user(&self, input: NewAdminUserInput) -> Result<AdminUser, DomainError> {
        input
            .validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;
        info!("Creating admin user: {}", mask_email(&input.correo));

        let credencial_hash = PasswordService::hash(&input.contrasena)
            .map_err(|e| DomainError::PasswordHashError(e.to_string()))?;

        self.repo
            .insert(AdminUserRecord {
                nombre: input.nombre,
                correo: input.correo,
                telefono: input.telefono,
                rol: input.rol,
                activo: input.activo.unwrap_or(true),
                credencial_hash,
            })
            .await
    }

    /// Full-row rewrite: absent input fields carry the stored values forward,
    /// including the credential hash when no new secret is supplied.
    pub async fn update_user(
        &self,
        id: i32,
        input: UpdateAdminUserInput,
    ) -> Result<AdminUser, DomainError> {
        input.validate()?;

        let (existing, existing_hash) = self
            .repo
            .find_by_id_with_hash(id)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        let credencial_hash = match &input.contrasena {
            Some(secret) => PasswordService::hash(secret)
                .map_err(|e| DomainError::PasswordHashError(e.to_string()))?,
            None => existing_hash,
        };

        let telefono = match input.telefono {
            Some(value) => value,
            None => existing.telefono,
        };

        self.repo
            .update_full(
                id,
                AdminUserRecord {
                    nombre: input.nombre.unwrap_or(existing.nombre),
                    correo: input.correo.unwrap_or(existing.correo),
                    telefono,
                    rol: input.rol.unwrap_or(existing.rol),
                    activo: input.activo.unwrap_or(existing.activo),
                    credencial_hash,
                },
            )
            .await
    }

    pub async fn delete_user(&self, id: i32) -> Result<(), DomainError> {
        self.repo.delete_by_id(id).await
    }

    /// Authenticate by correo and secret.
    ///
    /// Unknown correo, failed verification and an inactive account all
    /// collapse into `Ok(None)`; callers cannot tell the three apart.
    pub async fn authenticate(
        &self,
        correo: &str,
        contrasena: &str,
    ) -> Result<Option<AdminUser>, DomainError> {
        if !correo.validate_email() {
            return Err(DomainError::ValidationError("Correo inválido".into()));
        }
        if contrasena.is_empty() {
            return Err(DomainError::ValidationError(
                "La contraseña es obligatoria".into(),
            ));
        }
        info!("Login attempt for {}", mask_email(correo));

        let Some((user, stored_hash)) = self
            .repo
            .find_by_correo_with_hash(correo.to_string())
            .await?
        else {
            warn!("Login failed for {}", mask_email(correo));
            return Ok(None);
        };

        let valid = match PasswordService::verify(contrasena, &stored_hash) {
            Ok(valid) => valid,
            Err(e) => {
                warn!("Credential verification error for user {}: {}", user.id, e);
                false
            }
        };
        if !valid {
            warn!("Login failed for {}", mask_email(correo));
            return Ok(None);
        }

        if !user.activo {
            warn!("Login failed for {}", mask_email(correo));
            return Ok(None);
        }

        if let Err(e) = self.repo.touch_ultimo_ingreso(user.id).await {
            // A login is still a login; the timestamp is best-effort.
            error!("Failed to record last login for user {}: {}", user.id, e);
        }

        info!("Login successful for {}", mask_email(correo));
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::repositories::admin_user_repository::MockAdminUserRepository;

    use super::*;

    #[derive(Default)]
    struct RepoState {
        rows: Vec<(AdminUser, String)>,
        next_id: i32,
        touched: Vec<i32>,
    }

    #[derive(Default)]
    struct FakeRepo {
        state: Mutex<RepoState>,
    }

    impl FakeRepo {
        fn touched(&self) -> Vec<i32> {
            self.state.lock().unwrap().touched.clone()
        }

        fn stored_hash(&self, id: i32) -> Option<String> {
            let state = self.state.lock().unwrap();
            state
                .rows
                .iter()
                .find(|(u, _)| u.id == id)
                .map(|(_, h)| h.clone())
        }
    }

    #[async_trait]
    impl AdminUserRepository for FakeRepo {
        async fn insert(&self, record: AdminUserRecord) -> Result<AdminUser, DomainError> {
            let mut state = self.state.lock().unwrap();
            if state.rows.iter().any(|(u, _)| u.correo == record.correo) {
                return Err(DomainError::DuplicateUserEmail(record.correo));
            }
            state.next_id += 1;
            let user = AdminUser {
                id: state.next_id,
                nombre: record.nombre,
                correo: record.correo,
                telefono: record.telefono,
                rol: record.rol,
                activo: record.activo,
                ultimo_ingreso: None,
                fecha_creacion: Utc::now(),
            };
            state.rows.push((user.clone(), record.credencial_hash));
            Ok(user)
        }

        async fn list_all(&self) -> Result<Vec<AdminUser>, DomainError> {
            let state = self.state.lock().unwrap();
            let mut all: Vec<AdminUser> = state.rows.iter().map(|(u, _)| u.clone()).collect();
            all.sort_by(|a, b| b.id.cmp(&a.id));
            Ok(all)
        }

        async fn find_by_id_with_hash(
            &self,
            id: i32,
        ) -> Result<Option<(AdminUser, String)>, DomainError> {
            let state = self.state.lock().unwrap();
            Ok(state.rows.iter().find(|(u, _)| u.id == id).cloned())
        }

        async fn find_by_correo_with_hash(
            &self,
            correo: String,
        ) -> Result<Option<(AdminUser, String)>, DomainError> {
            let state = self.state.lock().unwrap();
            Ok(state.rows.iter().find(|(u, _)| u.correo == correo).cloned())
        }

        async fn update_full(
            &self,
            id: i32,
            record: AdminUserRecord,
        ) -> Result<AdminUser, DomainError> {
            let mut state = self.state.lock().unwrap();
            let row = state
                .rows
                .iter_mut()
                .find(|(u, _)| u.id == id)
                .ok_or(DomainError::UserNotFound)?;
            row.0.nombre = record.nombre;
            row.0.correo = record.correo;
            row.0.telefono = record.telefono;
            row.0.rol = record.rol;
            row.0.activo = record.activo;
            row.1 = record.credencial_hash;
            Ok(row.0.clone())
        }

        async fn delete_by_id(&self, id: i32) -> Result<(), DomainError> {
            let mut state = self.state.lock().unwrap();
            state.rows.retain(|(u, _)| u.id != id);
            Ok(())
        }

        async fn touch_ultimo_ingreso(&self, id: i32) -> Result<(), DomainError> {
            let mut state = self.state.lock().unwrap();
            state.touched.push(id);
            if let Some(row) = state.rows.iter_mut().find(|(u, _)| u.id == id) {
                row.0.ultimo_ingreso = Some(Utc::now());
            }
            Ok(())
        }
    }

    fn soporte_input() -> NewAdminUserInput {
        NewAdminUserInput {
            nombre: "Laura Gómez".into(),
            correo: "laura@zebra.co".into(),
            telefono: Some("3109876543".into()),
            rol: Rol::Soporte,
            contrasena: "pass123".into(),
            activo: None,
        }
    }

    fn service() -> (AdminUserService<FakeRepo>, Arc<FakeRepo>) {
        let repo = Arc::new(FakeRepo::default());
        (AdminUserService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn create_hashes_the_secret() {
        let (service, repo) = service();
        let user = service.create_user(soporte_input()).await.unwrap();

        assert!(user.activo);
        let hash = repo.stored_hash(user.id).unwrap();
        assert_ne!(hash, "pass123");
        assert!(PasswordService::verify("pass123", &hash).unwrap());
    }

    #[tokio::test]
    async fn create_rejects_duplicate_correo() {
        let (service, _repo) = service();
        service.create_user(soporte_input()).await.unwrap();

        let mut second = soporte_input();
        second.nombre = "Otra Persona".into();
        let err = service.create_user(second).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateUserEmail(_)));
    }

    #[tokio::test]
    async fn update_without_secret_retains_hash() {
        let (service, repo) = service();
        let user = service.create_user(soporte_input()).await.unwrap();
        let before = repo.stored_hash(user.id).unwrap();

        let updated = service
            .update_user(
                user.id,
                UpdateAdminUserInput {
                    nombre: Some("Laura G.".into()),
                    rol: Some(Rol::Admin),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.nombre, "Laura G.");
        assert_eq!(updated.rol, Rol::Admin);
        assert_eq!(repo.stored_hash(user.id).unwrap(), before);
    }

    #[tokio::test]
    async fn update_clears_telefono_when_asked() {
        let (service, _repo) = service();
        let user = service.create_user(soporte_input()).await.unwrap();

        let updated = service
            .update_user(
                user.id,
                UpdateAdminUserInput {
                    telefono: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.telefono, None);
        // Absent fields carried forward.
        assert_eq!(updated.nombre, "Laura Gómez");
    }

    #[tokio::test]
    async fn update_missing_user_fails() {
        let (service, _repo) = service();
        let err = service
            .update_user(42, UpdateAdminUserInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound));
    }

    #[tokio::test]
    async fn authenticate_collapses_all_failure_modes() {
        let (service, _repo) = service();
        let user = service.create_user(soporte_input()).await.unwrap();

        // Unknown correo.
        let missing = service
            .authenticate("nadie@zebra.co", "pass123")
            .await
            .unwrap();
        assert!(missing.is_none());

        // Wrong secret.
        let wrong = service
            .authenticate("laura@zebra.co", "clave-mala")
            .await
            .unwrap();
        assert!(wrong.is_none());

        // Inactive account with the right secret.
        service
            .update_user(
                user.id,
                UpdateAdminUserInput {
                    activo: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let inactive = service
            .authenticate("laura@zebra.co", "pass123")
            .await
            .unwrap();
        assert!(inactive.is_none());
    }

    #[tokio::test]
    async fn authenticate_success_touches_last_login() {
        let (service, repo) = service();
        let user = service.create_user(soporte_input()).await.unwrap();

        let logged_in = service
            .authenticate("laura@zebra.co", "pass123")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(logged_in.id, user.id);
        assert_eq!(repo.touched(), vec![user.id]);
    }

    #[tokio::test]
    async fn authenticate_survives_touch_failure() {
        let mut repo = MockAdminUserRepository::new();
        let stored = PasswordService::hash("pass123").unwrap();
        repo.expect_find_by_correo_with_hash().returning(move |correo| {
            Ok(Some((
                AdminUser {
                    id: 1,
                    nombre: "Laura Gómez".into(),
                    correo,
                    telefono: None,
                    rol: Rol::Soporte,
                    activo: true,
                    ultimo_ingreso: None,
                    fecha_creacion: Utc::now(),
                },
                stored.clone(),
            )))
        });
        repo.expect_touch_ultimo_ingreso()
            .returning(|_| Err(DomainError::DatabaseError("connection reset".into())));

        let service = AdminUserService::new(Arc::new(repo));
        let user = service
            .authenticate("laura@zebra.co", "pass123")
            .await
            .unwrap();
        assert!(user.is_some());
    }

    #[tokio::test]
    async fn authenticate_rejects_malformed_correo() {
        let (service, _repo) = service();
        let err = service
            .authenticate("no-es-un-correo", "pass123")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let (service, _repo) = service();
        let user = service.create_user(soporte_input()).await.unwrap();
        service.delete_user(user.id).await.unwrap();
        assert!(service.list_users().await.unwrap().is_empty());
    }
}
