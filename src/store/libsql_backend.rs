//! libSQL backend — async `Database` trait implementation.
//!
//! Supports local file and in-memory databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::onboarding::model::{OnboardingDraft, ProfileSection, Role, RoleFormData, User};
use crate::store::migrations;
use crate::store::traits::Database;

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        Ok(backend)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Parse an RFC 3339 or SQLite datetime string into DateTime<Utc>.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return ndt.and_utc();
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return ndt.and_utc();
    }
    DateTime::<Utc>::MIN_UTC
}

fn parse_uuid(s: &str, op: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(s).map_err(|e| DatabaseError::Serialization(format!("{op}: bad id {s:?}: {e}")))
}

fn parse_role(s: &str, op: &str) -> Result<Role, DatabaseError> {
    s.parse::<Role>()
        .map_err(|e| DatabaseError::Serialization(format!("{op}: {e}")))
}

/// Map an insert failure, surfacing uniqueness violations as `Constraint`.
fn insert_error(op: &str, e: libsql::Error) -> DatabaseError {
    let message = e.to_string();
    if message.contains("UNIQUE constraint failed") {
        DatabaseError::Constraint(format!("{op}: {message}"))
    } else {
        DatabaseError::Query(format!("{op}: {message}"))
    }
}

const USER_COLUMNS: &str = "id, email, role, onboarded, created_at, updated_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    let get_err = |e: libsql::Error| DatabaseError::Query(format!("user row parse: {e}"));

    let id_str: String = row.get(0).map_err(get_err)?;
    let email: String = row.get(1).map_err(get_err)?;
    let role_str = match row.get_value(2).map_err(get_err)? {
        libsql::Value::Null => None,
        libsql::Value::Text(s) => Some(s),
        other => {
            return Err(DatabaseError::Serialization(format!(
                "user row: role is not text: {other:?}"
            )));
        }
    };
    let onboarded: i64 = row.get(3).map_err(get_err)?;
    let created_str: String = row.get(4).map_err(get_err)?;
    let updated_str: String = row.get(5).map_err(get_err)?;

    let role = match role_str {
        Some(s) => Some(parse_role(&s, "user row")?),
        None => None,
    };

    Ok(User {
        id: parse_uuid(&id_str, "user row")?,
        email,
        role,
        onboarded: onboarded != 0,
        created_at: parse_datetime(&created_str),
        updated_at: parse_datetime(&updated_str),
    })
}

// ── Trait implementation ────────────────────────────────────────────

#[async_trait]
impl Database for LibSqlBackend {
    async fn init_schema(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    // ── Users ───────────────────────────────────────────────────────

    async fn create_user(&self, user: &User) -> Result<(), DatabaseError> {
        let role = match user.role {
            Some(role) => libsql::Value::Text(role.to_string()),
            None => libsql::Value::Null,
        };
        self.conn()
            .execute(
                &format!("INSERT INTO users ({USER_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                params![
                    user.id.to_string(),
                    user.email.clone(),
                    role,
                    user.onboarded as i64,
                    user.created_at.to_rfc3339(),
                    user.updated_at.to_rfc3339(),
                ],
            )
            .await
            .map_err(|e| insert_error("create_user", e))?;

        debug!(user_id = %user.id, "User inserted into DB");
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_user: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_user(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_user: {e}"))),
        }
    }

    async fn set_user_role(&self, id: Uuid, role: Role) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let count = self
            .conn()
            .execute(
                "UPDATE users SET role = ?1, updated_at = ?2 WHERE id = ?3",
                params![role.to_string(), now, id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("set_user_role: {e}")))?;

        if count == 0 {
            return Err(DatabaseError::NotFound {
                entity: "user".to_string(),
                id: id.to_string(),
            });
        }
        debug!(user_id = %id, role = %role, "User role updated in DB");
        Ok(())
    }

    async fn set_onboarded(&self, id: Uuid, onboarded: bool) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let count = self
            .conn()
            .execute(
                "UPDATE users SET onboarded = ?1, updated_at = ?2 WHERE id = ?3",
                params![onboarded as i64, now, id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("set_onboarded: {e}")))?;

        if count == 0 {
            return Err(DatabaseError::NotFound {
                entity: "user".to_string(),
                id: id.to_string(),
            });
        }
        debug!(user_id = %id, onboarded, "User onboarded flag updated in DB");
        Ok(())
    }

    // ── Drafts ──────────────────────────────────────────────────────

    async fn save_draft(
        &self,
        user_id: Uuid,
        current_step: usize,
        form_data: &RoleFormData,
    ) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let form_json = serde_json::to_string(form_data)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;

        self.conn()
            .execute(
                "INSERT INTO onboarding_drafts (user_id, role, current_step, form_data, last_updated)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (user_id) DO UPDATE SET
                    role = ?2, current_step = ?3, form_data = ?4, last_updated = ?5",
                params![
                    user_id.to_string(),
                    form_data.role().to_string(),
                    current_step as i64,
                    form_json,
                    now,
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("save_draft: {e}")))?;

        debug!(user_id = %user_id, current_step, "Draft saved");
        Ok(())
    }

    async fn load_draft(&self, user_id: Uuid) -> Result<Option<OnboardingDraft>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT current_step, form_data, last_updated FROM onboarding_drafts WHERE user_id = ?1",
                params![user_id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("load_draft: {e}")))?;

        let row = match rows.next().await {
            Ok(Some(row)) => row,
            Ok(None) => return Ok(None),
            Err(e) => return Err(DatabaseError::Query(format!("load_draft: {e}"))),
        };

        let get_err = |e: libsql::Error| DatabaseError::Query(format!("load_draft row parse: {e}"));
        let current_step: i64 = row.get(0).map_err(get_err)?;
        let form_str: String = row.get(1).map_err(get_err)?;
        let updated_str: String = row.get(2).map_err(get_err)?;

        let form_data: RoleFormData = serde_json::from_str(&form_str)
            .map_err(|e| DatabaseError::Serialization(format!("load_draft form_data: {e}")))?;

        Ok(Some(OnboardingDraft {
            user_id,
            current_step: current_step.max(0) as usize,
            form_data,
            last_updated: parse_datetime(&updated_str),
        }))
    }

    async fn delete_draft(&self, user_id: Uuid) -> Result<bool, DatabaseError> {
        let count = self
            .conn()
            .execute(
                "DELETE FROM onboarding_drafts WHERE user_id = ?1",
                params![user_id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("delete_draft: {e}")))?;
        debug!(user_id = %user_id, deleted = count > 0, "Draft cleared");
        Ok(count > 0)
    }

    // ── Profile sections ────────────────────────────────────────────

    async fn save_section(
        &self,
        user_id: Uuid,
        role: Role,
        section: &str,
        data: &serde_json::Value,
    ) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let data_str =
            serde_json::to_string(data).map_err(|e| DatabaseError::Serialization(e.to_string()))?;

        self.conn()
            .execute(
                "INSERT INTO profile_sections (user_id, role, section, data, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (user_id, section) DO UPDATE SET role = ?2, data = ?4, updated_at = ?5",
                params![user_id.to_string(), role.to_string(), section, data_str, now],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("save_section: {e}")))?;

        debug!(user_id = %user_id, section, "Profile section saved");
        Ok(())
    }

    async fn list_sections(&self, user_id: Uuid) -> Result<Vec<ProfileSection>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT section, role, data, updated_at FROM profile_sections
                 WHERE user_id = ?1 ORDER BY section ASC",
                params![user_id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("list_sections: {e}")))?;

        let get_err = |e: libsql::Error| DatabaseError::Query(format!("list_sections row parse: {e}"));
        let mut sections = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("list_sections: {e}")))?
        {
            let section: String = row.get(0).map_err(get_err)?;
            let role_str: String = row.get(1).map_err(get_err)?;
            let data_str: String = row.get(2).map_err(get_err)?;
            let updated_str: String = row.get(3).map_err(get_err)?;
            let data = serde_json::from_str(&data_str).map_err(|e| {
                DatabaseError::Serialization(format!("list_sections {section} data: {e}"))
            })?;
            sections.push(ProfileSection {
                section,
                role: parse_role(&role_str, "list_sections")?,
                data,
                updated_at: parse_datetime(&updated_str),
            });
        }
        Ok(sections)
    }
}
