//! Unified `Database` trait — single async interface for all persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::onboarding::model::{OnboardingDraft, ProfileSection, Role, RoleFormData, User};

/// Backend-agnostic database trait covering users, drafts and profile sections.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run all pending schema migrations.
    async fn init_schema(&self) -> Result<(), DatabaseError>;

    // ── Users ───────────────────────────────────────────────────────

    /// Insert a new user. Fails with `Constraint` if the id or email exists.
    async fn create_user(&self, user: &User) -> Result<(), DatabaseError>;

    /// Get a user by ID.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    /// Set (or change) the user's role.
    async fn set_user_role(&self, id: Uuid, role: Role) -> Result<(), DatabaseError>;

    /// Set the persistent onboarded flag.
    async fn set_onboarded(&self, id: Uuid, onboarded: bool) -> Result<(), DatabaseError>;

    // ── Drafts ──────────────────────────────────────────────────────

    /// Insert or overwrite the user's draft.
    async fn save_draft(
        &self,
        user_id: Uuid,
        current_step: usize,
        form_data: &RoleFormData,
    ) -> Result<(), DatabaseError>;

    /// Fetch the user's draft, `None` if there is none.
    async fn load_draft(&self, user_id: Uuid) -> Result<Option<OnboardingDraft>, DatabaseError>;

    /// Delete the user's draft. Returns whether a row was removed.
    async fn delete_draft(&self, user_id: Uuid) -> Result<bool, DatabaseError>;

    // ── Profile sections ────────────────────────────────────────────

    /// Insert or overwrite one persisted section of the user's profile.
    async fn save_section(
        &self,
        user_id: Uuid,
        role: Role,
        section: &str,
        data: &serde_json::Value,
    ) -> Result<(), DatabaseError>;

    /// All persisted sections for the user, ordered by section name.
    async fn list_sections(&self, user_id: Uuid) -> Result<Vec<ProfileSection>, DatabaseError>;
}
