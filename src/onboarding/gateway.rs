//! Draft persistence gateway: save / load / clear a user's wizard draft.

use std::sync::Arc;

use uuid::Uuid;

use super::model::{OnboardingDraft, RoleFormData};
use crate::error::DatabaseError;
use crate::store::Database;

/// Thin handle over the store for the one document the wizard resumes from.
#[derive(Clone)]
pub struct DraftGateway {
    db: Arc<dyn Database>,
}

impl DraftGateway {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// Upsert the user's draft, replacing whatever was there.
    pub async fn save(
        &self,
        user_id: Uuid,
        step: usize,
        form: &RoleFormData,
    ) -> Result<(), DatabaseError> {
        self.db.save_draft(user_id, step, form).await
    }

    /// Fetch the user's draft. A missing draft is `Ok(None)`, the normal
    /// first-run state.
    pub async fn load(&self, user_id: Uuid) -> Result<Option<OnboardingDraft>, DatabaseError> {
        self.db.load_draft(user_id).await
    }

    /// Remove the user's draft once onboarding is done.
    pub async fn clear(&self, user_id: Uuid) -> Result<(), DatabaseError> {
        self.db.delete_draft(user_id).await?;
        Ok(())
    }
}
