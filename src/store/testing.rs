//! Test double: an in-memory backend that counts writes and can be told to fail them.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard, Notify};
use uuid::Uuid;

use super::{Database, LibSqlBackend};
use crate::error::DatabaseError;
use crate::onboarding::model::{OnboardingDraft, ProfileSection, Role, RoleFormData, User};

pub struct RecordingDb {
    inner: LibSqlBackend,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
    /// Held by a test to stall `get_user` after it has read the row.
    read_gate: Mutex<()>,
    user_read: Notify,
}

impl RecordingDb {
    pub async fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: LibSqlBackend::new_memory().await.unwrap(),
            writes: AtomicUsize::new(0),
            fail_writes: AtomicBool::new(false),
            read_gate: Mutex::new(()),
            user_read: Notify::new(),
        })
    }

    /// Number of successful or attempted wizard writes (drafts, sections, flags).
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// While the guard is held, `get_user` returns only after it is dropped,
    /// handing back the row as it was when read.
    pub async fn pause_user_reads(&self) -> MutexGuard<'_, ()> {
        self.read_gate.lock().await
    }

    /// Resolves once a `get_user` call has read its row.
    pub async fn user_read(&self) {
        self.user_read.notified().await;
    }

    fn record(&self, op: &str) -> Result<(), DatabaseError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DatabaseError::Query(format!("{op}: simulated outage")));
        }
        Ok(())
    }

    /// Insert a user directly, bypassing the write counter.
    pub async fn seed_user(&self, role: Role) -> User {
        let id = Uuid::new_v4();
        let user = User::new(id, &format!("{id}@example.com"), Some(role));
        self.inner.create_user(&user).await.unwrap();
        user
    }
}

#[async_trait]
impl Database for RecordingDb {
    async fn init_schema(&self) -> Result<(), DatabaseError> {
        self.inner.init_schema().await
    }

    async fn create_user(&self, user: &User) -> Result<(), DatabaseError> {
        self.inner.create_user(user).await
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user = self.inner.get_user(id).await;
        self.user_read.notify_one();
        let _gate = self.read_gate.lock().await;
        user
    }

    async fn set_user_role(&self, id: Uuid, role: Role) -> Result<(), DatabaseError> {
        self.inner.set_user_role(id, role).await
    }

    async fn set_onboarded(&self, id: Uuid, onboarded: bool) -> Result<(), DatabaseError> {
        self.record("set_onboarded")?;
        self.inner.set_onboarded(id, onboarded).await
    }

    async fn save_draft(
        &self,
        user_id: Uuid,
        current_step: usize,
        form_data: &RoleFormData,
    ) -> Result<(), DatabaseError> {
        self.record("save_draft")?;
        self.inner.save_draft(user_id, current_step, form_data).await
    }

    async fn load_draft(&self, user_id: Uuid) -> Result<Option<OnboardingDraft>, DatabaseError> {
        self.inner.load_draft(user_id).await
    }

    async fn delete_draft(&self, user_id: Uuid) -> Result<bool, DatabaseError> {
        self.record("delete_draft")?;
        self.inner.delete_draft(user_id).await
    }

    async fn save_section(
        &self,
        user_id: Uuid,
        role: Role,
        section: &str,
        data: &serde_json::Value,
    ) -> Result<(), DatabaseError> {
        self.record("save_section")?;
        self.inner.save_section(user_id, role, section, data).await
    }

    async fn list_sections(&self, user_id: Uuid) -> Result<Vec<ProfileSection>, DatabaseError> {
        self.inner.list_sections(user_id).await
    }
}
