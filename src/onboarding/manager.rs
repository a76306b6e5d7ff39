//! OnboardingManager — keeps one live wizard per user and serializes that
//! user's requests through it.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use serde_json::Value;

use super::model::{ProfileSection, Role};
use super::steps::steps_for;
use super::wizard::{StepOutcome, WizardController, WizardSnapshot};
use crate::config::DEFAULT_WIZARD_IDLE_SECS;
use crate::error::WizardError;
use crate::store::Database;

type SharedWizard = Arc<Mutex<WizardController>>;

/// Idle time after which an untouched wizard is dropped from memory.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(DEFAULT_WIZARD_IDLE_SECS);

struct Entry {
    wizard: SharedWizard,
    /// Milliseconds since the manager's epoch at last access.
    last_used: AtomicU64,
}

impl Entry {
    fn new(wizard: SharedWizard, now: u64) -> Self {
        Self {
            wizard,
            last_used: AtomicU64::new(now),
        }
    }

    fn touch(&self, now: u64) -> SharedWizard {
        self.last_used.fetch_max(now, Ordering::Relaxed);
        Arc::clone(&self.wizard)
    }

    /// Idle past `timeout` and not in the middle of a request.
    fn is_stale(&self, now: u64, timeout: Duration) -> bool {
        let idle = now.saturating_sub(self.last_used.load(Ordering::Relaxed));
        Duration::from_millis(idle) >= timeout && self.wizard.try_lock().is_ok()
    }
}

/// Registry of in-flight wizards, keyed by user.
///
/// A controller is built through [`WizardController::resume`] the first
/// time a user touches the wizard. It is dropped again once they complete
/// it, change role, or leave it idle past the timeout; the saved draft is
/// what the next request resumes from.
pub struct OnboardingManager {
    db: Arc<dyn Database>,
    wizards: RwLock<HashMap<Uuid, Entry>>,
    idle_timeout: Duration,
    epoch: Instant,
}

impl OnboardingManager {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self::with_idle_timeout(db, DEFAULT_IDLE_TIMEOUT)
    }

    pub fn with_idle_timeout(db: Arc<dyn Database>, idle_timeout: Duration) -> Self {
        Self {
            db,
            wizards: RwLock::new(HashMap::new()),
            idle_timeout,
            epoch: Instant::now(),
        }
    }

    pub fn db(&self) -> &Arc<dyn Database> {
        &self.db
    }

    fn now(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// The user's live wizard, resuming it from storage on first use.
    ///
    /// The resume runs under the registry's write lock. A role change calls
    /// [`forget`](Self::forget) after writing the new role, so it either
    /// lands before the read here or evicts whatever this call inserted.
    async fn wizard(&self, user_id: Uuid) -> Result<SharedWizard, WizardError> {
        let now = self.now();
        if let Some(entry) = self.wizards.read().await.get(&user_id) {
            return Ok(entry.touch(now));
        }

        let mut wizards = self.wizards.write().await;
        if let Some(entry) = wizards.get(&user_id) {
            return Ok(entry.touch(now));
        }

        let evicted = self.sweep(&mut wizards, now);
        let resumed = WizardController::resume(Arc::clone(&self.db), user_id).await?;
        let wizard = Arc::new(Mutex::new(resumed));
        wizards.insert(user_id, Entry::new(Arc::clone(&wizard), now));
        debug!(user_id = %user_id, active = wizards.len(), evicted, "Wizard loaded");
        Ok(wizard)
    }

    fn sweep(&self, wizards: &mut HashMap<Uuid, Entry>, now: u64) -> usize {
        let before = wizards.len();
        wizards.retain(|_, entry| !entry.is_stale(now, self.idle_timeout));
        before - wizards.len()
    }

    /// Drop wizards idle past the timeout. Returns how many were dropped.
    pub async fn evict_idle(&self) -> usize {
        let now = self.now();
        let evicted = self.sweep(&mut *self.wizards.write().await, now);
        if evicted > 0 {
            debug!(evicted, "Idle wizards evicted");
        }
        evicted
    }

    /// Drop any cached wizard for `user_id`. The next request resumes
    /// from storage.
    pub async fn forget(&self, user_id: Uuid) {
        if self.wizards.write().await.remove(&user_id).is_some() {
            debug!(user_id = %user_id, "Wizard evicted");
        }
    }

    pub async fn snapshot(&self, user_id: Uuid) -> Result<WizardSnapshot, WizardError> {
        let wizard = self.wizard(user_id).await?;
        let snapshot = wizard.lock().await.snapshot();
        Ok(snapshot)
    }

    pub async fn update_field(
        &self,
        user_id: Uuid,
        path: &str,
        value: Value,
    ) -> Result<WizardSnapshot, WizardError> {
        let wizard = self.wizard(user_id).await?;
        let mut wizard = wizard.lock().await;
        wizard.update_field(path, value)?;
        Ok(wizard.snapshot())
    }

    /// Submit the current step. On completion the wizard is released.
    pub async fn go_next(&self, user_id: Uuid) -> Result<(StepOutcome, WizardSnapshot), WizardError> {
        let wizard = self.wizard(user_id).await?;
        let (outcome, snapshot) = {
            let mut wizard = wizard.lock().await;
            let outcome = wizard.go_next().await?;
            (outcome, wizard.snapshot())
        };

        if let StepOutcome::Completed { .. } = &outcome {
            self.forget(user_id).await;
            info!(user_id = %user_id, "Onboarding wizard released");
        }
        Ok((outcome, snapshot))
    }

    pub async fn go_back(&self, user_id: Uuid) -> Result<WizardSnapshot, WizardError> {
        let wizard = self.wizard(user_id).await?;
        let mut wizard = wizard.lock().await;
        wizard.go_back();
        Ok(wizard.snapshot())
    }

    /// Profile sections persisted so far, in wizard step order.
    pub async fn profile(&self, user_id: Uuid) -> Result<Vec<ProfileSection>, WizardError> {
        self.db
            .get_user(user_id)
            .await?
            .ok_or(WizardError::UnknownUser(user_id))?;
        let mut sections = self.db.list_sections(user_id).await?;
        sections.sort_by_key(|s| step_index(s.role, &s.section));
        Ok(sections)
    }

    /// Number of wizards currently held in memory.
    pub async fn active_count(&self) -> usize {
        self.wizards.read().await.len()
    }
}

fn step_index(role: Role, key: &str) -> usize {
    steps_for(role)
        .iter()
        .position(|step| step.key == key)
        .unwrap_or(usize::MAX)
}

/// Spawn a background task that periodically drops idle wizards.
pub fn spawn_idle_sweep(manager: Arc<OnboardingManager>, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            manager.evict_idle().await;
        }
    })
}
