//! Wizard controller. Drives one user through their role's steps.
//!
//! The controller owns the authoritative in-memory state (step index and
//! typed form document). Only forward progress is durable: `go_next` writes
//! the step's section and the draft before advancing, `go_back` and
//! `update_field` never touch the store.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::gateway::DraftGateway;
use super::model::{Role, RoleFormData};
use super::steps::{StepDefinition, steps_for};
use super::validation::FieldErrors;
use crate::error::{DatabaseError, WizardError};
use crate::store::Database;

/// Result of a `go_next` call that did not hit a persistence failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The current step has errors; nothing changed.
    Invalid { errors: FieldErrors },
    /// Moved forward to `step`.
    Advanced { step: usize },
    /// The last step was submitted and onboarding is done.
    Completed { redirect_to: String },
}

/// Step title and key, for clients rendering a progress bar.
#[derive(Debug, Clone, Serialize)]
pub struct StepSummary {
    pub key: &'static str,
    pub title: &'static str,
}

/// Serializable view of the wizard.
#[derive(Debug, Clone, Serialize)]
pub struct WizardSnapshot {
    pub user_id: Uuid,
    pub role: Role,
    pub current_step: usize,
    pub step_count: usize,
    pub steps: Vec<StepSummary>,
    pub form_data: RoleFormData,
    pub completed: bool,
}

pub struct WizardController {
    user_id: Uuid,
    role: Role,
    steps: &'static [StepDefinition],
    current_step: usize,
    form: RoleFormData,
    db: Arc<dyn Database>,
    drafts: DraftGateway,
    /// Step whose rules passed with the current document. Lets a retry
    /// after a failed save skip straight to persistence.
    validated_step: Option<usize>,
    completed: bool,
}

impl WizardController {
    /// A fresh wizard at step 0 with an empty document.
    pub fn new(db: Arc<dyn Database>, user_id: Uuid, role: Role) -> Self {
        Self {
            user_id,
            role,
            steps: steps_for(role),
            current_step: 0,
            form: RoleFormData::empty(role),
            drafts: DraftGateway::new(Arc::clone(&db)),
            db,
            validated_step: None,
            completed: false,
        }
    }

    /// Build the wizard for `user_id`, restoring any saved draft.
    ///
    /// A missing draft means first run and starts fresh. Users who already
    /// finished onboarding are refused, and any draft they still have is
    /// deleted.
    pub async fn resume(db: Arc<dyn Database>, user_id: Uuid) -> Result<Self, WizardError> {
        let user = db
            .get_user(user_id)
            .await?
            .ok_or(WizardError::UnknownUser(user_id))?;
        let role = user.role.ok_or(WizardError::RoleNotSelected(user_id))?;
        if user.onboarded {
            // A completion whose draft delete failed leaves a stray draft.
            if let Err(e) = DraftGateway::new(db).clear(user_id).await {
                warn!(user_id = %user_id, error = %e, "Failed to clear leftover draft");
            }
            return Err(WizardError::AlreadyOnboarded { user_id, role });
        }

        let mut wizard = Self::new(db, user_id, role);
        match wizard.drafts.load(user_id).await? {
            Some(draft) if draft.form_data.role() == role => {
                let last = wizard.steps.len() - 1;
                if draft.current_step > last {
                    warn!(
                        user_id = %user_id,
                        saved_step = draft.current_step,
                        "Draft step out of range, clamping"
                    );
                }
                wizard.current_step = draft.current_step.min(last);
                wizard.form = draft.form_data;
                info!(user_id = %user_id, role = %role, step = wizard.current_step, "Resumed onboarding draft");
            }
            Some(draft) => {
                warn!(
                    user_id = %user_id,
                    role = %role,
                    draft_role = %draft.form_data.role(),
                    "Ignoring draft saved for a different role"
                );
            }
            None => {
                debug!(user_id = %user_id, role = %role, "No draft found, starting fresh");
            }
        }
        Ok(wizard)
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn current(&self) -> &'static StepDefinition {
        &self.steps[self.current_step]
    }

    pub fn form(&self) -> &RoleFormData {
        &self.form
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    fn is_last_step(&self) -> bool {
        self.current_step + 1 == self.steps.len()
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            user_id: self.user_id,
            role: self.role,
            current_step: self.current_step,
            step_count: self.steps.len(),
            steps: self
                .steps
                .iter()
                .map(|s| StepSummary {
                    key: s.key,
                    title: s.title,
                })
                .collect(),
            form_data: self.form.clone(),
            completed: self.completed,
        }
    }

    /// Merge `value` into the document at a dotted `path`.
    ///
    /// Purely in memory. Array indices may address an existing entry or the
    /// slot just past the end, which appends. The document is left untouched
    /// if the result would not fit the role's schema.
    pub fn update_field(&mut self, path: &str, value: Value) -> Result<(), WizardError> {
        self.ensure_open()?;

        let invalid = |reason: String| WizardError::InvalidField {
            path: path.to_string(),
            reason,
        };

        let mut doc = self
            .form
            .to_fields()
            .map_err(|e| invalid(e.to_string()))?;
        set_path(&mut doc, path, value.clone()).map_err(invalid)?;

        let form = RoleFormData::from_fields(self.role, doc).map_err(|e| invalid(e.to_string()))?;

        // Keys the schema doesn't know are dropped on the way back in.
        let stored = form
            .to_fields()
            .map_err(|e| invalid(e.to_string()))?;
        let landed = super::validation::lookup(&stored, path);
        if !landed.is_some_and(|v| equivalent(&value, v)) {
            return Err(invalid("no such field".to_string()));
        }

        self.form = form;
        self.validated_step = None;
        debug!(user_id = %self.user_id, path, "Field updated");
        Ok(())
    }

    /// Validate the current step and, if it passes, persist and advance.
    ///
    /// Order is strict: validate, save the step's section, save the draft
    /// at the next index, then move the index. On the last step the draft
    /// save is replaced by [`complete_onboarding`](Self::complete_onboarding).
    /// A persistence failure leaves the index where it was.
    pub async fn go_next(&mut self) -> Result<StepOutcome, WizardError> {
        self.ensure_open()?;

        let step = self.current();
        let doc = self
            .form
            .to_fields()
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;

        if self.validated_step == Some(self.current_step) {
            debug!(user_id = %self.user_id, step = step.key, "Step already validated, retrying save");
        } else {
            let errors = step.validate(&doc);
            if !errors.is_empty() {
                debug!(
                    user_id = %self.user_id,
                    step = step.key,
                    error_count = errors.len(),
                    "Step validation failed"
                );
                return Ok(StepOutcome::Invalid { errors });
            }
            self.validated_step = Some(self.current_step);
        }

        self.db
            .save_section(self.user_id, self.role, step.key, &step.section(&doc))
            .await
            .inspect_err(|e| {
                warn!(user_id = %self.user_id, step = step.key, error = %e, "Failed to save step section");
            })?;

        if self.is_last_step() {
            let redirect_to = self.complete_onboarding().await?;
            return Ok(StepOutcome::Completed { redirect_to });
        }

        let next = self.current_step + 1;
        self.drafts
            .save(self.user_id, next, &self.form)
            .await
            .inspect_err(|e| {
                warn!(user_id = %self.user_id, step = next, error = %e, "Failed to save draft");
            })?;

        self.current_step = next;
        self.validated_step = None;
        info!(user_id = %self.user_id, role = %self.role, step = next, "Onboarding step advanced");
        Ok(StepOutcome::Advanced { step: next })
    }

    /// Step back one page. No-op on the first step; never persisted.
    pub fn go_back(&mut self) -> usize {
        if self.current_step > 0 && !self.completed {
            self.current_step -= 1;
            self.validated_step = None;
            debug!(user_id = %self.user_id, step = self.current_step, "Onboarding step back");
        }
        self.current_step
    }

    /// Flip the user's onboarded flag, drop the draft, and return the
    /// dashboard path to navigate to.
    pub async fn complete_onboarding(&mut self) -> Result<String, WizardError> {
        self.ensure_open()?;

        self.db
            .set_onboarded(self.user_id, true)
            .await
            .inspect_err(|e| warn!(user_id = %self.user_id, error = %e, "Failed to set onboarded flag"))?;
        self.drafts
            .clear(self.user_id)
            .await
            .inspect_err(|e| warn!(user_id = %self.user_id, error = %e, "Failed to clear draft"))?;

        self.completed = true;
        info!(user_id = %self.user_id, role = %self.role, "Onboarding complete");
        Ok(self.role.dashboard_path())
    }

    fn ensure_open(&self) -> Result<(), WizardError> {
        if self.completed {
            return Err(WizardError::Completed {
                user_id: self.user_id,
            });
        }
        Ok(())
    }
}

/// Write `value` at a dotted path inside `doc`.
fn set_path(doc: &mut Value, path: &str, value: Value) -> Result<(), String> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err("empty path segment".to_string());
    }

    let (last, parents) = segments
        .split_last()
        .ok_or_else(|| "empty path".to_string())?;

    let mut current = doc;
    for segment in parents {
        current = child_mut(current, segment)?;
    }

    match current {
        Value::Object(map) => {
            map.insert(last.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let index = parse_index(last)?;
            match index.cmp(&items.len()) {
                std::cmp::Ordering::Less => items[index] = value,
                std::cmp::Ordering::Equal => items.push(value),
                std::cmp::Ordering::Greater => {
                    return Err(format!("index {index} is past the end of the list"));
                }
            }
            Ok(())
        }
        _ => Err(format!("cannot set {last:?} on a scalar value")),
    }
}

fn child_mut<'a>(current: &'a mut Value, segment: &str) -> Result<&'a mut Value, String> {
    match current {
        Value::Object(map) => map
            .get_mut(segment)
            .ok_or_else(|| format!("no such field {segment:?}")),
        Value::Array(items) => {
            let index = parse_index(segment)?;
            if index == items.len() {
                items.push(Value::Object(serde_json::Map::new()));
            }
            let len = items.len();
            items
                .get_mut(index)
                .ok_or_else(|| format!("index {index} is out of range (len {len})"))
        }
        _ => Err(format!("cannot descend into {segment:?} on a scalar value")),
    }
}

fn parse_index(segment: &str) -> Result<usize, String> {
    segment
        .parse::<usize>()
        .map_err(|_| format!("{segment:?} is not a list index"))
}

/// True when `a` fits inside `b`: object keys of `a` must all match in `b`,
/// and `3` equals `3.0`.
fn equivalent(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| equivalent(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => xs
            .iter()
            .all(|(k, x)| ys.get(k).is_some_and(|y| equivalent(x, y))),
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::onboarding::model::{CandidateFormData, User};
    use crate::onboarding::steps::fixtures;
    use crate::store::testing::RecordingDb;

    async fn wizard_for(role: Role) -> (Arc<RecordingDb>, WizardController) {
        let db = RecordingDb::new().await;
        let user = db.seed_user(role).await;
        let wizard = WizardController::resume(db.clone(), user.id).await.unwrap();
        (db, wizard)
    }

    fn fill(wizard: &mut WizardController, form: RoleFormData) {
        let fields = form.to_fields().unwrap();
        for (key, value) in fields.as_object().unwrap() {
            wizard.update_field(key, value.clone()).unwrap();
        }
    }

    // ── go_next ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn invalid_step_never_moves_or_persists() {
        for role in Role::ALL {
            let (db, mut wizard) = wizard_for(role).await;
            for _ in 0..wizard.step_count() {
                let outcome = wizard.go_next().await.unwrap();
                assert!(matches!(outcome, StepOutcome::Invalid { .. }), "{role}");
                assert_eq!(wizard.current_step(), 0);
            }
            assert_eq!(db.writes(), 0, "{role}: validation failures must not write");
        }
    }

    #[tokio::test]
    async fn valid_step_advances_by_one_and_saves_draft() {
        let (db, mut wizard) = wizard_for(Role::Candidate).await;
        fill(&mut wizard, RoleFormData::Candidate(fixtures::candidate()));

        let outcome = wizard.go_next().await.unwrap();
        assert_eq!(outcome, StepOutcome::Advanced { step: 1 });
        assert_eq!(wizard.current_step(), 1);
        // section + draft
        assert_eq!(db.writes(), 2);

        let draft = db.load_draft(wizard.user_id()).await.unwrap().unwrap();
        assert_eq!(draft.current_step, 1);
        assert_eq!(&draft.form_data, wizard.form());

        let sections = db.list_sections(wizard.user_id()).await.unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].section, "personal");
        assert_eq!(sections[0].data["full_name"], "Sam Rivera");
    }

    #[tokio::test]
    async fn short_biography_fails_on_about() {
        let (db, mut wizard) = wizard_for(Role::Candidate).await;
        let mut candidate = fixtures::candidate();
        candidate.biography.about = "a".repeat(50);
        fill(&mut wizard, RoleFormData::Candidate(candidate));

        assert_eq!(wizard.go_next().await.unwrap(), StepOutcome::Advanced { step: 1 });
        let writes_before = db.writes();

        match wizard.go_next().await.unwrap() {
            StepOutcome::Invalid { errors } => {
                let message = errors.get("biography.about").expect("about error");
                assert!(message.contains("About"));
                assert!(message.contains("100"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert_eq!(wizard.current_step(), 1);
        assert_eq!(db.writes(), writes_before);
    }

    #[tokio::test]
    async fn candidate_completes_all_steps() {
        let (db, mut wizard) = wizard_for(Role::Candidate).await;
        let user_id = wizard.user_id();
        fill(&mut wizard, RoleFormData::Candidate(fixtures::candidate()));

        for expected in 1..5 {
            assert_eq!(
                wizard.go_next().await.unwrap(),
                StepOutcome::Advanced { step: expected }
            );
        }
        let outcome = wizard.go_next().await.unwrap();
        assert_eq!(
            outcome,
            StepOutcome::Completed {
                redirect_to: "/dashboard/candidate".to_string()
            }
        );
        assert!(wizard.is_completed());

        assert!(db.load_draft(user_id).await.unwrap().is_none());
        assert!(db.get_user(user_id).await.unwrap().unwrap().onboarded);
        assert_eq!(db.list_sections(user_id).await.unwrap().len(), 5);

        // The wizard is closed and cannot be resumed.
        assert!(matches!(wizard.go_next().await, Err(WizardError::Completed { .. })));
        assert!(matches!(
            WizardController::resume(db.clone(), user_id).await,
            Err(WizardError::AlreadyOnboarded { role: Role::Candidate, .. })
        ));
    }

    #[tokio::test]
    async fn agency_team_step_needs_a_member() {
        let (_db, mut wizard) = wizard_for(Role::Agency).await;
        let mut agency = fixtures::agency();
        agency.team.clear();
        fill(&mut wizard, RoleFormData::Agency(agency));

        for expected in 1..4 {
            assert_eq!(
                wizard.go_next().await.unwrap(),
                StepOutcome::Advanced { step: expected }
            );
        }
        assert_eq!(wizard.current().key, "team");
        match wizard.go_next().await.unwrap() {
            StepOutcome::Invalid { errors } => assert!(errors.contains("team")),
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert_eq!(wizard.current_step(), 3);

        wizard
            .update_field("team.0", serde_json::to_value(fixtures::member()).unwrap())
            .unwrap();
        assert_eq!(wizard.go_next().await.unwrap(), StepOutcome::Advanced { step: 4 });
    }

    // ── failures & retry ────────────────────────────────────────────

    #[tokio::test]
    async fn persistence_failure_keeps_step_and_retry_skips_validation() {
        let (db, mut wizard) = wizard_for(Role::Company).await;
        fill(&mut wizard, RoleFormData::Company(fixtures::company()));

        db.fail_writes(true);
        let err = wizard.go_next().await.unwrap_err();
        assert!(matches!(err, WizardError::Persistence(_)));
        assert_eq!(wizard.current_step(), 0);
        assert_eq!(wizard.form(), &RoleFormData::Company(fixtures::company()));

        db.fail_writes(false);
        assert_eq!(wizard.go_next().await.unwrap(), StepOutcome::Advanced { step: 1 });
    }

    #[tokio::test]
    async fn retry_after_failure_does_not_revalidate() {
        let (db, mut wizard) = wizard_for(Role::Company).await;
        fill(&mut wizard, RoleFormData::Company(fixtures::company()));

        db.fail_writes(true);
        assert!(wizard.go_next().await.is_err());
        assert_eq!(wizard.validated_step, Some(0));

        // An edit invalidates the earlier pass.
        wizard.update_field("profile.website", json!("not a url")).unwrap();
        assert_eq!(wizard.validated_step, None);
        db.fail_writes(false);
        assert!(matches!(wizard.go_next().await.unwrap(), StepOutcome::Invalid { .. }));
    }

    #[tokio::test]
    async fn completion_failure_can_be_retried() {
        let (db, mut wizard) = wizard_for(Role::Agency).await;
        fill(&mut wizard, RoleFormData::Agency(fixtures::agency()));
        for _ in 0..4 {
            wizard.go_next().await.unwrap();
        }

        db.fail_writes(true);
        assert!(wizard.go_next().await.is_err());
        assert!(!wizard.is_completed());
        assert_eq!(wizard.current_step(), 4);

        db.fail_writes(false);
        assert!(matches!(
            wizard.go_next().await.unwrap(),
            StepOutcome::Completed { .. }
        ));
    }

    // ── go_back ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn back_at_first_step_is_noop() {
        let (db, mut wizard) = wizard_for(Role::Company).await;
        assert_eq!(wizard.go_back(), 0);
        assert_eq!(wizard.current_step(), 0);
        assert_eq!(db.writes(), 0);
    }

    #[tokio::test]
    async fn back_decrements_without_writing() {
        let (db, mut wizard) = wizard_for(Role::Company).await;
        fill(&mut wizard, RoleFormData::Company(fixtures::company()));
        wizard.go_next().await.unwrap();
        wizard.go_next().await.unwrap();
        let writes = db.writes();

        assert_eq!(wizard.go_back(), 1);
        assert_eq!(wizard.current_step(), 1);
        assert_eq!(db.writes(), writes);

        // The durable draft still points at the furthest step reached.
        let draft = db.load_draft(wizard.user_id()).await.unwrap().unwrap();
        assert_eq!(draft.current_step, 2);
    }

    // ── resume ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn resume_without_draft_starts_fresh() {
        let (_db, wizard) = wizard_for(Role::Candidate).await;
        assert_eq!(wizard.current_step(), 0);
        assert_eq!(wizard.form(), &RoleFormData::empty(Role::Candidate));
        assert!(!wizard.is_completed());
    }

    #[tokio::test]
    async fn resume_restores_saved_state() {
        let (db, mut wizard) = wizard_for(Role::Candidate).await;
        fill(&mut wizard, RoleFormData::Candidate(fixtures::candidate()));
        wizard.go_next().await.unwrap();
        wizard.go_next().await.unwrap();
        let saved_form = wizard.form().clone();

        let resumed = WizardController::resume(db.clone(), wizard.user_id())
            .await
            .unwrap();
        assert_eq!(resumed.current_step(), 2);
        assert_eq!(resumed.form(), &saved_form);
    }

    #[tokio::test]
    async fn resume_clamps_out_of_range_step() {
        let db = RecordingDb::new().await;
        let user = db.seed_user(Role::Candidate).await;
        db.save_draft(user.id, 42, &RoleFormData::empty(Role::Candidate))
            .await
            .unwrap();

        let wizard = WizardController::resume(db.clone(), user.id).await.unwrap();
        assert_eq!(wizard.current_step(), 4);
    }

    #[tokio::test]
    async fn resume_ignores_draft_for_other_role() {
        let db = RecordingDb::new().await;
        let user = db.seed_user(Role::Company).await;
        db.save_draft(user.id, 3, &RoleFormData::empty(Role::Agency))
            .await
            .unwrap();

        let wizard = WizardController::resume(db.clone(), user.id).await.unwrap();
        assert_eq!(wizard.current_step(), 0);
        assert_eq!(wizard.form().role(), Role::Company);
    }

    #[tokio::test]
    async fn resume_clears_draft_left_by_interrupted_completion() {
        let db = RecordingDb::new().await;
        let user = db.seed_user(Role::Agency).await;
        db.save_draft(user.id, 4, &RoleFormData::Agency(fixtures::agency()))
            .await
            .unwrap();
        db.set_onboarded(user.id, true).await.unwrap();

        // Cleanup failures don't change the answer.
        db.fail_writes(true);
        assert!(matches!(
            WizardController::resume(db.clone(), user.id).await,
            Err(WizardError::AlreadyOnboarded { role: Role::Agency, .. })
        ));
        assert!(db.load_draft(user.id).await.unwrap().is_some());

        db.fail_writes(false);
        assert!(matches!(
            WizardController::resume(db.clone(), user.id).await,
            Err(WizardError::AlreadyOnboarded { .. })
        ));
        assert!(db.load_draft(user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn resume_rejects_unknown_or_roleless_users() {
        let db = RecordingDb::new().await;
        let missing = Uuid::new_v4();
        assert!(matches!(
            WizardController::resume(db.clone(), missing).await,
            Err(WizardError::UnknownUser(id)) if id == missing
        ));

        let user = User::new(Uuid::new_v4(), "norole@example.com", None);
        db.create_user(&user).await.unwrap();
        assert!(matches!(
            WizardController::resume(db.clone(), user.id).await,
            Err(WizardError::RoleNotSelected(_))
        ));
    }

    // ── update_field ────────────────────────────────────────────────

    #[tokio::test]
    async fn update_field_merges_nested_values() {
        let (db, mut wizard) = wizard_for(Role::Candidate).await;
        wizard.update_field("biography.about", json!("Hello")).unwrap();
        wizard
            .update_field("biography.linkedin_url", json!("https://linkedin.com/in/x"))
            .unwrap();
        wizard.update_field("education.0.degree", json!("MSc")).unwrap();
        wizard.update_field("education.0.start_year", json!(2019)).unwrap();
        wizard.update_field("preferences.desired_salary", json!(50000)).unwrap();

        let RoleFormData::Candidate(CandidateFormData {
            biography,
            education,
            preferences,
            ..
        }) = wizard.form()
        else {
            panic!("expected candidate form");
        };
        assert_eq!(biography.about, "Hello");
        assert_eq!(biography.linkedin_url.as_deref(), Some("https://linkedin.com/in/x"));
        assert_eq!(education.len(), 1);
        assert_eq!(education[0].degree, "MSc");
        assert_eq!(education[0].start_year, Some(2019));
        assert_eq!(preferences.desired_salary, Some(50000.0));
        assert_eq!(db.writes(), 0);
    }

    #[tokio::test]
    async fn update_field_rejects_bad_input_without_changes() {
        let (_db, mut wizard) = wizard_for(Role::Candidate).await;
        let before = wizard.form().clone();

        for (path, value) in [
            ("biography.about", json!(42)),
            ("biography.nickname", json!("x")),
            ("nope.about", json!("x")),
            ("education.3.degree", json!("BSc")),
            ("biography..about", json!("x")),
            ("education.first", json!({})),
        ] {
            let err = wizard.update_field(path, value).unwrap_err();
            assert!(
                matches!(&err, WizardError::InvalidField { path: p, .. } if p == path),
                "{path}: {err:?}"
            );
        }
        assert_eq!(wizard.form(), &before);
    }

    #[test]
    fn equivalent_numbers() {
        assert!(equivalent(&json!(3), &json!(3.0)));
        assert!(equivalent(&json!({"a": [1, 2]}), &json!({"a": [1.0, 2], "b": null})));
        assert!(!equivalent(&json!("3"), &json!(3)));
    }
}
