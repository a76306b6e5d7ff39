//! Onboarding wizard: per-role step schemas, validation, draft persistence
//! and the controller that walks a user through them.
//!
//! A user with a role fills in a typed form document over five steps. Each
//! successful step persists its section and a resumable draft; the last
//! step flips the user's onboarded flag and deletes the draft.

pub mod gateway;
pub mod manager;
pub mod model;
pub mod routes;
pub mod steps;
pub mod validation;
pub mod wizard;

pub use gateway::DraftGateway;
pub use manager::OnboardingManager;
pub use model::{OnboardingDraft, Role, RoleFormData, User};
pub use routes::onboarding_routes;
pub use steps::{StepDefinition, steps_for};
pub use wizard::{StepOutcome, WizardController, WizardSnapshot};
