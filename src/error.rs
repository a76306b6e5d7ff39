//! Error types for hireflow.

use uuid::Uuid;

use crate::onboarding::model::Role;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Onboarding wizard errors.
///
/// Field validation failures are not errors; they come back as
/// `StepOutcome::Invalid`.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Failed to save progress: {0}")]
    Persistence(#[from] DatabaseError),

    #[error("Invalid field {path}: {reason}")]
    InvalidField { path: String, reason: String },

    #[error("User {user_id} has already completed onboarding")]
    AlreadyOnboarded { user_id: Uuid, role: Role },

    #[error("Onboarding for user {user_id} is already complete")]
    Completed { user_id: Uuid },

    #[error("Unknown user {0}")]
    UnknownUser(Uuid),

    #[error("User {0} has not selected a role")]
    RoleNotSelected(Uuid),
}
