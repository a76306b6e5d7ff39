//! REST endpoints for the onboarding wizard.
//!
//! Every route acts on the caller's own wizard, identified by the session
//! header.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use super::wizard::StepOutcome;
use crate::http::{ApiError, ApiJson, ApiResult, SessionUser};
use crate::server::AppState;

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/onboarding", get(get_wizard))
        .route("/api/onboarding/fields", patch(update_field))
        .route("/api/onboarding/next", post(next_step))
        .route("/api/onboarding/back", post(previous_step))
        .route("/api/onboarding/profile", get(get_profile))
        .with_state(state)
}

/// GET /api/onboarding
///
/// Current wizard state, resumed from the saved draft on first access.
async fn get_wizard(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
) -> ApiResult<impl IntoResponse> {
    let snapshot = state.manager.snapshot(user_id).await?;
    Ok(Json(snapshot))
}

#[derive(Deserialize)]
struct FieldUpdate {
    path: String,
    value: Value,
}

/// PATCH /api/onboarding/fields
async fn update_field(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    ApiJson(body): ApiJson<FieldUpdate>,
) -> ApiResult<impl IntoResponse> {
    let snapshot = state
        .manager
        .update_field(user_id, &body.path, body.value)
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/onboarding/next
///
/// 200 with the new state on advance or completion, 422 with per-field
/// messages when the step is invalid, 503 when progress could not be saved.
async fn next_step(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
) -> ApiResult<impl IntoResponse> {
    let (outcome, snapshot) = state.manager.go_next(user_id).await?;
    match outcome {
        StepOutcome::Invalid { errors } => Err(ApiError::Validation(errors)),
        StepOutcome::Advanced { step } => Ok(Json(json!({
            "status": "advanced",
            "step": step,
            "wizard": snapshot,
        }))),
        StepOutcome::Completed { redirect_to } => Ok(Json(json!({
            "status": "completed",
            "redirect_to": redirect_to,
            "wizard": snapshot,
        }))),
    }
}

/// POST /api/onboarding/back
async fn previous_step(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
) -> ApiResult<impl IntoResponse> {
    let snapshot = state.manager.go_back(user_id).await?;
    Ok(Json(snapshot))
}

/// GET /api/onboarding/profile
///
/// Sections persisted so far, available during and after onboarding.
async fn get_profile(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
) -> ApiResult<impl IntoResponse> {
    let sections = state.manager.profile(user_id).await?;
    Ok(Json(json!({ "sections": sections })))
}
