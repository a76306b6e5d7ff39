//! REST endpoints for users, role selection and access decisions.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use super::{Session, authorize};
use crate::http::{ApiError, ApiJson, ApiQuery, ApiResult, SessionUser};
use crate::onboarding::model::{Role, User};
use crate::onboarding::validation::{Check, FieldRule, Rule, validate};
use crate::server::AppState;

const USER_CHECKS: &[Check] = &[Check::Field(FieldRule {
    path: "email",
    label: "Email",
    rules: &[Rule::Required, Rule::Email],
})];

/// Build the user and access routes.
pub fn access_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/access", get(check_access))
        .route("/api/users", post(create_user))
        .route("/api/users/me", get(current_user))
        .route("/api/users/me/role", put(select_role))
        .with_state(state)
}

async fn load_user(state: &AppState, user_id: Uuid) -> ApiResult<User> {
    state
        .db
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(format!("Unknown user {user_id}")))
}

// ── Access ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct AccessQuery {
    path: String,
}

/// GET /api/access?path=/dashboard/company
///
/// Anonymous callers and sessions naming an unknown user are both treated
/// as signed out.
async fn check_access(
    State(state): State<AppState>,
    session: Option<SessionUser>,
    ApiQuery(query): ApiQuery<AccessQuery>,
) -> ApiResult<impl IntoResponse> {
    let user = match session {
        Some(SessionUser(user_id)) => {
            let user = state.db.get_user(user_id).await?;
            if user.is_none() {
                warn!(user_id = %user_id, "Session names an unknown user");
            }
            user
        }
        None => None,
    };
    let session = user.as_ref().map(Session::from);

    let access = authorize(session.as_ref(), &query.path, &state.sign_in_path);
    Ok(Json(access))
}

// ── Users ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CreateUserRequest {
    id: Option<Uuid>,
    email: String,
    role: Option<Role>,
}

/// POST /api/users
async fn create_user(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let errors = validate(USER_CHECKS, &json!({ "email": body.email }));
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let user = User::new(body.id.unwrap_or_else(Uuid::new_v4), body.email.trim(), body.role);
    state.db.create_user(&user).await?;
    info!(user_id = %user.id, role = ?user.role, "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/me
async fn current_user(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
) -> ApiResult<impl IntoResponse> {
    let user = load_user(&state, user_id).await?;
    Ok(Json(user))
}

#[derive(Deserialize)]
struct SelectRoleRequest {
    role: Role,
}

/// PUT /api/users/me/role
///
/// Allowed until onboarding completes. Any in-memory wizard for the user is
/// dropped, since its steps belong to the previous role.
async fn select_role(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    ApiJson(body): ApiJson<SelectRoleRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = load_user(&state, user_id).await?;
    if let (true, Some(role)) = (user.onboarded, user.role) {
        return Err(ApiError::Conflict {
            message: "Role cannot change after onboarding".to_string(),
            location: Some(role.dashboard_path()),
        });
    }

    state.db.set_user_role(user_id, body.role).await?;
    state.manager.forget(user_id).await;
    info!(user_id = %user_id, role = %body.role, previous = ?user.role, "Role selected");

    let user = load_user(&state, user_id).await?;
    Ok(Json(json!({
        "user": user,
        "redirect_to": body.role.onboarding_path(),
    })))
}
