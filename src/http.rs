//! HTTP plumbing shared by the route modules: the JSON error type and the
//! request extractors.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, OptionalFromRequestParts, Query, Request};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

use crate::error::{DatabaseError, WizardError};
use crate::onboarding::validation::FieldErrors;

/// Header the upstream auth proxy sets to the signed-in user's id.
pub const SESSION_HEADER: &str = "x-user-id";

/// Error type for HTTP handlers, rendered as `{ "error": ..., "code": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// The request conflicts with the user's state; `location` is where
    /// they should be instead.
    #[error("{message}")]
    Conflict {
        message: String,
        location: Option<String>,
    },

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code) = match &self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            ApiError::Unavailable(msg) => {
                tracing::warn!(error = %msg, "Storage unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE")
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        match self {
            ApiError::Validation(fields) => body["fields"] = json!(fields),
            ApiError::Conflict {
                location: Some(location),
                ..
            } => body["location"] = json!(location),
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{entity} {id} not found"))
            }
            DatabaseError::Constraint(msg) => ApiError::Conflict {
                message: msg,
                location: None,
            },
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<WizardError> for ApiError {
    fn from(err: WizardError) -> Self {
        let message = err.to_string();
        match err {
            WizardError::Persistence(_) => ApiError::Unavailable(message),
            WizardError::InvalidField { .. } => ApiError::BadRequest(message),
            WizardError::AlreadyOnboarded { role, .. } => ApiError::Conflict {
                message,
                location: Some(role.dashboard_path()),
            },
            WizardError::Completed { .. } => ApiError::Conflict {
                message,
                location: None,
            },
            WizardError::RoleNotSelected(_) => ApiError::Conflict {
                message,
                location: Some("/onboarding".to_string()),
            },
            WizardError::UnknownUser(_) => ApiError::Unauthorized(message),
        }
    }
}

/// The caller's user id, taken from [`SESSION_HEADER`].
///
/// Missing or malformed headers reject with 401. Use `Option<SessionUser>`
/// for routes that also serve anonymous callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser(pub Uuid);

fn parse_session(parts: &Parts) -> Option<Result<SessionUser, ApiError>> {
    let raw = parts.headers.get(SESSION_HEADER)?;
    Some(
        raw.to_str()
            .ok()
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .map(SessionUser)
            .ok_or_else(|| ApiError::Unauthorized(format!("Invalid {SESSION_HEADER} header"))),
    )
}

impl<S: Send + Sync> FromRequestParts<S> for SessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parse_session(parts)
            .unwrap_or_else(|| Err(ApiError::Unauthorized(format!("Missing {SESSION_HEADER} header"))))
    }
}

impl<S: Send + Sync> OptionalFromRequestParts<S> for SessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        parse_session(parts).transpose()
    }
}

/// JSON body extractor whose rejections use the [`ApiError`] envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}

/// Query string extractor whose rejections use the [`ApiError`] envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}
