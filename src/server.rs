//! Router assembly: shared state, health check and CORS.

use std::sync::Arc;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::ConfigError;
use crate::guard::routes::access_routes;
use crate::http::SESSION_HEADER;
use crate::onboarding::{OnboardingManager, onboarding_routes};
use crate::store::Database;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub manager: Arc<OnboardingManager>,
    pub sign_in_path: String,
}

impl AppState {
    pub fn new(db: Arc<dyn Database>, config: &AppConfig) -> Self {
        Self {
            manager: Arc::new(OnboardingManager::with_idle_timeout(
                Arc::clone(&db),
                config.wizard_idle_timeout,
            )),
            db,
            sign_in_path: config.sign_in_path.clone(),
        }
    }
}

/// Build the full application router.
pub fn build_router(state: AppState, config: &AppConfig) -> Result<Router, ConfigError> {
    let cors = build_cors_layer(&config.cors_origins)?;
    Ok(Router::new()
        .route("/health", get(health))
        .merge(access_routes(state.clone()))
        .merge(onboarding_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        ))
}

/// CORS for the configured origins; `*` allows any.
pub fn build_cors_layer(origins: &[String]) -> Result<CorsLayer, ConfigError> {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let parsed = origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>().map_err(|e| ConfigError::InvalidValue {
                    key: "HIREFLOW_CORS_ORIGINS".to_string(),
                    message: format!("invalid origin {o:?}: {e}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(parsed)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(SESSION_HEADER)]))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "hireflow"
    }))
}
