//! Role-based routing guard.
//!
//! [`authorize`] decides, for one session and one requested path, whether
//! the request may proceed or where it should be redirected. It is a pure
//! function; [`routes`] exposes it over HTTP.

pub mod routes;

use serde::Serialize;
use uuid::Uuid;

use crate::onboarding::model::{Role, User};

const DASHBOARD: &str = "/dashboard";
const ONBOARDING: &str = "/onboarding";

/// What the guard knows about the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub role: Option<Role>,
    pub onboarded: bool,
}

impl Session {
    /// The route this user belongs on right now.
    pub fn home(&self) -> String {
        match self.role {
            None => ONBOARDING.to_string(),
            Some(role) if self.onboarded => role.dashboard_path(),
            Some(role) => role.onboarding_path(),
        }
    }
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            onboarded: user.onboarded,
        }
    }
}

/// Guard decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Access {
    Allow,
    #[serde(rename = "redirect")]
    RedirectTo { location: String },
}

impl Access {
    fn redirect(location: impl Into<String>) -> Self {
        Self::RedirectTo {
            location: location.into(),
        }
    }
}

/// Which guarded area a path falls in, with the role segment if present.
#[derive(Debug, PartialEq, Eq)]
enum Area<'a> {
    Public,
    SignIn,
    Dashboard(Option<&'a str>),
    Onboarding(Option<&'a str>),
}

fn classify<'a>(path: &'a str, sign_in_path: &str) -> Area<'a> {
    if under(path, sign_in_path).is_some() {
        return Area::SignIn;
    }
    if let Some(rest) = under(path, DASHBOARD) {
        return Area::Dashboard(first_segment(rest));
    }
    if let Some(rest) = under(path, ONBOARDING) {
        return Area::Onboarding(first_segment(rest));
    }
    Area::Public
}

/// `Some(remainder)` when `path` is `prefix` or a sub-path of it.
fn under<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}

fn first_segment(rest: &str) -> Option<&str> {
    rest.split('/').find(|s| !s.is_empty())
}

/// Strip query and fragment, collapse a trailing slash.
fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

fn sign_in_redirect(sign_in_path: &str, requested: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("redirect_url", requested)
        .finish();
    format!("{sign_in_path}?{query}")
}

/// Decide whether `session` may view `path`.
pub fn authorize(session: Option<&Session>, path: &str, sign_in_path: &str) -> Access {
    let path = normalize(path);
    let area = classify(path, sign_in_path);

    let Some(session) = session else {
        return match area {
            Area::Public | Area::SignIn => Access::Allow,
            Area::Dashboard(_) | Area::Onboarding(_) => {
                Access::redirect(sign_in_redirect(sign_in_path, path))
            }
        };
    };

    match (area, session.role) {
        (Area::Public, _) => Access::Allow,
        (Area::SignIn, _) => Access::redirect(session.home()),

        // No role yet: only the role picker itself.
        (Area::Onboarding(None), None) => Access::Allow,
        (Area::Dashboard(_) | Area::Onboarding(Some(_)), None) => Access::redirect(ONBOARDING),

        (Area::Dashboard(_), Some(role)) if !session.onboarded => {
            Access::redirect(role.onboarding_path())
        }
        (Area::Dashboard(Some(segment)), Some(role)) if segment == role.as_str() => Access::Allow,
        (Area::Dashboard(_), Some(role)) => Access::redirect(role.dashboard_path()),

        (Area::Onboarding(_), Some(role)) if session.onboarded => {
            Access::redirect(role.dashboard_path())
        }
        (Area::Onboarding(Some(segment)), Some(role)) if segment == role.as_str() => Access::Allow,
        (Area::Onboarding(_), Some(role)) => Access::redirect(role.onboarding_path()),
    }
}
