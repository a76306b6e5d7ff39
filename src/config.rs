//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Default HTTP port.
const DEFAULT_PORT: u16 = 8080;
/// Default database location.
const DEFAULT_DB_PATH: &str = "./data/hireflow.db";
/// Default idle time before an in-memory wizard is dropped.
pub const DEFAULT_WIZARD_IDLE_SECS: u64 = 30 * 60;
/// Default sign-in route used by the routing guard.
pub const DEFAULT_SIGN_IN_PATH: &str = "/sign-in";

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP server binds on `0.0.0.0`.
    pub port: u16,
    /// Path of the libSQL database file.
    pub db_path: PathBuf,
    /// Route unauthenticated users are sent to.
    pub sign_in_path: String,
    /// Allowed CORS origins. `["*"]` allows any origin.
    pub cors_origins: Vec<String>,
    /// How long an untouched wizard stays in memory. Its saved draft
    /// outlives it.
    pub wizard_idle_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_string(),
            cors_origins: vec!["*".to_string()],
            wizard_idle_timeout: Duration::from_secs(DEFAULT_WIZARD_IDLE_SECS),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                 | Default              |
    /// |-------------------------|----------------------|
    /// | `HIREFLOW_PORT`         | `8080`               |
    /// | `HIREFLOW_DB_PATH`      | `./data/hireflow.db` |
    /// | `HIREFLOW_SIGN_IN_PATH` | `/sign-in`           |
    /// | `HIREFLOW_CORS_ORIGINS` | `*`                  |
    /// | `HIREFLOW_WIZARD_IDLE_SECS` | `1800`           |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("HIREFLOW_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "HIREFLOW_PORT".to_string(),
                message: format!("{raw:?} is not a valid port: {e}"),
            })?,
            None => defaults.port,
        };

        let db_path = lookup("HIREFLOW_DB_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let sign_in_path = match lookup("HIREFLOW_SIGN_IN_PATH") {
            Some(path) if !path.starts_with('/') => {
                return Err(ConfigError::InvalidValue {
                    key: "HIREFLOW_SIGN_IN_PATH".to_string(),
                    message: format!("{path:?} must start with '/'"),
                });
            }
            Some(path) => path,
            None => defaults.sign_in_path,
        };

        let cors_origins: Vec<String> = lookup("HIREFLOW_CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let wizard_idle_timeout = match lookup("HIREFLOW_WIZARD_IDLE_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                    key: "HIREFLOW_WIZARD_IDLE_SECS".to_string(),
                    message: format!("{raw:?} is not a number of seconds: {e}"),
                })?;
                Duration::from_secs(secs)
            }
            None => defaults.wizard_idle_timeout,
        };

        Ok(Self {
            port,
            db_path,
            sign_in_path,
            cors_origins,
            wizard_idle_timeout,
        })
    }
}
