//! Runtime configuration from `.env` and the environment

use std::env;
use std::path::PathBuf;

/// Database file override
pub const DB_ENV: &str = "COUCH_PLANNER_DB";
/// Default log filter when `RUST_LOG` is unset
pub const LOG_ENV: &str = "COUCH_PLANNER_LOG";

pub const DB_FILE_NAME: &str = "couch-planner.db";
pub const DEFAULT_LOG_FILTER: &str = "warn";
const APP_DIR_NAME: &str = "couch-planner";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("No platform data directory found; set COUCH_PLANNER_DB to a database path")]
  NoDataDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
  pub database_path: PathBuf,
  pub log_filter: String,
}

impl AppConfig {
  /// Load `.env` (if present), then read the environment
  pub fn load() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();
    Self::from_env()
  }

  pub fn from_env() -> Result<Self, ConfigError> {
    let database_path = match env::var_os(DB_ENV).filter(|v| !v.is_empty()) {
      Some(path) => PathBuf::from(path),
      None => default_database_path()?,
    };
    let log_filter = env::var(LOG_ENV)
      .ok()
      .map(|v| v.trim().to_string())
      .filter(|v| !v.is_empty())
      .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    Ok(Self {
      database_path,
      log_filter,
    })
  }
}

/// `<data dir>/couch-planner/couch-planner.db`
pub fn default_database_path() -> Result<PathBuf, ConfigError> {
  dirs::data_dir()
    .map(|dir| dir.join(APP_DIR_NAME).join(DB_FILE_NAME))
    .ok_or(ConfigError::NoDataDir)
}
