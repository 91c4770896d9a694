use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::fs;
use std::path::Path;
use tokio::sync::Mutex;

use crate::store::StoreError;

pub type DbPool = SqlitePool;

/// Application state holding the database connection pool
pub struct AppState {
  pub db: DbPool,
  /// Plan mutations are load-modify-save; one at a time
  pub plan_lock: Mutex<()>,
}

impl AppState {
  pub fn new(db: DbPool) -> Self {
    Self {
      db,
      plan_lock: Mutex::new(()),
    }
  }
}

/// Get the path to the database file inside the Tauri app data directory
#[cfg(feature = "desktop")]
pub fn get_app_db_path<R: tauri::Runtime>(
  app: &tauri::AppHandle<R>,
) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
  use tauri::Manager;

  let data_dir = app
    .path()
    .app_data_dir()
    .map_err(|e| format!("Failed to get app data dir: {}", e))?;

  Ok(data_dir.join(crate::config::DB_FILE_NAME))
}

/// Open (creating if needed) the database file and run migrations
pub async fn initialize_db(db_path: &Path) -> Result<DbPool, StoreError> {
  if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent)?;
  }
  let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

  log::info!("Initializing database at: {}", db_path.display());

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;

  run_migrations(&pool).await?;

  log::info!("Database initialized successfully");

  Ok(pool)
}

pub async fn run_migrations(pool: &DbPool) -> Result<(), StoreError> {
  sqlx::migrate!("./migrations").run(pool).await?;
  Ok(())
}
