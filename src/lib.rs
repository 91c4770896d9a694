pub mod config;
pub mod db;
pub mod generator;
pub mod logging;
pub mod models;
pub mod plan;
pub mod progress;
pub mod scheduler;
pub mod store;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(test)]
mod test_utils;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
  use db::AppState;
  use std::sync::Arc;
  use tauri::Manager;

  // Load environment variables from .env file
  dotenvy::dotenv().ok();
  let log_filter = config::AppConfig::from_env()
    .map(|c| c.log_filter)
    .unwrap_or_else(|_| config::DEFAULT_LOG_FILTER.to_string());
  logging::init(&log_filter);

  tauri::Builder::default()
    .plugin(tauri_plugin_opener::init())
    .setup(|app| {
      // Initialize database
      let app_handle = app.handle().clone();
      let db_path = match std::env::var_os(config::DB_ENV).filter(|v| !v.is_empty()) {
        Some(path) => std::path::PathBuf::from(path),
        None => db::get_app_db_path(&app_handle)?,
      };
      tauri::async_runtime::block_on(async move {
        match db::initialize_db(&db_path).await {
          Ok(pool) => {
            app_handle.manage(Arc::new(AppState::new(pool)));
            log::info!("Database ready");
          }
          Err(e) => {
            log::error!("Failed to initialize database: {}", e);
          }
        }
      });
      Ok(())
    })
    .invoke_handler(tauri::generate_handler![
      commands::get_progress,
      // Settings commands
      commands::settings::get_program_settings,
      commands::settings::update_program_settings,
      // Plan commands
      commands::plan::get_plan,
      commands::plan::schedule_all_sessions,
      commands::plan::skip_session,
      commands::plan::complete_session,
      commands::plan::reopen_session,
      commands::plan::move_session,
      commands::plan::reset_plan,
    ])
    .run(tauri::generate_context!())
    .expect("error while running tauri application");
}
