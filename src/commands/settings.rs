//! Tauri commands for program settings

use std::sync::Arc;
use tauri::State;

use crate::db::AppState;
use crate::models::ProgramSettings;
use crate::plan::{self, Plan};

/// Get the current settings (defaults on first launch)
#[tauri::command]
pub async fn get_program_settings(
  state: State<'_, Arc<AppState>>,
) -> Result<ProgramSettings, String> {
  let _guard = state.plan_lock.lock().await;
  plan::load_or_init_plan(&state.db)
    .await
    .map(|plan| plan.settings)
    .map_err(|e| format!("Failed to get settings: {}", e))
}

/// Save settings; regenerates or reschedules the plan when they change it
#[tauri::command]
pub async fn update_program_settings(
  state: State<'_, Arc<AppState>>,
  settings: ProgramSettings,
) -> Result<Plan, String> {
  let _guard = state.plan_lock.lock().await;
  plan::update_settings(&state.db, settings)
    .await
    .map_err(|e| format!("Failed to update settings: {}", e))
}
