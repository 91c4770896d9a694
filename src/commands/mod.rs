pub mod plan;
pub mod settings;

use crate::db::AppState;
use crate::plan::load_or_init_plan;
use crate::progress::ProgressSummary;
use std::sync::Arc;
use tauri::State;

#[tauri::command]
pub async fn get_progress(
  state: State<'_, Arc<AppState>>,
) -> Result<ProgressSummary, String> {
  let _guard = state.plan_lock.lock().await;
  load_or_init_plan(&state.db)
    .await
    .map(|plan| plan.progress())
    .map_err(|e| format!("Failed to load progress: {}", e))
}
