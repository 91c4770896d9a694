//! Tauri commands for the training plan and its sessions

use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tauri::State;

use crate::db::AppState;
use crate::plan::{self, Plan};

/// Get the plan, creating it on first launch
#[tauri::command]
pub async fn get_plan(state: State<'_, Arc<AppState>>) -> Result<Plan, String> {
  let _guard = state.plan_lock.lock().await;
  plan::load_or_init_plan(&state.db)
    .await
    .map_err(|e| format!("Failed to load plan: {}", e))
}

/// Re-date every pending session from the start date
#[tauri::command]
pub async fn schedule_all_sessions(state: State<'_, Arc<AppState>>) -> Result<Plan, String> {
  let _guard = state.plan_lock.lock().await;
  plan::schedule_all_sessions(&state.db)
    .await
    .map_err(|e| format!("Failed to schedule sessions: {}", e))
}

/// Skip a session and reschedule the rest
#[tauri::command]
pub async fn skip_session(
  state: State<'_, Arc<AppState>>,
  week: u32,
  day: u32,
) -> Result<Plan, String> {
  let _guard = state.plan_lock.lock().await;
  plan::skip_session(&state.db, week, day)
    .await
    .map_err(|e| format!("Failed to skip session: {}", e))
}

/// Mark a session done (today unless a date is given)
#[tauri::command]
pub async fn complete_session(
  state: State<'_, Arc<AppState>>,
  week: u32,
  day: u32,
  on: Option<NaiveDate>,
) -> Result<Plan, String> {
  let _guard = state.plan_lock.lock().await;
  let on = on.unwrap_or_else(|| Local::now().date_naive());
  plan::complete_session(&state.db, week, day, on)
    .await
    .map_err(|e| format!("Failed to complete session: {}", e))
}

#[tauri::command]
pub async fn reopen_session(
  state: State<'_, Arc<AppState>>,
  week: u32,
  day: u32,
) -> Result<Plan, String> {
  let _guard = state.plan_lock.lock().await;
  plan::reopen_session(&state.db, week, day)
    .await
    .map_err(|e| format!("Failed to reopen session: {}", e))
}

/// Move a pending session to a chosen date
#[tauri::command]
pub async fn move_session(
  state: State<'_, Arc<AppState>>,
  week: u32,
  day: u32,
  date: NaiveDate,
) -> Result<Plan, String> {
  let _guard = state.plan_lock.lock().await;
  plan::move_session(&state.db, week, day, date)
    .await
    .map_err(|e| format!("Failed to move session: {}", e))
}

/// Discard progress and rebuild the plan from its settings
#[tauri::command]
pub async fn reset_plan(state: State<'_, Arc<AppState>>) -> Result<Plan, String> {
  let _guard = state.plan_lock.lock().await;
  plan::reset_plan(&state.db)
    .await
    .map_err(|e| format!("Failed to reset plan: {}", e))
}
