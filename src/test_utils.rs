//! Test utilities and helpers for unit and integration testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Settings and plan fixtures

use crate::models::ProgramSettings;
use crate::plan::Plan;
use crate::store;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use std::collections::BTreeSet;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  crate::db::run_migrations(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Store a freshly built and scheduled plan for `settings`
pub async fn seed_test_plan(pool: &SqlitePool, settings: &ProgramSettings) -> Plan {
  let plan = Plan::build(settings.clone()).expect("Fixture settings should be valid");
  store::save_plan(pool, &plan.settings, &plan.sessions)
    .await
    .expect("Failed to seed plan");
  plan
}

/// ---------------------------------------------------------------------------
/// Fixtures
/// ---------------------------------------------------------------------------

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(year, month, day).expect("Fixture date should be valid")
}

/// 2 weeks x 2 days, weekends off, starting Monday 2024-01-01
pub fn mock_settings() -> ProgramSettings {
  ProgramSettings {
    start_date: date(2024, 1, 1),
    goal_distance: 5.0,
    starting_distance: 0.0,
    walking_speed: 5.0,
    running_speed: 9.0,
    program_weeks: 2,
    training_days_per_week: 2,
    rest_days: BTreeSet::from([0, 6]),
  }
}
