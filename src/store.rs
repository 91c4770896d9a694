//! SQLite persistence for program settings and the session list
//!
//! Dates are stored as `YYYY-MM-DD` text and read back by calendar day.
//! Rest days are stored as a JSON array of weekday indices.

use chrono::{NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::collections::BTreeSet;

use crate::models::{parse_calendar_date, ProgramSettings, Session};

// ---------------------------------------------------------------------------
/// Error Types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Could not prepare database location: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode rest days: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Load the stored settings; None before the first save
pub async fn load_settings(pool: &SqlitePool) -> Result<Option<ProgramSettings>, StoreError> {
    let row = sqlx::query(
        r#"
        SELECT
            start_date, goal_distance, starting_distance, walking_speed,
            running_speed, program_weeks, training_days_per_week, rest_days_json
        FROM program_settings
        WHERE id = 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(settings_from_row).transpose()
}

/// Insert or replace the settings row
pub async fn save_settings(
    pool: &SqlitePool,
    settings: &ProgramSettings,
) -> Result<(), StoreError> {
    let mut conn = pool.acquire().await?;
    write_settings(&mut conn, settings).await
}

fn settings_from_row(row: &SqliteRow) -> Result<ProgramSettings, StoreError> {
    let start_date: String = row.try_get("start_date")?;
    let rest_days_json: String = row.try_get("rest_days_json")?;
    let rest_days: BTreeSet<u8> = serde_json::from_str(&rest_days_json)
        .map_err(|e| StoreError::Corrupt(format!("rest_days_json {:?}: {}", rest_days_json, e)))?;

    Ok(ProgramSettings {
        start_date: date_column("start_date", &start_date)?,
        goal_distance: row.try_get("goal_distance")?,
        starting_distance: row.try_get("starting_distance")?,
        walking_speed: row.try_get("walking_speed")?,
        running_speed: row.try_get("running_speed")?,
        program_weeks: count_column(row, "program_weeks")?,
        training_days_per_week: count_column(row, "training_days_per_week")?,
        rest_days,
    })
}

async fn write_settings(
    conn: &mut SqliteConnection,
    settings: &ProgramSettings,
) -> Result<(), StoreError> {
    let rest_days_json = serde_json::to_string(&settings.rest_days)?;

    sqlx::query(
        r#"
        INSERT INTO program_settings (
            id, start_date, goal_distance, starting_distance, walking_speed,
            running_speed, program_weeks, training_days_per_week, rest_days_json, updated_at
        )
        VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ON CONFLICT(id) DO UPDATE SET
            start_date = excluded.start_date,
            goal_distance = excluded.goal_distance,
            starting_distance = excluded.starting_distance,
            walking_speed = excluded.walking_speed,
            running_speed = excluded.running_speed,
            program_weeks = excluded.program_weeks,
            training_days_per_week = excluded.training_days_per_week,
            rest_days_json = excluded.rest_days_json,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(settings.start_date.to_string())
    .bind(settings.goal_distance)
    .bind(settings.starting_distance)
    .bind(settings.walking_speed)
    .bind(settings.running_speed)
    .bind(i64::from(settings.program_weeks))
    .bind(i64::from(settings.training_days_per_week))
    .bind(&rest_days_json)
    .bind(Utc::now().to_rfc3339())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Load every session ordered by (week, day)
pub async fn load_sessions(pool: &SqlitePool) -> Result<Vec<Session>, StoreError> {
    let rows = sqlx::query(
        r#"
        SELECT
            week, day, title, description, completed, skipped,
            scheduled_date, completed_date
        FROM sessions
        ORDER BY week, day
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(session_from_row).collect()
}

/// Replace the stored session list wholesale
pub async fn save_sessions(pool: &SqlitePool, sessions: &[Session]) -> Result<(), StoreError> {
    let mut tx = pool.begin().await?;
    write_sessions(&mut tx, sessions).await?;
    tx.commit().await?;
    Ok(())
}

/// Save settings and sessions together
pub async fn save_plan(
    pool: &SqlitePool,
    settings: &ProgramSettings,
    sessions: &[Session],
) -> Result<(), StoreError> {
    let mut tx = pool.begin().await?;
    write_settings(&mut tx, settings).await?;
    write_sessions(&mut tx, sessions).await?;
    tx.commit().await?;

    log::debug!("Saved plan with {} sessions", sessions.len());
    Ok(())
}

fn session_from_row(row: &SqliteRow) -> Result<Session, StoreError> {
    let scheduled_date: Option<String> = row.try_get("scheduled_date")?;
    let completed_date: Option<String> = row.try_get("completed_date")?;

    Ok(Session {
        week: count_column(row, "week")?,
        day: count_column(row, "day")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        completed: row.try_get("completed")?,
        skipped: row.try_get("skipped")?,
        scheduled_date: scheduled_date
            .map(|s| date_column("scheduled_date", &s))
            .transpose()?,
        completed_date: completed_date
            .map(|s| date_column("completed_date", &s))
            .transpose()?,
    })
}

async fn write_sessions(
    conn: &mut SqliteConnection,
    sessions: &[Session],
) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM sessions")
        .execute(&mut *conn)
        .await?;

    for session in sessions {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                week, day, title, description, completed, skipped,
                scheduled_date, completed_date
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(i64::from(session.week))
        .bind(i64::from(session.day))
        .bind(&session.title)
        .bind(&session.description)
        .bind(session.completed)
        .bind(session.skipped)
        .bind(session.scheduled_date.map(|d| d.to_string()))
        .bind(session.completed_date.map(|d| d.to_string()))
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Column helpers
// ---------------------------------------------------------------------------

fn date_column(column: &str, value: &str) -> Result<NaiveDate, StoreError> {
    parse_calendar_date(value)
        .ok_or_else(|| StoreError::Corrupt(format!("{} is not a date: {:?}", column, value)))
}

fn count_column(row: &SqliteRow, column: &str) -> Result<u32, StoreError> {
    let value: i64 = row.try_get(column)?;
    u32::try_from(value)
        .map_err(|_| StoreError::Corrupt(format!("{} out of range: {}", column, value)))
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
