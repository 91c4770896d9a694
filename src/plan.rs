//! Plan actions
//!
//! Each action loads the stored plan, applies one core operation (generator or
//! scheduler) and saves the result. Callers serialize actions on the same plan.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::generator::{generate, regenerate};
use crate::models::{ProgramSettings, Session, SettingsError};
use crate::progress::ProgressSummary;
use crate::scheduler::{self, schedule_all, ScheduleError};
use crate::store::{self, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Scheduling failed: {0}")]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Settings plus the sessions generated from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub settings: ProgramSettings,
    pub sessions: Vec<Session>,
}

impl Plan {
    /// Generate and bulk-schedule a fresh plan
    pub fn build(settings: ProgramSettings) -> Result<Self, PlanError> {
        settings.validate()?;
        let mut sessions = generate(&settings);
        schedule_all(&mut sessions, &settings)?;
        Ok(Self { settings, sessions })
    }

    pub fn progress(&self) -> ProgressSummary {
        ProgressSummary::compute(&self.sessions, self.settings.program_weeks)
    }

    pub fn week(&self, week: u32) -> impl Iterator<Item = &Session> {
        self.sessions.iter().filter(move |s| s.week == week)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load the stored plan, creating one from default settings on first use
pub async fn load_or_init_plan(pool: &SqlitePool) -> Result<Plan, PlanError> {
    let settings = store::load_settings(pool).await?;
    let sessions = store::load_sessions(pool).await?;

    match settings {
        Some(settings) if !sessions.is_empty() => Ok(Plan { settings, sessions }),
        stored => {
            let plan = Plan::build(stored.unwrap_or_default())?;
            store::save_plan(pool, &plan.settings, &plan.sessions).await?;
            log::info!(
                "Created a {}-week plan starting {}",
                plan.settings.program_weeks,
                plan.settings.start_date
            );
            Ok(plan)
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Store new settings, rebuilding and rescheduling the plan as needed.
///
/// - plan-shaping fields changed: regenerate (progress kept by identity)
///   and reschedule
/// - start date or rest days changed: reschedule
/// - anything else: store only
pub async fn update_settings(pool: &SqlitePool, new: ProgramSettings) -> Result<Plan, PlanError> {
    new.validate()?;
    let Plan {
        settings: old,
        mut sessions,
    } = load_or_init_plan(pool).await?;

    let reshaped = old.reshapes_plan(&new);
    if reshaped {
        sessions = regenerate(&new, &sessions);
        log::info!(
            "Plan regenerated: {} weeks x {} days",
            new.program_weeks,
            new.training_days_per_week
        );
    }
    if reshaped || old.start_date != new.start_date || old.rest_days != new.rest_days {
        schedule_all(&mut sessions, &new)?;
    }

    store::save_plan(pool, &new, &sessions).await?;
    Ok(Plan {
        settings: new,
        sessions,
    })
}

/// Throw away all progress and start the plan over from its settings
pub async fn reset_plan(pool: &SqlitePool) -> Result<Plan, PlanError> {
    let settings = match store::load_settings(pool).await? {
        Some(settings) => settings,
        None => ProgramSettings::default(),
    };
    let plan = Plan::build(settings)?;
    store::save_plan(pool, &plan.settings, &plan.sessions).await?;
    log::info!("Plan reset");
    Ok(plan)
}

// ---------------------------------------------------------------------------
// Session actions
// ---------------------------------------------------------------------------

/// Re-date every pending session from the start date
pub async fn schedule_all_sessions(pool: &SqlitePool) -> Result<Plan, PlanError> {
    mutate_sessions(pool, |sessions, settings| {
        schedule_all(sessions, settings)?;
        Ok(true)
    })
    .await
}

/// Skip a session and re-pack the ones after it
pub async fn skip_session(pool: &SqlitePool, week: u32, day: u32) -> Result<Plan, PlanError> {
    mutate_sessions(pool, |sessions, settings| {
        Ok(scheduler::skip(sessions, settings, week, day)?)
    })
    .await
}

/// Mark a session completed on the given day
pub async fn complete_session(
    pool: &SqlitePool,
    week: u32,
    day: u32,
    on: NaiveDate,
) -> Result<Plan, PlanError> {
    mutate_sessions(pool, |sessions, _| {
        Ok(scheduler::set_completed(sessions, week, day, Some(on)))
    })
    .await
}

/// Undo a completion
pub async fn reopen_session(pool: &SqlitePool, week: u32, day: u32) -> Result<Plan, PlanError> {
    mutate_sessions(pool, |sessions, _| {
        Ok(scheduler::set_completed(sessions, week, day, None))
    })
    .await
}

/// Put a pending session on a specific date
pub async fn move_session(
    pool: &SqlitePool,
    week: u32,
    day: u32,
    date: NaiveDate,
) -> Result<Plan, PlanError> {
    mutate_sessions(pool, |sessions, settings| {
        Ok(scheduler::move_to(sessions, settings, week, day, date)?)
    })
    .await
}

pub async fn progress_summary(pool: &SqlitePool) -> Result<ProgressSummary, PlanError> {
    Ok(load_or_init_plan(pool).await?.progress())
}

/// Load, apply `mutate`, and save when it reports a change
async fn mutate_sessions<F>(pool: &SqlitePool, mutate: F) -> Result<Plan, PlanError>
where
    F: FnOnce(&mut Vec<Session>, &ProgramSettings) -> Result<bool, PlanError>,
{
    let mut plan = load_or_init_plan(pool).await?;
    if mutate(&mut plan.sessions, &plan.settings)? {
        store::save_sessions(pool, &plan.sessions).await?;
    }
    Ok(plan)
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
