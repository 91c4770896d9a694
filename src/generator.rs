//! Plan Generator
//!
//! Builds the full, ordered list of training sessions from program settings.
//! Sessions come out undated; the scheduler assigns calendar days.
//!
//! Each session sits at a progress ratio `r` in [0, 1] (its position among all
//! sessions). Weeks fall into three phases:
//! - intervals: short run/walk repeats measured in seconds
//! - blocks: longer run/walk blocks measured in minutes
//! - continuous: a single run sized to the target distance
//!
//! The target distance is a straight line from the starting distance to the
//! goal. The pace-derived distance of a run/walk workout is kept apart as an
//! estimate and never printed as the target.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{ProgramSettings, Session};

const INTERVAL_RUN_SECONDS: (f64, f64) = (60.0, 300.0);
const INTERVAL_WALK_SECONDS: (f64, f64) = (120.0, 60.0);
const INTERVAL_REPEATS: (f64, f64) = (8.0, 3.0);
const MIN_INTERVAL_REPEATS: u32 = 3;

const BLOCK_RUN_MINUTES: (f64, f64) = (3.0, 12.0);
const BLOCK_WALK_MINUTES: (f64, f64) = (3.0, 1.0);
const MIN_BLOCK_WALK_MINUTES: u32 = 1;
const BLOCK_REPEATS: u32 = 3;

// ---------------------------------------------------------------------------
/// Phase: which kind of workout a week prescribes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Intervals,
    Blocks,
    Continuous,
}

impl Phase {
    /// Intervals up to ceil(30%) of the weeks, blocks up to ceil(60%),
    /// continuous after that
    pub fn for_week(week: u32, program_weeks: u32) -> Self {
        let intervals_end = (program_weeks * 3).div_ceil(10);
        let blocks_end = (program_weeks * 6).div_ceil(10);
        if week <= intervals_end {
            Self::Intervals
        } else if week <= blocks_end {
            Self::Blocks
        } else {
            Self::Continuous
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Intervals => write!(f, "intervals"),
            Self::Blocks => write!(f, "blocks"),
            Self::Continuous => write!(f, "continuous"),
        }
    }
}

// ---------------------------------------------------------------------------
/// Workout: the structure of one session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Workout {
    Intervals {
        run_seconds: u32,
        walk_seconds: u32,
        repeats: u32,
    },
    Blocks {
        run_minutes: u32,
        walk_minutes: u32,
        repeats: u32,
    },
    Continuous {
        run_minutes: u32,
    },
}

impl Workout {
    /// Total (running, walking) time in hours
    pub fn hours(&self) -> (f64, f64) {
        match *self {
            Workout::Intervals {
                run_seconds,
                walk_seconds,
                repeats,
            } => (
                (run_seconds * repeats) as f64 / 3600.0,
                (walk_seconds * repeats) as f64 / 3600.0,
            ),
            Workout::Blocks {
                run_minutes,
                walk_minutes,
                repeats,
            } => (
                (run_minutes * repeats) as f64 / 60.0,
                (walk_minutes * repeats) as f64 / 60.0,
            ),
            Workout::Continuous { run_minutes } => (run_minutes as f64 / 60.0, 0.0),
        }
    }
}

// ---------------------------------------------------------------------------
/// Prescription: everything derived for one (week, day)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub week: u32,
    pub day: u32,
    pub phase: Phase,
    /// Position along the program, 0.0 ..= 1.0
    pub progress: f64,
    pub workout: Workout,
    /// Straight-line target between starting and goal distance (km)
    pub target_km: f64,
    /// Distance covered at the configured walking/running speeds (km)
    pub estimated_km: f64,
}

impl Prescription {
    /// Session description text
    pub fn describe(&self) -> String {
        let km = self.target_km;
        match self.workout {
            Workout::Intervals {
                run_seconds,
                walk_seconds,
                repeats,
            } => format!(
                "{}s run, {}s walk ({}x) - Target: {:.1}km",
                run_seconds, walk_seconds, repeats, km
            ),
            Workout::Blocks {
                run_minutes,
                walk_minutes,
                repeats,
            } => format!(
                "{}min run, {}min walk ({}x) - Target: {:.1}km",
                run_minutes, walk_minutes, repeats, km
            ),
            Workout::Continuous { run_minutes } => {
                format!("{}min continuous run - Target: {:.1}km", run_minutes, km)
            }
        }
    }

    pub fn to_session(&self) -> Session {
        Session::new(self.week, self.day, self.describe())
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Progress ratio of the session at `index` among `total` sessions.
/// A single-session program sits at 0.
pub fn progress_ratio(index: usize, total: usize) -> f64 {
    if total <= 1 {
        0.0
    } else {
        index as f64 / (total - 1) as f64
    }
}

/// Prescription for one (week, day); None outside the program grid
pub fn prescribe(settings: &ProgramSettings, week: u32, day: u32) -> Option<Prescription> {
    let in_grid = (1..=settings.program_weeks).contains(&week)
        && (1..=settings.training_days_per_week).contains(&day);
    if !in_grid {
        return None;
    }
    let index = (week - 1) as usize * settings.training_days_per_week as usize + (day - 1) as usize;
    Some(prescribe_at(settings, week, day, index))
}

fn prescribe_at(settings: &ProgramSettings, week: u32, day: u32, index: usize) -> Prescription {
    let r = progress_ratio(index, settings.total_sessions());
    let phase = Phase::for_week(week, settings.program_weeks);
    let target_km = lerp(settings.starting_distance, settings.goal_distance, r);

    let workout = match phase {
        Phase::Intervals => Workout::Intervals {
            run_seconds: ceil_u32(lerp(INTERVAL_RUN_SECONDS.0, INTERVAL_RUN_SECONDS.1, r)),
            walk_seconds: ceil_u32(lerp(INTERVAL_WALK_SECONDS.0, INTERVAL_WALK_SECONDS.1, r)),
            repeats: ceil_u32(lerp(INTERVAL_REPEATS.0, INTERVAL_REPEATS.1, r))
                .max(MIN_INTERVAL_REPEATS),
        },
        Phase::Blocks => Workout::Blocks {
            run_minutes: ceil_u32(lerp(BLOCK_RUN_MINUTES.0, BLOCK_RUN_MINUTES.1, r)),
            walk_minutes: ceil_u32(lerp(BLOCK_WALK_MINUTES.0, BLOCK_WALK_MINUTES.1, r))
                .max(MIN_BLOCK_WALK_MINUTES),
            repeats: BLOCK_REPEATS,
        },
        Phase::Continuous => Workout::Continuous {
            run_minutes: ceil_u32(target_km / settings.running_speed * 60.0),
        },
    };

    let (run_hours, walk_hours) = workout.hours();
    let estimated_km = run_hours * settings.running_speed + walk_hours * settings.walking_speed;

    Prescription {
        week,
        day,
        phase,
        progress: r,
        workout,
        target_km,
        estimated_km,
    }
}

/// Build every session of the program, ordered by (week, day).
/// Zero weeks or zero days per week gives an empty plan.
pub fn generate(settings: &ProgramSettings) -> Vec<Session> {
    let mut sessions = Vec::with_capacity(settings.total_sessions());
    for week in 1..=settings.program_weeks {
        for day in 1..=settings.training_days_per_week {
            let index = sessions.len();
            sessions.push(prescribe_at(settings, week, day, index).to_session());
        }
    }

    log::debug!(
        "Generated {} sessions ({} weeks x {} days)",
        sessions.len(),
        settings.program_weeks,
        settings.training_days_per_week
    );
    sessions
}

/// Build a fresh plan, carrying progress over from `previous` for every
/// (week, day) that still exists. Sessions outside the new grid are dropped.
///
/// Carried: completed, skipped, completed_date, and the scheduled date of
/// completed sessions. Pending sessions come back undated.
pub fn regenerate(settings: &ProgramSettings, previous: &[Session]) -> Vec<Session> {
    let carried: HashMap<(u32, u32), &Session> =
        previous.iter().map(|s| (s.key(), s)).collect();

    let mut sessions = generate(settings);
    let mut preserved = 0;
    for session in &mut sessions {
        let Some(old) = carried.get(&session.key()) else {
            continue;
        };
        session.completed = old.completed;
        session.skipped = old.skipped;
        session.completed_date = old.completed_date;
        if old.completed {
            session.scheduled_date = old.scheduled_date;
        }
        if !old.is_pending() {
            preserved += 1;
        }
    }

    let dropped = previous
        .iter()
        .filter(|s| !s.is_pending())
        .count()
        .saturating_sub(preserved);
    if dropped > 0 {
        log::info!("Plan shrank: dropped progress on {} sessions", dropped);
    }
    sessions
}

fn lerp(from: f64, to: f64, r: f64) -> f64 {
    from + (to - from) * r
}

fn ceil_u32(value: f64) -> u32 {
    value.ceil().max(0.0) as u32
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
