//! Progress summary derived from the session list

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Session;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekProgress {
    pub week: u32,
    pub total: usize,
    pub completed: usize,
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextSession {
    pub week: u32,
    pub day: u32,
    pub title: String,
    pub scheduled_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub total: usize,
    pub completed: usize,
    pub skipped: usize,
    pub remaining: usize,
    pub percent_complete: u32,
    /// Lowest week with a session still to run
    pub current_week: u32,
    pub weeks: Vec<WeekProgress>,
    pub next_session: Option<NextSession>,
}

impl ProgressSummary {
    pub fn compute(sessions: &[Session], program_weeks: u32) -> Self {
        let total = sessions.len();
        let completed = sessions.iter().filter(|s| s.completed).count();
        let skipped = sessions.iter().filter(|s| s.skipped && !s.completed).count();

        let weeks = (1..=program_weeks)
            .map(|week| {
                let in_week: Vec<&Session> = sessions.iter().filter(|s| s.week == week).collect();
                let done = in_week.iter().filter(|s| s.completed).count();
                WeekProgress {
                    week,
                    total: in_week.len(),
                    completed: done,
                    percent: percent(done, in_week.len()),
                }
            })
            .collect();

        let next = sessions.iter().find(|s| s.is_pending());
        let current_week = match next {
            Some(session) => session.week,
            None => sessions.iter().map(|s| s.week).max().unwrap_or(1),
        };

        Self {
            total,
            completed,
            skipped,
            remaining: total - completed - skipped,
            percent_complete: percent(completed, total),
            current_week,
            weeks,
            next_session: next.map(|s| NextSession {
                week: s.week,
                day: s.day,
                title: s.title.clone(),
                scheduled_date: s.scheduled_date,
            }),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.total > 0 && self.remaining == 0
    }
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        0
    } else {
        (part as f64 / whole as f64 * 100.0).round() as u32
    }
}
