//! Scheduler
//!
//! Assigns calendar days to pending sessions in plan order, stepping over the
//! configured rest days.
//!
//! - `schedule_all` packs every pending session from the program start date
//! - `skip` marks one session skipped and re-packs the pending sessions after
//!   it, continuing from the latest date that stays put
//!
//! Completed and skipped sessions never get a new date. Both entry points
//! work out every date before writing any, so an error leaves the sessions
//! untouched.

use chrono::{Days, NaiveDate};

use crate::models::{find_session, ProgramSettings, Session, SessionStatus};

/// Consecutive rest days tolerated before the rest-day set is treated as
/// covering the whole week
pub const REST_DAY_SEARCH_LIMIT: u32 = 7;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("No open weekday within {searched} days of {from}: rest days cover the whole week")]
    NoOpenWeekday { from: NaiveDate, searched: u32 },

    #[error("Week {week}, Day {day} is {status} and cannot be rescheduled")]
    NotPending {
        week: u32,
        day: u32,
        status: SessionStatus,
    },

    #[error("Schedule runs past the last representable date")]
    DateOutOfRange,
}

// ---------------------------------------------------------------------------
/// Cursor: the next candidate day
// ---------------------------------------------------------------------------

struct Cursor<'a> {
    date: NaiveDate,
    settings: &'a ProgramSettings,
}

impl<'a> Cursor<'a> {
    fn new(date: NaiveDate, settings: &'a ProgramSettings) -> Self {
        Self { date, settings }
    }

    /// Take the first open day at or after the cursor and move past it
    fn next_slot(&mut self) -> Result<NaiveDate, ScheduleError> {
        let from = self.date;
        let mut searched = 0;
        while self.settings.is_rest_day(self.date) {
            if searched == REST_DAY_SEARCH_LIMIT {
                return Err(ScheduleError::NoOpenWeekday { from, searched });
            }
            self.date = next_day(self.date)?;
            searched += 1;
        }
        let slot = self.date;
        self.date = next_day(slot)?;
        Ok(slot)
    }
}

fn next_day(date: NaiveDate) -> Result<NaiveDate, ScheduleError> {
    date.checked_add_days(Days::new(1))
        .ok_or(ScheduleError::DateOutOfRange)
}

// ---------------------------------------------------------------------------
// Bulk scheduling
// ---------------------------------------------------------------------------

/// Date every pending session from the start date, one per open day.
/// Returns how many sessions were dated.
pub fn schedule_all(
    sessions: &mut [Session],
    settings: &ProgramSettings,
) -> Result<usize, ScheduleError> {
    let mut cursor = Cursor::new(settings.start_date, settings);
    let dates = sessions
        .iter()
        .map(|s| {
            if s.is_pending() {
                cursor.next_slot().map(Some)
            } else {
                Ok(None)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut assigned = 0;
    for (session, date) in sessions.iter_mut().zip(dates) {
        if let Some(date) = date {
            session.scheduled_date = Some(date);
            assigned += 1;
        }
    }

    log::debug!(
        "Scheduled {} sessions from {}",
        assigned,
        settings.start_date
    );
    Ok(assigned)
}

// ---------------------------------------------------------------------------
// Incremental rescheduling
// ---------------------------------------------------------------------------

/// Mark (week, day) skipped, clear its date and re-pack the pending sessions
/// that follow it.
///
/// The re-packed sessions start one day after the latest date among the
/// sessions that keep theirs (earlier pending ones and completed ones), or at
/// the start date when none is dated. The skipped slot is not back-filled.
///
/// Returns `Ok(false)` without touching anything when no such session exists
/// or it is already completed.
pub fn skip(
    sessions: &mut [Session],
    settings: &ProgramSettings,
    week: u32,
    day: u32,
) -> Result<bool, ScheduleError> {
    let Some(index) = find_session(sessions, week, day) else {
        log::debug!("Skip ignored: no session for week {}, day {}", week, day);
        return Ok(false);
    };
    if sessions[index].completed {
        log::warn!("Skip ignored: week {}, day {} is already completed", week, day);
        return Ok(false);
    }

    let rescheduled = |i: usize, s: &Session| i > index && s.is_pending();

    let anchor = sessions
        .iter()
        .enumerate()
        .filter(|&(i, s)| i != index && !s.skipped && !rescheduled(i, s))
        .filter_map(|(_, s)| s.scheduled_date)
        .max();
    let start = match anchor {
        Some(latest) => next_day(latest)?,
        None => settings.start_date,
    };

    let mut cursor = Cursor::new(start, settings);
    let dates = sessions
        .iter()
        .enumerate()
        .filter(|&(i, s)| rescheduled(i, s))
        .map(|(i, _)| cursor.next_slot().map(|date| (i, date)))
        .collect::<Result<Vec<_>, _>>()?;

    let target = &mut sessions[index];
    target.skipped = true;
    target.scheduled_date = None;
    let moved = dates.len();
    for (i, date) in dates {
        sessions[i].scheduled_date = Some(date);
    }

    log::info!(
        "Skipped week {}, day {}; rescheduled {} sessions from {}",
        week,
        day,
        moved,
        start
    );
    Ok(true)
}

// ---------------------------------------------------------------------------
// Single-session updates
// ---------------------------------------------------------------------------

/// Put one pending session on a date of the user's choosing.
/// A rest day is allowed here; the caller picked it deliberately.
pub fn move_to(
    sessions: &mut [Session],
    settings: &ProgramSettings,
    week: u32,
    day: u32,
    date: NaiveDate,
) -> Result<bool, ScheduleError> {
    let Some(index) = find_session(sessions, week, day) else {
        return Ok(false);
    };
    let session = &mut sessions[index];
    if !session.is_pending() {
        return Err(ScheduleError::NotPending {
            week,
            day,
            status: session.status(date),
        });
    }

    if settings.is_rest_day(date) {
        log::info!("Week {}, Day {} moved onto a rest day ({})", week, day, date);
    }
    session.scheduled_date = Some(date);
    Ok(true)
}

/// Mark a session done on `on`, or reopen it with `on = None`.
/// Completing a skipped session clears the skip.
pub fn set_completed(
    sessions: &mut [Session],
    week: u32,
    day: u32,
    on: Option<NaiveDate>,
) -> bool {
    let Some(index) = find_session(sessions, week, day) else {
        return false;
    };
    let session = &mut sessions[index];
    match on {
        Some(date) => {
            session.completed = true;
            session.skipped = false;
            session.completed_date = Some(date);
        }
        None => {
            session.completed = false;
            session.completed_date = None;
        }
    }
    true
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate;
    use crate::test_utils::{date, mock_settings};
    use chrono::Datelike;
    use std::collections::BTreeSet;

    fn dates_of(sessions: &[Session]) -> Vec<Option<NaiveDate>> {
        sessions.iter().map(|s| s.scheduled_date).collect()
    }

    /// Four sessions dated 2024-01-01 .. 2024-01-04, no rest days
    fn consecutive_four() -> (Vec<Session>, ProgramSettings) {
        let mut settings = mock_settings();
        settings.rest_days = BTreeSet::new();
        let mut sessions = generate(&settings);
        schedule_all(&mut sessions, &settings).unwrap();
        (sessions, settings)
    }

    #[test]
    fn test_schedule_all_consecutive_weekdays() {
        let settings = mock_settings();
        let mut sessions = generate(&settings);

        let assigned = schedule_all(&mut sessions, &settings).unwrap();

        assert_eq!(assigned, 4);
        assert_eq!(
            dates_of(&sessions),
            vec![
                Some(date(2024, 1, 1)),
                Some(date(2024, 1, 2)),
                Some(date(2024, 1, 3)),
                Some(date(2024, 1, 4)),
            ]
        );
    }

    #[test]
    fn test_schedule_all_steps_over_weekend() {
        let mut settings = mock_settings();
        settings.start_date = date(2024, 1, 5); // Friday
        let mut sessions = generate(&settings);

        schedule_all(&mut sessions, &settings).unwrap();

        assert_eq!(sessions[0].scheduled_date, Some(date(2024, 1, 5)));
        assert_eq!(sessions[1].scheduled_date, Some(date(2024, 1, 8)));
        assert_eq!(sessions[2].scheduled_date, Some(date(2024, 1, 9)));
        assert_eq!(sessions[3].scheduled_date, Some(date(2024, 1, 10)));
    }

    #[test]
    fn test_schedule_all_never_lands_on_rest_day() {
        let mut settings = mock_settings();
        settings.program_weeks = 9;
        settings.training_days_per_week = 5;
        settings.rest_days = BTreeSet::from([0, 3, 6]);
        settings.start_date = date(2024, 2, 28);
        let mut sessions = generate(&settings);

        schedule_all(&mut sessions, &settings).unwrap();

        for session in &sessions {
            let day = session.scheduled_date.expect("Every session should be dated");
            assert!(
                !settings.rest_days.contains(&(day.weekday().num_days_from_sunday() as u8)),
                "{} landed on rest day {}",
                session.title,
                day
            );
        }
    }

    #[test]
    fn test_schedule_all_is_idempotent() {
        let mut settings = mock_settings();
        settings.program_weeks = 6;
        settings.start_date = date(2024, 3, 9);
        let mut sessions = generate(&settings);

        schedule_all(&mut sessions, &settings).unwrap();
        let first = sessions.clone();
        schedule_all(&mut sessions, &settings).unwrap();

        assert_eq!(sessions, first);
    }

    #[test]
    fn test_schedule_all_leaves_done_sessions_alone() {
        let settings = mock_settings();
        let mut sessions = generate(&settings);
        sessions[0].completed = true;
        sessions[0].scheduled_date = Some(date(2023, 12, 20));
        sessions[2].skipped = true;

        let assigned = schedule_all(&mut sessions, &settings).unwrap();

        assert_eq!(assigned, 2);
        assert_eq!(sessions[0].scheduled_date, Some(date(2023, 12, 20)));
        assert_eq!(sessions[1].scheduled_date, Some(date(2024, 1, 1)));
        assert_eq!(sessions[2].scheduled_date, None);
        assert_eq!(sessions[3].scheduled_date, Some(date(2024, 1, 2)));
    }

    #[test]
    fn test_schedule_all_without_rest_days_is_back_to_back() {
        let (sessions, _) = consecutive_four();
        let days: Vec<u32> = sessions
            .iter()
            .map(|s| s.scheduled_date.unwrap().day())
            .collect();
        assert_eq!(days, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_all_week_rest_fails_instead_of_looping() {
        let mut settings = mock_settings();
        settings.rest_days = (0..7).collect();
        let mut sessions = generate(&settings);

        let result = schedule_all(&mut sessions, &settings);

        assert!(matches!(
            result,
            Err(ScheduleError::NoOpenWeekday { searched: 7, .. })
        ));
        assert!(sessions.iter().all(|s| s.scheduled_date.is_none()));
    }

    #[test]
    fn test_skip_repacks_following_sessions() {
        let (mut sessions, settings) = consecutive_four();

        let skipped = skip(&mut sessions, &settings, 1, 2).unwrap();

        assert!(skipped);
        assert!(sessions[1].skipped);
        assert_eq!(sessions[1].scheduled_date, None);
        assert_eq!(sessions[0].scheduled_date, Some(date(2024, 1, 1)));
        assert_eq!(sessions[2].scheduled_date, Some(date(2024, 1, 2)));
        assert_eq!(sessions[3].scheduled_date, Some(date(2024, 1, 3)));
    }

    #[test]
    fn test_skip_honors_rest_days() {
        let mut settings = mock_settings();
        settings.start_date = date(2024, 1, 4); // Thursday
        let mut sessions = generate(&settings);
        schedule_all(&mut sessions, &settings).unwrap();
        // Thu 4, Fri 5, Mon 8, Tue 9

        skip(&mut sessions, &settings, 1, 1).unwrap();

        // Nothing stays dated, so re-packing starts at the program start
        assert_eq!(sessions[1].scheduled_date, Some(date(2024, 1, 4)));
        assert_eq!(sessions[2].scheduled_date, Some(date(2024, 1, 5)));
        assert_eq!(sessions[3].scheduled_date, Some(date(2024, 1, 8)));
    }

    #[test]
    fn test_skip_keeps_completed_and_skipped_dates() {
        let mut settings = mock_settings();
        settings.rest_days = BTreeSet::new();
        settings.program_weeks = 3;
        let mut sessions = generate(&settings);
        schedule_all(&mut sessions, &settings).unwrap();
        // Session 5 completed early, ahead of its slot
        sessions[4].completed = true;
        sessions[4].scheduled_date = Some(date(2024, 1, 10));
        sessions[0].skipped = true;
        sessions[0].scheduled_date = None;

        skip(&mut sessions, &settings, 1, 2).unwrap();

        assert_eq!(sessions[0].scheduled_date, None);
        assert_eq!(sessions[4].scheduled_date, Some(date(2024, 1, 10)));
        // Remaining pending sessions continue after the completed one
        assert_eq!(sessions[2].scheduled_date, Some(date(2024, 1, 11)));
        assert_eq!(sessions[3].scheduled_date, Some(date(2024, 1, 12)));
        assert_eq!(sessions[5].scheduled_date, Some(date(2024, 1, 13)));
    }

    #[test]
    fn test_skip_missing_session_is_noop() {
        let (mut sessions, settings) = consecutive_four();
        let before = sessions.clone();

        assert!(!skip(&mut sessions, &settings, 7, 1).unwrap());
        assert_eq!(sessions, before);
    }

    #[test]
    fn test_skip_completed_session_is_noop() {
        let (mut sessions, settings) = consecutive_four();
        sessions[1].completed = true;
        let before = sessions.clone();

        assert!(!skip(&mut sessions, &settings, 1, 2).unwrap());
        assert_eq!(sessions, before);
    }

    #[test]
    fn test_skipped_session_never_redated() {
        let (mut sessions, settings) = consecutive_four();
        skip(&mut sessions, &settings, 1, 2).unwrap();
        skip(&mut sessions, &settings, 2, 1).unwrap();
        schedule_all(&mut sessions, &settings).unwrap();

        assert_eq!(sessions[1].scheduled_date, None);
        assert_eq!(sessions[2].scheduled_date, None);
        assert_eq!(sessions[0].scheduled_date, Some(date(2024, 1, 1)));
        assert_eq!(sessions[3].scheduled_date, Some(date(2024, 1, 2)));
    }

    #[test]
    fn test_skip_all_week_rest_leaves_sessions_untouched() {
        let (mut sessions, mut settings) = consecutive_four();
        settings.rest_days = (0..7).collect();
        let before = sessions.clone();

        let result = skip(&mut sessions, &settings, 1, 2);

        assert_eq!(
            result,
            Err(ScheduleError::NoOpenWeekday {
                from: date(2024, 1, 2),
                searched: REST_DAY_SEARCH_LIMIT,
            })
        );
        assert_eq!(sessions, before);
        assert!(!sessions[1].skipped);
    }

    #[test]
    fn test_schedule_past_last_date_fails_without_writes() {
        let (mut sessions, mut settings) = consecutive_four();
        settings.start_date = NaiveDate::MAX.pred_opt().unwrap();
        let before = sessions.clone();

        let result = schedule_all(&mut sessions, &settings);

        assert_eq!(result, Err(ScheduleError::DateOutOfRange));
        assert_eq!(sessions, before);
    }

    #[test]
    fn test_move_to_pending_session() {
        let (mut sessions, settings) = consecutive_four();

        assert!(move_to(&mut sessions, &settings, 2, 2, date(2024, 1, 20)).unwrap());
        assert_eq!(sessions[3].scheduled_date, Some(date(2024, 1, 20)));

        assert!(!move_to(&mut sessions, &settings, 5, 1, date(2024, 1, 20)).unwrap());
    }

    #[test]
    fn test_move_to_rejects_completed() {
        let (mut sessions, settings) = consecutive_four();
        sessions[0].completed = true;

        let result = move_to(&mut sessions, &settings, 1, 1, date(2024, 1, 9));

        assert_eq!(
            result,
            Err(ScheduleError::NotPending {
                week: 1,
                day: 1,
                status: SessionStatus::Completed
            })
        );
        assert_eq!(sessions[0].scheduled_date, Some(date(2024, 1, 1)));
    }

    #[test]
    fn test_set_completed_and_reopen() {
        let (mut sessions, _) = consecutive_four();
        sessions[2].skipped = true;

        assert!(set_completed(&mut sessions, 2, 1, Some(date(2024, 1, 3))));
        assert!(sessions[2].completed);
        assert!(!sessions[2].skipped);
        assert_eq!(sessions[2].completed_date, Some(date(2024, 1, 3)));

        assert!(set_completed(&mut sessions, 2, 1, None));
        assert!(!sessions[2].completed);
        assert_eq!(sessions[2].completed_date, None);

        assert!(!set_completed(&mut sessions, 9, 9, None));
    }
}
