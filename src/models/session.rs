use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One training occurrence, identified by (week, day)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
  pub week: u32,
  pub day: u32,
  pub title: String,
  pub description: String,
  pub completed: bool,
  pub skipped: bool,
  pub scheduled_date: Option<NaiveDate>,
  pub completed_date: Option<NaiveDate>,
}

impl Session {
  /// A fresh, undated session
  pub fn new(week: u32, day: u32, description: String) -> Self {
    Self {
      week,
      day,
      title: format!("Week {}, Day {}", week, day),
      description,
      completed: false,
      skipped: false,
      scheduled_date: None,
      completed_date: None,
    }
  }

  pub fn key(&self) -> (u32, u32) {
    (self.week, self.day)
  }

  /// Still to run: neither completed nor skipped
  pub fn is_pending(&self) -> bool {
    !self.completed && !self.skipped
  }

  pub fn status(&self, today: NaiveDate) -> SessionStatus {
    if self.completed {
      SessionStatus::Completed
    } else if self.skipped {
      SessionStatus::Skipped
    } else if self.scheduled_date.is_some_and(|d| d > today) {
      SessionStatus::Scheduled
    } else {
      SessionStatus::Pending
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
  Completed,
  Skipped,
  /// Dated in the future
  Scheduled,
  /// Undated, due today, or overdue
  Pending,
}

impl std::fmt::Display for SessionStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Completed => write!(f, "completed"),
      Self::Skipped => write!(f, "skipped"),
      Self::Scheduled => write!(f, "scheduled"),
      Self::Pending => write!(f, "pending"),
    }
  }
}

/// Position of the session with the given identity
pub fn find_session(sessions: &[Session], week: u32, day: u32) -> Option<usize> {
  sessions.iter().position(|s| s.week == week && s.day == day)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
  }

  #[test]
  fn test_new_session_title_and_defaults() {
    let session = Session::new(3, 2, "20min continuous run - Target: 3.0km".to_string());
    assert_eq!(session.title, "Week 3, Day 2");
    assert!(session.is_pending());
    assert_eq!(session.scheduled_date, None);
    assert_eq!(session.completed_date, None);
  }

  #[test]
  fn test_status_compares_calendar_days() {
    let mut session = Session::new(1, 1, String::new());
    assert_eq!(session.status(date(10)), SessionStatus::Pending);

    session.scheduled_date = Some(date(11));
    assert_eq!(session.status(date(10)), SessionStatus::Scheduled);

    // Due today counts as pending, not scheduled
    assert_eq!(session.status(date(11)), SessionStatus::Pending);

    session.skipped = true;
    assert_eq!(session.status(date(10)), SessionStatus::Skipped);

    session.completed = true;
    assert_eq!(session.status(date(10)), SessionStatus::Completed);
  }

  #[test]
  fn test_find_session() {
    let sessions = vec![
      Session::new(1, 1, String::new()),
      Session::new(1, 2, String::new()),
      Session::new(2, 1, String::new()),
    ];
    assert_eq!(find_session(&sessions, 2, 1), Some(2));
    assert_eq!(find_session(&sessions, 3, 1), None);
  }

  #[test]
  fn test_session_dates_serialize_as_iso_strings() {
    let mut session = Session::new(1, 1, String::new());
    session.scheduled_date = Some(date(5));
    let json = serde_json::to_value(&session).unwrap();
    assert_eq!(json["scheduled_date"], "2024-01-05");
    assert!(json["completed_date"].is_null());
  }
}
