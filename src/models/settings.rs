use chrono::{Datelike, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::calendar::{weekday_index, weekday_name};

pub const MAX_PROGRAM_WEEKS: u32 = 52;
pub const MAX_TRAINING_DAYS_PER_WEEK: u32 = 7;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
  #[error("Program length must be between 1 and 52 weeks, got {0}")]
  ProgramWeeks(u32),

  #[error("Training days per week must be between 1 and 7, got {0}")]
  TrainingDays(u32),

  #[error("{field} must be a positive speed in km/h, got {value}")]
  Speed { field: &'static str, value: f64 },

  #[error("{field} must be a non-negative distance in km, got {value}")]
  Distance { field: &'static str, value: f64 },

  #[error("Rest day must be 0 (Sunday) to 6 (Saturday), got {0}")]
  RestDayIndex(u8),

  #[error("Unknown rest day: {0}")]
  RestDayName(String),

  #[error("Rest days cover the whole week, no day left to train")]
  NoTrainingDays,
}

/// User-editable program configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramSettings {
  pub start_date: NaiveDate,
  /// km
  pub goal_distance: f64,
  /// km
  pub starting_distance: f64,
  /// km/h
  pub walking_speed: f64,
  /// km/h
  pub running_speed: f64,
  pub program_weeks: u32,
  pub training_days_per_week: u32,
  /// Weekday indices, 0 = Sunday .. 6 = Saturday
  pub rest_days: BTreeSet<u8>,
}

impl Default for ProgramSettings {
  fn default() -> Self {
    Self {
      start_date: Local::now().date_naive(),
      goal_distance: 5.0,
      starting_distance: 0.0,
      walking_speed: 5.0,
      running_speed: 9.0,
      program_weeks: 9,
      training_days_per_week: 3,
      rest_days: BTreeSet::from([0, 6]),
    }
  }
}

impl ProgramSettings {
  /// Reject configurations the generator or scheduler cannot honor
  pub fn validate(&self) -> Result<(), SettingsError> {
    if !(1..=MAX_PROGRAM_WEEKS).contains(&self.program_weeks) {
      return Err(SettingsError::ProgramWeeks(self.program_weeks));
    }
    if !(1..=MAX_TRAINING_DAYS_PER_WEEK).contains(&self.training_days_per_week) {
      return Err(SettingsError::TrainingDays(self.training_days_per_week));
    }

    for (field, value) in [
      ("walking_speed", self.walking_speed),
      ("running_speed", self.running_speed),
    ] {
      if !value.is_finite() || value <= 0.0 {
        return Err(SettingsError::Speed { field, value });
      }
    }
    for (field, value) in [
      ("goal_distance", self.goal_distance),
      ("starting_distance", self.starting_distance),
    ] {
      if !value.is_finite() || value < 0.0 {
        return Err(SettingsError::Distance { field, value });
      }
    }

    if let Some(&bad) = self.rest_days.iter().find(|&&d| d > 6) {
      return Err(SettingsError::RestDayIndex(bad));
    }
    if self.open_days_per_week() == 0 {
      return Err(SettingsError::NoTrainingDays);
    }

    if self.training_days_per_week > self.open_days_per_week() {
      log::warn!(
        "{} training days per week but only {} open weekdays; sessions will spill into later weeks",
        self.training_days_per_week,
        self.open_days_per_week()
      );
    }
    Ok(())
  }

  pub fn is_rest_day(&self, date: NaiveDate) -> bool {
    self.rest_days.contains(&weekday_index(date.weekday()))
  }

  /// Weekdays not marked as rest days
  pub fn open_days_per_week(&self) -> u32 {
    (0..7u8).filter(|d| !self.rest_days.contains(d)).count() as u32
  }

  pub fn total_sessions(&self) -> usize {
    self.program_weeks as usize * self.training_days_per_week as usize
  }

  /// True when switching to `other` changes the shape or content of the
  /// generated sessions (not just their dates)
  pub fn reshapes_plan(&self, other: &Self) -> bool {
    self.program_weeks != other.program_weeks
      || self.training_days_per_week != other.training_days_per_week
      || self.goal_distance != other.goal_distance
      || self.starting_distance != other.starting_distance
      || self.walking_speed != other.walking_speed
      || self.running_speed != other.running_speed
  }

  pub fn rest_day_names(&self) -> Vec<&'static str> {
    self.rest_days.iter().filter_map(|&d| weekday_name(d)).collect()
  }
}

/// Parse a rest-day list such as `"0,6"`, `"sat,sun"` or `""` (no rest days)
pub fn parse_rest_days(input: &str) -> Result<BTreeSet<u8>, SettingsError> {
  let mut days = BTreeSet::new();
  for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
    let index = match token.parse::<u8>() {
      Ok(index) if index <= 6 => index,
      Ok(index) => return Err(SettingsError::RestDayIndex(index)),
      Err(_) => token
        .parse::<Weekday>()
        .map(weekday_index)
        .map_err(|_| SettingsError::RestDayName(token.to_string()))?,
    };
    days.insert(index);
  }
  Ok(days)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn settings() -> ProgramSettings {
    ProgramSettings {
      start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
      ..ProgramSettings::default()
    }
  }

  #[test]
  fn test_defaults_validate() {
    let settings = ProgramSettings::default();
    assert!(settings.validate().is_ok());
    assert_eq!(settings.program_weeks, 9);
    assert_eq!(settings.training_days_per_week, 3);
    assert_eq!(settings.rest_day_names(), vec!["Sunday", "Saturday"]);
  }

  #[test]
  fn test_rejects_zero_weeks_and_days() {
    let mut s = settings();
    s.program_weeks = 0;
    assert_eq!(s.validate(), Err(SettingsError::ProgramWeeks(0)));

    let mut s = settings();
    s.program_weeks = 53;
    assert_eq!(s.validate(), Err(SettingsError::ProgramWeeks(53)));

    let mut s = settings();
    s.training_days_per_week = 0;
    assert_eq!(s.validate(), Err(SettingsError::TrainingDays(0)));

    let mut s = settings();
    s.training_days_per_week = 8;
    assert_eq!(s.validate(), Err(SettingsError::TrainingDays(8)));
  }

  #[test]
  fn test_rejects_bad_speeds_and_distances() {
    let mut s = settings();
    s.running_speed = 0.0;
    assert!(matches!(
      s.validate(),
      Err(SettingsError::Speed { field: "running_speed", .. })
    ));

    let mut s = settings();
    s.walking_speed = f64::NAN;
    assert!(matches!(
      s.validate(),
      Err(SettingsError::Speed { field: "walking_speed", .. })
    ));

    let mut s = settings();
    s.starting_distance = -1.0;
    assert!(matches!(
      s.validate(),
      Err(SettingsError::Distance { field: "starting_distance", .. })
    ));
  }

  #[test]
  fn test_rejects_all_week_rest() {
    let mut s = settings();
    s.rest_days = (0..7).collect();
    assert_eq!(s.validate(), Err(SettingsError::NoTrainingDays));
  }

  #[test]
  fn test_rejects_out_of_range_rest_day() {
    let mut s = settings();
    s.rest_days = BTreeSet::from([0, 9]);
    assert_eq!(s.validate(), Err(SettingsError::RestDayIndex(9)));
  }

  #[test]
  fn test_more_training_days_than_open_days_is_allowed() {
    let mut s = settings();
    s.training_days_per_week = 7;
    s.rest_days = BTreeSet::from([0, 6]);
    assert!(s.validate().is_ok());
    assert_eq!(s.open_days_per_week(), 5);
  }

  #[test]
  fn test_is_rest_day_by_weekday() {
    let s = settings();
    // 2024-01-06 is a Saturday, 2024-01-07 a Sunday
    assert!(s.is_rest_day(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()));
    assert!(s.is_rest_day(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()));
    assert!(!s.is_rest_day(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()));
  }

  #[test]
  fn test_reshapes_plan_ignores_dates_and_rest_days() {
    let base = settings();

    let mut moved = base.clone();
    moved.start_date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    moved.rest_days = BTreeSet::new();
    assert!(!base.reshapes_plan(&moved));

    let mut longer = base.clone();
    longer.program_weeks = 10;
    assert!(base.reshapes_plan(&longer));

    let mut faster = base.clone();
    faster.running_speed = 10.0;
    assert!(base.reshapes_plan(&faster));
  }

  #[test]
  fn test_parse_rest_days() {
    assert_eq!(parse_rest_days("0,6").unwrap(), BTreeSet::from([0, 6]));
    assert_eq!(parse_rest_days("sat, Sunday").unwrap(), BTreeSet::from([0, 6]));
    assert_eq!(parse_rest_days("").unwrap(), BTreeSet::new());
    assert_eq!(parse_rest_days("7"), Err(SettingsError::RestDayIndex(7)));
    assert_eq!(
      parse_rest_days("someday"),
      Err(SettingsError::RestDayName("someday".to_string()))
    );
  }
}
