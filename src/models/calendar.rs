use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Weekday};

/// Weekday names indexed the way rest days are stored (0 = Sunday)
pub const WEEKDAY_NAMES: [&str; 7] = [
  "Sunday",
  "Monday",
  "Tuesday",
  "Wednesday",
  "Thursday",
  "Friday",
  "Saturday",
];

/// Rest-day index of a weekday: 0 = Sunday .. 6 = Saturday
pub fn weekday_index(weekday: Weekday) -> u8 {
  weekday.num_days_from_sunday() as u8
}

pub fn weekday_name(index: u8) -> Option<&'static str> {
  WEEKDAY_NAMES.get(index as usize).copied()
}

/// Parse a stored or user-supplied date down to its calendar day.
///
/// Accepts plain `YYYY-MM-DD`, naive timestamps (`2024-01-05T00:00:00.000`)
/// and RFC 3339 timestamps, which are read in local time so that a date
/// written as local midnight comes back as the same day.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
  let value = value.trim();
  if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
    return Some(date);
  }
  if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
    return Some(dt.date());
  }
  DateTime::parse_from_rfc3339(value)
    .ok()
    .map(|dt| dt.with_timezone(&Local).date_naive())
}
