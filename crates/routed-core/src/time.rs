//! Clock times, time ranges, and weekdays.
//!
//! Availability windows are expressed as "HH:MM" wall-clock times within a
//! single day. All range checks are inclusive on both ends.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A wall-clock time of day, stored as minutes since midnight.
///
/// Serialized as an "HH:MM" string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    /// Create a clock time from an hour and minute.
    ///
    /// # Errors
    ///
    /// Returns an error if `hour >= 24` or `minute >= 60`.
    pub fn new(hour: u8, minute: u8) -> Result<Self, TimeError> {
        if hour >= 24 || minute >= 60 {
            return Err(TimeError::InvalidClock(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self(u16::from(hour) * 60 + u16::from(minute)))
    }

    /// Construct from a known-valid minutes-since-midnight value.
    pub(crate) const fn from_minutes(minutes: u16) -> Self {
        Self(minutes)
    }

    /// Minutes elapsed since midnight.
    #[must_use]
    pub const fn minutes_from_midnight(self) -> u16 {
        self.0
    }
}

impl FromStr for ClockTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hours, minutes) = s
            .split_once(':')
            .ok_or_else(|| TimeError::InvalidClock(s.to_string()))?;
        let hour: u8 = hours
            .parse()
            .map_err(|_| TimeError::InvalidClock(s.to_string()))?;
        let minute: u8 = minutes
            .parse()
            .map_err(|_| TimeError::InvalidClock(s.to_string()))?;
        Self::new(hour, minute)
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({self})")
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = TimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}

/// A preferred time window within a single day.
///
/// Invariant: `start_time <= end_time`. Containment is inclusive on both
/// ends, so a window 18:00-21:00 accepts both 18:00 and 21:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start of the window.
    pub start_time: ClockTime,

    /// End of the window.
    pub end_time: ClockTime,
}

impl TimeRange {
    /// Create a time range.
    ///
    /// # Errors
    ///
    /// Returns an error if `start_time > end_time`.
    pub fn new(start_time: ClockTime, end_time: ClockTime) -> Result<Self, TimeError> {
        if start_time > end_time {
            return Err(TimeError::InvertedRange {
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self {
            start_time,
            end_time,
        })
    }

    /// Whether `time` falls within this window (inclusive).
    #[must_use]
    pub fn contains(&self, time: ClockTime) -> bool {
        time >= self.start_time && time <= self.end_time
    }
}

/// A day of the week, Sunday-indexed to match the source calendars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    /// Sunday.
    Sunday,
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
}

impl Weekday {
    /// All weekdays, Sunday first.
    pub const ALL: [Self; 7] = [
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    /// The weekday of a calendar date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        let index = date.weekday().num_days_from_sunday() as usize;
        Self::ALL[index]
    }

    /// The weekday of a date string ("YYYY-MM-DD", or a full RFC 3339
    /// timestamp).
    ///
    /// # Errors
    ///
    /// Returns an error if the input parses as neither form.
    pub fn from_date_str(date: &str) -> Result<Self, TimeError> {
        if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            return Ok(Self::from_date(parsed));
        }
        chrono::DateTime::parse_from_rfc3339(date)
            .map(|dt| Self::from_date(dt.date_naive()))
            .map_err(|_| TimeError::InvalidDate(date.to_string()))
    }

    /// Lowercase name of the day.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sunday => "sunday",
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors that can occur when parsing times and dates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    /// The input is not a valid "HH:MM" clock time.
    #[error("invalid clock time: {0}")]
    InvalidClock(String),

    /// The range ends before it starts.
    #[error("time range ends before it starts: {start}-{end}")]
    InvertedRange {
        /// Start of the rejected range.
        start: ClockTime,
        /// End of the rejected range.
        end: ClockTime,
    },

    /// The input is not a parseable calendar date.
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_time_parse_and_display() {
        let t: ClockTime = "18:30".parse().unwrap();
        assert_eq!(t.minutes_from_midnight(), 18 * 60 + 30);
        assert_eq!(t.to_string(), "18:30");
    }

    #[test]
    fn clock_time_accepts_single_digit_hour() {
        let t: ClockTime = "8:05".parse().unwrap();
        assert_eq!(t.to_string(), "08:05");
    }

    #[test]
    fn clock_time_rejects_out_of_range() {
        assert!("24:00".parse::<ClockTime>().is_err());
        assert!("12:60".parse::<ClockTime>().is_err());
        assert!("noon".parse::<ClockTime>().is_err());
    }

    #[test]
    fn clock_time_is_bounded() {
        let t: ClockTime = "23:59".parse().unwrap();
        assert_eq!(t.minutes_from_midnight(), 1439);
    }

    #[test]
    fn range_contains_is_inclusive() {
        let range = TimeRange::new("18:00".parse().unwrap(), "21:00".parse().unwrap()).unwrap();
        assert!(range.contains("18:00".parse().unwrap()));
        assert!(range.contains("18:30".parse().unwrap()));
        assert!(range.contains("21:00".parse().unwrap()));
        assert!(!range.contains("21:01".parse().unwrap()));
        assert!(!range.contains("17:59".parse().unwrap()));
    }

    #[test]
    fn range_rejects_inverted() {
        let result = TimeRange::new("21:00".parse().unwrap(), "18:00".parse().unwrap());
        assert!(matches!(result, Err(TimeError::InvertedRange { .. })));
    }

    #[test]
    fn range_serde_uses_hhmm_strings() {
        let range = TimeRange::new("17:00".parse().unwrap(), "22:00".parse().unwrap()).unwrap();
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, r#"{"start_time":"17:00","end_time":"22:00"}"#);
    }

    #[test]
    fn weekday_from_date_is_sunday_indexed() {
        // 2025-09-21 was a Sunday.
        assert_eq!(Weekday::from_date_str("2025-09-21").unwrap(), Weekday::Sunday);
        assert_eq!(Weekday::from_date_str("2025-09-20").unwrap(), Weekday::Saturday);
        assert_eq!(Weekday::from_date_str("2025-09-22").unwrap(), Weekday::Monday);
    }

    #[test]
    fn weekday_from_rfc3339_timestamp() {
        assert_eq!(
            Weekday::from_date_str("2025-09-21T19:30:00Z").unwrap(),
            Weekday::Sunday
        );
    }

    #[test]
    fn weekday_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Weekday::Friday).unwrap(), "\"friday\"");
    }
}
