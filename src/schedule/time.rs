//! Time grid of the schedule hierarchy.
//!
//! A day is split into 144 ten-minute slots; a year is the non-leap reference
//! year [`REFERENCE_YEAR`] with 365 days.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Number of slots per hour.
pub const SLOTS_PER_HOUR: usize = 6;
/// Slot width in minutes.
pub const SLOT_MINUTES: u32 = 10;
/// Number of slots in a day.
pub const SLOTS_PER_DAY: usize = SLOTS_PER_HOUR * 24;
/// Minutes in a day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Fixed non-leap year all calendar dates are mapped onto.
pub const REFERENCE_YEAR: i32 = 2025;
/// Number of days in the reference year.
pub const DAYS_PER_YEAR: usize = 365;

/// Time of day between 00:00 and 24:00 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub const END_OF_DAY: TimeOfDay = TimeOfDay {
        hour: 24,
        minute: 0,
    };

    pub fn new(hour: u8, minute: u8) -> Result<Self> {
        if hour > 24 || minute >= 60 || (hour == 24 && minute != 0) {
            return Err(ScheduleError::MalformedCompactInput(format!(
                "invalid time of day {hour:02}:{minute:02}"
            )));
        }
        Ok(Self { hour, minute })
    }

    /// End time of slot `slot` (0-based), e.g. slot 0 ends at 00:10.
    pub fn slot_end(slot: usize) -> Self {
        let minutes = (slot as u32 + 1) * SLOT_MINUTES;
        Self {
            hour: (minutes / 60) as u8,
            minute: (minutes % 60) as u8,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Compact-form entry: `value` holds until `hour:minute`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub hour: u8,
    pub minute: u8,
    pub value: f64,
}

impl Breakpoint {
    pub fn new(hour: u8, minute: u8, value: f64) -> Self {
        Self {
            hour,
            minute,
            value,
        }
    }

    /// Validated time of the breakpoint.
    pub fn time(&self) -> Result<TimeOfDay> {
        TimeOfDay::new(self.hour, self.minute)
    }
}

impl From<(u8, u8, f64)> for Breakpoint {
    fn from((hour, minute, value): (u8, u8, f64)) -> Self {
        Self::new(hour, minute, value)
    }
}

/// Calendar date on the reference year.
///
/// Parsed from normalized numeric tokens only: `"MMDD"` or `"YYYYMMDD"`.
/// Displays as `M/D`, the form expected in `Through:` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthDay(NaiveDate);

impl MonthDay {
    pub fn new(month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(REFERENCE_YEAR, month, day)
            .map(Self)
            .ok_or_else(|| {
                ScheduleError::InvalidDate(format!(
                    "{month:02}/{day:02} does not exist in {REFERENCE_YEAR}"
                ))
            })
    }

    /// Date of the `index`-th day of the year (0-based).
    pub fn from_index(index: usize) -> Result<Self> {
        if index >= DAYS_PER_YEAR {
            return Err(ScheduleError::InvalidDate(format!(
                "day index {index} is beyond the {DAYS_PER_YEAR}-day reference year"
            )));
        }
        NaiveDate::from_yo_opt(REFERENCE_YEAR, index as u32 + 1)
            .map(Self)
            .ok_or_else(|| ScheduleError::InvalidDate(format!("day index {index}")))
    }

    /// 0-based day index within the reference year.
    pub fn index(&self) -> usize {
        self.0.ordinal0() as usize
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Normalized `"MMDD"` token.
    pub fn token(&self) -> String {
        format!("{:02}{:02}", self.month(), self.day())
    }
}

impl FromStr for MonthDay {
    type Err = ScheduleError;

    fn from_str(token: &str) -> Result<Self> {
        let invalid = || ScheduleError::InvalidDate(format!("unrecognized date token '{token}'"));
        if !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let field = |range: std::ops::Range<usize>| -> Result<u32> {
            token[range].parse::<u32>().map_err(|_| invalid())
        };
        match token.len() {
            4 => Self::new(field(0..2)?, field(2..4)?),
            8 => {
                let year = field(0..4)? as i32;
                if year != REFERENCE_YEAR {
                    return Err(ScheduleError::InvalidDate(format!(
                        "'{token}' is not on the reference year {REFERENCE_YEAR}"
                    )));
                }
                Self::new(field(4..6)?, field(6..8)?)
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for MonthDay {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<MonthDay> for String {
    fn from(value: MonthDay) -> Self {
        value.token()
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month(), self.day())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_end_times() {
        assert_eq!(TimeOfDay::slot_end(0), TimeOfDay::new(0, 10).unwrap());
        assert_eq!(TimeOfDay::slot_end(5), TimeOfDay::new(1, 0).unwrap());
        assert_eq!(TimeOfDay::slot_end(SLOTS_PER_DAY - 1), TimeOfDay::END_OF_DAY);
        assert_eq!(TimeOfDay::END_OF_DAY.minutes(), MINUTES_PER_DAY);
    }

    #[test]
    fn test_invalid_times() {
        assert!(TimeOfDay::new(24, 10).is_err());
        assert!(TimeOfDay::new(25, 0).is_err());
        assert!(TimeOfDay::new(8, 60).is_err());
        assert_eq!(TimeOfDay::new(7, 5).unwrap().to_string(), "07:05");
    }

    #[test]
    fn test_date_tokens() {
        let d: MonthDay = "0301".parse().unwrap();
        assert_eq!((d.month(), d.day()), (3, 1));
        assert_eq!(d.index(), 59);
        assert_eq!(d.to_string(), "3/1");

        let full: MonthDay = "20251231".parse().unwrap();
        assert_eq!(full.index(), DAYS_PER_YEAR - 1);

        assert!("0229".parse::<MonthDay>().is_err());
        assert!("20240101".parse::<MonthDay>().is_err());
        assert!("3/1".parse::<MonthDay>().is_err());
        assert!("301".parse::<MonthDay>().is_err());
    }

    #[test]
    fn test_index_roundtrip() {
        for idx in [0, 58, 59, 180, 364] {
            assert_eq!(MonthDay::from_index(idx).unwrap().index(), idx);
        }
        assert!(MonthDay::from_index(DAYS_PER_YEAR).is_err());
    }

    #[test]
    fn test_reference_year_starts_on_wednesday() {
        assert_eq!(MonthDay::new(1, 1).unwrap().weekday(), Weekday::Wed);
    }
}
