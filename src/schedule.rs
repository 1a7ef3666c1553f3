//! Schedule algebra: intraday profiles, weekly patterns and annual calendars.

pub mod day;
pub mod domain;
pub mod time;
pub mod week;
pub mod year;

pub use day::IntradayProfile;
pub use domain::{Domain, Operation};
pub use time::{Breakpoint, DAYS_PER_YEAR, MonthDay, REFERENCE_YEAR, SLOTS_PER_DAY, TimeOfDay};
pub use week::{DayCategory, DefaultDay, WeeklyPattern};
pub use year::{AnnualCalendar, DateRun};
