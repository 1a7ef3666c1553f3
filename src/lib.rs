pub mod batch;
pub mod error;
pub mod io;
pub mod name;
pub mod profile;
pub mod schedule;

// Prelude
pub use batch::{BatchReport, SkippedZone, ZoneSource, build_profiles};
pub use error::{Result, ScheduleError};
pub use io::{BlockNaming, CompactSchedule, ExportConfig};
pub use name::{HasName, SortByName};
pub use profile::{Profile, ProfileSlot};
pub use schedule::{
    AnnualCalendar, Breakpoint, DateRun, DayCategory, Domain, IntradayProfile, MonthDay,
    Operation, TimeOfDay, WeeklyPattern,
};
