//! Export formats for schedules.
//!
//! Everything here produces or consumes in-memory text; nothing touches files.

pub mod idf;
pub mod json;

pub use idf::{BlockNaming, CompactField, CompactSchedule, DayLabel, ExportConfig};
pub use json::{from_json_str, to_json_string};
