//! Export to EnergyPlus `Schedule:Compact` objects.
//!
//! Each calendar becomes one object. For every compacted date run the field
//! list reads `Through: M/D`, then per distinct day profile a `For:` field
//! followed by `Until: HH:MM` / value pairs. The weekday default always comes
//! last as `For: AllOtherDays`, so day types without their own `For:` field
//! (design days, custom days) are still covered.

use std::fmt;

use crate::profile::ProfileSlot;
use crate::schedule::{
    AnnualCalendar, DayCategory, IntradayProfile, MonthDay, TimeOfDay, WeeklyPattern,
};

/// IDF class name of the exported objects.
pub const OBJECT_CLASS: &str = "Schedule:Compact";

/// Width of the value column in rendered IDF text.
const FIELD_WIDTH: usize = 30;

/// How exported blocks are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockNaming {
    /// Use the calendar's own name.
    #[default]
    CalendarName,
    /// Use `"{profile}_{slot}"`, e.g. `office_heating_setpoint`.
    ProfileSlot,
}

/// Configuration for schedule export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Write the domain's `ScheduleTypeLimits` name into the second field.
    ///
    /// When false (default) the field is left empty and the engine applies no
    /// limits check.
    pub emit_type_limits: bool,
    /// Naming of blocks exported from a [`crate::Profile`].
    pub naming: BlockNaming,
}

impl ExportConfig {
    pub fn new() -> Self {
        Self {
            emit_type_limits: false,
            naming: BlockNaming::CalendarName,
        }
    }

    /// Name of the block exported for `calendar` in `slot` of profile `profile`.
    pub fn block_name(
        &self,
        profile: &str,
        slot: ProfileSlot,
        calendar: &AnnualCalendar,
    ) -> String {
        match self.naming {
            BlockNaming::CalendarName => calendar.name().to_string(),
            BlockNaming::ProfileSlot => format!("{profile}_{}", slot.label()),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Day-type keyword of a `For:` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayLabel {
    Weekdays,
    Weekends,
    Day(DayCategory),
    AllOtherDays,
}

impl DayLabel {
    pub fn keyword(self) -> &'static str {
        match self {
            DayLabel::Weekdays => "Weekdays",
            DayLabel::Weekends => "Weekends",
            DayLabel::Day(category) => category.keyword(),
            DayLabel::AllOtherDays => "AllOtherDays",
        }
    }
}

/// One field of a `Schedule:Compact` object after the name and type limits.
#[derive(Debug, Clone, PartialEq)]
pub enum CompactField {
    Through(MonthDay),
    For(Vec<DayLabel>),
    Until(TimeOfDay),
    Value(f64),
}

impl fmt::Display for CompactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompactField::Through(date) => write!(f, "Through: {date}"),
            CompactField::For(labels) => {
                let keywords: Vec<&str> = labels.iter().map(|l| l.keyword()).collect();
                write!(f, "For: {}", keywords.join(" "))
            }
            CompactField::Until(time) => write!(f, "Until: {time}"),
            CompactField::Value(value) => write!(f, "{}", format_value(*value)),
        }
    }
}

/// A `Schedule:Compact` object as structured fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactSchedule {
    pub name: String,
    pub type_limits: Option<String>,
    pub fields: Vec<CompactField>,
}

impl CompactSchedule {
    /// Flat token list: name, type limits (possibly empty), then every field.
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens = Vec::with_capacity(self.fields.len() + 2);
        tokens.push(self.name.clone());
        tokens.push(self.type_limits.clone().unwrap_or_default());
        tokens.extend(self.fields.iter().map(ToString::to_string));
        tokens
    }
}

impl fmt::Display for CompactSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{OBJECT_CLASS},")?;
        let tokens = self.tokens();
        let last = tokens.len() - 1;
        for (idx, token) in tokens.iter().enumerate() {
            let terminator = if idx == last { ';' } else { ',' };
            let comment = match idx {
                0 => "Name".to_string(),
                1 => "Schedule Type Limits Name".to_string(),
                n => format!("Field {}", n - 1),
            };
            let value = format!("{token}{terminator}");
            writeln!(f, "  {value:<width$} !- {comment}", width = FIELD_WIDTH)?;
        }
        Ok(())
    }
}

impl AnnualCalendar {
    /// Exports the calendar as a `Schedule:Compact` object named `name`.
    pub fn to_compact_schedule(&self, name: &str, config: &ExportConfig) -> CompactSchedule {
        let mut fields = Vec::new();
        for run in self.compactize() {
            fields.push(CompactField::Through(run.end));
            for (labels, profile) in day_groups(&run.pattern) {
                fields.push(CompactField::For(labels));
                for (time, value) in profile.runs() {
                    fields.push(CompactField::Until(time));
                    fields.push(CompactField::Value(value));
                }
            }
        }
        CompactSchedule {
            name: name.to_string(),
            type_limits: config
                .emit_type_limits
                .then(|| self.domain().type_limits_name().to_string()),
            fields,
        }
    }
}

/// Groups the day categories of `pattern` by effective profile.
///
/// Categories that follow the weekday default are folded into the trailing
/// `AllOtherDays` group; the other groups keep first-appearance order.
pub fn day_groups(pattern: &WeeklyPattern) -> Vec<(Vec<DayLabel>, &IntradayProfile)> {
    let fallback = pattern.weekdays();
    let mut groups: Vec<(Vec<DayCategory>, &IntradayProfile)> = Vec::new();
    for category in DayCategory::ALL {
        let profile = pattern.effective(category);
        if profile == fallback {
            continue;
        }
        match groups.iter().position(|(_, p)| *p == profile) {
            Some(idx) => groups[idx].0.push(category),
            None => groups.push((vec![category], profile)),
        }
    }
    let mut labelled: Vec<(Vec<DayLabel>, &IntradayProfile)> = groups
        .into_iter()
        .map(|(members, profile)| (collapse_labels(&members), profile))
        .collect();
    labelled.push((vec![DayLabel::AllOtherDays], fallback));
    labelled
}

/// Replaces a full Monday–Friday set by `Weekdays` and Saturday+Sunday by `Weekends`.
fn collapse_labels(members: &[DayCategory]) -> Vec<DayLabel> {
    use DayCategory::*;
    let has = |c: DayCategory| members.contains(&c);
    let all_weekdays = [Monday, Tuesday, Wednesday, Thursday, Friday]
        .into_iter()
        .all(has);
    let all_weekends = has(Saturday) && has(Sunday);

    let mut labels = Vec::new();
    for &category in members {
        match category {
            Monday if all_weekdays => labels.push(DayLabel::Weekdays),
            Tuesday | Wednesday | Thursday | Friday if all_weekdays => {}
            Saturday if all_weekends => labels.push(DayLabel::Weekends),
            Sunday if all_weekends => {}
            other => labels.push(DayLabel::Day(other)),
        }
    }
    labels
}

/// Shortest decimal form of a value; negative zero is written as `0`.
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
