use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::day::IntradayProfile;
use super::domain::{Domain, Operation};
use super::time::{DAYS_PER_YEAR, MonthDay};
use super::week::{DayCategory, WeeklyPattern};
use crate::error::{Result, ScheduleError};

/// Inclusive date range sharing one weekly pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRun {
    pub start: MonthDay,
    pub end: MonthDay,
    pub pattern: Arc<WeeklyPattern>,
}

impl DateRun {
    pub fn new(start: MonthDay, end: MonthDay, pattern: Arc<WeeklyPattern>) -> Self {
        Self {
            start,
            end,
            pattern,
        }
    }

    /// Number of days covered by the run.
    pub fn len(&self) -> usize {
        (self.end.index() + 1).saturating_sub(self.start.index())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One weekly pattern reference per day of the reference year.
///
/// Days may share the same `Arc`; merging and equality always compare
/// pattern values, never pointers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CompactYear", into = "CompactYear")]
pub struct AnnualCalendar {
    name: String,
    domain: Domain,
    days: [Arc<WeeklyPattern>; DAYS_PER_YEAR],
}

impl AnnualCalendar {
    /// Creates a calendar from exactly 365 day entries of one domain.
    pub fn new(name: &str, days: Vec<Arc<WeeklyPattern>>) -> Result<Self> {
        let count = days.len();
        let days: [Arc<WeeklyPattern>; DAYS_PER_YEAR] = days.try_into().map_err(|_| {
            ScheduleError::Construction(format!(
                "calendar '{name}' needs {DAYS_PER_YEAR} day entries (got {count})"
            ))
        })?;
        let domain = days[0].domain();
        if let Some((idx, day)) = days
            .iter()
            .enumerate()
            .find(|(_, day)| day.domain() != domain)
        {
            return Err(ScheduleError::Construction(format!(
                "calendar '{name}' mixes {domain} and {} patterns (day index {idx})",
                day.domain()
            )));
        }
        Ok(Self {
            name: name.to_string(),
            domain,
            days,
        })
    }

    /// Calendar with `pattern` on every day.
    pub fn filled(name: &str, pattern: Arc<WeeklyPattern>) -> Self {
        Self {
            name: name.to_string(),
            domain: pattern.domain(),
            days: std::array::from_fn(|_| Arc::clone(&pattern)),
        }
    }

    /// Calendar holding an all-zero pattern of `domain` on every day.
    pub fn blank(name: &str, domain: Domain) -> Self {
        Self::filled(name, Arc::new(WeeklyPattern::zeros("blank", domain)))
    }

    /// Name of the calendar.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value domain of every pattern in the calendar.
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Pattern reference of each day, indexed from January 1.
    pub fn days(&self) -> &[Arc<WeeklyPattern>; DAYS_PER_YEAR] {
        &self.days
    }

    /// Pattern scheduled on `date`.
    pub fn pattern_on(&self, date: MonthDay) -> &Arc<WeeklyPattern> {
        &self.days[date.index()]
    }

    /// Intraday profile in effect on `date`, resolved through its weekday.
    pub fn profile_on(&self, date: MonthDay) -> &IntradayProfile {
        self.pattern_on(date)
            .effective(DayCategory::from(date.weekday()))
    }

    /// Returns a copy with `pattern` on every day of `[start, end]`.
    pub fn apply(
        &self,
        pattern: Arc<WeeklyPattern>,
        start: MonthDay,
        end: MonthDay,
    ) -> Result<Self> {
        let mut copy = self.clone();
        copy.apply_in_place(pattern, start, end)?;
        Ok(copy)
    }

    /// Puts `pattern` on every day of `[start, end]`, overwriting what was there.
    ///
    /// Calls are not commutative: on overlapping days the latest call wins.
    pub fn apply_in_place(
        &mut self,
        pattern: Arc<WeeklyPattern>,
        start: MonthDay,
        end: MonthDay,
    ) -> Result<()> {
        self.domain.ensure_same(pattern.domain())?;
        if start > end {
            return Err(ScheduleError::InvalidDate(format!(
                "range {start} ~ {end} ends before it starts"
            )));
        }
        debug!(
            calendar = %self.name,
            pattern = %pattern.name(),
            %start,
            %end,
            "applying pattern"
        );
        for day in &mut self.days[start.index()..=end.index()] {
            *day = Arc::clone(&pattern);
        }
        Ok(())
    }

    /// Minimal list of runs of equal consecutive patterns.
    pub fn compactize(&self) -> Vec<DateRun> {
        let mut runs: Vec<(usize, usize)> = Vec::new();
        for idx in 0..DAYS_PER_YEAR {
            match runs.last_mut() {
                Some((first, last)) if same_pattern(&self.days[*first], &self.days[idx]) => {
                    *last = idx;
                }
                _ => runs.push((idx, idx)),
            }
        }
        trace!(calendar = %self.name, runs = runs.len(), "compacted calendar");
        runs.into_iter()
            .map(|(first, last)| DateRun {
                start: day_date(first),
                end: day_date(last),
                pattern: Arc::clone(&self.days[first]),
            })
            .collect()
    }

    /// Builds a calendar by applying `runs` in order onto a blank calendar.
    ///
    /// The blank takes the domain of the first run; later runs override
    /// earlier ones where they overlap.
    pub fn from_compact(name: &str, runs: &[DateRun]) -> Result<Self> {
        let Some(first) = runs.first() else {
            return Err(ScheduleError::Construction(format!(
                "calendar '{name}' needs at least one date run"
            )));
        };
        let mut calendar = Self::blank(name, first.pattern.domain());
        for run in runs {
            calendar.apply_in_place(Arc::clone(&run.pattern), run.start, run.end)?;
        }
        debug!(calendar = %name, runs = runs.len(), "calendar built from runs");
        Ok(calendar)
    }

    /// Smallest value over all distinct patterns.
    pub fn min(&self) -> f64 {
        self.unique_patterns()
            .iter()
            .map(|p| p.min())
            .fold(f64::INFINITY, f64::min)
    }

    /// Largest value over all distinct patterns.
    pub fn max(&self) -> f64 {
        self.unique_patterns()
            .iter()
            .map(|p| p.max())
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Distinct patterns (by value) in order of first appearance.
    pub fn unique_patterns(&self) -> Vec<Arc<WeeklyPattern>> {
        let mut unique: Vec<Arc<WeeklyPattern>> = Vec::new();
        for day in &self.days {
            if !unique.iter().any(|p| same_pattern(p, day)) {
                unique.push(Arc::clone(day));
            }
        }
        unique
    }

    /// Day-wise sum of two calendars.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, Operation::Add, WeeklyPattern::add)
    }

    /// Day-wise difference `self - other`.
    pub fn subtract(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, Operation::Subtract, WeeklyPattern::subtract)
    }

    /// Day-wise logical AND.
    pub fn and(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, Operation::And, WeeklyPattern::and)
    }

    /// Day-wise logical OR.
    pub fn or(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, Operation::Or, WeeklyPattern::or)
    }

    /// Day-wise minimum.
    pub fn element_min(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, Operation::ElementMin, WeeklyPattern::element_min)
    }

    /// Day-wise maximum.
    pub fn element_max(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, Operation::ElementMax, WeeklyPattern::element_max)
    }

    /// Multiplies every pattern by `factor`.
    pub fn multiply_by_scalar(&self, factor: f64) -> Result<Self> {
        self.map(Operation::MultiplyByScalar, self.name.clone(), |p| {
            p.multiply_by_scalar(factor)
        })
    }

    /// Divides every pattern by `divisor`.
    pub fn divide_by_scalar(&self, divisor: f64) -> Result<Self> {
        self.map(Operation::DivideByScalar, self.name.clone(), |p| {
            p.divide_by_scalar(divisor)
        })
    }

    /// Inverts every pattern of a binary calendar.
    pub fn not(&self) -> Result<Self> {
        let name = format!("{}:{}", self.name, Operation::Not.tag());
        self.map(Operation::Not, name, WeeklyPattern::not)
    }

    /// Normalizes every pattern, see [`WeeklyPattern::normalize_by_max`].
    pub fn normalize_by_max(&self) -> Result<Self> {
        let name = format!("{}_{}", self.name, Operation::NormalizeByMax.tag());
        self.map(Operation::NormalizeByMax, name, WeeklyPattern::normalize_by_max)
    }

    /// Applies `f` once per distinct `Arc`, so aliased days stay aliased.
    fn map<F>(&self, op: Operation, name: String, f: F) -> Result<Self>
    where
        F: Fn(&WeeklyPattern) -> Result<WeeklyPattern>,
    {
        self.domain.ensure(op)?;
        let mut cache: HashMap<*const WeeklyPattern, Arc<WeeklyPattern>> = HashMap::new();
        let mut days = Vec::with_capacity(DAYS_PER_YEAR);
        for day in &self.days {
            let key = Arc::as_ptr(day);
            let mapped = match cache.get(&key) {
                Some(done) => Arc::clone(done),
                None => {
                    let done = Arc::new(f(day)?);
                    cache.insert(key, Arc::clone(&done));
                    done
                }
            };
            days.push(mapped);
        }
        Self::new(&name, days)
    }

    /// Combines two calendars day by day, once per distinct pair of `Arc`s.
    fn zip_with<F>(&self, other: &Self, op: Operation, f: F) -> Result<Self>
    where
        F: Fn(&WeeklyPattern, &WeeklyPattern) -> Result<WeeklyPattern>,
    {
        self.domain.ensure_same(other.domain)?;
        self.domain.ensure(op)?;
        let mut cache: HashMap<(*const WeeklyPattern, *const WeeklyPattern), Arc<WeeklyPattern>> =
            HashMap::new();
        let mut days = Vec::with_capacity(DAYS_PER_YEAR);
        for (a, b) in self.days.iter().zip(&other.days) {
            let key = (Arc::as_ptr(a), Arc::as_ptr(b));
            let combined = match cache.get(&key) {
                Some(done) => Arc::clone(done),
                None => {
                    let done = Arc::new(f(a, b)?);
                    cache.insert(key, Arc::clone(&done));
                    done
                }
            };
            days.push(combined);
        }
        let name = format!("{}:{}:{}", self.name, op.tag(), other.name);
        debug!(calendar = %name, distinct = cache.len(), "combined calendars");
        Self::new(&name, days)
    }
}

fn same_pattern(a: &Arc<WeeklyPattern>, b: &Arc<WeeklyPattern>) -> bool {
    Arc::ptr_eq(a, b) || **a == **b
}

fn day_date(index: usize) -> MonthDay {
    // Indices come from the fixed-size day array.
    MonthDay::from_index(index).unwrap_or_else(|_| unreachable!("day index {index} in range"))
}

/// Calendars are equal when every day holds an equal pattern.
impl PartialEq for AnnualCalendar {
    fn eq(&self, other: &Self) -> bool {
        self.domain == other.domain
            && self
                .days
                .iter()
                .zip(&other.days)
                .all(|(a, b)| same_pattern(a, b))
    }
}

impl fmt::Display for AnnualCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnnualCalendar {}:", self.name)?;
        for run in self.compactize() {
            write!(
                f,
                "\n\t{:02}/{:02} ~ {:02}/{:02}: {}",
                run.start.month(),
                run.start.day(),
                run.end.month(),
                run.end.day(),
                run.pattern.name()
            )?;
        }
        Ok(())
    }
}

/// Serialized form: the compacted run list.
#[derive(Serialize, Deserialize)]
struct CompactYear {
    name: String,
    runs: Vec<DateRun>,
}

impl TryFrom<CompactYear> for AnnualCalendar {
    type Error = ScheduleError;

    fn try_from(value: CompactYear) -> Result<Self> {
        Self::from_compact(&value.name, &value.runs)
    }
}

impl From<AnnualCalendar> for CompactYear {
    fn from(value: AnnualCalendar) -> Self {
        Self {
            runs: value.compactize(),
            name: value.name,
        }
    }
}
