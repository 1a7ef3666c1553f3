use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{Domain, Operation};
use super::time::{Breakpoint, SLOT_MINUTES, SLOTS_PER_DAY, TimeOfDay};
use crate::error::{Result, ScheduleError};

/// One day of schedule values at 10-minute resolution.
///
/// The value array has a fixed length of [`SLOTS_PER_DAY`] and every value
/// satisfies the [`Domain`] bounds; both are enforced by the constructors and
/// there is no API that resizes or mutates the values afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CompactDay", into = "CompactDay")]
pub struct IntradayProfile {
    name: String,
    domain: Domain,
    values: [f64; SLOTS_PER_DAY],
}

impl IntradayProfile {
    /// Creates a profile from explicit slot values.
    pub fn new(name: &str, domain: Domain, values: [f64; SLOTS_PER_DAY]) -> Result<Self> {
        for (slot, value) in values.iter().enumerate() {
            domain.check(slot, *value)?;
        }
        Ok(Self {
            name: name.to_string(),
            domain,
            values,
        })
    }

    /// Creates a profile from a slice, which must have exactly [`SLOTS_PER_DAY`] values.
    pub fn from_slice(name: &str, domain: Domain, values: &[f64]) -> Result<Self> {
        let values: [f64; SLOTS_PER_DAY] =
            values
                .try_into()
                .map_err(|_| ScheduleError::ImmutableViolation {
                    expected: SLOTS_PER_DAY,
                    actual: values.len(),
                })?;
        Self::new(name, domain, values)
    }

    /// Creates a profile holding `value` all day.
    pub fn constant(name: &str, domain: Domain, value: f64) -> Result<Self> {
        Self::new(name, domain, [value; SLOTS_PER_DAY])
    }

    /// All-zero profile; zero is admissible in every domain.
    pub fn zeros(name: &str, domain: Domain) -> Self {
        Self {
            name: name.to_string(),
            domain,
            values: [0.0; SLOTS_PER_DAY],
        }
    }

    /// Expands a breakpoint list to the 10-minute grid.
    ///
    /// Each slot takes the value of the earliest breakpoint whose time is at or
    /// after the slot's end time. Breakpoints must be strictly increasing and the
    /// last one must be `(24, 0, value)`.
    pub fn from_compact(name: &str, breakpoints: &[Breakpoint], domain: Domain) -> Result<Self> {
        let Some(last) = breakpoints.last() else {
            return Err(ScheduleError::MalformedCompactInput(
                "breakpoint list is empty".to_string(),
            ));
        };
        if last.time()? != TimeOfDay::END_OF_DAY {
            return Err(ScheduleError::MalformedCompactInput(format!(
                "last breakpoint must be at 24:00 (got {:02}:{:02})",
                last.hour, last.minute
            )));
        }

        let mut ends = Vec::with_capacity(breakpoints.len());
        for bp in breakpoints {
            let minutes = bp.time()?.minutes();
            if ends.last().is_some_and(|prev| *prev >= minutes) {
                return Err(ScheduleError::MalformedCompactInput(format!(
                    "breakpoints are not strictly increasing at {:02}:{:02}",
                    bp.hour, bp.minute
                )));
            }
            ends.push(minutes);
        }

        let mut values = [0.0; SLOTS_PER_DAY];
        let mut idx = 0;
        for (slot, value) in values.iter_mut().enumerate() {
            let slot_end = TimeOfDay::slot_end(slot).minutes();
            // The final breakpoint is 24:00, so `idx` stays in bounds.
            while ends[idx] < slot_end {
                idx += 1;
            }
            *value = breakpoints[idx].value;
        }
        Self::new(name, domain, values)
    }

    /// Minimal breakpoint list, merging consecutive equal slots.
    ///
    /// The result always ends with `(24, 0, last value)`.
    pub fn compactize(&self) -> Vec<Breakpoint> {
        self.runs()
            .into_iter()
            .map(|(end, value)| Breakpoint::new(end.hour(), end.minute(), value))
            .collect()
    }

    /// Compacted `(until, value)` pairs.
    pub(crate) fn runs(&self) -> Vec<(TimeOfDay, f64)> {
        let mut runs: Vec<(TimeOfDay, f64)> = Vec::new();
        for (slot, value) in self.values.iter().enumerate() {
            let end = TimeOfDay::slot_end(slot);
            match runs.last_mut() {
                Some(prev) if prev.1 == *value => prev.0 = end,
                _ => runs.push((end, *value)),
            }
        }
        runs
    }

    /// Name of the profile.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value domain of the profile.
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Slot values, one per 10-minute slot.
    pub fn values(&self) -> &[f64; SLOTS_PER_DAY] {
        &self.values
    }

    /// Value in effect during the slot that ends at or after `time`.
    ///
    /// `00:00` maps to the first slot.
    pub fn value_at(&self, time: TimeOfDay) -> f64 {
        let slot = (time.minutes().div_ceil(SLOT_MINUTES) as usize).saturating_sub(1);
        self.values[slot.min(SLOTS_PER_DAY - 1)]
    }

    /// Smallest slot value.
    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest slot value.
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Returns the same profile under a different name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Slot-wise sum of two profiles of the same domain.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, Operation::Add, |a, b| a + b)
    }

    /// Slot-wise difference `self - other`.
    pub fn subtract(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, Operation::Subtract, |a, b| a - b)
    }

    /// Multiplies every slot by `factor`.
    pub fn multiply_by_scalar(&self, factor: f64) -> Result<Self> {
        self.map(Operation::MultiplyByScalar, self.name.clone(), |v| v * factor)
    }

    /// Divides every slot by `divisor`.
    pub fn divide_by_scalar(&self, divisor: f64) -> Result<Self> {
        self.map(Operation::DivideByScalar, self.name.clone(), |v| v / divisor)
    }

    /// Slot-wise logical AND of two binary profiles.
    pub fn and(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, Operation::And, |a, b| bool_value(a != 0.0 && b != 0.0))
    }

    /// Slot-wise logical OR of two binary profiles.
    pub fn or(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, Operation::Or, |a, b| bool_value(a != 0.0 || b != 0.0))
    }

    /// Inverts a binary profile.
    pub fn not(&self) -> Result<Self> {
        let name = format!("{}:{}", self.name, Operation::Not.tag());
        self.map(Operation::Not, name, |v| bool_value(v == 0.0))
    }

    /// Slot-wise minimum of two profiles.
    pub fn element_min(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, Operation::ElementMin, f64::min)
    }

    /// Slot-wise maximum of two profiles.
    pub fn element_max(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, Operation::ElementMax, f64::max)
    }

    /// Divides every slot by the profile maximum (a zero maximum leaves values as they are).
    pub fn normalize_by_max(&self) -> Result<Self> {
        let max = self.max();
        let scale = if max == 0.0 { 1.0 } else { max };
        let name = format!("{}_{}", self.name, Operation::NormalizeByMax.tag());
        self.map(Operation::NormalizeByMax, name, |v| v / scale)
    }

    fn map<F>(&self, op: Operation, name: String, f: F) -> Result<Self>
    where
        F: Fn(f64) -> f64,
    {
        self.domain.ensure(op)?;
        Self::new(&name, self.domain, self.values.map(f))
    }

    fn zip_with<F>(&self, other: &Self, op: Operation, f: F) -> Result<Self>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.domain.ensure_same(other.domain)?;
        self.domain.ensure(op)?;
        let values = std::array::from_fn(|i| f(self.values[i], other.values[i]));
        let name = format!("{}:{}:{}", self.name, op.tag(), other.name);
        Self::new(&name, self.domain, values)
    }
}

fn bool_value(flag: bool) -> f64 {
    if flag { 1.0 } else { 0.0 }
}

/// Two profiles are equal when domain and all slot values match; names are ignored.
impl PartialEq for IntradayProfile {
    fn eq(&self, other: &Self) -> bool {
        self.domain == other.domain && self.values == other.values
    }
}

impl fmt::Display for IntradayProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IntradayProfile {}:", self.name)?;
        for bp in self.compactize() {
            write!(f, "\n\tUntil {:02}:{:02} -> {}", bp.hour, bp.minute, bp.value)?;
        }
        Ok(())
    }
}

/// Serialized form: breakpoints instead of 144 raw values.
#[derive(Serialize, Deserialize)]
struct CompactDay {
    name: String,
    domain: Domain,
    breakpoints: Vec<Breakpoint>,
}

impl TryFrom<CompactDay> for IntradayProfile {
    type Error = ScheduleError;

    fn try_from(value: CompactDay) -> Result<Self> {
        Self::from_compact(&value.name, &value.breakpoints, value.domain)
    }
}

impl From<IntradayProfile> for CompactDay {
    fn from(value: IntradayProfile) -> Self {
        Self {
            breakpoints: value.compactize(),
            name: value.name,
            domain: value.domain,
        }
    }
}
