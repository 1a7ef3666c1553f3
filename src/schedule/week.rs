use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::day::IntradayProfile;
use super::domain::{Domain, Operation};
use crate::error::{Result, ScheduleError};

/// Day categories a weekly pattern can override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayCategory {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    Holiday,
}

/// The two mandatory defaults of a weekly pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultDay {
    Weekdays,
    Weekends,
}

impl DayCategory {
    pub const ALL: [DayCategory; 8] = [
        DayCategory::Monday,
        DayCategory::Tuesday,
        DayCategory::Wednesday,
        DayCategory::Thursday,
        DayCategory::Friday,
        DayCategory::Saturday,
        DayCategory::Sunday,
        DayCategory::Holiday,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Default a category inherits from when it has no override.
    pub fn fallback(self) -> DefaultDay {
        match self {
            DayCategory::Monday
            | DayCategory::Tuesday
            | DayCategory::Wednesday
            | DayCategory::Thursday
            | DayCategory::Friday => DefaultDay::Weekdays,
            DayCategory::Saturday | DayCategory::Sunday | DayCategory::Holiday => {
                DefaultDay::Weekends
            }
        }
    }

    /// Day-type keyword understood by the simulation engine.
    pub fn keyword(self) -> &'static str {
        match self {
            DayCategory::Monday => "Monday",
            DayCategory::Tuesday => "Tuesday",
            DayCategory::Wednesday => "Wednesday",
            DayCategory::Thursday => "Thursday",
            DayCategory::Friday => "Friday",
            DayCategory::Saturday => "Saturday",
            DayCategory::Sunday => "Sunday",
            DayCategory::Holiday => "Holiday",
        }
    }
}

impl From<Weekday> for DayCategory {
    fn from(value: Weekday) -> Self {
        match value {
            Weekday::Mon => DayCategory::Monday,
            Weekday::Tue => DayCategory::Tuesday,
            Weekday::Wed => DayCategory::Wednesday,
            Weekday::Thu => DayCategory::Thursday,
            Weekday::Fri => DayCategory::Friday,
            Weekday::Sat => DayCategory::Saturday,
            Weekday::Sun => DayCategory::Sunday,
        }
    }
}

/// A typical week: weekday/weekend defaults plus optional per-category overrides.
///
/// The pattern domain is the domain of the weekday default; every other
/// profile must share it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawWeek", into = "RawWeek")]
pub struct WeeklyPattern {
    name: String,
    domain: Domain,
    weekdays: IntradayProfile,
    weekends: IntradayProfile,
    overrides: [Option<IntradayProfile>; 8],
}

impl WeeklyPattern {
    /// Creates a pattern from its two defaults.
    ///
    /// A missing default is replaced by a new all-zero binary profile.
    pub fn new(
        name: &str,
        weekdays: Option<IntradayProfile>,
        weekends: Option<IntradayProfile>,
    ) -> Result<Self> {
        let weekdays =
            weekdays.unwrap_or_else(|| IntradayProfile::zeros("weekdays", Domain::Binary));
        let weekends =
            weekends.unwrap_or_else(|| IntradayProfile::zeros("weekends", Domain::Binary));
        let domain = weekdays.domain();
        domain.ensure_same(weekends.domain())?;
        Ok(Self {
            name: name.to_string(),
            domain,
            weekdays,
            weekends,
            overrides: Default::default(),
        })
    }

    /// Pattern using the same profile on every day.
    pub fn uniform(name: &str, profile: IntradayProfile) -> Self {
        Self {
            name: name.to_string(),
            domain: profile.domain(),
            weekdays: profile.clone(),
            weekends: profile,
            overrides: Default::default(),
        }
    }

    /// All-zero pattern of the given domain.
    pub fn zeros(name: &str, domain: Domain) -> Self {
        Self::uniform(name, IntradayProfile::zeros(name, domain))
    }

    /// Sets the override for `category`.
    pub fn with_override(
        mut self,
        category: DayCategory,
        profile: IntradayProfile,
    ) -> Result<Self> {
        self.domain.ensure_same(profile.domain())?;
        self.overrides[category.index()] = Some(profile);
        Ok(self)
    }

    /// Name of the pattern.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value domain shared by all profiles of the pattern.
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Default profile for Monday to Friday.
    pub fn weekdays(&self) -> &IntradayProfile {
        &self.weekdays
    }

    /// Default profile for Saturday, Sunday and holidays.
    pub fn weekends(&self) -> &IntradayProfile {
        &self.weekends
    }

    /// One of the two defaults.
    pub fn default_profile(&self, default: DefaultDay) -> &IntradayProfile {
        match default {
            DefaultDay::Weekdays => &self.weekdays,
            DefaultDay::Weekends => &self.weekends,
        }
    }

    /// Override set for `category`, if any.
    pub fn explicit(&self, category: DayCategory) -> Option<&IntradayProfile> {
        self.overrides[category.index()].as_ref()
    }

    /// Profile in effect on `category`: the override, or the category default.
    pub fn effective(&self, category: DayCategory) -> &IntradayProfile {
        self.explicit(category)
            .unwrap_or_else(|| self.default_profile(category.fallback()))
    }

    /// Distinct profiles (by value) referenced by the pattern.
    pub fn unique_profiles(&self) -> Vec<&IntradayProfile> {
        let mut unique: Vec<&IntradayProfile> = Vec::new();
        for profile in self.present() {
            if !unique.contains(&profile) {
                unique.push(profile);
            }
        }
        unique
    }

    /// Smallest value over all stored profiles.
    pub fn min(&self) -> f64 {
        self.present().map(IntradayProfile::min).fold(f64::INFINITY, f64::min)
    }

    /// Largest value over all stored profiles.
    pub fn max(&self) -> f64 {
        self.present()
            .map(IntradayProfile::max)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Category-wise sum of two patterns.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, Operation::Add, IntradayProfile::add)
    }

    /// Category-wise difference `self - other`.
    pub fn subtract(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, Operation::Subtract, IntradayProfile::subtract)
    }

    /// Category-wise logical AND.
    pub fn and(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, Operation::And, IntradayProfile::and)
    }

    /// Category-wise logical OR.
    pub fn or(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, Operation::Or, IntradayProfile::or)
    }

    /// Category-wise minimum.
    pub fn element_min(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, Operation::ElementMin, IntradayProfile::element_min)
    }

    /// Category-wise maximum.
    pub fn element_max(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, Operation::ElementMax, IntradayProfile::element_max)
    }

    /// Multiplies every profile by `factor`.
    pub fn multiply_by_scalar(&self, factor: f64) -> Result<Self> {
        self.map(Operation::MultiplyByScalar, self.name.clone(), |p| {
            p.multiply_by_scalar(factor)
        })
    }

    /// Divides every profile by `divisor`.
    pub fn divide_by_scalar(&self, divisor: f64) -> Result<Self> {
        self.map(Operation::DivideByScalar, self.name.clone(), |p| {
            p.divide_by_scalar(divisor)
        })
    }

    /// Inverts every profile of a binary pattern.
    pub fn not(&self) -> Result<Self> {
        let name = format!("{}:{}", self.name, Operation::Not.tag());
        self.map(Operation::Not, name, IntradayProfile::not)
    }

    /// Normalizes every profile of the pattern by its own maximum.
    pub fn normalize_by_max(&self) -> Result<Self> {
        let name = format!("{}_{}", self.name, Operation::NormalizeByMax.tag());
        self.map(Operation::NormalizeByMax, name, IntradayProfile::normalize_by_max)
    }

    fn present(&self) -> impl Iterator<Item = &IntradayProfile> {
        [&self.weekdays, &self.weekends]
            .into_iter()
            .chain(self.overrides.iter().flatten())
    }

    fn map<F>(&self, op: Operation, name: String, f: F) -> Result<Self>
    where
        F: Fn(&IntradayProfile) -> Result<IntradayProfile>,
    {
        self.domain.ensure(op)?;
        let mut overrides: [Option<IntradayProfile>; 8] = Default::default();
        for (slot, profile) in overrides.iter_mut().zip(&self.overrides) {
            *slot = profile.as_ref().map(&f).transpose()?;
        }
        Ok(Self {
            name,
            domain: self.domain,
            weekdays: f(&self.weekdays)?,
            weekends: f(&self.weekends)?,
            overrides,
        })
    }

    /// Combines two patterns category by category.
    ///
    /// A category without override on one side uses that side's category
    /// default; a category without override on both sides stays unset.
    fn zip_with<F>(&self, other: &Self, op: Operation, f: F) -> Result<Self>
    where
        F: Fn(&IntradayProfile, &IntradayProfile) -> Result<IntradayProfile>,
    {
        self.domain.ensure_same(other.domain)?;
        self.domain.ensure(op)?;
        let mut overrides: [Option<IntradayProfile>; 8] = Default::default();
        for category in DayCategory::ALL {
            let idx = category.index();
            if self.overrides[idx].is_none() && other.overrides[idx].is_none() {
                continue;
            }
            overrides[idx] = Some(f(self.effective(category), other.effective(category))?);
        }
        Ok(Self {
            name: format!("{}:{}:{}", self.name, op.tag(), other.name),
            domain: self.domain,
            weekdays: f(&self.weekdays, &other.weekdays)?,
            weekends: f(&self.weekends, &other.weekends)?,
            overrides,
        })
    }
}

/// Patterns are equal when they schedule every day category identically.
///
/// The weekday default is compared as well, since it also stands for the day
/// types outside the eight categories on export.
impl PartialEq for WeeklyPattern {
    fn eq(&self, other: &Self) -> bool {
        self.domain == other.domain
            && self.weekdays == other.weekdays
            && DayCategory::ALL
                .iter()
                .all(|c| self.effective(*c) == other.effective(*c))
    }
}

impl fmt::Display for WeeklyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WeeklyPattern {} ({}):", self.name, self.domain)?;
        write!(f, "\n\tWeekdays: {}", self.weekdays.name())?;
        write!(f, "\n\tWeekends: {}", self.weekends.name())?;
        for category in DayCategory::ALL {
            if let Some(profile) = self.explicit(category) {
                write!(f, "\n\t{}: {}", category.keyword(), profile.name())?;
            }
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct RawWeek {
    name: String,
    weekdays: IntradayProfile,
    weekends: IntradayProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    monday: Option<IntradayProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tuesday: Option<IntradayProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wednesday: Option<IntradayProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thursday: Option<IntradayProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    friday: Option<IntradayProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saturday: Option<IntradayProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sunday: Option<IntradayProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    holiday: Option<IntradayProfile>,
}

impl TryFrom<RawWeek> for WeeklyPattern {
    type Error = ScheduleError;

    fn try_from(raw: RawWeek) -> Result<Self> {
        let overrides = [
            raw.monday,
            raw.tuesday,
            raw.wednesday,
            raw.thursday,
            raw.friday,
            raw.saturday,
            raw.sunday,
            raw.holiday,
        ];
        let mut pattern = WeeklyPattern::new(&raw.name, Some(raw.weekdays), Some(raw.weekends))?;
        for (category, profile) in DayCategory::ALL.into_iter().zip(overrides) {
            if let Some(profile) = profile {
                pattern = pattern.with_override(category, profile)?;
            }
        }
        Ok(pattern)
    }
}

impl From<WeeklyPattern> for RawWeek {
    fn from(value: WeeklyPattern) -> Self {
        let [monday, tuesday, wednesday, thursday, friday, saturday, sunday, holiday] =
            value.overrides;
        Self {
            name: value.name,
            weekdays: value.weekdays,
            weekends: value.weekends,
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
            sunday,
            holiday,
        }
    }
}
