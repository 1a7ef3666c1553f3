//! Per-zone bundle of annual calendars.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::io::idf::{CompactSchedule, ExportConfig};
use crate::name::HasName;
use crate::schedule::{AnnualCalendar, Domain, IntradayProfile, WeeklyPattern};

/// Purpose of one calendar inside a [`Profile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSlot {
    HeatingSetpoint,
    CoolingSetpoint,
    HvacAvailability,
    /// Occupant heat gain density in W/m^2.
    Occupant,
    /// Lighting power density in W/m^2.
    Lighting,
    /// Equipment power density in W/m^2.
    Equipment,
}

impl ProfileSlot {
    pub const ALL: [ProfileSlot; 6] = [
        ProfileSlot::HeatingSetpoint,
        ProfileSlot::CoolingSetpoint,
        ProfileSlot::HvacAvailability,
        ProfileSlot::Occupant,
        ProfileSlot::Lighting,
        ProfileSlot::Equipment,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Domain a calendar must have to fill this slot.
    pub fn domain(self) -> Domain {
        match self {
            ProfileSlot::HeatingSetpoint | ProfileSlot::CoolingSetpoint => Domain::Temperature,
            ProfileSlot::HvacAvailability => Domain::Binary,
            ProfileSlot::Occupant | ProfileSlot::Lighting | ProfileSlot::Equipment => Domain::Real,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProfileSlot::HeatingSetpoint => "heating_setpoint",
            ProfileSlot::CoolingSetpoint => "cooling_setpoint",
            ProfileSlot::HvacAvailability => "hvac_availability",
            ProfileSlot::Occupant => "occupant",
            ProfileSlot::Lighting => "lighting",
            ProfileSlot::Equipment => "equipment",
        }
    }
}

/// Operating schedules of one zone.
///
/// Every slot is optional; absent slots are skipped on export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProfile", into = "RawProfile")]
pub struct Profile {
    name: String,
    calendars: [Option<AnnualCalendar>; 6],
}

impl Profile {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            calendars: Default::default(),
        }
    }

    /// Puts `calendar` into `slot`, replacing any previous calendar there.
    pub fn with_calendar(mut self, slot: ProfileSlot, calendar: AnnualCalendar) -> Result<Self> {
        if calendar.domain() != slot.domain() {
            debug!(
                profile = %self.name,
                slot = slot.label(),
                domain = %calendar.domain(),
                "rejected calendar for slot"
            );
            return Err(ScheduleError::mismatch(slot.domain(), calendar.domain()));
        }
        self.calendars[slot.index()] = Some(calendar);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn calendar(&self, slot: ProfileSlot) -> Option<&AnnualCalendar> {
        self.calendars[slot.index()].as_ref()
    }

    pub fn heating_setpoint(&self) -> Option<&AnnualCalendar> {
        self.calendar(ProfileSlot::HeatingSetpoint)
    }

    pub fn cooling_setpoint(&self) -> Option<&AnnualCalendar> {
        self.calendar(ProfileSlot::CoolingSetpoint)
    }

    pub fn hvac_availability(&self) -> Option<&AnnualCalendar> {
        self.calendar(ProfileSlot::HvacAvailability)
    }

    pub fn occupant(&self) -> Option<&AnnualCalendar> {
        self.calendar(ProfileSlot::Occupant)
    }

    pub fn lighting(&self) -> Option<&AnnualCalendar> {
        self.calendar(ProfileSlot::Lighting)
    }

    pub fn equipment(&self) -> Option<&AnnualCalendar> {
        self.calendar(ProfileSlot::Equipment)
    }

    /// Present calendars in slot order.
    pub fn calendars(&self) -> impl Iterator<Item = (ProfileSlot, &AnnualCalendar)> {
        ProfileSlot::ALL
            .into_iter()
            .filter_map(|slot| self.calendar(slot).map(|c| (slot, c)))
    }

    /// Distinct weekly patterns (by value) across all calendars, in slot order.
    pub fn unique_patterns(&self) -> Vec<Arc<WeeklyPattern>> {
        let mut unique: Vec<Arc<WeeklyPattern>> = Vec::new();
        for (_, calendar) in self.calendars() {
            for pattern in calendar.unique_patterns() {
                if !unique.iter().any(|u| **u == *pattern) {
                    unique.push(pattern);
                }
            }
        }
        unique
    }

    /// Distinct intraday profiles (by value) referenced anywhere in the profile.
    pub fn unique_profiles(&self) -> Vec<&IntradayProfile> {
        let mut unique: Vec<&IntradayProfile> = Vec::new();
        for (_, calendar) in self.calendars() {
            let mut visited: Vec<*const WeeklyPattern> = Vec::new();
            for pattern in calendar.days() {
                let ptr = Arc::as_ptr(pattern);
                if visited.contains(&ptr) {
                    continue;
                }
                visited.push(ptr);
                for profile in pattern.unique_profiles() {
                    if !unique.contains(&profile) {
                        unique.push(profile);
                    }
                }
            }
        }
        unique
    }

    /// One `Schedule:Compact` block per present calendar.
    pub fn to_export_blocks(&self, config: &ExportConfig) -> Vec<CompactSchedule> {
        let blocks: Vec<CompactSchedule> = self
            .calendars()
            .map(|(slot, calendar)| {
                let name = config.block_name(&self.name, slot, calendar);
                calendar.to_compact_schedule(&name, config)
            })
            .collect();
        debug!(profile = %self.name, blocks = blocks.len(), "exported profile");
        blocks
    }

    /// IDF text of all blocks, separated by blank lines.
    pub fn to_idf_string(&self, config: &ExportConfig) -> String {
        self.to_export_blocks(config)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl HasName for Profile {
    fn get_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Profile {}:", self.name)?;
        for (slot, calendar) in self.calendars() {
            write!(f, "\n\t{}: {}", slot.label(), calendar.name())?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct RawProfile {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    heating_setpoint: Option<AnnualCalendar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cooling_setpoint: Option<AnnualCalendar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hvac_availability: Option<AnnualCalendar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    occupant: Option<AnnualCalendar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lighting: Option<AnnualCalendar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    equipment: Option<AnnualCalendar>,
}

impl TryFrom<RawProfile> for Profile {
    type Error = ScheduleError;

    fn try_from(raw: RawProfile) -> Result<Self> {
        let calendars = [
            raw.heating_setpoint,
            raw.cooling_setpoint,
            raw.hvac_availability,
            raw.occupant,
            raw.lighting,
            raw.equipment,
        ];
        let mut profile = Profile::new(&raw.name);
        for (slot, calendar) in ProfileSlot::ALL.into_iter().zip(calendars) {
            if let Some(calendar) = calendar {
                profile = profile.with_calendar(slot, calendar)?;
            }
        }
        Ok(profile)
    }
}

impl From<Profile> for RawProfile {
    fn from(value: Profile) -> Self {
        let [
            heating_setpoint,
            cooling_setpoint,
            hvac_availability,
            occupant,
            lighting,
            equipment,
        ] = value.calendars;
        Self {
            name: value.name,
            heating_setpoint,
            cooling_setpoint,
            hvac_availability,
            occupant,
            lighting,
            equipment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_calendar(name: &str, domain: Domain, value: f64) -> AnnualCalendar {
        let day = IntradayProfile::constant(name, domain, value).unwrap();
        AnnualCalendar::filled(name, Arc::new(WeeklyPattern::uniform(name, day)))
    }

    #[test]
    fn test_slot_domains_are_enforced() {
        let profile = Profile::new("zone1");
        let err = profile
            .with_calendar(
                ProfileSlot::HeatingSetpoint,
                constant_calendar("heat", Domain::Real, 20.0),
            )
            .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::mismatch(Domain::Temperature, Domain::Real)
        );
    }

    #[test]
    fn test_calendars_in_slot_order() {
        let profile = Profile::new("zone1")
            .with_calendar(
                ProfileSlot::Lighting,
                constant_calendar("light", Domain::Real, 10.0),
            )
            .unwrap()
            .with_calendar(
                ProfileSlot::HeatingSetpoint,
                constant_calendar("heat", Domain::Temperature, 20.0),
            )
            .unwrap();
        let slots: Vec<ProfileSlot> = profile.calendars().map(|(s, _)| s).collect();
        assert_eq!(
            slots,
            vec![ProfileSlot::HeatingSetpoint, ProfileSlot::Lighting]
        );
        assert!(profile.cooling_setpoint().is_none());
        assert_eq!(profile.lighting().unwrap().name(), "light");
    }

    #[test]
    fn test_absent_calendars_are_skipped_on_export() {
        let empty = Profile::new("zone0");
        assert!(empty.to_export_blocks(&ExportConfig::new()).is_empty());
        assert_eq!(empty.to_idf_string(&ExportConfig::new()), "");

        let profile = empty
            .with_calendar(
                ProfileSlot::HvacAvailability,
                constant_calendar("avail", Domain::Binary, 1.0),
            )
            .unwrap();
        let blocks = profile.to_export_blocks(&ExportConfig::new());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name, "avail");
    }

    #[test]
    fn test_unique_patterns_and_profiles() {
        let night = IntradayProfile::constant("night", Domain::Binary, 0.0).unwrap();
        let day = IntradayProfile::constant("day", Domain::Binary, 1.0).unwrap();
        let week = WeeklyPattern::new("week", Some(day.clone()), Some(night)).unwrap();
        let closed = WeeklyPattern::zeros("closed", Domain::Binary);
        let availability = AnnualCalendar::filled("avail", Arc::new(closed))
            .apply(
                Arc::new(week.clone()),
                "0301".parse().unwrap(),
                "1031".parse().unwrap(),
            )
            .unwrap();
        let profile = Profile::new("zone1")
            .with_calendar(ProfileSlot::HvacAvailability, availability)
            .unwrap()
            .with_calendar(
                ProfileSlot::Lighting,
                constant_calendar("light", Domain::Real, 1.0),
            )
            .unwrap();

        let patterns = profile.unique_patterns();
        assert_eq!(patterns.len(), 3);
        assert_eq!(*patterns[1], week);

        // all-zero binary, all-one binary, and the real lighting constant
        let profiles = profile.unique_profiles();
        assert_eq!(profiles.len(), 3);
        assert!(profiles.contains(&&day));
        assert_eq!(profiles[2].domain(), Domain::Real);
    }

    #[test]
    fn test_display() {
        let profile = Profile::new("zone1")
            .with_calendar(
                ProfileSlot::Equipment,
                constant_calendar("equip", Domain::Real, 5.0),
            )
            .unwrap();
        assert_eq!(profile.to_string(), "Profile zone1:\n\tequipment: equip");
    }
}
