//! Parallel construction of zone profiles.
//!
//! The ingestion layer describes each zone through [`ZoneSource`]. Zones are
//! built independently on the rayon pool; a zone whose rules fail validation
//! is logged and skipped, the rest of the batch is unaffected.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{Result, ScheduleError};
use crate::io::idf::{CompactSchedule, ExportConfig};
use crate::name::{HasName, SortByName};
use crate::profile::Profile;

/// A zone whose operating rules can be turned into a [`Profile`].
pub trait ZoneSource: HasName + Sync {
    fn build_profile(&self) -> Result<Profile>;
}

/// A zone left out of the batch and the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedZone {
    pub zone: String,
    pub error: ScheduleError,
}

/// Outcome of [`build_profiles`].
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Built profiles, in input order.
    pub profiles: Vec<Profile>,
    /// Zones that failed, in input order.
    pub skipped: Vec<SkippedZone>,
}

impl BatchReport {
    /// Export blocks of every built profile, sorted by block name.
    pub fn export_blocks(&self, config: &ExportConfig) -> Vec<CompactSchedule> {
        let mut blocks: Vec<CompactSchedule> = self
            .profiles
            .par_iter()
            .flat_map_iter(|profile| profile.to_export_blocks(config))
            .collect();
        blocks.as_mut_slice().sort_by_name();
        blocks
    }

    /// IDF text of [`Self::export_blocks`].
    pub fn to_idf_string(&self, config: &ExportConfig) -> String {
        self.export_blocks(config)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Builds a profile for every zone in parallel.
pub fn build_profiles<S: ZoneSource>(zones: &[S]) -> BatchReport {
    let results: Vec<(String, Result<Profile>)> = zones
        .par_iter()
        .map(|zone| (zone.get_name().to_string(), zone.build_profile()))
        .collect();

    let mut report = BatchReport::default();
    for (zone, result) in results {
        match result {
            Ok(profile) => report.profiles.push(profile),
            Err(error) => {
                warn!(%zone, %error, "skipping zone");
                report.skipped.push(SkippedZone { zone, error });
            }
        }
    }
    info!(
        built = report.profiles.len(),
        skipped = report.skipped.len(),
        "profile batch finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileSlot;
    use crate::schedule::{AnnualCalendar, Domain, IntradayProfile, WeeklyPattern};
    use std::sync::Arc;

    struct Zone {
        name: String,
        heating: f64,
    }

    impl HasName for Zone {
        fn get_name(&self) -> &str {
            &self.name
        }
    }

    impl ZoneSource for Zone {
        fn build_profile(&self) -> Result<Profile> {
            let day = IntradayProfile::constant("heat", Domain::Temperature, self.heating)?;
            let calendar = AnnualCalendar::filled(
                &format!("{}_heating", self.name),
                Arc::new(WeeklyPattern::uniform("heat", day)),
            );
            Profile::new(&self.name).with_calendar(ProfileSlot::HeatingSetpoint, calendar)
        }
    }

    fn zone(name: &str, heating: f64) -> Zone {
        Zone {
            name: name.to_string(),
            heating,
        }
    }

    #[test]
    fn test_bad_zone_is_skipped() {
        let zones = vec![zone("b", 20.0), zone("bad", 500.0), zone("a", 18.0)];
        let report = build_profiles(&zones);
        assert_eq!(report.profiles.len(), 2);
        assert_eq!(report.profiles[0].name(), "b");
        assert_eq!(report.profiles[1].name(), "a");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].zone, "bad");
        assert!(matches!(
            report.skipped[0].error,
            ScheduleError::OutOfRange { .. }
        ));
    }

    #[test]
    fn test_export_is_sorted_by_name() {
        let zones = vec![zone("b", 20.0), zone("a", 18.0)];
        let report = build_profiles(&zones);
        let names: Vec<String> = report
            .export_blocks(&ExportConfig::new())
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["a_heating", "b_heating"]);
        assert!(
            report
                .to_idf_string(&ExportConfig::new())
                .starts_with("Schedule:Compact,\n  a_heating,")
        );
    }
}
