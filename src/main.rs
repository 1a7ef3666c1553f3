use std::sync::Arc;

use anyhow::{Context, Result};
use opsched::{
    AnnualCalendar, Breakpoint, DayCategory, Domain, ExportConfig, IntradayProfile, MonthDay,
    Profile, ProfileSlot, WeeklyPattern,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn office_day(name: &str, domain: Domain, night: f64, day: f64) -> Result<IntradayProfile> {
    let breakpoints = [
        Breakpoint::new(8, 0, night),
        Breakpoint::new(18, 0, day),
        Breakpoint::new(24, 0, night),
    ];
    IntradayProfile::from_compact(name, &breakpoints, domain)
        .with_context(|| format!("Failed to build day profile {name}"))
}

fn office_profile() -> Result<Profile> {
    let heating_week = WeeklyPattern::new(
        "office_heating",
        Some(office_day("heating_workday", Domain::Temperature, 16.0, 21.0)?),
        Some(IntradayProfile::constant(
            "heating_setback",
            Domain::Temperature,
            16.0,
        )?),
    )?;
    let cooling_week = WeeklyPattern::uniform(
        "office_cooling",
        IntradayProfile::constant("cooling_idle", Domain::Temperature, 50.0)?,
    );
    let summer_cooling = WeeklyPattern::new(
        "office_cooling_summer",
        Some(office_day("cooling_workday", Domain::Temperature, 32.0, 26.0)?),
        Some(IntradayProfile::constant(
            "cooling_setback",
            Domain::Temperature,
            32.0,
        )?),
    )?;
    let availability = WeeklyPattern::new(
        "office_hvac",
        Some(office_day("hvac_workday", Domain::Binary, 0.0, 1.0)?),
        None,
    )?
    .with_override(
        DayCategory::Saturday,
        office_day("hvac_saturday", Domain::Binary, 0.0, 1.0)?,
    )?;
    let occupancy = WeeklyPattern::new(
        "office_occupancy",
        Some(office_day("occupancy_workday", Domain::Real, 0.0, 8.0)?),
        Some(IntradayProfile::zeros("occupancy_idle", Domain::Real)),
    )?;
    let lighting = occupancy.multiply_by_scalar(1.25)?;

    let cooling = AnnualCalendar::filled("office_cooling", Arc::new(cooling_week)).apply(
        Arc::new(summer_cooling),
        MonthDay::new(6, 1)?,
        MonthDay::new(9, 30)?,
    )?;

    let profile = Profile::new("office")
        .with_calendar(
            ProfileSlot::HeatingSetpoint,
            AnnualCalendar::filled("office_heating", Arc::new(heating_week)),
        )?
        .with_calendar(ProfileSlot::CoolingSetpoint, cooling)?
        .with_calendar(
            ProfileSlot::HvacAvailability,
            AnnualCalendar::filled("office_hvac", Arc::new(availability)),
        )?
        .with_calendar(
            ProfileSlot::Occupant,
            AnnualCalendar::filled("office_occupancy", Arc::new(occupancy)),
        )?
        .with_calendar(
            ProfileSlot::Lighting,
            AnnualCalendar::filled("office_lighting", Arc::new(lighting)),
        )?;
    Ok(profile)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "opsched=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let profile = office_profile()?;
    info!(profile = %profile.name(), "built profile");
    println!("{}", profile);

    let config = ExportConfig::new();
    println!("{}", profile.to_idf_string(&config));
    Ok(())
}
