use std::sync::Arc;

use opsched::schedule::SLOTS_PER_DAY;
use opsched::{
    AnnualCalendar, Breakpoint, DayCategory, Domain, IntradayProfile, MonthDay, ScheduleError,
    WeeklyPattern,
};
use proptest::prelude::*;

fn date(token: &str) -> MonthDay {
    token.parse().unwrap()
}

fn binary_day() -> BoxedStrategy<IntradayProfile> {
    prop::collection::vec(0u8..=1, SLOTS_PER_DAY)
        .prop_map(|bits| {
            let values: Vec<f64> = bits.into_iter().map(f64::from).collect();
            IntradayProfile::from_slice("bin", Domain::Binary, &values).unwrap()
        })
        .boxed()
}

fn real_day() -> BoxedStrategy<IntradayProfile> {
    prop::collection::vec(-100.0..100.0f64, SLOTS_PER_DAY)
        .prop_map(|values| IntradayProfile::from_slice("real", Domain::Real, &values).unwrap())
        .boxed()
}

/// Piecewise-constant temperatures, so compaction actually has runs to merge.
fn stepped_temperatures() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        (prop::sample::select(vec![-50.0, 12.5, 16.0, 21.0, 200.0]), 1usize..40),
        1..12,
    )
    .prop_map(|steps| {
        let mut values: Vec<f64> = steps
            .into_iter()
            .flat_map(|(value, n)| std::iter::repeat_n(value, n))
            .collect();
        let last = values.last().copied().unwrap_or(0.0);
        values.resize(SLOTS_PER_DAY, last);
        values
    })
}

/// Well-formed breakpoint lists on the 10-minute grid, adjacent values distinct.
fn grid_breakpoints() -> impl Strategy<Value = Vec<Breakpoint>> {
    (
        prop::collection::btree_set(1usize..SLOTS_PER_DAY, 0..24),
        -50.0..50.0f64,
    )
        .prop_map(|(cuts, base)| {
            cuts.into_iter()
                .chain(std::iter::once(SLOTS_PER_DAY))
                .enumerate()
                .map(|(i, slots)| {
                    let minutes = slots * 10;
                    Breakpoint::new((minutes / 60) as u8, (minutes % 60) as u8, base + i as f64)
                })
                .collect()
        })
}

fn pattern(day: BoxedStrategy<IntradayProfile>) -> impl Strategy<Value = WeeklyPattern> {
    (
        day.clone(),
        day.clone(),
        prop::collection::vec(prop::option::of(day), 8),
    )
        .prop_map(|(weekdays, weekends, overrides)| {
            let mut pattern = WeeklyPattern::new("week", Some(weekdays), Some(weekends)).unwrap();
            for (category, profile) in DayCategory::ALL.into_iter().zip(overrides) {
                if let Some(profile) = profile {
                    pattern = pattern.with_override(category, profile).unwrap();
                }
            }
            pattern
        })
}

fn assert_per_category<F, G>(a: &WeeklyPattern, b: &WeeklyPattern, lifted: F, per_day: G)
where
    F: Fn(&WeeklyPattern, &WeeklyPattern) -> opsched::Result<WeeklyPattern>,
    G: Fn(&IntradayProfile, &IntradayProfile) -> opsched::Result<IntradayProfile>,
{
    let combined = lifted(a, b).unwrap();
    assert_eq!(
        combined.weekdays(),
        &per_day(a.weekdays(), b.weekdays()).unwrap()
    );
    for category in DayCategory::ALL {
        let expected = per_day(a.effective(category), b.effective(category)).unwrap();
        assert_eq!(combined.effective(category), &expected, "{category:?}");
    }
}

proptest! {
    #[test]
    fn prop_binary_compaction_round_trip(day in binary_day()) {
        let restored =
            IntradayProfile::from_compact("copy", &day.compactize(), Domain::Binary).unwrap();
        prop_assert_eq!(restored.values(), day.values());
    }

    #[test]
    fn prop_temperature_compaction_round_trip(values in stepped_temperatures()) {
        let day = IntradayProfile::from_slice("temp", Domain::Temperature, &values).unwrap();
        let compact = day.compactize();
        let restored =
            IntradayProfile::from_compact("copy", &compact, Domain::Temperature).unwrap();
        prop_assert_eq!(&restored, &day);
        for pair in compact.windows(2) {
            prop_assert!(pair[0].value != pair[1].value);
        }
    }

    #[test]
    fn prop_breakpoints_survive_expansion(breakpoints in grid_breakpoints()) {
        let day = IntradayProfile::from_compact("grid", &breakpoints, Domain::Real).unwrap();
        prop_assert_eq!(day.compactize(), breakpoints);
    }

    #[test]
    fn prop_real_compaction_round_trip(day in real_day()) {
        let restored =
            IntradayProfile::from_compact("copy", &day.compactize(), Domain::Real).unwrap();
        prop_assert_eq!(restored, day);
    }

    #[test]
    fn prop_binary_pattern_algebra_is_per_category(
        a in pattern(binary_day()),
        b in pattern(binary_day()),
    ) {
        assert_per_category(&a, &b, WeeklyPattern::and, IntradayProfile::and);
        assert_per_category(&a, &b, WeeklyPattern::or, IntradayProfile::or);
        assert_per_category(&a, &b, WeeklyPattern::element_min, IntradayProfile::element_min);
        assert_per_category(&a, &b, WeeklyPattern::element_max, IntradayProfile::element_max);

        let inverted = a.not().unwrap();
        for category in DayCategory::ALL {
            prop_assert_eq!(inverted.effective(category), &a.effective(category).not().unwrap());
        }
    }

    #[test]
    fn prop_real_pattern_algebra_is_per_category(
        a in pattern(real_day()),
        b in pattern(real_day()),
    ) {
        assert_per_category(&a, &b, WeeklyPattern::add, IntradayProfile::add);
        assert_per_category(&a, &b, WeeklyPattern::subtract, IntradayProfile::subtract);
        assert_per_category(&a, &b, WeeklyPattern::element_min, IntradayProfile::element_min);
        assert_per_category(&a, &b, WeeklyPattern::element_max, IntradayProfile::element_max);
    }

    #[test]
    fn prop_de_morgan_and_idempotence(a in binary_day(), b in binary_day()) {
        let lhs = a.and(&b).unwrap().not().unwrap();
        let rhs = a.not().unwrap().or(&b.not().unwrap()).unwrap();
        for slot in 0..SLOTS_PER_DAY {
            prop_assert_eq!(lhs.values()[slot], rhs.values()[slot]);
        }
        let same = a.and(&a).unwrap();
        for slot in 0..SLOTS_PER_DAY {
            prop_assert_eq!(same.values()[slot], a.values()[slot]);
        }
    }
}

fn constant_pattern(name: &str, value: f64) -> Arc<WeeklyPattern> {
    let day = IntradayProfile::constant(name, Domain::Real, value).unwrap();
    Arc::new(WeeklyPattern::uniform(name, day))
}

#[test]
fn test_single_apply_covers_the_year() {
    let p = constant_pattern("p", 3.0);
    let calendar = AnnualCalendar::blank("cal", Domain::Real)
        .apply(Arc::clone(&p), date("0101"), date("1231"))
        .unwrap();
    let runs = calendar.compactize();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].start, date("0101"));
    assert_eq!(runs[0].end, date("1231"));
    assert_eq!(runs[0].len(), 365);
    assert_eq!(*runs[0].pattern, *p);
}

#[test]
fn test_overlapping_applies_resolve_last_write_wins() {
    let default = constant_pattern("default", 0.0);
    let a = constant_pattern("a", 1.0);
    let b = constant_pattern("b", 2.0);
    let calendar = AnnualCalendar::filled("cal", Arc::clone(&default))
        .apply(Arc::clone(&a), date("0101"), date("0630"))
        .unwrap()
        .apply(Arc::clone(&b), date("0301"), date("0930"))
        .unwrap();

    let runs = calendar.compactize();
    let bounds: Vec<(MonthDay, MonthDay)> = runs.iter().map(|r| (r.start, r.end)).collect();
    assert_eq!(
        bounds,
        vec![
            (date("0101"), date("0228")),
            (date("0301"), date("0930")),
            (date("1001"), date("1231")),
        ]
    );
    assert_eq!(*runs[0].pattern, *a);
    assert_eq!(*runs[1].pattern, *b);
    assert_eq!(*runs[2].pattern, *default);

    assert_eq!(**calendar.pattern_on(date("0228")), *a);
    assert_eq!(**calendar.pattern_on(date("0301")), *b);
    assert_eq!(**calendar.pattern_on(date("0930")), *b);
    assert_eq!(**calendar.pattern_on(date("1001")), *default);

    let rebuilt = AnnualCalendar::from_compact("cal", &runs).unwrap();
    assert_eq!(rebuilt, calendar);
}

#[test]
fn test_binary_compact_example() {
    let breakpoints = [
        Breakpoint::new(8, 0, 0.0),
        Breakpoint::new(18, 0, 1.0),
        Breakpoint::new(24, 0, 0.0),
    ];
    let day = IntradayProfile::from_compact("x", &breakpoints, Domain::Binary).unwrap();
    assert_eq!(day.compactize(), breakpoints.to_vec());
}

#[test]
fn test_temperature_bounds() {
    let mut values = [20.0; SLOTS_PER_DAY];
    values[50] = 250.0;
    let err = IntradayProfile::new("hot", Domain::Temperature, values).unwrap_err();
    assert!(matches!(
        err,
        ScheduleError::OutOfRange {
            slot: 50,
            domain: Domain::Temperature,
            ..
        }
    ));

    values[50] = 75.0;
    assert!(IntradayProfile::new("warm", Domain::Temperature, values).is_ok());
}

#[test]
fn test_eight_digit_tokens_match_four_digit_tokens() {
    assert_eq!(date("20250301"), date("0301"));
    assert!("20240301".parse::<MonthDay>().is_err());
    assert!("0229".parse::<MonthDay>().is_err());
}
