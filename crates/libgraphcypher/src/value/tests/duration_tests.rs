use crate::value::CypherDuration;
use proptest::prelude::*;

#[test]
fn parses_every_component() {
    let duration = CypherDuration::parse_iso("P1Y2M10DT2H30M").expect("valid duration");

    assert_eq!(duration, CypherDuration {
        months: 14,
        days: 10,
        seconds: 9000,
        nanoseconds: 0,
    });
    assert_eq!(duration.to_string(), "P1Y2M10DT2H30M");
}

#[test]
fn weeks_are_counted_as_days() {
    let duration = CypherDuration::parse_iso("P2W").expect("valid duration");

    assert_eq!(duration.days, 14);
    assert_eq!(duration.to_string(), "P14D");
}

#[test]
fn negative_fractional_seconds() {
    let duration = CypherDuration::parse_iso("-PT1.5S").expect("valid duration");

    assert_eq!(duration.seconds, -1);
    assert_eq!(duration.nanoseconds, -500_000_000);
    assert_eq!(duration.to_string(), "-PT1.5S");
}

#[test]
fn rejects_empty_durations() {
    assert_eq!(CypherDuration::parse_iso("P"), None);
    assert_eq!(CypherDuration::parse_iso("PT"), None);
    assert_eq!(CypherDuration::parse_iso("1D"), None);
}

#[test]
fn zero_duration_renders_as_zero_seconds() {
    assert_eq!(CypherDuration::default().to_string(), "PT0S");
}

#[test]
fn overflowing_components_are_rejected() {
    assert_eq!(CypherDuration::parse_iso("P999999999999999999Y"), None);
    assert_eq!(CypherDuration::parse_iso("P9223372036854775807W"), None);
    assert_eq!(CypherDuration::parse_iso("PT9223372036854775807H"), None);
    assert_eq!(CypherDuration::parse_iso("PT9223372036854775807M1S"), None);
    assert_eq!(CypherDuration::parse_iso("P99999999999999999999D"), None);
}

proptest! {
    #[test]
    fn canonical_form_parses_back(days in 0i64..1000, hours in 0i64..48, minutes in 0i64..120) {
        let input = format!("P{days}DT{hours}H{minutes}M");
        let parsed = CypherDuration::parse_iso(&input).expect("valid duration");
        let canonical = parsed.to_string();

        prop_assert_eq!(CypherDuration::parse_iso(&canonical), Some(parsed));
    }

    #[test]
    fn huge_components_never_panic(years in 0i64..=i64::MAX, hours in 0i64..=i64::MAX, weeks in 0i64..=i64::MAX) {
        let input = format!("P{years}Y{weeks}WT{hours}H");
        let parsed = CypherDuration::parse_iso(&input);
        let months = years.checked_mul(12);
        let seconds = hours.checked_mul(3600);
        let days = weeks.checked_mul(7);

        match (months, days, seconds) {
            (Some(months), Some(days), Some(seconds)) => prop_assert_eq!(parsed, Some(CypherDuration {
                months,
                days,
                seconds,
                nanoseconds: 0,
            })),
            _ => prop_assert_eq!(parsed, None),
        }
    }
}
