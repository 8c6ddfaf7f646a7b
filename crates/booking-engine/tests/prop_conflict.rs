//! Property-based tests for overlap and availability using proptest.
//!
//! These verify invariants that should hold for *any* schedule, not just the
//! hand-picked cases in `conflict_tests.rs` and `availability_tests.rs`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use proptest::prelude::*;
use booking_engine::availability::available_quantity;
use booking_engine::conflict::{find_requirement_conflicts, find_venue_conflicts, NameMatch};
use booking_engine::model::{Event, ProposedBooking, RequirementClaim};
use booking_engine::time::{ClockTime, TimeRange};
use booking_engine::Schedule;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A non-empty range inside one day, on a 15-minute grid.
fn arb_range() -> impl Strategy<Value = (u16, u16)> {
    (0u16..95).prop_flat_map(|s| ((s + 1)..=96).prop_map(move |e| (s * 15, e * 15)))
}

fn arb_location() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Hall 1".to_string()),
        Just("Hall 2".to_string()),
        Just("Gym".to_string()),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    (arb_location(), arb_range(), 0u32..60, any::<bool>()).prop_map(|(location, (s, e), qty, selected)| {
        event(&location, s, e, qty, selected)
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn hm(minutes: u16) -> String {
    ClockTime::from_minutes(minutes).unwrap().to_string()
}

fn event(location: &str, start: u16, end: u16, chairs: u32, selected: bool) -> Event {
    Event {
        id: format!("{location}@{start}"),
        event_title: String::new(),
        location: location.to_string(),
        start_date: "2024-06-01".to_string(),
        start_time: hm(start),
        end_date: None,
        end_time: hm(end),
        tagged_departments: vec!["GSO".to_string()],
        department_requirements: BTreeMap::from([(
            "GSO".to_string(),
            vec![RequirementClaim {
                name: "Chairs".to_string(),
                selected,
                quantity: Some(chairs),
                notes: None,
            }],
        )]),
    }
}

fn proposal(location: &str, start: u16, end: u16) -> ProposedBooking {
    ProposedBooking::new(location, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), &hm(start), &hm(end)).unwrap()
}

fn range(start: u16, end: u16) -> TimeRange {
    TimeRange::new(
        ClockTime::from_minutes(start).unwrap(),
        ClockTime::from_minutes(end).unwrap(),
    )
    .unwrap()
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: overlap is exactly s1 < e2 && s2 < e1, and symmetric
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn overlap_matches_half_open_definition(a in arb_range(), b in arb_range()) {
        let ra = range(a.0, a.1);
        let rb = range(b.0, b.1);

        prop_assert_eq!(ra.overlaps(&rb), a.0 < b.1 && b.0 < a.1);
        prop_assert_eq!(ra.overlaps(&rb), rb.overlaps(&ra));
        prop_assert_eq!(ra.overlap_minutes(&rb) > 0, ra.overlaps(&rb));
    }
}

// ---------------------------------------------------------------------------
// Property 2: venue conflicts never leave the proposed location
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn venue_conflicts_stay_at_location(
        events in prop::collection::vec(arb_event(), 0..20),
        location in arb_location(),
        (s, e) in arb_range(),
    ) {
        let schedule = Schedule::build(events, chrono_tz::UTC);
        let p = proposal(&location, s, e);

        for c in find_venue_conflicts(&schedule, &p) {
            prop_assert_eq!(&c.event.location, &location);
            prop_assert!(c.overlap_minutes > 0);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: requirement conflicts do not depend on the proposed location
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn requirement_conflicts_ignore_location(
        events in prop::collection::vec(arb_event(), 0..20),
        (s, e) in arb_range(),
    ) {
        let schedule = Schedule::build(events, chrono_tz::UTC);

        let ids = |loc: &str| -> Vec<String> {
            find_requirement_conflicts(&schedule, "Chairs", &proposal(loc, s, e), NameMatch::Exact)
                .into_iter()
                .map(|c| c.event.id)
                .collect()
        };

        prop_assert_eq!(ids("Hall 1"), ids("Gym"));
    }
}

// ---------------------------------------------------------------------------
// Property 4: availability is never negative and never grows with more events
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn availability_monotonic_non_increasing(
        events in prop::collection::vec(arb_event(), 0..20),
        extra in arb_event(),
        total in 0u32..200,
        (s, e) in arb_range(),
    ) {
        let p = proposal("Hall 1", s, e);

        let before_schedule = Schedule::build(events.clone(), chrono_tz::UTC);
        let before = available_quantity(
            total,
            &find_requirement_conflicts(&before_schedule, "Chairs", &p, NameMatch::Exact),
        );

        let mut more = events;
        more.push(extra);
        let after_schedule = Schedule::build(more, chrono_tz::UTC);
        let after = available_quantity(
            total,
            &find_requirement_conflicts(&after_schedule, "Chairs", &p, NameMatch::Exact),
        );

        prop_assert!(after <= before, "available grew from {} to {}", before, after);
        prop_assert!(before <= total);
    }
}
