//! End-to-end check of a request form session against a JSON event feed.

use chrono::NaiveDate;
use booking_engine::conflict::{check_booking, NameMatch};
use booking_engine::gate::validate_claims;
use booking_engine::model::{ApiEnvelope, Department, Event, ProposedBooking, RequirementClaim};
use booking_engine::slots::{slot_board, IntervalRule, SlotBadge};
use booking_engine::time::ClockTime;
use booking_engine::Schedule;

const EVENTS: &str = r#"{
  "data": [
    {
      "_id": "evt-a",
      "eventTitle": "Barangay Assembly",
      "location": "Hall 1",
      "startDate": "2024-06-01",
      "startTime": "09:00",
      "endDate": "2024-06-01",
      "endTime": "11:00",
      "taggedDepartments": ["GSO"],
      "departmentRequirements": {
        "GSO": [
          { "name": "Chairs", "selected": true, "quantity": 50 },
          { "name": "Sound System", "selected": true, "notes": "2 mics" }
        ]
      }
    }
  ]
}"#;

const DEPARTMENTS: &str = r#"{
  "data": [
    {
      "_id": "dept-gso",
      "name": "GSO",
      "requirements": [
        { "_id": "req-chairs", "text": "Chairs", "type": "physical", "totalQuantity": 100, "isAvailable": true },
        { "_id": "req-sound", "text": "Sound System", "type": "service", "responsiblePerson": "A. Reyes" }
      ]
    }
  ]
}"#;

fn load() -> (Schedule, Vec<Department>) {
    let events: ApiEnvelope<Vec<Event>> = serde_json::from_str(EVENTS).unwrap();
    let departments: ApiEnvelope<Vec<Department>> = serde_json::from_str(DEPARTMENTS).unwrap();
    (Schedule::build(events.data, chrono_tz::UTC), departments.data)
}

fn june_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

#[test]
fn same_hall_overlap_is_a_venue_conflict() {
    let (schedule, departments) = load();
    let proposed = ProposedBooking::new("Hall 1", june_first(), "10:00", "12:00").unwrap();

    let check = check_booking(&schedule, &proposed, &departments, &[], NameMatch::Exact);

    assert!(check.is_blocked());
    assert_eq!(check.venue_conflicts[0].event.id, "evt-a");
}

#[test]
fn other_hall_gets_only_a_requirement_advisory() {
    let (schedule, departments) = load();
    let proposed = ProposedBooking::new("Hall 2", june_first(), "10:00", "12:00").unwrap();

    let check = check_booking(&schedule, &proposed, &departments, &[], NameMatch::Exact);

    assert!(!check.is_blocked());
    assert!(check.has_requirement_conflicts());
    let chairs = check.requirements.iter().find(|r| r.name == "Chairs").unwrap();
    assert_eq!(chairs.available, Some(50));

    let board = slot_board(
        &schedule,
        "Hall 2",
        june_first(),
        &[ClockTime::parse("10:00").unwrap()],
        &["Chairs".to_string()],
        IntervalRule::Inclusive,
        NameMatch::Exact,
    );
    assert_eq!(board[0].badge, Some(SlotBadge::Req));
    assert!(board[0].selectable);
}

#[test]
fn saving_more_chairs_than_remain_is_refused() {
    let (schedule, departments) = load();
    let proposed = ProposedBooking::new("Hall 2", june_first(), "10:00", "12:00").unwrap();
    let check = check_booking(&schedule, &proposed, &departments, &[], NameMatch::Exact);

    let too_many = [RequirementClaim {
        name: "Chairs".to_string(),
        selected: true,
        quantity: Some(60),
        notes: None,
    }];
    let enough = [RequirementClaim {
        quantity: Some(50),
        ..too_many[0].clone()
    }];

    assert!(validate_claims(&too_many, &check.requirements, NameMatch::Exact).is_err());
    assert!(validate_claims(&enough, &check.requirements, NameMatch::Exact).is_ok());
}
