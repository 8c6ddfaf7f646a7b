//! Integration tests for the `booking-check` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to run each subcommand against
//! the JSON fixtures, plus the error paths (bad input, unreachable API).

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Helper: a command reading events, departments and records from fixtures.
fn booking_check() -> Command {
    let mut cmd = Command::cargo_bin("booking-check").unwrap();
    cmd.env_remove("RUST_LOG")
        .args(["--events", &fixture("events.json")])
        .args(["--departments", &fixture("departments.json")])
        .args(["--records", &fixture("records.json")]);
    cmd
}

fn booking(location: &str, start: &str, end: &str) -> Vec<String> {
    ["-l", location, "-d", "2024-06-01", "-s", start, "-e", end]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// venue
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn venue_overlap_reported() {
    booking_check()
        .arg("venue")
        .args(booking("Hall 1", "10:00", "12:00"))
        .assert()
        .success()
        .stdout(predicate::str::contains("VENUE: 1 booking(s) overlap Hall 1"))
        .stdout(predicate::str::contains("[evt-a] overlaps 60 min"));
}

#[test]
fn venue_back_to_back_is_free() {
    booking_check()
        .arg("venue")
        .args(booking("Hall 1", "11:00", "12:00"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No venue conflicts"));
}

#[test]
fn venue_json_output_is_an_array() {
    let output = booking_check()
        .args(["--format", "json", "venue"])
        .args(booking("Hall 1", "10:00", "12:00"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout must be JSON");
    assert_eq!(value[0]["event"]["id"], "evt-a");
    assert_eq!(value[0]["overlapMinutes"], 60);
}

// ─────────────────────────────────────────────────────────────────────────────
// requirement / availability / check
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn requirement_conflict_at_other_venue() {
    booking_check()
        .args(["requirement", "--name", "Chairs", "--total", "100"])
        .args(booking("Hall 2", "10:00", "12:00"))
        .assert()
        .success()
        .stdout(predicate::str::contains("REQ: Chairs held by 1 event(s)"))
        .stdout(predicate::str::contains("Available: 50 of 100"));
}

#[test]
fn availability_uses_records_and_conflicts() {
    booking_check()
        .args(["availability", "--department", "GSO"])
        .args(booking("Hall 2", "10:00", "12:00"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Chairs\t50/100 available  REQ (evt-a)"))
        .stdout(predicate::str::contains("Tables\t12/12 available"))
        .stdout(predicate::str::contains("Sound System\tservice"));
}

#[test]
fn timestamped_records_resolve_in_configured_timezone() {
    let run = |tz: &str| {
        Command::cargo_bin("booking-check")
            .unwrap()
            .env_remove("RUST_LOG")
            .args(["--events", &fixture("events.json")])
            .args(["--departments", &fixture("departments.json")])
            .args(["--records", &fixture("records_timestamped.json")])
            .args(["--timezone", tz, "availability", "--department", "GSO"])
            .args(booking("Hall 2", "10:00", "12:00"))
            .assert()
            .success()
    };

    run("Asia/Manila").stdout(predicate::str::contains("Tables\t12/12 available"));
    run("UTC").stdout(predicate::str::contains("Tables\t20/20 available"));
}

#[test]
fn check_exits_nonzero_when_venue_taken() {
    booking_check()
        .args(["check", "--department", "GSO"])
        .args(booking("Hall 1", "10:00", "12:00"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("VENUE"));
}

#[test]
fn check_passes_with_only_advisories() {
    booking_check()
        .args(["check", "--department", "dept-gso"])
        .args(booking("Hall 2", "10:00", "12:00"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No venue conflicts"))
        .stdout(predicate::str::contains("REQ (evt-a)"));
}

#[test]
fn unknown_department_fails() {
    booking_check()
        .args(["availability", "--department", "Treasury"])
        .args(booking("Hall 2", "10:00", "12:00"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown department: Treasury"));
}

// ─────────────────────────────────────────────────────────────────────────────
// slots / free
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn slots_block_booking_end_by_default() {
    booking_check()
        .args(["slots", "-l", "Hall 1", "-d", "2024-06-01"])
        .args(["--from", "08:00", "--to", "12:00", "--step", "60"])
        .assert()
        .success()
        .stdout(predicate::str::contains("09:00\tVENUE"))
        .stdout(predicate::str::contains("11:00\tVENUE"))
        .stdout(predicate::str::contains("12:00\tVENUE").not());
}

#[test]
fn slots_half_open_frees_booking_end() {
    booking_check()
        .args(["slots", "-l", "Hall 1", "-d", "2024-06-01", "--half-open"])
        .args(["--from", "08:00", "--to", "12:00", "--step", "60"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10:00\tVENUE"))
        .stdout(predicate::str::contains("11:00\tVENUE").not());
}

#[test]
fn slots_flag_requirements_held_elsewhere() {
    booking_check()
        .args(["slots", "-l", "Hall 2", "-d", "2024-06-01", "--requirement", "Chairs"])
        .args(["--from", "09:00", "--to", "09:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("09:00\tREQ Chairs"));
}

#[test]
fn free_windows_around_booking() {
    booking_check()
        .args(["free", "-l", "Hall 1", "-d", "2024-06-01", "--from", "08:00", "--to", "17:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("08:00-09:00\t60 min"))
        .stdout(predicate::str::contains("11:00-17:00\t360 min"));
}

// ─────────────────────────────────────────────────────────────────────────────
// validate
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn validate_rejects_over_quantity() {
    booking_check()
        .args(["validate", "--claims", &fixture("claims_over.json"), "--department", "GSO"])
        .args(booking("Hall 2", "10:00", "12:00"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("REJECTED"))
        .stdout(predicate::str::contains("Chairs (60 requested, 50 available)"));
}

#[test]
fn validate_accepts_within_limits() {
    booking_check()
        .args(["validate", "--claims", &fixture("claims_ok.json"), "--department", "GSO"])
        .args(booking("Hall 2", "10:00", "12:00"))
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Error handling
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn unreachable_api_is_an_error_not_an_empty_result() {
    Command::cargo_bin("booking-check")
        .unwrap()
        .env_remove("BOOKING_API_URL")
        .args(["--api-url", "http://127.0.0.1:9/api", "--timeout-secs", "2"])
        .arg("venue")
        .args(booking("Hall 1", "10:00", "12:00"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("No venue conflicts").not())
        .stderr(predicate::str::contains("Failed to fetch events"));
}

#[test]
fn inverted_range_rejected() {
    booking_check()
        .arg("venue")
        .args(booking("Hall 1", "12:00", "10:00"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid time range"));
}

#[test]
fn malformed_time_rejected_by_argument_parser() {
    booking_check()
        .arg("venue")
        .args(booking("Hall 1", "10am", "12:00"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid time"));
}

#[test]
fn unknown_timezone_rejected() {
    booking_check()
        .args(["--timezone", "Mars/Olympus", "venue"])
        .args(booking("Hall 1", "10:00", "12:00"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown timezone"));
}

#[test]
fn file_mode_needs_departments_for_catalog_commands() {
    Command::cargo_bin("booking-check")
        .unwrap()
        .args(["--events", &fixture("events.json")])
        .args(["availability", "--department", "GSO"])
        .args(booking("Hall 2", "10:00", "12:00"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--departments <FILE> is required"));
}

#[test]
fn no_subcommand_shows_usage() {
    Command::cargo_bin("booking-check")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
