//! WASM bindings for booking-engine.
//!
//! Exposes venue/requirement conflict checks, availability, schedule picker
//! badges and the save gate to the request form via `wasm-bindgen`. All complex
//! types cross the boundary as JSON strings in the same camelCase shape the
//! events API returns, so the front end can pass `response.data` straight in.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p booking-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/src/wasm/ \
//!   target/wasm32-unknown-unknown/release/booking_engine_wasm.wasm
//! ```

use booking_engine::availability::{self, RequirementAvailability};
use booking_engine::calendar::{calendar_date, parse_timezone};
use booking_engine::conflict::NameMatch;
use booking_engine::error::BookingError;
use booking_engine::model::{AvailabilityRecord, Department, Event, ProposedBooking, RequirementClaim};
use booking_engine::slots::IntervalRule;
use booking_engine::time::ClockTime;
use booking_engine::Schedule;
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// The booking form state as the front end holds it.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProposedInput {
    location: String,
    start_date: String,
    start_time: String,
    end_time: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationDto {
    ok: bool,
    message: Option<String>,
    violations: Vec<booking_engine::error::QuantityViolation>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_json<T: DeserializeOwned>(what: &str, json: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid {} JSON: {}", what, e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn parse_date(s: &str, tz: Tz) -> Result<NaiveDate, JsValue> {
    calendar_date(s, tz).map_err(js_err)
}

fn name_match(normalized: bool) -> NameMatch {
    if normalized {
        NameMatch::Normalized
    } else {
        NameMatch::Exact
    }
}

/// Build the day-indexed schedule from a JSON array of API events.
fn load_schedule(events_json: &str, tz: Tz) -> Result<Schedule, JsValue> {
    let events: Vec<Event> = parse_json("events", events_json)?;
    Ok(Schedule::build(events, tz))
}

fn load_proposed(proposed_json: &str, tz: Tz) -> Result<ProposedBooking, JsValue> {
    let input: ProposedInput = parse_json("booking", proposed_json)?;
    let date = parse_date(&input.start_date, tz)?;
    ProposedBooking::new(input.location, date, &input.start_time, &input.end_time).map_err(js_err)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Events at the proposed venue whose times overlap the proposal.
///
/// `proposed_json` is `{location, startDate, startTime, endTime}`. Returns a
/// JSON array of `{event, overlapMinutes}`.
#[wasm_bindgen(js_name = "findVenueConflicts")]
pub fn find_venue_conflicts(events_json: &str, proposed_json: &str, timezone: &str) -> Result<String, JsValue> {
    let tz = parse_timezone(timezone).map_err(js_err)?;
    let schedule = load_schedule(events_json, tz)?;
    let proposed = load_proposed(proposed_json, tz)?;

    to_json(&booking_engine::find_venue_conflicts(&schedule, &proposed))
}

/// Events at any venue that overlap the proposal and claim `requirement_name`.
///
/// Returns a JSON array of `{event, claimedQuantity, overlapMinutes}`.
#[wasm_bindgen(js_name = "findRequirementConflicts")]
pub fn find_requirement_conflicts(
    events_json: &str,
    requirement_name: &str,
    proposed_json: &str,
    timezone: &str,
    normalized_names: bool,
) -> Result<String, JsValue> {
    let tz = parse_timezone(timezone).map_err(js_err)?;
    let schedule = load_schedule(events_json, tz)?;
    let proposed = load_proposed(proposed_json, tz)?;

    to_json(&booking_engine::find_requirement_conflicts(
        &schedule,
        requirement_name,
        &proposed,
        name_match(normalized_names),
    ))
}

/// Remaining units of `requirement_name` out of `total` for the proposal.
#[wasm_bindgen(js_name = "availableQuantity")]
pub fn available_quantity(
    events_json: &str,
    requirement_name: &str,
    total: u32,
    proposed_json: &str,
    timezone: &str,
    normalized_names: bool,
) -> Result<u32, JsValue> {
    let tz = parse_timezone(timezone).map_err(js_err)?;
    let schedule = load_schedule(events_json, tz)?;
    let proposed = load_proposed(proposed_json, tz)?;
    let conflicts =
        booking_engine::find_requirement_conflicts(&schedule, requirement_name, &proposed, name_match(normalized_names));

    Ok(booking_engine::available_quantity(total, &conflicts))
}

/// Availability report for every requirement of one department.
///
/// `records_json` is the department's per-date availability records (may be `[]`).
#[wasm_bindgen(js_name = "departmentAvailability")]
pub fn department_availability(
    events_json: &str,
    department_json: &str,
    proposed_json: &str,
    records_json: &str,
    timezone: &str,
    normalized_names: bool,
) -> Result<String, JsValue> {
    let tz = parse_timezone(timezone).map_err(js_err)?;
    let schedule = load_schedule(events_json, tz)?;
    let proposed = load_proposed(proposed_json, tz)?;
    let department: Department = parse_json("department", department_json)?;
    let records: Vec<AvailabilityRecord> = parse_json("availability records", records_json)?;

    let report = availability::department_availability(
        &schedule,
        &department,
        &proposed,
        &records,
        name_match(normalized_names),
    );
    to_json(&report)
}

/// VENUE/REQ badges for the schedule picker options.
///
/// `options_json` is an array of `"HH:MM"` strings; `requirement_names_json`
/// an array of the requirement names the user has selected. With `half_open`
/// false, an option equal to a booking's end time counts as booked.
#[wasm_bindgen(js_name = "slotBoard")]
pub fn slot_board(
    events_json: &str,
    location: &str,
    date: &str,
    options_json: &str,
    requirement_names_json: &str,
    timezone: &str,
    half_open: bool,
    normalized_names: bool,
) -> Result<String, JsValue> {
    let tz = parse_timezone(timezone).map_err(js_err)?;
    let schedule = load_schedule(events_json, tz)?;
    let date = parse_date(date, tz)?;
    let options: Vec<ClockTime> = parse_json("time options", options_json)?;
    let names: Vec<String> = parse_json("requirement names", requirement_names_json)?;
    let rule = if half_open {
        IntervalRule::HalfOpen
    } else {
        IntervalRule::Inclusive
    };

    let board = booking_engine::slot_board(&schedule, location, date, &options, &names, rule, name_match(normalized_names));
    to_json(&board)
}

/// Save-time gate. Returns `{ok, message, violations}`; never throws for a
/// rejected claim set, only for malformed input.
///
/// With `department` set, only that department's entries of a merged report
/// limit the claims.
#[wasm_bindgen(js_name = "validateClaims")]
pub fn validate_claims(
    claims_json: &str,
    availability_json: &str,
    department: Option<String>,
    normalized_names: bool,
) -> Result<String, JsValue> {
    let claims: Vec<RequirementClaim> = parse_json("claims", claims_json)?;
    let report: Vec<RequirementAvailability> = parse_json("availability", availability_json)?;
    let matching = name_match(normalized_names);

    let outcome = match department.as_deref() {
        Some(department) => booking_engine::validate_department_claims(department, &claims, &report, matching),
        None => booking_engine::validate_claims(&claims, &report, matching),
    };
    let dto = match outcome {
        Ok(()) => ValidationDto {
            ok: true,
            message: None,
            violations: Vec::new(),
        },
        Err(err) => {
            let message = Some(err.to_string());
            let violations = match err {
                BookingError::QuantityExceeded(v) => v,
                _ => Vec::new(),
            };
            ValidationDto {
                ok: false,
                message,
                violations,
            }
        }
    };
    to_json(&dto)
}
