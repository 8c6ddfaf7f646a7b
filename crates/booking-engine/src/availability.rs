//! Remaining quantity of department resources for a proposed booking.
//!
//! A physical requirement has a nominal ceiling: the department's declared
//! quantity for that date when one exists, otherwise the catalog's
//! `totalQuantity`. Every overlapping event that claims the same resource,
//! at any venue and from any tagged department, reduces what is left.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar::calendar_date;
use crate::conflict::{find_requirement_conflicts, NameMatch, RequirementConflict};
use crate::model::{AvailabilityRecord, Department, Event, ProposedBooking, Requirement, RequirementKind};
use crate::schedule::Schedule;

/// Units of `requirement_name` held by selected claims across all `events`.
pub fn used_quantity<'a>(
    requirement_name: &str,
    events: impl IntoIterator<Item = &'a Event>,
    name_match: NameMatch,
) -> u32 {
    events
        .into_iter()
        .flat_map(|event| event.claims())
        .filter(|(_, claim)| name_match.matches(&claim.name, requirement_name))
        .map(|(_, claim)| claim.claimed_quantity())
        .fold(0u32, u32::saturating_add)
}

/// `total` minus everything the conflicting events hold, floored at zero.
pub fn available_quantity(total: u32, conflicts: &[RequirementConflict]) -> u32 {
    let used = conflicts
        .iter()
        .map(|c| c.claimed_quantity)
        .fold(0u32, u32::saturating_add);
    total.saturating_sub(used)
}

/// The ceiling before subtracting conflicts, `None` for services.
///
/// A per-date record overrides the catalog total; a record marked unavailable
/// yields zero, as does a catalog entry flagged `isAvailable: false`.
pub fn nominal_capacity(requirement: &Requirement, record: Option<&AvailabilityRecord>) -> Option<u32> {
    if requirement.kind == RequirementKind::Service {
        return None;
    }
    match record {
        Some(r) if !r.is_available => Some(0),
        Some(r) => Some(r.quantity.or(requirement.total_quantity).unwrap_or(0)),
        None if requirement.is_available == Some(false) => Some(0),
        None => Some(requirement.total_quantity.unwrap_or(0)),
    }
}

/// What the availability modal shows for one catalog requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementAvailability {
    /// Name of the department whose catalog lists this requirement; empty
    /// when the report was built outside [`department_availability`].
    #[serde(default)]
    pub department: String,
    pub requirement_id: String,
    pub name: String,
    pub kind: RequirementKind,
    /// Nominal ceiling for the date; absent for services.
    pub total: Option<u32>,
    pub used: u32,
    /// `total - used`, floored at zero; absent for services.
    pub available: Option<u32>,
    pub conflicting_event_ids: Vec<String>,
}

impl RequirementAvailability {
    /// The most a new claim may request: the remaining quantity while other
    /// events hold the resource, the nominal total otherwise.
    pub fn bookable(&self) -> Option<u32> {
        if self.conflicting_event_ids.is_empty() {
            self.total
        } else {
            self.available
        }
    }
}

/// The record declared for `requirement` on the proposed date, if any.
///
/// Record dates resolve in `tz`, the same zone the events were placed in.
pub fn record_for<'a>(
    requirement: &Requirement,
    proposed: &ProposedBooking,
    records: &'a [AvailabilityRecord],
    tz: Tz,
) -> Option<&'a AvailabilityRecord> {
    records.iter().find(|r| {
        r.requirement_id == requirement.id && calendar_date(&r.date, tz).is_ok_and(|d| d == proposed.date)
    })
}

pub fn requirement_availability(
    schedule: &Schedule,
    requirement: &Requirement,
    proposed: &ProposedBooking,
    record: Option<&AvailabilityRecord>,
    name_match: NameMatch,
) -> RequirementAvailability {
    let conflicts = find_requirement_conflicts(schedule, &requirement.text, proposed, name_match);
    let total = nominal_capacity(requirement, record);
    let used = conflicts
        .iter()
        .map(|c| c.claimed_quantity)
        .fold(0u32, u32::saturating_add);

    RequirementAvailability {
        department: String::new(),
        requirement_id: requirement.id.clone(),
        name: requirement.text.clone(),
        kind: requirement.kind,
        total,
        used,
        available: total.map(|t| available_quantity(t, &conflicts)),
        conflicting_event_ids: conflicts.into_iter().map(|c| c.event.id).collect(),
    }
}

/// Availability of every requirement in a department's catalog.
pub fn department_availability(
    schedule: &Schedule,
    department: &Department,
    proposed: &ProposedBooking,
    records: &[AvailabilityRecord],
    name_match: NameMatch,
) -> Vec<RequirementAvailability> {
    department
        .requirements
        .iter()
        .map(|req| {
            let record = record_for(req, proposed, records, schedule.timezone());
            RequirementAvailability {
                department: department.name.clone(),
                ..requirement_availability(schedule, req, proposed, record, name_match)
            }
        })
        .collect()
}
