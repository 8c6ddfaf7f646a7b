//! Detect bookings that collide with a proposed event.
//!
//! Two kinds of collision are reported:
//!
//! - **Venue conflicts**: same location, same day, overlapping times.
//! - **Requirement conflicts**: any location, same day, overlapping times, and
//!   the existing event holds an active claim on the same named resource.
//!
//! Both use half-open ranges. Adjacent bookings (one ends exactly when the other
//! starts) are NOT conflicts.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::availability::{self, RequirementAvailability};
use crate::model::{AvailabilityRecord, Department, Event, ProposedBooking, RequirementClaim};
use crate::schedule::{Schedule, ScheduledEvent};

/// How a claim's `name` is compared with the requirement being checked.
///
/// Claims reference catalog requirements by display text rather than id, so a
/// renamed requirement stops matching old claims. `Exact` keeps that behavior;
/// `Normalized` ignores case and surrounding whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameMatch {
    #[default]
    Exact,
    Normalized,
}

impl NameMatch {
    pub fn matches(self, claim_name: &str, requirement_name: &str) -> bool {
        match self {
            NameMatch::Exact => claim_name == requirement_name,
            NameMatch::Normalized => {
                claim_name.trim().to_lowercase() == requirement_name.trim().to_lowercase()
            }
        }
    }
}

/// An existing event that occupies the proposed venue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueConflict {
    pub event: Event,
    pub overlap_minutes: u16,
}

/// An existing event that already claims the requirement being checked.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementConflict {
    pub event: Event,
    /// Units of the requirement this event holds, summed over its departments.
    pub claimed_quantity: u32,
    pub overlap_minutes: u16,
}

/// Events at the proposed location whose times overlap the proposal on the same day.
pub fn find_venue_conflicts(schedule: &Schedule, proposed: &ProposedBooking) -> Vec<VenueConflict> {
    let conflicts: Vec<VenueConflict> = schedule
        .on(proposed.date)
        .filter(|s| s.event.location == proposed.location)
        .filter(|s| s.range.overlaps(&proposed.range))
        .map(|s| VenueConflict {
            event: s.event.clone(),
            overlap_minutes: s.range.overlap_minutes(&proposed.range),
        })
        .collect();

    debug!(
        location = %proposed.location,
        date = %proposed.date,
        range = %proposed.range,
        found = conflicts.len(),
        "venue conflict check"
    );
    conflicts
}

/// Events anywhere that overlap the proposal and actively claim `requirement_name`.
///
/// Location is ignored: shared resources move between venues.
pub fn find_requirement_conflicts(
    schedule: &Schedule,
    requirement_name: &str,
    proposed: &ProposedBooking,
    name_match: NameMatch,
) -> Vec<RequirementConflict> {
    schedule
        .on(proposed.date)
        .filter(|s| s.range.overlaps(&proposed.range))
        .filter_map(|s| requirement_conflict(s, requirement_name, proposed, name_match))
        .collect()
}

fn requirement_conflict(
    scheduled: &ScheduledEvent,
    requirement_name: &str,
    proposed: &ProposedBooking,
    name_match: NameMatch,
) -> Option<RequirementConflict> {
    let matching: Vec<&RequirementClaim> = scheduled
        .event
        .claims()
        .map(|(_, claim)| claim)
        .filter(|claim| name_match.matches(&claim.name, requirement_name))
        .collect();

    if !matching.iter().any(|claim| claim.is_active()) {
        return None;
    }

    Some(RequirementConflict {
        event: scheduled.event.clone(),
        claimed_quantity: matching
            .iter()
            .map(|c| c.claimed_quantity())
            .fold(0u32, u32::saturating_add),
        overlap_minutes: scheduled.range.overlap_minutes(&proposed.range),
    })
}

/// Everything the request form needs to know before submitting a booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCheck {
    pub venue_conflicts: Vec<VenueConflict>,
    pub requirements: Vec<RequirementAvailability>,
}

impl BookingCheck {
    /// A venue conflict blocks the booking; requirement conflicts only warn.
    pub fn is_blocked(&self) -> bool {
        !self.venue_conflicts.is_empty()
    }

    pub fn has_requirement_conflicts(&self) -> bool {
        self.requirements.iter().any(|r| !r.conflicting_event_ids.is_empty())
    }
}

/// Venue conflicts plus availability for every requirement of the given departments.
pub fn check_booking(
    schedule: &Schedule,
    proposed: &ProposedBooking,
    departments: &[Department],
    records: &[AvailabilityRecord],
    name_match: NameMatch,
) -> BookingCheck {
    let requirements = departments
        .iter()
        .flat_map(|dept| {
            availability::department_availability(schedule, dept, proposed, records, name_match)
        })
        .collect();

    BookingCheck {
        venue_conflicts: find_venue_conflicts(schedule, proposed),
        requirements,
    }
}
