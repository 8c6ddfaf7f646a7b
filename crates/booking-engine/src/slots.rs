//! Badges for the start-time options of the schedule picker.
//!
//! Each option is checked as a single instant against the day's events:
//! a same-venue hit disables the option (`VENUE`), a hit on a claimed
//! requirement at any venue only marks it (`REQ`).
//!
//! Unlike the conflict evaluators, the default rule here counts an instant
//! that equals an event's end time as booked, so the option right after a
//! booking is disabled too. [`IntervalRule::HalfOpen`] opts out of that.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::conflict::NameMatch;
use crate::schedule::{Schedule, ScheduledEvent};
use crate::time::ClockTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntervalRule {
    /// `start <= t <= end`
    #[default]
    Inclusive,
    /// `start <= t < end`, consistent with the conflict evaluators.
    HalfOpen,
}

impl IntervalRule {
    fn covers(self, scheduled: &ScheduledEvent, t: ClockTime) -> bool {
        match self {
            IntervalRule::Inclusive => scheduled.range.contains_inclusive(t),
            IntervalRule::HalfOpen => scheduled.range.contains(t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SlotBadge {
    /// The venue is taken; the option cannot be selected.
    Venue,
    /// A requested resource is already claimed elsewhere; advisory only.
    Req,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRequirementConflict {
    pub has_conflict: bool,
    pub conflicted_requirements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotStatus {
    pub time: ClockTime,
    pub badge: Option<SlotBadge>,
    pub selectable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicted_requirements: Vec<String>,
}

/// True if an event at `location` on `date` covers `slot`.
pub fn is_time_slot_booked(
    schedule: &Schedule,
    location: &str,
    date: NaiveDate,
    slot: ClockTime,
    rule: IntervalRule,
) -> bool {
    schedule
        .on(date)
        .any(|s| s.event.location == location && rule.covers(s, slot))
}

/// Which of `requirement_names` are actively claimed by an event covering `slot`,
/// at any location.
pub fn requirement_conflicts_at(
    schedule: &Schedule,
    date: NaiveDate,
    slot: ClockTime,
    requirement_names: &[String],
    rule: IntervalRule,
    name_match: NameMatch,
) -> SlotRequirementConflict {
    let covering: Vec<&ScheduledEvent> = schedule.on(date).filter(|s| rule.covers(s, slot)).collect();

    let conflicted_requirements: Vec<String> = requirement_names
        .iter()
        .filter(|name| {
            covering.iter().any(|s| {
                s.event
                    .claims()
                    .any(|(_, claim)| claim.is_active() && name_match.matches(&claim.name, name))
            })
        })
        .cloned()
        .collect();

    SlotRequirementConflict {
        has_conflict: !conflicted_requirements.is_empty(),
        conflicted_requirements,
    }
}

/// Badge every picker option. A venue hit wins over a requirement hit.
pub fn slot_board(
    schedule: &Schedule,
    location: &str,
    date: NaiveDate,
    options: &[ClockTime],
    requirement_names: &[String],
    rule: IntervalRule,
    name_match: NameMatch,
) -> Vec<SlotStatus> {
    options
        .iter()
        .map(|&time| {
            if is_time_slot_booked(schedule, location, date, time, rule) {
                return SlotStatus {
                    time,
                    badge: Some(SlotBadge::Venue),
                    selectable: false,
                    conflicted_requirements: Vec::new(),
                };
            }
            let req = requirement_conflicts_at(schedule, date, time, requirement_names, rule, name_match);
            SlotStatus {
                time,
                badge: req.has_conflict.then_some(SlotBadge::Req),
                selectable: true,
                conflicted_requirements: req.conflicted_requirements,
            }
        })
        .collect()
}
