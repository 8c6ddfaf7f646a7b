//! Records exchanged with the events REST API and the booking form.
//!
//! Field names follow the API's camelCase JSON. Collection fields default to
//! empty so partially filled records from the server still deserialize.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::time::{ClockTime, TimeRange};

/// One booking request as stored by the events API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "EventRecord")]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub event_title: String,
    pub location: String,
    pub start_date: String,
    pub start_time: String,
    #[serde(default)]
    pub end_date: Option<String>,
    pub end_time: String,
    #[serde(default)]
    pub tagged_departments: Vec<String>,
    /// Department name → the resources that department was asked to supply.
    #[serde(default)]
    pub department_requirements: BTreeMap<String, Vec<RequirementClaim>>,
}

/// Wire shape of [`Event`] before its id is resolved.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "_id", default)]
    mongo_id: Option<String>,
    #[serde(default)]
    event_title: String,
    location: String,
    start_date: String,
    start_time: String,
    #[serde(default)]
    end_date: Option<String>,
    end_time: String,
    #[serde(default)]
    tagged_departments: Vec<String>,
    #[serde(default)]
    department_requirements: BTreeMap<String, Vec<RequirementClaim>>,
}

impl TryFrom<EventRecord> for Event {
    type Error = &'static str;

    fn try_from(raw: EventRecord) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: record_id(raw.id, raw.mongo_id)?,
            event_title: raw.event_title,
            location: raw.location,
            start_date: raw.start_date,
            start_time: raw.start_time,
            end_date: raw.end_date,
            end_time: raw.end_time,
            tagged_departments: raw.tagged_departments,
            department_requirements: raw.department_requirements,
        })
    }
}

/// Records carry `_id`, `id`, or both (Mongo documents with virtuals).
/// `id` wins when both are present.
fn record_id(id: Option<String>, mongo_id: Option<String>) -> std::result::Result<String, &'static str> {
    id.or(mongo_id).ok_or("missing field `id` or `_id`")
}

impl Event {
    /// Every claim on this event, across all tagged departments.
    pub fn claims(&self) -> impl Iterator<Item = (&str, &RequirementClaim)> {
        self.department_requirements
            .iter()
            .flat_map(|(dept, claims)| claims.iter().map(move |c| (dept.as_str(), c)))
    }
}

/// A department's requested use of one named resource for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementClaim {
    pub name: String,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RequirementClaim {
    /// A selected claim with a positive quantity; the only kind that consumes stock.
    pub fn is_active(&self) -> bool {
        self.selected && self.quantity.unwrap_or(0) > 0
    }

    pub fn claimed_quantity(&self) -> u32 {
        if self.selected {
            self.quantity.unwrap_or(0)
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementKind {
    /// Countable items (chairs, tables) with a quantity ceiling.
    Physical,
    /// Staffed services (sound, cleaning) with no quantity.
    Service,
}

/// A department catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RequirementRecord")]
pub struct Requirement {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: RequirementKind,
    #[serde(default)]
    pub total_quantity: Option<u32>,
    #[serde(default)]
    pub is_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_person: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequirementRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "_id", default)]
    mongo_id: Option<String>,
    text: String,
    #[serde(rename = "type")]
    kind: RequirementKind,
    #[serde(default)]
    total_quantity: Option<u32>,
    #[serde(default)]
    is_available: Option<bool>,
    #[serde(default)]
    responsible_person: Option<String>,
}

impl TryFrom<RequirementRecord> for Requirement {
    type Error = &'static str;

    fn try_from(raw: RequirementRecord) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: record_id(raw.id, raw.mongo_id)?,
            text: raw.text,
            kind: raw.kind,
            total_quantity: raw.total_quantity,
            is_available: raw.is_available,
            responsible_person: raw.responsible_person,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "DepartmentRecord")]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

#[derive(Deserialize)]
struct DepartmentRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "_id", default)]
    mongo_id: Option<String>,
    name: String,
    #[serde(default)]
    requirements: Vec<Requirement>,
}

impl TryFrom<DepartmentRecord> for Department {
    type Error = &'static str;

    fn try_from(raw: DepartmentRecord) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: record_id(raw.id, raw.mongo_id)?,
            name: raw.name,
            requirements: raw.requirements,
        })
    }
}

/// A department's declared capacity for one requirement on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRecord {
    pub requirement_id: String,
    #[serde(default)]
    pub requirement_text: String,
    pub date: String,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_true() -> bool {
    true
}

/// A venue with its bookable flag, as listed by the location-availability API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationAvailability {
    #[serde(alias = "locationName")]
    pub location: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

/// The `{ "data": ... }` wrapper every API response uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
}

/// The in-progress booking being checked against existing events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedBooking {
    pub location: String,
    pub date: NaiveDate,
    pub range: TimeRange,
}

impl ProposedBooking {
    pub fn new(location: impl Into<String>, date: NaiveDate, start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            location: location.into(),
            date,
            range: TimeRange::parse(start, end)?,
        })
    }

    pub fn start(&self) -> ClockTime {
        self.range.start
    }

    pub fn end(&self) -> ClockTime {
        self.range.end
    }
}
