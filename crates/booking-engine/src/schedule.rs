//! A day-indexed view over the full event list.
//!
//! The events API returns every event in one unfiltered collection. Building a
//! [`Schedule`] parses each event's date and times once and buckets it by
//! calendar day, so a conflict check only visits the events of the proposed day.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::warn;

use crate::calendar::calendar_date;
use crate::error::{BookingError, Result};
use crate::model::Event;
use crate::time::TimeRange;

/// An event with its calendar day and time range resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEvent {
    pub event: Event,
    pub date: NaiveDate,
    pub range: TimeRange,
}

impl ScheduledEvent {
    pub fn resolve(event: Event, tz: Tz) -> Result<Self> {
        let date = calendar_date(&event.start_date, tz)?;
        let range = TimeRange::parse(&event.start_time, &event.end_time)?;
        Ok(Self { event, date, range })
    }
}

/// An event that could not be placed on the calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedEvent {
    pub event_id: String,
    pub error: BookingError,
}

#[derive(Debug, Clone)]
pub struct Schedule {
    tz: Tz,
    events: Vec<ScheduledEvent>,
    by_date: BTreeMap<NaiveDate, Vec<usize>>,
    rejected: Vec<RejectedEvent>,
}

impl Schedule {
    /// An empty schedule whose dates resolve in `tz`.
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            events: Vec::new(),
            by_date: BTreeMap::new(),
            rejected: Vec::new(),
        }
    }

    /// Index `events`, resolving dates in `tz`.
    ///
    /// Events with an unparseable date or time range are kept out of the index
    /// and reported through [`Schedule::rejected`].
    pub fn build(events: impl IntoIterator<Item = Event>, tz: Tz) -> Self {
        let mut schedule = Schedule::new(tz);

        for event in events {
            let id = event.id.clone();
            match ScheduledEvent::resolve(event, tz) {
                Ok(scheduled) => schedule.insert(scheduled),
                Err(error) => {
                    warn!(event_id = %id, %error, "event left out of schedule");
                    schedule.rejected.push(RejectedEvent {
                        event_id: id,
                        error,
                    });
                }
            }
        }

        schedule
    }

    /// The timezone event dates were resolved in. Availability records for
    /// this schedule must be resolved in the same one.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn insert(&mut self, scheduled: ScheduledEvent) {
        let idx = self.events.len();
        self.by_date.entry(scheduled.date).or_default().push(idx);
        self.events.push(scheduled);
    }

    /// Events on `date`, in insertion order.
    pub fn on(&self, date: NaiveDate) -> impl Iterator<Item = &ScheduledEvent> {
        self.by_date
            .get(&date)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.events[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn rejected(&self) -> &[RejectedEvent] {
        &self.rejected
    }
}
