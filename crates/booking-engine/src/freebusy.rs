//! Free windows at a venue on one day.
//!
//! Sorts the venue's bookings by start time, merges overlapping busy periods,
//! then computes the gaps between merged periods within the operating window.

use chrono::NaiveDate;
use serde::Serialize;

use crate::schedule::Schedule;
use crate::time::{ClockTime, TimeRange};

/// A free window at a venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeWindow {
    pub start: ClockTime,
    pub end: ClockTime,
    pub duration_minutes: u16,
}

/// Merge overlapping or adjacent busy ranges, clipped to the window.
///
/// Returns a sorted, non-overlapping list of (start, end) intervals.
fn merge_busy_periods(
    busy: impl IntoIterator<Item = TimeRange>,
    window: TimeRange,
) -> Vec<(ClockTime, ClockTime)> {
    let mut intervals: Vec<(ClockTime, ClockTime)> = busy
        .into_iter()
        .filter(|r| r.overlaps(&window))
        .map(|r| (r.start.max(window.start), r.end.min(window.end)))
        .collect();

    intervals.sort_unstable();

    let mut merged: Vec<(ClockTime, ClockTime)> = Vec::new();
    for (start, end) in intervals {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

/// Gaps between the bookings at `location` on `date`, inside `window`.
pub fn venue_free_windows(
    schedule: &Schedule,
    location: &str,
    date: NaiveDate,
    window: TimeRange,
) -> Vec<FreeWindow> {
    let busy = schedule
        .on(date)
        .filter(|s| s.event.location == location)
        .map(|s| s.range);
    let merged = merge_busy_periods(busy, window);

    let mut free = Vec::new();
    let mut cursor = window.start;

    for (busy_start, busy_end) in merged {
        if cursor < busy_start {
            free.push(free_window(cursor, busy_start));
        }
        cursor = cursor.max(busy_end);
    }

    if cursor < window.end {
        free.push(free_window(cursor, window.end));
    }

    free
}

/// The earliest free window at the venue lasting at least `min_duration_minutes`.
pub fn first_free_window(
    schedule: &Schedule,
    location: &str,
    date: NaiveDate,
    window: TimeRange,
    min_duration_minutes: u16,
) -> Option<FreeWindow> {
    venue_free_windows(schedule, location, date, window)
        .into_iter()
        .find(|w| w.duration_minutes >= min_duration_minutes)
}

fn free_window(start: ClockTime, end: ClockTime) -> FreeWindow {
    FreeWindow {
        start,
        end,
        duration_minutes: end.minutes() - start.minutes(),
    }
}
