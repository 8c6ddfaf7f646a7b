//! Wall-clock times and time ranges within a single calendar day.
//!
//! Booking times arrive as `"HH:MM"` 24-hour strings and are compared as
//! integer minutes since midnight. No timezone is attached to a [`ClockTime`];
//! the calendar date is resolved separately (see [`crate::calendar`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{BookingError, Result};

/// Minutes in one day. `24:00` is the only value allowed to reach it.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A time of day, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    /// Build from hours and minutes. `24:00` is accepted as end of day.
    pub fn from_hm(hours: u16, minutes: u16) -> Result<Self> {
        let total = u32::from(hours) * 60 + u32::from(minutes);
        if minutes >= 60 || total > u32::from(MINUTES_PER_DAY) {
            return Err(BookingError::InvalidTime(format!("{:02}:{:02}", hours, minutes)));
        }
        Ok(Self(total as u16))
    }

    pub fn from_minutes(minutes: u16) -> Result<Self> {
        if minutes > MINUTES_PER_DAY {
            return Err(BookingError::InvalidTime(format!("{} minutes", minutes)));
        }
        Ok(Self(minutes))
    }

    /// Parse `"HH:MM"`. A trailing `":SS"` is accepted and ignored.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || BookingError::InvalidTime(s.to_string());
        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        let mut parts = s.trim().split(':');

        let hours = parts.next().ok_or_else(invalid)?;
        let minutes = parts.next().ok_or_else(invalid)?;
        if let Some(seconds) = parts.next() {
            if !digits(seconds) {
                return Err(invalid());
            }
            seconds.parse::<u8>().ok().filter(|s| *s < 60).ok_or_else(invalid)?;
        }
        if parts.next().is_some() || !digits(hours) || !digits(minutes) || hours.len() > 2 || minutes.len() != 2 {
            return Err(invalid());
        }

        let hours: u16 = hours.parse().map_err(|_| invalid())?;
        let minutes: u16 = minutes.parse().map_err(|_| invalid())?;
        Self::from_hm(hours, minutes).map_err(|_| invalid())
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ClockTime::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A non-empty `[start, end)` range of wall-clock time on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeRange {
    /// Rejects empty and inverted ranges.
    pub fn new(start: ClockTime, end: ClockTime) -> Result<Self> {
        if end <= start {
            return Err(BookingError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(ClockTime::parse(start)?, ClockTime::parse(end)?)
    }

    /// Half-open overlap: `[s1,e1)` and `[s2,e2)` overlap iff `s1 < e2 && s2 < e1`.
    ///
    /// Back-to-back ranges (one ends exactly when the other starts) do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Length of the shared part of two ranges, 0 when they do not overlap.
    pub fn overlap_minutes(&self, other: &TimeRange) -> u16 {
        if !self.overlaps(other) {
            return 0;
        }
        self.end.min(other.end).minutes() - self.start.max(other.start).minutes()
    }

    /// `start <= t <= end`, both ends included.
    pub fn contains_inclusive(&self, t: ClockTime) -> bool {
        self.start <= t && t <= self.end
    }

    /// `start <= t < end`.
    pub fn contains(&self, t: ClockTime) -> bool {
        self.start <= t && t < self.end
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes() - self.start.minutes()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Selectable start times for a schedule picker: `first`, `first + step`, ...
/// up to and including `last`.
///
/// A zero `step` yields only `first`.
pub fn slot_options(first: ClockTime, last: ClockTime, step_minutes: u16) -> Vec<ClockTime> {
    if last < first {
        return Vec::new();
    }
    if step_minutes == 0 {
        return vec![first];
    }
    (first.minutes()..=last.minutes())
        .step_by(step_minutes as usize)
        .map(ClockTime)
        .collect()
}
