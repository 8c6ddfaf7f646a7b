//! Calendar-date resolution for event date strings.
//!
//! Event payloads carry dates either as plain `YYYY-MM-DD` or as full RFC 3339
//! timestamps (`2024-06-01T00:00:00.000Z`). A timestamp names an instant, so its
//! calendar date depends on where it is observed: it is converted into the
//! configured IANA timezone before the date is taken.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

use crate::error::{BookingError, Result};

/// Parse an IANA timezone name such as `"Asia/Manila"`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| BookingError::InvalidTimezone(name.to_string()))
}

/// Resolve a date string into the calendar day it falls on in `tz`.
pub fn calendar_date(raw: &str, tz: Tz) -> Result<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&tz).date_naive())
        .map_err(|_| BookingError::InvalidDate(raw.to_string()))
}
