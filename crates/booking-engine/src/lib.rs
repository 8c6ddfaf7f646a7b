//! # booking-engine
//!
//! Conflict detection and resource availability for event booking requests.
//!
//! Given the full list of booked events, a proposed booking (venue, date,
//! start and end time) and the resources departments were asked to supply,
//! the engine answers three questions: is the venue free, which shared
//! resources are already claimed at that time, and how many units remain.
//!
//! ## Modules
//!
//! - [`time`]: `"HH:MM"` clock times and half-open time ranges
//! - [`calendar`]: Resolve event date strings to calendar days in a timezone
//! - [`model`]: Event, requirement and availability records
//! - [`schedule`]: Day-indexed view over the event list
//! - [`conflict`]: Venue and requirement conflicts for a proposed booking
//! - [`availability`]: Remaining quantity per requirement
//! - [`slots`]: VENUE/REQ badges for schedule picker options
//! - [`gate`]: Quantity check before claims are saved
//! - [`freebusy`]: Free windows at a venue
//! - [`error`]: Error types

pub mod availability;
pub mod calendar;
pub mod conflict;
pub mod error;
pub mod freebusy;
pub mod gate;
pub mod model;
pub mod schedule;
pub mod slots;
pub mod time;

pub use availability::{available_quantity, used_quantity, RequirementAvailability};
pub use conflict::{
    check_booking, find_requirement_conflicts, find_venue_conflicts, BookingCheck, NameMatch,
};
pub use error::BookingError;
pub use freebusy::venue_free_windows;
pub use gate::{validate_claims, validate_department_claims};
pub use model::{Event, ProposedBooking, Requirement, RequirementClaim};
pub use schedule::Schedule;
pub use slots::{is_time_slot_booked, requirement_conflicts_at, slot_board, IntervalRule, SlotBadge};
pub use time::{ClockTime, TimeRange};
