//! Error types for booking-engine operations.

use thiserror::Error;

/// One requested quantity that the save gate refused.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityViolation {
    pub requirement: String,
    pub requested: u32,
    pub available: u32,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time range: {start}-{end} (end must be after start)")]
    InvalidRange { start: String, end: String },

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Requested quantity exceeds availability for {}", describe(.0))]
    QuantityExceeded(Vec<QuantityViolation>),
}

fn describe(violations: &[QuantityViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} ({} requested, {} available)", v.requirement, v.requested, v.available))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, BookingError>;
