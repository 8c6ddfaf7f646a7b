//! Final quantity check before a department's requirement claims are saved.
//!
//! This is the one place where availability becomes a hard limit. The check
//! is pure: a rejected set stays rejected on every retry until the requested
//! quantity drops or the conflicting events go away.

use crate::availability::RequirementAvailability;
use crate::conflict::NameMatch;
use crate::error::{BookingError, QuantityViolation, Result};
use crate::model::{RequirementClaim, RequirementKind};

/// Reject the claim set if any selected physical requirement asks for more
/// than [`RequirementAvailability::bookable`] allows.
///
/// `availability` is expected to be one department's report. Claims with no
/// matching entry (services, free-text notes) are not limited. Every violation
/// is reported, not just the first.
pub fn validate_claims(
    claims: &[RequirementClaim],
    availability: &[RequirementAvailability],
    name_match: NameMatch,
) -> Result<()> {
    check_claims(claims, availability.iter(), name_match)
}

/// [`validate_claims`] against only the entries of `department`, for reports
/// that merge several catalogs (see [`crate::conflict::check_booking`]).
pub fn validate_department_claims(
    department: &str,
    claims: &[RequirementClaim],
    availability: &[RequirementAvailability],
    name_match: NameMatch,
) -> Result<()> {
    let scoped = availability.iter().filter(|a| a.department == department);
    check_claims(claims, scoped, name_match)
}

fn check_claims<'a>(
    claims: &[RequirementClaim],
    entries: impl Iterator<Item = &'a RequirementAvailability> + Clone,
    name_match: NameMatch,
) -> Result<()> {
    let violations: Vec<QuantityViolation> = claims
        .iter()
        .filter(|claim| claim.selected)
        .filter_map(|claim| {
            let requested = claim.quantity.unwrap_or(0);
            let entry = entries
                .clone()
                .find(|a| a.kind == RequirementKind::Physical && name_match.matches(&claim.name, &a.name))?;
            let limit = entry.bookable()?;
            (requested > limit).then(|| QuantityViolation {
                requirement: claim.name.clone(),
                requested,
                available: limit,
            })
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(BookingError::QuantityExceeded(violations))
    }
}
