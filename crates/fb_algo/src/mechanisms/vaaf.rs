//! VAAF (minimum-value top-up).
//!
//! Two named paths:
//! - `compute_from_formula`: recompute the top-up from contribution revenue
//!   and weighted enrollment against the national minimum.
//! - `trust_authoritative`: take the externally computed top-up as a fact and
//!   only derive the unit value from it.
//!
//! Zero weighted enrollment never faults: both paths return a 0 unit value.

use fb_core::rounding::{div_or_zero, round2};

use crate::MechanismOutcome;

/// unit = revenue / weighted; eligible iff unit < `vaaf_min`;
/// top-up = (vaaf_min − unit) × weighted, rounded to 2 decimals.
pub fn compute_from_formula(contribution_revenue: f64, weighted_enrollment: f64, vaaf_min: f64) -> MechanismOutcome {
    if weighted_enrollment == 0.0 {
        return MechanismOutcome::ZERO;
    }
    let unit = contribution_revenue / weighted_enrollment;
    let eligible = unit < vaaf_min;
    let top_up = if eligible { round2((vaaf_min - unit) * weighted_enrollment) } else { 0.0 };
    MechanismOutcome { unit_value: round2(unit), top_up, eligible: eligible && top_up > 0.0 }
}

/// Authoritative top-up as-is; unit value = top-up / weighted enrollment.
pub fn trust_authoritative(real_top_up: f64, real_weighted_enrollment: f64) -> MechanismOutcome {
    let top_up = round2(real_top_up);
    MechanismOutcome {
        unit_value: round2(div_or_zero(real_top_up, real_weighted_enrollment)),
        top_up,
        eligible: top_up > 0.0,
    }
}
