//! VAAR (results-based top-up).
//!
//! Depends on quality indicators the engine never sees, so there is no
//! formula path: the authoritative value is either trusted as-is or scaled by
//! the ratio of simulated to real *unweighted* enrollment. Eligibility is
//! assumed to carry over (an enrollment change cannot alter compliance).

use fb_core::rounding::{div_or_zero, round2};

use crate::MechanismOutcome;

/// unit = real / real_total; top-up = real × sim_total / real_total.
/// Zero authoritative value or zero enrollment on either side ⇒ ineligible 0.
pub fn scale_from_authoritative(
    real_vaar_top_up: f64,
    real_total_enrollment: f64,
    simulated_total_enrollment: f64,
) -> MechanismOutcome {
    if real_vaar_top_up == 0.0 || real_total_enrollment == 0.0 || simulated_total_enrollment == 0.0 {
        return MechanismOutcome::ZERO;
    }
    MechanismOutcome {
        unit_value: round2(real_vaar_top_up / real_total_enrollment),
        top_up: round2(real_vaar_top_up * (simulated_total_enrollment / real_total_enrollment)),
        eligible: true,
    }
}

/// Authoritative value for the real scenario.
pub fn trust_authoritative(real_vaar_top_up: f64, real_total_enrollment: f64) -> MechanismOutcome {
    let top_up = round2(real_vaar_top_up);
    MechanismOutcome {
        unit_value: round2(div_or_zero(real_vaar_top_up, real_total_enrollment)),
        top_up,
        eligible: top_up > 0.0,
    }
}
