//! VAAT (total-revenue top-up).
//!
//! Total education revenue is not available to the engine, so it is
//! approximated from the contribution base:
//!
//!   estimated = contribution × 5 + vaaf_top_up + contribution × 0.1
//!
//! The factors are an acknowledged approximation; replace the estimator when
//! an authoritative total-revenue figure exists, do not tune it.
//!
//! Entitlement preservation: when the formula says "not eligible" but the
//! authority already pays a VAAT top-up, the real figure is kept and the
//! outcome is marked `preserved`. Only meaningful for the real scenario.

use fb_core::rounding::{div_or_zero, round2};

use crate::MechanismOutcome;

/// Recovers 100% of qualifying taxes from the 20% contribution base.
pub const REVENUE_RECOVERY_FACTOR: f64 = 5.0;
/// Share of the contribution base standing in for other education revenue.
pub const SUPPLEMENTARY_SHARE: f64 = 0.1;

/// VAAT outcome plus the revenue estimate it was derived from.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct VaatOutcome {
    pub outcome: MechanismOutcome,
    /// Approximated total education revenue (rounded to 2 decimals).
    pub estimated_total_revenue: f64,
    /// True when the top-up came from the authoritative figure rather than
    /// the formula.
    pub preserved: bool,
}

impl VaatOutcome {
    /// Top-up and revenue estimate multiplied by `ratio`; unit value kept.
    pub fn scaled(&self, ratio: f64) -> VaatOutcome {
        VaatOutcome {
            outcome: self.outcome.scaled(ratio),
            estimated_total_revenue: round2(self.estimated_total_revenue * ratio),
            preserved: self.preserved,
        }
    }
}

/// `contribution × 5 + vaaf_top_up + contribution × 0.1`, rounded.
pub fn estimated_total_revenue(contribution_revenue: f64, vaaf_top_up: f64) -> f64 {
    round2(
        contribution_revenue * REVENUE_RECOVERY_FACTOR
            + vaaf_top_up
            + contribution_revenue * SUPPLEMENTARY_SHARE,
    )
}

/// Formula path with entitlement preservation.
///
/// Pass `real_vaat_top_up = 0.0` to disable preservation (simulated scenario).
pub fn compute_from_formula(
    contribution_revenue: f64,
    weighted_enrollment: f64,
    vaaf_top_up: f64,
    vaat_min: f64,
    real_vaat_top_up: f64,
) -> VaatOutcome {
    let estimated = estimated_total_revenue(contribution_revenue, vaaf_top_up);
    if weighted_enrollment == 0.0 {
        return VaatOutcome { outcome: MechanismOutcome::ZERO, estimated_total_revenue: estimated, preserved: false };
    }

    let unit = estimated / weighted_enrollment;
    if unit < vaat_min {
        let top_up = round2((vaat_min - unit) * weighted_enrollment);
        return VaatOutcome {
            outcome: MechanismOutcome { unit_value: round2(unit), top_up, eligible: top_up > 0.0 },
            estimated_total_revenue: estimated,
            preserved: false,
        };
    }

    if real_vaat_top_up > 0.0 {
        return VaatOutcome {
            outcome: MechanismOutcome { unit_value: round2(unit), top_up: round2(real_vaat_top_up), eligible: true },
            estimated_total_revenue: estimated,
            preserved: true,
        };
    }

    VaatOutcome {
        outcome: MechanismOutcome { unit_value: round2(unit), top_up: 0.0, eligible: false },
        estimated_total_revenue: estimated,
        preserved: false,
    }
}

/// Authoritative path: the real top-up is a fact; the unit value is derived
/// as top-up / weighted enrollment and the revenue estimate is reported
/// alongside for display.
pub fn trust_authoritative(
    real_vaat_top_up: f64,
    real_weighted_enrollment: f64,
    contribution_revenue: f64,
    real_vaaf_top_up: f64,
) -> VaatOutcome {
    let top_up = round2(real_vaat_top_up);
    VaatOutcome {
        outcome: MechanismOutcome {
            unit_value: round2(div_or_zero(real_vaat_top_up, real_weighted_enrollment)),
            top_up,
            eligible: top_up > 0.0,
        },
        estimated_total_revenue: estimated_total_revenue(contribution_revenue, real_vaaf_top_up),
        preserved: false,
    }
}
