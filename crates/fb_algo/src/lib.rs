// crates/fb_algo/src/lib.rs
#![forbid(unsafe_code)]

// Core domain types (callers usually import these from here).
pub use fb_core::{FundingParams, Modality, ModalityCounts, RealMunicipalData, WeightTable};

// ----------------------------- Per-mechanism outcome ---------------------------------

/// Unit value, top-up amount and eligibility of one complementation mechanism
/// in one scenario. Currency figures are already rounded to 2 decimals.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MechanismOutcome {
    /// Per-student value (currency per weighted student, VAAR: per student).
    pub unit_value: f64,
    /// Complementation amount (currency/year).
    pub top_up: f64,
    /// True iff `top_up` is non-zero when computed from formula or trusted
    /// from authoritative data. A scaled outcome inherits the flag of the
    /// outcome it was scaled from, even if its rounded top-up is 0.00.
    pub eligible: bool,
}

impl MechanismOutcome {
    /// Ineligible, zero-valued outcome (degenerate input or no entitlement).
    pub const ZERO: MechanismOutcome = MechanismOutcome { unit_value: 0.0, top_up: 0.0, eligible: false };

    /// Same unit value and eligibility, top-up multiplied by `ratio`.
    ///
    /// Scaling never flips eligibility; the flag is carried over unchanged.
    pub fn scaled(&self, ratio: f64) -> MechanismOutcome {
        MechanismOutcome {
            unit_value: self.unit_value,
            top_up: fb_core::rounding::round2(self.top_up * ratio),
            eligible: self.eligible,
        }
    }
}

// ----------------------------- Aggregation & enrollment ------------------------------

pub mod aggregation;
pub mod enrollment;

pub use aggregation::{aggregate_modalities, aggregate_with, Aggregation, KeywordRule, ModalityMapping};
pub use enrollment::{total_enrollment, weighted_enrollment};

// ----------------------------- Mechanisms (public surface) ---------------------------

pub mod mechanisms {
    // File modules (actual implementations)
    pub mod vaaf;
    pub mod vaat;
    pub mod vaar;

    pub use vaat::VaatOutcome;
}

pub use mechanisms::VaatOutcome;
