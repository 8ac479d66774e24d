//! fb_core: Core types, per-year constants, and rounding helpers.
//!
//! This crate is **I/O-free**. It defines the stable types shared by the
//! engine (`fb_algo`, `fb_pipeline`, `fb_io`, `fb_cli`):
//!
//! - Canonical modalities and `ModalityCounts`
//! - `RealMunicipalData` (authoritative baseline for one municipality/year)
//! - `FundingParams` (constants bundle selected per reference year)
//! - Currency rounding and guarded-division helpers
//!
//! Serialization derives are gated behind the `serde` feature (default on).

#![forbid(unsafe_code)]

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation & lookup.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub enum CoreError {
        UnknownReferenceYear(u16),
        DomainOutOfRange(&'static str),
        NonFinite(&'static str),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::UnknownReferenceYear(y) => {
                    write!(f, "no funding constants bundle for reference year {y}")
                }
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
                CoreError::NonFinite(k) => write!(f, "non-finite value: {k}"),
            }
        }
    }

    impl std::error::Error for CoreError {}
}

pub mod rounding {
    //! Currency rounding and zero-guarded arithmetic.
    //!
    //! Every currency or percentage figure leaving the engine goes through
    //! `round2`. Divisions by zero never fault: they degrade to the documented
    //! neutral value (0 for quotients, 1 for ratios).

    /// Round half away from zero to 2 decimal places.
    #[inline]
    pub fn round2(x: f64) -> f64 {
        let r = (x * 100.0).round() / 100.0;
        // Avoid emitting "-0.0" on the wire.
        if r == 0.0 { 0.0 } else { r }
    }

    /// `num / den`, or 0 when `den` is 0.
    #[inline]
    pub fn div_or_zero(num: f64, den: f64) -> f64 {
        if den == 0.0 { 0.0 } else { num / den }
    }

    /// `num / den`, or 1 when `den` is 0 (neutral scaling factor).
    #[inline]
    pub fn ratio_or_one(num: f64, den: f64) -> f64 {
        if den == 0.0 { 1.0 } else { num / den }
    }

    /// True when `ratio` deviates from 1 by more than `tolerance`.
    #[inline]
    pub fn departs_from_unity(ratio: f64, tolerance: f64) -> bool {
        (ratio - 1.0).abs() > tolerance
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn round2_is_half_away_from_zero() {
            assert_eq!(round2(1.005_000_1), 1.01);
            assert_eq!(round2(2_890_651.082), 2_890_651.08);
            assert_eq!(round2(-0.001), 0.0);
            assert!(round2(-0.001).is_sign_positive());
        }

        #[test]
        fn guarded_divisions() {
            assert_eq!(div_or_zero(10.0, 0.0), 0.0);
            assert_eq!(div_or_zero(10.0, 4.0), 2.5);
            assert_eq!(ratio_or_one(10.0, 0.0), 1.0);
            assert!(departs_from_unity(1.0011, 0.001));
            assert!(!departs_from_unity(1.0009, 0.001));
        }
    }
}

pub mod modality;
pub mod municipal;
pub mod variables;

pub use errors::CoreError;
pub use modality::{Modality, ModalityCounts};
pub use municipal::RealMunicipalData;
pub use variables::{FundingParams, WeightTable};
