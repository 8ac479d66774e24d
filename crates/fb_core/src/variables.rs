//! Per-reference-year constants bundle (`FundingParams`) and the aggregated
//! weighting table.
//!
//! Notes:
//! - Minimum unit values change by reference year, so nothing here is a
//!   process-wide singleton: callers pick a bundle with `FundingParams::for_year`
//!   (built-ins) or load one from a constants file (`fb_io::constants`).
//! - The aggregated weights apply when no urban/rural breakdown is available.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::modality::Modality;

/// Relative tolerance under which two weighted enrollments are "the same".
pub const DEFAULT_SIGNIFICANCE_TOLERANCE: f64 = 0.001;

/// Reference years shipped with the engine.
pub const BUILTIN_YEARS: &[u16] = &[2024, 2025];

// ------------ Weighting table ------------

/// Legal weight factor per canonical modality (aggregated form).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WeightTable {
    pub nursery: f64,
    pub pre_school: f64,
    pub early_grades: f64,
    pub late_grades: f64,
    pub secondary: f64,
    pub adult_education: f64,
    pub special_education: f64,
    pub indigenous_quilombola: f64,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            nursery: 1.2,
            pre_school: 1.1,
            early_grades: 1.0,
            late_grades: 1.1,
            secondary: 1.25,
            adult_education: 0.9,
            special_education: 1.2,
            indigenous_quilombola: 1.2,
        }
    }
}

impl WeightTable {
    pub fn weight(&self, m: Modality) -> f64 {
        match m {
            Modality::Nursery => self.nursery,
            Modality::PreSchool => self.pre_school,
            Modality::EarlyGrades => self.early_grades,
            Modality::LateGrades => self.late_grades,
            Modality::Secondary => self.secondary,
            Modality::AdultEducation => self.adult_education,
            Modality::SpecialEducation => self.special_education,
            Modality::IndigenousQuilombola => self.indigenous_quilombola,
        }
    }
}

// ------------ Params ------------

/// Constants bundle for one reference year.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FundingParams {
    pub reference_year: u16,
    /// National minimum VAAF unit value (currency per weighted student/year).
    pub vaaf_min: f64,
    /// National minimum VAAT unit value.
    pub vaat_min: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weights: WeightTable,
    #[cfg_attr(feature = "serde", serde(default = "default_tolerance"))]
    pub significance_tolerance: f64,
}

#[cfg(feature = "serde")]
fn default_tolerance() -> f64 {
    DEFAULT_SIGNIFICANCE_TOLERANCE
}

impl FundingParams {
    /// Built-in bundle for `year`.
    pub fn for_year(year: u16) -> Result<Self, CoreError> {
        let (vaaf_min, vaat_min) = match year {
            2024 => (5_447.98, 6_307.38),
            2025 => (5_447.98, 6_500.00),
            other => return Err(CoreError::UnknownReferenceYear(other)),
        };
        Ok(Self {
            reference_year: year,
            vaaf_min,
            vaat_min,
            weights: WeightTable::default(),
            significance_tolerance: DEFAULT_SIGNIFICANCE_TOLERANCE,
        })
    }

    /// Validate numeric domains. Bundles loaded from files must pass this
    /// before reaching any calculator.
    pub fn validate_domains(&self) -> Result<(), CoreError> {
        if !self.vaaf_min.is_finite() {
            return Err(CoreError::NonFinite("vaafMin"));
        }
        if !self.vaat_min.is_finite() {
            return Err(CoreError::NonFinite("vaatMin"));
        }
        if self.vaaf_min <= 0.0 {
            return Err(CoreError::DomainOutOfRange("vaafMin must be > 0"));
        }
        if self.vaat_min <= 0.0 {
            return Err(CoreError::DomainOutOfRange("vaatMin must be > 0"));
        }
        for m in Modality::ALL {
            let w = self.weights.weight(m);
            if !w.is_finite() {
                return Err(CoreError::NonFinite("weights"));
            }
            if w <= 0.0 {
                return Err(CoreError::DomainOutOfRange("weights must be > 0"));
            }
        }
        let t = self.significance_tolerance;
        if !t.is_finite() || t <= 0.0 || t >= 1.0 {
            return Err(CoreError::DomainOutOfRange("significanceTolerance must be in (0, 1)"));
        }
        Ok(())
    }
}

impl Default for FundingParams {
    fn default() -> Self {
        Self {
            reference_year: 2024,
            vaaf_min: 5_447.98,
            vaat_min: 6_307.38,
            weights: WeightTable::default(),
            significance_tolerance: DEFAULT_SIGNIFICANCE_TOLERANCE,
        }
    }
}
