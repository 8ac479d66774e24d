//! Canonical education modalities and per-modality enrollment counts.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// The 8 canonical buckets every raw enrollment category collapses into.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Modality {
    Nursery,
    PreSchool,
    EarlyGrades,
    LateGrades,
    Secondary,
    AdultEducation,
    SpecialEducation,
    IndigenousQuilombola,
}

impl Modality {
    /// Fixed iteration order (matches the field order of `ModalityCounts`).
    pub const ALL: [Modality; 8] = [
        Modality::Nursery,
        Modality::PreSchool,
        Modality::EarlyGrades,
        Modality::LateGrades,
        Modality::Secondary,
        Modality::AdultEducation,
        Modality::SpecialEducation,
        Modality::IndigenousQuilombola,
    ];

    /// Wire token (snake_case).
    pub fn token(self) -> &'static str {
        match self {
            Modality::Nursery => "nursery",
            Modality::PreSchool => "pre_school",
            Modality::EarlyGrades => "early_grades",
            Modality::LateGrades => "late_grades",
            Modality::Secondary => "secondary",
            Modality::AdultEducation => "adult_education",
            Modality::SpecialEducation => "special_education",
            Modality::IndigenousQuilombola => "indigenous_quilombola",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Modality {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Modality::ALL
            .into_iter()
            .find(|m| m.token() == s)
            .ok_or(CoreError::DomainOutOfRange("modality"))
    }
}

/// Enrolled students per canonical modality.
///
/// Counts are plain numbers so a scenario can be scaled (e.g. ×1.10) without
/// truncation. Callers guarantee non-negative finite values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default, deny_unknown_fields))]
pub struct ModalityCounts {
    pub nursery: f64,
    pub pre_school: f64,
    pub early_grades: f64,
    pub late_grades: f64,
    pub secondary: f64,
    pub adult_education: f64,
    pub special_education: f64,
    pub indigenous_quilombola: f64,
}

impl ModalityCounts {
    pub fn get(&self, m: Modality) -> f64 {
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

    fn slot_mut(&mut self, m: Modality) -> &mut f64 {
        match m {
            Modality::Nursery => &mut self.nursery,
            Modality::PreSchool => &mut self.pre_school,
            Modality::EarlyGrades => &mut self.early_grades,
            Modality::LateGrades => &mut self.late_grades,
            Modality::Secondary => &mut self.secondary,
            Modality::AdultEducation => &mut self.adult_education,
            Modality::SpecialEducation => &mut self.special_education,
            Modality::IndigenousQuilombola => &mut self.indigenous_quilombola,
        }
    }

    /// Accumulate `count` into modality `m`.
    pub fn add(&mut self, m: Modality, count: f64) {
        *self.slot_mut(m) += count;
    }

    /// Builder-style setter, handy for fixtures.
    pub fn with(mut self, m: Modality, count: f64) -> Self {
        *self.slot_mut(m) = count;
        self
    }

    /// `(modality, count)` pairs in `Modality::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Modality, f64)> + '_ {
        Modality::ALL.into_iter().map(move |m| (m, self.get(m)))
    }

    /// Every count multiplied by `k`.
    pub fn scaled(&self, k: f64) -> Self {
        let mut out = *self;
        for m in Modality::ALL {
            *out.slot_mut(m) *= k;
        }
        out
    }
}
