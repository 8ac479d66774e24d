//! Boundary validation before any computation.
//!
//! The calculators assume non-negative finite numbers; this is where callers
//! reject anything else. Deterministic output: issues are sorted by
//! (code, where, message) so identical inputs give identical reports.
//!
//! Errors block `simulate`; warnings are informational (unmapped labels,
//! breakdown/total mismatch, no breakdown to weight against).

use fb_algo::{aggregate_with, total_enrollment, ModalityMapping};
use fb_core::{FundingParams, Modality, ModalityCounts, RealMunicipalData};

/// Issue severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// Where the issue occurred.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntityRef {
    Param(&'static str),
    RealField(&'static str),
    RawCategory(String),
    SimulatedModality(Modality),
}

impl core::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EntityRef::Param(p) => write!(f, "params.{p}"),
            EntityRef::RealField(k) => write!(f, "real.{k}"),
            EntityRef::RawCategory(l) => write!(f, "real.enrollmentByRawCategory[{l:?}]"),
            EntityRef::SimulatedModality(m) => write!(f, "simulated.{}", m.token()),
        }
    }
}

/// One validation finding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub where_: EntityRef,
}

/// pass = no Error; ordering of issues is stable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub pass: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }
}

pub fn validate(
    real: &RealMunicipalData,
    simulated: &ModalityCounts,
    params: &FundingParams,
    mapping: &ModalityMapping,
) -> ValidationReport {
    let mut issues: Vec<ValidationIssue> = Vec::new();

    issues.extend(check_params(params));
    issues.extend(check_real_fields(real));
    issues.extend(check_raw_categories(real));
    issues.extend(check_simulated(simulated));
    issues.extend(check_breakdown(real, simulated, mapping));

    sort_issues_stably(&mut issues);

    ValidationReport {
        pass: !issues.iter().any(|i| i.severity == Severity::Error),
        issues,
    }
}

// ------------------------------------------------------------------------------------------------
// Checks
// ------------------------------------------------------------------------------------------------

fn check_params(params: &FundingParams) -> Vec<ValidationIssue> {
    match params.validate_domains() {
        Ok(()) => Vec::new(),
        Err(e) => vec![ValidationIssue {
            severity: Severity::Error,
            code: "Params.Domain",
            message: e.to_string(),
            where_: EntityRef::Param("bundle"),
        }],
    }
}

const REAL_CODES: (&str, &str) = ("Real.NonFinite", "Real.Negative");
const SIMULATED_CODES: (&str, &str) = ("Simulated.NonFinite", "Simulated.Negative");

fn number_issue(value: f64, codes: (&'static str, &'static str), where_: EntityRef) -> Option<ValidationIssue> {
    let (code, message) = if !value.is_finite() {
        (codes.0, format!("{value} is not finite"))
    } else if value < 0.0 {
        (codes.1, format!("{value} is negative"))
    } else {
        return None;
    };
    Some(ValidationIssue { severity: Severity::Error, code, message, where_ })
}

fn check_real_fields(real: &RealMunicipalData) -> Vec<ValidationIssue> {
    let mut issues: Vec<ValidationIssue> = real
        .currency_fields()
        .iter()
        .filter_map(|&(name, v)| number_issue(v, REAL_CODES, EntityRef::RealField(name)))
        .collect();
    if let Some(total) = real.total_revenue {
        issues.extend(number_issue(total, REAL_CODES, EntityRef::RealField("totalRevenue")));
    }
    issues
}

fn check_raw_categories(real: &RealMunicipalData) -> Vec<ValidationIssue> {
    real.enrollment_by_raw_category
        .iter()
        .filter_map(|(label, &v)| number_issue(v, REAL_CODES, EntityRef::RawCategory(label.clone())))
        .collect()
}

fn check_simulated(simulated: &ModalityCounts) -> Vec<ValidationIssue> {
    simulated
        .iter()
        .filter_map(|(m, v)| number_issue(v, SIMULATED_CODES, EntityRef::SimulatedModality(m)))
        .collect()
}

/// Warnings about the real breakdown:
/// - "Aggregate.Unmapped" per label no rule matched
/// - "Real.BreakdownMismatch" when the mapped total differs from `totalEnrollment`
/// - "Real.NoBreakdown" when a comparison is requested without one
fn check_breakdown(real: &RealMunicipalData, simulated: &ModalityCounts, mapping: &ModalityMapping) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let agg = aggregate_with(mapping, &real.enrollment_by_raw_category);

    for (label, count) in &agg.unmapped {
        issues.push(ValidationIssue {
            severity: Severity::Warning,
            code: "Aggregate.Unmapped",
            message: format!("{count} students in an unmapped category"),
            where_: EntityRef::RawCategory(label.clone()),
        });
    }

    let mapped = total_enrollment(&agg.counts);
    if mapped > 0.0 && real.total_enrollment > 0 && mapped != real.total_enrollment as f64 {
        issues.push(ValidationIssue {
            severity: Severity::Warning,
            code: "Real.BreakdownMismatch",
            message: format!("mapped breakdown sums to {mapped}, totalEnrollment is {}", real.total_enrollment),
            where_: EntityRef::RealField("totalEnrollment"),
        });
    }

    if mapped == 0.0 && total_enrollment(simulated) > 0.0 {
        issues.push(ValidationIssue {
            severity: Severity::Warning,
            code: "Real.NoBreakdown",
            message: "no real modality breakdown; VAAF/VAAT will not scale".to_string(),
            where_: EntityRef::RealField("enrollmentByRawCategory"),
        });
    }

    issues
}

// ------------------------------------------------------------------------------------------------
// Utilities
// ------------------------------------------------------------------------------------------------

fn sort_issues_stably(issues: &mut [ValidationIssue]) {
    issues.sort_by(|a, b| {
        a.code
            .cmp(b.code)
            .then_with(|| a.where_.cmp(&b.where_))
            .then_with(|| a.message.cmp(&b.message))
    });
}
