//! Enrollment Calculator: weighted and simple (unweighted) totals.

use fb_core::rounding::round2;
use fb_core::{ModalityCounts, WeightTable};

/// Σ count × weight over the 8 modalities, rounded to 2 decimals.
pub fn weighted_enrollment(counts: &ModalityCounts, weights: &WeightTable) -> f64 {
    let sum: f64 = counts.iter().map(|(m, c)| c * weights.weight(m)).sum();
    round2(sum)
}

/// Σ count over the 8 modalities, unweighted.
pub fn total_enrollment(counts: &ModalityCounts) -> f64 {
    counts.iter().map(|(_, c)| c).sum()
}
