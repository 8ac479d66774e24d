//! Real-enrollment resolution.
//!
//! The real scenario's modality structure comes from the raw category
//! breakdown. Without a breakdown it degrades to all-zero counts (so real
//! weighted enrollment is 0) and the unweighted total falls back to the
//! authoritative `totalEnrollment`.

use std::collections::BTreeMap;

use fb_algo::{aggregate_with, total_enrollment, weighted_enrollment, ModalityMapping};
use fb_core::{ModalityCounts, RealMunicipalData, WeightTable};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RealEnrollment {
    pub counts: ModalityCounts,
    /// Unmatched raw labels (label → count).
    pub unmapped: BTreeMap<String, f64>,
    pub weighted: f64,
    pub unweighted: f64,
    /// True when at least one raw label mapped to a modality.
    pub from_breakdown: bool,
}

pub fn resolve_real_enrollment(
    real: &RealMunicipalData,
    weights: &WeightTable,
    mapping: &ModalityMapping,
) -> RealEnrollment {
    let agg = aggregate_with(mapping, &real.enrollment_by_raw_category);
    let aggregated_total = total_enrollment(&agg.counts);
    let from_breakdown = aggregated_total > 0.0;

    let unweighted = if from_breakdown { aggregated_total } else { real.total_enrollment as f64 };

    RealEnrollment {
        weighted: weighted_enrollment(&agg.counts, weights),
        counts: agg.counts,
        unmapped: agg.unmapped,
        unweighted,
        from_breakdown,
    }
}
