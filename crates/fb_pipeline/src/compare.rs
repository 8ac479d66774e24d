//! Comparison branch: derive simulated figures from the real ones.
//!
//! - weight_ratio = simulated weighted / real weighted (1 if real is 0)
//! - total_ratio  = simulated unweighted / real unweighted (1 if real is 0)
//! - significant  = |weight_ratio − 1| > tolerance
//!
//! Not significant ⇒ simulated mechanism figures equal the real ones.
//! Significant ⇒ VAAF and VAAT top-ups (and the VAAT revenue estimate) scale
//! by weight_ratio, VAAR by total_ratio. Unit values stay at the real values.
//!
//! Without a real breakdown the weighted basis is 0, so the weight ratio is
//! pinned at 1; VAAR then scales on its own unweighted ratio.
//!
//! `identical` compares the two weighted figures directly, never the guarded
//! ratio: 0 against a positive simulated basis is a difference.

use serde::{Deserialize, Serialize};

use fb_algo::mechanisms::vaar;
use fb_algo::{total_enrollment, weighted_enrollment};
use fb_core::rounding::{departs_from_unity, ratio_or_one};
use fb_core::{FundingParams, ModalityCounts, RealMunicipalData};

use crate::ScenarioFigures;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratios {
    pub weight_ratio: f64,
    pub total_ratio: f64,
    /// Weighted enrollment changed beyond tolerance.
    pub significant: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Comparison {
    pub figures: ScenarioFigures,
    pub ratios: Ratios,
    /// Weighted enrollments indistinguishable within tolerance.
    pub identical: bool,
}

/// |simulated − real| ≤ tolerance × max(real, simulated). Both 0 is identical.
pub fn weighted_identical(real_weighted: f64, sim_weighted: f64, tolerance: f64) -> bool {
    (sim_weighted - real_weighted).abs() <= tolerance * real_weighted.max(sim_weighted)
}

pub fn ratios(real: &ScenarioFigures, sim_weighted: f64, sim_unweighted: f64, tolerance: f64) -> Ratios {
    let weight_ratio = ratio_or_one(sim_weighted, real.weighted);
    Ratios {
        weight_ratio,
        total_ratio: ratio_or_one(sim_unweighted, real.unweighted),
        significant: departs_from_unity(weight_ratio, tolerance),
    }
}

pub fn simulated_scenario(
    real: &RealMunicipalData,
    real_figures: &ScenarioFigures,
    simulated: &ModalityCounts,
    params: &FundingParams,
) -> Comparison {
    let sim_weighted = weighted_enrollment(simulated, &params.weights);
    let sim_unweighted = total_enrollment(simulated);
    let r = ratios(real_figures, sim_weighted, sim_unweighted, params.significance_tolerance);

    let mut figures = ScenarioFigures { unweighted: sim_unweighted, weighted: sim_weighted, ..*real_figures };

    if r.significant {
        figures.vaaf = real_figures.vaaf.scaled(r.weight_ratio);
        figures.vaat = real_figures.vaat.scaled(r.weight_ratio);
    }

    let vaar_moves = if real_figures.weighted > 0.0 {
        r.significant
    } else {
        departs_from_unity(r.total_ratio, params.significance_tolerance)
    };
    if vaar_moves && real_figures.unweighted > 0.0 {
        let scaled = vaar::scale_from_authoritative(real.real_vaar_top_up, real_figures.unweighted, sim_unweighted);
        figures.vaar = fb_algo::MechanismOutcome { unit_value: real_figures.vaar.unit_value, ..scaled };
    }

    let identical = weighted_identical(real_figures.weighted, sim_weighted, params.significance_tolerance);
    Comparison { figures, ratios: r, identical }
}
