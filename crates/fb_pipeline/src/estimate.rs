//! Formula estimate: the `compute_from_formula` paths run on both scenarios.
//!
//! Diagnostic companion to `simulate`. It shows what the VAAF/VAAT formulas
//! yield from contribution revenue and weighted enrollment alone, and how far
//! that lands from the authoritative figures (`formula_gap`).
//!
//! - Real VAAT keeps the entitlement-preservation branch; when preservation
//!   fired, simulated VAAT = real VAAT × weight ratio instead of the formula.
//! - VAAR has no formula: it is always scaled on unweighted enrollment.
//! - An all-zero simulated scenario mirrors the real one.

use serde::{Deserialize, Serialize};

use fb_algo::mechanisms::{vaaf, vaar, vaat};
use fb_algo::{total_enrollment, weighted_enrollment, MechanismOutcome, ModalityMapping, VaatOutcome};
use fb_core::rounding::{ratio_or_one, round2};
use fb_core::{FundingParams, ModalityCounts, RealMunicipalData};

use crate::aggregate::resolve_real_enrollment;
use crate::SimulationState;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedScenario {
    pub unweighted: f64,
    pub weighted: f64,
    pub vaaf: MechanismOutcome,
    pub vaat: VaatOutcome,
    pub vaar: MechanismOutcome,
    /// contribution + Σ top-ups.
    pub total_transfer: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaEstimate {
    pub reference_year: u16,
    pub state: SimulationState,
    pub real: EstimatedScenario,
    pub simulated: EstimatedScenario,
    pub weight_ratio: f64,
    pub total_ratio: f64,
    /// Real formula total − real authoritative total.
    pub formula_gap: f64,
}

pub fn estimate(real: &RealMunicipalData, simulated: &ModalityCounts, params: &FundingParams) -> FormulaEstimate {
    estimate_with(real, simulated, params, &ModalityMapping::default())
}

pub fn estimate_with(
    real: &RealMunicipalData,
    simulated: &ModalityCounts,
    params: &FundingParams,
    mapping: &ModalityMapping,
) -> FormulaEstimate {
    let c = real.contribution_revenue;
    let enrollment = resolve_real_enrollment(real, &params.weights, mapping);

    let real_vaaf = vaaf::compute_from_formula(c, enrollment.weighted, params.vaaf_min);
    let real_vaat =
        vaat::compute_from_formula(c, enrollment.weighted, real_vaaf.top_up, params.vaat_min, real.real_vaat_top_up);
    let real_vaar = vaar::trust_authoritative(real.real_vaar_top_up, enrollment.unweighted);
    let real_scn = scenario(c, enrollment.unweighted, enrollment.weighted, real_vaaf, real_vaat, real_vaar);
    let formula_gap = round2(real_scn.total_transfer - (c + real.real_top_up_sum()));

    let sim_unweighted = total_enrollment(simulated);
    if sim_unweighted == 0.0 {
        return FormulaEstimate {
            reference_year: params.reference_year,
            state: SimulationState::BaselineOnly,
            real: real_scn,
            simulated: real_scn,
            weight_ratio: 1.0,
            total_ratio: 1.0,
            formula_gap,
        };
    }

    let sim_weighted = weighted_enrollment(simulated, &params.weights);
    let weight_ratio = ratio_or_one(sim_weighted, enrollment.weighted);
    let total_ratio = ratio_or_one(sim_unweighted, enrollment.unweighted);

    let sim_vaaf = vaaf::compute_from_formula(c, sim_weighted, params.vaaf_min);
    let sim_vaat = if real_vaat.preserved {
        VaatOutcome {
            estimated_total_revenue: vaat::estimated_total_revenue(c, sim_vaaf.top_up),
            ..real_vaat.scaled(weight_ratio)
        }
    } else {
        vaat::compute_from_formula(c, sim_weighted, sim_vaaf.top_up, params.vaat_min, 0.0)
    };
    let sim_vaar = vaar::scale_from_authoritative(real.real_vaar_top_up, enrollment.unweighted, sim_unweighted);

    tracing::debug!(
        target: "fb.simulate",
        weight_ratio,
        total_ratio,
        vaat_preserved = real_vaat.preserved,
        formula_gap,
        "formula estimate"
    );

    FormulaEstimate {
        reference_year: params.reference_year,
        state: SimulationState::Comparison,
        real: real_scn,
        simulated: scenario(c, sim_unweighted, sim_weighted, sim_vaaf, sim_vaat, sim_vaar),
        weight_ratio,
        total_ratio,
        formula_gap,
    }
}

fn scenario(
    contribution: f64,
    unweighted: f64,
    weighted: f64,
    vaaf: MechanismOutcome,
    vaat: VaatOutcome,
    vaar: MechanismOutcome,
) -> EstimatedScenario {
    EstimatedScenario {
        unweighted,
        weighted,
        vaaf,
        vaat,
        vaar,
        total_transfer: round2(contribution + vaaf.top_up + vaat.outcome.top_up + vaar.top_up),
    }
}
