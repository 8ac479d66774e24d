//! fb_pipeline: simulation orchestration (validate → resolve real enrollment →
//! baseline → compare → build result).
//!
//! This crate is I/O-free: inputs arrive as already-resolved numeric
//! structures, and JSON/hashing live in `fb_io`.
//!
//! State machine:
//! - `BaselineOnly`: the simulated counts sum to 0 (scenario not edited yet).
//!   Every simulated field mirrors the real one.
//! - `Comparison`: the simulated counts have a nonzero total. Real figures are
//!   trusted from authoritative data; simulated figures are scaled from them.
//!
//! `simulate` never fails: degenerate inputs degrade to zero/ineligible
//! figures. Callers reject malformed input beforehand with [`validate`].

#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fb_algo::{MechanismOutcome, ModalityMapping, VaatOutcome};
use fb_core::{FundingParams, ModalityCounts, RealMunicipalData};

pub mod aggregate;
pub mod baseline;
pub mod build_result;
pub mod compare;
pub mod estimate;
pub mod validate;

pub use aggregate::{resolve_real_enrollment, RealEnrollment};
pub use compare::Ratios;
pub use estimate::{estimate, estimate_with, EstimatedScenario, FormulaEstimate};
pub use validate::{validate, EntityRef, Severity, ValidationIssue, ValidationReport};

// Re-export the aggregation entry point so UI collaborators need one crate.
pub use fb_algo::aggregate_modalities;

// ---------------------------- State & per-scenario figures ----------------------------

/// Which branch of the orchestrator produced a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimulationState {
    BaselineOnly,
    Comparison,
}

impl SimulationState {
    pub fn as_str(self) -> &'static str {
        match self {
            SimulationState::BaselineOnly => "BASELINE_ONLY",
            SimulationState::Comparison => "COMPARISON",
        }
    }
}

/// Enrollment and mechanism figures for one scenario (real or simulated).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioFigures {
    pub unweighted: f64,
    pub weighted: f64,
    pub vaaf: MechanismOutcome,
    pub vaat: VaatOutcome,
    pub vaar: MechanismOutcome,
}

impl ScenarioFigures {
    pub fn top_up_sum(&self) -> f64 {
        self.vaaf.top_up + self.vaat.outcome.top_up + self.vaar.top_up
    }
}

// ---------------------------- Result ----------------------------

/// Real vs simulated comparison, serialized with the names UI collaborators
/// consume. All currency and percentage figures are rounded to 2 decimals;
/// percentages are already multiplied by 100.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub estado: SimulationState,

    pub matriculas_reais: f64,
    pub matriculas_simuladas: f64,
    pub matriculas_ponderadas_reais: f64,
    pub matriculas_ponderadas_simuladas: f64,

    pub vaaf_real: f64,
    pub vaaf_simulado: f64,
    #[serde(rename = "complementacaoVAAFReal")]
    pub complementacao_vaaf_real: f64,
    #[serde(rename = "complementacaoVAAFSimulada")]
    pub complementacao_vaaf_simulada: f64,

    pub vaat_real: f64,
    pub vaat_simulado: f64,
    pub receita_total_estimada_real: f64,
    pub receita_total_estimada_simulada: f64,
    #[serde(rename = "complementacaoVAATReal")]
    pub complementacao_vaat_real: f64,
    #[serde(rename = "complementacaoVAATSimulada")]
    pub complementacao_vaat_simulada: f64,

    pub vaar_real: f64,
    pub vaar_simulado: f64,
    #[serde(rename = "complementacaoVAARReal")]
    pub complementacao_vaar_real: f64,
    #[serde(rename = "complementacaoVAARSimulada")]
    pub complementacao_vaar_simulada: f64,

    #[serde(rename = "recebeVAAF")]
    pub recebe_vaaf: bool,
    #[serde(rename = "recebeVAAT")]
    pub recebe_vaat: bool,
    #[serde(rename = "recebeVAAR")]
    pub recebe_vaar: bool,

    pub total_repasses_real: f64,
    pub total_repasses_simulado: f64,
    pub diferenca_absoluta: f64,
    pub diferenca_percentual: f64,
    pub matriculas_identicas: bool,

    /// Raw labels of the real breakdown that matched no modality.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub categorias_nao_mapeadas: BTreeMap<String, f64>,
}

// ---------------------------- Entry points ----------------------------

/// Primary entry point with the default modality mapping.
pub fn simulate(real: &RealMunicipalData, simulated: &ModalityCounts, params: &FundingParams) -> SimulationResult {
    simulate_with(real, simulated, params, &ModalityMapping::default())
}

/// Same as [`simulate`] with an explicit mapping for the real breakdown.
pub fn simulate_with(
    real: &RealMunicipalData,
    simulated: &ModalityCounts,
    params: &FundingParams,
    mapping: &ModalityMapping,
) -> SimulationResult {
    let enrollment = resolve_real_enrollment(real, &params.weights, mapping);
    let real_figures = baseline::real_scenario(real, &enrollment);

    let sim_unweighted = fb_algo::total_enrollment(simulated);
    if sim_unweighted == 0.0 {
        tracing::debug!(
            target: "fb.simulate",
            state = SimulationState::BaselineOnly.as_str(),
            municipality = real.municipality.as_deref().unwrap_or("-"),
            "simulated scenario is empty; mirroring baseline"
        );
        return build_result::assemble(
            real,
            &real_figures,
            &real_figures,
            SimulationState::BaselineOnly,
            true,
            enrollment.unmapped,
        );
    }

    let cmp = compare::simulated_scenario(real, &real_figures, simulated, params);
    tracing::debug!(
        target: "fb.simulate",
        state = SimulationState::Comparison.as_str(),
        municipality = real.municipality.as_deref().unwrap_or("-"),
        weight_ratio = cmp.ratios.weight_ratio,
        total_ratio = cmp.ratios.total_ratio,
        significant = cmp.ratios.significant,
        identical = cmp.identical,
        "scaled simulated scenario"
    );

    build_result::assemble(
        real,
        &real_figures,
        &cmp.figures,
        SimulationState::Comparison,
        cmp.identical,
        enrollment.unmapped,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_follow_the_collaborator_contract() {
        let real = RealMunicipalData { contribution_revenue: 1_000.0, ..Default::default() };
        let r = simulate(&real, &ModalityCounts::default(), &FundingParams::default());
        let v = serde_json::to_value(&r).unwrap();
        let obj = v.as_object().unwrap();
        for key in [
            "estado",
            "matriculasReais",
            "matriculasPonderadasSimuladas",
            "vaafReal",
            "complementacaoVAAFSimulada",
            "receitaTotalEstimadaReal",
            "complementacaoVAATReal",
            "complementacaoVAARSimulada",
            "recebeVAAF",
            "recebeVAAT",
            "recebeVAAR",
            "totalRepassesSimulado",
            "diferencaPercentual",
            "matriculasIdenticas",
        ] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(obj["estado"], "BASELINE_ONLY");
        assert!(!obj.contains_key("categoriasNaoMapeadas"));
    }
}
