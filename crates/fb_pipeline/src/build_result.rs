//! Result assembly: totals, deltas and the flat wire structure.
//!
//! - total transfer = contribution revenue + Σ top-ups (contribution is never
//!   altered by an enrollment-only simulation)
//! - absolute difference = simulated total − real total
//! - percentage difference = absolute / real total × 100 (0 if real total is 0)
//!
//! Every figure is rounded to 2 decimals here, once.

use std::collections::BTreeMap;

use fb_core::rounding::round2;
use fb_core::RealMunicipalData;

use crate::{ScenarioFigures, SimulationResult, SimulationState};

/// Transfer totals and deltas for a pair of scenarios.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Totals {
    pub real: f64,
    pub simulated: f64,
    pub absolute: f64,
    pub percentage: f64,
}

pub fn totals(contribution_revenue: f64, real: &ScenarioFigures, simulated: &ScenarioFigures) -> Totals {
    let real_total = round2(contribution_revenue + real.top_up_sum());
    let sim_total = round2(contribution_revenue + simulated.top_up_sum());
    let absolute = round2(sim_total - real_total);
    let percentage = if real_total > 0.0 { round2(absolute / real_total * 100.0) } else { 0.0 };
    Totals { real: real_total, simulated: sim_total, absolute, percentage }
}

pub fn assemble(
    real: &RealMunicipalData,
    r: &ScenarioFigures,
    s: &ScenarioFigures,
    state: SimulationState,
    identical: bool,
    unmapped: BTreeMap<String, f64>,
) -> SimulationResult {
    let t = totals(real.contribution_revenue, r, s);

    SimulationResult {
        estado: state,

        matriculas_reais: round2(r.unweighted),
        matriculas_simuladas: round2(s.unweighted),
        matriculas_ponderadas_reais: round2(r.weighted),
        matriculas_ponderadas_simuladas: round2(s.weighted),

        vaaf_real: r.vaaf.unit_value,
        vaaf_simulado: s.vaaf.unit_value,
        complementacao_vaaf_real: r.vaaf.top_up,
        complementacao_vaaf_simulada: s.vaaf.top_up,

        vaat_real: r.vaat.outcome.unit_value,
        vaat_simulado: s.vaat.outcome.unit_value,
        receita_total_estimada_real: r.vaat.estimated_total_revenue,
        receita_total_estimada_simulada: s.vaat.estimated_total_revenue,
        complementacao_vaat_real: r.vaat.outcome.top_up,
        complementacao_vaat_simulada: s.vaat.outcome.top_up,

        vaar_real: r.vaar.unit_value,
        vaar_simulado: s.vaar.unit_value,
        complementacao_vaar_real: r.vaar.top_up,
        complementacao_vaar_simulada: s.vaar.top_up,

        recebe_vaaf: r.vaaf.eligible,
        recebe_vaat: r.vaat.outcome.eligible,
        recebe_vaar: r.vaar.eligible,

        total_repasses_real: t.real,
        total_repasses_simulado: t.simulated,
        diferenca_absoluta: t.absolute,
        diferenca_percentual: t.percentage,
        matriculas_identicas: identical,

        categorias_nao_mapeadas: unmapped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fb_algo::{MechanismOutcome, VaatOutcome};

    fn with_vaat(top_up: f64) -> ScenarioFigures {
        ScenarioFigures {
            vaat: VaatOutcome {
                outcome: MechanismOutcome { unit_value: 0.0, top_up, eligible: top_up > 0.0 },
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn totals_add_contribution_and_top_ups() {
        let t = totals(17_734_911.24, &with_vaat(2_627_864.62), &with_vaat(2_890_651.08));
        assert_eq!(t.real, 20_362_775.86);
        assert_eq!(t.simulated, 20_625_562.32);
        assert_eq!(t.absolute, 262_786.46);
        assert_eq!(t.percentage, 1.29);
    }

    #[test]
    fn zero_real_total_gives_zero_percentage() {
        let t = totals(0.0, &with_vaat(0.0), &with_vaat(100.0));
        assert_eq!(t.absolute, 100.0);
        assert_eq!(t.percentage, 0.0);
    }
}
