//! Real scenario: authoritative top-ups taken as facts, never recomputed.

use fb_algo::mechanisms::{vaaf, vaar, vaat};
use fb_core::RealMunicipalData;

use crate::aggregate::RealEnrollment;
use crate::ScenarioFigures;

/// Unit values are derived as top-up / enrollment (weighted for VAAF/VAAT,
/// unweighted for VAAR); top-ups are the authoritative figures rounded to 2
/// decimals.
pub fn real_scenario(real: &RealMunicipalData, enrollment: &RealEnrollment) -> ScenarioFigures {
    ScenarioFigures {
        unweighted: enrollment.unweighted,
        weighted: enrollment.weighted,
        vaaf: vaaf::trust_authoritative(real.real_vaaf_top_up, enrollment.weighted),
        vaat: vaat::trust_authoritative(
            real.real_vaat_top_up,
            enrollment.weighted,
            real.contribution_revenue,
            real.real_vaaf_top_up,
        ),
        vaar: vaar::trust_authoritative(real.real_vaar_top_up, enrollment.unweighted),
    }
}
