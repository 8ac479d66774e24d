//! Authoritative baseline facts for one municipality and reference year.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Baseline supplied once per calculation call; the engine never mutates it.
///
/// All currency and count fields are expected to be finite and ≥ 0. The
/// `real_*_top_up` figures are the amounts already computed by the external
/// authority for the year; zero means "does not receive this mechanism".
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RealMunicipalData {
    /// Optional label echoed in logs (IBGE code or name).
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub municipality: Option<String>,

    /// Legally mandated contribution base (20% of qualifying local taxes).
    pub contribution_revenue: f64,

    /// Externally computed total education revenue. Carried for the caller;
    /// the VAAT estimator does not read it.
    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "receitaTotal", skip_serializing_if = "Option::is_none")
    )]
    pub total_revenue: Option<f64>,

    /// Authoritative unweighted enrollment, used when no breakdown is available.
    #[cfg_attr(feature = "serde", serde(default))]
    pub total_enrollment: u64,

    /// Free-form category label → enrolled students. May be empty.
    #[cfg_attr(feature = "serde", serde(default))]
    pub enrollment_by_raw_category: BTreeMap<String, f64>,

    #[cfg_attr(feature = "serde", serde(default, rename = "realVAAFTopUp"))]
    pub real_vaaf_top_up: f64,
    #[cfg_attr(feature = "serde", serde(default, rename = "realVAATTopUp"))]
    pub real_vaat_top_up: f64,
    #[cfg_attr(feature = "serde", serde(default, rename = "realVAARTopUp"))]
    pub real_vaar_top_up: f64,
}

impl RealMunicipalData {
    /// Sum of the three authoritative top-ups.
    pub fn real_top_up_sum(&self) -> f64 {
        self.real_vaaf_top_up + self.real_vaat_top_up + self.real_vaar_top_up
    }

    /// Named currency fields in a fixed order (used by boundary validation).
    pub fn currency_fields(&self) -> [(&'static str, f64); 4] {
        [
            ("contributionRevenue", self.contribution_revenue),
            ("realVAAFTopUp", self.real_vaaf_top_up),
            ("realVAATTopUp", self.real_vaat_top_up),
            ("realVAARTopUp", self.real_vaar_top_up),
        ]
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_names_and_defaults() {
        let json = r#"{
            "contributionRevenue": 17734911.24,
            "receitaTotal": 90000000.0,
            "totalEnrollment": 2101,
            "realVAATTopUp": 2627864.62
        }"#;
        let d: RealMunicipalData = serde_json::from_str(json).unwrap();
        assert_eq!(d.contribution_revenue, 17_734_911.24);
        assert_eq!(d.total_revenue, Some(90_000_000.0));
        assert_eq!(d.total_enrollment, 2101);
        assert_eq!(d.real_vaat_top_up, 2_627_864.62);
        assert_eq!(d.real_vaaf_top_up, 0.0);
        assert!(d.enrollment_by_raw_category.is_empty());
        assert_eq!(d.real_top_up_sum(), 2_627_864.62);
    }
}
