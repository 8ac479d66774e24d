//! Modality Aggregator: collapse free-form enrollment category labels into
//! the 8 canonical modalities.
//!
//! Contract:
//! - Labels are lower-cased before matching.
//! - Exact-label overrides are consulted first, then keyword rules in table
//!   order; the first match wins, so each label feeds at most one modality.
//! - Labels matching nothing land in `Aggregation::unmapped` (never silently
//!   dropped); the counts structure simply does not include them.
//! - Counts for labels mapping to the same modality are summed.
//!
//! The keyword table is data: it can be reviewed, extended, or replaced with
//! a JSON mapping file without touching this code.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use fb_core::{Modality, ModalityCounts};

/// `label contains keyword` ⇒ `modality`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeywordRule {
    pub keyword: String,
    pub modality: Modality,
}

impl KeywordRule {
    pub fn new(keyword: &str, modality: Modality) -> Self {
        Self { keyword: keyword.to_lowercase(), modality }
    }
}

/// Reviewable raw-label → modality mapping table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModalityMapping {
    /// Lower-cased full label → modality. Checked before any keyword.
    #[cfg_attr(feature = "serde", serde(default))]
    pub exact: BTreeMap<String, Modality>,
    /// Ordered keyword rules; earlier rules take precedence.
    pub keywords: Vec<KeywordRule>,
}

impl Default for ModalityMapping {
    /// Default table. Special education, indigenous/quilombola and EJA come
    /// first so that labels such as "EJA presencial" or "Ensino Médio
    /// Indígena" are not captured by the broader `pre`/`medio` keywords.
    fn default() -> Self {
        use Modality::*;
        let keywords = [
            ("especial", SpecialEducation),
            ("indigena", IndigenousQuilombola),
            ("indígena", IndigenousQuilombola),
            ("quilombola", IndigenousQuilombola),
            ("eja", AdultEducation),
            ("creche", Nursery),
            ("pré", PreSchool),
            ("pre", PreSchool),
            ("iniciais", EarlyGrades),
            ("finais", LateGrades),
            ("médio", Secondary),
            ("medio", Secondary),
        ]
        .into_iter()
        .map(|(k, m)| KeywordRule::new(k, m))
        .collect();

        Self { exact: BTreeMap::new(), keywords }
    }
}

impl ModalityMapping {
    /// Add (or replace) an exact-label override.
    pub fn with_exact(mut self, label: &str, modality: Modality) -> Self {
        self.exact.insert(label.to_lowercase(), modality);
        self
    }

    /// Resolve a single raw label; `None` when nothing matches.
    pub fn classify(&self, label: &str) -> Option<Modality> {
        let lower = label.to_lowercase();
        if let Some(m) = self.exact.get(lower.trim()) {
            return Some(*m);
        }
        self.keywords
            .iter()
            .find(|r| !r.keyword.is_empty() && lower.contains(r.keyword.as_str()))
            .map(|r| r.modality)
    }
}

/// Aggregated counts plus the labels no rule matched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Aggregation {
    pub counts: ModalityCounts,
    /// Original label → count, for audit.
    pub unmapped: BTreeMap<String, f64>,
}

impl Aggregation {
    /// Students that could not be assigned to any modality.
    pub fn unmapped_total(&self) -> f64 {
        self.unmapped.values().sum()
    }
}

/// Aggregate with an explicit mapping table.
pub fn aggregate_with(mapping: &ModalityMapping, raw: &BTreeMap<String, f64>) -> Aggregation {
    let mut out = Aggregation::default();
    for (label, &count) in raw {
        match mapping.classify(label) {
            Some(m) => out.counts.add(m, count),
            None => {
                tracing::warn!(target: "fb.aggregate", label = %label, count, "unmapped enrollment category");
                *out.unmapped.entry(label.clone()).or_insert(0.0) += count;
            }
        }
    }
    out
}

/// Public entry point: default mapping, counts only.
pub fn aggregate_modalities(raw: &BTreeMap<String, f64>) -> ModalityCounts {
    aggregate_with(&ModalityMapping::default(), raw).counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn census_labels_map_to_the_expected_modalities() {
        let m = ModalityMapping::default();
        assert_eq!(m.classify("Creche - Parcial"), Some(Modality::Nursery));
        assert_eq!(m.classify("Pré-escola Integral"), Some(Modality::PreSchool));
        assert_eq!(m.classify("PRE-ESCOLA"), Some(Modality::PreSchool));
        assert_eq!(m.classify("Ensino Fundamental - Anos Iniciais"), Some(Modality::EarlyGrades));
        assert_eq!(m.classify("Ensino Fundamental - Anos Finais"), Some(Modality::LateGrades));
        assert_eq!(m.classify("Ensino Médio Urbano"), Some(Modality::Secondary));
        assert_eq!(m.classify("ensino medio"), Some(Modality::Secondary));
        assert_eq!(m.classify("EJA Fundamental"), Some(Modality::AdultEducation));
        assert_eq!(m.classify("Educação Especial"), Some(Modality::SpecialEducation));
        assert_eq!(m.classify("Escola Indígena"), Some(Modality::IndigenousQuilombola));
        assert_eq!(m.classify("Comunidade Quilombola"), Some(Modality::IndigenousQuilombola));
    }

    #[test]
    fn table_order_resolves_overlapping_keywords() {
        let m = ModalityMapping::default();
        // "presencial" contains "pre", EJA wins because it is listed first.
        assert_eq!(m.classify("EJA presencial"), Some(Modality::AdultEducation));
        assert_eq!(m.classify("Ensino Médio Indígena"), Some(Modality::IndigenousQuilombola));
    }

    #[test]
    fn exact_overrides_beat_keywords() {
        let m = ModalityMapping::default().with_exact("Educação Profissional", Modality::Secondary);
        assert_eq!(m.classify("educação profissional"), Some(Modality::Secondary));
        assert_eq!(ModalityMapping::default().classify("Educação Profissional"), None);
    }

    #[test]
    fn same_modality_labels_are_summed_and_unmatched_are_surfaced() {
        let agg = aggregate_with(
            &ModalityMapping::default(),
            &raw(&[
                ("Creche Parcial", 100.0),
                ("Creche Integral", 50.0),
                ("Anos Iniciais", 400.0),
                ("Atividade Complementar", 30.0),
            ]),
        );
        assert_eq!(agg.counts.nursery, 150.0);
        assert_eq!(agg.counts.early_grades, 400.0);
        assert_eq!(agg.unmapped.get("Atividade Complementar"), Some(&30.0));
        assert_eq!(agg.unmapped_total(), 30.0);
    }

    #[test]
    fn empty_input_yields_all_zero_counts() {
        let counts = aggregate_modalities(&BTreeMap::new());
        assert_eq!(counts, ModalityCounts::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn mapping_table_loads_from_json() {
        let json = r#"{
            "exact": { "educação profissional": "secondary" },
            "keywords": [ { "keyword": "berçário", "modality": "nursery" } ]
        }"#;
        let m: ModalityMapping = serde_json::from_str(json).unwrap();
        assert_eq!(m.classify("Berçário"), Some(Modality::Nursery));
        assert_eq!(m.classify("Educação Profissional"), Some(Modality::Secondary));
        assert_eq!(m.classify("Creche"), None);
    }
}
