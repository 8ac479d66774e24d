//! Per-reference-year constants registry.
//!
//! Built-in bundles come from `FundingParams::for_year`. A constants file is a
//! JSON array of bundles:
//!
//! ```json
//! [ { "referenceYear": 2026, "vaafMin": 5900.0, "vaatMin": 7100.0 } ]
//! ```
//!
//! `weights` and `significanceTolerance` are optional per bundle. A file
//! bundle replaces a built-in bundle of the same year. Every file bundle must
//! pass `validate_domains`; a year may appear only once per file.

use std::collections::BTreeMap;
use std::path::Path;

use fb_core::variables::BUILTIN_YEARS;
use fb_core::FundingParams;

use crate::loader::read_json;
use crate::{IoError, IoResult};

/// Parse and validate a constants file.
pub fn load_constants_file(path: &Path) -> IoResult<Vec<FundingParams>> {
    let bundles: Vec<FundingParams> = read_json(path)?;
    let mut seen = std::collections::BTreeSet::new();
    for b in &bundles {
        if !seen.insert(b.reference_year) {
            return Err(IoError::Constants(format!(
                "{}: reference year {} appears more than once",
                path.display(),
                b.reference_year
            )));
        }
        b.validate_domains()
            .map_err(|e| IoError::Constants(format!("{} (year {}): {e}", path.display(), b.reference_year)))?;
    }
    Ok(bundles)
}

/// Year → bundle lookup with file overrides layered over built-ins.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstantsRegistry {
    bundles: BTreeMap<u16, FundingParams>,
}

impl ConstantsRegistry {
    /// Registry holding only the built-in bundles.
    pub fn builtin() -> Self {
        let bundles = BUILTIN_YEARS
            .iter()
            .filter_map(|&y| FundingParams::for_year(y).ok().map(|p| (y, p)))
            .collect();
        Self { bundles }
    }

    /// Built-ins, then the bundles of `path` (if any) on top.
    pub fn with_file(path: Option<&Path>) -> IoResult<Self> {
        let mut reg = Self::builtin();
        if let Some(p) = path {
            let loaded = load_constants_file(p)?;
            tracing::debug!(target: "fb.io", path = %p.display(), bundles = loaded.len(), "loaded constants file");
            reg.extend(loaded);
        }
        Ok(reg)
    }

    /// Insert bundles, replacing any existing bundle for the same year.
    pub fn extend(&mut self, bundles: impl IntoIterator<Item = FundingParams>) {
        for b in bundles {
            if self.bundles.contains_key(&b.reference_year) {
                tracing::info!(target: "fb.io", year = b.reference_year, "constants bundle overrides built-in");
            }
            self.bundles.insert(b.reference_year, b);
        }
    }

    pub fn get(&self, year: u16) -> IoResult<FundingParams> {
        self.bundles
            .get(&year)
            .cloned()
            .ok_or_else(|| IoError::from(fb_core::CoreError::UnknownReferenceYear(year)))
    }

    /// Bundles in ascending year order.
    pub fn bundles(&self) -> impl Iterator<Item = &FundingParams> {
        self.bundles.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
        let p = dir.path().join("constants.json");
        std::fs::write(&p, body).unwrap();
        p
    }

    #[test]
    fn builtin_registry_knows_the_shipped_years() {
        let reg = ConstantsRegistry::builtin();
        let years: Vec<u16> = reg.bundles().map(|b| b.reference_year).collect();
        assert_eq!(years, vec![2024, 2025]);
        assert_eq!(reg.get(2025).unwrap().vaat_min, 6_500.00);
        assert!(matches!(reg.get(2031), Err(IoError::Constants(_))));
    }

    #[test]
    fn file_bundles_add_years_and_override_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let p = write(
            &dir,
            r#"[
                {"referenceYear": 2026, "vaafMin": 5900.0, "vaatMin": 7100.0},
                {"referenceYear": 2024, "vaafMin": 5000.0, "vaatMin": 6000.0, "significanceTolerance": 0.005}
            ]"#,
        );
        let reg = ConstantsRegistry::with_file(Some(&p)).unwrap();
        let y26 = reg.get(2026).unwrap();
        assert_eq!(y26.vaat_min, 7_100.0);
        assert_eq!(y26.weights, fb_core::WeightTable::default());
        assert_eq!(y26.significance_tolerance, fb_core::variables::DEFAULT_SIGNIFICANCE_TOLERANCE);
        let y24 = reg.get(2024).unwrap();
        assert_eq!(y24.vaaf_min, 5_000.0);
        assert_eq!(y24.significance_tolerance, 0.005);
        assert_eq!(reg.get(2025).unwrap(), FundingParams::for_year(2025).unwrap());
    }

    #[test]
    fn invalid_or_duplicate_bundles_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write(&dir, r#"[{"referenceYear": 2026, "vaafMin": -1.0, "vaatMin": 7100.0}]"#);
        assert!(matches!(load_constants_file(&bad), Err(IoError::Constants(_))));

        let dup = write(
            &dir,
            r#"[{"referenceYear": 2026, "vaafMin": 1.0, "vaatMin": 2.0},
                {"referenceYear": 2026, "vaafMin": 1.0, "vaatMin": 2.0}]"#,
        );
        let err = load_constants_file(&dup).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn no_file_means_builtins_only() {
        assert_eq!(ConstantsRegistry::with_file(None).unwrap(), ConstantsRegistry::builtin());
    }
}
