//! Loader: read local JSON inputs into typed structures. No network I/O.
//!
//! Accepted files:
//! - baseline data: a `RealMunicipalData` object
//! - simulated scenario: either a `ModalityCounts` object or
//!   `{"enrollmentByRawCategory": {...}}`, aggregated on load
//! - mapping table: a `ModalityMapping` object
//!
//! Numeric sanity (negative/non-finite) is not checked here; that is the
//! pipeline's boundary validation.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use fb_algo::{aggregate_with, Aggregation, ModalityMapping};
use fb_core::{ModalityCounts, RealMunicipalData};

use crate::{IoError, IoResult};

/// Parse a JSON file into `T`, tagging errors with the path.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> IoResult<T> {
    let text = fs::read_to_string(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    let value = serde_json::from_str(&text).map_err(|e| match IoError::from(e) {
        IoError::Json { pointer, msg } => IoError::Json { pointer: format!("{}: {pointer}", path.display()), msg },
        other => other,
    })?;
    tracing::debug!(target: "fb.io", path = %path.display(), bytes = text.len(), "loaded json");
    Ok(value)
}

pub fn load_real_data(path: &Path) -> IoResult<RealMunicipalData> {
    read_json(path)
}

pub fn load_mapping(path: &Path) -> IoResult<ModalityMapping> {
    read_json(path)
}

/// Simulated scenario as written by the caller.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SimulatedInput {
    #[serde(rename_all = "camelCase")]
    Raw { enrollment_by_raw_category: std::collections::BTreeMap<String, f64> },
    Counts(ModalityCounts),
}

impl SimulatedInput {
    /// Resolve to modality counts (raw labels go through `mapping`).
    pub fn into_aggregation(self, mapping: &ModalityMapping) -> Aggregation {
        match self {
            SimulatedInput::Counts(counts) => Aggregation { counts, ..Default::default() },
            SimulatedInput::Raw { enrollment_by_raw_category } => aggregate_with(mapping, &enrollment_by_raw_category),
        }
    }
}

pub fn load_simulated(path: &Path) -> IoResult<SimulatedInput> {
    read_json(path)
}
