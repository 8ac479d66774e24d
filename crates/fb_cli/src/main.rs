// crates/fb_cli/src/main.rs
//
// Exit codes, typed error mapping, and the subcommand runners.
// stdout carries exactly one JSON document per invocation.

mod args;
mod telemetry;

mod exitcodes {
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const IO: i32 = 4;
    pub const CONFIG: i32 = 5;
}

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use args::{parse_and_validate as parse_cli, AggregateArgs, Args, Command, RunArgs};
use fb_algo::{aggregate_with, total_enrollment, weighted_enrollment, ModalityMapping};
use fb_core::{FundingParams, ModalityCounts, RealMunicipalData};
use fb_io::constants::ConstantsRegistry;
use fb_io::{canonical_json, hasher, loader};
use fb_pipeline::{Severity, ValidationReport};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Input shape / numeric-domain failures
    Validation(String),
    /// Read/write/path errors
    Io(String),
    /// Constants bundle or logging configuration errors
    Config(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validation: {m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
            MainError::Config(m) => write!(f, "config: {m}"),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("fundeb: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };

    if let Err(e) = telemetry::init(&args.log_level) {
        eprintln!("fundeb: error: {e}");
        return ExitCode::from(exitcodes::CONFIG as u8);
    }

    let rc = match run(&args) {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            eprintln!("fundeb: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

fn map_error(e: &MainError) -> i32 {
    match e {
        MainError::Validation(_) => exitcodes::VALIDATION,
        MainError::Io(_) => exitcodes::IO,
        MainError::Config(_) => exitcodes::CONFIG,
    }
}

/// Translate fb_io::IoError into MainError buckets for exit-code mapping.
fn map_io_err(e: fb_io::IoError) -> MainError {
    use fb_io::IoError;
    match e {
        IoError::Json { pointer, msg } => MainError::Validation(format!("json {pointer}: {msg}")),
        IoError::Path(m) => MainError::Io(format!("path: {m}")),
        IoError::Hash(m) => MainError::Io(format!("hash: {m}")),
        IoError::Constants(m) => MainError::Config(m),
    }
}

fn run(args: &Args) -> Result<(), MainError> {
    match &args.command {
        Command::Years => {
            let reg = ConstantsRegistry::with_file(args.constants.as_deref()).map_err(map_io_err)?;
            let bundles: Vec<&FundingParams> = reg.bundles().collect();
            emit(&bundles, true)
        }
        Command::Aggregate(a) => run_aggregate(args, a),
        Command::Validate(r) => {
            let inputs = Inputs::load(args, r)?;
            let report = inputs.validate();
            emit(&ReportView::from(&report), r.pretty)?;
            if report.pass {
                Ok(())
            } else {
                Err(MainError::Validation(format!("{} error(s)", report.errors().count())))
            }
        }
        Command::Simulate(r) => {
            let inputs = Inputs::load(args, r)?;
            inputs.require_valid()?;
            let result = fb_pipeline::simulate_with(&inputs.real, &inputs.simulated, &inputs.params, &inputs.mapping);
            if let Some(dir) = &r.out {
                write_artifacts(dir, &inputs, &result)?;
            }
            emit(&result, r.pretty)
        }
        Command::Estimate(r) => {
            let inputs = Inputs::load(args, r)?;
            inputs.require_valid()?;
            let estimate = fb_pipeline::estimate_with(&inputs.real, &inputs.simulated, &inputs.params, &inputs.mapping);
            emit(&estimate, r.pretty)
        }
    }
}

// ---------------------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------------------

struct Inputs {
    real: RealMunicipalData,
    simulated: ModalityCounts,
    params: FundingParams,
    mapping: ModalityMapping,
    digests: InputDigests,
}

impl Inputs {
    fn load(args: &Args, r: &RunArgs) -> Result<Self, MainError> {
        let registry = ConstantsRegistry::with_file(args.constants.as_deref()).map_err(map_io_err)?;
        let params = registry.get(args.year).map_err(map_io_err)?;

        let mapping = match &r.mapping {
            Some(p) => loader::load_mapping(p).map_err(map_io_err)?,
            None => ModalityMapping::default(),
        };
        let real = loader::load_real_data(&r.real).map_err(map_io_err)?;
        let sim = loader::load_simulated(&r.simulated).map_err(map_io_err)?.into_aggregation(&mapping);

        let digests = InputDigests {
            real_sha256: hasher::sha256_file(&r.real).map_err(map_io_err)?,
            simulated_sha256: hasher::sha256_file(&r.simulated).map_err(map_io_err)?,
            constants_sha256: hash_opt(args.constants.as_deref())?,
            mapping_sha256: hash_opt(r.mapping.as_deref())?,
            params_sha256: hasher::sha256_canonical(&params).map_err(map_io_err)?,
        };

        if !sim.unmapped.is_empty() {
            tracing::warn!(
                target: "fb.io",
                labels = sim.unmapped.len(),
                "simulated scenario has unmapped categories; they are excluded"
            );
        }
        tracing::info!(target: "fb.io", year = params.reference_year, "inputs loaded");

        Ok(Self { real, simulated: sim.counts, params, mapping, digests })
    }

    fn validate(&self) -> ValidationReport {
        fb_pipeline::validate(&self.real, &self.simulated, &self.params, &self.mapping)
    }

    fn require_valid(&self) -> Result<(), MainError> {
        let report = self.validate();
        for i in &report.issues {
            match i.severity {
                Severity::Error => tracing::error!(target: "fb.io", code = i.code, at = %i.where_, "{}", i.message),
                Severity::Warning => tracing::warn!(target: "fb.io", code = i.code, at = %i.where_, "{}", i.message),
            }
        }
        if report.pass {
            return Ok(());
        }
        let first = report
            .errors()
            .next()
            .map(|i| format!("{} at {}: {}", i.code, i.where_, i.message))
            .unwrap_or_default();
        Err(MainError::Validation(first))
    }
}

fn hash_opt(p: Option<&Path>) -> Result<Option<String>, MainError> {
    p.map(|p| hasher::sha256_file(p).map_err(map_io_err)).transpose()
}

// ---------------------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AggregateView {
    counts: ModalityCounts,
    total_enrollment: f64,
    weighted_enrollment: f64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    unmapped: BTreeMap<String, f64>,
}

fn run_aggregate(args: &Args, a: &AggregateArgs) -> Result<(), MainError> {
    let params = ConstantsRegistry::with_file(args.constants.as_deref())
        .and_then(|reg| reg.get(args.year))
        .map_err(map_io_err)?;
    let raw: BTreeMap<String, f64> = loader::read_json(&a.input).map_err(map_io_err)?;
    if let Some((label, v)) = raw.iter().find(|(_, v)| !v.is_finite() || **v < 0.0) {
        return Err(MainError::Validation(format!("category {label:?} has invalid count {v}")));
    }
    let mapping = match &a.mapping {
        Some(p) => loader::load_mapping(p).map_err(map_io_err)?,
        None => ModalityMapping::default(),
    };
    let agg = aggregate_with(&mapping, &raw);
    let view = AggregateView {
        total_enrollment: total_enrollment(&agg.counts),
        weighted_enrollment: weighted_enrollment(&agg.counts, &params.weights),
        counts: agg.counts,
        unmapped: agg.unmapped,
    };
    emit(&view, a.pretty)
}

// ---------------------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------------------

#[derive(Serialize)]
struct IssueView {
    severity: &'static str,
    code: &'static str,
    #[serde(rename = "where")]
    where_: String,
    message: String,
}

#[derive(Serialize)]
struct ReportView {
    pass: bool,
    issues: Vec<IssueView>,
}

impl From<&ValidationReport> for ReportView {
    fn from(r: &ValidationReport) -> Self {
        ReportView {
            pass: r.pass,
            issues: r
                .issues
                .iter()
                .map(|i| IssueView {
                    severity: i.severity.as_str(),
                    code: i.code,
                    where_: i.where_.to_string(),
                    message: i.message.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InputDigests {
    real_sha256: String,
    simulated_sha256: String,
    params_sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    constants_sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mapping_sha256: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EngineMeta {
    name: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunRecord<'a> {
    engine: EngineMeta,
    reference_year: u16,
    inputs: &'a InputDigests,
    result_id: String,
    timestamp_utc: String,
}

fn write_artifacts(dir: &Path, inputs: &Inputs, result: &fb_pipeline::SimulationResult) -> Result<(), MainError> {
    let result_id = hasher::result_digest(result).map_err(map_io_err)?;
    canonical_json::write_canonical_file(&dir.join("result.json"), result).map_err(map_io_err)?;

    let record = RunRecord {
        engine: EngineMeta { name: env!("CARGO_PKG_NAME"), version: env!("CARGO_PKG_VERSION") },
        reference_year: inputs.params.reference_year,
        inputs: &inputs.digests,
        result_id,
        timestamp_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    };
    canonical_json::write_canonical_file(&dir.join("run_record.json"), &record).map_err(map_io_err)?;
    tracing::info!(target: "fb.io", dir = %dir.display(), id = %record.result_id, "artifacts written");
    Ok(())
}

fn emit<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<(), MainError> {
    let text = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) }
        .map_err(|e| MainError::Io(format!("serialize: {e}")))?;
    let mut out = std::io::stdout().lock();
    writeln!(out, "{text}").map_err(|e| MainError::Io(format!("stdout: {e}")))
}
