// crates/fb_cli/src/args.rs
//
// Offline CLI argument surface.
// - Global: --year (FUNDEB_YEAR), --constants (FUNDEB_CONSTANTS), --log-level
// - No networked paths (reject any scheme:// like http/https/file)
// - stdout carries JSON only; logs go to stderr

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "fundeb",
    version,
    disable_help_subcommand = true,
    about = "Offline FUNDEB complementation simulator (VAAF / VAAT / VAAR)"
)]
pub struct Args {
    /// Reference year selecting the constants bundle.
    #[arg(long, global = true, env = "FUNDEB_YEAR", default_value_t = 2024)]
    pub year: u16,

    /// JSON file with per-year constants bundles (overrides built-ins).
    #[arg(long, global = true, env = "FUNDEB_CONSTANTS")]
    pub constants: Option<PathBuf>,

    /// Log filter used when FUNDEB_LOG is unset (e.g. "warn", "fb.simulate=debug").
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Compare a simulated enrollment scenario against the authoritative baseline.
    Simulate(RunArgs),
    /// Recompute VAAF/VAAT from formula for both scenarios (diagnostic).
    Estimate(RunArgs),
    /// Validate inputs only; do not run the engine.
    Validate(RunArgs),
    /// Collapse raw category labels into the 8 canonical modalities.
    Aggregate(AggregateArgs),
    /// List the available reference-year constants bundles.
    Years,
}

#[derive(Debug, ClapArgs, Clone)]
pub struct RunArgs {
    /// Baseline data (RealMunicipalData JSON).
    #[arg(long)]
    pub real: PathBuf,
    /// Simulated scenario: modality counts, or {"enrollmentByRawCategory": {...}}.
    #[arg(long)]
    pub simulated: PathBuf,
    /// Custom raw-label → modality mapping table.
    #[arg(long)]
    pub mapping: Option<PathBuf>,
    /// Also write result.json and run_record.json into this directory.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Pretty-print stdout JSON.
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, ClapArgs, Clone)]
pub struct AggregateArgs {
    /// JSON object of raw category label → count.
    #[arg(long)]
    pub input: PathBuf,
    /// Custom raw-label → modality mapping table.
    #[arg(long)]
    pub mapping: Option<PathBuf>,
    /// Pretty-print stdout JSON.
    #[arg(long)]
    pub pretty: bool,
}

/// Errors surfaced by argument validation. Messages are short and stable.
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            CliError::NotFound(p) => write!(f, "file not found: {p}"),
        }
    }
}
impl std::error::Error for CliError {}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

fn ensure_input_file(p: &Path) -> Result<(), CliError> {
    ensure_local_path(p)?;
    if !p.is_file() {
        return Err(CliError::NotFound(p.display().to_string()));
    }
    Ok(())
}

impl Args {
    /// Input files that must exist, plus the output dir (scheme check only).
    pub fn check_paths(&self) -> Result<(), CliError> {
        if let Some(c) = &self.constants {
            ensure_input_file(c)?;
        }
        match &self.command {
            Command::Simulate(r) | Command::Estimate(r) | Command::Validate(r) => {
                ensure_input_file(&r.real)?;
                ensure_input_file(&r.simulated)?;
                if let Some(m) = &r.mapping {
                    ensure_input_file(m)?;
                }
                if let Some(o) = &r.out {
                    ensure_local_path(o)?;
                }
            }
            Command::Aggregate(a) => {
                ensure_input_file(&a.input)?;
                if let Some(m) = &a.mapping {
                    ensure_input_file(m)?;
                }
            }
            Command::Years => {}
        }
        Ok(())
    }
}

/// Parse from the process args and run path checks.
pub fn parse_and_validate() -> Result<Args, CliError> {
    let args = Args::parse();
    args.check_paths()?;
    Ok(args)
}
