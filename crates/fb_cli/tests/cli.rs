//! Black-box tests for the `fundeb` binary: exit codes, stdout JSON, artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

const REAL: &str = r#"{
  "municipality": "reference",
  "contributionRevenue": 17734911.24,
  "totalEnrollment": 2101,
  "enrollmentByRawCategory": {
    "Creche": 300,
    "Pré-escola": 250,
    "Ensino Fundamental - Anos Iniciais": 800,
    "Ensino Fundamental - Anos Finais": 600,
    "EJA": 100,
    "Educação Especial": 40,
    "Escola Indígena": 11
  },
  "realVAATTopUp": 2627864.62
}"#;

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let p = dir.join(name);
    fs::write(&p, body).unwrap();
    p
}

fn fundeb() -> Command {
    let mut cmd = Command::cargo_bin("fundeb").unwrap();
    cmd.env_remove("FUNDEB_YEAR").env_remove("FUNDEB_CONSTANTS").env_remove("FUNDEB_LOG");
    cmd
}

fn stdout_json(out: &std::process::Output) -> Value {
    serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn empty_scenario_prints_the_baseline() {
    let dir = tempfile::tempdir().unwrap();
    let real = write(dir.path(), "real.json", REAL);
    let sim = write(dir.path(), "sim.json", "{}");

    let out = fundeb().arg("simulate").arg("--real").arg(&real).arg("--simulated").arg(&sim).output().unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let v = stdout_json(&out);
    assert_eq!(v["estado"], "BASELINE_ONLY");
    assert_eq!(v["totalRepassesReal"].as_f64(), Some(20_362_775.86));
    assert_eq!(v["totalRepassesSimulado"].as_f64(), Some(20_362_775.86));
    assert_eq!(v["matriculasIdenticas"], true);
}

#[test]
fn raw_label_scenario_is_aggregated_before_simulation() {
    let dir = tempfile::tempdir().unwrap();
    let real = write(dir.path(), "real.json", REAL);
    let sim = write(
        dir.path(),
        "sim.json",
        r#"{"enrollmentByRawCategory": {
            "Creche": 330, "Pré-escola": 275, "Anos Iniciais": 880, "Anos Finais": 660,
            "EJA": 110, "Educação Especial": 44, "Escola Indígena": 12.1
        }}"#,
    );

    let out = fundeb().arg("simulate").arg("--real").arg(&real).arg("--simulated").arg(&sim).output().unwrap();
    assert!(out.status.success());
    let v = stdout_json(&out);
    assert_eq!(v["estado"], "COMPARISON");
    assert_eq!(v["matriculasIdenticas"], false);
    assert!(v["totalRepassesSimulado"].as_f64().unwrap() > v["totalRepassesReal"].as_f64().unwrap());
}

#[test]
fn unknown_reference_year_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let real = write(dir.path(), "real.json", REAL);
    let sim = write(dir.path(), "sim.json", "{}");

    fundeb()
        .args(["--year", "2031", "simulate"])
        .arg("--real")
        .arg(&real)
        .arg("--simulated")
        .arg(&sim)
        .assert()
        .code(5)
        .stderr(predicate::str::contains("2031"));
}

#[test]
fn missing_input_file_is_rejected_before_running() {
    let dir = tempfile::tempdir().unwrap();
    let sim = write(dir.path(), "sim.json", "{}");

    fundeb()
        .arg("simulate")
        .arg("--real")
        .arg(dir.path().join("absent.json"))
        .arg("--simulated")
        .arg(&sim)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn remote_paths_are_rejected() {
    fundeb()
        .args(["aggregate", "--input", "https://example.org/raw.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no scheme"));
}

#[test]
fn negative_revenue_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let real = write(dir.path(), "real.json", r#"{"contributionRevenue": -5.0, "totalEnrollment": 10}"#);
    let sim = write(dir.path(), "sim.json", r#"{"nursery": 10}"#);

    fundeb()
        .arg("simulate")
        .arg("--real")
        .arg(&real)
        .arg("--simulated")
        .arg(&sim)
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());

    let out = fundeb().arg("validate").arg("--real").arg(&real).arg("--simulated").arg(&sim).output().unwrap();
    assert_eq!(out.status.code(), Some(2));
    let v = stdout_json(&out);
    assert_eq!(v["pass"], false);
    let issues = v["issues"].as_array().unwrap();
    assert!(issues.iter().any(|i| i["severity"] == "error" && i["where"] == "real.contributionRevenue"));
}

#[test]
fn validate_passes_clean_inputs_with_warnings_only() {
    let dir = tempfile::tempdir().unwrap();
    let real = write(dir.path(), "real.json", r#"{"contributionRevenue": 1000.0, "totalEnrollment": 10}"#);
    let sim = write(dir.path(), "sim.json", r#"{"nursery": 10}"#);

    let out = fundeb().arg("validate").arg("--real").arg(&real).arg("--simulated").arg(&sim).output().unwrap();
    assert!(out.status.success());
    let v = stdout_json(&out);
    assert_eq!(v["pass"], true);
    assert!(v["issues"].as_array().unwrap().iter().all(|i| i["severity"] == "warning"));
}

#[test]
fn aggregate_reports_counts_and_unmapped_labels() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "raw.json", r#"{"Creche": 10, "Ensino Médio": 4, "Oficina": 3}"#);

    let out = fundeb().arg("aggregate").arg("--input").arg(&input).output().unwrap();
    assert!(out.status.success());
    let v = stdout_json(&out);
    assert_eq!(v["counts"]["nursery"].as_f64(), Some(10.0));
    assert_eq!(v["counts"]["secondary"].as_f64(), Some(4.0));
    assert_eq!(v["totalEnrollment"].as_f64(), Some(14.0));
    assert_eq!(v["unmapped"]["Oficina"].as_f64(), Some(3.0));
}

#[test]
fn years_lists_builtin_bundles() {
    let out = fundeb().arg("years").output().unwrap();
    assert!(out.status.success());
    let v = stdout_json(&out);
    let years: Vec<u64> = v.as_array().unwrap().iter().map(|b| b["referenceYear"].as_u64().unwrap()).collect();
    assert_eq!(years, vec![2024, 2025]);
}

#[test]
fn constants_file_adds_a_year() {
    let dir = tempfile::tempdir().unwrap();
    let constants = write(dir.path(), "constants.json", r#"[{"referenceYear": 2026, "vaafMin": 5900.0, "vaatMin": 7100.0}]"#);

    let out = fundeb().arg("--constants").arg(&constants).arg("years").output().unwrap();
    assert!(out.status.success());
    let v = stdout_json(&out);
    assert_eq!(v.as_array().unwrap().len(), 3);
}

#[test]
fn invalid_constants_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let constants = write(dir.path(), "constants.json", r#"[{"referenceYear": 2026, "vaafMin": -1.0, "vaatMin": 7100.0}]"#);

    fundeb().arg("--constants").arg(&constants).arg("years").assert().code(5);
}

#[test]
fn out_dir_receives_result_and_run_record() {
    let dir = tempfile::tempdir().unwrap();
    let real = write(dir.path(), "real.json", REAL);
    let sim = write(dir.path(), "sim.json", r#"{"nursery": 330, "preSchool": 275, "earlyGrades": 880}"#);
    let out_dir = dir.path().join("out");
    fs::create_dir(&out_dir).unwrap();

    fundeb()
        .arg("simulate")
        .arg("--real")
        .arg(&real)
        .arg("--simulated")
        .arg(&sim)
        .arg("--out")
        .arg(&out_dir)
        .assert()
        .success();

    let result: Value = serde_json::from_slice(&fs::read(out_dir.join("result.json")).unwrap()).unwrap();
    assert_eq!(result["estado"], "COMPARISON");

    let record: Value = serde_json::from_slice(&fs::read(out_dir.join("run_record.json")).unwrap()).unwrap();
    assert!(record["resultId"].as_str().unwrap().starts_with("SIM:"));
    assert_eq!(record["referenceYear"].as_u64(), Some(2024));
    assert_eq!(record["engine"]["name"], "fb_cli");
    assert_eq!(record["inputs"]["realSha256"].as_str().unwrap().len(), 64);
    assert!(record["inputs"].get("mappingSha256").is_none());
}

#[test]
fn results_are_deterministic_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let real = write(dir.path(), "real.json", REAL);
    let sim = write(dir.path(), "sim.json", r#"{"nursery": 400, "secondary": 120}"#);

    let run = || fundeb().arg("simulate").arg("--real").arg(&real).arg("--simulated").arg(&sim).output().unwrap().stdout;
    assert_eq!(run(), run());
}
