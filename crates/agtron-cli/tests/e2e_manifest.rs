//! E2E tests for `agt check`, `agt path`, `agt recommend` and `agt graph`
//! against manifests in a temporary project directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

const VALID_MANIFEST: &str = "\
- service: web_frontend
  availability: 99.0
  depends_on:
    - api_gateway
- service: api_gateway
  availability: 99.5
  depends_on:
    - user_service
    - order_service
    - service: metrics
      type: soft
- service: user_service
  availability: 99.9
  depends_on:
    - postgres
- service: order_service
  availability: 99.9
  depends_on:
    - postgres
- service: postgres
  availability: 99.95
";

const CYCLIC_MANIFEST: &str = "\
- service: a
  depends_on: [b]
- service: b
  depends_on: [c]
- service: c
  depends_on: [a]
";

const INCONSISTENT_MANIFEST: &str = "\
- service: A
  availability: 99.9
  depends_on: [B]
- service: B
  availability: 99.9
  depends_on: [C]
- service: C
  availability: unknown
  depends_on: [D]
- service: D
  availability: 99.0
";

fn agt_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("agt"));
    cmd.current_dir(dir);
    cmd.env("AGTRON_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir.join(".config"));
    cmd.env_remove("FORMAT");
    cmd
}

fn project(manifest: &str) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("agtron.yml"), manifest).expect("write manifest");
    dir
}

fn json_stdout(dir: &Path, args: &[&str]) -> Value {
    let output = agt_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("command should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_valid_manifest() {
    let dir = project(VALID_MANIFEST);
    let json = json_stdout(dir.path(), &["check"]);

    assert_eq!(json["components"], 5);
    assert_eq!(json["constraints"], 6);
    assert_eq!(json["external"], serde_json::json!(["metrics"]));
    assert_eq!(json["valid"], true);
    assert_eq!(json["acyclic"], true);
    assert!(json.get("error").is_none());
}

#[test]
fn check_text_output() {
    let dir = project(VALID_MANIFEST);
    agt_cmd(dir.path())
        .args(["check", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("components\t5"))
        .stdout(predicate::str::contains("valid\ttrue"));
}

#[test]
fn check_reports_cycle_and_fails() {
    let dir = project(CYCLIC_MANIFEST);
    let output = agt_cmd(dir.path())
        .args(["check", "--json"])
        .output()
        .expect("command should not crash");
    assert!(!output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["valid"], false);
    assert_eq!(json["acyclic"], false);
    assert_eq!(json["error"]["error_code"], "E2001");
    assert!(
        json["error"]["message"]
            .as_str()
            .expect("message")
            .starts_with("Cyclic dependency detected")
    );
}

#[test]
fn check_reports_availability_violation_through_unknown() {
    let dir = project(INCONSISTENT_MANIFEST);
    agt_cmd(dir.path())
        .args(["check", "--format", "pretty"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[E2002]"))
        .stdout(predicate::str::contains(
            "Invalid availability constraint: A (99.9) depends on D (99.0)",
        ))
        .stdout(predicate::str::contains("suggestion:"));
}

#[test]
fn check_missing_manifest_is_unreadable() {
    let dir = TempDir::new().expect("tempdir");
    agt_cmd(dir.path())
        .args(["check", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E3002]"));
}

#[test]
fn check_invalid_availability_value() {
    let dir = project("- service: a\n  availability: high\n");
    agt_cmd(dir.path())
        .args(["check", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1001"));
}

#[test]
fn check_top_level_mapping_is_invalid_input() {
    let dir = project("service: a\n");
    agt_cmd(dir.path())
        .args(["check", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1004]"));
}

#[test]
fn empty_manifest_is_a_valid_empty_system() {
    let dir = project("");
    let json = json_stdout(dir.path(), &["check"]);
    assert_eq!(json["components"], 0);
    assert_eq!(json["valid"], true);
}

// ---------------------------------------------------------------------------
// Config and flags
// ---------------------------------------------------------------------------

#[test]
fn manifest_flag_overrides_default_path() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("other.yml"), VALID_MANIFEST).expect("write manifest");
    let json = json_stdout(dir.path(), &["--manifest", "other.yml", "check"]);
    assert_eq!(json["components"], 5);
}

#[test]
fn project_config_sets_manifest_path() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::create_dir_all(dir.path().join(".agtron")).expect("create .agtron");
    std::fs::create_dir_all(dir.path().join("deploy")).expect("create deploy");
    std::fs::write(
        dir.path().join(".agtron/config.toml"),
        "[manifest]\npath = \"deploy/services.yml\"\n",
    )
    .expect("write config");
    std::fs::write(dir.path().join("deploy/services.yml"), VALID_MANIFEST)
        .expect("write manifest");

    let json = json_stdout(dir.path(), &["check"]);
    assert_eq!(json["valid"], true);
}

#[test]
fn broken_project_config_fails_with_config_code() {
    let dir = project(VALID_MANIFEST);
    std::fs::create_dir_all(dir.path().join(".agtron")).expect("create .agtron");
    std::fs::write(dir.path().join(".agtron/config.toml"), "[manifest\n").expect("write config");

    agt_cmd(dir.path())
        .args(["check", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E3001]"));
}

#[test]
fn format_env_selects_json() {
    let dir = project(VALID_MANIFEST);
    let output = agt_cmd(dir.path())
        .env("FORMAT", "json")
        .args(["check"])
        .output()
        .expect("command should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["valid"], true);
}

// ---------------------------------------------------------------------------
// path
// ---------------------------------------------------------------------------

#[test]
fn path_lists_converging_paths() {
    let dir = project(VALID_MANIFEST);
    let json = json_stdout(dir.path(), &["path", "web_frontend", "postgres"]);

    assert_eq!(json["direct"], false);
    assert_eq!(json["indirect"], true);
    assert_eq!(json["path_count"], 2);
    assert_eq!(
        json["paths"],
        serde_json::json!([
            ["web_frontend", "api_gateway", "user_service", "postgres"],
            ["web_frontend", "api_gateway", "order_service", "postgres"]
        ])
    );
}

#[test]
fn path_single_result_is_bare() {
    let dir = project(VALID_MANIFEST);
    let json = json_stdout(dir.path(), &["path", "api_gateway", "metrics"]);
    assert_eq!(json["direct"], true);
    assert_eq!(json["paths"], serde_json::json!(["api_gateway", "metrics"]));
}

#[test]
fn path_to_self_is_empty() {
    let dir = project(VALID_MANIFEST);
    let json = json_stdout(dir.path(), &["path", "postgres", "postgres"]);
    assert_eq!(json["indirect"], false);
    assert_eq!(json["paths"], serde_json::json!([]));
}

#[test]
fn path_text_output() {
    let dir = project(VALID_MANIFEST);
    agt_cmd(dir.path())
        .args(["path", "user_service", "postgres", "--format", "text"])
        .assert()
        .success()
        .stdout("user_service -> postgres\n");
}

// ---------------------------------------------------------------------------
// recommend
// ---------------------------------------------------------------------------

#[test]
fn recommend_named_service() {
    let dir = project(VALID_MANIFEST);
    let json = json_stdout(dir.path(), &["recommend", "api_gateway"]);

    let recs = json["recommendations"].as_array().expect("array");
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0]["service"], "api_gateway");
    assert_eq!(recs[0]["current"], 99.5);
    assert_eq!(recs[0]["min"], 99.0);
    assert_eq!(recs[0]["max"], 99.9);
    assert_eq!(recs[0]["satisfiable"], true);
}

#[test]
fn recommend_defaults_to_every_component() {
    let dir = project(VALID_MANIFEST);
    let json = json_stdout(dir.path(), &["recommend"]);

    let services: Vec<&str> = json["recommendations"]
        .as_array()
        .expect("array")
        .iter()
        .map(|rec| rec["service"].as_str().expect("service"))
        .collect();
    assert_eq!(
        services,
        [
            "web_frontend",
            "api_gateway",
            "user_service",
            "order_service",
            "postgres"
        ]
    );
}

#[test]
fn recommend_unknown_service_gets_default_range() {
    let dir = project(VALID_MANIFEST);
    let json = json_stdout(dir.path(), &["recommend", "ghost"]);
    let rec = &json["recommendations"][0];
    assert_eq!(rec["min"], 0.0);
    assert_eq!(rec["max"], 100.0);
    assert!(rec.get("current").is_none());
}

#[test]
fn recommend_flags_unsatisfiable_range_in_inconsistent_manifest() {
    let dir = project(INCONSISTENT_MANIFEST);
    let json = json_stdout(dir.path(), &["recommend", "C"]);
    let rec = &json["recommendations"][0];
    assert_eq!(rec["min"], 99.9);
    assert_eq!(rec["max"], 99.0);
    assert_eq!(rec["satisfiable"], false);

    agt_cmd(dir.path())
        .args(["recommend", "C", "--format", "text"])
        .assert()
        .success()
        .stdout("C\tunknown\t99.9\t99  UNSATISFIABLE\n");
}

#[test]
fn unsatisfiable_marker_can_be_disabled() {
    let dir = project(INCONSISTENT_MANIFEST);
    std::fs::create_dir_all(dir.path().join(".agtron")).expect("create .agtron");
    std::fs::write(
        dir.path().join(".agtron/config.toml"),
        "[recommend]\nwarn_unsatisfiable = false\n",
    )
    .expect("write config");

    agt_cmd(dir.path())
        .args(["recommend", "C", "--format", "text"])
        .assert()
        .success()
        .stdout("C\tunknown\t99.9\t99\n");
}

#[test]
fn recommend_on_invalid_manifest_fails() {
    let dir = project(CYCLIC_MANIFEST);
    agt_cmd(dir.path())
        .args(["recommend", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2001"));
}

// ---------------------------------------------------------------------------
// graph
// ---------------------------------------------------------------------------

#[test]
fn graph_order_puts_dependencies_first() {
    let dir = project(VALID_MANIFEST);
    let json = json_stdout(dir.path(), &["graph"]);

    assert_eq!(json["nodes"], 6);
    assert_eq!(json["entry_points"], serde_json::json!(["web_frontend"]));

    let order: Vec<&str> = json["order"]
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v.as_str().expect("name"))
        .collect();
    let pos = |name: &str| order.iter().position(|n| *n == name).expect("present");
    assert!(pos("postgres") < pos("user_service"));
    assert!(pos("postgres") < pos("order_service"));
    assert!(pos("metrics") < pos("api_gateway"));
    assert!(pos("api_gateway") < pos("web_frontend"));
}

#[test]
fn graph_dot_output() {
    let dir = project(VALID_MANIFEST);
    agt_cmd(dir.path())
        .args(["graph", "--dot", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph"))
        .stdout(predicate::str::contains("label = \"soft\""));
}
