//! End-to-end flow against the built-in sample report: no network involved,
//! history persisted to a throwaway store file.

use std::path::Path;
use std::process::{Command, Output};

fn claimcheck(store: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_claimcheck"));
    cmd.arg("--store").arg(store);
    cmd.args(args);
    cmd.output().expect("spawn claimcheck")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn sample_run_flows_through_history_claims_and_evidence() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let store = dir.path().join("cc_runs.json");

    let out = claimcheck(&store, &["sample"]);
    assert!(out.status.success(), "sample failed: {out:?}");
    let text = stdout(&out);
    assert!(text.contains("Support call"), "missing summary: {text}");
    assert!(text.contains("Action items:"), "missing action items: {text}");

    let out = claimcheck(&store, &["history"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("sample"), "missing sample run: {text}");
    assert!(text.starts_with("* "), "current run not marked: {text}");

    let out = claimcheck(&store, &["claims", "--filter", "refuted"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("Refuted"), "missing refuted row: {text}");
    assert!(!text.contains("Supported"), "filter leaked rows: {text}");

    let out = claimcheck(&store, &["evidence", "c2"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("status-page"), "missing cited evidence: {text}");
    assert!(text.contains("Rationale:"), "missing rationale: {text}");

    // The run id printed by history is selectable afterwards.
    let history = stdout(&claimcheck(&store, &["history"]));
    let id = history
        .split_whitespace()
        .nth(1)
        .expect("run id in history output")
        .to_string();
    let out = claimcheck(&store, &["select", &id]);
    assert!(out.status.success());
    assert!(stdout(&out).contains(&id));
}

#[test]
fn invalid_submissions_fail_without_touching_history() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let store = dir.path().join("cc_runs.json");

    let out = claimcheck(&store, &["transcript", "--text", "   "]);
    assert!(!out.status.success(), "empty transcript must be rejected");
    assert!(!store.exists(), "no history should be written");

    let out = claimcheck(&store, &["audio", "/no/such/recording.wav"]);
    assert!(!out.status.success(), "missing audio file must be rejected");
    assert!(!store.exists(), "no history should be written");
}

#[test]
fn json_mode_emits_the_full_run_record() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let store = dir.path().join("cc_runs.json");

    let out = claimcheck(&store, &["--json", "sample"]);
    assert!(out.status.success());
    let record: serde_json::Value =
        serde_json::from_str(&stdout(&out)).expect("run record is valid json");
    assert_eq!(record["inputKind"], "sample");
    assert!(record["report"]["claims"].as_array().is_some());
}

#[test]
fn no_save_leaves_the_store_untouched() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let store = dir.path().join("cc_runs.json");

    let out = claimcheck(&store, &["--no-save", "sample"]);
    assert!(out.status.success());
    assert!(!store.exists());
}
