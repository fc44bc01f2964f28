//! Smoke tests for the singlish-e2e CLI
//!
//! Everything here runs without a browser; live runs are covered by the
//! library's runner tests with a canned transliterator.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the singlish-e2e binary
fn singlish_e2e() -> Command {
    let mut cmd = Command::cargo_bin("singlish-e2e").expect("singlish-e2e binary should exist");
    cmd.env_remove("SINGLISH_E2E_CONFIG").env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    singlish_e2e()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.2.0"));
}

#[test]
fn test_help_lists_subcommands() {
    singlish_e2e()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("normalize"))
        .stdout(predicate::str::contains("compare"));
}

#[test]
fn test_no_args_fails() {
    singlish_e2e().assert().failure();
}

// ============================================================================
// Normalize / Compare
// ============================================================================

#[test]
fn test_normalize_collapses_spacing_and_punctuation() {
    singlish_e2e()
        .args(["normalize", "සුබ  සතියක් ."])
        .assert()
        .success()
        .stdout("සුබ සතියක්\n");
}

#[test]
fn test_normalize_explain_lists_stages() {
    singlish_e2e()
        .args(["normalize", "6000 ක්", "--explain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("digit-suffix"))
        .stdout(predicate::str::contains("final-collapse"));
}

#[test]
fn test_normalize_with_extra_variants() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("variants.yaml");
    fs::write(
        &file,
        "variants:\n  - pattern: \"කොහොමද\"\n    replacement: \"කොහොම ද\"\n",
    )
    .unwrap();

    singlish_e2e()
        .args(["normalize", "ඔයාට කොහොමද?", "--variants"])
        .arg(&file)
        .assert()
        .success()
        .stdout("ඔයාට කොහොම ද\n");
}

#[test]
fn test_compare_match() {
    singlish_e2e()
        .args(["compare", "ඔයාගෙ  පොත .", "ඔයාගේ පොත"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MATCH"));
}

#[test]
fn test_compare_mismatch_fails() {
    singlish_e2e()
        .args(["compare", "පොත", "පාසල"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("MISMATCH"))
        .stderr(predicate::str::contains("canonical forms differ"));
}

// ============================================================================
// Cases / Variants / Config
// ============================================================================

#[test]
fn test_cases_lists_builtin_suite() {
    singlish_e2e()
        .arg("cases")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pos_Fun_0001"))
        .stdout(predicate::str::contains("35 samples"));
}

#[test]
fn test_cases_filtered_by_kind() {
    singlish_e2e()
        .args(["cases", "--kind", "ui"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pos_UI_0035"))
        .stdout(predicate::str::contains("Pos_Fun_0001").not());
}

#[test]
fn test_cases_from_yaml_suite() {
    let dir = TempDir::new().unwrap();
    let suite = dir.path().join("suite.yaml");
    fs::write(
        &suite,
        "samples:\n  - id: Pos_Fun_0901\n    input: mama\n    expected: මම\n",
    )
    .unwrap();

    singlish_e2e()
        .args(["cases", "--format", "json", "--suite"])
        .arg(&suite)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Pos_Fun_0901\""));
}

#[test]
fn test_variants_table() {
    singlish_e2e()
        .arg("variants")
        .assert()
        .success()
        .stdout(predicate::str::contains("පුලුවන්ද -> පුළුවන්ද"));
}

#[test]
fn test_config_prints_defaults() {
    singlish_e2e()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("swifttranslator"));
}

#[test]
fn test_config_rejects_bad_url() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("oracle.yaml");
    fs::write(&file, "base_url: ftp://example.com/\n").unwrap();

    singlish_e2e()
        .args(["config", "--config"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("base_url"));
}

// ============================================================================
// Run
// ============================================================================

#[test]
fn test_run_missing_suite_file() {
    singlish_e2e()
        .args(["run", "--suite", "/nonexistent/suite.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_run_empty_selection() {
    singlish_e2e()
        .args(["run", "--filter", "No_Such_Id"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no samples match"));
}

#[cfg(not(feature = "browser"))]
#[test]
fn test_run_without_browser_support() {
    singlish_e2e()
        .args(["-q", "run", "--kind", "ui"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--features browser"));
}
