//! Shared test helpers for integration tests
//!
//! This module provides common utilities used across all test files.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get an fmeda command isolated from the user's config and env
pub fn fmeda() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("fmeda"));
    cmd.env_remove("FMEDA_PROJECT")
        .env_remove("FMEDA_LIFETIME")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", std::env::temp_dir().join("fmeda-tests-no-config"));
    cmd
}

/// Helper to create a test project in a temp directory
pub fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fmeda()
        .current_dir(tmp.path())
        .args(["init", "Demo", "--lifetime", "100000"])
        .assert()
        .success();
    tmp
}

/// Path of the default snapshot inside a test project
pub fn snapshot_path(tmp: &TempDir) -> PathBuf {
    tmp.path().join("fmeda-project.csv")
}

/// Run an fmeda command in the project and require success
pub fn run_ok(tmp: &TempDir, args: &[&str]) {
    fmeda().current_dir(tmp.path()).args(args).assert().success();
}

/// Build the reference project: one ASIL B safety function, one component
/// with a single SPF+MPF failure mode (1000 FIT, 50% / 70% coverage)
pub fn setup_worked_example() -> TempDir {
    let tmp = setup_test_project();
    run_ok(&tmp, &["sf", "add", "SF1", "-d", "Prevent unintended braking", "--target", "B"]);
    run_ok(&tmp, &["cmp", "add", "C1", "--type", "IC", "--rate", "1000", "--sf", "SF1"]);
    run_ok(
        &tmp,
        &[
            "fm",
            "add",
            "C1",
            "Stuck output",
            "--rate",
            "1000",
            "--spf",
            "--spf-mechanism",
            "Watchdog",
            "--spf-coverage",
            "50",
            "--mpf",
            "--mpf-mechanism",
            "Self test",
            "--mpf-coverage",
            "70",
        ],
    );
    tmp
}

/// Write a file into the test project and return its path
pub fn write_file(tmp: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = tmp.path().join(name);
    fs::write(&path, content).unwrap();
    path
}
