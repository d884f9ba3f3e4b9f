//! Command-line tests

mod common;

use common::{fmeda, run_ok, setup_test_project, setup_worked_example, snapshot_path, write_file};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

// ============================================================================
// Basic Commands
// ============================================================================

#[test]
fn test_help_lists_commands() {
    fmeda()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("eval"))
        .stdout(predicate::str::contains("catalog"));
}

#[test]
fn test_version() {
    fmeda()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fmeda"));
}

#[test]
fn test_completions_bash() {
    fmeda()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fmeda"));
}

// ============================================================================
// Project Setup
// ============================================================================

#[test]
fn test_init_creates_snapshot() {
    let tmp = TempDir::new().unwrap();

    fmeda()
        .current_dir(tmp.path())
        .args(["init", "Demo", "--lifetime", "100000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created project Demo"));

    let content = fs::read_to_string(snapshot_path(&tmp)).unwrap();
    assert!(content.starts_with("section,name,lifetime,id"));
    assert!(content.contains("project,Demo,100000"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let tmp = setup_test_project();

    fmeda()
        .current_dir(tmp.path())
        .args(["init", "Other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    fmeda()
        .current_dir(tmp.path())
        .args(["init", "Other", "--force"])
        .assert()
        .success();
}

#[test]
fn test_init_without_lifetime_prints_hint() {
    let tmp = TempDir::new().unwrap();

    fmeda()
        .current_dir(tmp.path())
        .args(["init", "Demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fmeda lifetime"));
}

#[test]
fn test_commands_require_a_project() {
    let tmp = TempDir::new().unwrap();

    fmeda()
        .current_dir(tmp.path())
        .args(["sf", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No project snapshot"));
}

#[test]
fn test_project_flag_selects_snapshot() {
    let tmp = TempDir::new().unwrap();

    fmeda()
        .current_dir(tmp.path())
        .args(["-p", "brakes.csv", "init", "Brakes"])
        .assert()
        .success();
    assert!(tmp.path().join("brakes.csv").exists());
    assert!(!snapshot_path(&tmp).exists());

    fmeda()
        .current_dir(tmp.path())
        .args(["-p", "brakes.csv", "summary", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Brakes\""));
}

#[test]
fn test_lifetime_show_and_set() {
    let tmp = setup_test_project();

    fmeda()
        .current_dir(tmp.path())
        .arg("lifetime")
        .assert()
        .success()
        .stdout(predicate::str::contains("100000"));

    fmeda()
        .current_dir(tmp.path())
        .args(["lifetime", "50000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated lifetime"));

    fmeda()
        .current_dir(tmp.path())
        .arg("lifetime")
        .assert()
        .success()
        .stdout(predicate::str::contains("50000"));
}

#[test]
fn test_lifetime_rejects_zero() {
    let tmp = setup_test_project();

    fmeda()
        .current_dir(tmp.path())
        .args(["lifetime", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("positive"));
}

// ============================================================================
// Safety Functions
// ============================================================================

#[test]
fn test_sf_add_and_list() {
    let tmp = setup_test_project();

    fmeda()
        .current_dir(tmp.path())
        .args(["sf", "add", "SF1", "-d", "Prevent unintended braking", "-t", "D"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created safety function SF1"));

    fmeda()
        .current_dir(tmp.path())
        .args(["sf", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SF1"))
        .stdout(predicate::str::contains("ASIL D"));
}

#[test]
fn test_sf_list_empty() {
    let tmp = setup_test_project();

    fmeda()
        .current_dir(tmp.path())
        .args(["sf", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No safety functions found"));
}

#[test]
fn test_sf_add_duplicate_fails() {
    let tmp = setup_test_project();
    run_ok(&tmp, &["sf", "add", "SF1"]);

    fmeda()
        .current_dir(tmp.path())
        .args(["sf", "add", "SF1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_sf_add_rejects_unknown_level() {
    let tmp = setup_test_project();

    fmeda()
        .current_dir(tmp.path())
        .args(["sf", "add", "SF1", "--target", "E"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown ASIL"));
}

#[test]
fn test_sf_edit_target() {
    let tmp = setup_test_project();
    run_ok(&tmp, &["sf", "add", "SF1", "-t", "B"]);
    run_ok(&tmp, &["sf", "edit", "SF1", "--target", "C", "-d", "Steering"]);

    fmeda()
        .current_dir(tmp.path())
        .args(["sf", "show", "SF1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ASIL C"))
        .stdout(predicate::str::contains("Steering"));

    run_ok(&tmp, &["sf", "edit", "SF1", "--clear-target"]);
    fmeda()
        .current_dir(tmp.path())
        .args(["sf", "list", "-o", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SF1,,0,0.00,0.00,Steering"));
}

#[test]
fn test_sf_remove_detaches_components() {
    let tmp = setup_worked_example();

    fmeda()
        .current_dir(tmp.path())
        .args(["sf", "remove", "SF1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 links"));

    fmeda()
        .current_dir(tmp.path())
        .args(["cmp", "list", "-o", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("C1,IC,1000.00,1,\n"));
}

#[test]
fn test_sf_import() {
    let tmp = setup_test_project();
    run_ok(&tmp, &["sf", "add", "SF1"]);
    let file = write_file(
        &tmp,
        "sfs.csv",
        "id,description,target_integrity_level\nSF1,Dup,B\nSF2,Steering,D\nSF3,Lighting,\n",
    );

    fmeda()
        .current_dir(tmp.path())
        .args(["sf", "import"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 safety functions"))
        .stdout(predicate::str::contains("skipped existing ids: SF1"));

    fmeda()
        .current_dir(tmp.path())
        .args(["sf", "list", "-o", "id"])
        .assert()
        .success()
        .stdout("SF1\nSF2\nSF3\n");
}

#[test]
fn test_sf_import_keeps_foreign_levels() {
    let tmp = setup_test_project();
    let file = write_file(
        &tmp,
        "sfs.csv",
        "id,description,target_integrity_level\nSF1,Pump,SIL 2\n",
    );
    run_ok(&tmp, &["sf", "import", file.to_str().unwrap()]);

    fmeda()
        .current_dir(tmp.path())
        .args(["sf", "list", "-o", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SF1,SIL 2,"));

    fmeda()
        .current_dir(tmp.path())
        .args(["eval", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not assessed"));
}

#[test]
fn test_sf_import_missing_columns() {
    let tmp = setup_test_project();
    let file = write_file(&tmp, "sfs.csv", "id,description\nSF1,Brakes\n");

    fmeda()
        .current_dir(tmp.path())
        .args(["sf", "import"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("target_integrity_level"));
}

// ============================================================================
// Components
// ============================================================================

#[test]
fn test_cmp_add_with_auto_populate() {
    let tmp = setup_test_project();

    fmeda()
        .current_dir(tmp.path())
        .args(["cmp", "add", "R1", "--type", "resistor", "--rate", "100", "--auto-populate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 failure modes from catalog"));

    fmeda()
        .current_dir(tmp.path())
        .args(["fm", "list", "R1", "-o", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "R1,1,Open circuit,10.00,Loss of function,None 0%,-,10.00,0.00,0.00",
        ));
}

#[test]
fn test_cmp_add_unknown_sf_fails() {
    let tmp = setup_test_project();

    fmeda()
        .current_dir(tmp.path())
        .args(["cmp", "add", "R1", "--rate", "10", "--sf", "SF9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SF9"));

    // Nothing was added
    fmeda()
        .current_dir(tmp.path())
        .args(["cmp", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No components found"));
}

#[test]
fn test_cmp_rejects_negative_rate() {
    let tmp = setup_test_project();

    fmeda()
        .current_dir(tmp.path())
        .args(["cmp", "add", "R1", "--rate=-5"])
        .assert()
        .failure();
}

#[test]
fn test_cmp_list_filters_by_sf() {
    let tmp = setup_worked_example();
    run_ok(&tmp, &["cmp", "add", "C2", "--rate", "5"]);

    fmeda()
        .current_dir(tmp.path())
        .args(["cmp", "list", "--sf", "SF1", "-o", "id"])
        .assert()
        .success()
        .stdout("C1\n");
}

#[test]
fn test_cmp_edit_reports_divergence() {
    let tmp = setup_worked_example();

    fmeda()
        .current_dir(tmp.path())
        .args(["cmp", "edit", "C1", "--rate", "1200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1000.00 FIT"));
}

#[test]
fn test_cmp_import_bom() {
    let tmp = setup_test_project();
    run_ok(&tmp, &["sf", "add", "SF1"]);
    run_ok(&tmp, &["sf", "add", "SF2"]);
    let file = write_file(
        &tmp,
        "bom.csv",
        "id,type,failure_rate,related_sf_ids\nR1,Resistor,10,\"SF1,SF2\"\nC1,Capacitor,2.5,SF9\n",
    );

    fmeda()
        .current_dir(tmp.path())
        .args(["cmp", "import"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 components"))
        .stdout(predicate::str::contains("(2 links)"));
}

#[test]
fn test_cmp_import_rejects_bad_rate() {
    let tmp = setup_test_project();
    let file = write_file(&tmp, "bom.csv", "id,type,failure_rate\nR1,Resistor,ten\n");

    fmeda()
        .current_dir(tmp.path())
        .args(["cmp", "import"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid failure rate"));
}

// ============================================================================
// Failure Modes and Links
// ============================================================================

#[test]
fn test_fm_duplicate_description_rejected() {
    let tmp = setup_worked_example();

    fmeda()
        .current_dir(tmp.path())
        .args(["fm", "add", "C1", "Stuck output", "--rate", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already has a failure mode"));
}

#[test]
fn test_fm_coverage_out_of_range_rejected() {
    let tmp = setup_worked_example();

    fmeda()
        .current_dir(tmp.path())
        .args(["fm", "add", "C1", "Drift", "--rate", "5", "--spf", "--spf-coverage", "120"])
        .assert()
        .failure();
}

#[test]
fn test_fm_edit_recomputes_rates() {
    let tmp = setup_worked_example();
    run_ok(&tmp, &["fm", "edit", "C1", "1", "--spf-coverage", "90"]);

    fmeda()
        .current_dir(tmp.path())
        .args(["fm", "list", "C1", "-o", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "C1,1,Stuck output,1000.00,,Watchdog 90%,Self test 70%,100.00,270.00,630.00",
        ));
}

#[test]
fn test_fm_edit_out_of_range_index() {
    let tmp = setup_worked_example();

    fmeda()
        .current_dir(tmp.path())
        .args(["fm", "edit", "C1", "3", "--rate", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no #3"));
}

#[test]
fn test_fm_remove() {
    let tmp = setup_worked_example();

    fmeda()
        .current_dir(tmp.path())
        .args(["fm", "remove", "C1", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed failure mode 'Stuck output'"));

    fmeda()
        .current_dir(tmp.path())
        .args(["fm", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No failure modes found"));
}

#[test]
fn test_link_and_unlink() {
    let tmp = setup_test_project();
    run_ok(&tmp, &["sf", "add", "SF1"]);
    run_ok(&tmp, &["cmp", "add", "R1", "--rate", "10"]);
    run_ok(&tmp, &["cmp", "add", "R2", "--rate", "20"]);

    fmeda()
        .current_dir(tmp.path())
        .args(["link", "SF1", "R1", "R2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Linked 2 components to SF1"));

    fmeda()
        .current_dir(tmp.path())
        .args(["link", "SF1", "R1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already linked"));

    fmeda()
        .current_dir(tmp.path())
        .args(["unlink", "SF1", "R2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unlinked 1 components"));

    fmeda()
        .current_dir(tmp.path())
        .args(["cmp", "list", "--sf", "SF1", "-o", "id"])
        .assert()
        .success()
        .stdout("R1\n");
}

#[test]
fn test_link_unknown_component_fails() {
    let tmp = setup_test_project();
    run_ok(&tmp, &["sf", "add", "SF1"]);

    fmeda()
        .current_dir(tmp.path())
        .args(["link", "SF1", "NOPE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Component 'NOPE' not found"));
}

// ============================================================================
// Evaluation and Reports
// ============================================================================

#[test]
fn test_eval_worked_example_csv() {
    let tmp = setup_worked_example();

    fmeda()
        .current_dir(tmp.path())
        .args(["eval", "-o", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "sf_id,target,safety_related,rf,mpfl,mpfd,mphf,spfm,lfm",
        ))
        .stdout(predicate::str::contains(
            "SF1,ASIL B,1000.00,500.00,150.00,350.00,5.05*10^-7,50.00,70.00",
        ));
}

#[test]
fn test_eval_table() {
    let tmp = setup_worked_example();

    fmeda()
        .current_dir(tmp.path())
        .arg("eval")
        .assert()
        .success()
        .stdout(predicate::str::contains("SPFM %"))
        .stdout(predicate::str::contains("50.00"))
        .stdout(predicate::str::contains("70.00"));
}

#[test]
fn test_eval_json() {
    let tmp = setup_worked_example();

    fmeda()
        .current_dir(tmp.path())
        .args(["eval", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sf_id\": \"SF1\""))
        .stdout(predicate::str::contains("\"rf_fit\": 500.0"));
}

#[test]
fn test_eval_check_fails_on_violation() {
    let tmp = setup_worked_example();

    fmeda()
        .current_dir(tmp.path())
        .args(["eval", "--check"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAIL"))
        .stderr(predicate::str::contains("miss their targets: SF1"));
}

#[test]
fn test_eval_check_passes_for_qm() {
    let tmp = setup_worked_example();
    run_ok(&tmp, &["sf", "edit", "SF1", "--target", "QM"]);

    fmeda()
        .current_dir(tmp.path())
        .args(["eval", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("meet their targets"));
}

#[test]
fn test_eval_unlinked_sf_is_zero() {
    let tmp = setup_worked_example();
    run_ok(&tmp, &["sf", "add", "SF2"]);

    fmeda()
        .current_dir(tmp.path())
        .args(["eval", "--sf", "SF2", "-o", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "SF2,,0.00,0.00,0.00,0.00,0.000000,0.00,0.00",
        ));
}

#[test]
fn test_summary() {
    let tmp = setup_worked_example();

    fmeda()
        .current_dir(tmp.path())
        .args(["summary", "-o", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name: Demo"))
        .stdout(predicate::str::contains("components: 1"))
        .stdout(predicate::str::contains("failure_modes: 1"));
}

#[test]
fn test_catalog() {
    fmeda()
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resistor"))
        .stdout(predicate::str::contains("Crystals"));

    fmeda()
        .args(["catalog", "capacitor", "-o", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("description,share,system_effect"))
        .stdout(predicate::str::contains("Open circuit,15"));

    fmeda()
        .args(["catalog", "Flux capacitor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown component type"));
}

#[test]
fn test_export_and_reload() {
    let tmp = setup_worked_example();

    fmeda()
        .current_dir(tmp.path())
        .args(["export", "copy.csv"])
        .assert()
        .success();

    fmeda()
        .current_dir(tmp.path())
        .args(["-p", "copy.csv", "eval", "-o", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SF1,ASIL B,1000.00,500.00"));

    fmeda()
        .current_dir(tmp.path())
        .args(["export", "copy.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

// ============================================================================
// Logging
// ============================================================================

#[test]
fn test_quiet_by_default() {
    let tmp = setup_worked_example();

    fmeda()
        .current_dir(tmp.path())
        .arg("eval")
        .assert()
        .success()
        .stderr(predicate::str::contains("evaluated safety function").not());
}

#[test]
fn test_rust_log_raises_verbosity() {
    let tmp = setup_worked_example();

    fmeda()
        .current_dir(tmp.path())
        .env("RUST_LOG", "debug")
        .arg("eval")
        .assert()
        .success()
        .stderr(predicate::str::contains("evaluated safety function"));
}

#[test]
fn test_verbose_flag_raises_verbosity() {
    let tmp = setup_worked_example();

    fmeda()
        .current_dir(tmp.path())
        .args(["eval", "-vv"])
        .assert()
        .success()
        .stderr(predicate::str::contains("evaluated safety function"));
}
