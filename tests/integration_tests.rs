//! Integration tests for the PFT CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get a pft command
fn pft() -> Command {
    let mut cmd = Command::cargo_bin("pft").unwrap();
    cmd.env("PFT_AUTHOR", "tester");
    cmd
}

/// Helper to create a test project in a temp directory
fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    pft().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Helper to create a shelf, cabinet, and folder to file records into
fn setup_storage(tmp: &TempDir) {
    pft()
        .current_dir(tmp.path())
        .args(["shelf", "new", "--name", "North Wing", "--code", "S1"])
        .assert()
        .success();
    pft()
        .current_dir(tmp.path())
        .args(["cabinet", "new", "--shelf", "S1", "--name", "Cabinet 3", "--code", "C3"])
        .assert()
        .success();
    pft()
        .current_dir(tmp.path())
        .args(["folder", "new", "--cabinet", "C3", "--name", "2024 Files", "--code", "F12"])
        .assert()
        .success();
    pft()
        .current_dir(tmp.path())
        .args(["division", "new", "--name", "General Services", "--abbreviation", "GSD"])
        .assert()
        .success();
}

/// Helper to file a record on a given date; PR numbers come out sequential
fn file_record(tmp: &TempDir, description: &str, date: &str) {
    pft()
        .current_dir(tmp.path())
        .args([
            "record",
            "new",
            "--folder",
            "F12",
            "--division",
            "GSD",
            "--description",
            description,
            "--date",
            date,
        ])
        .assert()
        .success();
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    pft()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("procurement records"));
}

#[test]
fn test_version_displays() {
    pft()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pft"));
}

#[test]
fn test_unknown_command_fails() {
    pft()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_project_structure() {
    let tmp = TempDir::new().unwrap();

    pft()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(tmp.path().join(".pft").is_dir());
    assert!(tmp.path().join(".pft/config.yaml").is_file());
    assert!(tmp.path().join("storage/shelves").is_dir());
    assert!(tmp.path().join("storage/cabinets").is_dir());
    assert!(tmp.path().join("storage/folders").is_dir());
    assert!(tmp.path().join("storage/boxes").is_dir());
    assert!(tmp.path().join("divisions").is_dir());
    assert!(tmp.path().join("records").is_dir());
}

#[test]
fn test_init_twice_reports_existing() {
    let tmp = setup_test_project();

    pft()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_commands_fail_outside_project() {
    let tmp = TempDir::new().unwrap();

    pft()
        .current_dir(tmp.path())
        .args(["shelf", "list"])
        .assert()
        .failure();
}

// ============================================================================
// Storage Hierarchy Tests
// ============================================================================

#[test]
fn test_shelf_create_list_show() {
    let tmp = setup_test_project();

    pft()
        .current_dir(tmp.path())
        .args(["shelf", "new", "--name", "North Wing", "--code", "S1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created shelf"));

    pft()
        .current_dir(tmp.path())
        .args(["shelf", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("S1"))
        .stdout(predicate::str::contains("North Wing"));

    pft()
        .current_dir(tmp.path())
        .args(["shelf", "show", "S1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name: North Wing"));
}

#[test]
fn test_cabinet_requires_existing_shelf() {
    let tmp = setup_test_project();

    pft()
        .current_dir(tmp.path())
        .args(["cabinet", "new", "--shelf", "S9", "--name", "Orphan", "--code", "C1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No shelf found"));
}

#[test]
fn test_folder_requires_exactly_one_parent() {
    let tmp = setup_test_project();
    setup_storage(&tmp);

    pft()
        .current_dir(tmp.path())
        .args(["folder", "new", "--name", "Orphan", "--code", "F1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exactly one parent"));
}

#[test]
fn test_folder_in_box() {
    let tmp = setup_test_project();

    pft()
        .current_dir(tmp.path())
        .args(["box", "new", "--name", "Overflow", "--code", "B7"])
        .assert()
        .success();
    pft()
        .current_dir(tmp.path())
        .args(["folder", "new", "--box", "B7", "--name", "Old Files", "--code", "F1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("under B7"));

    pft()
        .current_dir(tmp.path())
        .args(["folder", "list", "--box", "B7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("F1"));
}

// ============================================================================
// Deletion Guard Tests
// ============================================================================

#[test]
fn test_delete_refused_for_nonempty_shelf() {
    let tmp = setup_test_project();
    setup_storage(&tmp);

    pft()
        .current_dir(tmp.path())
        .args(["shelf", "delete", "S1", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot delete shelf"))
        .stderr(predicate::str::contains("cabinet(s)"));
}

#[test]
fn test_delete_refused_for_nonempty_folder() {
    let tmp = setup_test_project();
    setup_storage(&tmp);
    file_record(&tmp, "Office chairs", "2024-01-10");

    pft()
        .current_dir(tmp.path())
        .args(["folder", "delete", "F12", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot delete folder"))
        .stderr(predicate::str::contains("file(s)"));
}

#[test]
fn test_delete_empty_shelf_succeeds() {
    let tmp = setup_test_project();

    pft()
        .current_dir(tmp.path())
        .args(["shelf", "new", "--name", "Spare", "--code", "S9"])
        .assert()
        .success();
    pft()
        .current_dir(tmp.path())
        .args(["shelf", "delete", "S9", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted shelf"));
}

#[test]
fn test_division_delete_refused_while_referenced() {
    let tmp = setup_test_project();
    setup_storage(&tmp);
    file_record(&tmp, "Office chairs", "2024-01-10");

    pft()
        .current_dir(tmp.path())
        .args(["division", "delete", "GSD", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("still reference it"));
}

// ============================================================================
// Record Lifecycle Tests
// ============================================================================

#[test]
fn test_record_new_constructs_pr_number() {
    let tmp = setup_test_project();
    setup_storage(&tmp);

    pft()
        .current_dir(tmp.path())
        .args([
            "record", "new", "--folder", "F12", "--division", "GSD",
            "--description", "Office chairs", "--date", "2024-01-15",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("GSD-JAN-24-001"));

    // Sequence continues within the same division and year
    pft()
        .current_dir(tmp.path())
        .args([
            "record", "new", "--folder", "F12", "--division", "GSD",
            "--description", "Projectors", "--date", "2024-03-02",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("GSD-MAR-24-002"));
}

#[test]
fn test_record_new_requires_valid_fields() {
    let tmp = setup_test_project();
    setup_storage(&tmp);

    pft()
        .current_dir(tmp.path())
        .args([
            "record", "new", "--folder", "F12", "--division", "GSD",
            "--description", "Overpriced", "--date", "2024-01-15",
            "--abc", "1000", "--bid", "2000",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds"));
}

#[test]
fn test_record_show_and_disposal_date() {
    let tmp = setup_test_project();
    setup_storage(&tmp);
    file_record(&tmp, "Office chairs", "2024-01-15");

    pft()
        .current_dir(tmp.path())
        .args(["record", "show", "GSD-JAN-24-001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Office chairs"))
        .stdout(predicate::str::contains("S1-C3-F12"))
        // retention runs 5 years from date_added
        .stdout(predicate::str::contains("2029-01-15"));
}

#[test]
fn test_record_list_filters() {
    let tmp = setup_test_project();
    setup_storage(&tmp);
    file_record(&tmp, "Office chairs", "2024-01-10");
    file_record(&tmp, "Projectors", "2024-02-11");

    pft()
        .current_dir(tmp.path())
        .args(["record", "list", "--search", "chairs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GSD-JAN-24-001"))
        .stdout(predicate::str::contains("Office chairs").and(predicate::str::contains("Projectors").not()));

    pft()
        .current_dir(tmp.path())
        .args(["record", "list", "--status", "borrowed", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0"));
}

#[test]
fn test_record_delete_renumbers_survivors() {
    let tmp = setup_test_project();
    setup_storage(&tmp);
    file_record(&tmp, "First", "2024-01-10");
    file_record(&tmp, "Second", "2024-01-11");
    file_record(&tmp, "Third", "2024-01-12");

    pft()
        .current_dir(tmp.path())
        .args(["record", "delete", "GSD-JAN-24-001", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted record"));

    // Survivors close the gap: 2 and 3 become 1 and 2
    pft()
        .current_dir(tmp.path())
        .args(["record", "show", "GSD-JAN-24-002", "-f", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stack_number: 1"));
    pft()
        .current_dir(tmp.path())
        .args(["record", "show", "GSD-JAN-24-003", "-f", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stack_number: 2"));
}

// ============================================================================
// Borrow / Return Tests
// ============================================================================

#[test]
fn test_borrow_clears_stack_number_and_renumbers() {
    let tmp = setup_test_project();
    setup_storage(&tmp);
    file_record(&tmp, "First", "2024-01-10");
    file_record(&tmp, "Second", "2024-01-11");
    file_record(&tmp, "Third", "2024-01-12");

    pft()
        .current_dir(tmp.path())
        .args(["record", "borrow", "GSD-JAN-24-001", "--by", "J. Cruz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked out"));

    // Borrowed record loses its stack number
    pft()
        .current_dir(tmp.path())
        .args(["record", "show", "GSD-JAN-24-001", "-f", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("status: active"))
        .stdout(predicate::str::contains("borrowed_by: J. Cruz"))
        .stdout(predicate::str::contains("stack_number").not());

    // The rest close ranks
    pft()
        .current_dir(tmp.path())
        .args(["record", "show", "GSD-JAN-24-002", "-f", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stack_number: 1"));

    pft()
        .current_dir(tmp.path())
        .args(["record", "borrow", "GSD-JAN-24-001", "--by", "Someone Else"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already checked out"));
}

#[test]
fn test_return_restores_stack_number() {
    let tmp = setup_test_project();
    setup_storage(&tmp);
    file_record(&tmp, "First", "2024-01-10");
    file_record(&tmp, "Second", "2024-01-11");

    pft()
        .current_dir(tmp.path())
        .args(["record", "borrow", "GSD-JAN-24-001", "--by", "J. Cruz"])
        .assert()
        .success();
    pft()
        .current_dir(tmp.path())
        .args(["record", "return", "GSD-JAN-24-001", "--date", "2024-02-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked in"));

    // Back in the stack by date order: oldest first
    pft()
        .current_dir(tmp.path())
        .args(["record", "show", "GSD-JAN-24-001", "-f", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("status: archived"))
        .stdout(predicate::str::contains("stack_number: 1"))
        .stdout(predicate::str::contains("return_date: \"2024-02-01\""))
        .stdout(predicate::str::contains("borrowed_by").not());
}

#[test]
fn test_return_of_archived_record_fails() {
    let tmp = setup_test_project();
    setup_storage(&tmp);
    file_record(&tmp, "First", "2024-01-10");

    pft()
        .current_dir(tmp.path())
        .args(["record", "return", "GSD-JAN-24-001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not checked out"));
}

#[test]
fn test_move_renumbers_both_folders() {
    let tmp = setup_test_project();
    setup_storage(&tmp);
    pft()
        .current_dir(tmp.path())
        .args(["folder", "new", "--cabinet", "C3", "--name", "Overflow", "--code", "F13"])
        .assert()
        .success();
    file_record(&tmp, "First", "2024-01-10");
    file_record(&tmp, "Second", "2024-01-11");

    pft()
        .current_dir(tmp.path())
        .args(["record", "move", "GSD-JAN-24-001", "--folder", "F13"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved"));

    // Mover is first (and only) in the destination stack
    pft()
        .current_dir(tmp.path())
        .args(["record", "show", "GSD-JAN-24-001", "-f", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stack_number: 1"));
    pft()
        .current_dir(tmp.path())
        .args(["record", "show", "GSD-JAN-24-001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("S1-C3-F13"));

    // Survivor in the source folder renumbers to 1
    pft()
        .current_dir(tmp.path())
        .args(["record", "show", "GSD-JAN-24-002", "-f", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stack_number: 1"));
}

// ============================================================================
// Status / Export / Validate Tests
// ============================================================================

#[test]
fn test_status_dashboard() {
    let tmp = setup_test_project();
    setup_storage(&tmp);
    file_record(&tmp, "Office chairs", "2024-01-10");

    pft()
        .current_dir(tmp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Project Status"))
        .stdout(predicate::str::contains("RECORDS"));

    pft()
        .current_dir(tmp.path())
        .args(["status", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\": 1"));
}

#[test]
fn test_export_csv() {
    let tmp = setup_test_project();
    setup_storage(&tmp);
    file_record(&tmp, "Office chairs", "2024-01-10");

    pft()
        .current_dir(tmp.path())
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::contains("pr_number,description"))
        .stdout(predicate::str::contains("GSD-JAN-24-001"))
        .stdout(predicate::str::contains("S1-C3-F12"));
}

#[test]
fn test_validate_clean_project_passes() {
    let tmp = setup_test_project();
    setup_storage(&tmp);
    file_record(&tmp, "Office chairs", "2024-01-10");

    pft()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed"));
}

#[test]
fn test_validate_detects_and_fixes_stack_drift() {
    let tmp = setup_test_project();
    setup_storage(&tmp);
    file_record(&tmp, "Office chairs", "2024-01-10");

    // Corrupt the stack number behind the CLI's back
    let records_dir = tmp.path().join("records");
    let doc = fs::read_dir(&records_dir)
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    let content = fs::read_to_string(&doc).unwrap();
    fs::write(&doc, content.replace("stack_number: 1", "stack_number: 9")).unwrap();

    pft()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("out of stack order"));

    pft()
        .current_dir(tmp.path())
        .args(["validate", "--fix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reconciled"));

    pft()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed"));
}

#[test]
fn test_validate_reports_malformed_documents() {
    let tmp = setup_test_project();
    setup_storage(&tmp);

    fs::write(
        tmp.path().join("records/REC-BROKEN.pft.yaml"),
        "pr_number: [unclosed",
    )
    .unwrap();

    pft()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("fail to parse"));
}

#[test]
fn test_completions_generate() {
    pft()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pft"));
}
