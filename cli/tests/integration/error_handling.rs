//! Error handling integration tests for tcopy CLI.
//!
//! These tests verify proper error handling behaviors:
//! - Self-copy and copy-into-own-subtree are rejected before any write
//! - Existing destinations are refused unless --overwrite is given
//! - Source validation
//! - Exit codes and structured error output

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_same_path_rejected() {
    let src = TempDir::new().unwrap();
    fs::write(src.path().join("a.txt"), "content").unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(src.path().join("a.txt"))
        .arg(src.path().join("a.txt"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error[same_path]"))
        .stderr(predicate::str::contains(
            "Source and destination cannot be the same.",
        ));

    assert_eq!(
        fs::read_to_string(src.path().join("a.txt")).unwrap(),
        "content"
    );
}

#[test]
fn test_same_path_through_dot_segments() {
    let src = TempDir::new().unwrap();
    fs::create_dir(src.path().join("d")).unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(src.path().join("d"))
        .arg(src.path().join("d/../d/."))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error[same_path]"));
}

#[test]
fn test_copy_into_own_subdirectory_rejected() {
    let src = TempDir::new().unwrap();
    fs::create_dir(src.path().join("tree")).unwrap();
    fs::write(src.path().join("tree/a.txt"), "a").unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(src.path().join("tree"))
        .arg(src.path().join("tree/nested/copy"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error[subdirectory_of_source]"))
        .stderr(predicate::str::contains("to a subdirectory of itself"));

    // Nothing was written into the source tree
    assert!(!src.path().join("tree/nested").exists());
}

#[test]
fn test_sibling_with_common_prefix_allowed() {
    let src = TempDir::new().unwrap();
    fs::create_dir(src.path().join("data")).unwrap();
    fs::write(src.path().join("data/a.txt"), "a").unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(src.path().join("data"))
        .arg(src.path().join("data-backup"))
        .assert()
        .success();

    assert!(src.path().join("data-backup/a.txt").exists());
}

#[test]
fn test_missing_source() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(src.path().join("missing"))
        .arg(dst.path().join("out"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[source_not_found]"))
        .stderr(predicate::str::contains("Source path does not exist"));

    assert!(!dst.path().join("out").exists());
}

#[test]
fn test_existing_file_without_overwrite() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("a.txt"), "new").unwrap();
    fs::write(dst.path().join("a.txt"), "old").unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(src.path().join("a.txt"))
        .arg(dst.path().join("a.txt"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[already_exists]"))
        .stderr(predicate::str::contains("already exists."));

    assert_eq!(
        fs::read_to_string(dst.path().join("a.txt")).unwrap(),
        "old",
        "Existing file must not be modified"
    );
}

#[test]
fn test_existing_directory_without_overwrite() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("a.txt"), "a").unwrap();
    fs::create_dir(dst.path().join("out")).unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(src.path())
        .arg(dst.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[already_exists]"));

    assert!(!dst.path().join("out/a.txt").exists());
}

#[test]
fn test_missing_parent_for_file_fails() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("a.txt"), "a").unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(src.path().join("a.txt"))
        .arg(dst.path().join("no/such/dir/a.txt"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error["));

    assert!(!dst.path().join("no").exists());
}

#[test]
fn test_json_output_on_failure() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("a.txt"), "a").unwrap();
    fs::write(dst.path().join("a.txt"), "b").unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    let output = cmd
        .arg("--output")
        .arg("json")
        .arg(src.path().join("a.txt"))
        .arg(dst.path().join("a.txt"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["outcome"], "failed");
    assert_eq!(value["error_code"], "already_exists");
    assert!(
        value["error_message"]
            .as_str()
            .unwrap()
            .ends_with("already exists.")
    );
}

#[test]
fn test_json_output_invalid_input_exit_code() {
    let src = TempDir::new().unwrap();
    fs::create_dir(src.path().join("d")).unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    let output = cmd
        .arg("--output")
        .arg("json")
        .arg(src.path().join("d"))
        .arg(src.path().join("d/inner"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["error_code"], "subdirectory_of_source");
}

#[cfg(unix)]
#[test]
fn test_unreadable_source_reports_permission_denied() {
    use std::os::unix::fs::PermissionsExt;

    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    let file = src.path().join("secret.txt");
    fs::write(&file, "secret").unwrap();
    fs::set_permissions(&file, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits
    if fs::read(&file).is_ok() {
        return;
    }

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(&file)
        .arg(dst.path().join("secret.txt"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[permission_denied]"));

    fs::set_permissions(&file, fs::Permissions::from_mode(0o644)).unwrap();
    assert!(!dst.path().join("secret.txt").exists());
}

#[test]
fn test_missing_arguments() {
    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg("only-one").assert().failure();
}
