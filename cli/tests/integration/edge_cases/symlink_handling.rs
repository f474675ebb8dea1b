//! Symlink handling integration tests for tcopy CLI.
//!
//! Symlinks are recreated with their stored target and never followed,
//! whether they are the top-level source or entries inside a tree.

#![cfg(unix)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::Path;
use tempfile::TempDir;

fn assert_link(path: &Path, expected_target: &Path) {
    let meta = fs::symlink_metadata(path).unwrap();
    assert!(
        meta.file_type().is_symlink(),
        "{} should be a symlink",
        path.display()
    );
    assert_eq!(fs::read_link(path).unwrap(), expected_target);
}

/// A top-level symlink is copied as a link, not as the file it points to.
#[test]
fn test_top_level_symlink_copied_as_link() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("target.txt"), "target").unwrap();
    symlink("target.txt", src.path().join("link")).unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(src.path().join("link"))
        .arg(dst.path().join("link"))
        .assert()
        .success()
        .stdout(predicate::str::contains("1 symlinks"));

    assert_link(&dst.path().join("link"), Path::new("target.txt"));
}

/// Relative targets are stored verbatim, even if they dangle at the new
/// location.
#[test]
fn test_relative_target_kept_verbatim() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::create_dir(src.path().join("tree")).unwrap();
    fs::write(src.path().join("outside.txt"), "outside").unwrap();
    symlink("../outside.txt", src.path().join("tree/up")).unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(src.path().join("tree"))
        .arg(dst.path().join("tree"))
        .assert()
        .success();

    assert_link(&dst.path().join("tree/up"), Path::new("../outside.txt"));
    assert!(!dst.path().join("tree/up").exists(), "copy should dangle");
}

/// Dangling links are copied without error.
#[test]
fn test_dangling_symlink() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    symlink("does-not-exist", src.path().join("broken")).unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(src.path().join("broken"))
        .arg(dst.path().join("broken"))
        .assert()
        .success();

    assert_link(&dst.path().join("broken"), Path::new("does-not-exist"));
}

/// A symlink to a directory inside a tree is not descended into.
#[test]
fn test_directory_symlink_not_followed() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    let elsewhere = TempDir::new().unwrap();

    fs::write(elsewhere.path().join("big.txt"), "should not be copied").unwrap();
    fs::create_dir(src.path().join("tree")).unwrap();
    symlink(elsewhere.path(), src.path().join("tree/external")).unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(src.path().join("tree"))
        .arg(dst.path().join("tree"))
        .assert()
        .success();

    assert_link(&dst.path().join("tree/external"), elsewhere.path());
    assert_eq!(fs::read_dir(dst.path().join("tree")).unwrap().count(), 1);
    assert_eq!(fs::read_dir(elsewhere.path()).unwrap().count(), 1);
}

/// An existing link is replaced with --overwrite and refused without it.
#[test]
fn test_replace_existing_symlink() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    symlink("new-target", src.path().join("link")).unwrap();
    symlink("old-target", dst.path().join("link")).unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(src.path().join("link"))
        .arg(dst.path().join("link"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[already_exists]"));
    assert_link(&dst.path().join("link"), Path::new("old-target"));

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg("-f")
        .arg(src.path().join("link"))
        .arg(dst.path().join("link"))
        .assert()
        .success();
    assert_link(&dst.path().join("link"), Path::new("new-target"));
}

/// A source reached through a symlinked parent is still caught copying into
/// itself.
#[test]
fn test_subdirectory_check_through_symlinked_parent() {
    let root = TempDir::new().unwrap();

    fs::create_dir(root.path().join("real")).unwrap();
    fs::write(root.path().join("real/a.txt"), "a").unwrap();
    symlink(root.path().join("real"), root.path().join("alias")).unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(root.path().join("real"))
        .arg(root.path().join("alias/inner"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error[subdirectory_of_source]"));

    assert!(!root.path().join("real/inner").exists());
}

/// A trailing separator names the directory behind the link, so copying it
/// into that directory is refused instead of recursing.
#[test]
fn test_trailing_separator_source_into_link_target() {
    let root = TempDir::new().unwrap();

    fs::create_dir(root.path().join("real")).unwrap();
    fs::write(root.path().join("real/f.txt"), "f").unwrap();
    symlink(root.path().join("real"), root.path().join("alias")).unwrap();

    for mode in ["blocking", "async"] {
        let mut cmd = cargo_bin_cmd!("tcopy");
        cmd.arg("--io")
            .arg(mode)
            .arg(root.path().join("alias/"))
            .arg(root.path().join("real/sub"))
            .assert()
            .code(2)
            .stderr(predicate::str::contains("error[subdirectory_of_source]"));
    }

    assert!(!root.path().join("real/sub").exists());
}

/// A destination spelled `link/` is the link target, which may be the
/// source itself.
#[test]
fn test_trailing_separator_destination_is_link_target() {
    let root = TempDir::new().unwrap();

    fs::create_dir(root.path().join("real")).unwrap();
    fs::write(root.path().join("real/f.txt"), "f").unwrap();
    symlink(root.path().join("real"), root.path().join("alias")).unwrap();

    for spelling in ["alias/", "alias/."] {
        let mut cmd = cargo_bin_cmd!("tcopy");
        cmd.arg("-f")
            .arg(root.path().join("real"))
            .arg(root.path().join(spelling))
            .assert()
            .code(2)
            .stderr(predicate::str::contains("error[same_path]"));
    }

    assert_eq!(fs::read_dir(root.path().join("real")).unwrap().count(), 1);
}

/// Symlinks are copied the same way in async IO mode.
#[test]
fn test_symlink_async_mode() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::create_dir(src.path().join("tree")).unwrap();
    fs::write(src.path().join("tree/a.txt"), "a").unwrap();
    symlink("a.txt", src.path().join("tree/link")).unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg("--io")
        .arg("async")
        .arg(src.path().join("tree"))
        .arg(dst.path().join("tree"))
        .assert()
        .success();

    assert_link(&dst.path().join("tree/link"), Path::new("a.txt"));
    assert_eq!(
        fs::read_to_string(dst.path().join("tree/link")).unwrap(),
        "a"
    );
}
