//! CLI integration tests.
//!
//! These tests run the `car` binary against files in a temporary directory.

#![cfg(feature = "cli")]

mod common;

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn car(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_car"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run car")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Creates a temp dir holding the given files.
fn workspace(files: &[(&str, &[u8])]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for (name, data) in files {
        std::fs::write(dir.path().join(name), data).expect("Failed to write file");
    }
    dir
}

// =============================================================================
// Create
// =============================================================================

#[test]
fn test_no_arguments_prints_usage() {
    let dir = workspace(&[]);
    let output = car(dir.path(), &[]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("Usage"));
    assert!(!dir.path().join("output.car").exists());
}

#[test]
fn test_default_output_name() {
    let dir = workspace(&[("a.txt", b"alpha"), ("b.txt", b"beta")]);
    let output = car(dir.path(), &["a.txt", "b.txt"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let log = stderr(&output);
    assert!(log.contains("Writing to archive 'output.car'."));
    assert!(log.contains("Archiving 'a.txt'."));
    assert!(log.contains("Archiving 'b.txt'."));

    let bytes = std::fs::read(dir.path().join("output.car")).unwrap();
    common::verify_archive_contents(&bytes, &[("a.txt", b"alpha"), ("b.txt", b"beta")]);
}

#[test]
fn test_output_with_equals() {
    let dir = workspace(&[("data.bin", &[7u8; 100])]);
    let output = car(dir.path(), &["-o=custom.car", "data.bin"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let bytes = std::fs::read(dir.path().join("custom.car")).unwrap();
    let mut archive = common::open(&bytes);
    assert_eq!(archive.get_bytes("data.bin").unwrap(), vec![7u8; 100]);
}

#[test]
fn test_files_stored_under_base_name() {
    let dir = workspace(&[]);
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    std::fs::write(dir.path().join("nested").join("inner.txt"), b"inside").unwrap();

    let output = car(dir.path(), &["nested/inner.txt"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let bytes = std::fs::read(dir.path().join("output.car")).unwrap();
    let mut archive = common::open(&bytes);
    assert_eq!(archive.get_as_string("inner.txt").unwrap(), "inside");
}

#[test]
fn test_non_files_are_skipped() {
    let dir = workspace(&[("real.txt", b"real")]);
    std::fs::create_dir(dir.path().join("subdir")).unwrap();

    let output = car(dir.path(), &["subdir", "missing.txt", "real.txt"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let log = stderr(&output);
    assert!(log.contains("Skipping non-file 'subdir'."));
    assert!(log.contains("Skipping non-file 'missing.txt'."));

    let bytes = std::fs::read(dir.path().join("output.car")).unwrap();
    let mut archive = common::open(&bytes);
    assert_eq!(archive.file_count().unwrap(), 1);
}

#[test]
fn test_reject_duplicates_skips_second_copy() {
    let dir = workspace(&[("same.txt", b"top")]);
    std::fs::create_dir(dir.path().join("other")).unwrap();
    std::fs::write(dir.path().join("other").join("same.txt"), b"nested").unwrap();

    let output = car(
        dir.path(),
        &["--reject-duplicates", "same.txt", "other/same.txt"],
    );
    assert!(output.status.success(), "{}", stderr(&output));

    let bytes = std::fs::read(dir.path().join("output.car")).unwrap();
    let mut archive = common::open(&bytes);
    assert_eq!(archive.file_count().unwrap(), 1);
    assert_eq!(archive.get_as_string("same.txt").unwrap(), "top");
}

// =============================================================================
// List and extract
// =============================================================================

#[test]
fn test_list_json() {
    let dir = workspace(&[]);
    let bytes = common::create_archive(&[("x", b"1"), ("y", b"22")]).unwrap();
    std::fs::write(dir.path().join("in.car"), &bytes).unwrap();

    let output = car(dir.path(), &["--list", "in.car", "--format", "json"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let items = listed.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1]["name"], "y");
    assert_eq!(items[1]["size"], 2);
}

#[test]
fn test_list_bad_archive_exit_code() {
    let dir = workspace(&[("bad.car", b"CArv1")]);
    let output = car(dir.path(), &["-l", "bad.car"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_list_missing_archive_exit_code() {
    let dir = workspace(&[]);
    let output = car(dir.path(), &["-l", "nope.car"]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_extract_first_occurrence() {
    let dir = workspace(&[]);
    let bytes =
        common::create_archive(&[("a.txt", b"first"), ("b.txt", b"bee"), ("a.txt", b"second")])
            .unwrap();
    std::fs::write(dir.path().join("in.car"), &bytes).unwrap();

    let output = car(dir.path(), &["-x", "in.car", "-d", "out", "-q"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let out = dir.path().join("out");
    assert_eq!(std::fs::read(out.join("a.txt")).unwrap(), b"first");
    assert_eq!(std::fs::read(out.join("b.txt")).unwrap(), b"bee");
}

#[test]
fn test_extract_refuses_path_components() {
    let dir = workspace(&[]);
    let bytes = common::create_archive(&[("../escape.txt", b"no"), ("ok.txt", b"yes")]).unwrap();
    std::fs::write(dir.path().join("in.car"), &bytes).unwrap();

    let output = car(dir.path(), &["-x", "in.car", "-d", "out", "-f", "json"]);
    assert!(output.status.success(), "{}", stderr(&output));

    assert!(!dir.path().join("escape.txt").exists());
    assert!(dir.path().join("out").join("ok.txt").exists());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["entries_extracted"], 1);
    assert_eq!(summary["entries_skipped"], 1);
}

// =============================================================================
// Arguments
// =============================================================================

#[test]
fn test_unknown_flag_exit_code() {
    let dir = workspace(&[("a.txt", b"alpha")]);
    let output = car(dir.path(), &["--no-such-flag", "a.txt"]);
    assert_eq!(output.status.code(), Some(255));
    assert!(!dir.path().join("output.car").exists());
}

#[test]
fn test_conflicting_modes_exit_code() {
    let dir = workspace(&[("a.txt", b"alpha")]);
    let output = car(dir.path(), &["-l", "in.car", "-x", "in.car"]);
    assert_eq!(output.status.code(), Some(255));
}

#[test]
fn test_help_and_version_succeed() {
    let dir = workspace(&[]);
    let help = car(dir.path(), &["--help"]);
    assert!(help.status.success());
    assert!(String::from_utf8_lossy(&help.stdout).contains("Usage"));

    let version = car(dir.path(), &["--version"]);
    assert!(version.status.success());
}
