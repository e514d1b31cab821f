//! End-to-end tests for the `te` binary

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

/// `te` isolated from the user's config, data and logs
fn te(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("te").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    te(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("edit"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("Logs are written to"));
}

#[test]
fn test_show_file_prints_days_with_dates() {
    let home = TempDir::new().unwrap();
    te(&home)
        .args(["show", "--file"])
        .arg(fixture("lisbon.json"))
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Lisbon"))
        .stdout(predicate::str::contains("Day 1: Alfama"))
        .stdout(predicate::str::contains("Fado dinner"))
        .stdout(predicate::str::contains("Day 2: Belem"))
        .stdout(predicate::str::contains("Fri May 2, 2025"))
        .stdout(predicate::str::contains("stale copy").not());
}

#[test]
fn test_show_requires_target() {
    let home = TempDir::new().unwrap();
    te(&home).arg("show").assert().failure();
}

#[test]
fn test_list_and_delete_with_file_store() {
    let home = TempDir::new().unwrap();
    let store_dir = home.path().join("trips");
    std::fs::create_dir_all(&store_dir).unwrap();
    std::fs::copy(fixture("lisbon.json"), store_dir.join("0190c4a1-lisbon.json")).unwrap();
    let config = home.path().join("tripedit.yml");
    std::fs::write(
        &config,
        format!("store:\n  backend: file\n  dir: {}\nuser-id: traveller-1\n", store_dir.display()),
    )
    .unwrap();

    te(&home)
        .arg("--config")
        .arg(&config)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("0190c4a1-lisbon"))
        .stdout(predicate::str::contains("Lisbon"));

    te(&home)
        .arg("--config")
        .arg(&config)
        .args(["show", "0190c4a1-lisbon"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alfama"));

    te(&home)
        .arg("--config")
        .arg(&config)
        .args(["delete", "0190c4a1-lisbon"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[y/N]"))
        .stdout(predicate::str::contains("Cancelled"));
    assert!(store_dir.join("0190c4a1-lisbon.json").exists());

    te(&home)
        .arg("--config")
        .arg(&config)
        .args(["delete", "0190c4a1-lisbon"])
        .write_stdin("y\n")
        .assert()
        .success();
    assert!(!store_dir.join("0190c4a1-lisbon.json").exists());

    te(&home)
        .arg("--config")
        .arg(&config)
        .args(["delete", "0190c4a1-lisbon", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
