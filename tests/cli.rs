//! Command-line surface tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cloudtree(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cloudtree").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_filter_flags() {
    let home = TempDir::new().unwrap();
    cloudtree(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--exclude-exts"))
        .stdout(predicate::str::contains("--exclude-words"))
        .stdout(predicate::str::contains("--no-external"));
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    cloudtree(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("cloudtree "));
}

#[test]
fn test_disabling_both_artifacts_is_rejected() {
    let home = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    cloudtree(&home)
        .arg(root.path())
        .args(["--no-tree", "--no-index"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_remember_and_forget_conflict() {
    let home = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    cloudtree(&home)
        .arg(root.path())
        .args(["--remember", "--forget"])
        .assert()
        .failure();
}

#[test]
fn test_quiet_run_prints_summary_only() {
    let home = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    std::fs::write(root.path().join("a.txt"), "x").unwrap();

    cloudtree(&home)
        .arg(root.path())
        .arg("--out")
        .arg(out.path())
        .args(["--no-external", "--color", "never", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Done."))
        .stdout(predicate::str::contains("Files indexed: 1"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_verbose_run_logs_stages() {
    let home = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    cloudtree(&home)
        .arg(root.path())
        .arg("--out")
        .arg(out.path())
        .args(["--no-external", "-v"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Starting scan..."))
        .stderr(predicate::str::contains("Writing TSV..."));
}
