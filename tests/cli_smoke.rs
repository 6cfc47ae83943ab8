//! Integration tests for the synclog binary.
//!
//! These tests exercise the full CLI against real Git repos, with the
//! user's configuration isolated to a temporary home.

use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for running synclog with an empty home.
fn synclog(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("synclog").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env_remove("SYNCLOG_CONFIG")
        .env_remove("NO_COLOR");
    cmd
}

fn run_git(dir: &Path, args: &[&str]) {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// A repository on `main` with no commits yet.
fn init_empty_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    run_git(dir.path(), &["init"]);
    run_git(dir.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);
    run_git(dir.path(), &["config", "user.email", "test@example.com"]);
    run_git(dir.path(), &["config", "user.name", "Test User"]);
    run_git(dir.path(), &["config", "commit.gpgsign", "false"]);
    dir
}

/// A repository with one commit on `main`.
fn init_repo() -> TempDir {
    let dir = init_empty_repo();
    std::fs::write(dir.path().join("README.md"), "# Test\n").unwrap();
    run_git(dir.path(), &["add", "README.md"]);
    run_git(dir.path(), &["commit", "-m", "Initial commit"]);
    dir
}

#[test]
fn version_flag_works() {
    let home = TempDir::new().unwrap();
    synclog(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("synclog"));
}

#[test]
fn help_flag_works() {
    let home = TempDir::new().unwrap();
    synclog(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--hide-merged"));
}

#[test]
fn outside_repository_fails() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    synclog(home.path())
        .arg("--cwd")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: Failed to open repository"));
}

#[test]
fn reports_history() {
    let home = TempDir::new().unwrap();
    let repo = init_repo();
    synclog(home.path())
        .arg("--no-color")
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("── NO UPSTREAM"))
        .stdout(predicate::str::contains("Test User | Initial commit (HEAD -> main)"));
}

#[test]
fn fresh_repository_reports_no_results() {
    let home = TempDir::new().unwrap();
    let repo = init_empty_repo();
    synclog(home.path())
        .arg("--no-color")
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("── NO UPSTREAM ── no results"));
}

#[test]
fn no_color_env_disables_escapes() {
    let home = TempDir::new().unwrap();
    let repo = init_repo();
    synclog(home.path())
        .env("NO_COLOR", "1")
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn zero_count_rejected() {
    let home = TempDir::new().unwrap();
    synclog(home.path()).args(["-n", "0"]).assert().failure();
}

#[test]
fn count_conflicts_with_all() {
    let home = TempDir::new().unwrap();
    synclog(home.path())
        .args(["-n", "3", "--all"])
        .assert()
        .failure();
}

#[test]
fn unknown_token_warns_and_continues() {
    let home = TempDir::new().unwrap();
    let repo = init_repo();
    synclog(home.path())
        .args(["--no-color", "nope"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: no such ref or file: nope"))
        .stdout(predicate::str::contains("Initial commit"));
}

#[test]
fn quiet_suppresses_warnings() {
    let home = TempDir::new().unwrap();
    let repo = init_repo();
    synclog(home.path())
        .args(["--no-color", "-q", "nope"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn repo_config_hides_header() {
    let home = TempDir::new().unwrap();
    let repo = init_repo();
    let config_dir = repo.path().join(".git/synclog");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "hide_merged = true\ncolor = false\n").unwrap();

    synclog(home.path())
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("NO UPSTREAM").not())
        .stdout(predicate::str::contains("Initial commit"));
}

#[test]
fn invalid_config_is_an_error() {
    let home = TempDir::new().unwrap();
    let repo = init_repo();
    let config_dir = repo.path().join(".git/synclog");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "count = 0\n").unwrap();

    synclog(home.path())
        .current_dir(repo.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
