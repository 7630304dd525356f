//! CLI-level tests: exit codes, output shape, and the JSON contract.

use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");

        run_git(dir.path(), &["init", "-b", "main"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);

        std::fs::write(dir.path().join("README.md"), "# Test Repo\n").unwrap();
        run_git(dir.path(), &["add", "README.md"]);
        run_git(dir.path(), &["commit", "-m", "Initial commit"]);

        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn commit_file(&self, path: &str, content: &str, message: &str) {
        std::fs::write(self.dir.path().join(path), content).unwrap();
        run_git(self.path(), &["add", path]);
        run_git(self.path(), &["commit", "-m", message]);
    }

    fn create_branch(&self, name: &str) {
        run_git(self.path(), &["branch", name]);
    }
}

fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// A drift command isolated from the user's real configuration.
fn drift() -> Command {
    let mut cmd = Command::cargo_bin("drift").expect("binary builds");
    cmd.env("DRIFT_CONFIG", "/nonexistent/drift-config.toml");
    cmd.env_remove("XDG_CONFIG_HOME");
    cmd
}

#[test]
fn missing_target_exits_one_with_usage() {
    let repo = TestRepo::new();
    drift()
        .current_dir(repo.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Usage"))
        .stderr(predicate::str::contains("missing required"));
}

#[test]
fn help_exits_zero() {
    drift()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("EXAMPLES"));
}

#[test]
fn invalid_reference_exits_one() {
    let repo = TestRepo::new();
    drift()
        .current_dir(repo.path())
        .arg("bad;name")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid reference"));
}

#[test]
fn invalid_reference_rejected_even_outside_a_repository() {
    let dir = TempDir::new().unwrap();
    drift()
        .current_dir(dir.path())
        .arg("bad name")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid reference"));
}

#[test]
fn outside_a_repository_exits_one() {
    let dir = TempDir::new().unwrap();
    drift()
        .current_dir(dir.path())
        .arg("main")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not a git repository"));
}

#[test]
fn unknown_branch_exits_one() {
    let repo = TestRepo::new();
    drift()
        .current_dir(repo.path())
        .args(["no-such-branch", "--no-fetch"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn synchronized_branch_reports_success() {
    let repo = TestRepo::new();
    repo.create_branch("twin");
    drift()
        .current_dir(repo.path())
        .args(["twin", "--no-fetch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("synchronized"));
}

#[test]
fn quiet_mode_emits_a_single_verdict_line() {
    let repo = TestRepo::new();
    repo.create_branch("twin");
    let assert = drift()
        .current_dir(repo.path())
        .args(["twin", "--no-fetch", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("synchronized"));

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert_eq!(stdout.trim().lines().count(), 1);
}

#[test]
fn quiet_conflicts_with_verbose() {
    let repo = TestRepo::new();
    drift()
        .current_dir(repo.path())
        .args(["main", "--quiet", "--verbose"])
        .assert()
        .failure();
}

#[test]
fn cwd_flag_points_at_the_repository() {
    let repo = TestRepo::new();
    repo.create_branch("twin");
    drift()
        .args([
            "twin",
            "--no-fetch",
            "--cwd",
            repo.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("synchronized"));
}

#[test]
fn json_output_carries_the_report_contract() {
    let repo = TestRepo::new();
    repo.create_branch("base");
    repo.commit_file("a.txt", "a", "add a");

    let assert = drift()
        .current_dir(repo.path())
        .args(["base", "--no-fetch", "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");

    assert_eq!(json["current_branch"], "main");
    assert_eq!(json["target_branch"], "base");
    assert_eq!(json["resolved_target"], "base");
    assert_eq!(json["relationship"]["relationship"], "ahead");
    assert_eq!(json["relationship"]["confidence"], "high");
    assert_eq!(json["significance"]["is_significant"], true);
    assert_eq!(json["significance"]["ahead_meaningful"], 1);
    assert_eq!(json["basic_stats"]["ahead"], 1);
    assert!(json["merge_history"]["merges"].is_array());
    assert!(json["working_area"]["is_clean"].is_boolean());
    assert!(json["warnings"].is_array());
}

#[test]
fn json_output_contains_no_ansi_escapes() {
    let repo = TestRepo::new();
    repo.create_branch("twin");

    let assert = drift()
        .current_dir(repo.path())
        .args(["twin", "--no-fetch", "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(!stdout.contains('\u{1b}'), "JSON output must be plain");
}

#[test]
fn config_file_can_disable_auto_fetch() {
    // With auto_fetch = false in config, a remote-looking target that does
    // not resolve fails cleanly instead of attempting a refresh.
    let repo = TestRepo::new();
    let config_dir = TempDir::new().unwrap();
    let config_path = config_dir.path().join("config.toml");
    std::fs::write(&config_path, "auto_fetch = false\n").unwrap();

    drift()
        .current_dir(repo.path())
        .env("DRIFT_CONFIG", &config_path)
        .arg("origin/nope")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn malformed_config_exits_one_and_names_the_file() {
    let repo = TestRepo::new();
    let config_dir = TempDir::new().unwrap();
    let config_path = config_dir.path().join("config.toml");
    std::fs::write(&config_path, "auto_fetch = \"maybe\"\n").unwrap();

    drift()
        .current_dir(repo.path())
        .env("DRIFT_CONFIG", &config_path)
        .arg("main")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("config.toml"));
}
