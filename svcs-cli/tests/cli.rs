use std::path::Path;

use assert_cmd::Command;
use fs_err as fs;
use predicates::prelude::*;
use tempfile::TempDir;

fn svcs(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("svcs").unwrap();
    cmd.env_remove("SVCS_ROOT")
        .env_remove("RUST_LOG")
        .arg("--root")
        .arg(root);
    cmd
}

fn write_source(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("sources").join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn init_prints_confirmation() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("store");

    svcs(&root)
        .args(["init", "proj"])
        .assert()
        .success()
        .stdout("Repository 'proj' initialized.\n");

    assert!(root.join("proj").join("files").is_dir());
    assert!(root.join("proj").join("commits").is_dir());
}

#[test]
fn init_twice_fails_on_stderr() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("store");
    svcs(&root).args(["init", "proj"]).assert().success();

    svcs(&root)
        .args(["init", "proj"])
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Repository 'proj' already exists."));
}

#[test]
fn missing_repository_fails() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("store");

    for args in [
        vec!["status", "ghost"],
        vec!["log", "ghost"],
        vec!["commit", "ghost", "-m", "m"],
    ] {
        svcs(&root)
            .args(&args)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Repository 'ghost' does not exist."));
    }
}

#[test]
fn add_commit_log_status_flow() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("store");
    let notes = write_source(&temp, "notes.txt", "hello");

    svcs(&root).args(["init", "proj"]).assert().success();
    svcs(&root)
        .args(["add", "proj"])
        .arg(&notes)
        .assert()
        .success()
        .stdout(predicate::str::contains("added to repository 'proj'."));
    svcs(&root)
        .args(["commit", "proj", "-m", "first"])
        .assert()
        .success()
        .stdout(
            predicate::str::is_match("^Commit '[0-9a-f]{64}' created with message: 'first'.\n$")
                .unwrap(),
        );

    svcs(&root)
        .args(["status", "proj"])
        .assert()
        .success()
        .stdout("Files in repository 'proj':\n - notes.txt\n");

    svcs(&root)
        .args(["log", "proj"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Message: first"))
        .stdout(predicate::str::contains("Timestamp: "))
        .stdout(predicate::str::contains("-".repeat(40)));
}

#[test]
fn log_json_keeps_creation_order() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("store");
    svcs(&root).args(["init", "proj"]).assert().success();
    for message in ["one", "two", "three"] {
        svcs(&root)
            .args(["commit", "proj", "-m", message])
            .assert()
            .success();
    }

    let output = svcs(&root)
        .args(["--json", "log", "proj"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let messages: Vec<&str> = value["commits"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["message"].as_str().unwrap())
        .collect();
    assert_eq!(messages, vec!["one", "two", "three"]);

    let limited = svcs(&root)
        .args(["--json", "log", "proj", "--limit", "1"])
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&limited.stdout).unwrap();
    assert_eq!(value["commits"].as_array().unwrap().len(), 1);
    assert_eq!(value["commits"][0]["message"], "three");
}

#[test]
fn show_by_prefix_lists_snapshot_files() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("store");
    let a = write_source(&temp, "a.txt", "a");

    svcs(&root).args(["init", "proj"]).assert().success();
    svcs(&root).args(["add", "proj"]).arg(&a).assert().success();
    let output = svcs(&root)
        .args(["--json", "commit", "proj", "-m", "snap"])
        .output()
        .unwrap();
    let info: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = info["id"].as_str().unwrap().to_string();

    svcs(&root)
        .args(["show", "proj", &id[..8]])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Commit ID: {}", id)))
        .stdout(predicate::str::contains("Files:\n - a.txt\n"));

    svcs(&root)
        .args(["--json", "show", "proj", "0000"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("\"error_type\":\"commit_not_found\""));
}

#[test]
fn repos_lists_repositories() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("store");

    svcs(&root)
        .arg("repos")
        .assert()
        .success()
        .stdout(predicate::str::contains("No repositories"));

    svcs(&root).args(["init", "beta"]).assert().success();
    svcs(&root).args(["init", "alpha"]).assert().success();

    svcs(&root)
        .arg("repos")
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha").and(predicate::str::contains("beta")));
}

#[test]
fn quiet_suppresses_confirmation() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("store");

    svcs(&root)
        .args(["--quiet", "init", "proj"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn menu_runs_without_subcommand() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("store");

    svcs(&root)
        .write_stdin("1\nproj\n7\n6\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Initialize Repository"))
        .stdout(predicate::str::contains("Repository 'proj' initialized."))
        .stdout(predicate::str::contains("Invalid option. Please try again."))
        .stdout(predicate::str::contains("Exiting SVCS. Goodbye!"));

    assert!(root.join("proj").is_dir());
}

#[test]
fn completions_are_generated() {
    let temp = TempDir::new().unwrap();

    svcs(&temp.path().join("store"))
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("svcs"));
}

#[test]
fn version_names_package_version() {
    Command::cargo_bin("svcs")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "svcs {}",
            env!("CARGO_PKG_VERSION")
        )));
}
