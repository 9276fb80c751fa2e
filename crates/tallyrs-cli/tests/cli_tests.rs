//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("tallyrs.toml"), "currency_symbol = \"$\"\n").unwrap();
        Self { dir }
    }

    fn save_file(&self) -> PathBuf {
        self.dir.path().join("saves.data")
    }

    fn cmd(&self, password: &str) -> Command {
        let mut cmd = Command::cargo_bin("tallyrs").unwrap();
        cmd.current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .env("TALLYRS_PASSWORD", password)
            .arg("--config")
            .arg(self.dir.path().join("tallyrs.toml"))
            .arg("--save-file")
            .arg(self.save_file());
        cmd
    }
}

/// Test basic command help
#[test]
fn test_help_output() {
    let mut cmd = Command::cargo_bin("tallyrs").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("transaction"))
        .stdout(predicate::str::contains("record"))
        .stdout(predicate::str::contains("reset"));
}

#[test]
fn test_show_without_save_file() {
    let env = Env::new();
    env.cmd("pw")
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("tallyrs init"));
}

#[test]
fn test_full_session() {
    let env = Env::new();

    env.cmd("pw")
        .args(["init", "--initial", "100.50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Money: $100.50"));
    assert!(env.save_file().exists());

    env.cmd("pw")
        .args(["transaction", "25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Money: $125.50"))
        .stdout(predicate::str::contains("Last Transaction: 25"));

    env.cmd("pw")
        .args(["transaction", "200", "--expense"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Money: $-74.50"))
        .stdout(predicate::str::contains("Last Transaction: -200"));

    env.cmd("pw")
        .args(["record", "Alice", "30", "--borrowed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Money: $-44.50"))
        .stdout(predicate::str::contains("[YOU OWE] Alice: $30"));

    env.cmd("pw")
        .args(["record", "Bob", "5", "--lent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[OWES YOU] Bob: $5"));

    env.cmd("pw")
        .args(["note", "pay Bob back"])
        .assert()
        .success();

    env.cmd("pw")
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Money: $-49.50"))
        .stdout(predicate::str::contains("Short Note: pay Bob back"));
}

#[test]
fn test_wrong_password() {
    let env = Env::new();
    env.cmd("right").arg("init").assert().success();

    env.cmd("wrong")
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("incorrect password"));
}

#[test]
fn test_invalid_amount_leaves_save_untouched() {
    let env = Env::new();
    env.cmd("pw").args(["init", "--initial", "3"]).assert().success();
    let before = fs::read(env.save_file()).unwrap();

    env.cmd("pw")
        .args(["transaction", "12."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid amount"));

    assert_eq!(fs::read(env.save_file()).unwrap(), before);
}

#[test]
fn test_record_needs_a_direction() {
    let env = Env::new();
    env.cmd("pw").arg("init").assert().success();
    env.cmd("pw").args(["record", "Alice", "30"]).assert().failure();
    env.cmd("pw")
        .args(["record", "Alice", "30", "--borrowed", "--lent"])
        .assert()
        .failure();
}

#[test]
fn test_init_does_not_overwrite() {
    let env = Env::new();
    env.cmd("pw").arg("init").assert().success();
    env.cmd("pw")
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    env.cmd("other").args(["init", "--force"]).assert().success();
    env.cmd("other").arg("show").assert().success();
}

#[test]
fn test_reset_requires_confirmation() {
    let env = Env::new();
    env.cmd("pw").arg("init").assert().success();

    env.cmd("pw").arg("reset").assert().failure();
    assert!(env.save_file().exists());

    env.cmd("pw")
        .args(["reset", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reset"));
    assert!(!env.save_file().exists());
}

#[test]
fn test_password_from_stdin() {
    let env = Env::new();
    env.cmd("pw").arg("init").assert().success();

    let mut cmd = Command::cargo_bin("tallyrs").unwrap();
    cmd.current_dir(env.dir.path())
        .env_remove("TALLYRS_PASSWORD")
        .arg("--config")
        .arg(env.dir.path().join("tallyrs.toml"))
        .arg("--save-file")
        .arg(env.save_file())
        .arg("show")
        .write_stdin("pw\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Money: $0"));
}
