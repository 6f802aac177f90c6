use assert_cmd::Command;
use predicates::prelude::*;

fn fritz() -> Command {
    Command::new(env!("CARGO_BIN_EXE_fritz"))
}

#[test]
fn help_lists_every_verb() {
    let assert = fritz().arg("--help").assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    for verb in ["run", "build", "stop", "update", "test", "develop", "lint", "prune", "doc"] {
        assert!(output.contains(verb), "`{verb}` missing from help:\n{output}");
    }
}

#[test]
fn no_arguments_prints_usage() {
    fritz().assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn unknown_flag_is_rejected() {
    fritz().args(["run", "--no-such-flag"]).assert().failure();
}

#[test]
fn missing_settings_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    fritz()
        .arg("-C")
        .arg(dir.path())
        .args(["--settings", "missing.toml", "stop"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("settings"));
}

#[test]
fn stop_without_compose_file_fails_before_running_docker() {
    let dir = tempfile::tempdir().unwrap();
    fritz()
        .arg("-C")
        .arg(dir.path())
        .arg("stop")
        .env_remove("RUST_LOG")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Docker compose file not found"));
}
