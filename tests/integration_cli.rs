/// CLI integration tests for surround.
///
/// `hello_surround` is a mode-dispatch entry point over a demo pipeline; its
/// stdout reports which estimator path ran. `surround init` is exercised
/// against temporary directories.
use std::process::{Command, Output};

use tempfile::tempdir;

fn hello(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hello_surround"))
        .args(args)
        .output()
        .expect("failed to spawn hello_surround binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn no_arguments_runs_batch_prediction() {
    let output = hello(&[]);
    assert!(output.status.success(), "hello_surround failed: {output:?}");
    let out = stdout(&output);
    assert!(out.contains("mode=batch"), "got:\n{out}");
    assert!(out.contains("trained=false"), "got:\n{out}");
    assert!(out.contains("text=hello"), "got:\n{out}");
}

#[test]
fn train_mode_fits_the_estimator() {
    let output = hello(&["--mode", "train"]);
    assert!(output.status.success(), "hello_surround failed: {output:?}");
    let out = stdout(&output);
    assert!(out.contains("mode=train"), "got:\n{out}");
    assert!(out.contains("trained=true"), "got:\n{out}");
}

#[test]
fn unknown_mode_falls_through_to_batch() {
    for mode in ["foo", "BATCH", "Train"] {
        let output = hello(&["--mode", mode]);
        assert!(output.status.success(), "mode {mode}: {output:?}");
        let out = stdout(&output);
        assert!(out.contains("trained=false"), "mode {mode}, got:\n{out}");
    }
}

#[test]
fn mode_without_value_exits_nonzero() {
    let output = hello(&["--mode"]);
    assert!(
        !output.status.success(),
        "expected non-zero exit when --mode has no value"
    );
    assert!(stdout(&output).is_empty(), "pipeline must not run on parse failure");
}

#[test]
fn init_writes_mode_dispatch_project() {
    let tmp = tempdir().expect("tempdir");
    let status = Command::new(env!("CARGO_BIN_EXE_surround"))
        .args(["init", "churn model", "--output"])
        .arg(tmp.path())
        .status()
        .expect("failed to spawn surround binary");
    assert!(status.success(), "init command failed");

    let main_rs = std::fs::read_to_string(tmp.path().join("churn-model/src/main.rs"))
        .expect("read generated main.rs");
    assert!(main_rs.contains("ModeArgs::parse_for(\"churn model\")"), "got:\n{main_rs}");
    assert!(tmp.path().join("churn-model/config.yaml").is_file());
}

#[test]
fn init_dry_run_lists_files_without_writing() {
    let tmp = tempdir().expect("tempdir");
    let output = Command::new(env!("CARGO_BIN_EXE_surround"))
        .args(["init", "demo", "--runner-class", "LocalRunner", "--dry-run", "--output"])
        .arg(tmp.path())
        .output()
        .expect("failed to spawn surround binary");
    assert!(output.status.success(), "init --dry-run failed: {output:?}");

    let out = stdout(&output);
    assert!(out.contains("local_runner.rs"), "got:\n{out}");
    assert!(!tmp.path().join("demo").exists());
}

#[test]
fn init_rejects_invalid_runner_class() {
    let tmp = tempdir().expect("tempdir");
    let status = Command::new(env!("CARGO_BIN_EXE_surround"))
        .args(["init", "demo", "--runner-class", "not-a-type", "--output"])
        .arg(tmp.path())
        .status()
        .expect("failed to spawn surround binary");
    assert!(!status.success(), "expected non-zero exit for invalid runner class");
    assert!(!tmp.path().join("demo").exists());
}

#[test]
fn init_surround_path_writes_path_dependency() {
    let tmp = tempdir().expect("tempdir");
    let status = Command::new(env!("CARGO_BIN_EXE_surround"))
        .args(["init", "demo", "--surround-path", "/opt/surround", "--output"])
        .arg(tmp.path())
        .status()
        .expect("failed to spawn surround binary");
    assert!(status.success(), "init --surround-path failed");

    let manifest = std::fs::read_to_string(tmp.path().join("demo/Cargo.toml"))
        .expect("read generated Cargo.toml");
    assert!(
        manifest.contains("surround = { path = '/opt/surround' }"),
        "got:\n{manifest}"
    );
}

#[test]
fn init_rejects_reserved_runner_class() {
    let tmp = tempdir().expect("tempdir");
    let status = Command::new(env!("CARGO_BIN_EXE_surround"))
        .args(["init", "demo", "--runner-class", "Runner", "--output"])
        .arg(tmp.path())
        .status()
        .expect("failed to spawn surround binary");
    assert!(!status.success(), "expected non-zero exit for a clashing runner class");
    assert!(!tmp.path().join("demo").exists());
}
