// tests/role_flag.rs

use std::error::Error;
use std::path::Path;
use std::process::{Command, Output};

use reloader::config::SEARCH_PATH_ENV_VAR;
use reloader::logging::LOG_ENV_VAR;
use reloader::types::{ROLE_ENV_VAR, Role};
use reloader_test_utils::source_tree::SourceTree;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn only_the_exact_worker_value_selects_the_worker() {
    assert_eq!(Role::from_env_value(Some("true")), Role::Worker);

    for value in [None, Some("false"), Some("TRUE"), Some("True"), Some(""), Some("1")] {
        assert_eq!(Role::from_env_value(value), Role::Supervisor, "{value:?}");
    }
}

#[test]
fn role_names() {
    assert_eq!(Role::Supervisor.as_str(), "supervisor");
    assert_eq!(Role::Worker.as_str(), "worker");
}

fn dry_run(cwd: &Path, role_flag: Option<&str>, extra: &[&str]) -> Result<Output, Box<dyn Error>> {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_reloader"));
    cmd.current_dir(cwd)
        .arg("--dry-run")
        .args(extra)
        .env_remove(SEARCH_PATH_ENV_VAR)
        .env_remove(LOG_ENV_VAR);
    match role_flag {
        Some(value) => cmd.env(ROLE_ENV_VAR, value),
        None => cmd.env_remove(ROLE_ENV_VAR),
    };
    Ok(cmd.output()?)
}

#[test]
fn binary_reports_supervisor_without_the_flag() -> TestResult {
    let tree = SourceTree::new()?;
    tree.file("app/main.py")?;

    let output = dry_run(&tree.root(), None, &["--path", "app"])?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("role = supervisor"), "stdout: {stdout}");
    Ok(())
}

#[test]
fn binary_reports_worker_with_the_flag() -> TestResult {
    let tree = SourceTree::new()?;
    tree.file("app/main.py")?;

    let output = dry_run(&tree.root(), Some("true"), &["--path", "app"])?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("role = worker"), "stdout: {stdout}");
    Ok(())
}

#[test]
fn binary_treats_other_flag_values_as_supervisor() -> TestResult {
    let tree = SourceTree::new()?;

    let output = dry_run(&tree.root(), Some("false"), &[])?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("role = supervisor"), "stdout: {stdout}");
    Ok(())
}

#[test]
fn dry_run_lists_the_search_path_and_watched_files() -> TestResult {
    let tree = SourceTree::new()?;
    let app = tree.dir("app")?;
    tree.file("app/main.py")?;
    tree.file("app/pkg/mod.py")?;
    tree.file("app/__pycache__/main.cpython-312.pyc")?;

    let output = dry_run(&tree.root(), None, &["--path", "app"])?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(
        stdout.contains(&format!("  - {}", app.display())),
        "search path missing from: {stdout}"
    );
    assert!(stdout.contains("watched roots"), "stdout: {stdout}");
    assert!(
        !stdout.contains("__pycache__/"),
        "ignored directory leaked: {stdout}"
    );
    Ok(())
}

#[test]
fn dry_run_picks_up_reloader_toml_from_the_working_directory() -> TestResult {
    let tree = SourceTree::new()?;
    let lib = tree.dir("lib")?;
    std::fs::write(
        tree.path("Reloader.toml"),
        "[reloader]\ninterval = \"250ms\"\nsearch_path = [\"lib\"]\n",
    )?;

    let output = dry_run(&tree.root(), None, &[])?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("interval = 250ms"), "stdout: {stdout}");
    assert!(
        stdout.contains(&format!("  - {}", lib.display())),
        "config search path missing from: {stdout}"
    );
    Ok(())
}

#[test]
fn invalid_config_fails_with_exit_code_one() -> TestResult {
    let tree = SourceTree::new()?;
    std::fs::write(tree.path("Reloader.toml"), "[reloader]\ninterval = \"0s\"\n")?;

    let output = dry_run(&tree.root(), None, &[])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("reloader error"));
    Ok(())
}

#[test]
fn oversized_cli_interval_is_rejected_by_the_parser() -> TestResult {
    let tree = SourceTree::new()?;

    let output = dry_run(&tree.root(), None, &["--interval", "307445734561825861m"])?;
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2), "stderr: {stderr}");
    assert!(stderr.contains("too large"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn logs_go_to_stderr_at_the_level_from_the_environment() -> TestResult {
    let tree = SourceTree::new()?;

    let output = Command::new(env!("CARGO_BIN_EXE_reloader"))
        .current_dir(tree.root())
        .args(["--dry-run", "--path", "."])
        .env_remove(SEARCH_PATH_ENV_VAR)
        .env_remove(ROLE_ENV_VAR)
        .env(LOG_ENV_VAR, "warn,reloader=debug")
        .output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "stderr: {stderr}");
    assert!(stderr.contains("resolved settings"), "stderr: {stderr}");
    assert!(!stdout.contains("resolved settings"), "log leaked to stdout: {stdout}");
    Ok(())
}

#[test]
fn log_level_flag_overrides_the_environment() -> TestResult {
    let tree = SourceTree::new()?;

    let output = Command::new(env!("CARGO_BIN_EXE_reloader"))
        .current_dir(tree.root())
        .args(["--dry-run", "--path", ".", "--log-level", "error"])
        .env_remove(SEARCH_PATH_ENV_VAR)
        .env_remove(ROLE_ENV_VAR)
        .env(LOG_ENV_VAR, "debug")
        .output()?;
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "stderr: {stderr}");
    assert!(!stderr.contains("resolved settings"), "stderr: {stderr}");
    Ok(())
}
